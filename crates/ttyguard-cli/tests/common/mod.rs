#![allow(dead_code)]

use assert_cmd::Command;

pub const EXIT_IO_ERROR: i32 = 74;

pub fn ttyguard_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ttyguard"));
    cmd.env_remove("TTYGUARD_LOG").env_remove("RUST_LOG");
    cmd
}
