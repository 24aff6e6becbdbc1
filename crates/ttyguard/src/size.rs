use crate::Result;
use crate::error::TermError;
use crate::platform::Dimensions;
use crate::platform::SystemTerminal;
use crate::platform::TerminalControl;

/// One-shot window size queries against a terminal.
///
/// Nothing is cached: every call goes back to the device, since the window
/// may have been resized in between.
#[derive(Debug, Clone, Default)]
pub struct SizeProbe<T> {
    terminal: T,
}

impl<T: TerminalControl> SizeProbe<T> {
    pub fn new(terminal: T) -> Self {
        Self { terminal }
    }

    pub fn size(&self) -> Result<Dimensions> {
        self.terminal.window_size().map_err(TermError::DeviceQuery)
    }

    pub fn width(&self) -> Result<u16> {
        self.size().map(|dims| dims.cols)
    }
}

/// Size of the terminal attached to standard output.
pub fn terminal_size() -> Result<Dimensions> {
    SizeProbe::new(SystemTerminal::new()).size()
}

/// Column count of the terminal attached to standard output.
pub fn terminal_width() -> Result<u16> {
    SizeProbe::new(SystemTerminal::new()).width()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockTerminal;

    #[test]
    fn test_size_reports_rows_and_cols() {
        let terminal = MockTerminal::new(0).with_size(24, 80);
        let sizes = SizeProbe::new(terminal);

        let dims = sizes.size().unwrap();
        assert_eq!(dims.rows, 24);
        assert_eq!(dims.cols, 80);
        assert_eq!(sizes.width().unwrap(), 80);
    }

    #[test]
    fn test_size_is_not_cached() {
        let terminal = MockTerminal::new(0).with_size(24, 80);
        let sizes = SizeProbe::new(terminal.clone());
        assert_eq!(sizes.size().unwrap(), Dimensions::new(24, 80));

        terminal.resize(50, 132);
        assert_eq!(sizes.size().unwrap(), Dimensions::new(50, 132));
        assert_eq!(terminal.size_queries(), 2);
    }

    #[test]
    fn test_repeated_queries_agree() {
        let sizes = SizeProbe::new(MockTerminal::new(0).with_size(30, 100));
        assert_eq!(sizes.size().unwrap(), sizes.size().unwrap());
    }

    #[test]
    fn test_query_failure_maps_to_device_query() {
        let terminal = MockTerminal::new(0);
        terminal.fail_window_size(25);
        let sizes = SizeProbe::new(terminal);

        let err = sizes.size().unwrap_err();
        assert!(matches!(err, TermError::DeviceQuery(_)));
        assert_eq!(err.os_error().and_then(|e| e.raw_os_error()), Some(25));

        assert!(matches!(sizes.width(), Err(TermError::DeviceQuery(_))));
    }
}
