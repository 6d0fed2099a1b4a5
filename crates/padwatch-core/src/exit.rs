//! Process exit codes: the stable contract with callers.

use std::process;

/// Exit status of a padwatch run.
///
/// The numeric values are fixed; scripts branch on them, so they must not
/// drift. Several codes are reserved for callers and alternate frontends
/// and are never produced by the watcher itself: the button-family codes
/// 2-6, serialization failures (11) and externally imposed timeouts (124).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// The condition matched.
    Success = 0,
    /// The condition did not match in capture mode, or the input source
    /// failed mid-run.
    Error = 1,
    /// Reserved: a cancel-family button matched.
    CancelButton = 2,
    /// Reserved: the menu button matched.
    MenuButton = 3,
    /// Reserved: an action-family button matched.
    ActionButton = 4,
    /// Reserved: an inaction-family button matched.
    InactionButton = 5,
    /// Reserved: the start button matched.
    StartButton = 6,
    /// The command line did not parse or validate.
    ParseError = 10,
    /// Reserved for serialization failures.
    SerializeError = 11,
    /// Reserved for an externally imposed timeout.
    Timeout = 124,
    /// SIGINT ended the run.
    Interrupt = 130,
    /// SIGTERM ended the run.
    Terminated = 143,
}

impl ExitCode {
    /// The numeric status handed to the operating system.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code.code())
    }
}
