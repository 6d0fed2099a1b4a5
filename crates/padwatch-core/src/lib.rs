//! Core evaluation engine for padwatch
//!
//! This crate holds the button catalog, the validated watch specification,
//! the combination evaluator and the poll-loop state machine. It performs
//! no I/O of its own: button readings arrive through the [`InputSource`]
//! capability, and timing, signals and hardware live in the binary crate.

mod button;
mod error;
mod eval;
mod exit;
mod poll;
mod source;
mod spec;

pub use button::Button;
pub use error::ParseError;
pub use eval::evaluate;
pub use exit::ExitCode;
pub use poll::{PollLoop, TickOutcome};
pub use source::InputSource;
pub use spec::{CombinationRule, RunMode, TemporalState, WatchSpec};

/// Fixed delay between polling ticks in `WAIT` mode.
pub const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_millis(50);
