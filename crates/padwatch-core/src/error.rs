use thiserror::Error;

use crate::spec::CombinationRule;

/// Errors raised while turning command-line words into a
/// [`WatchSpec`](crate::WatchSpec).
///
/// All of these surface before the first tick and map to the parse-error
/// exit status.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid mode: {0}")]
    InvalidMode(String),

    #[error("invalid button state: {0}")]
    InvalidState(String),

    #[error("invalid combination: {0}")]
    InvalidCombination(String),

    #[error("invalid button: {0}")]
    InvalidButton(String),

    #[error("combination {0} requires at least one button")]
    EmptyButtons(CombinationRule),
}
