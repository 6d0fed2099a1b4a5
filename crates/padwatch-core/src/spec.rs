//! The validated watch specification.

use std::fmt;
use std::str::FromStr;

use crate::button::Button;
use crate::error::ParseError;

/// Whether a non-matching tick ends the run or merely schedules another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// A single failed evaluation terminates with the generic error code.
    Capture,
    /// Failed evaluations are not terminal; polling continues.
    Wait,
}

impl FromStr for RunMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "CAPTURE" => Ok(Self::Capture),
            "WAIT" => Ok(Self::Wait),
            _ => Err(ParseError::InvalidMode(s.to_string())),
        }
    }
}

/// Which per-tick predicate of a button's signal is consulted.
///
/// The four predicates are independent reads of the input snapshot; none is
/// derived from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalState {
    JustPressed,
    IsPressed,
    JustReleased,
    JustRepeated,
}

impl FromStr for TemporalState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "JUST_PRESSED" => Ok(Self::JustPressed),
            "IS_PRESSED" => Ok(Self::IsPressed),
            "JUST_RELEASED" => Ok(Self::JustReleased),
            "JUST_REPEATED" => Ok(Self::JustRepeated),
            _ => Err(ParseError::InvalidState(s.to_string())),
        }
    }
}

/// How per-button matches are aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombinationRule {
    /// Every listed button must satisfy the predicate this tick.
    All,
    /// At least one listed button must satisfy it.
    Either,
    /// Sugar for `Either` over the whole catalog; normalized away when the
    /// spec is built.
    Any,
}

impl FromStr for CombinationRule {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ALL" => Ok(Self::All),
            "EITHER" => Ok(Self::Either),
            "ANY" => Ok(Self::Any),
            _ => Err(ParseError::InvalidCombination(s.to_string())),
        }
    }
}

impl fmt::Display for CombinationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "ALL",
            Self::Either => "EITHER",
            Self::Any => "ANY",
        })
    }
}

/// The validated, immutable configuration for one run.
///
/// Once constructed the spec never changes: `ANY` has been expanded to
/// `EITHER` over [`Button::ALL`], and `ALL`/`EITHER` are guaranteed a
/// non-empty button list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSpec {
    pub mode: RunMode,
    pub state: TemporalState,
    pub rule: CombinationRule,
    pub buttons: Vec<Button>,
}

impl WatchSpec {
    /// Build a spec from the raw command-line words.
    ///
    /// All matching is case-insensitive; words are normalized to uppercase
    /// before lookup, so feeding an already-valid spec back through here
    /// yields the identical result.
    pub fn parse(
        mode: &str,
        state: &str,
        combination: &str,
        buttons: Option<&str>,
    ) -> Result<Self, ParseError> {
        let mode = mode.parse()?;
        let state = state.parse()?;
        let rule = combination.parse()?;
        let buttons = match buttons {
            Some(list) => parse_button_list(list)?,
            None => Vec::new(),
        };
        Self::new(mode, state, rule, buttons)
    }

    /// Build a spec from already-parsed parts.
    ///
    /// `Any` ignores the given buttons and becomes `Either` over the full
    /// catalog; the other rules require at least one button.
    pub fn new(
        mode: RunMode,
        state: TemporalState,
        rule: CombinationRule,
        buttons: Vec<Button>,
    ) -> Result<Self, ParseError> {
        match rule {
            CombinationRule::Any => Ok(Self {
                mode,
                state,
                rule: CombinationRule::Either,
                buttons: Button::ALL.to_vec(),
            }),
            rule => {
                if buttons.is_empty() {
                    return Err(ParseError::EmptyButtons(rule));
                }
                Ok(Self {
                    mode,
                    state,
                    rule,
                    buttons,
                })
            }
        }
    }
}

/// Split a comma-separated button list, validating every name.
///
/// Empty segments (stray or trailing commas) are skipped rather than
/// rejected, so `BTN_A,,BTN_B` reads the same as `BTN_A,BTN_B`.
fn parse_button_list(list: &str) -> Result<Vec<Button>, ParseError> {
    list.split(',')
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_spec() {
        let spec = WatchSpec::parse("wait", "just_pressed", "all", Some("btn_a,btn_b")).unwrap();
        assert_eq!(spec.mode, RunMode::Wait);
        assert_eq!(spec.state, TemporalState::JustPressed);
        assert_eq!(spec.rule, CombinationRule::All);
        assert_eq!(spec.buttons, vec![Button::A, Button::B]);
    }

    #[test]
    fn parses_every_mode_and_state() {
        assert_eq!("CAPTURE".parse::<RunMode>(), Ok(RunMode::Capture));
        assert_eq!("wait".parse::<RunMode>(), Ok(RunMode::Wait));
        assert_eq!(
            "IS_PRESSED".parse::<TemporalState>(),
            Ok(TemporalState::IsPressed)
        );
        assert_eq!(
            "just_released".parse::<TemporalState>(),
            Ok(TemporalState::JustReleased)
        );
        assert_eq!(
            "Just_Repeated".parse::<TemporalState>(),
            Ok(TemporalState::JustRepeated)
        );
        assert_eq!("either".parse::<CombinationRule>(), Ok(CombinationRule::Either));
    }

    #[test]
    fn rejects_unknown_words() {
        assert_eq!(
            WatchSpec::parse("FOO", "JUST_PRESSED", "ALL", Some("BTN_A")),
            Err(ParseError::InvalidMode("FOO".to_string()))
        );
        assert_eq!(
            WatchSpec::parse("WAIT", "FOO", "ALL", Some("BTN_A")),
            Err(ParseError::InvalidState("FOO".to_string()))
        );
        assert_eq!(
            WatchSpec::parse("WAIT", "JUST_PRESSED", "FOO", Some("BTN_A")),
            Err(ParseError::InvalidCombination("FOO".to_string()))
        );
        assert_eq!(
            WatchSpec::parse("WAIT", "JUST_PRESSED", "ALL", Some("BTN_FOO")),
            Err(ParseError::InvalidButton("BTN_FOO".to_string()))
        );
    }

    #[test]
    fn any_expands_to_either_over_the_catalog() {
        let spec = WatchSpec::parse("CAPTURE", "IS_PRESSED", "ANY", None).unwrap();
        assert_eq!(spec.rule, CombinationRule::Either);
        assert_eq!(spec.buttons, Button::ALL.to_vec());
    }

    #[test]
    fn any_still_validates_a_given_button_list() {
        // The list is replaced by the catalog, but bad names in it are
        // still a configuration error.
        assert_eq!(
            WatchSpec::parse("CAPTURE", "IS_PRESSED", "ANY", Some("BTN_FOO")),
            Err(ParseError::InvalidButton("BTN_FOO".to_string()))
        );
        let spec = WatchSpec::parse("CAPTURE", "IS_PRESSED", "ANY", Some("BTN_A")).unwrap();
        assert_eq!(spec.buttons, Button::ALL.to_vec());
    }

    #[test]
    fn all_and_either_require_buttons() {
        assert_eq!(
            WatchSpec::parse("WAIT", "JUST_PRESSED", "ALL", None),
            Err(ParseError::EmptyButtons(CombinationRule::All))
        );
        assert_eq!(
            WatchSpec::parse("WAIT", "JUST_PRESSED", "EITHER", Some("")),
            Err(ParseError::EmptyButtons(CombinationRule::Either))
        );
    }

    #[test]
    fn stray_commas_are_skipped() {
        let spec =
            WatchSpec::parse("WAIT", "JUST_PRESSED", "ALL", Some("BTN_A,,BTN_B,")).unwrap();
        assert_eq!(spec.buttons, vec![Button::A, Button::B]);
    }

    #[test]
    fn button_order_is_preserved() {
        let spec =
            WatchSpec::parse("WAIT", "JUST_PRESSED", "EITHER", Some("BTN_Y,BTN_A,BTN_X")).unwrap();
        assert_eq!(spec.buttons, vec![Button::Y, Button::A, Button::X]);
    }

    #[test]
    fn parse_is_idempotent() {
        let first = WatchSpec::parse("wait", "just_pressed", "all", Some("btn_a,btn_b")).unwrap();
        let second = WatchSpec::parse("WAIT", "JUST_PRESSED", "ALL", Some("BTN_A,BTN_B")).unwrap();
        assert_eq!(first, second);
    }
}
