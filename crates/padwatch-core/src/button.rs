//! The fixed button catalog.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// One button of the handheld, or the `None` sentinel.
///
/// The catalog is closed: these are all the controls the watcher can be
/// asked about. `Up`/`Down`/`Left`/`Right` are aliases for the dpad
/// directions at the input layer but remain distinct catalog entries, as
/// callers may name either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    AnalogDown,
    AnalogLeft,
    AnalogRight,
    AnalogUp,
    B,
    Down,
    DpadDown,
    DpadLeft,
    DpadRight,
    DpadUp,
    L1,
    L2,
    L3,
    Left,
    Menu,
    Minus,
    /// Sentinel: resolves from unknown names and never satisfies a predicate.
    None,
    Plus,
    Power,
    Poweroff,
    R1,
    R2,
    R3,
    Right,
    Select,
    Start,
    Up,
    X,
    Y,
}

/// Canonical name to button, in catalog order. `BTN_NONE` is a recognized
/// name (it appears in scripts that want a never-matching placeholder), so
/// it is part of the table even though [`Button::ALL`] excludes it.
const CATALOG: &[(&str, Button)] = &[
    ("BTN_A", Button::A),
    ("BTN_ANALOG_DOWN", Button::AnalogDown),
    ("BTN_ANALOG_LEFT", Button::AnalogLeft),
    ("BTN_ANALOG_RIGHT", Button::AnalogRight),
    ("BTN_ANALOG_UP", Button::AnalogUp),
    ("BTN_B", Button::B),
    ("BTN_DOWN", Button::Down),
    ("BTN_DPAD_DOWN", Button::DpadDown),
    ("BTN_DPAD_LEFT", Button::DpadLeft),
    ("BTN_DPAD_RIGHT", Button::DpadRight),
    ("BTN_DPAD_UP", Button::DpadUp),
    ("BTN_L1", Button::L1),
    ("BTN_L2", Button::L2),
    ("BTN_L3", Button::L3),
    ("BTN_LEFT", Button::Left),
    ("BTN_MENU", Button::Menu),
    ("BTN_MINUS", Button::Minus),
    ("BTN_NONE", Button::None),
    ("BTN_PLUS", Button::Plus),
    ("BTN_POWER", Button::Power),
    ("BTN_POWEROFF", Button::Poweroff),
    ("BTN_R1", Button::R1),
    ("BTN_R2", Button::R2),
    ("BTN_R3", Button::R3),
    ("BTN_RIGHT", Button::Right),
    ("BTN_SELECT", Button::Select),
    ("BTN_START", Button::Start),
    ("BTN_UP", Button::Up),
    ("BTN_X", Button::X),
    ("BTN_Y", Button::Y),
];

impl Button {
    /// Every real button in catalog order, excluding the sentinel. The `ANY`
    /// combination expands to this list.
    pub const ALL: [Button; 29] = [
        Button::A,
        Button::AnalogDown,
        Button::AnalogLeft,
        Button::AnalogRight,
        Button::AnalogUp,
        Button::B,
        Button::Down,
        Button::DpadDown,
        Button::DpadLeft,
        Button::DpadRight,
        Button::DpadUp,
        Button::L1,
        Button::L2,
        Button::L3,
        Button::Left,
        Button::Menu,
        Button::Minus,
        Button::Plus,
        Button::Power,
        Button::Poweroff,
        Button::R1,
        Button::R2,
        Button::R3,
        Button::Right,
        Button::Select,
        Button::Start,
        Button::Up,
        Button::X,
        Button::Y,
    ];

    /// Resolve a name to a catalog entry, falling back to the sentinel.
    ///
    /// This is the lenient, post-validation path: configured names have
    /// already passed [`Button::is_valid`], so the fallback should not be
    /// reachable in practice.
    pub fn parse(name: &str) -> Button {
        let upper = name.to_ascii_uppercase();
        match CATALOG.iter().find(|(n, _)| *n == upper) {
            Some(&(_, button)) => button,
            Option::None => {
                tracing::debug!("unknown button name: {name}");
                Button::None
            }
        }
    }

    /// Membership check used during configuration validation.
    pub fn is_valid(name: &str) -> bool {
        let upper = name.to_ascii_uppercase();
        CATALOG.iter().any(|(n, _)| *n == upper)
    }

    /// The canonical `BTN_*` name.
    pub fn name(self) -> &'static str {
        CATALOG
            .iter()
            .find(|(_, b)| *b == self)
            .map(|(n, _)| *n)
            .unwrap_or("BTN_NONE")
    }
}

impl FromStr for Button {
    type Err = ParseError;

    /// The validating boundary: unknown names are rejected outright.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.to_ascii_uppercase();
        CATALOG
            .iter()
            .find(|(n, _)| *n == upper)
            .map(|&(_, button)| button)
            .ok_or_else(|| ParseError::InvalidButton(s.to_string()))
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_names() {
        assert_eq!(Button::parse("BTN_A"), Button::A);
        assert_eq!(Button::parse("BTN_DPAD_UP"), Button::DpadUp);
        assert_eq!(Button::parse("BTN_POWEROFF"), Button::Poweroff);
    }

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Button::parse("btn_a"), Button::A);
        assert_eq!(Button::parse("Btn_Analog_Left"), Button::AnalogLeft);
    }

    #[test]
    fn parse_falls_back_to_sentinel() {
        assert_eq!(Button::parse("BTN_FOO"), Button::None);
        assert_eq!(Button::parse(""), Button::None);
    }

    #[test]
    fn from_str_rejects_unknown_names() {
        assert_eq!(
            "BTN_FOO".parse::<Button>(),
            Err(ParseError::InvalidButton("BTN_FOO".to_string()))
        );
        assert_eq!("btn_select".parse::<Button>(), Ok(Button::Select));
    }

    #[test]
    fn is_valid_matches_the_catalog() {
        assert!(Button::is_valid("BTN_A"));
        assert!(Button::is_valid("btn_y"));
        assert!(Button::is_valid("BTN_NONE"));
        assert!(!Button::is_valid("BTN_FOO"));
        assert!(!Button::is_valid("A"));
    }

    #[test]
    fn all_excludes_the_sentinel() {
        assert_eq!(Button::ALL.len(), 29);
        assert!(!Button::ALL.contains(&Button::None));
    }

    #[test]
    fn all_is_in_catalog_order() {
        let from_catalog: Vec<Button> = CATALOG
            .iter()
            .map(|&(_, b)| b)
            .filter(|&b| b != Button::None)
            .collect();
        assert_eq!(from_catalog, Button::ALL.to_vec());
    }

    #[test]
    fn name_round_trips() {
        for &(name, button) in CATALOG {
            assert_eq!(button.name(), name);
            assert_eq!(Button::parse(name), button);
        }
    }
}
