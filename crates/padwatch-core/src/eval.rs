//! Combination evaluation against one tick's snapshot.

use crate::button::Button;
use crate::source::InputSource;
use crate::spec::{CombinationRule, TemporalState, WatchSpec};

/// Decide whether the spec's condition holds on the current snapshot.
///
/// Buttons are visited in configuration order. `All` short-circuits on the
/// first miss and `Either` on the first hit, so a potentially expensive
/// source is queried no more than necessary. An empty `All` list is
/// vacuously true (unreachable through validation).
pub fn evaluate<S: InputSource>(spec: &WatchSpec, source: &S) -> bool {
    match spec.rule {
        CombinationRule::All => spec
            .buttons
            .iter()
            .all(|&button| probe(spec.state, source, button)),
        // `Any` is normalized away at construction; treat a hand-built one
        // as the disjunction it expands to.
        CombinationRule::Either | CombinationRule::Any => spec
            .buttons
            .iter()
            .any(|&button| probe(spec.state, source, button)),
    }
}

/// Query one predicate for one button. The sentinel never matches and is
/// not forwarded to the source.
fn probe<S: InputSource>(state: TemporalState, source: &S, button: Button) -> bool {
    if button == Button::None {
        return false;
    }
    match state {
        TemporalState::JustPressed => source.just_pressed(button),
        TemporalState::IsPressed => source.is_pressed(button),
        TemporalState::JustReleased => source.just_released(button),
        TemporalState::JustRepeated => source.just_repeated(button),
    }
}
