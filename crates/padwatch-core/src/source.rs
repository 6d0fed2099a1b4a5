use std::io;

use crate::button::Button;

/// Capability consumed by the evaluator and the poll loop: one fresh sample
/// per tick, then per-button reads against that sample.
///
/// Implementations must answer every predicate from the most recent
/// [`refresh`](InputSource::refresh) only, so that a tick sees one
/// consistent snapshot. The four predicates are independent; `is_pressed`
/// being true says nothing about `just_pressed` and vice versa.
pub trait InputSource {
    /// Take one atomic sample of all buttons. Called exactly once per tick,
    /// before any predicate is read. Failures are fatal to the run.
    fn refresh(&mut self) -> io::Result<()>;

    /// The button transitioned to pressed in the current sample.
    fn just_pressed(&self, button: Button) -> bool;

    /// The button is down in the current sample.
    fn is_pressed(&self, button: Button) -> bool;

    /// The button transitioned to released in the current sample.
    fn just_released(&self, button: Button) -> bool;

    /// The button's auto-repeat fired in the current sample.
    fn just_repeated(&self, button: Button) -> bool;
}
