//! The poll-loop state machine.

use crate::eval::evaluate;
use crate::exit::ExitCode;
use crate::source::InputSource;
use crate::spec::{RunMode, WatchSpec};

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No terminal decision yet; sample again after the inter-tick delay.
    Pending,
    /// The run is over with the given exit code.
    Finished(ExitCode),
}

/// Single-owner loop state.
///
/// The driver refreshes the input source, calls [`tick`](PollLoop::tick),
/// and sleeps between pending ticks. The first terminal decision is
/// latched: once finished, every later tick reports the same code instead
/// of re-evaluating.
#[derive(Debug)]
pub struct PollLoop {
    spec: WatchSpec,
    finished: Option<ExitCode>,
}

impl PollLoop {
    pub fn new(spec: WatchSpec) -> Self {
        Self {
            spec,
            finished: None,
        }
    }

    pub fn spec(&self) -> &WatchSpec {
        &self.spec
    }

    /// Evaluate the current snapshot and decide whether to terminate.
    pub fn tick<S: InputSource>(&mut self, source: &S) -> TickOutcome {
        if let Some(code) = self.finished {
            return TickOutcome::Finished(code);
        }
        if evaluate(&self.spec, source) {
            return self.finish(ExitCode::Success);
        }
        match self.spec.mode {
            RunMode::Capture => self.finish(ExitCode::Error),
            RunMode::Wait => TickOutcome::Pending,
        }
    }

    fn finish(&mut self, code: ExitCode) -> TickOutcome {
        self.finished = Some(code);
        TickOutcome::Finished(code)
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::button::Button;
    use crate::spec::{CombinationRule, TemporalState};

    /// Minimal snapshot: a set of just-pressed buttons, mutable between
    /// ticks.
    #[derive(Default)]
    struct FakePad {
        just_pressed: Vec<Button>,
    }

    impl InputSource for FakePad {
        fn refresh(&mut self) -> io::Result<()> {
            Ok(())
        }

        fn just_pressed(&self, button: Button) -> bool {
            self.just_pressed.contains(&button)
        }

        fn is_pressed(&self, _button: Button) -> bool {
            false
        }

        fn just_released(&self, _button: Button) -> bool {
            false
        }

        fn just_repeated(&self, _button: Button) -> bool {
            false
        }
    }

    fn spec(mode: RunMode) -> WatchSpec {
        WatchSpec::new(
            mode,
            TemporalState::JustPressed,
            CombinationRule::All,
            vec![Button::A, Button::B],
        )
        .unwrap()
    }

    #[test]
    fn capture_terminates_on_the_first_miss() {
        // BTN_A is down but BTN_B is not: ALL misses, capture mode exits
        // with the generic error immediately.
        let pad = FakePad {
            just_pressed: vec![Button::A],
        };
        let mut poll = PollLoop::new(spec(RunMode::Capture));
        assert_eq!(poll.tick(&pad), TickOutcome::Finished(ExitCode::Error));
    }

    #[test]
    fn capture_succeeds_when_the_first_tick_matches() {
        let pad = FakePad {
            just_pressed: vec![Button::A, Button::B],
        };
        let mut poll = PollLoop::new(spec(RunMode::Capture));
        assert_eq!(poll.tick(&pad), TickOutcome::Finished(ExitCode::Success));
    }

    #[test]
    fn wait_keeps_polling_until_a_match() {
        let mut pad = FakePad {
            just_pressed: vec![Button::A],
        };
        let mut poll = PollLoop::new(spec(RunMode::Wait));
        assert_eq!(poll.tick(&pad), TickOutcome::Pending);
        assert_eq!(poll.tick(&pad), TickOutcome::Pending);

        pad.just_pressed = vec![Button::A, Button::B];
        assert_eq!(poll.tick(&pad), TickOutcome::Finished(ExitCode::Success));
    }

    #[test]
    fn a_terminal_decision_is_latched() {
        let pad = FakePad {
            just_pressed: vec![Button::A, Button::B],
        };
        let mut poll = PollLoop::new(spec(RunMode::Capture));
        assert_eq!(poll.tick(&pad), TickOutcome::Finished(ExitCode::Success));

        // Even if the snapshot stops matching, the decision stands.
        let idle = FakePad::default();
        assert_eq!(poll.tick(&idle), TickOutcome::Finished(ExitCode::Success));
    }
}
