//! The polling driver: timing and cancellation around the core loop.

use std::future::Future;

use anyhow::{Context, Result};
use padwatch_core::{ExitCode, InputSource, PollLoop, TickOutcome, WatchSpec, TICK_INTERVAL};
use tokio::signal::unix::{signal, SignalKind};
use tokio::time;

/// Poll until the spec reaches a terminal decision or a signal arrives.
///
/// SIGINT and SIGTERM resolve to their fixed exit codes at the next tick
/// boundary and always beat a pending evaluation. Cancellation is
/// cooperative: this returns normally and the caller still runs teardown.
pub async fn run<S: InputSource>(spec: WatchSpec, pad: &mut S) -> Result<ExitCode> {
    let mut sigint = signal(SignalKind::interrupt()).context("installing SIGINT handler")?;
    let mut sigterm = signal(SignalKind::terminate()).context("installing SIGTERM handler")?;

    let cancel = async move {
        tokio::select! {
            _ = sigint.recv() => ExitCode::Interrupt,
            _ = sigterm.recv() => ExitCode::Terminated,
        }
    };

    drive(PollLoop::new(spec), pad, cancel).await
}

/// The loop body, with cancellation injected so tests can script it.
async fn drive<S, C>(mut poll: PollLoop, pad: &mut S, cancel: C) -> Result<ExitCode>
where
    S: InputSource,
    C: Future<Output = ExitCode>,
{
    tokio::pin!(cancel);
    loop {
        pad.refresh().context("refreshing input snapshot")?;
        if let TickOutcome::Finished(code) = poll.tick(pad) {
            return Ok(code);
        }
        tokio::select! {
            // A pending signal always wins over an elapsed delay.
            biased;
            code = &mut cancel => return Ok(code),
            _ = time::sleep(TICK_INTERVAL) => {}
        }
    }
}
