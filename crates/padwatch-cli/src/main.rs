//! padwatch
//!
//! Blocks until a configured combination of pad buttons reaches a requested
//! state, then exits with a code that encodes the outcome. Meant to be
//! invoked from shell scripts that branch on the exit status.

mod pad;
mod platform;
mod silence;
mod watch;

use std::process;

use clap::error::ErrorKind;
use clap::Parser;
use padwatch_core::{ExitCode, WatchSpec};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "padwatch")]
#[command(about = "Wait for or test handheld button combinations")]
#[command(version)]
struct Args {
    /// CAPTURE exits after one sample; WAIT polls until the condition holds
    mode: String,

    /// JUST_PRESSED, IS_PRESSED, JUST_RELEASED or JUST_REPEATED
    state: String,

    /// ALL, ANY or EITHER
    combination: String,

    /// Comma-separated button names (required unless combination is ANY)
    buttons: Option<String>,
}

fn main() -> process::ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Usage problems must exit with the parse-error code, so clap's own
    // error path (which would exit 2) is intercepted here.
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let kind = err.kind();
            let _ = err.print();
            if kind == ErrorKind::DisplayHelp || kind == ErrorKind::DisplayVersion {
                return process::ExitCode::SUCCESS;
            }
            return ExitCode::ParseError.into();
        }
    };

    let spec = match WatchSpec::parse(
        &args.mode,
        &args.state,
        &args.combination,
        args.buttons.as_deref(),
    ) {
        Ok(spec) => spec,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("usage: padwatch <mode> <state> <combination> [<buttons>]");
            return ExitCode::ParseError.into();
        }
    };

    tracing::debug!(?spec, "watching");
    run(spec).into()
}

fn run(spec: WatchSpec) -> ExitCode {
    // Bring-up can log to stdout on some devices; keep both streams quiet
    // while it runs.
    let quiet = silence::Silenced::acquire();
    let governor = platform::downclock();
    let pad = pad::EvdevPad::open();
    drop(quiet);

    let (code, pad) = match pad {
        Ok(mut pad) => (poll(spec, &mut pad), Some(pad)),
        Err(err) => {
            tracing::error!("input bring-up failed: {err:#}");
            (ExitCode::Error, None)
        }
    };

    // Teardown runs on every path, including after a signal.
    let quiet = silence::Silenced::acquire();
    drop(pad);
    drop(governor);
    drop(quiet);

    code
}

fn poll(spec: WatchSpec, pad: &mut pad::EvdevPad) -> ExitCode {
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::error!("failed to start the poll runtime: {err}");
            return ExitCode::Error;
        }
    };

    match runtime.block_on(watch::run(spec, pad)) {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("polling failed: {err:#}");
            ExitCode::Error
        }
    }
}
