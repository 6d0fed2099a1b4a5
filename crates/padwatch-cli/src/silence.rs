//! Scoped suppression of stdout and stderr.
//!
//! Platform bring-up on some devices prints to stdout, which would break
//! the contract this tool has with its callers: stdout stays empty and
//! stderr carries only our own diagnostics. The guard points both streams
//! at `/dev/null` and restores them when dropped, on every exit path.

use std::fs::File;
use std::io::{self, Write};
use std::os::unix::io::{AsRawFd, RawFd};

use nix::unistd::{close, dup, dup2};

pub struct Silenced {
    saved: Option<(RawFd, RawFd)>,
}

impl Silenced {
    /// Redirect fds 1 and 2 to `/dev/null` until the guard drops.
    ///
    /// If the redirection itself fails the guard is inert rather than
    /// fatal; a noisy init is better than no run at all.
    pub fn acquire() -> Silenced {
        match Self::redirect() {
            Ok(saved) => Silenced { saved: Some(saved) },
            Err(err) => {
                tracing::debug!("stdio suppression unavailable: {err}");
                Silenced { saved: None }
            }
        }
    }

    fn redirect() -> io::Result<(RawFd, RawFd)> {
        let devnull = File::options().write(true).open("/dev/null")?;
        let saved_stdout = dup(io::stdout().as_raw_fd())?;
        let saved_stderr = dup(io::stderr().as_raw_fd())?;
        dup2(devnull.as_raw_fd(), io::stdout().as_raw_fd())?;
        dup2(devnull.as_raw_fd(), io::stderr().as_raw_fd())?;
        Ok((saved_stdout, saved_stderr))
    }
}

impl Drop for Silenced {
    fn drop(&mut self) {
        let Some((saved_stdout, saved_stderr)) = self.saved.take() else {
            return;
        };
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        let _ = dup2(saved_stdout, io::stdout().as_raw_fd());
        let _ = dup2(saved_stderr, io::stderr().as_raw_fd());
        let _ = close(saved_stdout);
        let _ = close(saved_stderr);
    }
}
