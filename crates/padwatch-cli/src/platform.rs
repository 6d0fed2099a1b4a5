//! CPU clock policy around the poll loop.
//!
//! The launcher environments this tool runs under drop the CPU clock while
//! a menu is just polling input; sampling at 20 Hz needs no performance
//! governor. Everything here is best-effort: devices without cpufreq
//! simply skip it.

use std::fs;
use std::path::Path;

const GOVERNOR_PATH: &str = "/sys/devices/system/cpu/cpufreq/policy0/scaling_governor";
const MENU_GOVERNOR: &str = "powersave";

/// Holds the governor that was active before the run; restored on drop.
pub struct CpuGovernor {
    previous: String,
}

/// Switch the CPU governor down for the duration of the run.
pub fn downclock() -> Option<CpuGovernor> {
    let path = Path::new(GOVERNOR_PATH);
    let previous = match fs::read_to_string(path) {
        Ok(governor) => governor.trim().to_string(),
        Err(err) => {
            tracing::debug!("cpufreq governor unavailable: {err}");
            return None;
        }
    };
    if previous == MENU_GOVERNOR {
        return None;
    }
    if let Err(err) = fs::write(path, MENU_GOVERNOR) {
        tracing::debug!("could not set the {MENU_GOVERNOR} governor: {err}");
        return None;
    }
    tracing::debug!("cpufreq governor {previous} -> {MENU_GOVERNOR}");
    Some(CpuGovernor { previous })
}

impl Drop for CpuGovernor {
    fn drop(&mut self) {
        if let Err(err) = fs::write(GOVERNOR_PATH, &self.previous) {
            tracing::debug!("could not restore the {} governor: {err}", self.previous);
        }
    }
}
