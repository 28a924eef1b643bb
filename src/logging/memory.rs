//! Resident memory sampling, used to make the per-stage memory footprint visible in logs.

use sysinfo::System;

/// Resident set size of this process in bytes, if the platform reports it.
pub fn resident_bytes() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut sys = System::new();
    if !sys.refresh_process(pid) {
        return None;
    }
    sys.process(pid).map(|p| p.memory())
}
