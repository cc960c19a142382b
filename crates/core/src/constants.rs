//! Constants used throughout the chart core crate.
//!
//! The drug labels are display data; they are carried through to records and
//! responses unchanged.

/// Viral loads strictly above this value take the high-load regimen.
pub const VIRAL_LOAD_THRESHOLD: f64 = 7000.0;

/// Marker stored in `extra_pi` when no extra protease inhibitor is recommended.
pub const EXTRA_PI_NOT_APPLIED: &str = "Not Applied";

/// Label appended to the legacy summary string when the pk-enhancer flag is set.
pub const EXTRA_PK_EN_LABEL: &str = "extra pk-En";

/// Default upper bound on concurrently held REST sessions.
pub const DEFAULT_MAX_SESSIONS: usize = 1024;
