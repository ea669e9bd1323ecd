//! Wall-clock helpers.
//!
//! Location fixes carry `SystemTime` timestamps supplied by the OS collaborator.
//! Wall clocks can jump backwards, so age computations must not assume the
//! timestamp precedes "now".

use std::time::{Duration, SystemTime};

/// Age of a wall-clock timestamp, saturating at zero.
///
/// A timestamp in the future (clock adjustment, or a fabricated fix) reports
/// an age of zero rather than failing.
///
/// # Example
///
/// ```
/// use std::time::{Duration, SystemTime};
/// use trustfix::time::saturating_age;
///
/// let earlier = SystemTime::now() - Duration::from_secs(60);
/// assert!(saturating_age(earlier) >= Duration::from_secs(59));
/// ```
pub fn saturating_age(timestamp: SystemTime) -> Duration {
    SystemTime::now()
        .duration_since(timestamp)
        .unwrap_or(Duration::ZERO)
}
