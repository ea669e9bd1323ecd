//! Location fix snapshots.
//!
//! A [`LocationFix`] is one reported location sample: coordinates, optional
//! accuracy, a wall-clock timestamp, the OS provider that produced it, and the
//! OS-asserted synthetic flag. Fixes are produced by the
//! [`LocationSource`](crate::platform::LocationSource) collaborator and never
//! mutated afterwards; the session hands out value copies, not references.
//!
//! Besides the snapshot itself, this module carries the sanity predicates used
//! by the environment scan: a fix at null island, with an impossible accuracy,
//! or older than an hour is suspicious on its own, independent of the stateful
//! plausibility tracking.

use std::fmt;
use std::time::{Duration, SystemTime};

use crate::time::saturating_age;

/// Accuracy values outside (0, 100 000] meters are not physically meaningful.
const MAX_PLAUSIBLE_ACCURACY_METERS: f32 = 100_000.0;

/// A fix older than this is treated as suspicious by the environment scan.
pub const MAX_FIX_AGE: Duration = Duration::from_secs(3600);

/// A single reported location sample.
///
/// Immutable snapshot; construct with [`LocationFix::new`] and the `with_*`
/// builders.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    /// Latitude in degrees (-90 to 90).
    pub latitude: f64,

    /// Longitude in degrees (-180 to 180).
    pub longitude: f64,

    /// Reported accuracy radius in meters, when the provider supplies one.
    pub accuracy: Option<f32>,

    /// When the OS reported this sample.
    pub timestamp: SystemTime,

    /// Identifier of the OS provider that produced the sample
    /// (`gps`, `network`, ...).
    pub provider: String,

    /// True when the OS asserts the sample came from a mock provider.
    ///
    /// Authoritative when set; spoofing apps sometimes clear it, which is why
    /// the plausibility tracker exists.
    pub synthetic: bool,
}

impl LocationFix {
    /// Create a fix stamped with the current wall-clock time.
    pub fn new(latitude: f64, longitude: f64, provider: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
            timestamp: SystemTime::now(),
            provider: provider.into(),
            synthetic: false,
        }
    }

    /// Attach a reported accuracy radius.
    pub fn with_accuracy(mut self, meters: f32) -> Self {
        self.accuracy = Some(meters);
        self
    }

    /// Override the report timestamp.
    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Mark the fix as OS-flagged synthetic.
    pub fn with_synthetic(mut self, synthetic: bool) -> Self {
        self.synthetic = synthetic;
        self
    }

    /// Age of the sample (zero if the timestamp is in the future).
    pub fn age(&self) -> Duration {
        saturating_age(self.timestamp)
    }

    /// True if the sample is older than `max_age`.
    pub fn is_stale(&self, max_age: Duration) -> bool {
        self.age() > max_age
    }

    /// Exact (0, 0) coordinates, a common artifact of mock apps.
    pub fn is_null_island(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }

    /// Accuracy outside the physically meaningful range.
    pub fn has_implausible_accuracy(&self) -> bool {
        match self.accuracy {
            Some(meters) => meters <= 0.0 || meters > MAX_PLAUSIBLE_ACCURACY_METERS,
            None => false,
        }
    }

    /// Aggregate sanity check used by the environment scan.
    ///
    /// A suspicious fix is not the same as a rejected one: the plausibility
    /// tracker never consults these predicates. They only feed the advisory
    /// spoofing-environment assessment.
    pub fn is_suspicious(&self) -> bool {
        self.is_null_island() || self.has_implausible_accuracy() || self.is_stale(MAX_FIX_AGE)
    }
}

impl fmt::Display for LocationFix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)?;
        if let Some(acc) = self.accuracy {
            write!(f, " ±{acc:.0}m")?;
        }
        write!(f, " via {}", self.provider)?;
        if self.synthetic {
            write!(f, " (synthetic)")?;
        }
        Ok(())
    }
}
