//! Acquisition session configuration.
//!
//! An [`AcquisitionConfig`] is fixed for the lifetime of one session: the
//! desired accuracy tier, the update interval, and the two synthetic-fix
//! policies. The process-wide "mock locations enabled" toggle of older
//! platforms is deliberately not read from ambient state; callers that want
//! that behavior set [`AcquisitionConfig::force_synthetic`] explicitly.

use std::time::Duration;

use thiserror::Error;

/// Desired location accuracy tier.
///
/// Maps onto the OS provider's request priority: `High` is typically within
/// 30 m, `Balanced` within a city block, `Low` city-level, and `Passive`
/// piggybacks on updates requested by other apps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccuracyTier {
    /// Highest possible accuracy.
    High,
    /// Medium accuracy at reduced power.
    #[default]
    Balanced,
    /// City-level accuracy.
    Low,
    /// No active requests; rides along on other apps' updates.
    Passive,
}

impl std::fmt::Display for AccuracyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Balanced => write!(f, "balanced"),
            Self::Low => write!(f, "low"),
            Self::Passive => write!(f, "passive"),
        }
    }
}

/// Configuration errors caught at session construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The update interval must be strictly positive.
    #[error("update interval must be positive")]
    NonPositiveInterval,
}

/// Immutable configuration for one acquisition session.
#[derive(Debug, Clone)]
pub struct AcquisitionConfig {
    /// Desired accuracy tier for the subscription.
    pub accuracy: AccuracyTier,

    /// Interval between live updates. Strictly positive.
    pub interval: Duration,

    /// Whether fixes the trust engine classifies as synthetic still become
    /// the best location (they are always reported distinctly).
    pub accept_synthetic: bool,

    /// Treat every incoming fix as synthetic, regardless of OS flags.
    ///
    /// Explicit stand-in for the process-wide mock-locations toggle some
    /// platforms expose; the session never reads ambient state.
    pub force_synthetic: bool,
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            accuracy: AccuracyTier::Balanced,
            interval: Duration::from_secs(5),
            accept_synthetic: false,
            force_synthetic: false,
        }
    }
}

impl AcquisitionConfig {
    /// Create a validated configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NonPositiveInterval`] if `interval` is zero.
    pub fn new(
        accuracy: AccuracyTier,
        interval: Duration,
        accept_synthetic: bool,
    ) -> Result<Self, ConfigError> {
        if interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval);
        }
        Ok(Self {
            accuracy,
            interval,
            accept_synthetic,
            force_synthetic: false,
        })
    }

    /// Enable the treat-everything-as-synthetic override.
    pub fn with_force_synthetic(mut self, force: bool) -> Self {
        self.force_synthetic = force;
        self
    }

    /// Derive the request handed to the settings resolver and the location
    /// source. The fastest interval is half the nominal one, so the source may
    /// deliver early when updates are already flowing for other consumers.
    pub fn subscription_request(&self) -> SubscriptionRequest {
        SubscriptionRequest {
            accuracy: self.accuracy,
            interval: self.interval,
            fastest_interval: self.interval / 2,
        }
    }
}

/// Concrete update request derived from an [`AcquisitionConfig`].
///
/// Validated against device settings by the
/// [`SettingsResolver`](crate::platform::SettingsResolver) and used by the
/// [`LocationSource`](crate::platform::LocationSource) when subscribing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRequest {
    /// Requested accuracy tier.
    pub accuracy: AccuracyTier,
    /// Nominal update interval.
    pub interval: Duration,
    /// Fastest delivery interval the session will accept.
    pub fastest_interval: Duration,
}
