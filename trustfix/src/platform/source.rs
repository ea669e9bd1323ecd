//! OS location source.

use thiserror::Error;

use crate::config::SubscriptionRequest;
use crate::fix::LocationFix;

/// Identifier of the satellite provider.
pub const GPS_PROVIDER: &str = "gps";
/// Identifier of the network-based provider.
pub const NETWORK_PROVIDER: &str = "network";
/// Identifier of the passive provider.
pub const PASSIVE_PROVIDER: &str = "passive";

/// Errors surfaced by the location source.
///
/// Security denials are a distinct variant because they can race a permission
/// revocation between check and use; the session converts them to retrieval
/// errors instead of letting them escape.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The OS denied the call for lack of permission.
    #[error("security denial from the location subsystem: {0}")]
    SecurityDenied(String),
    /// The subsystem rejected or failed the call.
    #[error("location subsystem failure: {0}")]
    Unavailable(String),
}

/// The OS location subsystem: last-known lookup, live subscription, and
/// provider facts.
///
/// After a successful [`subscribe`](LocationSource::subscribe), fixes are
/// pushed by the OS and must be forwarded to
/// [`AcquisitionSession::on_fix`](crate::session::AcquisitionSession::on_fix)
/// by the embedding layer.
pub trait LocationSource: Send + Sync {
    /// Best-effort last known fix, if the OS retains one.
    fn last_known(&self) -> Result<Option<LocationFix>, SourceError>;

    /// Start live delivery for `request`.
    fn subscribe(&self, request: &SubscriptionRequest) -> Result<(), SourceError>;

    /// Stop live delivery. Must be safe to call when not subscribed.
    fn unsubscribe(&self) -> Result<(), SourceError>;

    /// Whether the subsystem currently expects to produce fixes.
    fn is_available(&self) -> Result<bool, SourceError>;

    /// Whether the named provider is enabled in device settings.
    fn provider_enabled(&self, provider: &str) -> bool;

    /// All provider identifiers the subsystem exposes.
    fn providers(&self) -> Vec<String>;

    /// Last known fix retained for one specific provider.
    ///
    /// Used by the spoofing-environment scan; sources that cannot answer
    /// per-provider report nothing.
    fn last_known_from(&self, _provider: &str) -> Result<Option<LocationFix>, SourceError> {
        Ok(None)
    }

    /// Capability probe: try to register (and immediately remove) a test
    /// provider under `name`. Returns true when the OS accepted it, which
    /// means mock locations are injectable on this device.
    ///
    /// Default: probe unavailable, no signal.
    fn probe_test_provider(&self, _name: &str) -> bool {
        false
    }
}
