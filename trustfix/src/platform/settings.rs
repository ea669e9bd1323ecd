//! Device settings resolution.

use crate::config::SubscriptionRequest;

/// Outcome of validating an update request against current device settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsVerdict {
    /// Settings satisfy the request; updates can flow.
    Satisfied,
    /// Settings are insufficient but the OS can fix them through an
    /// interactive prompt ([`SettingsResolver::begin_resolution`]).
    Resolvable,
    /// Settings are insufficient and only manual reconfiguration can help.
    Unsatisfiable,
}

/// Validates requested accuracy/interval against the device's location
/// settings and drives the interactive resolution flow.
///
/// `begin_resolution()` launches the OS prompt and returns immediately; the
/// user's answer arrives later via
/// [`AcquisitionSession::on_settings_resolution`](crate::session::AcquisitionSession::on_settings_resolution).
pub trait SettingsResolver: Send + Sync {
    /// Check whether current settings can serve `request`.
    fn check(&self, request: &SubscriptionRequest) -> SettingsVerdict;

    /// Launch the interactive settings-resolution prompt.
    fn begin_resolution(&self);
}
