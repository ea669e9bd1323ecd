//! Simulated collaborators for the `simulate` command.
//!
//! These stand in for the OS: permission state, settings verdicts, and the
//! location subsystem are all scripted from the command line, while the state
//! machine and trust engine under them are the real thing.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use trustfix::config::SubscriptionRequest;
use trustfix::fix::LocationFix;
use trustfix::platform::{
    BuildProfile, DeviceInspector, LocationSource, PermissionGateway, SettingsResolver,
    SettingsVerdict, SourceError,
};

/// Permission state toggled by the driver as the scripted user answers.
#[derive(Default)]
pub struct SimPermissions {
    granted: AtomicBool,
}

impl SimPermissions {
    /// Record the scripted user's grant.
    pub fn grant(&self) {
        self.granted.store(true, Ordering::SeqCst);
    }
}

impl PermissionGateway for SimPermissions {
    fn is_granted(&self) -> bool {
        self.granted.load(Ordering::SeqCst)
    }
    fn request(&self) {
        tracing::debug!("simulated permission dialog shown");
    }
    fn should_explain(&self) -> bool {
        false
    }
}

/// Settings resolver with a fixed scripted verdict.
pub struct SimSettings {
    verdict: Mutex<SettingsVerdict>,
}

impl SimSettings {
    pub fn new(verdict: SettingsVerdict) -> Self {
        Self {
            verdict: Mutex::new(verdict),
        }
    }

    /// After an accepted interactive resolution the device settings are fine.
    pub fn resolve(&self) {
        *self.verdict.lock().unwrap() = SettingsVerdict::Satisfied;
    }
}

impl SettingsResolver for SimSettings {
    fn check(&self, _request: &SubscriptionRequest) -> SettingsVerdict {
        *self.verdict.lock().unwrap()
    }
    fn begin_resolution(&self) {
        tracing::debug!("simulated settings prompt shown");
    }
}

/// Location subsystem that records the subscription and nothing else; the
/// driver pushes fixes directly into the session.
#[derive(Default)]
pub struct SimSource {
    subscribed: AtomicBool,
}

impl SimSource {
    pub fn is_subscribed(&self) -> bool {
        self.subscribed.load(Ordering::SeqCst)
    }
}

impl LocationSource for SimSource {
    fn last_known(&self) -> Result<Option<LocationFix>, SourceError> {
        Ok(None)
    }
    fn subscribe(&self, request: &SubscriptionRequest) -> Result<(), SourceError> {
        tracing::debug!(accuracy = %request.accuracy, "simulated subscription");
        self.subscribed.store(true, Ordering::SeqCst);
        Ok(())
    }
    fn unsubscribe(&self) -> Result<(), SourceError> {
        self.subscribed.store(false, Ordering::SeqCst);
        Ok(())
    }
    fn is_available(&self) -> Result<bool, SourceError> {
        Ok(true)
    }
    fn provider_enabled(&self, _provider: &str) -> bool {
        true
    }
    fn providers(&self) -> Vec<String> {
        vec!["gps".into(), "network".into(), "passive".into()]
    }
}

/// An unremarkable handset.
pub struct SimDevice;

impl DeviceInspector for SimDevice {
    fn build_profile(&self) -> BuildProfile {
        BuildProfile {
            model: "Pixel 8".into(),
            manufacturer: "Google".into(),
            brand: "google".into(),
            fingerprint: "google/shiba/shiba:14/release-keys".into(),
            product: "shiba".into(),
            device: "shiba".into(),
            hardware: "zuma".into(),
        }
    }
    fn mock_setting_enabled(&self) -> Option<bool> {
        None
    }
    fn mock_capable_apps(&self) -> Vec<String> {
        Vec::new()
    }
    fn os_version(&self) -> String {
        "simulated".into()
    }
}
