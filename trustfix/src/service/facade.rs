//! Service facade implementation.

use std::sync::Arc;

use tokio::sync::broadcast;

use super::error::ServiceError;
use crate::config::{AcquisitionConfig, ConfigError};
use crate::fingerprint::{assess_environment, SpoofSignal};
use crate::fix::LocationFix;
use crate::platform::{
    DeviceInspector, LocationSource, PermissionGateway, SettingsResolver, GPS_PROVIDER,
    NETWORK_PROVIDER, PASSIVE_PROVIDER,
};
use crate::session::{AcquisitionSession, SessionEvent};

/// High-level entry point for one acquisition client.
///
/// Owns the session and the collaborator handles, and answers the point
/// queries of the bridge surface. All session triggers pass through here
/// unchanged.
///
/// # Example
///
/// ```ignore
/// use trustfix::config::AcquisitionConfig;
/// use trustfix::service::TrustFixService;
///
/// let service = TrustFixService::new(
///     AcquisitionConfig::default(),
///     permissions,
///     settings,
///     source,
///     inspector,
/// )?;
///
/// let mut events = service.events();
/// service.start();
/// while let Ok(event) = events.recv().await {
///     // react: show dialogs, feed results back via the on_* triggers
/// }
/// ```
pub struct TrustFixService {
    session: Arc<AcquisitionSession>,
    source: Arc<dyn LocationSource>,
    permissions: Arc<dyn PermissionGateway>,
    inspector: Arc<dyn DeviceInspector>,
}

impl TrustFixService {
    /// Wire the collaborators into a fresh session.
    ///
    /// # Errors
    ///
    /// [`ServiceError::Config`] when the configuration is invalid (zero
    /// update interval).
    pub fn new(
        config: AcquisitionConfig,
        permissions: Arc<dyn PermissionGateway>,
        settings: Arc<dyn SettingsResolver>,
        source: Arc<dyn LocationSource>,
        inspector: Arc<dyn DeviceInspector>,
    ) -> Result<Self, ServiceError> {
        if config.interval.is_zero() {
            return Err(ConfigError::NonPositiveInterval.into());
        }
        let session = Arc::new(AcquisitionSession::new(
            config,
            permissions.clone(),
            settings,
            source.clone(),
        ));
        Ok(Self {
            session,
            source,
            permissions,
            inspector,
        })
    }

    /// The underlying session, for embedders that need trigger access from
    /// multiple places.
    pub fn session(&self) -> Arc<AcquisitionSession> {
        self.session.clone()
    }

    /// Subscribe to the session event stream.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.session.events()
    }

    /// Start (or re-enter) acquisition.
    pub fn start(&self) {
        self.session.start();
    }

    /// Stop live delivery; idempotent.
    pub fn stop(&self) {
        self.session.stop();
    }

    /// Best trusted fix so far.
    pub fn best_fix(&self) -> Option<LocationFix> {
        self.session.best_fix()
    }

    /// Fire the system permission dialog.
    pub fn request_permission(&self) {
        self.session.request_permission();
    }

    /// Fire the dialog, or ask the embedder to explain first.
    pub fn request_permission_with_rationale(&self) {
        self.session.request_permission_with_rationale();
    }

    /// Launch the interactive settings-resolution prompt.
    pub fn begin_settings_resolution(&self) {
        self.session.begin_settings_resolution();
    }

    /// Bridge trigger: permission dialog outcome.
    pub fn on_permission_result(&self, granted: bool) {
        self.session.on_permission_result(granted);
    }

    /// Bridge trigger: settings resolution outcome.
    pub fn on_settings_resolution(&self, accepted: bool) {
        self.session.on_settings_resolution(accepted);
    }

    /// Bridge trigger: a fix pushed by the OS.
    pub fn on_fix(&self, fix: LocationFix) {
        self.session.on_fix(fix);
    }

    /// Assess whether this device looks set up for location spoofing.
    ///
    /// Runs the stateless fingerprint probes, then scans each standard
    /// provider's retained fix for OS-flagged or suspicious samples. Scan
    /// failures degrade to "no signal" - on error this reports the
    /// environment as clean rather than guessing. Advisory only; see the
    /// [`fingerprint`](crate::fingerprint) module docs.
    pub fn mock_environment(&self) -> Option<SpoofSignal> {
        if let Some(signal) = assess_environment(self.inspector.as_ref(), self.source.as_ref()) {
            return Some(signal);
        }

        for provider in [GPS_PROVIDER, NETWORK_PROVIDER, PASSIVE_PROVIDER] {
            match self.source.last_known_from(provider) {
                Ok(Some(fix)) if fix.synthetic => {
                    return Some(SpoofSignal::MockFlaggedFix(provider.to_string()));
                }
                Ok(Some(fix)) if fix.is_suspicious() => {
                    return Some(SpoofSignal::SuspiciousFix(provider.to_string()));
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::debug!(provider, error = %err, "last-known scan degraded");
                }
            }
        }
        None
    }

    /// Whether any of the gps/network providers is enabled.
    pub fn location_services_enabled(&self) -> bool {
        self.source.provider_enabled(GPS_PROVIDER)
            || self.source.provider_enabled(NETWORK_PROVIDER)
    }

    /// Whether the location permission is currently granted.
    pub fn has_permission(&self) -> bool {
        self.permissions.is_granted()
    }

    /// OS version string for the bridge surface.
    pub fn os_version(&self) -> String {
        self.inspector.os_version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use crate::config::SubscriptionRequest;
    use crate::platform::{BuildProfile, SettingsVerdict, SourceError};

    #[derive(Default)]
    struct StubPermissions {
        granted: AtomicBool,
    }

    impl PermissionGateway for StubPermissions {
        fn is_granted(&self) -> bool {
            self.granted.load(Ordering::SeqCst)
        }
        fn request(&self) {}
        fn should_explain(&self) -> bool {
            false
        }
    }

    struct StubSettings;

    impl SettingsResolver for StubSettings {
        fn check(&self, _request: &SubscriptionRequest) -> SettingsVerdict {
            SettingsVerdict::Satisfied
        }
        fn begin_resolution(&self) {}
    }

    #[derive(Default)]
    struct StubSource {
        gps_enabled: AtomicBool,
        network_enabled: AtomicBool,
        retained: Mutex<Option<(String, LocationFix)>>,
        scan_fails: AtomicBool,
    }

    impl LocationSource for StubSource {
        fn last_known(&self) -> Result<Option<LocationFix>, SourceError> {
            Ok(None)
        }
        fn subscribe(&self, _request: &SubscriptionRequest) -> Result<(), SourceError> {
            Ok(())
        }
        fn unsubscribe(&self) -> Result<(), SourceError> {
            Ok(())
        }
        fn is_available(&self) -> Result<bool, SourceError> {
            Ok(true)
        }
        fn provider_enabled(&self, provider: &str) -> bool {
            match provider {
                GPS_PROVIDER => self.gps_enabled.load(Ordering::SeqCst),
                NETWORK_PROVIDER => self.network_enabled.load(Ordering::SeqCst),
                _ => false,
            }
        }
        fn providers(&self) -> Vec<String> {
            vec!["gps".into(), "network".into(), "passive".into()]
        }
        fn last_known_from(&self, provider: &str) -> Result<Option<LocationFix>, SourceError> {
            if self.scan_fails.load(Ordering::SeqCst) {
                return Err(SourceError::SecurityDenied("permission revoked".into()));
            }
            let retained = self.retained.lock().unwrap();
            Ok(retained
                .as_ref()
                .filter(|(p, _)| p == provider)
                .map(|(_, fix)| fix.clone()))
        }
    }

    struct StubInspector;

    impl DeviceInspector for StubInspector {
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
            "14".into()
        }
    }

    fn service() -> (TrustFixService, Arc<StubPermissions>, Arc<StubSource>) {
        let permissions = Arc::new(StubPermissions::default());
        let source = Arc::new(StubSource::default());
        let svc = TrustFixService::new(
            AcquisitionConfig::default(),
            permissions.clone(),
            Arc::new(StubSettings),
            source.clone(),
            Arc::new(StubInspector),
        )
        .expect("valid default config");
        (svc, permissions, source)
    }

    #[test]
    fn zero_interval_config_is_rejected() {
        let config = AcquisitionConfig {
            interval: Duration::ZERO,
            ..Default::default()
        };
        let result = TrustFixService::new(
            config,
            Arc::new(StubPermissions::default()),
            Arc::new(StubSettings),
            Arc::new(StubSource::default()),
            Arc::new(StubInspector),
        );
        assert!(matches!(result, Err(ServiceError::Config(_))));
    }

    #[test]
    fn clean_environment_reports_no_signal() {
        let (svc, _, _) = service();
        assert_eq!(svc.mock_environment(), None);
    }

    #[test]
    fn retained_mock_flagged_fix_detected() {
        let (svc, _, source) = service();
        *source.retained.lock().unwrap() = Some((
            "network".to_string(),
            LocationFix::new(53.5, 10.0, "network").with_synthetic(true),
        ));
        assert_eq!(
            svc.mock_environment(),
            Some(SpoofSignal::MockFlaggedFix("network".to_string()))
        );
    }

    #[test]
    fn retained_suspicious_fix_detected() {
        let (svc, _, source) = service();
        *source.retained.lock().unwrap() = Some((
            "gps".to_string(),
            LocationFix::new(0.0, 0.0, "gps"), // null island
        ));
        assert_eq!(
            svc.mock_environment(),
            Some(SpoofSignal::SuspiciousFix("gps".to_string()))
        );
    }

    #[test]
    fn scan_failure_degrades_to_no_signal() {
        let (svc, _, source) = service();
        *source.retained.lock().unwrap() = Some((
            "gps".to_string(),
            LocationFix::new(53.5, 10.0, "gps").with_synthetic(true),
        ));
        source.scan_fails.store(true, Ordering::SeqCst);
        // Fail-safe: errors never turn into a spoofing verdict.
        assert_eq!(svc.mock_environment(), None);
    }

    #[test]
    fn location_services_enabled_checks_both_providers() {
        let (svc, _, source) = service();
        assert!(!svc.location_services_enabled());

        source.network_enabled.store(true, Ordering::SeqCst);
        assert!(svc.location_services_enabled());

        source.network_enabled.store(false, Ordering::SeqCst);
        source.gps_enabled.store(true, Ordering::SeqCst);
        assert!(svc.location_services_enabled());
    }

    #[test]
    fn permission_and_version_queries_delegate() {
        let (svc, permissions, _) = service();
        assert!(!svc.has_permission());
        permissions.granted.store(true, Ordering::SeqCst);
        assert!(svc.has_permission());
        assert_eq!(svc.os_version(), "14");
    }

    #[test]
    fn fix_flows_through_to_best() {
        let (svc, _, _) = service();
        let mut rx = svc.events();
        svc.on_fix(LocationFix::new(53.5, 10.0, "gps"));

        assert!(matches!(rx.try_recv(), Ok(SessionEvent::NewLocation(_))));
        assert_eq!(svc.best_fix().unwrap().latitude, 53.5);
    }
}
