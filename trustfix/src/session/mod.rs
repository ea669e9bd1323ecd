//! Location acquisition session.
//!
//! [`AcquisitionSession`] drives one device through permission grant,
//! settings negotiation, subscription, and continuous delivery, screening
//! every delivered fix through the plausibility tracker.
//!
//! # Re-entrant pipeline
//!
//! Every public trigger (`start`, the permission/settings results, incoming
//! fixes) re-runs one internal `advance` procedure that inspects the
//! [`AcquisitionState`] flags top to bottom and performs exactly the first
//! missing step. Interactive steps park the machine on an emitted event; the
//! embedder re-enters through the matching trigger when the user has
//! answered. Steps whose collaborator answers synchronously (the settings
//! check) recurse immediately, because a flag has changed and the recursion
//! terminates.
//!
//! # Concurrency
//!
//! One session, one logical thread of control: the mutable records sit behind
//! a single mutex, so triggers may arrive from any thread but are serialized.
//! Collaborator methods are called with that lock held - implementations must
//! deliver their outcomes from the embedding event loop, never by calling
//! session triggers synchronously from inside a collaborator method.
//!
//! # Events
//!
//! Session output is a [`SessionEvent`] broadcast channel
//! ([`AcquisitionSession::events`]). Lagging subscribers lose the oldest
//! events, like any tokio broadcast consumer.

mod event;
mod state;

pub use event::{ErrorKind, SessionEvent};
pub use state::AcquisitionState;

use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::config::AcquisitionConfig;
use crate::fix::LocationFix;
use crate::platform::{
    LocationSource, PermissionGateway, SettingsResolver, SettingsVerdict, GPS_PROVIDER,
    NETWORK_PROVIDER,
};
use crate::plausibility::{PlausibilityTracker, Verdict};

/// Denials after which the machine parks until an explicit re-request.
const MAX_PERMISSION_DECLINES: u32 = 2;

/// Capacity of the session event channel.
const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Mutable records owned by the session, guarded together.
struct Inner {
    state: AcquisitionState,
    tracker: PlausibilityTracker,
}

/// One location acquisition session.
///
/// Owns its [`AcquisitionState`] and
/// [`PlausibilityTracker`](crate::plausibility::PlausibilityTracker)
/// exclusively; nothing is shared across sessions. The best location handed
/// out by [`best_fix`](Self::best_fix) is a value copy.
pub struct AcquisitionSession {
    config: AcquisitionConfig,
    permissions: Arc<dyn PermissionGateway>,
    settings: Arc<dyn SettingsResolver>,
    source: Arc<dyn LocationSource>,
    events: broadcast::Sender<SessionEvent>,
    inner: Mutex<Inner>,
}

impl AcquisitionSession {
    /// Create a session over the given collaborators.
    pub fn new(
        config: AcquisitionConfig,
        permissions: Arc<dyn PermissionGateway>,
        settings: Arc<dyn SettingsResolver>,
        source: Arc<dyn LocationSource>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            config,
            permissions,
            settings,
            source,
            events,
            inner: Mutex::new(Inner {
                state: AcquisitionState::new(),
                tracker: PlausibilityTracker::new(),
            }),
        }
    }

    /// Subscribe to the session event stream.
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// The session configuration.
    pub fn config(&self) -> &AcquisitionConfig {
        &self.config
    }

    /// Start (or re-enter) the acquisition pipeline.
    ///
    /// Safe to call at any stage; the pipeline resumes at the first missing
    /// step.
    pub fn start(&self) {
        let mut inner = self.lock();
        tracing::info!(
            accuracy = %self.config.accuracy,
            interval_ms = self.config.interval.as_millis() as u64,
            "starting acquisition"
        );
        self.advance(&mut inner);
    }

    /// Stop live delivery and reset the pipeline flags.
    ///
    /// Idempotent and safe if never subscribed. The best location and the
    /// permission decline count survive.
    pub fn stop(&self) {
        let mut inner = self.lock();
        if let Err(err) = self.source.unsubscribe() {
            // Reported but never blocks the local teardown.
            tracing::warn!(error = %err, "unsubscribe failed during stop");
        }
        inner.state.clear_pipeline();
        tracing::info!("acquisition stopped");
    }

    /// Best trusted fix seen so far, if any.
    pub fn best_fix(&self) -> Option<LocationFix> {
        self.lock().state.best_location.clone()
    }

    /// Consecutive permission denials so far.
    pub fn permission_declines(&self) -> u32 {
        self.lock().state.permission_decline_count
    }

    /// Fire the system permission dialog. No-op when already granted.
    ///
    /// The outcome must be fed back through
    /// [`on_permission_result`](Self::on_permission_result).
    pub fn request_permission(&self) {
        let granted = self.lock().state.permission_granted;
        if granted {
            return;
        }
        self.permissions.request();
    }

    /// Like [`request_permission`](Self::request_permission), but emits
    /// [`SessionEvent::ExplainPermission`] first when the OS reports the user
    /// declined before and deserves an explanation.
    pub fn request_permission_with_rationale(&self) {
        let granted = self.lock().state.permission_granted;
        if granted {
            return;
        }
        if self.permissions.should_explain() {
            self.emit(SessionEvent::ExplainPermission);
        } else {
            self.permissions.request();
        }
    }

    /// Launch the interactive settings-resolution prompt.
    ///
    /// The outcome must be fed back through
    /// [`on_settings_resolution`](Self::on_settings_resolution).
    pub fn begin_settings_resolution(&self) {
        self.settings.begin_resolution();
    }

    /// Deliver the outcome of a permission request.
    pub fn on_permission_result(&self, granted: bool) {
        let mut inner = self.lock();
        if granted {
            inner.state.permission_granted = true;
            inner.state.permission_decline_count = 0;
            self.advance(&mut inner);
            return;
        }
        inner.state.permission_decline_count += 1;
        tracing::info!(
            declines = inner.state.permission_decline_count,
            "location permission request denied"
        );
        if inner.state.permission_decline_count >= MAX_PERMISSION_DECLINES {
            self.emit(SessionEvent::PermanentlyDeclined);
        }
    }

    /// Deliver the outcome of the interactive settings resolution.
    pub fn on_settings_resolution(&self, accepted: bool) {
        let mut inner = self.lock();
        if accepted {
            inner.state.location_status_ok = true;
            inner.state.needs_settings_change = false;
            self.advance(&mut inner);
        } else {
            self.report_error(
                ErrorKind::Settings,
                "location settings were not changed".to_string(),
            );
        }
    }

    /// Deliver one fix pushed by the location source.
    ///
    /// Evaluated regardless of the pipeline stage: genuine data arriving
    /// mid-negotiation is never discarded.
    pub fn on_fix(&self, fix: LocationFix) {
        let mut inner = self.lock();
        self.process_fix(&mut inner, fix);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned mutex means a panic mid-trigger; the records are still
        // structurally sound, so continue with them.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Perform the first missing pipeline step. See the module docs for the
    /// ordering contract.
    fn advance(&self, inner: &mut Inner) {
        debug_assert!(inner.state.invariant_holds());

        // 1. Permission.
        if !inner.state.permission_granted {
            if self.permissions.is_granted() {
                inner.state.permission_granted = true;
            } else {
                if inner.state.permission_decline_count >= MAX_PERMISSION_DECLINES {
                    // Parked; only an explicit re-request can continue.
                    tracing::debug!("permission declined twice; not re-asking");
                    return;
                }
                self.emit(SessionEvent::NeedPermission);
                return;
            }
        }

        // 2. One-shot settings check. `location_requested` gates re-entry, so
        //    a pending or completed check is never re-issued.
        if !inner.state.location_requested {
            self.run_settings_check(inner);
            self.advance(inner);
            return;
        }

        // 3. Settings known bad.
        if !inner.state.location_status_ok {
            if inner.state.needs_settings_change {
                self.emit(SessionEvent::NeedSettingsChange);
            } else {
                self.check_providers();
            }
            return;
        }

        // 4. Subscribe. A failure leaves the flag unset; the next trigger
        //    retries.
        if !inner.state.updates_subscribed {
            let request = self.config.subscription_request();
            match self.source.subscribe(&request) {
                Ok(()) => {
                    inner.state.updates_subscribed = true;
                    tracing::info!(accuracy = %request.accuracy, "subscribed to live updates");
                }
                Err(err) => {
                    self.report_error(
                        ErrorKind::Retrieval,
                        format!("could not subscribe to location updates: {err}"),
                    );
                }
            }
            return;
        }

        // 5. Delivering; verify the source still expects to produce fixes.
        match self.source.is_available() {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!("location updates reported unavailable");
                self.check_providers();
            }
            Err(err) => {
                self.report_error(
                    ErrorKind::Retrieval,
                    format!("availability query failed: {err}"),
                );
            }
        }
    }

    /// Step 2: validate settings, record the outcome flags, and on success
    /// pull the last known fix once (best effort).
    fn run_settings_check(&self, inner: &mut Inner) {
        let request = self.config.subscription_request();
        match self.settings.check(&request) {
            SettingsVerdict::Satisfied => {
                inner.state.location_requested = true;
                inner.state.location_status_ok = true;
                self.fetch_initial_fix(inner);
            }
            SettingsVerdict::Resolvable => {
                inner.state.location_requested = true;
                inner.state.needs_settings_change = true;
            }
            SettingsVerdict::Unsatisfiable => {
                // Terminal for this session unless the embedder resolves
                // settings out of band and calls on_settings_resolution.
                inner.state.location_requested = true;
            }
        }
    }

    /// Best-effort initial fix; errors are reported but never fatal.
    fn fetch_initial_fix(&self, inner: &mut Inner) {
        match self.source.last_known() {
            Ok(Some(fix)) => self.process_fix(inner, fix),
            Ok(None) => {}
            Err(err) => {
                self.report_error(
                    ErrorKind::Retrieval,
                    format!("could not retrieve initial location: {err}"),
                );
            }
        }
    }

    /// When no provider is enabled at the OS level, only the system settings
    /// screen can help.
    fn check_providers(&self) {
        let gps = self.source.provider_enabled(GPS_PROVIDER);
        let network = self.source.provider_enabled(NETWORK_PROVIDER);
        if !gps && !network {
            self.emit(SessionEvent::FallbackToSystemSettings);
        }
    }

    /// Screen one fix through the tracker and publish the outcome.
    fn process_fix(&self, inner: &mut Inner, fix: LocationFix) {
        let verdict = inner
            .tracker
            .evaluate(&fix, self.config.force_synthetic);
        tracing::debug!(fix = %fix, verdict = ?verdict, "fix evaluated");

        if verdict == Verdict::Rejected && !self.config.accept_synthetic {
            self.emit(SessionEvent::MockDetected);
            return;
        }

        inner.state.best_location = Some(fix.clone());
        self.emit(SessionEvent::NewLocation(fix));
    }

    fn emit(&self, event: SessionEvent) {
        tracing::debug!(event = event.name(), "session event");
        // No subscribers is fine; the embedder may poll best_fix instead.
        let _ = self.events.send(event);
    }

    fn report_error(&self, kind: ErrorKind, message: String) {
        tracing::warn!(kind = %kind, message = %message, "session error");
        self.emit(SessionEvent::Error { kind, message });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use crate::config::SubscriptionRequest;
    use crate::platform::SourceError;

    #[derive(Default)]
    struct FakePermissions {
        granted: AtomicBool,
        explain: AtomicBool,
        requests: AtomicUsize,
    }

    impl PermissionGateway for FakePermissions {
        fn is_granted(&self) -> bool {
            self.granted.load(Ordering::SeqCst)
        }
        fn request(&self) {
            self.requests.fetch_add(1, Ordering::SeqCst);
        }
        fn should_explain(&self) -> bool {
            self.explain.load(Ordering::SeqCst)
        }
    }

    struct FakeSettings {
        verdict: Mutex<SettingsVerdict>,
        checks: AtomicUsize,
        resolutions: AtomicUsize,
    }

    impl FakeSettings {
        fn new(verdict: SettingsVerdict) -> Self {
            Self {
                verdict: Mutex::new(verdict),
                checks: AtomicUsize::new(0),
                resolutions: AtomicUsize::new(0),
            }
        }
    }

    impl SettingsResolver for FakeSettings {
        fn check(&self, _request: &SubscriptionRequest) -> SettingsVerdict {
            self.checks.fetch_add(1, Ordering::SeqCst);
            *self.verdict.lock().unwrap()
        }
        fn begin_resolution(&self) {
            self.resolutions.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakeSource {
        subscribe_ok: AtomicBool,
        available: AtomicBool,
        providers_enabled: AtomicBool,
        last_known: Mutex<Option<LocationFix>>,
        subscribes: AtomicUsize,
        unsubscribes: AtomicUsize,
        availability_checks: AtomicUsize,
    }

    impl Default for FakeSource {
        fn default() -> Self {
            Self {
                subscribe_ok: AtomicBool::new(true),
                available: AtomicBool::new(true),
                providers_enabled: AtomicBool::new(true),
                last_known: Mutex::new(None),
                subscribes: AtomicUsize::new(0),
                unsubscribes: AtomicUsize::new(0),
                availability_checks: AtomicUsize::new(0),
            }
        }
    }

    impl LocationSource for FakeSource {
        fn last_known(&self) -> Result<Option<LocationFix>, SourceError> {
            Ok(self.last_known.lock().unwrap().clone())
        }
        fn subscribe(&self, _request: &SubscriptionRequest) -> Result<(), SourceError> {
            self.subscribes.fetch_add(1, Ordering::SeqCst);
            if self.subscribe_ok.load(Ordering::SeqCst) {
                Ok(())
            } else {
                Err(SourceError::Unavailable("subscription refused".into()))
            }
        }
        fn unsubscribe(&self) -> Result<(), SourceError> {
            self.unsubscribes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
        fn is_available(&self) -> Result<bool, SourceError> {
            self.availability_checks.fetch_add(1, Ordering::SeqCst);
            Ok(self.available.load(Ordering::SeqCst))
        }
        fn provider_enabled(&self, _provider: &str) -> bool {
            self.providers_enabled.load(Ordering::SeqCst)
        }
        fn providers(&self) -> Vec<String> {
            vec!["gps".into(), "network".into()]
        }
    }

    struct Harness {
        session: AcquisitionSession,
        permissions: Arc<FakePermissions>,
        settings: Arc<FakeSettings>,
        source: Arc<FakeSource>,
        rx: broadcast::Receiver<SessionEvent>,
    }

    fn harness_with(config: AcquisitionConfig, verdict: SettingsVerdict) -> Harness {
        let permissions = Arc::new(FakePermissions::default());
        let settings = Arc::new(FakeSettings::new(verdict));
        let source = Arc::new(FakeSource::default());
        let session = AcquisitionSession::new(
            config,
            permissions.clone(),
            settings.clone(),
            source.clone(),
        );
        let rx = session.events();
        Harness {
            session,
            permissions,
            settings,
            source,
            rx,
        }
    }

    fn harness() -> Harness {
        harness_with(AcquisitionConfig::default(), SettingsVerdict::Satisfied)
    }

    fn drain(rx: &mut broadcast::Receiver<SessionEvent>) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn genuine(lat: f64, lon: f64) -> LocationFix {
        LocationFix::new(lat, lon, "gps")
    }

    #[test]
    fn start_without_permission_asks_for_it() {
        let mut h = harness();
        h.session.start();

        assert_eq!(drain(&mut h.rx), vec![SessionEvent::NeedPermission]);
        // The settings check never ran; permission gates it.
        assert_eq!(h.settings.checks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn granted_permission_chains_to_subscription() {
        let mut h = harness();
        h.permissions.granted.store(true, Ordering::SeqCst);
        h.session.start();

        assert_eq!(h.settings.checks.load(Ordering::SeqCst), 1);
        assert_eq!(h.source.subscribes.load(Ordering::SeqCst), 1);
        assert!(drain(&mut h.rx).is_empty());
    }

    #[test]
    fn settings_check_not_reissued_on_reentry() {
        let h = harness();
        h.permissions.granted.store(true, Ordering::SeqCst);
        h.session.start();
        h.session.start();

        // location_requested gates the settings check; the second start goes
        // straight to the availability query.
        assert_eq!(h.settings.checks.load(Ordering::SeqCst), 1);
        assert_eq!(h.source.subscribes.load(Ordering::SeqCst), 1);
        assert_eq!(h.source.availability_checks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn initial_fix_fetched_once_on_satisfied_settings() {
        let mut h = harness();
        h.permissions.granted.store(true, Ordering::SeqCst);
        *h.source.last_known.lock().unwrap() = Some(genuine(53.5, 10.0));
        h.session.start();

        let events = drain(&mut h.rx);
        assert!(matches!(events.as_slice(), [SessionEvent::NewLocation(_)]));
        assert_eq!(h.session.best_fix().unwrap().latitude, 53.5);
    }

    #[test]
    fn first_denial_is_reaskable() {
        let mut h = harness();
        h.session.start();
        drain(&mut h.rx);

        h.session.on_permission_result(false);
        assert!(drain(&mut h.rx).is_empty());

        // Re-entering still asks.
        h.session.start();
        assert_eq!(drain(&mut h.rx), vec![SessionEvent::NeedPermission]);
    }

    #[test]
    fn second_denial_is_permanent() {
        let mut h = harness();
        h.session.start();
        h.session.on_permission_result(false);
        h.session.on_permission_result(false);

        let events = drain(&mut h.rx);
        assert_eq!(
            events,
            vec![SessionEvent::NeedPermission, SessionEvent::PermanentlyDeclined]
        );

        // Parked: no further ask on re-entry.
        h.session.start();
        assert!(drain(&mut h.rx).is_empty());
        assert_eq!(h.session.permission_declines(), 2);
    }

    #[test]
    fn grant_resets_decline_count() {
        let h = harness();
        h.session.on_permission_result(false);
        h.session.on_permission_result(true);
        assert_eq!(h.session.permission_declines(), 0);
    }

    #[test]
    fn request_permission_fires_dialog_until_granted() {
        let h = harness();
        h.session.request_permission();
        assert_eq!(h.permissions.requests.load(Ordering::SeqCst), 1);

        h.session.on_permission_result(true);
        h.session.request_permission();
        // Already granted: no new dialog.
        assert_eq!(h.permissions.requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn rationale_request_emits_explanation_when_advised() {
        let mut h = harness();
        h.permissions.explain.store(true, Ordering::SeqCst);
        h.session.request_permission_with_rationale();

        assert_eq!(drain(&mut h.rx), vec![SessionEvent::ExplainPermission]);
        assert_eq!(h.permissions.requests.load(Ordering::SeqCst), 0);

        h.permissions.explain.store(false, Ordering::SeqCst);
        h.session.request_permission_with_rationale();
        assert_eq!(h.permissions.requests.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn resolvable_settings_ask_for_change_once_per_entry() {
        let mut h = harness_with(AcquisitionConfig::default(), SettingsVerdict::Resolvable);
        h.permissions.granted.store(true, Ordering::SeqCst);
        h.session.start();

        assert_eq!(drain(&mut h.rx), vec![SessionEvent::NeedSettingsChange]);
        assert_eq!(h.source.subscribes.load(Ordering::SeqCst), 0);

        // Unresolved on re-entry: asked again, settings check not re-issued.
        h.session.start();
        assert_eq!(drain(&mut h.rx), vec![SessionEvent::NeedSettingsChange]);
        assert_eq!(h.settings.checks.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn accepted_resolution_resumes_the_pipeline() {
        let mut h = harness_with(AcquisitionConfig::default(), SettingsVerdict::Resolvable);
        h.permissions.granted.store(true, Ordering::SeqCst);
        h.session.start();
        drain(&mut h.rx);

        h.session.on_settings_resolution(true);
        assert_eq!(h.source.subscribes.load(Ordering::SeqCst), 1);
        assert!(drain(&mut h.rx).is_empty());
    }

    #[test]
    fn rejected_resolution_reports_settings_error() {
        let mut h = harness_with(AcquisitionConfig::default(), SettingsVerdict::Resolvable);
        h.permissions.granted.store(true, Ordering::SeqCst);
        h.session.start();
        drain(&mut h.rx);

        h.session.on_settings_resolution(false);
        let events = drain(&mut h.rx);
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Error {
                kind: ErrorKind::Settings,
                ..
            }]
        ));
        // No automatic retry.
        assert_eq!(h.source.subscribes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsatisfiable_settings_fall_back_when_no_provider_enabled() {
        let mut h = harness_with(AcquisitionConfig::default(), SettingsVerdict::Unsatisfiable);
        h.permissions.granted.store(true, Ordering::SeqCst);
        h.source.providers_enabled.store(false, Ordering::SeqCst);
        h.session.start();

        assert_eq!(
            drain(&mut h.rx),
            vec![SessionEvent::FallbackToSystemSettings]
        );
    }

    #[test]
    fn unsatisfiable_settings_stay_quiet_when_a_provider_is_enabled() {
        let mut h = harness_with(AcquisitionConfig::default(), SettingsVerdict::Unsatisfiable);
        h.permissions.granted.store(true, Ordering::SeqCst);
        h.session.start();

        assert!(drain(&mut h.rx).is_empty());
        assert_eq!(h.source.subscribes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn failed_subscription_reports_and_retries_on_next_entry() {
        let mut h = harness();
        h.permissions.granted.store(true, Ordering::SeqCst);
        h.source.subscribe_ok.store(false, Ordering::SeqCst);
        h.session.start();

        let events = drain(&mut h.rx);
        assert!(matches!(
            events.as_slice(),
            [SessionEvent::Error {
                kind: ErrorKind::Retrieval,
                ..
            }]
        ));

        // The flag stayed clear, so the next entry retries.
        h.source.subscribe_ok.store(true, Ordering::SeqCst);
        h.session.start();
        assert_eq!(h.source.subscribes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unavailable_source_falls_back_to_provider_check() {
        let mut h = harness();
        h.permissions.granted.store(true, Ordering::SeqCst);
        h.session.start();
        h.source.available.store(false, Ordering::SeqCst);
        h.source.providers_enabled.store(false, Ordering::SeqCst);

        h.session.start();
        assert_eq!(
            drain(&mut h.rx),
            vec![SessionEvent::FallbackToSystemSettings]
        );
    }

    #[test]
    fn genuine_fix_becomes_best_location() {
        let mut h = harness();
        h.session.on_fix(genuine(53.5, 10.0));

        let events = drain(&mut h.rx);
        assert!(matches!(events.as_slice(), [SessionEvent::NewLocation(_)]));
        assert_eq!(h.session.best_fix().unwrap().longitude, 10.0);
    }

    #[test]
    fn synthetic_fix_reports_mock_and_keeps_best() {
        let mut h = harness();
        h.session.on_fix(genuine(53.5, 10.0));
        drain(&mut h.rx);

        h.session.on_fix(genuine(53.5, 10.0).with_synthetic(true));
        assert_eq!(drain(&mut h.rx), vec![SessionEvent::MockDetected]);
        // Best location untouched by the rejected fix.
        assert!(!h.session.best_fix().unwrap().synthetic);
    }

    #[test]
    fn accept_synthetic_keeps_rejected_fixes_flowing() {
        let config = AcquisitionConfig {
            accept_synthetic: true,
            ..Default::default()
        };
        let mut h = harness_with(config, SettingsVerdict::Satisfied);
        h.session.on_fix(genuine(53.5, 10.0).with_synthetic(true));

        let events = drain(&mut h.rx);
        assert!(matches!(events.as_slice(), [SessionEvent::NewLocation(_)]));
        assert!(h.session.best_fix().unwrap().synthetic);
    }

    #[test]
    fn force_synthetic_rejects_everything() {
        let config = AcquisitionConfig::default().with_force_synthetic(true);
        let mut h = harness_with(config, SettingsVerdict::Satisfied);
        h.session.on_fix(genuine(53.5, 10.0));

        assert_eq!(drain(&mut h.rx), vec![SessionEvent::MockDetected]);
        assert!(h.session.best_fix().is_none());
    }

    #[test]
    fn fix_mid_negotiation_is_still_evaluated() {
        let mut h = harness();
        h.session.start(); // parked on NeedPermission
        drain(&mut h.rx);

        h.session.on_fix(genuine(48.1, 11.6));
        let events = drain(&mut h.rx);
        assert!(matches!(events.as_slice(), [SessionEvent::NewLocation(_)]));
        assert_eq!(h.session.best_fix().unwrap().latitude, 48.1);
        // Pipeline stage unaffected.
        assert_eq!(h.settings.checks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn stop_is_idempotent_and_preserves_best() {
        let h = harness();
        h.permissions.granted.store(true, Ordering::SeqCst);
        h.session.start();
        h.session.on_fix(genuine(53.5, 10.0));

        h.session.stop();
        h.session.stop();

        assert_eq!(h.source.unsubscribes.load(Ordering::SeqCst), 2);
        assert!(h.session.best_fix().is_some());

        // Restart walks the full pipeline again.
        h.session.start();
        assert_eq!(h.source.subscribes.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn stop_before_subscribe_never_panics() {
        let h = harness();
        h.session.stop();
        assert_eq!(h.source.unsubscribes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn begin_settings_resolution_reaches_the_resolver() {
        let h = harness();
        h.session.begin_settings_resolution();
        assert_eq!(h.settings.resolutions.load(Ordering::SeqCst), 1);
    }
}
