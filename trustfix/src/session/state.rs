//! Acquisition pipeline state record.

use crate::fix::LocationFix;

/// Mutable record of one session's progress through the acquisition pipeline.
///
/// The flags form a strict chain: `updates_subscribed` implies
/// `location_status_ok` implies `location_requested` implies
/// `permission_granted`. [`advance`](crate::session::AcquisitionSession)
/// inspects them top to bottom and performs exactly the first missing step,
/// so the chain can never be skipped.
#[derive(Debug, Default)]
pub struct AcquisitionState {
    /// The location permission is granted.
    pub permission_granted: bool,

    /// A settings check has been attempted at least once this session.
    pub location_requested: bool,

    /// The last settings check succeeded.
    pub location_status_ok: bool,

    /// The last settings failure is fixable via the interactive prompt.
    pub needs_settings_change: bool,

    /// Live updates are flowing.
    pub updates_subscribed: bool,

    /// Best trusted fix so far. Survives `stop()`.
    pub best_location: Option<LocationFix>,

    /// Consecutive permission denials this session.
    pub permission_decline_count: u32,
}

impl AcquisitionState {
    /// Create a fresh record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the transient pipeline flags, keeping the best location and the
    /// decline count.
    pub fn clear_pipeline(&mut self) {
        self.permission_granted = false;
        self.location_requested = false;
        self.location_status_ok = false;
        self.updates_subscribed = false;
    }

    /// The stage-ordering invariant: each flag requires the one before it.
    ///
    /// updates_subscribed ⇒ location_status_ok ⇒ location_requested
    /// ⇒ permission_granted
    pub fn invariant_holds(&self) -> bool {
        (!self.updates_subscribed || self.location_status_ok)
            && (!self.location_status_ok || self.location_requested)
            && (!self.location_requested || self.permission_granted)
    }
}
