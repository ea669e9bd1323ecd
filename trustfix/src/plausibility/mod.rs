//! Stateful fix plausibility tracking.
//!
//! The tracker decides, per delivered fix, whether it should be trusted. The
//! OS synthetic flag is authoritative when set, but spoofing apps sometimes
//! toggle it off - so the tracker also remembers the last rejected fix and
//! distrusts anything that lands close to it, until a long enough run of
//! clean readings earns the session a clean slate.
//!
//! One tracker instance belongs to one acquisition session; state never
//! crosses sessions.

use crate::coord::distance_meters;
use crate::fix::LocationFix;

/// Clean readings needed before a remembered rejection is forgotten.
const FORGET_AFTER_ACCEPTED: u32 = 20;

/// Saturation ceiling for the clean-reading counter.
const ACCEPTED_CEILING: u32 = 1_000_000;

/// A genuine-looking fix within this radius of the last rejected one is still
/// rejected.
const REJECTION_RADIUS_METERS: f64 = 1000.0;

/// Tracker decision for one fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The fix is plausible and may become the best location.
    Accepted,
    /// The fix is synthetic, or too close to a remembered synthetic one.
    Rejected,
}

/// Per-session plausibility state and evaluation.
///
/// # Algorithm
///
/// 1. A fix is synthetic when the caller says so (config override) or the OS
///    flag is set. Synthetic fixes are remembered and reset the clean streak.
/// 2. Genuine fixes extend the streak (saturating); at
///    [`FORGET_AFTER_ACCEPTED`] consecutive clean readings the remembered
///    rejection is dropped.
/// 3. With nothing remembered, a genuine fix is accepted outright. Otherwise
///    it must be more than [`REJECTION_RADIUS_METERS`] away from the
///    remembered fix.
#[derive(Debug, Default)]
pub struct PlausibilityTracker {
    last_rejected: Option<LocationFix>,
    consecutive_accepted: u32,
}

impl PlausibilityTracker {
    /// Create a tracker with a clean slate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one fix. `known_synthetic` folds in everything the caller
    /// already knows (the config-level force override).
    pub fn evaluate(&mut self, fix: &LocationFix, known_synthetic: bool) -> Verdict {
        let synthetic = known_synthetic || fix.synthetic;

        if synthetic {
            self.last_rejected = Some(fix.clone());
            self.consecutive_accepted = 0;
        } else {
            self.consecutive_accepted = (self.consecutive_accepted + 1).min(ACCEPTED_CEILING);
        }

        if self.consecutive_accepted >= FORGET_AFTER_ACCEPTED {
            self.last_rejected = None;
        }

        let Some(reference) = &self.last_rejected else {
            return Verdict::Accepted;
        };

        let separation = distance_meters(
            fix.latitude,
            fix.longitude,
            reference.latitude,
            reference.longitude,
        );
        if separation > REJECTION_RADIUS_METERS {
            Verdict::Accepted
        } else {
            tracing::debug!(
                separation_m = separation,
                "fix within rejection radius of remembered synthetic fix"
            );
            Verdict::Rejected
        }
    }

    /// The remembered rejected fix, if any.
    pub fn last_rejected(&self) -> Option<&LocationFix> {
        self.last_rejected.as_ref()
    }

    /// Length of the current clean-reading streak.
    pub fn consecutive_accepted(&self) -> u32 {
        self.consecutive_accepted
    }
}
