//! Session event stream types.

use std::fmt;

use crate::fix::LocationFix;

/// Classification of reported session errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Settings check or resolution failed, or the user rejected it.
    Settings,
    /// Subscription or availability query failed, including permission races.
    Retrieval,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings => write!(f, "settings"),
            Self::Retrieval => write!(f, "retrieval"),
        }
    }
}

/// Everything an acquisition session can tell its embedder.
///
/// One tagged enum on one broadcast channel, instead of a listener interface
/// per capability. The embedder reacts by showing UI, opening system screens,
/// or re-entering the session through its triggers.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The user must grant the location permission; fire
    /// `request_permission()` (optionally after an explanation).
    NeedPermission,
    /// The user declined once and the OS suggests explaining before
    /// re-asking.
    ExplainPermission,
    /// Declined twice (or opted out permanently); only the app-settings
    /// screen can help now.
    PermanentlyDeclined,
    /// Device settings cannot serve the request but an interactive prompt
    /// can fix them; fire `begin_settings_resolution()`.
    NeedSettingsChange,
    /// No provider is enabled at the OS level; only the system location
    /// settings screen can help.
    FallbackToSystemSettings,
    /// A trusted fix arrived and is now the best location.
    NewLocation(LocationFix),
    /// A delivered fix was classified synthetic and discarded.
    MockDetected,
    /// A collaborator call failed; terminal for this attempt.
    Error {
        /// What failed.
        kind: ErrorKind,
        /// Plain-text detail.
        message: String,
    },
}

impl SessionEvent {
    /// Short tag for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NeedPermission => "need_permission",
            Self::ExplainPermission => "explain_permission",
            Self::PermanentlyDeclined => "permanently_declined",
            Self::NeedSettingsChange => "need_settings_change",
            Self::FallbackToSystemSettings => "fallback_to_system_settings",
            Self::NewLocation(_) => "new_location",
            Self::MockDetected => "mock_detected",
            Self::Error { .. } => "error",
        }
    }
}
