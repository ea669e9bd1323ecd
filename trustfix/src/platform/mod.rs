//! Collaborator contracts consumed by the acquisition core.
//!
//! The core never talks to an OS directly. Everything platform-specific sits
//! behind four dyn-compatible trait seams:
//!
//! - [`PermissionGateway`] - runtime permission state and the system ask
//! - [`SettingsResolver`] - validates an update request against device settings
//! - [`LocationSource`] - last-known lookup, live subscription, provider facts
//! - [`DeviceInspector`] - build identity strings and mock-capability queries
//!
//! Interactive operations (the permission dialog, the settings resolution
//! prompt) are fire-and-forget here; their outcomes re-enter the session
//! through its `on_permission_result` / `on_settings_resolution` triggers,
//! matching the callback-driven model the OS imposes. Implementations must
//! not invoke session triggers synchronously from inside these methods -
//! outcomes are delivered from the embedding event loop.

mod device;
mod permissions;
mod settings;
mod source;

pub use device::{BuildProfile, DeviceInspector};
pub use permissions::PermissionGateway;
pub use settings::{SettingsResolver, SettingsVerdict};
pub use source::{
    LocationSource, SourceError, GPS_PROVIDER, NETWORK_PROVIDER, PASSIVE_PROVIDER,
};
