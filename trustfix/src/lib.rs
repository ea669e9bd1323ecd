//! trustfix - trusted location acquisition.
//!
//! This library drives a device through the full location-acquisition flow -
//! permission grant, provider-settings negotiation, live subscription - and
//! screens every delivered fix for signs of mock/spoofed injection before it
//! is allowed to become the best known location.
//!
//! # High-Level API
//!
//! Most embedders want the [`service`] facade:
//!
//! ```ignore
//! use trustfix::config::AcquisitionConfig;
//! use trustfix::service::TrustFixService;
//!
//! let service = TrustFixService::new(
//!     AcquisitionConfig::default(),
//!     permissions, settings, source, inspector,
//! )?;
//!
//! let mut events = service.events();
//! service.start();
//! // React to events; feed dialog outcomes back via the on_* triggers.
//! ```
//!
//! The OS-specific pieces (permission dialogs, the settings prompt, the
//! location subsystem, device introspection) live behind the [`platform`]
//! trait seams; this crate contains no OS bindings.

pub mod config;
pub mod coord;
pub mod fingerprint;
pub mod fix;
pub mod logging;
pub mod platform;
pub mod plausibility;
pub mod service;
pub mod session;
pub mod time;

/// Version of the trustfix library and CLI.
///
/// Synchronized across the workspace; injected at compile time from
/// `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
