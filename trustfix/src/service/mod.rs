//! High-level service facade.
//!
//! [`TrustFixService`] wires the collaborators into an
//! [`AcquisitionSession`](crate::session::AcquisitionSession) and adds the
//! point queries a cross-process bridge typically exposes: the
//! spoofing-environment assessment, the services-enabled and permission
//! checks, and the OS version string. The bridge itself (method-call framing,
//! serialization) stays outside this crate.

mod error;
mod facade;

pub use error::ServiceError;
pub use facade::TrustFixService;
