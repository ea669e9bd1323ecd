//! Runtime permission gateway.

/// Access to the OS runtime-permission subsystem for the location permission.
///
/// `request()` launches the system dialog and returns immediately; the grant
/// or denial arrives later via
/// [`AcquisitionSession::on_permission_result`](crate::session::AcquisitionSession::on_permission_result).
pub trait PermissionGateway: Send + Sync {
    /// Whether the location permission is currently granted.
    fn is_granted(&self) -> bool;

    /// Launch the system permission dialog.
    fn request(&self);

    /// Whether the OS recommends showing a rationale before asking again
    /// (the user declined once without opting out permanently).
    fn should_explain(&self) -> bool;
}
