pub(crate) mod branches;
pub(crate) mod tags;

use crate::foundation::version::VersionRecord;

/// Lists release versions from a remote, in the order the remote reports them.
///
/// Sources page lazily: nothing is requested until the iterator is polled. Network failures end
/// the sequence early (logged) instead of surfacing as errors, so a consumer always receives
/// whatever was collected before the failure.
pub trait VersionSource {
    /// Iterate release records in source-listing order.
    fn versions(&self) -> Box<dyn Iterator<Item = VersionRecord> + '_>;
}
