//! Process enumeration port (interface).

use crate::domain::RawRow;
use crate::error::Result;

/// Port for listing the processes running on the system.
///
/// Implementations shell out to the platform listing utility and return its
/// rows undecoded; decoding into `RawProcessLine` happens in the domain layer.
pub trait ProcessEnumeratorPort: Send + Sync {
    /// List every live process.
    ///
    /// Fails only when the listing cannot be produced at all.
    fn enumerate(&self) -> impl std::future::Future<Output = Result<Vec<RawRow>>> + Send;
}
