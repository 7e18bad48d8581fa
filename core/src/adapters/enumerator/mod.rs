//! Process enumeration adapters.
//!
//! Platform-specific implementations of process listing. The output parsers
//! are compiled everywhere; only the choice of implementation is per platform.

#[cfg_attr(not(unix), allow(dead_code))]
mod ps;
#[cfg_attr(not(windows), allow(dead_code))]
mod windows;

pub use ps::PsEnumerator;
pub use windows::WindowsEnumerator;

use crate::domain::RawRow;
use crate::error::Result;
use crate::ports::ProcessEnumeratorPort;

/// The process enumerator for the current platform.
pub struct PlatformEnumerator {
    #[cfg(unix)]
    inner: PsEnumerator,

    #[cfg(windows)]
    inner: WindowsEnumerator,
}

impl PlatformEnumerator {
    /// Create a new enumerator for the current platform.
    pub fn new() -> Self {
        Self {
            #[cfg(unix)]
            inner: PsEnumerator::new(),

            #[cfg(windows)]
            inner: WindowsEnumerator::new(),
        }
    }
}

impl Default for PlatformEnumerator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessEnumeratorPort for PlatformEnumerator {
    async fn enumerate(&self) -> Result<Vec<RawRow>> {
        self.inner.enumerate().await
    }
}
