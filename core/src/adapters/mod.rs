//! Adapters layer - External system implementations.
//!
//! This module contains implementations of the port traits defined in `ports`.
//! Each adapter shells out to a platform utility and parses its output.

mod command;
pub mod enumerator;
pub mod socket_table;

// Re-export main types for convenience
pub use enumerator::PlatformEnumerator;
pub use socket_table::PlatformSocketTable;
