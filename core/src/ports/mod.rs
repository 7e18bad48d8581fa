//! Ports layer - Trait definitions (interfaces).
//!
//! This module defines the interfaces that the application layer uses
//! to interact with external systems. Implementations live in `adapters`.

mod enumerator;
mod socket_table;

pub use enumerator::ProcessEnumeratorPort;
pub use socket_table::ListeningPortLookup;
