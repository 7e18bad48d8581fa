//! Application layer - Use case services.
//!
//! This module contains the services that orchestrate domain logic and
//! adapter interactions:
//! - `extract_url` combines static URL inference with the socket-table port
//! - `Normalizer` turns raw enumeration rows into `ProcessRecord`s
//! - `ProcessService` runs a whole scan through the ports

mod normalizer;
mod process_service;
mod url;

pub use normalizer::Normalizer;
pub use process_service::ProcessService;
pub use url::extract_url;
