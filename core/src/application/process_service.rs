//! Process scanning application service.

use tracing::{debug, info};

use super::normalizer::Normalizer;
use crate::adapters::{PlatformEnumerator, PlatformSocketTable};
use crate::config::Config;
use crate::domain::{ProcessRecord, ScanOptions};
use crate::error::Result;
use crate::ports::{ListeningPortLookup, ProcessEnumeratorPort};

/// Application service for process scans.
///
/// Uses the `ProcessEnumeratorPort` for listing and a `Normalizer` (backed by a
/// `ListeningPortLookup`) for record construction, so both collaborators can
/// be replaced in tests.
pub struct ProcessService<E: ProcessEnumeratorPort, L: ListeningPortLookup + 'static> {
    enumerator: E,
    normalizer: Normalizer<L>,
}

impl ProcessService<PlatformEnumerator, PlatformSocketTable> {
    /// Create a service using the platform collaborators and `config`'s lookup settings.
    pub fn platform(config: &Config) -> Self {
        Self::new(
            PlatformEnumerator::new(),
            Normalizer::from_config(PlatformSocketTable::new(), config),
        )
    }
}

impl<E: ProcessEnumeratorPort, L: ListeningPortLookup + 'static> ProcessService<E, L> {
    /// Create a new process service.
    pub fn new(enumerator: E, normalizer: Normalizer<L>) -> Self {
        Self {
            enumerator,
            normalizer,
        }
    }

    /// Enumerate, filter and normalize processes.
    ///
    /// Fails only when the process listing itself cannot be produced.
    pub async fn scan(&self, options: &ScanOptions) -> Result<Vec<ProcessRecord>> {
        let rows = self.enumerator.enumerate().await?;
        let mut records = self.normalizer.normalize(&rows, &options.filter).await;

        if options.url_only {
            let before = records.len();
            records.retain(|r| r.url.is_some());
            debug!(dropped = before - records.len(), "dropped records without URL");
        }

        info!(processes = records.len(), "scan complete");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NameFilter, RawRow};
    use crate::error::Error;
    use std::collections::HashMap;

    /// Mock enumerator for testing.
    struct MockEnumerator {
        rows: Vec<RawRow>,
    }

    impl ProcessEnumeratorPort for MockEnumerator {
        async fn enumerate(&self) -> Result<Vec<RawRow>> {
            Ok(self.rows.clone())
        }
    }

    struct BrokenEnumerator;

    impl ProcessEnumeratorPort for BrokenEnumerator {
        async fn enumerate(&self) -> Result<Vec<RawRow>> {
            Err(Error::CommandFailed("Failed to run ps: not found".to_string()))
        }
    }

    struct MockLookup(HashMap<u32, Vec<u16>>);

    impl ListeningPortLookup for MockLookup {
        async fn listening_ports(&self, pid: u32) -> Result<Vec<u16>> {
            Ok(self.0.get(&pid).cloned().unwrap_or_default())
        }
    }

    fn service() -> ProcessService<MockEnumerator, MockLookup> {
        let rows = vec![
            RawRow::Columns("  PID  PPID COMMAND".to_string()),
            RawRow::Columns("10 1 node api/server.js".to_string()),
            RawRow::Columns("11 1 node worker.js".to_string()),
            RawRow::Columns("12 1 /usr/sbin/sshd -D".to_string()),
        ];
        let lookup = MockLookup(HashMap::from([(10, vec![4000])]));
        ProcessService::new(MockEnumerator { rows }, Normalizer::new(lookup))
    }

    #[tokio::test]
    async fn test_scan_with_pattern() {
        let records = service().scan(&ScanOptions::default()).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].url.as_deref(), Some("http://localhost:4000"));
        assert_eq!(records[0].path.as_deref(), Some("api/server.js"));
        assert_eq!(records[1].url, None);
    }

    #[tokio::test]
    async fn test_scan_all() {
        let options = ScanOptions {
            filter: NameFilter::All,
            url_only: false,
        };
        let records = service().scan(&options).await.unwrap();
        assert_eq!(records.len(), 3);
        assert!(!records[2].is_node_like);
        assert_eq!(records[2].path.as_deref(), Some("/usr/sbin/sshd"));
    }

    #[tokio::test]
    async fn test_scan_url_only() {
        let options = ScanOptions {
            filter: NameFilter::All,
            url_only: true,
        };
        let records = service().scan(&options).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pid, Some(10));
    }

    #[tokio::test]
    async fn test_enumeration_failure_is_surfaced() {
        let service = ProcessService::new(
            BrokenEnumerator,
            Normalizer::new(MockLookup(HashMap::new())),
        );
        let err = service.scan(&ScanOptions::default()).await.unwrap_err();
        assert!(matches!(err, Error::CommandFailed(_)));
    }
}
