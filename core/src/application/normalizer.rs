//! Record normalizer.
//!
//! Turns raw enumeration rows into `ProcessRecord`s. Path and static URL
//! inference run inline; the socket-table lookups for rows that need one run
//! concurrently on a bounded pool and are matched back to their rows by pid,
//! so output order always follows input order.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use super::url::{first_listening_port, plan_url, UrlPlan};
use crate::config::Config;
use crate::domain::{
    extract_path, is_node_like, localhost_url, NameFilter, ProcessRecord, RawProcessLine, RawRow,
};
use crate::ports::ListeningPortLookup;

/// Normalizes raw process rows into records.
pub struct Normalizer<L: ListeningPortLookup + 'static> {
    lookup: Arc<L>,
    concurrency: usize,
    lookup_timeout: Duration,
}

impl<L: ListeningPortLookup + 'static> Normalizer<L> {
    /// Create a normalizer with the default concurrency and timeout.
    pub fn new(lookup: L) -> Self {
        Self::from_config(lookup, &Config::default())
    }

    /// Create a normalizer using the lookup settings from `config`.
    pub fn from_config(lookup: L, config: &Config) -> Self {
        Self {
            lookup: Arc::new(lookup),
            concurrency: config.concurrency(),
            lookup_timeout: config.lookup_timeout(),
        }
    }

    /// Set the maximum number of concurrent socket lookups.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Set the per-lookup timeout.
    pub fn with_lookup_timeout(mut self, timeout: Duration) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    /// Decode, filter and normalize enumeration rows.
    ///
    /// Rows that do not decode (headers, rows without a command line) and rows
    /// rejected by `filter` are dropped; every other row yields exactly one
    /// record, in input order.
    pub async fn normalize(&self, rows: &[RawRow], filter: &NameFilter) -> Vec<ProcessRecord> {
        let lines: Vec<RawProcessLine> = rows
            .iter()
            .filter_map(RawRow::decode)
            .filter(|line| filter.matches(&line.command_line))
            .collect();

        debug!(rows = rows.len(), kept = lines.len(), "rows decoded and filtered");
        self.normalize_lines(lines).await
    }

    /// Normalize already decoded lines, one record per line.
    ///
    /// Each record's URL is what `extract_url` would return for the line; the
    /// lookups are batched and shared between rows with the same pid.
    pub async fn normalize_lines(&self, lines: Vec<RawProcessLine>) -> Vec<ProcessRecord> {
        let mut records = Vec::with_capacity(lines.len());
        let mut pending: Vec<u32> = Vec::new();

        for line in lines {
            let (url, lookup_pid) = match plan_url(&line.command_line, line.pid) {
                UrlPlan::Settled(url) => (url, None),
                UrlPlan::Lookup(pid) => {
                    if !pending.contains(&pid) {
                        pending.push(pid);
                    }
                    (None, Some(pid))
                }
            };

            let record = ProcessRecord {
                pid: line.pid,
                parent_pid: line.parent_pid,
                is_node_like: is_node_like(&line.command_line),
                url,
                path: extract_path(&line.command_line),
                command_line: line.command_line,
            };
            records.push((record, lookup_pid));
        }

        let ports = self.lookup_ports(pending).await;

        records
            .into_iter()
            .map(|(mut record, lookup_pid)| {
                if let Some(pid) = lookup_pid {
                    record.url = ports.get(&pid).copied().map(localhost_url);
                }
                record
            })
            .collect()
    }

    /// Run socket lookups for `pids` concurrently, keyed by pid.
    ///
    /// Failed, empty and timed out lookups are simply absent from the map.
    async fn lookup_ports(&self, pids: Vec<u32>) -> HashMap<u32, u16> {
        let mut ports = HashMap::new();
        if pids.is_empty() {
            return ports;
        }

        debug!(lookups = pids.len(), concurrency = self.concurrency, "starting socket lookups");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();

        for pid in pids {
            let lookup = Arc::clone(&self.lookup);
            let semaphore = Arc::clone(&semaphore);
            let timeout = self.lookup_timeout;

            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok()?;
                match tokio::time::timeout(timeout, first_listening_port(lookup.as_ref(), pid)).await {
                    Ok(port) => port.map(|port| (pid, port)),
                    Err(_) => {
                        debug!(pid, "socket lookup timed out");
                        None
                    }
                }
            });
        }

        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(Some((pid, port))) => {
                    ports.insert(pid, port);
                }
                Ok(None) => {}
                Err(e) => debug!(error = %e, "socket lookup task failed"),
            }
        }

        ports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Lookup with per-pid ports and delays, tracking concurrency.
    #[derive(Default)]
    struct MockLookup {
        ports: HashMap<u32, Vec<u16>>,
        delays_ms: HashMap<u32, u64>,
        failing: Vec<u32>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl MockLookup {
        fn port(mut self, pid: u32, port: u16) -> Self {
            self.ports.entry(pid).or_default().push(port);
            self
        }

        fn delay(mut self, pid: u32, ms: u64) -> Self {
            self.delays_ms.insert(pid, ms);
            self
        }

        fn fail(mut self, pid: u32) -> Self {
            self.failing.push(pid);
            self
        }
    }

    impl ListeningPortLookup for MockLookup {
        async fn listening_ports(&self, pid: u32) -> Result<Vec<u16>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(ms) = self.delays_ms.get(&pid) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(&pid) {
                return Err(Error::CommandFailed("ss exited".to_string()));
            }
            Ok(self.ports.get(&pid).cloned().unwrap_or_default())
        }
    }

    fn columns(line: &str) -> RawRow {
        RawRow::Columns(line.to_string())
    }

    #[tokio::test]
    async fn test_end_to_end() {
        let normalizer = Normalizer::new(MockLookup::default());
        let rows = vec![
            columns("100 1 node /srv/app/server.js --port 8080"),
            columns("101 1 npm run build"),
        ];

        let records = normalizer.normalize(&rows, &NameFilter::All).await;
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].pid, Some(100));
        assert_eq!(records[0].parent_pid, Some(1));
        assert_eq!(records[0].url.as_deref(), Some("http://localhost:8080"));
        assert_eq!(records[0].path.as_deref(), Some("/srv/app/server.js"));
        assert!(records[0].is_node_like);

        assert_eq!(records[1].pid, Some(101));
        assert_eq!(records[1].url, None);
        assert_eq!(records[1].path.as_deref(), Some("build"));
        assert!(records[1].is_node_like);
    }

    #[tokio::test]
    async fn test_filter_and_undecodable_rows() {
        let normalizer = Normalizer::new(MockLookup::default());
        let rows = vec![
            columns("  PID  PPID COMMAND"),
            columns("1 0 /sbin/init"),
            columns("200 1 node a.js"),
            columns("201 1"),
            columns("202 1 python worker.py"),
        ];

        let records = normalizer.normalize(&rows, &NameFilter::pattern("NODE")).await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].pid, Some(200));

        let all = normalizer.normalize(&rows, &NameFilter::All).await;
        let pids: Vec<_> = all.iter().map(|r| r.pid).collect();
        assert_eq!(pids, vec![Some(1), Some(200), Some(202)]);
    }

    #[tokio::test]
    async fn test_lookup_fills_url() {
        let normalizer = Normalizer::new(MockLookup::default().port(300, 5173));
        let rows = vec![columns("300 1 node node_modules/.bin/vite")];

        let records = normalizer.normalize(&rows, &NameFilter::All).await;
        assert_eq!(records[0].url.as_deref(), Some("http://localhost:5173"));
    }

    #[tokio::test]
    async fn test_order_preserved_with_out_of_order_completion() {
        let lookup = MockLookup::default()
            .port(1, 3001)
            .delay(1, 60)
            .port(2, 3002)
            .delay(2, 30)
            .port(3, 3003);
        let normalizer = Normalizer::new(lookup).with_concurrency(4);

        let rows = vec![
            columns("1 0 node one.js"),
            columns("2 0 node two.js"),
            columns("3 0 node three.js"),
        ];

        let records = normalizer.normalize(&rows, &NameFilter::All).await;
        let summary: Vec<_> = records
            .iter()
            .map(|r| (r.pid, r.url.clone().unwrap_or_default()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (Some(1), "http://localhost:3001".to_string()),
                (Some(2), "http://localhost:3002".to_string()),
                (Some(3), "http://localhost:3003".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let mut lookup = MockLookup::default();
        let mut rows = Vec::new();
        for pid in 1..=6 {
            lookup = lookup.delay(pid, 20);
            rows.push(columns(&format!("{} 0 node s{}.js", pid, pid)));
        }
        let normalizer = Normalizer::new(lookup).with_concurrency(2);

        let records = normalizer.normalize(&rows, &NameFilter::All).await;
        assert_eq!(records.len(), 6);
        assert_eq!(normalizer.lookup.calls.load(Ordering::SeqCst), 6);
        assert!(normalizer.lookup.max_in_flight.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_failed_and_timed_out_lookups_yield_no_url() {
        let lookup = MockLookup::default()
            .port(1, 3001)
            .fail(1)
            .port(2, 3002)
            .delay(2, 5_000)
            .port(3, 3003);
        let normalizer = Normalizer::new(lookup).with_lookup_timeout(Duration::from_millis(50));

        let rows = vec![
            columns("1 0 node a.js"),
            columns("2 0 node b.js"),
            columns("3 0 node c.js"),
        ];

        let records = normalizer.normalize(&rows, &NameFilter::All).await;
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].url, None);
        assert_eq!(records[1].url, None);
        assert_eq!(records[2].url.as_deref(), Some("http://localhost:3003"));
    }

    #[tokio::test]
    async fn test_no_lookup_when_static_hint_or_missing_pid() {
        let normalizer = Normalizer::new(MockLookup::default().port(5, 9000));
        let rows = vec![
            columns("5 0 node app.js --listen 7000"),
            columns("x 0 node app.js"),
            columns("6 0 python -m http.server"),
        ];

        let records = normalizer.normalize(&rows, &NameFilter::All).await;
        assert_eq!(records[0].url.as_deref(), Some("http://localhost:7000"));
        assert_eq!(records[1].pid, None);
        assert_eq!(records[1].url, None);
        assert_eq!(records[2].url, None);
        assert_eq!(normalizer.lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_urls_agree_with_extract_url() {
        let lookup = MockLookup::default().port(1, 5173).port(3, 4000).fail(4);
        let lines = [
            "node app.js",
            "node app.js --port 9000",
            "node proxy.js http://127.0.0.1:8000/",
            "node worker.js",
            "node -e app.listen(1)",
            "python -m http.server",
        ];

        let mut expected = Vec::new();
        for (pid, cmd) in (1u32..).zip(lines) {
            expected.push(crate::application::extract_url(cmd, Some(pid), &lookup).await);
        }

        let rows: Vec<_> = (1u32..)
            .zip(lines)
            .map(|(pid, cmd)| columns(&format!("{} 0 {}", pid, cmd)))
            .collect();
        let normalizer = Normalizer::new(lookup);
        let records = normalizer.normalize(&rows, &NameFilter::All).await;
        let urls: Vec<_> = records.into_iter().map(|r| r.url).collect();

        assert_eq!(urls, expected);
        assert_eq!(urls[0].as_deref(), Some("http://localhost:5173"));
    }

    #[tokio::test]
    async fn test_idempotent() {
        let normalizer = Normalizer::new(MockLookup::default().port(10, 4000));
        let rows = vec![
            columns("10 1 node --inspect app/index.js"),
            columns("11 1 yarn start"),
            columns("12 1 node -e \"require('x')\""),
        ];

        let first = normalizer.normalize(&rows, &NameFilter::All).await;
        let second = normalizer.normalize(&rows, &NameFilter::All).await;
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        assert_eq!(first[2].path.as_deref(), Some("inline"));
    }
}
