/*!
 * Progress log for in-flight jobs.
 *
 * An external poller observes a job's step-by-step status through this keyed
 * append log without sharing memory with the worker. Each job's log is capped
 * at the most recent 100 entries and expires one hour after its last write.
 */

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Maximum entries retained per job
const MAX_ENTRIES: usize = 100;

/// Expiry window refreshed on every write
const ENTRY_TTL: Duration = Duration::from_secs(3600);

/// Severity of a progress entry
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProgressLevel {
    /// Normal step
    Info,
    /// Recoverable problem
    Warning,
    /// Stage failure
    Error,
}

/// One entry in a job's progress log
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProgressEntry {
    /// ISO-8601 timestamp of the append
    pub timestamp: String,
    /// Severity
    pub level: ProgressLevel,
    /// Human-readable message
    pub message: String,
}

/// Per-job bucket with its expiry deadline
struct JobLog {
    entries: Vec<ProgressEntry>,
    expires_at: Instant,
}

/// Keyed append-only progress log with bounded size and expiry
pub struct ProgressLog {
    /// Shared store, keyed by job id
    store: Arc<RwLock<HashMap<String, JobLog>>>,

    /// Maximum entries retained per job
    max_entries: usize,

    /// Expiry window refreshed on every write
    ttl: Duration,
}

impl ProgressLog {
    /// Create a progress log with the standard cap and expiry
    pub fn new() -> Self {
        Self::with_limits(MAX_ENTRIES, ENTRY_TTL)
    }

    /// Create a progress log with custom limits
    pub fn with_limits(max_entries: usize, ttl: Duration) -> Self {
        Self {
            store: Arc::new(RwLock::new(HashMap::new())),
            max_entries,
            ttl,
        }
    }

    /// Append an entry to a job's log, truncating to the newest entries and
    /// refreshing the expiry window
    pub fn append(&self, job_id: &str, level: ProgressLevel, message: impl Into<String>) {
        let entry = ProgressEntry {
            timestamp: chrono::Utc::now().to_rfc3339(),
            level,
            message: message.into(),
        };

        let mut store = self.store.write();
        let now = Instant::now();

        let bucket = store.entry(job_id.to_string()).or_insert_with(|| JobLog {
            entries: Vec::new(),
            expires_at: now + self.ttl,
        });

        // An expired bucket starts over rather than resurfacing stale entries
        if bucket.expires_at <= now {
            bucket.entries.clear();
        }

        bucket.entries.push(entry);
        if bucket.entries.len() > self.max_entries {
            let excess = bucket.entries.len() - self.max_entries;
            bucket.entries.drain(..excess);
        }
        bucket.expires_at = now + self.ttl;
    }

    /// Read the current entries for a job in append order; returns an empty
    /// sequence when the job is unknown or its log has expired
    pub fn read(&self, job_id: &str) -> Vec<ProgressEntry> {
        let store = self.store.read();
        match store.get(job_id) {
            Some(bucket) if bucket.expires_at > Instant::now() => bucket.entries.clone(),
            _ => Vec::new(),
        }
    }
}

impl Default for ProgressLog {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ProgressLog {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            max_entries: self.max_entries,
            ttl: self.ttl,
        }
    }
}
