//! In-memory request statistics keyed by request signature.
//!
//! Every counter is identified by the endpoint (`"<METHOD> <URI>"`) and the
//! canonical JSON rendering of its parameters. Both parts are kept as separate
//! fields of the map key, so a parameter value can never be mistaken for part of
//! the endpoint.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while recording a request.
#[derive(Debug, Error)]
pub enum StatsError {
    /// The parameter map could not be serialized.
    #[error("failed to encode request parameters: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Externally visible view of one counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsRecord {
    pub api: String,
    pub params: String,
    pub count: u64,
}

/// Storage interface used by the HTTP layer.
pub trait StatsRepository {
    /// Count one occurrence of `api` called with `params`.
    fn add(&self, api: &str, params: &HashMap<String, String>) -> Result<(), StatsError>;

    /// The signature with the highest count, or `None` when nothing was recorded.
    fn most_used(&self) -> Option<StatsRecord>;

    /// Snapshot of every counter.
    fn all(&self) -> Vec<StatsRecord>;
}

/// Composite map key: endpoint and canonical parameters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
struct StatsKey {
    api: String,
    params: String,
}

/// Render `params` as a key-sorted JSON object; an empty map renders as `""`.
pub fn encode_params(params: &HashMap<String, String>) -> Result<String, StatsError> {
    if params.is_empty() {
        return Ok(String::new());
    }
    let sorted: BTreeMap<&str, &str> = params
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    Ok(serde_json::to_string(&sorted)?)
}

/// Mutex-guarded counter table living for the whole process.
#[derive(Debug, Default)]
pub struct MemoryStats {
    requests: Mutex<HashMap<StatsKey, u64>>,
}

impl MemoryStats {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StatsRepository for MemoryStats {
    fn add(&self, api: &str, params: &HashMap<String, String>) -> Result<(), StatsError> {
        let key = StatsKey {
            api: api.to_string(),
            params: encode_params(params)?,
        };
        let mut guard = self.requests.lock().expect("stats store poisoned");
        *guard.entry(key).or_insert(0) += 1;
        Ok(())
    }

    fn most_used(&self) -> Option<StatsRecord> {
        let guard = self.requests.lock().expect("stats store poisoned");
        // Highest count wins; on a tie the smallest key does.
        guard
            .iter()
            .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then_with(|| kb.cmp(ka)))
            .map(|(key, count)| StatsRecord {
                api: key.api.clone(),
                params: key.params.clone(),
                count: *count,
            })
    }

    fn all(&self) -> Vec<StatsRecord> {
        let guard = self.requests.lock().expect("stats store poisoned");
        let mut records: Vec<StatsRecord> = guard
            .iter()
            .map(|(key, count)| StatsRecord {
                api: key.api.clone(),
                params: key.params.clone(),
                count: *count,
            })
            .collect();
        drop(guard);
        records.sort_by(|a, b| (&a.api, &a.params).cmp(&(&b.api, &b.params)));
        records
    }
}
