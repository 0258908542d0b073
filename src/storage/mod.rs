pub mod file;
pub mod paste;

use crate::error::StoreError;
use crate::policy::memory::SignalMemory;
use crate::types::{Equity, PendingTrade};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Everything the bot remembers between scheduled runs, persisted as one
/// JSON document: the preference table, the adaptive confidence gate, the
/// equity ledger, and open positions keyed by pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    #[serde(default)]
    pub memory: SignalMemory,
    #[serde(default = "default_min_confidence")]
    pub min_confidence: u32,
    #[serde(default)]
    pub equity: Equity,
    #[serde(default)]
    pub pending: BTreeMap<String, PendingTrade>,
}

fn default_min_confidence() -> u32 {
    70
}

impl StateDocument {
    pub fn seeded(min_confidence: u32) -> Self {
        Self {
            memory: SignalMemory::default(),
            min_confidence,
            equity: Equity::default(),
            pending: BTreeMap::new(),
        }
    }
}

impl Default for StateDocument {
    fn default() -> Self {
        Self::seeded(default_min_confidence())
    }
}

/// Document persistence. Backends are interchangeable; the caller is the
/// only writer (no locking across overlapping runs).
#[async_trait]
pub trait StateStore: Send + Sync {
    /// `Ok(None)` when no document exists yet.
    async fn load(&self) -> Result<Option<StateDocument>, StoreError>;

    async fn save(&self, doc: &StateDocument) -> Result<(), StoreError>;
}
