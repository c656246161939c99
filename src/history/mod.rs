//! Rebalance history ledger.
//!
//! Keeps confirmed rebalances newest-first in memory and writes the whole
//! list through a [`HistoryStore`] after every change. Storage failures are
//! logged; the in-memory ledger stays authoritative for the session.

pub mod record;
pub mod store;

pub use record::{RebalanceHistoryRecord, RebalanceHistorySummary};
pub use store::{HistoryStore, JsonFileStore, MemoryStore};

use chrono::{DateTime, Utc};
use log::{debug, error, info};

use crate::trade::Trade;

/// Append/query/delete over persisted rebalance records.
#[derive(Debug)]
pub struct RebalanceLedger<S: HistoryStore> {
    store: S,
    records: Vec<RebalanceHistoryRecord>,
}

impl<S: HistoryStore> RebalanceLedger<S> {
    /// Load history from `store`, newest-first.
    ///
    /// A load failure is logged and yields an empty ledger.
    pub fn open(store: S) -> Self {
        let mut records = match store.load() {
            Ok(records) => records,
            Err(e) => {
                error!("failed to load rebalance history, starting empty: {e}");
                Vec::new()
            }
        };
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        debug!("rebalance history: {} record(s) loaded", records.len());
        Self { store, records }
    }

    /// Record a confirmed rebalance stamped with the current time.
    pub fn record(
        &mut self,
        strategy_id: &str,
        strategy_name: &str,
        trades: Vec<Trade>,
        pre_deviation: f64,
        post_deviation: f64,
    ) -> RebalanceHistoryRecord {
        self.record_at(
            Utc::now(),
            strategy_id,
            strategy_name,
            trades,
            pre_deviation,
            post_deviation,
        )
    }

    /// Record a rebalance with an explicit timestamp.
    pub fn record_at(
        &mut self,
        now: DateTime<Utc>,
        strategy_id: &str,
        strategy_name: &str,
        trades: Vec<Trade>,
        pre_deviation: f64,
        post_deviation: f64,
    ) -> RebalanceHistoryRecord {
        let record = RebalanceHistoryRecord::new(
            self.next_id(now),
            now,
            strategy_id,
            strategy_name,
            trades,
            pre_deviation,
            post_deviation,
        );
        info!(
            "recorded rebalance {} ({}): {} trade(s), deviation {:.2}% -> {:.2}%",
            record.id,
            record.strategy_id,
            record.trades.len(),
            record.pre_deviation,
            record.post_deviation,
        );
        self.records.insert(0, record.clone());
        self.persist();
        record
    }

    /// Millisecond epoch of `now`, bumped past any id already in use.
    fn next_id(&self, now: DateTime<Utc>) -> String {
        let mut candidate = now.timestamp_millis();
        loop {
            let id = candidate.to_string();
            if !self.records.iter().any(|r| r.id == id) {
                return id;
            }
            candidate += 1;
        }
    }

    /// All records, newest-first.
    pub fn list(&self) -> &[RebalanceHistoryRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&RebalanceHistoryRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Remove a record. Returns false (and writes nothing) if `id` is unknown.
    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        if self.records.len() == before {
            return false;
        }
        info!("deleted rebalance {id}");
        self.persist();
        true
    }

    /// Count and total deviation removed across every record.
    pub fn summarize(&self) -> RebalanceHistorySummary {
        RebalanceHistorySummary {
            total_count: self.records.len(),
            total_deviation_saved: self.records.iter().map(|r| r.deviation_saved()).sum(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn persist(&self) {
        if let Err(e) = self.store.save(&self.records) {
            error!("failed to save rebalance history: {e}");
        }
    }
}
