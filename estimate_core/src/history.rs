//! # Calculation History Ledger
//!
//! Append-only record of every evaluation performed, bounded to a rolling
//! window of the last 100 entries: a ring buffer, not a database of
//! record. Entries are created once and never mutated except the `starred`
//! flag. Starring does not exempt an entry from eviction; results worth
//! keeping go through [`SavedCalculation`] instead.
//!
//! The ledger is plain data with no interior locking. It is scoped to a
//! caller session; a caller sharing one across threads wraps it in a
//! `Mutex` (single-writer append discipline).
//!
//! ## Example
//!
//! ```rust
//! use std::collections::HashMap;
//! use estimate_core::estimators::CalculatorType;
//! use estimate_core::history::HistoryLedger;
//!
//! let mut ledger = HistoryLedger::new();
//! let mut inputs = HashMap::new();
//! inputs.insert("L".to_string(), serde_json::json!(12.0));
//!
//! let id = ledger.record(
//!     CalculatorType::Formula("beam-max-moment".to_string()),
//!     inputs,
//!     1800.0,
//!     "M_max = wL^2/8",
//! );
//! ledger.toggle_star(id).unwrap();
//! assert!(ledger.entries().next().unwrap().starred);
//! ```

use std::collections::HashMap;
use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::estimators::CalculatorType;

/// Maximum entries retained by the ledger; oldest evicted first.
pub const HISTORY_CAPACITY: usize = 100;

/// One recorded evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationHistoryEntry {
    /// Unique entry id
    pub id: Uuid,
    /// When the evaluation ran
    pub timestamp: DateTime<Utc>,
    /// Which calculator or formula produced the result
    pub calculator_type: CalculatorType,
    /// Inputs as supplied, keyed by field or symbol name
    pub inputs: HashMap<String, serde_json::Value>,
    /// Numeric result
    pub result: f64,
    /// Human-readable formula or description
    pub description: String,
    /// User-toggled flag; does not affect eviction
    pub starred: bool,
}

/// Bounded ring buffer of evaluation records.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryLedger {
    entries: VecDeque<CalculationHistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an evaluation record, evicting the oldest entry beyond
    /// capacity. Returns the new entry's id.
    pub fn record(
        &mut self,
        calculator_type: CalculatorType,
        inputs: HashMap<String, serde_json::Value>,
        result: f64,
        description: impl Into<String>,
    ) -> Uuid {
        let entry = CalculationHistoryEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            calculator_type,
            inputs,
            result,
            description: description.into(),
            starred: false,
        };
        let id = entry.id;

        // A ledger deserialized from stored data may arrive over capacity,
        // so drain rather than popping a single slot.
        while self.entries.len() >= HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
        id
    }

    /// Iterate entries, most recent first.
    pub fn entries(&self) -> impl Iterator<Item = &CalculationHistoryEntry> {
        self.entries.iter().rev()
    }

    /// Number of retained entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by id.
    pub fn get(&self, id: Uuid) -> Option<&CalculationHistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Flip the `starred` flag in place. Returns the new flag value.
    pub fn toggle_star(&mut self, id: Uuid) -> EstimateResult<bool> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| EstimateError::not_found("History entry", id))?;
        entry.starred = !entry.starred;
        Ok(entry.starred)
    }

    /// Entries currently starred, most recent first.
    pub fn starred(&self) -> impl Iterator<Item = &CalculationHistoryEntry> {
        self.entries().filter(|e| e.starred)
    }
}

/// A named, reusable calculation preserved by explicit user action,
/// separate from the transient history ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCalculation {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub calculator_type: CalculatorType,
    pub inputs: HashMap<String, serde_json::Value>,
    pub result: f64,
    pub tags: Vec<String>,
    pub created: DateTime<Utc>,
    pub last_used: DateTime<Utc>,
    pub use_count: u64,
}

/// Store of saved calculations, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SavedCalculationStore {
    saved: HashMap<Uuid, SavedCalculation>,
}

impl SavedCalculationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a calculation under a name. Returns the assigned id.
    pub fn save(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        calculator_type: CalculatorType,
        inputs: HashMap<String, serde_json::Value>,
        result: f64,
        tags: Vec<String>,
    ) -> Uuid {
        let now = Utc::now();
        let calc = SavedCalculation {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            calculator_type,
            inputs,
            result,
            tags,
            created: now,
            last_used: now,
            use_count: 0,
        };
        let id = calc.id;
        self.saved.insert(id, calc);
        id
    }

    pub fn get(&self, id: Uuid) -> Option<&SavedCalculation> {
        self.saved.get(&id)
    }

    /// Record a reuse: bump `use_count` and refresh `last_used`.
    pub fn mark_used(&mut self, id: Uuid) -> EstimateResult<&SavedCalculation> {
        let calc = self
            .saved
            .get_mut(&id)
            .ok_or_else(|| EstimateError::not_found("Saved calculation", id))?;
        calc.use_count += 1;
        calc.last_used = Utc::now();
        Ok(calc)
    }

    /// Remove a saved calculation. Returns it if it existed.
    pub fn delete(&mut self, id: Uuid) -> Option<SavedCalculation> {
        self.saved.remove(&id)
    }

    /// All saved calculations carrying a tag.
    pub fn find_by_tag(&self, tag: &str) -> Vec<&SavedCalculation> {
        self.saved
            .values()
            .filter(|c| c.tags.iter().any(|t| t == tag))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_n(ledger: &mut HistoryLedger, n: usize) -> Vec<Uuid> {
        (0..n)
            .map(|i| {
                ledger.record(
                    CalculatorType::ConcreteVolume,
                    HashMap::new(),
                    i as f64,
                    format!("entry {}", i),
                )
            })
            .collect()
    }

    #[test]
    fn test_eviction_law() {
        let mut ledger = HistoryLedger::new();
        let ids = record_n(&mut ledger, 105);
        assert_eq!(ledger.len(), 100);
        // The 5 oldest are gone; the rest survive.
        for id in &ids[..5] {
            assert!(ledger.get(*id).is_none());
        }
        for id in &ids[5..] {
            assert!(ledger.get(*id).is_some());
        }
    }

    #[test]
    fn test_most_recent_first() {
        let mut ledger = HistoryLedger::new();
        record_n(&mut ledger, 3);
        let results: Vec<f64> = ledger.entries().map(|e| e.result).collect();
        assert_eq!(results, vec![2.0, 1.0, 0.0]);
    }

    #[test]
    fn test_toggle_star() {
        let mut ledger = HistoryLedger::new();
        let ids = record_n(&mut ledger, 2);
        assert!(ledger.toggle_star(ids[0]).unwrap());
        assert!(ledger.get(ids[0]).unwrap().starred);
        assert!(!ledger.toggle_star(ids[0]).unwrap());

        let err = ledger.toggle_star(Uuid::new_v4()).unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_starring_does_not_prevent_eviction() {
        let mut ledger = HistoryLedger::new();
        let first = ledger.record(
            CalculatorType::Sealcoat,
            HashMap::new(),
            1.0,
            "starred but doomed",
        );
        ledger.toggle_star(first).unwrap();
        record_n(&mut ledger, HISTORY_CAPACITY);
        assert!(ledger.get(first).is_none());
    }

    #[test]
    fn test_record_shrinks_oversized_ledger() {
        // Stored data may carry more than the capacity; the next record
        // must bring the ledger back under the cap, not just swap one slot.
        let mut ledger = HistoryLedger::new();
        record_n(&mut ledger, 5);
        let mut json = serde_json::to_value(&ledger).unwrap();
        let seed = json["entries"].as_array().unwrap().clone();
        let bloated: Vec<serde_json::Value> = seed
            .iter()
            .cycle()
            .take(HISTORY_CAPACITY + 7)
            .cloned()
            .collect();
        json["entries"] = serde_json::Value::Array(bloated);

        let mut oversized: HistoryLedger = serde_json::from_value(json).unwrap();
        assert_eq!(oversized.len(), HISTORY_CAPACITY + 7);

        oversized.record(CalculatorType::Sealcoat, HashMap::new(), 9.0, "trim");
        assert_eq!(oversized.len(), HISTORY_CAPACITY);
        assert_eq!(oversized.entries().next().unwrap().result, 9.0);
    }

    #[test]
    fn test_ledger_serialization() {
        let mut ledger = HistoryLedger::new();
        record_n(&mut ledger, 3);
        let json = serde_json::to_string(&ledger).unwrap();
        let roundtrip: HistoryLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip.len(), 3);
    }

    #[test]
    fn test_saved_calculation_reuse() {
        let mut store = SavedCalculationStore::new();
        let id = store.save(
            "Main lot sealcoat",
            "Two coats, good asphalt",
            CalculatorType::Sealcoat,
            HashMap::new(),
            250.0,
            vec!["sealcoat".to_string(), "main-lot".to_string()],
        );

        assert_eq!(store.get(id).unwrap().use_count, 0);
        store.mark_used(id).unwrap();
        store.mark_used(id).unwrap();
        let calc = store.get(id).unwrap();
        assert_eq!(calc.use_count, 2);
        assert!(calc.last_used >= calc.created);
    }

    #[test]
    fn test_saved_find_by_tag() {
        let mut store = SavedCalculationStore::new();
        store.save(
            "A",
            "",
            CalculatorType::Striping,
            HashMap::new(),
            1.0,
            vec!["striping".to_string()],
        );
        store.save(
            "B",
            "",
            CalculatorType::Sealcoat,
            HashMap::new(),
            2.0,
            vec!["sealcoat".to_string()],
        );
        assert_eq!(store.find_by_tag("striping").len(), 1);
        assert_eq!(store.find_by_tag("nothing").len(), 0);
    }

    #[test]
    fn test_saved_delete_and_missing() {
        let mut store = SavedCalculationStore::new();
        let id = store.save(
            "A",
            "",
            CalculatorType::Rebar,
            HashMap::new(),
            1.0,
            vec![],
        );
        assert!(store.delete(id).is_some());
        assert!(store.get(id).is_none());
        assert_eq!(
            store.mark_used(id).unwrap_err().error_code(),
            "NOT_FOUND"
        );
    }
}
