//! The adjustment ledger: committed hypothetical deltas, uncommitted draft
//! entry text, and named scenario snapshots.

use crate::model::{Amount, ItemKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Committed signed deltas keyed by line-item identity, plus the parallel
/// draft ledger of raw, possibly-invalid entry text.
///
/// Draft text is stored verbatim and affects nothing until `commit_all`
/// parses it. The committed map is what every adjusted-amount read uses.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentLedger {
    committed: BTreeMap<ItemKey, Amount>,
    #[serde(skip)]
    drafts: BTreeMap<ItemKey, String>,
}

impl AdjustmentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw entry text verbatim, without validation. Committed totals
    /// are unaffected until `commit_all`.
    pub fn set_draft(&mut self, key: ItemKey, raw: impl Into<String>) {
        self.drafts.insert(key, raw.into());
    }

    /// Parses every pending draft into a signed delta and overwrites the
    /// committed value for that key. Keys without a draft keep their prior
    /// committed value. Drafts are kept as the display text for their entry
    /// fields, so committing twice with unchanged text is a no-op the second
    /// time. Returns the number of entries committed.
    pub fn commit_all(&mut self) -> usize {
        let mut committed = 0;
        for (key, raw) in &self.drafts {
            let delta = Amount::parse_loose(raw);
            self.committed.insert(key.clone(), delta);
            committed += 1;
        }
        committed
    }

    /// Removes a key from both the committed and draft ledgers. Absent keys
    /// are not an error.
    pub fn remove(&mut self, key: &ItemKey) {
        self.committed.remove(key);
        self.drafts.remove(key);
    }

    /// Clears both ledgers entirely.
    pub fn reset_all(&mut self) {
        self.committed.clear();
        self.drafts.clear();
    }

    /// The committed delta for a key, zero when none exists.
    pub fn delta(&self, key: &ItemKey) -> Amount {
        self.committed.get(key).copied().unwrap_or_default()
    }

    /// The draft entry text for a key, if any.
    pub fn draft(&self, key: &ItemKey) -> Option<&str> {
        self.drafts.get(key).map(String::as_str)
    }

    pub fn committed(&self) -> &BTreeMap<ItemKey, Amount> {
        &self.committed
    }

    pub fn is_empty(&self) -> bool {
        self.committed.is_empty()
    }

    /// A deep copy of the committed deltas, for scenario snapshots.
    pub fn snapshot(&self) -> BTreeMap<ItemKey, Amount> {
        self.committed.clone()
    }

    /// Replaces the committed ledger with a snapshot and regenerates draft
    /// display text for each restored key (grouped thousands, whole units).
    pub fn restore(&mut self, snapshot: BTreeMap<ItemKey, Amount>) {
        self.drafts = snapshot
            .iter()
            .map(|(key, delta)| (key.clone(), delta.to_string()))
            .collect();
        self.committed = snapshot;
    }
}

/// A named, timestamped snapshot of committed adjustments. Later mutation of
/// the live ledger never alters a saved scenario.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    name: String,
    description: String,
    adjustments: BTreeMap<ItemKey, Amount>,
    created_at: DateTime<Utc>,
}

impl Scenario {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        adjustments: BTreeMap<ItemKey, Amount>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            adjustments,
            created_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn adjustments(&self) -> &BTreeMap<ItemKey, Amount> {
        &self.adjustments
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Session-held catalog of saved scenarios, keyed by name. Saving under an
/// existing name replaces the old scenario silently.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    scenarios: BTreeMap<String, Scenario>,
}

impl ScenarioCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, scenario: Scenario) {
        self.scenarios.insert(scenario.name().to_string(), scenario);
    }

    pub fn get(&self, name: &str) -> Option<&Scenario> {
        self.scenarios.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.scenarios.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(division: &str) -> ItemKey {
        ItemKey::new("Parks", division)
    }

    #[test]
    fn test_draft_does_not_affect_committed() {
        let mut ledger = AdjustmentLedger::new();
        ledger.set_draft(key("Ops"), "-5,000");
        assert!(ledger.is_empty());
        assert_eq!(ledger.delta(&key("Ops")), Amount::ZERO);
    }

    #[test]
    fn test_commit_parses_loose_text() {
        let mut ledger = AdjustmentLedger::new();
        ledger.set_draft(key("Ops"), "-$3,000,000");
        ledger.set_draft(key("Capital"), "not a number");
        assert_eq!(ledger.commit_all(), 2);
        assert_eq!(ledger.delta(&key("Ops")), Amount::from_units(-3_000_000));
        assert_eq!(ledger.delta(&key("Capital")), Amount::ZERO);
    }

    #[test]
    fn test_commit_is_idempotent() {
        let mut ledger = AdjustmentLedger::new();
        ledger.set_draft(key("Ops"), "250");
        ledger.commit_all();
        let first = ledger.committed().clone();
        ledger.commit_all();
        assert_eq!(ledger.committed(), &first);
    }

    #[test]
    fn test_commit_keeps_undrafted_values() {
        let mut ledger = AdjustmentLedger::new();
        let mut snapshot = BTreeMap::new();
        snapshot.insert(key("Ops"), Amount::from_units(100));
        ledger.restore(snapshot);
        ledger.drafts.clear();

        // "Ops" has no pending draft; its committed value must survive.
        ledger.set_draft(key("Capital"), "200");
        ledger.commit_all();
        assert_eq!(ledger.delta(&key("Ops")), Amount::from_units(100));
        assert_eq!(ledger.delta(&key("Capital")), Amount::from_units(200));
    }

    #[test]
    fn test_remove_is_quiet_when_absent() {
        let mut ledger = AdjustmentLedger::new();
        ledger.remove(&key("Nope"));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_reset_clears_both_ledgers() {
        let mut ledger = AdjustmentLedger::new();
        ledger.set_draft(key("Ops"), "100");
        ledger.commit_all();
        ledger.reset_all();
        assert!(ledger.is_empty());
        assert_eq!(ledger.draft(&key("Ops")), None);
    }

    #[test]
    fn test_snapshot_is_deep() {
        let mut ledger = AdjustmentLedger::new();
        ledger.set_draft(key("Ops"), "100");
        ledger.commit_all();
        let snap = ledger.snapshot();
        ledger.set_draft(key("Ops"), "999");
        ledger.commit_all();
        assert_eq!(snap.get(&key("Ops")), Some(&Amount::from_units(100)));
    }

    #[test]
    fn test_restore_regenerates_draft_text() {
        let mut ledger = AdjustmentLedger::new();
        ledger.set_draft(key("Ops"), "-3000000");
        ledger.commit_all();
        let snap = ledger.snapshot();
        ledger.reset_all();

        ledger.restore(snap);
        assert_eq!(ledger.delta(&key("Ops")), Amount::from_units(-3_000_000));
        assert_eq!(ledger.draft(&key("Ops")), Some("-3,000,000"));
    }

    #[test]
    fn test_catalog_overwrites_same_name() {
        let mut catalog = ScenarioCatalog::new();
        let mut adjustments = BTreeMap::new();
        adjustments.insert(key("Ops"), Amount::from_units(1));
        catalog.insert(Scenario::new("cuts", "", adjustments.clone()));

        adjustments.insert(key("Capital"), Amount::from_units(2));
        catalog.insert(Scenario::new("cuts", "round two", adjustments));

        assert_eq!(catalog.names(), vec!["cuts"]);
        assert_eq!(catalog.get("cuts").unwrap().adjustments().len(), 2);
    }
}
