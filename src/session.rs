//! The owned session context.
//!
//! One `Session` holds everything mutable for a dashboard session: the
//! immutable row store, the adjustment and draft ledgers, the scenario
//! catalog and the notification queue. Boundary operations live here and map
//! every failure to a notification; the pure engine functions are reached
//! through explicit parameters, never ambient state.

use crate::engine::aggregate::{
    self, AggregateNode, BudgetSummary, DrillState, GroupBy,
};
use crate::engine::filter::{self, FilteredRows, FilterState};
use crate::ledger::{AdjustmentLedger, Scenario, ScenarioCatalog};
use crate::model::{Amount, ItemKey, Metadata, RowStore};
use crate::notify::{Notifications, Severity};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Default, Clone)]
pub struct Session {
    rows: RowStore,
    ledger: AdjustmentLedger,
    scenarios: ScenarioCatalog,
    notifications: Notifications,
    metadata: Option<Metadata>,
}

impl Session {
    /// Creates a session over a loaded row store. The row store is never
    /// mutated afterwards.
    pub fn new(rows: RowStore) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn rows(&self) -> &RowStore {
        &self.rows
    }

    pub fn ledger(&self) -> &AdjustmentLedger {
        &self.ledger
    }

    pub fn scenarios(&self) -> &ScenarioCatalog {
        &self.scenarios
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    pub fn notifications_mut(&mut self) -> &mut Notifications {
        &mut self.notifications
    }

    /// The "last updated" date string from the metadata sidecar, displayed
    /// as-is.
    pub fn last_updated(&self) -> Option<&str> {
        self.metadata.as_ref().map(|m| m.last_updated.as_str())
    }

    // ----- adjustment operations ---------------------------------------

    /// Stores raw entry text for a line item without validating it.
    pub fn set_draft(&mut self, key: ItemKey, raw: impl Into<String>) {
        self.ledger.set_draft(key, raw);
    }

    /// Commits every pending draft and reports success.
    pub fn commit_all(&mut self) {
        let committed = self.ledger.commit_all();
        debug!("Committed {committed} adjustments");
        self.notifications
            .push("Adjustments applied", Severity::Success);
    }

    /// Removes one adjustment from both ledgers. Quiet when absent.
    pub fn remove_adjustment(&mut self, key: &ItemKey) {
        self.ledger.remove(key);
    }

    /// Clears both ledgers.
    pub fn reset_adjustments(&mut self) {
        self.ledger.reset_all();
        self.notifications
            .push("All adjustments cleared", Severity::Info);
    }

    // ----- scenarios ----------------------------------------------------

    /// Snapshots the committed ledger under `name`. Fails with a user-visible
    /// error (state unchanged) when the ledger is empty or the name is blank;
    /// an existing scenario of the same name is replaced silently. Returns
    /// whether the save happened.
    pub fn save_scenario(&mut self, name: &str, description: &str) -> bool {
        if name.trim().is_empty() {
            self.notifications
                .push("A scenario needs a name", Severity::Error);
            return false;
        }
        if self.ledger.is_empty() {
            self.notifications
                .push("There are no adjustments to save", Severity::Error);
            return false;
        }
        self.scenarios
            .insert(Scenario::new(name, description, self.ledger.snapshot()));
        self.notifications
            .push(format!("Saved scenario \"{name}\""), Severity::Success);
        true
    }

    /// Replaces the committed ledger with a saved scenario's snapshot and
    /// regenerates draft display text. An unknown name is reported and leaves
    /// all state unchanged. Returns whether the load happened.
    pub fn load_scenario(&mut self, name: &str) -> bool {
        let snapshot: BTreeMap<ItemKey, Amount> = match self.scenarios.get(name) {
            Some(scenario) => scenario.adjustments().clone(),
            None => {
                self.notifications
                    .push(format!("No scenario named \"{name}\""), Severity::Error);
                return false;
            }
        };
        self.ledger.restore(snapshot);
        self.notifications
            .push(format!("Loaded scenario \"{name}\""), Severity::Info);
        true
    }

    // ----- derived views -------------------------------------------------

    /// Whole-dataset revenue/spending/surplus, original and adjusted.
    pub fn summary(&self) -> BudgetSummary {
        aggregate::summarize(self.rows.rows(), &self.ledger)
    }

    /// Grouped totals across one dimension.
    pub fn group_totals(&self, group_by: GroupBy, adjusted: bool) -> BTreeMap<String, Amount> {
        aggregate::group_totals(self.rows.rows(), &self.ledger, group_by, adjusted)
    }

    /// The two-level overview tree for treemap/donut views.
    pub fn overview_tree(&self, adjusted: bool) -> AggregateNode {
        aggregate::overview_tree(self.rows.rows(), &self.ledger, adjusted)
    }

    /// The level-two dataset for a drill-down selection.
    pub fn drill_down(&self, state: &DrillState, adjusted: bool) -> Option<AggregateNode> {
        aggregate::drill_down(self.rows.rows(), &self.ledger, state, adjusted)
    }

    /// The filtered subsequence and its running total for the table view.
    pub fn filter(&self, state: &FilterState, adjusted: bool) -> FilteredRows<'_> {
        filter::apply(self.rows.rows(), &self.ledger, state, adjusted)
    }

    /// Available values for a cascading categorical filter.
    pub fn filter_options(&self, state: &FilterState, field: GroupBy) -> Vec<String> {
        filter::options_for(self.rows.rows(), state, field)
    }
}
