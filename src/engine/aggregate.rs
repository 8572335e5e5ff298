//! Aggregation engine: adjusted amounts, grouped totals, drill-down trees and
//! the before/after budget summary.
//!
//! Everything here is a pure function over the current row store and ledger.
//! These are recomputed wholesale on every user action, so they must be total
//! over their input domains: empty groups and zero parents resolve to zero
//! rather than faulting.

use crate::ledger::AdjustmentLedger;
use crate::model::{Amount, ItemKind, LineItem};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// The chart palette. Group colors are assigned by hashing the group name, so
/// a name keeps its color across re-renders and filter changes.
const PALETTE: &[&str] = &[
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// The grouping dimensions a view can aggregate across.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum GroupBy {
    #[default]
    Agency,
    Division,
    Source,
}

serde_plain::derive_display_from_serialize!(GroupBy);
serde_plain::derive_fromstr_from_deserialize!(GroupBy);

impl GroupBy {
    fn field<'a>(&self, item: &'a LineItem) -> &'a str {
        match self {
            GroupBy::Agency => item.agency(),
            GroupBy::Division => item.division(),
            GroupBy::Source => item.source(),
        }
    }
}

/// The adjusted amount for a line item: original plus committed delta, floored
/// at zero. Every read of an adjusted value goes through this.
pub fn adjusted_amount(item: &LineItem, ledger: &AdjustmentLedger) -> Amount {
    (item.amount() + ledger.delta(&item.key())).clamp_non_negative()
}

/// The amount a view should use for an item: adjusted when `adjusted` is set,
/// otherwise the raw original.
pub fn effective_amount(item: &LineItem, ledger: &AdjustmentLedger, adjusted: bool) -> Amount {
    if adjusted {
        adjusted_amount(item, ledger)
    } else {
        item.amount()
    }
}

/// Partitions `rows` by the grouping dimension and sums each partition.
/// Consumers re-sort by descending total or alphabetically per view, so the
/// map's own ordering carries no meaning.
pub fn group_totals(
    rows: &[LineItem],
    ledger: &AdjustmentLedger,
    group_by: GroupBy,
    adjusted: bool,
) -> BTreeMap<String, Amount> {
    let mut totals: BTreeMap<String, Amount> = BTreeMap::new();
    for item in rows {
        let amount = effective_amount(item, ledger, adjusted);
        *totals.entry(group_by.field(item).to_string()).or_default() += amount;
    }
    totals
}

/// A leaf's fraction of its parent total. Zero when the parent is zero; this
/// never faults on degenerate input.
pub fn share(leaf: Amount, parent: Amount) -> Decimal {
    if parent.is_zero() {
        Decimal::ZERO
    } else {
        leaf.value() / parent.value()
    }
}

/// Deterministic palette color for a group display name. Same name, same
/// color, regardless of iteration order or filtering state.
pub fn color_for(name: &str) -> &'static str {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    PALETTE[(hasher.finish() % PALETTE.len() as u64) as usize]
}

/// One node of a hierarchical visualization dataset (treemap, donut).
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct AggregateNode {
    name: String,
    total: Amount,
    /// Present when every row under this node shares a kind; absent when
    /// revenue and spending are mixed at this level.
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ItemKind>,
    color: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    children: Vec<AggregateNode>,
}

impl AggregateNode {
    fn new(name: impl Into<String>, total: Amount, kind: Option<ItemKind>) -> Self {
        let name = name.into();
        let color = color_for(&name).to_string();
        Self {
            name,
            total,
            kind,
            color,
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn kind(&self) -> Option<ItemKind> {
        self.kind
    }

    pub fn color(&self) -> &str {
        &self.color
    }

    pub fn children(&self) -> &[AggregateNode] {
        &self.children
    }

    /// This node's fraction of `parent_total`; zero when the parent is zero.
    pub fn share_of(&self, parent_total: Amount) -> Decimal {
        share(self.total, parent_total)
    }
}

/// Groups `rows` into leaf nodes across one dimension, tagging each leaf with
/// its kind when unmixed.
fn group_nodes(
    rows: &[LineItem],
    ledger: &AdjustmentLedger,
    group_by: GroupBy,
    adjusted: bool,
) -> Vec<AggregateNode> {
    let mut totals: BTreeMap<String, (Amount, Option<ItemKind>, bool)> = BTreeMap::new();
    for item in rows {
        let amount = effective_amount(item, ledger, adjusted);
        let entry = totals
            .entry(group_by.field(item).to_string())
            .or_insert((Amount::ZERO, Some(item.kind()), false));
        entry.0 += amount;
        if entry.1 != Some(item.kind()) {
            entry.2 = true; // mixed kinds at this level
        }
    }
    totals
        .into_iter()
        .map(|(name, (total, kind, mixed))| {
            AggregateNode::new(name, total, if mixed { None } else { kind })
        })
        .collect()
}

/// The two-level overview tree: agencies at level one, each agency's
/// divisions at level two.
pub fn overview_tree(rows: &[LineItem], ledger: &AdjustmentLedger, adjusted: bool) -> AggregateNode {
    let total = rows
        .iter()
        .map(|item| effective_amount(item, ledger, adjusted))
        .sum();
    let mut root = AggregateNode::new("Budget", total, None);
    let mut by_agency: BTreeMap<&str, Vec<LineItem>> = BTreeMap::new();
    for item in rows {
        by_agency.entry(item.agency()).or_default().push(item.clone());
    }
    for (agency, agency_rows) in by_agency {
        let agency_total = agency_rows
            .iter()
            .map(|item| effective_amount(item, ledger, adjusted))
            .sum();
        let mut node = AggregateNode::new(agency, agency_total, unmixed_kind(&agency_rows));
        node.children = group_nodes(&agency_rows, ledger, GroupBy::Division, adjusted);
        root.children.push(node);
    }
    root
}

fn unmixed_kind(rows: &[LineItem]) -> Option<ItemKind> {
    let mut kinds = rows.iter().map(LineItem::kind);
    let first = kinds.next()?;
    kinds.all(|k| k == first).then_some(first)
}

/// Drill-down navigation state: the selected level-one agency and the active
/// level-two dimension. Selecting a different agency resets the sub-dimension
/// to its default (Division), since the prior choice belonged to another
/// context.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct DrillState {
    selected: Option<String>,
    sub_dimension: GroupBy,
}

impl Default for DrillState {
    fn default() -> Self {
        Self::new()
    }
}

impl DrillState {
    pub fn new() -> Self {
        Self {
            selected: None,
            sub_dimension: GroupBy::Division,
        }
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn sub_dimension(&self) -> GroupBy {
        self.sub_dimension
    }

    /// Enters (or switches) the level-two view for an agency.
    pub fn select(&mut self, agency: impl Into<String>) {
        let agency = agency.into();
        if self.selected.as_deref() != Some(agency.as_str()) {
            self.sub_dimension = GroupBy::Division;
        }
        self.selected = Some(agency);
    }

    /// Switches the level-two dimension (division or source) for the current
    /// selection. Agency is not a valid sub-dimension and is ignored.
    pub fn set_sub_dimension(&mut self, dimension: GroupBy) {
        if dimension != GroupBy::Agency {
            self.sub_dimension = dimension;
        }
    }

    /// Returns to the level-one view.
    pub fn clear(&mut self) {
        self.selected = None;
        self.sub_dimension = GroupBy::Division;
    }
}

/// The level-two dataset for the drill state's selected agency, aggregated
/// across its active sub-dimension. `None` until an agency is selected.
pub fn drill_down(
    rows: &[LineItem],
    ledger: &AdjustmentLedger,
    state: &DrillState,
    adjusted: bool,
) -> Option<AggregateNode> {
    let agency = state.selected()?;
    let subset: Vec<LineItem> = rows
        .iter()
        .filter(|item| item.agency() == agency)
        .cloned()
        .collect();
    let total = subset
        .iter()
        .map(|item| effective_amount(item, ledger, adjusted))
        .sum();
    let mut node = AggregateNode::new(agency, total, unmixed_kind(&subset));
    node.children = group_nodes(&subset, ledger, state.sub_dimension(), adjusted);
    Some(node)
}

/// Revenue, spending and the surplus between them. A negative surplus means
/// spending exceeds revenue.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    revenue: Amount,
    spending: Amount,
}

impl Totals {
    pub fn revenue(&self) -> Amount {
        self.revenue
    }

    pub fn spending(&self) -> Amount {
        self.spending
    }

    pub fn surplus(&self) -> Amount {
        self.revenue - self.spending
    }
}

/// Whole-dataset totals in both states, for before/after comparison displays.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    original: Totals,
    adjusted: Totals,
}

impl BudgetSummary {
    pub fn original(&self) -> Totals {
        self.original
    }

    pub fn adjusted(&self) -> Totals {
        self.adjusted
    }
}

/// Computes the before/after summary across the entire row store.
pub fn summarize(rows: &[LineItem], ledger: &AdjustmentLedger) -> BudgetSummary {
    let mut summary = BudgetSummary::default();
    for item in rows {
        let original = item.amount();
        let adjusted = adjusted_amount(item, ledger);
        match item.kind() {
            ItemKind::Revenue => {
                summary.original.revenue += original;
                summary.adjusted.revenue += adjusted;
            }
            ItemKind::Spending => {
                summary.original.spending += original;
                summary.adjusted.spending += adjusted;
            }
        }
    }
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKey;
    use crate::test::sample_rows;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn ledger_with(key: ItemKey, text: &str) -> AdjustmentLedger {
        let mut ledger = AdjustmentLedger::new();
        ledger.set_draft(key, text);
        ledger.commit_all();
        ledger
    }

    #[test]
    fn test_adjusted_amount_applies_delta() {
        // Dataset scenario: amountM=10 with a -3,000,000 delta adjusts to 7M.
        let rows = sample_rows();
        let ledger = ledger_with(ItemKey::new("A", "F1"), "-3,000,000");
        let f1 = rows.iter().find(|r| r.division() == "F1").unwrap();
        assert_eq!(
            adjusted_amount(f1, &ledger).in_millions(),
            Decimal::from(7)
        );
    }

    #[test]
    fn test_adjusted_amount_clamps_at_zero() {
        let rows = sample_rows();
        let ledger = ledger_with(ItemKey::new("A", "F2"), "-20,000,000");
        let f2 = rows.iter().find(|r| r.division() == "F2").unwrap();
        assert_eq!(adjusted_amount(f2, &ledger), Amount::ZERO);
    }

    #[test]
    fn test_group_totals_category_scenario() {
        let rows = sample_rows();
        let ledger = ledger_with(ItemKey::new("A", "F1"), "-3,000,000");
        let adjusted = group_totals(&rows, &ledger, GroupBy::Agency, true);
        assert_eq!(adjusted.get("A").unwrap().in_millions(), Decimal::from(12));
        let original = group_totals(&rows, &ledger, GroupBy::Agency, false);
        assert_eq!(original.get("A").unwrap().in_millions(), Decimal::from(15));
    }

    #[test]
    fn test_group_totals_sum_invariant() {
        let rows = sample_rows();
        let ledger = ledger_with(ItemKey::new("A", "F1"), "-1,234,567");
        let by_division = group_totals(&rows, &ledger, GroupBy::Division, true);
        let group_sum: Amount = by_division.values().copied().sum();
        let row_sum: Amount = rows.iter().map(|r| adjusted_amount(r, &ledger)).sum();
        assert_eq!(group_sum, row_sum);
    }

    #[test]
    fn test_share_zero_parent() {
        assert_eq!(share(Amount::from_units(5), Amount::ZERO), Decimal::ZERO);
        assert_eq!(
            share(Amount::from_units(1), Amount::from_units(4)),
            Decimal::from_str("0.25").unwrap()
        );
    }

    #[test]
    fn test_color_is_stable() {
        let c1 = color_for("Parks and Recreation");
        let c2 = color_for("Parks and Recreation");
        assert_eq!(c1, c2);
        assert!(PALETTE.contains(&c1));
    }

    #[test]
    fn test_overview_tree_two_levels() {
        let rows = sample_rows();
        let ledger = AdjustmentLedger::new();
        let tree = overview_tree(&rows, &ledger, true);
        assert_eq!(tree.total().in_millions(), Decimal::from(23));
        let agency_a = tree.children().iter().find(|n| n.name() == "A").unwrap();
        assert_eq!(agency_a.total().in_millions(), Decimal::from(15));
        let division_names: Vec<&str> =
            agency_a.children().iter().map(|n| n.name()).collect();
        assert_eq!(division_names, vec!["F1", "F2"]);
    }

    #[test]
    fn test_leaf_kind_tag_when_unmixed() {
        let rows = sample_rows();
        let ledger = AdjustmentLedger::new();
        let tree = overview_tree(&rows, &ledger, true);
        // Root mixes revenue and spending, so no kind tag.
        assert_eq!(tree.kind(), None);
        let agency_a = tree.children().iter().find(|n| n.name() == "A").unwrap();
        assert_eq!(agency_a.kind(), Some(ItemKind::Spending));
    }

    #[test]
    fn test_drill_down_by_source() {
        let rows = sample_rows();
        let ledger = AdjustmentLedger::new();
        let mut state = DrillState::new();
        assert!(drill_down(&rows, &ledger, &state, true).is_none());

        state.select("A");
        state.set_sub_dimension(GroupBy::Source);
        let node = drill_down(&rows, &ledger, &state, true).unwrap();
        assert_eq!(node.name(), "A");
        assert!(node.children().iter().any(|n| n.name() == "General Fund"));
    }

    #[test]
    fn test_selecting_new_agency_resets_sub_dimension() {
        let mut state = DrillState::new();
        state.select("A");
        state.set_sub_dimension(GroupBy::Source);
        state.select("B");
        assert_eq!(state.sub_dimension(), GroupBy::Division);

        // Re-selecting the same agency keeps the chosen dimension.
        state.set_sub_dimension(GroupBy::Source);
        state.select("B");
        assert_eq!(state.sub_dimension(), GroupBy::Source);
    }

    #[test]
    fn test_agency_is_not_a_sub_dimension() {
        let mut state = DrillState::new();
        state.select("A");
        state.set_sub_dimension(GroupBy::Agency);
        assert_eq!(state.sub_dimension(), GroupBy::Division);
    }

    #[test]
    fn test_summary_before_after() {
        let rows = sample_rows();
        let ledger = ledger_with(ItemKey::new("A", "F1"), "-3,000,000");
        let summary = summarize(&rows, &ledger);
        assert_eq!(
            summary.original().spending().in_millions(),
            Decimal::from(15)
        );
        assert_eq!(
            summary.adjusted().spending().in_millions(),
            Decimal::from(12)
        );
        assert_eq!(
            summary.original().revenue().in_millions(),
            Decimal::from(8)
        );
        // Deficit convention: negative surplus means spending exceeds revenue.
        assert_eq!(
            summary.original().surplus().in_millions(),
            Decimal::from(-7)
        );
        assert_eq!(
            summary.adjusted().surplus().in_millions(),
            Decimal::from(-4)
        );
    }

    #[test]
    fn test_empty_rows_are_safe() {
        let ledger = AdjustmentLedger::new();
        let tree = overview_tree(&[], &ledger, true);
        assert!(tree.children().is_empty());
        assert!(tree.total().is_zero());
        assert_eq!(summarize(&[], &ledger), BudgetSummary::default());
    }
}
