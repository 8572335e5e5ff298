//! Filter/search engine: free-text query plus cascading categorical filters
//! over the row store, producing an ordered subsequence and its running total.

use crate::engine::aggregate::{effective_amount, GroupBy};
use crate::ledger::AdjustmentLedger;
use crate::model::{Amount, LineItem};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The current filter selections.
///
/// Categorical filters are exact-match; an unset filter is no constraint. The
/// division choices depend on the selected agency, so changing the agency
/// clears the division selection (cascading), since the old value may no
/// longer be valid under the new agency.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    query: String,
    agency: Option<String>,
    division: Option<String>,
    source: Option<String>,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn agency(&self) -> Option<&str> {
        self.agency.as_deref()
    }

    pub fn division(&self) -> Option<&str> {
        self.division.as_deref()
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Sets the free-text query. Callers that re-evaluate on keystrokes should
    /// defer the evaluation through `engine::debounce`.
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Sets or clears the agency filter. Clears the division selection, whose
    /// valid value set depends on the agency.
    pub fn set_agency(&mut self, agency: Option<String>) {
        if self.agency != agency {
            self.division = None;
        }
        self.agency = agency;
    }

    pub fn set_division(&mut self, division: Option<String>) {
        self.division = division;
    }

    pub fn set_source(&mut self, source: Option<String>) {
        self.source = source;
    }

    /// Clears every selection and the query.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when the item passes the categorical filters, ignoring the one
    /// named by `except` (used to compute cascading filter options).
    fn matches_categoricals(&self, item: &LineItem, except: Option<GroupBy>) -> bool {
        let check = |field: GroupBy, selection: &Option<String>, value: &str| {
            except == Some(field) || selection.as_deref().map_or(true, |s| s == value)
        };
        check(GroupBy::Agency, &self.agency, item.agency())
            && check(GroupBy::Division, &self.division, item.division())
            && check(GroupBy::Source, &self.source, item.source())
    }

    /// True when the item passes the text query: case-insensitive substring,
    /// OR'd across every textual field. An empty query matches everything.
    fn matches_query(&self, item: &LineItem) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        let hit = |text: &str| text.to_lowercase().contains(&needle);
        hit(item.agency())
            || hit(item.division())
            || hit(item.source())
            || item.label().map(hit).unwrap_or(false)
    }

    fn matches(&self, item: &LineItem) -> bool {
        self.matches_categoricals(item, None) && self.matches_query(item)
    }
}

/// The filtered subsequence, in original ingestion order, plus its running
/// total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredRows<'a> {
    rows: Vec<&'a LineItem>,
    total: Amount,
}

impl<'a> FilteredRows<'a> {
    pub fn rows(&self) -> &[&'a LineItem] {
        &self.rows
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Applies the filter state to `rows`, summing the adjusted (or raw) amount
/// over the matches. Deterministic: same inputs, same subsequence, in
/// ingestion order.
pub fn apply<'a>(
    rows: &'a [LineItem],
    ledger: &AdjustmentLedger,
    state: &FilterState,
    adjusted: bool,
) -> FilteredRows<'a> {
    let mut matched = Vec::new();
    let mut total = Amount::ZERO;
    for item in rows {
        if state.matches(item) {
            total += effective_amount(item, ledger, adjusted);
            matched.push(item);
        }
    }
    FilteredRows {
        rows: matched,
        total,
    }
}

/// The available values for one categorical filter: distinct values of that
/// field among rows matching every *other* filter currently set, sorted
/// alphabetically. This is what makes the filters cascade.
pub fn options_for(rows: &[LineItem], state: &FilterState, field: GroupBy) -> Vec<String> {
    let mut values = BTreeSet::new();
    for item in rows {
        if state.matches_categoricals(item, Some(field)) && state.matches_query(item) {
            let value = match field {
                GroupBy::Agency => item.agency(),
                GroupBy::Division => item.division(),
                GroupBy::Source => item.source(),
            };
            if !value.is_empty() {
                values.insert(value.to_string());
            }
        }
    }
    values.into_iter().collect()
}
