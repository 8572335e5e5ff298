//! Normalizes arbitrary dataset JSON into strongly-typed line items.
//!
//! Exported datasets arrive with inconsistent field names ("Agency" vs
//! "agency" vs "category", amounts in millions vs whole units). Each field has
//! an explicit, ordered list of accepted aliases evaluated only here, at the
//! ingestion boundary; everything downstream sees `LineItem` and nothing else.

use crate::model::{Amount, ItemKind, LineItem, RowStore};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// Accepted aliases, in evaluation order, for each line-item field.
const AGENCY_ALIASES: &[&str] = &["agency", "Agency", "category", "Category"];
const DIVISION_ALIASES: &[&str] = &["division", "Division", "fund", "Fund"];
const SOURCE_ALIASES: &[&str] = &[
    "fundingSource",
    "funding_source",
    "Funding Source",
    "source",
    "Source",
    "type",
];
const LABEL_ALIASES: &[&str] = &["label", "Label", "lineItem", "line_item", "name", "Name"];
const KIND_ALIASES: &[&str] = &["kind", "type", "Type"];
/// Amounts expressed in millions of currency units.
const AMOUNT_MILLIONS_ALIASES: &[&str] = &["amountM", "amount_m", "AmountM", "amountMillions"];
/// Amounts expressed in whole currency units.
const AMOUNT_ALIASES: &[&str] = &["amount", "Amount"];

/// Optional sidecar carrying a "last updated" date string, displayed as-is.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(alias = "lastUpdated", alias = "Last Updated", alias = "updated", default)]
    pub last_updated: String,
}

/// Parses a dataset document into a `RowStore`.
///
/// The document may be a bare JSON array of row objects or an object with a
/// `rows` field containing that array. Rows missing both identity fields
/// (agency and division) are dropped silently; unparseable amounts coerce to
/// zero; unknown fields are dropped, never preserved.
pub fn parse_dataset(doc: &Value) -> RowStore {
    let rows = match doc {
        Value::Array(rows) => rows.as_slice(),
        Value::Object(obj) => match obj.get("rows") {
            Some(Value::Array(rows)) => rows.as_slice(),
            _ => &[],
        },
        _ => &[],
    };

    let mut items = Vec::with_capacity(rows.len());
    let mut dropped = 0usize;
    for row in rows {
        match parse_row(row) {
            Some(item) => items.push(item),
            None => dropped += 1,
        }
    }
    if dropped > 0 {
        debug!("Dropped {dropped} rows missing identity fields");
    }
    RowStore::new(items)
}

/// Normalizes one row object, or `None` when an identity field is missing.
fn parse_row(row: &Value) -> Option<LineItem> {
    let obj = row.as_object()?;

    let agency = first_text(obj, AGENCY_ALIASES)?;
    let division = first_text(obj, DIVISION_ALIASES)?;
    let source = first_text(obj, SOURCE_ALIASES).unwrap_or_default();
    let label = first_text(obj, LABEL_ALIASES);

    let kind = first_text(obj, KIND_ALIASES)
        .and_then(|s| s.to_lowercase().parse::<ItemKind>().ok())
        .unwrap_or_default();

    // Millions-denominated fields win over whole-unit fields when both exist.
    let amount = match first_value(obj, AMOUNT_MILLIONS_ALIASES) {
        Some(v) => Amount::from_millions(decimal_from_value(v)),
        None => first_value(obj, AMOUNT_ALIASES)
            .map(|v| Amount::new(decimal_from_value(v)))
            .unwrap_or_default(),
    };

    Some(LineItem::new(agency, division, source, label, amount, kind))
}

/// The first alias present with a non-empty string value.
fn first_text(obj: &serde_json::Map<String, Value>, aliases: &[&str]) -> Option<String> {
    for alias in aliases {
        if let Some(Value::String(s)) = obj.get(*alias) {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

/// The first alias present with any value.
fn first_value<'a>(obj: &'a serde_json::Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases.iter().find_map(|alias| obj.get(*alias))
}

/// Reads a numeric value from either a JSON number or loose currency text.
/// Anything else coerces to zero.
fn decimal_from_value(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => n
            .as_f64()
            .and_then(Decimal::from_f64)
            .unwrap_or_default(),
        Value::String(s) => Amount::parse_loose(s).value(),
        _ => Decimal::ZERO,
    }
}
