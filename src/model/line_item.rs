//! The core budget row types: `LineItem`, its composite identity key, and the
//! immutable `RowStore` holding every line item for the session.

use crate::model::Amount;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Whether a line item represents money coming in or going out.
#[derive(
    Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Revenue,
    #[default]
    Spending,
}

serde_plain::derive_display_from_serialize!(ItemKind);
serde_plain::derive_fromstr_from_deserialize!(ItemKind);

/// The identity key used to address a single line item's adjustment.
///
/// Division (fund) names are not guaranteed unique across agencies, so the key
/// is the composite of both fields. An adjustment keyed this way can never
/// silently apply to a same-named fund in a different agency.
///
/// Serializes as `"Agency/Division"` so ledgers and scenarios keyed by it are
/// plain JSON objects.
#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ItemKey {
    agency: String,
    division: String,
}

impl Serialize for ItemKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        match s.split_once('/') {
            Some((agency, division)) => Ok(ItemKey::new(agency, division)),
            None => Err(serde::de::Error::custom(format!(
                "expected \"Agency/Division\", got \"{s}\""
            ))),
        }
    }
}

impl ItemKey {
    pub fn new(agency: impl Into<String>, division: impl Into<String>) -> Self {
        Self {
            agency: agency.into(),
            division: division.into(),
        }
    }

    pub fn agency(&self) -> &str {
        &self.agency
    }

    pub fn division(&self) -> &str {
        &self.division
    }
}

impl Display for ItemKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.agency, self.division)
    }
}

/// A single budget line item. Immutable once ingested; hypothetical changes
/// live in the adjustment ledger, never here.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LineItem {
    agency: String,
    division: String,
    source: String,
    label: Option<String>,
    amount: Amount,
    kind: ItemKind,
}

impl LineItem {
    pub fn new(
        agency: impl Into<String>,
        division: impl Into<String>,
        source: impl Into<String>,
        label: Option<String>,
        amount: Amount,
        kind: ItemKind,
    ) -> Self {
        Self {
            agency: agency.into(),
            division: division.into(),
            source: source.into(),
            label,
            amount,
            kind,
        }
    }

    pub fn agency(&self) -> &str {
        &self.agency
    }

    pub fn division(&self) -> &str {
        &self.division
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// The original, unadjusted amount in whole currency units.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// The composite identity key used by the adjustment ledger.
    pub fn key(&self) -> ItemKey {
        ItemKey::new(&self.agency, &self.division)
    }
}

/// The immutable set of line items for the session, in ingestion order.
///
/// Populated once by the loader and never mutated afterwards. Every derived
/// view (grouped totals, filters, windows) is recomputed from this plus the
/// current ledger, so there are no partial-state hazards.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct RowStore {
    rows: Vec<LineItem>,
}

impl RowStore {
    pub fn new(rows: Vec<LineItem>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[LineItem] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a line item by its identity key.
    pub fn get(&self, key: &ItemKey) -> Option<&LineItem> {
        self.rows.iter().find(|r| &r.key() == key)
    }
}
