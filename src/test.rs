//! Shared test fixtures.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::model::{Amount, ItemKind, LineItem, RowStore};
use rust_decimal::Decimal;

/// The small dataset used across the engine tests: two spending funds under
/// agency "A" (10M and 5M) and one revenue fund under agency "B" (8M).
pub fn sample_rows() -> Vec<LineItem> {
    vec![
        LineItem::new(
            "A",
            "F1",
            "General Fund",
            None,
            Amount::from_millions(Decimal::from(10)),
            ItemKind::Spending,
        ),
        LineItem::new(
            "A",
            "F2",
            "Grants",
            None,
            Amount::from_millions(Decimal::from(5)),
            ItemKind::Spending,
        ),
        LineItem::new(
            "B",
            "F3",
            "General Fund",
            Some("Street repair surcharge".to_string()),
            Amount::from_millions(Decimal::from(8)),
            ItemKind::Revenue,
        ),
    ]
}

pub fn sample_store() -> RowStore {
    RowStore::new(sample_rows())
}
