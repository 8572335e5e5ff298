//! Data model: monetary amounts, line items, and dataset ingestion.

mod amount;
mod ingest;
mod line_item;

pub use amount::Amount;
pub use ingest::{parse_dataset, Metadata};
pub use line_item::{ItemKey, ItemKind, LineItem, RowStore};
