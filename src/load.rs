//! Dataset loading: the one asynchronous operation in a session's life.
//!
//! A failed load leaves the row store empty; no partial dataset is ever
//! accepted. A caller that no longer wants the result simply drops the
//! future.

use crate::model::{self, Amount, ItemKey, Metadata, RowStore};
use crate::Result;
use anyhow::Context;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Reads a file to a `String`.
async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Loads and normalizes the row dataset. The document may be a bare array of
/// rows or an object with a `rows` field.
pub async fn load_rows(path: &Path) -> Result<RowStore> {
    let content = read(path).await?;
    let doc: Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset JSON at {}", path.display()))?;
    let store = model::parse_dataset(&doc);
    info!("Loaded {} line items from {}", store.len(), path.display());
    Ok(store)
}

/// Loads the optional metadata sidecar.
pub async fn load_metadata(path: &Path) -> Result<Metadata> {
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse metadata JSON at {}", path.display()))
}

/// Loads an adjustments file: a JSON object keyed by "Agency/Division" with
/// numeric or loose-currency-string deltas. Keys without a slash are skipped
/// with a warning.
pub async fn load_adjustments(path: &Path) -> Result<BTreeMap<ItemKey, Amount>> {
    let content = read(path).await?;
    let raw: BTreeMap<String, Amount> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse adjustments JSON at {}", path.display()))?;
    let mut adjustments = BTreeMap::new();
    for (key, delta) in raw {
        match key.split_once('/') {
            Some((agency, division)) => {
                adjustments.insert(ItemKey::new(agency, division), delta);
            }
            None => warn!("Skipping adjustment key without an agency: \"{key}\""),
        }
    }
    Ok(adjustments)
}
