//! The `export` command: the flattened line-item CSV.

use crate::args::ExportArgs;
use crate::commands::Out;
use crate::session::Session;
use crate::{export, Result};
use anyhow::Context;

/// Writes the line-item export to the requested destination, or to stdout
/// when none is given. Fails when there are no committed adjustments.
pub async fn export(session: &Session, args: ExportArgs) -> Result<Out<String>> {
    let csv = export::to_csv_string(session.rows().rows(), session.ledger())?;
    match args.output() {
        Some(path) => {
            tokio::fs::write(path, &csv)
                .await
                .with_context(|| format!("Unable to write export to {}", path.display()))?;
            Ok(Out::new_message(format!(
                "Exported {} line items to {}",
                session.rows().len(),
                path.display()
            )))
        }
        None => Ok(Out::new(
            format!("Exported {} line items", session.rows().len()),
            csv,
        )),
    }
}
