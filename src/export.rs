//! Flattened CSV export: every line item joined with its committed delta and
//! adjusted amount, one record per line item.

use crate::engine::aggregate::adjusted_amount;
use crate::ledger::AdjustmentLedger;
use crate::model::{Amount, ItemKind, LineItem};
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One exported record. Amounts are plain decimal strings in whole currency
/// units (the `Amount` serde format), so the file round-trips exactly.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct ExportRecord {
    pub agency: String,
    pub division: String,
    pub source: String,
    pub original: Amount,
    pub delta: Amount,
    pub adjusted: Amount,
    pub kind: ItemKind,
}

impl ExportRecord {
    fn new(item: &LineItem, ledger: &AdjustmentLedger) -> Self {
        Self {
            agency: item.agency().to_string(),
            division: item.division().to_string(),
            source: item.source().to_string(),
            original: item.amount(),
            delta: ledger.delta(&item.key()),
            adjusted: adjusted_amount(item, ledger),
            kind: item.kind(),
        }
    }
}

/// Writes the export to `writer`. Exporting with no committed adjustments is
/// an invalid operation; the caller maps the error to a notification.
pub fn write_csv<W: Write>(
    rows: &[LineItem],
    ledger: &AdjustmentLedger,
    writer: W,
) -> Result<()> {
    if ledger.is_empty() {
        bail!("There are no adjustments to export");
    }
    let mut csv_writer = csv::Writer::from_writer(writer);
    for item in rows {
        csv_writer
            .serialize(ExportRecord::new(item, ledger))
            .context("Failed to write export record")?;
    }
    csv_writer.flush().context("Failed to flush export")?;
    Ok(())
}

/// The export as a `String`, for display or clipboard use.
pub fn to_csv_string(rows: &[LineItem], ledger: &AdjustmentLedger) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(rows, ledger, &mut buffer)?;
    String::from_utf8(buffer).context("Export was not valid UTF-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ItemKey;
    use crate::test::sample_rows;

    fn ledger() -> AdjustmentLedger {
        let mut ledger = AdjustmentLedger::new();
        ledger.set_draft(ItemKey::new("A", "F1"), "-3,000,000");
        ledger.commit_all();
        ledger
    }

    #[test]
    fn test_export_has_one_record_per_line_item() {
        let rows = sample_rows();
        let text = to_csv_string(&rows, &ledger()).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "agency,division,source,original,delta,adjusted,kind"
        );
        assert_eq!(lines.count(), rows.len());
    }

    #[test]
    fn test_export_joins_delta_and_adjusted() {
        let rows = sample_rows();
        let text = to_csv_string(&rows, &ledger()).unwrap();
        let f1_line = text.lines().find(|l| l.contains("F1")).unwrap();
        assert_eq!(
            f1_line,
            "A,F1,General Fund,10000000,-3000000,7000000,spending"
        );
        // Unadjusted rows carry a zero delta.
        let f2_line = text.lines().find(|l| l.contains("F2")).unwrap();
        assert_eq!(f2_line, "A,F2,Grants,5000000,0,5000000,spending");
    }

    #[test]
    fn test_export_with_empty_ledger_fails() {
        let rows = sample_rows();
        let empty = AdjustmentLedger::new();
        assert!(to_csv_string(&rows, &empty).is_err());
    }

    #[test]
    fn test_records_parse_back() {
        let rows = sample_rows();
        let text = to_csv_string(&rows, &ledger()).unwrap();
        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let parsed: Vec<ExportRecord> = reader.deserialize().map(|r| r.unwrap()).collect();
        assert_eq!(parsed.len(), rows.len());
        assert_eq!(parsed[0].adjusted, Amount::from_units(7_000_000));
    }
}
