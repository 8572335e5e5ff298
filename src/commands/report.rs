//! The `summary` and `groups` reporting commands.

use crate::args::GroupsArgs;
use crate::commands::Out;
use crate::engine::aggregate::BudgetSummary;
use crate::model::Amount;
use crate::session::Session;
use crate::Result;
use std::collections::BTreeMap;

/// Whole-dataset revenue, spending and surplus, before and after adjustments.
pub fn summary(session: &Session) -> Result<Out<BudgetSummary>> {
    let summary = session.summary();
    let original = summary.original();
    let adjusted = summary.adjusted();
    let mut message = format!(
        "Revenue {} -> {}, spending {} -> {}, surplus {} -> {}",
        original.revenue(),
        adjusted.revenue(),
        original.spending(),
        adjusted.spending(),
        original.surplus(),
        adjusted.surplus(),
    );
    if let Some(updated) = session.last_updated() {
        message.push_str(&format!(" (data last updated {updated})"));
    }
    Ok(Out::new(message, summary))
}

/// Grouped totals across one dimension, adjusted unless `--original` is set.
pub fn groups(session: &Session, args: GroupsArgs) -> Result<Out<BTreeMap<String, Amount>>> {
    let totals = session.group_totals(args.by(), !args.original());
    let state = if args.original() { "original" } else { "adjusted" };
    let mut lines: Vec<(String, Amount)> = totals
        .iter()
        .map(|(name, amount)| (name.clone(), *amount))
        .collect();
    // Report largest groups first; the map itself is unordered by meaning.
    lines.sort_by(|a, b| b.1.cmp(&a.1));
    let body = lines
        .iter()
        .map(|(name, amount)| format!("  {name}: {amount}"))
        .collect::<Vec<_>>()
        .join("\n");
    let message = format!(
        "{} {} totals by {}:\n{}",
        lines.len(),
        state,
        args.by(),
        body
    );
    Ok(Out::new(message, totals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::aggregate::GroupBy;
    use crate::model::ItemKey;
    use crate::test::sample_store;

    fn session() -> Session {
        let mut session = Session::new(sample_store());
        session.set_draft(ItemKey::new("A", "F1"), "-3000000");
        session.commit_all();
        session
    }

    #[test]
    fn test_summary_message_shows_before_and_after() {
        let out = summary(&session()).unwrap();
        assert_eq!(
            out.message(),
            "Revenue 8,000,000 -> 8,000,000, spending 15,000,000 -> 12,000,000, \
             surplus -7,000,000 -> -4,000,000"
        );
        assert!(out.structure().is_some());
    }

    #[test]
    fn test_groups_adjusted_by_agency() {
        let out = groups(&session(), GroupsArgs::new(GroupBy::Agency, false)).unwrap();
        let totals = out.structure().unwrap();
        assert_eq!(
            totals.get("A"),
            Some(&Amount::from_units(12_000_000))
        );
        assert!(out.message().contains("adjusted totals by agency"));
    }

    #[test]
    fn test_groups_original_ignores_ledger() {
        let out = groups(&session(), GroupsArgs::new(GroupBy::Agency, true)).unwrap();
        assert_eq!(
            out.structure().unwrap().get("A"),
            Some(&Amount::from_units(15_000_000))
        );
    }
}
