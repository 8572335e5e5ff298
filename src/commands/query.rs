//! The `query` command: the filter/search engine over the CLI.

use crate::args::QueryArgs;
use crate::commands::Out;
use crate::engine::filter::FilterState;
use crate::model::{Amount, LineItem};
use crate::session::Session;
use crate::Result;
use serde::{Deserialize, Serialize};

/// The filtered subsequence plus its running total.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct QueryOutput {
    pub count: usize,
    pub total: Amount,
    pub rows: Vec<LineItem>,
}

/// Filters line items by text query and categorical filters and totals the
/// matches.
pub fn query(session: &Session, args: QueryArgs) -> Result<Out<QueryOutput>> {
    let mut state = FilterState::new();
    state.set_agency(args.agency().map(String::from));
    state.set_division(args.division().map(String::from));
    state.set_source(args.source().map(String::from));
    state.set_query(args.query());

    let filtered = session.filter(&state, !args.original());
    let output = QueryOutput {
        count: filtered.len(),
        total: filtered.total(),
        rows: filtered.rows().iter().map(|r| (*r).clone()).collect(),
    };
    let message = format!(
        "{} line items matched, totaling {}",
        output.count, output.total
    );
    Ok(Out::new(message, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::sample_store;

    #[test]
    fn test_query_with_filters() {
        let session = Session::new(sample_store());
        let args = QueryArgs::new("", Some("A".to_string()), None, None, false);
        let out = query(&session, args).unwrap();
        let output = out.structure().unwrap();
        assert_eq!(output.count, 2);
        assert_eq!(output.total, Amount::from_units(15_000_000));
    }

    #[test]
    fn test_query_no_matches() {
        let session = Session::new(sample_store());
        let args = QueryArgs::new("transport", Some("A".to_string()), None, None, false);
        let out = query(&session, args).unwrap();
        let output = out.structure().unwrap();
        assert_eq!(output.count, 0);
        assert_eq!(output.total, Amount::ZERO);
        assert_eq!(out.message(), "0 line items matched, totaling 0");
    }
}
