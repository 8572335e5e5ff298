//! These structs provide the CLI interface for the budget-lens CLI.

use crate::engine::aggregate::GroupBy;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::filter::LevelFilter;

/// budget-lens: explore a budget dataset with hypothetical adjustments.
///
/// The program loads a JSON dataset of budget line items (agency, division,
/// funding source, amount), optionally applies a file of adjustment deltas,
/// and reports aggregate totals, grouped breakdowns, filtered row listings
/// and a flattened CSV export.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print whole-dataset revenue, spending and surplus, before and after
    /// adjustments.
    Summary,
    /// Print grouped totals across one dimension.
    Groups(GroupsArgs),
    /// Filter line items by text query and categorical filters, and print the
    /// matches with their running total.
    Query(QueryArgs),
    /// Write a CSV joining every line item with its delta and adjusted amount.
    Export(ExportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The JSON dataset of budget line items: a bare array of row objects or
    /// an object with a "rows" field.
    #[arg(long, env = "BUDGET_LENS_DATASET")]
    dataset: PathBuf,

    /// Optional metadata sidecar carrying a "last updated" date string.
    #[arg(long)]
    metadata: Option<PathBuf>,

    /// Optional JSON object of adjustment deltas keyed by "Agency/Division",
    /// e.g. {"Parks/Operations": -3000000}. Values may be numbers or loose
    /// currency strings.
    #[arg(long)]
    adjustments: Option<PathBuf>,
}

impl Common {
    pub fn new(
        log_level: LevelFilter,
        dataset: PathBuf,
        metadata: Option<PathBuf>,
        adjustments: Option<PathBuf>,
    ) -> Self {
        Self {
            log_level,
            dataset,
            metadata,
            adjustments,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn dataset(&self) -> &Path {
        &self.dataset
    }

    pub fn metadata(&self) -> Option<&Path> {
        self.metadata.as_deref()
    }

    pub fn adjustments(&self) -> Option<&Path> {
        self.adjustments.as_deref()
    }
}

/// Args for the `budget-lens groups` command.
#[derive(Debug, Parser, Clone)]
pub struct GroupsArgs {
    /// The dimension to group by.
    #[arg(long, value_enum, default_value_t = GroupBy::Agency)]
    by: GroupBy,

    /// Report original amounts instead of adjusted amounts.
    #[arg(long)]
    original: bool,
}

impl GroupsArgs {
    pub fn new(by: GroupBy, original: bool) -> Self {
        Self { by, original }
    }

    pub fn by(&self) -> GroupBy {
        self.by
    }

    pub fn original(&self) -> bool {
        self.original
    }
}

/// Args for the `budget-lens query` command.
#[derive(Debug, Parser, Clone)]
pub struct QueryArgs {
    /// Free-text query, matched case-insensitively against every textual
    /// field of a row.
    #[arg(long, default_value = "")]
    query: String,

    /// Exact-match agency filter.
    #[arg(long)]
    agency: Option<String>,

    /// Exact-match division filter.
    #[arg(long)]
    division: Option<String>,

    /// Exact-match funding source filter.
    #[arg(long)]
    source: Option<String>,

    /// Total original amounts instead of adjusted amounts.
    #[arg(long)]
    original: bool,
}

impl QueryArgs {
    pub fn new(
        query: impl Into<String>,
        agency: Option<String>,
        division: Option<String>,
        source: Option<String>,
        original: bool,
    ) -> Self {
        Self {
            query: query.into(),
            agency,
            division,
            source,
            original,
        }
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

    pub fn original(&self) -> bool {
        self.original
    }
}

/// Args for the `budget-lens export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Where to write the CSV. Prints to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}
