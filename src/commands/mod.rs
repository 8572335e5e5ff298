//! Command handlers for the budget-lens CLI.
//!
//! Each handler loads a session from the common arguments, runs one engine
//! operation, and returns a consistent message plus optional structured data.

mod export;
mod query;
mod report;

use crate::args::Common;
use crate::notify::Severity;
use crate::session::Session;
use crate::{load, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info, warn};

pub use export::export;
pub use query::query;
pub use report::{groups, summary};

/// The output type for a command: a printable message and, optionally, the
/// structured data behind it.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the
    /// command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as
    /// JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// Loads the dataset (and optional metadata and adjustments files) described
/// by the common arguments into a ready session.
pub async fn build_session(common: &Common) -> Result<Session> {
    let rows = load::load_rows(common.dataset()).await?;
    let mut session = Session::new(rows);

    if let Some(path) = common.metadata() {
        session = session.with_metadata(load::load_metadata(path).await?);
    }

    if let Some(path) = common.adjustments() {
        for (key, delta) in load::load_adjustments(path).await? {
            if session.rows().get(&key).is_none() {
                warn!("adjustment key '{key}' matches no row in the dataset");
            }
            // Plain decimal text round-trips the delta exactly through the
            // draft/commit path.
            session.set_draft(key, delta.value().to_string());
        }
        session.commit_all();
        for notification in session.notifications_mut().drain() {
            match notification.severity() {
                Severity::Error => warn!("{}", notification.message()),
                _ => debug!("{}", notification.message()),
            }
        }
    }

    Ok(session)
}
