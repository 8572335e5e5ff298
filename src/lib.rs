pub mod args;
pub mod commands;
pub mod engine;
mod error;
pub mod export;
pub mod ledger;
pub mod load;
mod model;
pub mod notify;
pub mod session;
#[cfg(test)]
mod test;

pub use error::Error;
pub use error::Result;
pub use ledger::AdjustmentLedger;
pub use model::{Amount, ItemKey, ItemKind, LineItem, Metadata, RowStore};
pub use session::Session;
