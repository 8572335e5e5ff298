//! Error type aliases. Boundary operations (loading, committing, exporting)
//! use `anyhow` with context; the pure engine functions never fail.

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;
