//! The pure computation engine: aggregation, filtering, windowing, and the
//! debounce timer that paces query re-evaluation.

pub mod aggregate;
pub mod debounce;
pub mod filter;
pub mod window;
