//! # Round Table
//!
//! Builds the cycle: N forks, N philosophers, each philosopher wired to the two forks
//! beside it and to the published-state cells of the two philosophers beside it.
//!
//! Philosophers refer to their neighbours only through the neighbours' [`StateCell`]s,
//! never through the neighbours themselves, so the graph of `Arc`s has no cycles and
//! dropping the table (plus any running tasks) frees everything.
//!
//! [`StateCell`]: crate::philosopher::StateCell

pub mod error;
pub mod round_table;

pub use error::*;
pub use round_table::*;
