//! Error types for running a dinner.

use crate::philosopher::PhilosopherError;

/// Termination report for a dinner that did not end cleanly.
///
/// These are never mixed into narration; the caller decides how to surface them.
#[derive(Debug, thiserror::Error)]
pub enum DinnerError {
    /// A philosopher broke a fork contract.
    #[error("philosopher at seat {seat} failed: {source}")]
    Philosopher {
        seat: usize,
        #[source]
        source: PhilosopherError,
    },

    /// A philosopher task panicked or was aborted.
    #[error("philosopher task at seat {seat} failed: {reason}")]
    TaskFailed { seat: usize, reason: String },

    /// Every task finished but a fork is still marked as held.
    #[error("fork {0} was left held after every philosopher stopped")]
    ForkAbandoned(usize),
}
