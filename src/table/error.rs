//! Error types for laying the table.

use crate::model::FlavorError;

/// Reasons a [`RoundTable`](super::RoundTable) cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// A cycle needs at least two seats.
    #[error("a round table needs at least 2 seats, got {0}")]
    TooFewSeats(usize),

    /// Not enough distinct names for every seat.
    #[error(transparent)]
    Flavor(#[from] FlavorError),
}
