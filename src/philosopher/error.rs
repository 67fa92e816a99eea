//! Error types for philosophers.

use crate::fork::Side;
use shared_resource::ResourceError;

/// Fatal failures inside a philosopher's loop.
///
/// Contention is not an error: a busy fork or a hungry neighbour is handled by the
/// retry loop. What ends up here is a broken fork contract, which stops the
/// philosopher immediately.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhilosopherError {
    #[error("{name} broke the contract of the {side} fork {fork}: {source}")]
    ForkContract {
        name: String,
        side: Side,
        fork: usize,
        #[source]
        source: ResourceError,
    },
}
