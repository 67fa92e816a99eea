//! # Dinner Lifecycle & Orchestration
//!
//! The philosophers are simple; getting them to the table and away from it again is
//! where the care goes. This module is the conductor.
//!
//! **Key Responsibilities:**
//! 1. **Launch** - One Tokio task per philosopher.
//! 2. **Dependency Injection** - The narration sink and cancellation token are handed
//!    to each philosopher at launch, not at construction.
//! 3. **Fan-in** - All narration flows through one bounded `mpsc` channel.
//! 4. **Graceful Shutdown** - Cancel, let everybody finish the meal in progress, join,
//!    and verify that no fork stayed on anybody's plate.
//! 5. **Observability Setup** - [`setup_tracing`].
//!
//! ## The Dinner Pattern
//!
//! ```rust,ignore
//! let table = RoundTable::from_config(&config)?;
//! let mut dinner = Dinner::run(table, config.narration_buffer);
//!
//! while let Some(line) = dinner.next().await {
//!     info!(philosopher = %line.philosopher, "{}", line.message);
//! }
//!
//! let report = dinner.shutdown().await?;
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. **Cancel** - the shared token is cancelled.
//! 2. **Close narration** - pending and future sends fail instead of waiting.
//! 3. **Safe exit** - each philosopher stops on entering THINK or before its next
//!    acquisition round. One that already holds both forks eats and returns them first.
//! 4. **Join** - every task is awaited; the first failure becomes the result.
//! 5. **Audit** - every fork must be free, otherwise [`DinnerError::ForkAbandoned`].
//!
//! ## Failure Policy
//!
//! A philosopher returning [`PhilosopherError`](crate::philosopher::PhilosopherError)
//! or panicking cancels the token for everyone. The run then winds down as in a
//! normal shutdown and [`Dinner::join`] reports the failure.

pub mod dinner;
pub mod error;
pub mod tracing;

pub use dinner::*;
pub use error::*;
pub use self::tracing::setup_tracing;
