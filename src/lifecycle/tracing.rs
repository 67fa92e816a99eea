//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the one subscriber the binary uses. Narration is printed
//! through it as well, so every line carries the subscriber's timestamp.
//!
//! ## What Gets Traced
//!
//! - **Lifecycle** (`info`): table laid, dinner started, philosopher seated / left,
//!   dinner over.
//! - **State machine** (`debug`): every transition with `from` / `to`, and each
//!   retreat with the side given up and the neighbour state that caused it.
//! - **Contention** (`trace`): empty acquisition rounds, resource acquire / release.
//! - **Failures** (`error`): broken fork contracts and failed tasks, reported apart
//!   from narration.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Narration and lifecycle only (default)
//! cargo run
//!
//! # Watch the state machine
//! RUST_LOG=debug cargo run
//!
//! # Every fork pick-up
//! RUST_LOG=trace cargo run -- --seats 3
//! ```
//!
//! ## Output
//!
//! ```text
//! 2024-05-01T10:00:00.123Z  INFO Table laid seats=5 seed=None
//! 2024-05-01T10:00:00.124Z  INFO Thinking about... Programming philosopher="Kevin"
//! 2024-05-01T10:00:00.761Z  INFO I took the first left fork philosopher="Kevin"
//! 2024-05-01T10:00:01.402Z  INFO I'll return the first left fork because my right neighbour is EATING philosopher="Kevin"
//! ```
use tracing_subscriber::EnvFilter;

/// Initialises the global `fmt` subscriber. `RUST_LOG` wins over the `info` default.
pub fn setup_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false) // the philosopher field says who is talking
        .compact()
        .init();
}
