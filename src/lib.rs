//! # Round Table
//!
//! > **The dining philosophers, with forks that never block.**
//!
//! N philosophers sit around a table with one fork between each pair of neighbours.
//! Each needs both adjacent forks to eat. This crate runs every philosopher as its own
//! Tokio task and keeps the table free of deadlock without a global lock, a waiter, or
//! a fixed fork order.
//!
//! ## 🏗️ Design
//!
//! ### Forks are tried, never awaited
//! A fork is a [`SharedResource`](shared_resource::SharedResource): one atomic
//! compare-and-swap decides who holds it, and a failed attempt returns immediately.
//! Nobody ever waits while holding something.
//!
//! ### Half a pair is given back
//! A philosopher that gets only one fork thinks for a moment, then looks at the
//! neighbour across the missing fork. Only if that neighbour is thinking does it try
//! the second fork; otherwise, or if the try fails, the first fork goes back on the
//! table. See [`philosopher`] for the full algorithm.
//!
//! ### Neighbours are read, not locked
//! Each philosopher publishes its state in an atomic cell. Neighbours read it as a
//! hint. Correctness never depends on it; only the forks' own atomics do.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Primitive ([`fork`], `shared_resource`)
//! - **Role**: Atomic try-acquire / release with fatal misuse detection.
//! - **Key items**: [`Fork`](fork::Fork), [`Side`](fork::Side).
//!
//! ### 2. The Diners ([`philosopher`])
//! - **Role**: The five-state machine and the acquisition algorithm.
//! - **Key items**: [`Philosopher`](philosopher::Philosopher),
//!   [`State`](philosopher::State), [`Round`](philosopher::Round).
//!
//! ### 3. The Topology ([`table`])
//! - **Role**: Builds N forks, N philosophers, and the cyclic wiring.
//! - **Key items**: [`RoundTable`](table::RoundTable).
//!
//! ### 4. The Orchestrator ([`lifecycle`])
//! - **Role**: Launches, narrates, cancels, joins.
//! - **Key items**: [`Dinner`](lifecycle::Dinner), [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 5. Data & Settings ([`model`], [`config`])
//! - **Role**: Narration events, flavor text, and the JSON-loadable [`TableConfig`](config::TableConfig).
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Five philosophers until Ctrl+C
//! cargo run
//!
//! # Seven philosophers, reproducible, for ten seconds
//! cargo run -- --seats 7 --seed 42 --duration 10
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test --workspace
//! ```

pub mod config;
pub mod fork;
pub mod lifecycle;
pub mod model;
pub mod philosopher;
pub mod table;
