//! # Philosopher
//!
//! A philosopher is an independent loop over five states:
//!
//! ```text
//! THINK -> ACQUIRING -> INSPECTING -> EATING -> RELEASING -> THINK -> ...
//! ```
//!
//! ## Structure
//!
//! - [`state`] - [`State`] and the atomic [`StateCell`] neighbours read.
//! - [`entity`] - [`Philosopher`], its acquisition algorithm, and [`DinerContext`].
//! - [`error`] - [`PhilosopherError`].
//!
//! ## Published state
//!
//! Every transition is written to the philosopher's [`StateCell`] before the state's
//! work starts. Neighbours read it, without synchronising against the forks, to decide
//! whether reaching for a contested fork is worth a try. During acquisition the cell
//! briefly reads THINK while the state machine is still ACQUIRING; that is the signal
//! that this philosopher will not cling to a half-acquired pair.
//!
//! ## Usage
//!
//! ```rust
//! use round_table::model::Transcript;
//! use round_table::philosopher::{DinerContext, Round};
//! use round_table::table::RoundTable;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main(flavor = "current_thread", start_paused = true)]
//! async fn main() {
//!     let mut table = RoundTable::build(5).unwrap();
//!     let mut diners = table.take_philosophers();
//!     let ctx = DinerContext::new(Arc::new(Transcript::new()), CancellationToken::new());
//!
//!     // Nobody else is eating, so the first round seats philosopher 0.
//!     let Round::Seated(forks) = diners[0].acquisition_round(&ctx).await.unwrap() else {
//!         unreachable!()
//!     };
//!     diners[0].release(&ctx, forks).await.unwrap();
//! }
//! ```

pub mod entity;
pub mod error;
pub mod state;

pub use entity::*;
pub use error::*;
pub use state::*;
