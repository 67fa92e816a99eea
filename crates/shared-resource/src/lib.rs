//! # Shared Resource
//!
//! This crate provides the one synchronization primitive the round table is built on:
//! a payload guarded by an atomic "held" flag.
//!
//! ## Why not a `Mutex`?
//!
//! A philosopher needs *two* resources and must never sit on one while waiting for the
//! other. A mutex invites exactly that: `lock()` parks the caller while it still owns
//! whatever it grabbed before. [`SharedResource::try_acquire`] never parks. It either
//! wins a single compare-and-swap or reports `None`, and the caller decides what to do
//! next (usually: give back what it already has).
//!
//! ## Core Abstractions
//!
//! - [`SharedResource`] - the cell itself: `try_acquire`, `release`, `get`, the scoped
//!   `try_with`, and an optional cooperative `wait_for_release` / `acquire` pair.
//! - [`Handle`] - move-only proof of ownership, consumed by `release`.
//! - [`ResourceError`] - contract violations (double release, foreign handle, missing
//!   payload). These are bugs in the caller and are meant to be propagated, not retried.
//!
//! ```rust
//! use shared_resource::{ResourceError, SharedResource};
//!
//! let fork = SharedResource::new(());
//! let held = fork.try_acquire().expect("nobody else is at the table");
//! assert!(fork.try_acquire().is_none());
//! fork.release(held)?;
//! # Ok::<(), ResourceError>(())
//! ```
//!
//! ## Concurrency Model
//!
//! - `held` is a single `AtomicBool`; every transition is a `SeqCst` compare-and-swap.
//! - Handles do not borrow the resource, so a holder can keep one across `.await`.
//! - The blocking wait is built on `tokio::sync::Notify` with a waiter count, and only
//!   costs anything when somebody is actually waiting.

pub mod error;
pub mod handle;
pub mod resource;

pub use error::ResourceError;
pub use handle::Handle;
pub use resource::SharedResource;
