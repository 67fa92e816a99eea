//! # Fork
//!
//! A fork is a [`SharedResource`](shared_resource::SharedResource) with a label. It
//! composes the resource instead of wrapping its API wholesale: the only operations a
//! philosopher gets are [`Fork::take`] and [`Fork::return_back`].
//!
//! Each fork sits between two seats and is held through an `Arc` by both of them.
//! There is no owner; the [`RoundTable`](crate::table::RoundTable) merely keeps a list.

pub mod entity;

pub use entity::*;
