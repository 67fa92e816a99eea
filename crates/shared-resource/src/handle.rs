//! # Acquisition Handles
//!
//! A [`Handle`] is the proof that the caller won the `false -> true` transition of a
//! [`SharedResource`](crate::SharedResource). It is move-only: the only way to give it
//! up is to pass it back to [`release`](crate::SharedResource::release).

use std::fmt;
use std::marker::PhantomData;

/// Token returned by a successful acquire.
///
/// The handle does not borrow the resource, so it can be stored next to an `Arc` of
/// the resource and carried across `.await` points.
#[must_use = "a dropped handle leaves the resource held forever"]
pub struct Handle<T> {
    pub(crate) resource: u64,
    // fn() -> T keeps the handle Send + Sync regardless of T
    pub(crate) _payload: PhantomData<fn() -> T>,
}

impl<T> Handle<T> {
    pub(crate) fn issued_by(resource: u64) -> Self {
        Self {
            resource,
            _payload: PhantomData,
        }
    }

    /// Id of the resource that issued this handle.
    pub fn resource_id(&self) -> u64 {
        self.resource
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("resource", &self.resource)
            .finish()
    }
}
