//! # Shared Resource
//!
//! This module defines [`SharedResource`], a cell that at most one holder may use at a
//! time. Ownership of the cell is decided by a single compare-and-swap on an
//! `AtomicBool`; there is no lock and no queue.
//!
//! ## Two ways in
//!
//! * **Non-blocking**: [`SharedResource::try_acquire`] either wins the transition and
//!   returns a [`Handle`], or returns `None` straight away.
//! * **Cooperative wait**: [`SharedResource::wait_for_release`] parks the calling task
//!   until the current holder releases. [`SharedResource::acquire`] loops over both.
//!
//! Neither path is fair: whoever lands the compare-and-swap first wins.

use crate::error::ResourceError;
use crate::handle::Handle;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use tokio::sync::Notify;
use tracing::{error, trace};

static NEXT_RESOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// A payload guarded by an atomic "held" flag.
///
/// # Contract
///
/// - `held` only moves `false -> true` through a successful acquire and
///   `true -> false` through [`release`](Self::release).
/// - Releasing a free resource, or releasing with another resource's handle, is a
///   caller bug. It is reported as a [`ResourceError`] which callers must propagate,
///   never retry.
///
/// ```rust
/// use shared_resource::SharedResource;
///
/// let cell = SharedResource::new("spoon");
/// let handle = cell.try_acquire().unwrap();
/// assert!(cell.try_acquire().is_none());
/// assert_eq!(*cell.get(&handle).unwrap(), "spoon");
/// cell.release(handle).unwrap();
/// assert!(!cell.is_held());
/// ```
pub struct SharedResource<T> {
    id: u64,
    payload: T,
    held: AtomicBool,
    waiters: AtomicUsize,
    released: Notify,
}

impl<T> SharedResource<T> {
    /// Wraps `payload` in a free resource.
    pub fn new(payload: T) -> Self {
        Self {
            id: NEXT_RESOURCE_ID.fetch_add(1, Ordering::Relaxed),
            payload,
            held: AtomicBool::new(false),
            waiters: AtomicUsize::new(0),
            released: Notify::new(),
        }
    }

    /// Builds the payload with `creator`.
    ///
    /// # Errors
    ///
    /// [`ResourceError::MissingPayload`] if `creator` returns `None`.
    pub fn from_fn<F>(creator: F) -> Result<Self, ResourceError>
    where
        F: FnOnce() -> Option<T>,
    {
        creator()
            .map(Self::new)
            .ok_or(ResourceError::MissingPayload)
    }

    /// Process-wide unique id of this resource.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Snapshot of the held flag. Stale as soon as it is returned.
    pub fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }

    /// Attempts the `false -> true` transition without blocking.
    pub fn try_acquire(&self) -> Option<Handle<T>> {
        match self
            .held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => {
                trace!(resource = self.id, "Acquired");
                Some(Handle::issued_by(self.id))
            }
            Err(_) => None,
        }
    }

    /// Gives the resource back and wakes any task parked in
    /// [`wait_for_release`](Self::wait_for_release).
    ///
    /// # Errors
    ///
    /// - [`ResourceError::ForeignHandle`] if `handle` belongs to another resource.
    /// - [`ResourceError::NotHeld`] if the resource is not currently held.
    pub fn release(&self, handle: Handle<T>) -> Result<(), ResourceError> {
        if handle.resource != self.id {
            return Err(ResourceError::ForeignHandle {
                expected: self.id,
                found: handle.resource,
            });
        }

        self.held
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| ResourceError::NotHeld { resource: self.id })?;
        trace!(resource = self.id, "Released");

        if self.waiters.load(Ordering::SeqCst) > 0 {
            self.released.notify_waiters();
        }
        Ok(())
    }

    /// Runs `use_payload` only if the resource can be taken right now, then releases it.
    ///
    /// Returns `false` without calling `use_payload` when the resource is busy. The
    /// release also happens if `use_payload` panics.
    pub fn try_with<F>(&self, use_payload: F) -> bool
    where
        F: FnOnce(&T),
    {
        let Some(handle) = self.try_acquire() else {
            return false;
        };
        let _lease = Lease {
            resource: self,
            handle: Some(handle),
        };
        use_payload(&self.payload);
        true
    }

    /// Payload access for the current holder.
    ///
    /// # Errors
    ///
    /// [`ResourceError::ForeignHandle`] if `handle` belongs to another resource.
    pub fn get(&self, handle: &Handle<T>) -> Result<&T, ResourceError> {
        if handle.resource != self.id {
            return Err(ResourceError::ForeignHandle {
                expected: self.id,
                found: handle.resource,
            });
        }
        Ok(&self.payload)
    }

    /// Waits until the current holder releases the resource.
    ///
    /// Returns `false` without waiting when the resource is already free, `true` after
    /// a release was observed. Being woken does not reserve the resource: the caller
    /// still has to win [`try_acquire`](Self::try_acquire).
    pub async fn wait_for_release(&self) -> bool {
        // Register before looking at `held`; release reads `waiters` after its swap,
        // so one of the two always sees the other.
        self.waiters.fetch_add(1, Ordering::SeqCst);
        let _registered = WaiterGuard(&self.waiters);
        let released = self.released.notified();

        if !self.is_held() {
            return false;
        }

        released.await;
        true
    }

    /// Waits until the resource can be taken.
    pub async fn acquire(&self) -> Handle<T> {
        loop {
            if let Some(handle) = self.try_acquire() {
                return handle;
            }
            self.wait_for_release().await;
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedResource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedResource")
            .field("id", &self.id)
            .field("payload", &self.payload)
            .field("held", &self.is_held())
            .finish()
    }
}

/// Releases a resource taken by [`SharedResource::try_with`] when dropped.
struct Lease<'a, T> {
    resource: &'a SharedResource<T>,
    handle: Option<Handle<T>>,
}

impl<T> Drop for Lease<'_, T> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.resource.release(handle) {
                error!(resource = self.resource.id, error = %e, "Scoped release failed");
            }
        }
    }
}

struct WaiterGuard<'a>(&'a AtomicUsize);

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
