//! # Resource Errors
//!
//! Every variant here is a broken caller contract, not a runtime condition.
//! A busy resource is reported as `None` by
//! [`try_acquire`](crate::SharedResource::try_acquire) and never shows up as an error.

/// Contract violations raised by [`SharedResource`](crate::SharedResource).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResourceError {
    /// `release` was called while the resource was free (double release, or release without acquire).
    #[error("resource {resource} released while not held")]
    NotHeld { resource: u64 },

    /// The handle was issued by a different resource.
    #[error("handle issued by resource {found} presented to resource {expected}")]
    ForeignHandle { expected: u64, found: u64 },

    /// The payload creator produced nothing.
    #[error("resource creator returned no payload")]
    MissingPayload,
}
