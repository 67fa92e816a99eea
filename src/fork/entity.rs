use shared_resource::{Handle, ResourceError, SharedResource};
use std::fmt;

/// Which hand a fork is on, seen from the philosopher holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// A table utensil shared by two neighbouring philosophers.
///
/// The fork owns a [`SharedResource<()>`]; the payload is irrelevant, only the held
/// flag matters. The inscription is fixed at construction and has no behavioural
/// meaning.
#[derive(Debug)]
pub struct Fork {
    index: usize,
    inscription: String,
    resource: SharedResource<()>,
}

/// Proof that the holder picked up a particular fork.
#[derive(Debug)]
#[must_use = "a dropped fork handle leaves the fork on someone's plate forever"]
pub struct ForkHandle {
    fork: usize,
    handle: Handle<()>,
}

impl ForkHandle {
    /// Table index of the fork this handle belongs to.
    pub fn fork(&self) -> usize {
        self.fork
    }
}

impl Fork {
    pub fn new(index: usize, inscription: impl Into<String>) -> Self {
        Self {
            index,
            inscription: inscription.into(),
            resource: SharedResource::new(()),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn inscription(&self) -> &str {
        &self.inscription
    }

    /// Advisory: may change the moment it is read.
    pub fn is_held(&self) -> bool {
        self.resource.is_held()
    }

    /// Picks the fork up if nobody holds it. Never waits.
    pub fn take(&self) -> Option<ForkHandle> {
        self.resource.try_acquire().map(|handle| ForkHandle {
            fork: self.index,
            handle,
        })
    }

    /// Puts the fork back on the table.
    ///
    /// # Errors
    ///
    /// A [`ResourceError`] when the handle belongs to another fork or the fork is not
    /// held. Either one is a bug in the caller.
    pub fn return_back(&self, handle: ForkHandle) -> Result<(), ResourceError> {
        self.resource.release(handle.handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_neighbour_gets_the_fork() {
        let fork = Fork::new(3, "Made in China");
        let first = fork.take().expect("fork on the table");
        assert_eq!(first.fork(), 3);
        assert!(fork.is_held());
        assert!(fork.take().is_none());

        fork.return_back(first).unwrap();
        assert!(!fork.is_held());
        assert!(fork.take().is_some());
    }

    #[test]
    fn returning_another_forks_handle_is_fatal() {
        let mine = Fork::new(0, "a");
        let theirs = Fork::new(1, "b");
        let handle = theirs.take().unwrap();

        let err = mine.return_back(handle).unwrap_err();
        assert!(matches!(err, ResourceError::ForeignHandle { .. }));
        assert!(theirs.is_held());
        assert!(!mine.is_held());
    }

    #[test]
    fn inscription_is_kept() {
        let fork = Fork::new(0, "Alex was here...");
        assert_eq!(fork.inscription(), "Alex was here...");
        assert_eq!(fork.index(), 0);
    }

    #[test]
    fn sides_flip() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.opposite(), Side::Left);
        assert_eq!(Side::Left.to_string(), "left");
    }
}
