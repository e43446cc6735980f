//! Mutual-exclusion flag with a scoped guard.

use std::cell::Cell;

use crate::error::{PoolError, Result};

/// The pool's reentrancy flag.
///
/// Mutating calls hold a [`LockGuard`] for their whole duration, including
/// collaborator calls.  Reads only [`check`](Lock::check) the flag.
#[derive(Debug, Default)]
pub(crate) struct Lock {
    held: Cell<bool>,
}

impl Lock {
    /// Fails with [`PoolError::Reentry`] while a mutating call is in flight.
    pub(crate) fn check(&self) -> Result<()> {
        if self.held.get() {
            return Err(PoolError::Reentry);
        }
        Ok(())
    }

    /// Takes the flag until the returned guard is dropped.
    pub(crate) fn acquire(&self) -> Result<LockGuard<'_>> {
        self.check()?;
        self.held.set(true);
        Ok(LockGuard { lock: self })
    }

    pub(crate) fn is_held(&self) -> bool {
        self.held.get()
    }
}

/// Releases the [`Lock`] on drop, on every exit path.
#[derive(Debug)]
pub(crate) struct LockGuard<'a> {
    lock: &'a Lock,
}

impl Drop for LockGuard<'_> {
    fn drop(&mut self) {
        self.lock.held.set(false);
    }
}
