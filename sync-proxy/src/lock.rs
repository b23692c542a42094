use std::fmt;
use std::sync::Arc;

use parking_lot::lock_api::RawMutex as _;
use parking_lot::RawMutex;

use crate::error::LockError;

/// Abstraction for a thread lock.
///
/// `enter` and `exit` must be called in strict nested pairs per critical
/// section; the interceptor guarantees this for proxied calls. `enter` either
/// fully acquires the lock or returns an error without acquiring it.
pub trait ThreadLock: Send + Sync {
    /// Enters the lock, blocking until it is acquired.
    fn enter(&self) -> Result<(), LockError>;

    /// Exits the lock. Only called after a matching successful entry.
    fn exit(&self);

    /// Capability discovery hook for the controller chain. Locks that
    /// support safe-failing entry return `Some(self)`.
    fn as_safe_failing(&self) -> Option<&dyn SafeFailingLock> {
        None
    }
}

/// A lock whose entry reports atomic success/failure rather than only
/// succeeding or erroring.
pub trait SafeFailingLock: ThreadLock {
    /// Enters the lock, setting `acquired` to `true` once the lock is held.
    ///
    /// `acquired` must be set to `true` *before* any error is returned if the
    /// lock was in fact acquired, so the caller can always decide correctly
    /// whether `exit` must run. `Ok(())` with `acquired` left `false` means
    /// the lock was not acquired and no error occurred; the caller must not
    /// exit the lock in that case. May block.
    fn try_enter(&self, acquired: &mut bool) -> Result<(), LockError>;
}

/// A shared mutual-exclusion domain.
///
/// Monitor-style locks are bound to a `LockObject`; two proxies built over
/// the same `Arc<LockObject>` serialize against each other even though each
/// `build()` produced a distinct lock instance.
pub struct LockObject {
    raw: RawMutex,
}

impl LockObject {
    pub const fn new() -> Self {
        Self {
            raw: RawMutex::INIT,
        }
    }

    fn acquire(&self) {
        self.raw.lock();
    }

    fn release(&self) {
        // SAFETY: callers pair release with a preceding acquire on this
        // object; the ThreadLock contract forbids unbalanced exits.
        unsafe { self.raw.unlock() }
    }
}

impl Default for LockObject {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for LockObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockObject").finish_non_exhaustive()
    }
}

/// Mutex-backed lock over a [`LockObject`]. Not reentrant: a synchronized
/// operation must not call back into a synchronized operation of a proxy
/// sharing the same locking object.
pub struct MonitorLock {
    object: Arc<LockObject>,
}

impl MonitorLock {
    pub fn new(object: Arc<LockObject>) -> Self {
        Self { object }
    }
}

impl ThreadLock for MonitorLock {
    fn enter(&self) -> Result<(), LockError> {
        self.object.acquire();
        Ok(())
    }

    fn exit(&self) {
        self.object.release();
    }
}

/// [`MonitorLock`] with safe-failing entry. This is what the standard lock
/// source produces.
pub struct SafeFailingMonitorLock {
    object: Arc<LockObject>,
}

impl SafeFailingMonitorLock {
    pub fn new(object: Arc<LockObject>) -> Self {
        Self { object }
    }
}

impl ThreadLock for SafeFailingMonitorLock {
    fn enter(&self) -> Result<(), LockError> {
        self.object.acquire();
        Ok(())
    }

    fn exit(&self) {
        self.object.release();
    }

    fn as_safe_failing(&self) -> Option<&dyn SafeFailingLock> {
        Some(self)
    }
}

impl SafeFailingLock for SafeFailingMonitorLock {
    fn try_enter(&self, acquired: &mut bool) -> Result<(), LockError> {
        self.object.acquire();
        *acquired = true;
        Ok(())
    }
}
