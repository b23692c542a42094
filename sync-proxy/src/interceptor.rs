use std::panic;
use std::sync::Arc;

use tracing::{error, trace};

use crate::controller::LockControllerChain;
use crate::error::LockFailure;
use crate::lock::ThreadLock;
use crate::operation::Operation;

/// Inclusion test applied to every forwarded operation.
pub type IncludePredicate = Arc<dyn Fn(&Operation) -> bool + Send + Sync>;

/// Wraps each forwarded call with lock entry and exit.
///
/// Built once per proxy from a lock, an inclusion predicate, and a
/// controller chain. The central correctness property: no lock is ever
/// exited that was not acquired, and every acquired lock is always exited
/// before the call completes, whether the forwarded call returns, panics,
/// or lock entry itself errors after reporting acquisition. Release is
/// guaranteed by a drop guard, so it also runs while a panic unwinds.
///
/// One exception to the propagate-everything policy: an error from the
/// controller chain while *exiting* the lock cannot be raised out of the
/// drop guard (the call may already be unwinding), so it is logged at
/// error level instead.
pub struct SyncInterceptor {
    lock: Box<dyn ThreadLock>,
    includer: IncludePredicate,
    controllers: Arc<LockControllerChain>,
}

impl SyncInterceptor {
    pub fn new(
        lock: Box<dyn ThreadLock>,
        includer: IncludePredicate,
        controllers: Arc<LockControllerChain>,
    ) -> Self {
        Self {
            lock,
            includer,
            controllers,
        }
    }

    /// Whether the interceptor would synchronize the given operation.
    pub fn is_synchronized(&self, operation: &Operation) -> bool {
        (self.includer)(operation)
    }

    /// Forwards one call, entering the lock first when the operation is
    /// selected for synchronization.
    ///
    /// If lock entry reports "not acquired" without an error, the call is
    /// aborted with a [`LockFailure`] panic payload and the subject is never
    /// invoked. Errors raised by the subject propagate unchanged; the lock,
    /// if acquired, is exited first.
    #[inline]
    pub fn invoke<R>(&self, operation: &Operation, proceed: impl FnOnce() -> R) -> R {
        if !(self.includer)(operation) {
            return proceed();
        }

        let mut acquired = false;
        let entry = self.controllers.enter(self.lock.as_ref(), &mut acquired);

        // Exits the lock on every path out of this frame, including a panic
        // unwinding out of `proceed`, but only if entry reported acquisition.
        let _release = ReleaseGuard {
            controllers: &self.controllers,
            lock: self.lock.as_ref(),
            engaged: acquired,
        };

        match entry {
            Ok(()) if acquired => {
                trace!(operation = %operation, "lock entered");
                proceed()
            }
            Ok(()) => panic::panic_any(LockFailure::new(*operation)),
            Err(error) => panic::panic_any(error),
        }
    }
}

struct ReleaseGuard<'a> {
    controllers: &'a LockControllerChain,
    lock: &'a dyn ThreadLock,
    engaged: bool,
}

impl Drop for ReleaseGuard<'_> {
    fn drop(&mut self) {
        if !self.engaged {
            return;
        }
        if let Err(exit_error) = self.controllers.exit(self.lock) {
            error!(%exit_error, "failed to exit lock");
        } else {
            trace!("lock exited");
        }
    }
}
