use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sync_proxy::{
    synchronized, LockControllerChain, LockError, LockFailure, ProxyError, SafeFailingLock,
    SafeFailingLockController, SyncProxyBuilder, ThreadLock,
};

#[synchronized]
pub trait Service {
    fn some_action(&self) -> u64;
}

pub struct CallCountingService {
    calls: Arc<AtomicU64>,
}

impl Service for CallCountingService {
    fn some_action(&self) -> u64 {
        self.calls.fetch_add(1, Ordering::SeqCst) + 1
    }
}

/// Safe-failing lock that reports success without ever acquiring.
struct RefusingLock {
    exits: Arc<AtomicU64>,
}

impl ThreadLock for RefusingLock {
    fn enter(&self) -> Result<(), LockError> {
        Ok(())
    }

    fn exit(&self) {
        self.exits.fetch_add(1, Ordering::SeqCst);
    }

    fn as_safe_failing(&self) -> Option<&dyn SafeFailingLock> {
        Some(self)
    }
}

impl SafeFailingLock for RefusingLock {
    fn try_enter(&self, _acquired: &mut bool) -> Result<(), LockError> {
        Ok(())
    }
}

/// Safe-failing lock that acquires, then reports a failure anyway.
struct PoisonedLock {
    exits: Arc<AtomicU64>,
}

impl ThreadLock for PoisonedLock {
    fn enter(&self) -> Result<(), LockError> {
        Err(LockError::entry("adapter failed"))
    }

    fn exit(&self) {
        self.exits.fetch_add(1, Ordering::SeqCst);
    }

    fn as_safe_failing(&self) -> Option<&dyn SafeFailingLock> {
        Some(self)
    }
}

impl SafeFailingLock for PoisonedLock {
    fn try_enter(&self, acquired: &mut bool) -> Result<(), LockError> {
        *acquired = true;
        Err(LockError::entry("adapter failed after acquisition"))
    }
}

fn build_proxy(
    lock: impl ThreadLock + 'static,
    calls: Arc<AtomicU64>,
) -> Result<ServiceProxy, ProxyError> {
    let lock = Arc::new(lock);
    let subject: Arc<dyn Service + Send + Sync> = Arc::new(CallCountingService { calls });
    SyncProxyBuilder::new(subject)
        .with_lock_source(move |_object| Box::new(SharedLock(Arc::clone(&lock))))
        .build()
}

/// Lets a test keep handles to the lock the proxy uses.
struct SharedLock<L: ThreadLock>(Arc<L>);

impl<L: ThreadLock> ThreadLock for SharedLock<L> {
    fn enter(&self) -> Result<(), LockError> {
        self.0.enter()
    }

    fn exit(&self) {
        self.0.exit()
    }

    fn as_safe_failing(&self) -> Option<&dyn SafeFailingLock> {
        self.0.as_safe_failing()
    }
}

#[test]
fn unacquired_lock_raises_lock_failure_and_skips_the_subject() {
    let exits = Arc::new(AtomicU64::new(0));
    let calls = Arc::new(AtomicU64::new(0));
    let proxy = build_proxy(
        RefusingLock {
            exits: Arc::clone(&exits),
        },
        Arc::clone(&calls),
    )
    .unwrap();

    let outcome = catch_unwind(AssertUnwindSafe(|| proxy.some_action()));

    let payload = outcome.unwrap_err();
    let failure = payload.downcast_ref::<LockFailure>().unwrap();
    assert_eq!(failure.operation().name(), "some_action");
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    // Nothing was acquired, so nothing gets released.
    assert_eq!(exits.load(Ordering::SeqCst), 0);
}

#[test]
fn entry_error_after_acquisition_still_releases_once() {
    let exits = Arc::new(AtomicU64::new(0));
    let calls = Arc::new(AtomicU64::new(0));
    let proxy = build_proxy(
        PoisonedLock {
            exits: Arc::clone(&exits),
        },
        Arc::clone(&calls),
    )
    .unwrap();

    let outcome = catch_unwind(AssertUnwindSafe(|| proxy.some_action()));

    let payload = outcome.unwrap_err();
    let error = payload.downcast_ref::<LockError>().unwrap();
    assert!(matches!(error, LockError::Entry(_)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(exits.load(Ordering::SeqCst), 1);
}

/// Plain blocking lock with no safe-failing adapter.
struct PlainLock;

impl ThreadLock for PlainLock {
    fn enter(&self) -> Result<(), LockError> {
        Ok(())
    }

    fn exit(&self) {}
}

#[test]
fn chain_without_a_controller_for_the_lock_fails_at_build_time() {
    let subject: Arc<dyn Service + Send + Sync> = Arc::new(CallCountingService {
        calls: Arc::new(AtomicU64::new(0)),
    });
    // A chain of only the safe-failing controller cannot drive a plain lock.
    let chain = Arc::new(LockControllerChain::new(vec![Box::new(
        SafeFailingLockController,
    )]));

    let result = SyncProxyBuilder::<ServiceProxy>::new(subject)
        .with_lock_source(|_object| Box::new(PlainLock))
        .with_controller_chain(chain)
        .build();

    assert!(matches!(result, Err(ProxyError::UncontrollableLock)));
}
