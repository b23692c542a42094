use crate::error::LockError;
use crate::lock::ThreadLock;

/// Strategy for entering and exiting one kind of lock.
///
/// Controllers are assembled into a [`LockControllerChain`]; each is queried
/// via [`can_control`](LockController::can_control) so chains can be
/// inspected as well as invoked. Calling `enter` or `exit` on a controller
/// that cannot control the lock is a contract violation and yields an error.
pub trait LockController: Send + Sync {
    /// Whether this controller can control the given lock.
    fn can_control(&self, lock: &dyn ThreadLock) -> bool;

    /// Enters the lock, setting `acquired` to `true` once it is held. This
    /// includes the error path, if acquisition happened before the error.
    fn enter(&self, lock: &dyn ThreadLock, acquired: &mut bool) -> Result<(), LockError>;

    /// Exits the lock.
    fn exit(&self, lock: &dyn ThreadLock) -> Result<(), LockError>;
}

/// Controls locks that support safe-failing entry, delegating to
/// [`SafeFailingLock::try_enter`](crate::SafeFailingLock::try_enter).
pub struct SafeFailingLockController;

impl LockController for SafeFailingLockController {
    fn can_control(&self, lock: &dyn ThreadLock) -> bool {
        lock.as_safe_failing().is_some()
    }

    fn enter(&self, lock: &dyn ThreadLock, acquired: &mut bool) -> Result<(), LockError> {
        match lock.as_safe_failing() {
            Some(lock) => lock.try_enter(acquired),
            None => Err(LockError::NotSafeFailing),
        }
    }

    fn exit(&self, lock: &dyn ThreadLock) -> Result<(), LockError> {
        lock.exit();
        Ok(())
    }
}

/// Terminal catch-all controller: handles any lock through the plain
/// `enter()`/`exit()` contract, reporting `acquired = true` unconditionally
/// after a successful entry (the lock contract guarantees `enter` either
/// fully succeeds or fails before acquiring).
pub struct BlockingLockController;

impl LockController for BlockingLockController {
    fn can_control(&self, _lock: &dyn ThreadLock) -> bool {
        true
    }

    fn enter(&self, lock: &dyn ThreadLock, acquired: &mut bool) -> Result<(), LockError> {
        lock.enter()?;
        *acquired = true;
        Ok(())
    }

    fn exit(&self, lock: &dyn ThreadLock) -> Result<(), LockError> {
        lock.exit();
        Ok(())
    }
}

/// Ordered chain of lock controllers; the first controller whose
/// `can_control` accepts the lock handles it.
///
/// A lock no controller accepts is a configuration error: the builder
/// rejects it at `build()` time, and dispatch reports it rather than
/// silently ignoring the lock.
pub struct LockControllerChain {
    controllers: Vec<Box<dyn LockController>>,
}

impl LockControllerChain {
    pub fn new(controllers: Vec<Box<dyn LockController>>) -> Self {
        Self { controllers }
    }

    /// The standard chain: safe-failing dispatch with a blocking terminal
    /// catch-all.
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(SafeFailingLockController),
            Box::new(BlockingLockController),
        ])
    }

    /// Whether any controller in the chain can control the lock.
    pub fn can_control(&self, lock: &dyn ThreadLock) -> bool {
        self.controllers
            .iter()
            .any(|controller| controller.can_control(lock))
    }

    pub fn enter(&self, lock: &dyn ThreadLock, acquired: &mut bool) -> Result<(), LockError> {
        match self.resolve(lock) {
            Some(controller) => controller.enter(lock, acquired),
            None => Err(LockError::UnsupportedLock),
        }
    }

    pub fn exit(&self, lock: &dyn ThreadLock) -> Result<(), LockError> {
        match self.resolve(lock) {
            Some(controller) => controller.exit(lock),
            None => Err(LockError::UnsupportedLock),
        }
    }

    fn resolve(&self, lock: &dyn ThreadLock) -> Option<&dyn LockController> {
        self.controllers
            .iter()
            .map(AsRef::as_ref)
            .find(|controller| controller.can_control(lock))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LockError;
    use crate::lock::{SafeFailingLock, ThreadLock};

    struct PlainLock;

    impl ThreadLock for PlainLock {
        fn enter(&self) -> Result<(), LockError> {
            Ok(())
        }

        fn exit(&self) {}
    }

    struct RefusingLock;

    impl ThreadLock for RefusingLock {
        fn enter(&self) -> Result<(), LockError> {
            Ok(())
        }

        fn exit(&self) {}

        fn as_safe_failing(&self) -> Option<&dyn SafeFailingLock> {
            Some(self)
        }
    }

    impl SafeFailingLock for RefusingLock {
        fn try_enter(&self, _acquired: &mut bool) -> Result<(), LockError> {
            Ok(())
        }
    }

    #[test]
    fn plain_lock_falls_through_to_terminal_controller() {
        let chain = LockControllerChain::standard();
        let lock = PlainLock;
        let mut acquired = false;
        chain.enter(&lock, &mut acquired).unwrap();
        assert!(acquired);
    }

    #[test]
    fn safe_failing_lock_keeps_its_reported_outcome() {
        let chain = LockControllerChain::standard();
        let lock = RefusingLock;
        let mut acquired = false;
        chain.enter(&lock, &mut acquired).unwrap();
        assert!(!acquired);
    }

    #[test]
    fn safe_failing_only_chain_cannot_control_plain_lock() {
        let chain = LockControllerChain::new(vec![Box::new(SafeFailingLockController)]);
        let lock = PlainLock;
        assert!(!chain.can_control(&lock));
        let mut acquired = false;
        assert!(matches!(
            chain.enter(&lock, &mut acquired),
            Err(LockError::UnsupportedLock)
        ));
    }
}
