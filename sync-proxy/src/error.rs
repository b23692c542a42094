use std::any::TypeId;

use thiserror::Error;

use crate::operation::Operation;

/// Configuration errors surfaced while building a proxy.
///
/// These are never retried and never deferred: a builder whose configuration
/// cannot produce a working proxy fails at [`build`](crate::SyncProxyBuilder::build)
/// (or at the dynamic-factory call site), before any call is forwarded.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// The configured lock is not handled by any controller in the chain.
    #[error("no lock controller in the chain can control the configured lock")]
    UncontrollableLock,

    /// A dynamic proxy construction was requested for a `TypeId` that was
    /// never registered with the factory.
    #[error("no typed proxy adapter registered for {0:?}")]
    UnregisteredProxyType(TypeId),

    /// The erased subject handed to a dynamic proxy construction does not
    /// hold the subject type the proxy expects.
    #[error("subject cannot be downcast to the type expected by proxy `{0}`")]
    SubjectMismatch(&'static str),
}

/// An error raised while entering or exiting a lock.
#[derive(Debug, Error)]
pub enum LockError {
    /// A safe-failing controller was asked to enter a lock that does not
    /// support safe-failing entry.
    #[error("lock does not support safe-failing entry")]
    NotSafeFailing,

    /// No controller in the chain can control the lock. The builder checks
    /// controllability before constructing a proxy, so an interceptor only
    /// sees this if the chain was swapped out from under it.
    #[error("no lock controller in the chain can control the lock")]
    UnsupportedLock,

    /// A lock implementation failed while entering.
    #[error("lock entry failed: {0}")]
    Entry(String),
}

impl LockError {
    /// An entry failure carrying a lock-specific message.
    pub fn entry(message: impl Into<String>) -> Self {
        LockError::Entry(message.into())
    }
}

/// A synchronized operation's lock reported "not acquired" without raising
/// an error. The call was not forwarded to the subject and the lock will not
/// be exited.
///
/// Raised as a panic payload from the intercepted call; recover it with
/// [`std::panic::catch_unwind`] and downcast.
#[derive(Debug, Error)]
#[error("failed to acquire the synchronization lock for `{operation}`")]
pub struct LockFailure {
    operation: Operation,
}

impl LockFailure {
    pub(crate) fn new(operation: Operation) -> Self {
        Self { operation }
    }

    /// The operation whose lock acquisition failed.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }
}
