use std::sync::Arc;

use crate::controller::LockControllerChain;
use crate::lock::{LockObject, SafeFailingMonitorLock, ThreadLock};

/// Produces the lock a proxy will synchronize on, given the locking object
/// configured on the builder (or a fresh one when none was supplied).
pub type LockSource = Arc<dyn Fn(Arc<LockObject>) -> Box<dyn ThreadLock> + Send + Sync>;

/// The default lock source: a safe-failing monitor lock bound to the
/// locking object.
pub fn standard_lock_source() -> LockSource {
    Arc::new(|object| Box::new(SafeFailingMonitorLock::new(object)))
}

/// The default controller chain: safe-failing dispatch with a blocking
/// terminal catch-all.
pub fn standard_controller_chain() -> Arc<LockControllerChain> {
    Arc::new(LockControllerChain::standard())
}

/// The collaborators a builder needs: how to obtain a lock and how to
/// control it. [`SyncProxyBuilder::new`](crate::SyncProxyBuilder::new) uses
/// [`Dependencies::standard`]; substitute via
/// [`SyncProxyBuilder::with_dependencies`](crate::SyncProxyBuilder::with_dependencies).
#[derive(Clone)]
pub struct Dependencies {
    pub lock_source: LockSource,
    pub controller_chain: Arc<LockControllerChain>,
}

impl Dependencies {
    pub fn standard() -> Self {
        Self {
            lock_source: standard_lock_source(),
            controller_chain: standard_controller_chain(),
        }
    }
}

impl Default for Dependencies {
    fn default() -> Self {
        Self::standard()
    }
}
