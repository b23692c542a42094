use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::ProxyError;
use crate::interceptor::SyncInterceptor;
use crate::proxy::SynchronizedProxy;
use crate::standard::Dependencies;

type ErasedConstructor = fn(Box<dyn Any>, SyncInterceptor) -> Result<Box<dyn Any>, ProxyError>;

/// A type-erased adapter that invokes the statically-typed proxy
/// construction path for one proxy type.
#[derive(Clone, Copy)]
pub struct TypedCall {
    proxy_type: &'static str,
    construct: ErasedConstructor,
}

impl TypedCall {
    fn of<P: SynchronizedProxy>() -> Self {
        Self {
            proxy_type: type_name::<P>(),
            construct: construct_erased::<P>,
        }
    }

    /// Name of the proxy type this adapter constructs.
    pub fn proxy_type(&self) -> &'static str {
        self.proxy_type
    }

    /// Constructs the proxy. `subject` must hold an `Arc` of the proxy's
    /// subject type; the result holds the proxy value.
    pub fn invoke(
        &self,
        subject: Box<dyn Any>,
        interceptor: SyncInterceptor,
    ) -> Result<Box<dyn Any>, ProxyError> {
        (self.construct)(subject, interceptor)
    }
}

fn construct_erased<P: SynchronizedProxy>(
    subject: Box<dyn Any>,
    interceptor: SyncInterceptor,
) -> Result<Box<dyn Any>, ProxyError> {
    let subject = subject
        .downcast::<Arc<P::Subject>>()
        .map_err(|_| ProxyError::SubjectMismatch(type_name::<P>()))?;
    Ok(Box::new(P::from_parts(*subject, interceptor)))
}

/// Builds proxies when the proxy type is only known as a runtime [`TypeId`].
///
/// Adapters are populated lazily through [`register`](Self::register), which
/// needs the static type once; afterwards [`create_proxy`](Self::create_proxy)
/// works from the bare `TypeId`. The cache is guarded by its own mutex,
/// distinct from any subject-level lock; racing registrations of the same
/// type are harmless (the first entry wins).
pub struct DynamicProxyFactory {
    dependencies: Dependencies,
    calls: Mutex<HashMap<TypeId, TypedCall>>,
}

impl DynamicProxyFactory {
    pub fn new() -> Self {
        Self::with_dependencies(Dependencies::standard())
    }

    pub fn with_dependencies(dependencies: Dependencies) -> Self {
        Self {
            dependencies,
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Ensures an adapter exists for `P` and returns it.
    pub fn register<P: SynchronizedProxy>(&self) -> TypedCall {
        let mut calls = self.calls.lock();
        *calls
            .entry(TypeId::of::<P>())
            .or_insert_with(TypedCall::of::<P>)
    }

    /// Looks up the adapter for a runtime proxy type. An unregistered type
    /// is a configuration error: Rust cannot conjure a monomorphized
    /// construction path from a bare `TypeId`.
    pub fn typed_call(&self, proxy_type: TypeId) -> Result<TypedCall, ProxyError> {
        self.calls
            .lock()
            .get(&proxy_type)
            .copied()
            .ok_or(ProxyError::UnregisteredProxyType(proxy_type))
    }

    /// Builds a proxy for a runtime proxy type with every operation
    /// synchronized, using this factory's dependencies.
    ///
    /// `subject` must hold an `Arc` of the subject type the proxy expects;
    /// the returned box holds the proxy value.
    pub fn create_proxy(
        &self,
        proxy_type: TypeId,
        subject: Box<dyn Any>,
    ) -> Result<Box<dyn Any>, ProxyError> {
        let interceptor = self.default_interceptor()?;
        self.create_proxy_with(proxy_type, subject, interceptor)
    }

    /// Builds a proxy for a runtime proxy type with a caller-configured
    /// interceptor.
    pub fn create_proxy_with(
        &self,
        proxy_type: TypeId,
        subject: Box<dyn Any>,
        interceptor: SyncInterceptor,
    ) -> Result<Box<dyn Any>, ProxyError> {
        let call = self.typed_call(proxy_type)?;
        call.invoke(subject, interceptor)
    }

    fn default_interceptor(&self) -> Result<SyncInterceptor, ProxyError> {
        use crate::lock::LockObject;

        let object = Arc::new(LockObject::new());
        let lock = (self.dependencies.lock_source)(object);
        if !self.dependencies.controller_chain.can_control(lock.as_ref()) {
            return Err(ProxyError::UncontrollableLock);
        }
        Ok(SyncInterceptor::new(
            lock,
            Arc::new(|_| true),
            Arc::clone(&self.dependencies.controller_chain),
        ))
    }
}

impl Default for DynamicProxyFactory {
    fn default() -> Self {
        Self::new()
    }
}
