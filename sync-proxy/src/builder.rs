use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::controller::LockControllerChain;
use crate::error::ProxyError;
use crate::interceptor::{IncludePredicate, SyncInterceptor};
use crate::lock::{LockObject, ThreadLock};
use crate::operation::{MemberRef, Operation};
use crate::proxy::SynchronizedProxy;
use crate::selector::MemberSelector;
use crate::standard::{Dependencies, LockSource};

/// Constructs the final proxy from a subject and a configured interceptor.
/// Overridable for substitution in tests.
pub type ProxyConstructor<P> =
    fn(Arc<<P as SynchronizedProxy>::Subject>, SyncInterceptor) -> P;

/// Fluent configuration surface for a synchronizing proxy over one subject.
///
/// With no selection calls, every operation reachable from the proxy's
/// capability set is synchronized. `for_*` calls switch to explicit
/// inclusion; [`except`](Self::except) opens a single-use exclusion context.
/// An operation is synchronized iff it is included (or nothing was
/// explicitly included) and not excluded.
///
/// [`build`](Self::build) snapshots the rule sets, so a proxy is never
/// affected by later mutation of the builder, and draws a fresh lock from
/// the lock source on every call.
///
/// ```
/// # use std::sync::Arc;
/// # use std::sync::atomic::{AtomicU64, Ordering};
/// use sync_proxy::{synchronized, SyncProxyBuilder};
///
/// #[synchronized]
/// pub trait Counter {
///     fn add_and_get(&self, n: u64) -> u64;
///     fn peek(&self) -> u64;
/// }
///
/// # pub struct C(AtomicU64);
/// # impl Counter for C {
/// #     fn add_and_get(&self, n: u64) -> u64 { self.0.fetch_add(n, Ordering::SeqCst) + n }
/// #     fn peek(&self) -> u64 { self.0.load(Ordering::SeqCst) }
/// # }
/// # fn main() -> Result<(), sync_proxy::ProxyError> {
/// let subject: Arc<dyn Counter + Send + Sync> = Arc::new(C(AtomicU64::new(0)));
///
/// // Synchronize everything except `peek`.
/// let proxy: CounterProxy = SyncProxyBuilder::new(subject)
///     .except()
///     .for_member(CounterOps::PEEK)
///     .build()?;
///
/// assert_eq!(proxy.add_and_get(2), 2);
/// assert_eq!(proxy.peek(), 2);
/// # Ok(())
/// # }
/// ```
pub struct SyncProxyBuilder<P: SynchronizedProxy> {
    subject: Arc<P::Subject>,
    selector: MemberSelector,
    lock_source: LockSource,
    controller_chain: Arc<LockControllerChain>,
    locking_object: Option<Arc<LockObject>>,
    constructor: ProxyConstructor<P>,
    included: Vec<Operation>,
    included_specified: bool,
    excluded: Vec<Operation>,
    excluded_specified: bool,
}

impl<P: SynchronizedProxy> SyncProxyBuilder<P> {
    /// A builder over `subject` with the standard lock source and
    /// controller chain.
    pub fn new(subject: Arc<P::Subject>) -> Self {
        Self::with_dependencies(subject, Dependencies::standard())
    }

    /// A builder with explicitly supplied collaborators.
    pub fn with_dependencies(subject: Arc<P::Subject>, dependencies: Dependencies) -> Self {
        Self {
            subject,
            selector: MemberSelector::new(P::capability()),
            lock_source: dependencies.lock_source,
            controller_chain: dependencies.controller_chain,
            locking_object: None,
            constructor: P::from_parts,
            included: Vec::new(),
            included_specified: false,
            excluded: Vec::new(),
            excluded_specified: false,
        }
    }

    /// The wrapped subject.
    pub fn subject(&self) -> &Arc<P::Subject> {
        &self.subject
    }

    /// The configured lock source, e.g. for decorating.
    pub fn lock_source(&self) -> &LockSource {
        &self.lock_source
    }

    /// The configured controller chain.
    pub fn controller_chain(&self) -> &Arc<LockControllerChain> {
        &self.controller_chain
    }

    /// Includes the member denoted by `member`: a single operation, or both
    /// accessors for a property reference.
    pub fn for_member(mut self, member: impl Into<MemberRef>) -> Self {
        let operations = self.selector.resolve(&member.into());
        self.include(operations);
        self
    }

    /// Includes only the getter of `property`.
    pub fn for_getter(mut self, property: &str) -> Self {
        let operations = self.selector.resolve_getter(property);
        self.include(operations);
        self
    }

    /// Includes only the setter of `property`.
    pub fn for_setter(mut self, property: &str) -> Self {
        let operations = self.selector.resolve_setter(property);
        self.include(operations);
        self
    }

    /// Includes an explicit list of operations, filtered to those reachable
    /// from the proxy's capability set.
    pub fn for_members(mut self, operations: impl IntoIterator<Item = Operation>) -> Self {
        let operations: Vec<Operation> = operations.into_iter().collect();
        let operations = self.selector.filter_list(&operations);
        self.include(operations);
        self
    }

    /// Includes every reachable operation matching the predicate.
    pub fn for_members_where(mut self, predicate: impl Fn(&Operation) -> bool) -> Self {
        let operations = self.selector.matching(predicate);
        self.include(operations);
        self
    }

    /// Switches to a single-use exclusion context: the members specified by
    /// the immediately following selection call will *not* be synchronized.
    pub fn except(self) -> ExceptClause<P> {
        ExceptClause { builder: self }
    }

    /// Supplies the locking object passed to the lock source, so multiple
    /// proxies can share one mutual-exclusion domain.
    pub fn with_locking_object(mut self, object: Arc<LockObject>) -> Self {
        self.locking_object = Some(object);
        self
    }

    /// Overrides how a lock is obtained at build time.
    pub fn with_lock_source(
        mut self,
        source: impl Fn(Arc<LockObject>) -> Box<dyn ThreadLock> + Send + Sync + 'static,
    ) -> Self {
        self.lock_source = Arc::new(source);
        self
    }

    /// Overrides the controller chain used to enter and exit the lock.
    pub fn with_controller_chain(mut self, chain: Arc<LockControllerChain>) -> Self {
        self.controller_chain = chain;
        self
    }

    /// Overrides how the proxy value itself is constructed, primarily for
    /// substitution in tests.
    pub fn with_constructor(mut self, constructor: ProxyConstructor<P>) -> Self {
        self.constructor = constructor;
        self
    }

    /// Builds the proxy.
    ///
    /// The inclusion and exclusion sets are snapshotted into the proxy's
    /// interceptor; a fresh lock is drawn from the lock source (bound to the
    /// configured locking object, or a dedicated one per call); and the
    /// controller chain is checked against that lock up front. An
    /// uncontrollable lock is a configuration error, not a per-call surprise.
    pub fn build(&self) -> Result<P, ProxyError> {
        let includer = self.snapshot_includer();

        let object = self
            .locking_object
            .clone()
            .unwrap_or_else(|| Arc::new(LockObject::new()));
        let lock = (self.lock_source)(object);

        if !self.controller_chain.can_control(lock.as_ref()) {
            return Err(ProxyError::UncontrollableLock);
        }

        debug!(
            proxy = P::capability().name,
            included = self.included.len(),
            excluded = self.excluded.len(),
            "building synchronizing proxy"
        );

        let interceptor =
            SyncInterceptor::new(lock, includer, Arc::clone(&self.controller_chain));

        Ok((self.constructor)(Arc::clone(&self.subject), interceptor))
    }

    fn snapshot_includer(&self) -> IncludePredicate {
        let included_specified = self.included_specified;
        let included: HashSet<Operation> = self.included.iter().copied().collect();
        let excluded_specified = self.excluded_specified;
        let excluded: HashSet<Operation> = self.excluded.iter().copied().collect();

        Arc::new(move |operation| {
            (!included_specified || included.contains(operation))
                && !(excluded_specified && excluded.contains(operation))
        })
    }

    fn include(&mut self, operations: Vec<Operation>) {
        self.included_specified = true;
        self.included.extend(operations);
    }

    fn exclude(&mut self, operations: Vec<Operation>) {
        self.excluded_specified = true;
        self.excluded.extend(operations);
    }
}

/// Single-use exclusion context returned by
/// [`SyncProxyBuilder::except`]. Exactly one selection call applies, as an
/// exclusion, and hands the builder back.
pub struct ExceptClause<P: SynchronizedProxy> {
    builder: SyncProxyBuilder<P>,
}

impl<P: SynchronizedProxy> ExceptClause<P> {
    /// Excludes the member denoted by `member`.
    pub fn for_member(mut self, member: impl Into<MemberRef>) -> SyncProxyBuilder<P> {
        let operations = self.builder.selector.resolve(&member.into());
        self.builder.exclude(operations);
        self.builder
    }

    /// Excludes only the getter of `property`.
    pub fn for_getter(mut self, property: &str) -> SyncProxyBuilder<P> {
        let operations = self.builder.selector.resolve_getter(property);
        self.builder.exclude(operations);
        self.builder
    }

    /// Excludes only the setter of `property`.
    pub fn for_setter(mut self, property: &str) -> SyncProxyBuilder<P> {
        let operations = self.builder.selector.resolve_setter(property);
        self.builder.exclude(operations);
        self.builder
    }

    /// Excludes an explicit list of operations.
    pub fn for_members(
        mut self,
        operations: impl IntoIterator<Item = Operation>,
    ) -> SyncProxyBuilder<P> {
        let operations: Vec<Operation> = operations.into_iter().collect();
        let operations = self.builder.selector.filter_list(&operations);
        self.builder.exclude(operations);
        self.builder
    }

    /// Excludes every reachable operation matching the predicate.
    pub fn for_members_where(
        mut self,
        predicate: impl Fn(&Operation) -> bool,
    ) -> SyncProxyBuilder<P> {
        let operations = self.builder.selector.matching(predicate);
        self.builder.exclude(operations);
        self.builder
    }
}

/// Wraps `subject` in a proxy with every operation synchronized.
pub fn thread_safe_proxy<P: SynchronizedProxy>(subject: Arc<P::Subject>) -> Result<P, ProxyError> {
    SyncProxyBuilder::new(subject).build()
}

/// Starts a builder for configuring a synchronizing proxy over `subject`.
/// Call [`build`](SyncProxyBuilder::build) when finished.
pub fn configure<P: SynchronizedProxy>(subject: Arc<P::Subject>) -> SyncProxyBuilder<P> {
    SyncProxyBuilder::new(subject)
}
