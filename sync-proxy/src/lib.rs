//! Wrap any object in a **synchronizing proxy** with per-operation lock
//! selection via proc macro.
//!
//! Annotate a trait (or an inherent impl block) with `#[synchronized]` and
//! get a forwarding proxy type plus a fluent builder that lets you select
//! exactly which operations acquire a lock before the call is forwarded.
//! The lock is released on every path out of the call (normal return,
//! panic in the subject, or an error during entry after acquisition)
//! and is never released unless it was acquired.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use sync_proxy::{synchronized, SyncProxyBuilder};
//!
//! #[synchronized]
//! pub trait Counter {
//!     fn add_and_get(&self, n: u64) -> u64;
//! }
//!
//! pub struct SimpleCounter {
//!     value: AtomicU64,
//! }
//!
//! impl Counter for SimpleCounter {
//!     fn add_and_get(&self, n: u64) -> u64 {
//!         self.value.fetch_add(n, Ordering::SeqCst) + n
//!     }
//! }
//!
//! # fn main() -> Result<(), sync_proxy::ProxyError> {
//! let subject: Arc<dyn Counter + Send + Sync> =
//!     Arc::new(SimpleCounter { value: AtomicU64::new(0) });
//!
//! // All operations synchronized by default.
//! let proxy: CounterProxy = SyncProxyBuilder::new(subject).build()?;
//! assert_eq!(proxy.add_and_get(5), 5);
//! # Ok(())
//! # }
//! ```
//!
//! # Selecting operations
//!
//! Selection is by reference (an `Operation` const or a property), by
//! explicit list, or by predicate; `except()` opens a single-use exclusion
//! context:
//!
//! ```rust
//! # use std::sync::Arc;
//! # use sync_proxy::{synchronized, SyncProxyBuilder, OperationKind};
//! # #[synchronized]
//! # pub trait Store {
//! #     fn put(&self, value: u64);
//! #     fn len(&self) -> usize;
//! # }
//! # pub struct S;
//! # impl Store for S {
//! #     fn put(&self, _value: u64) {}
//! #     fn len(&self) -> usize { 0 }
//! # }
//! # fn main() -> Result<(), sync_proxy::ProxyError> {
//! # let subject: Arc<dyn Store + Send + Sync> = Arc::new(S);
//! // Only `put` is synchronized...
//! let proxy: StoreProxy = SyncProxyBuilder::new(Arc::clone(&subject))
//!     .for_member(StoreOps::PUT)
//!     .build()?;
//!
//! // ...or everything except `len`.
//! let proxy: StoreProxy = SyncProxyBuilder::new(subject)
//!     .except()
//!     .for_member(StoreOps::LEN)
//!     .build()?;
//! # let _ = proxy;
//! # Ok(())
//! # }
//! ```
//!
//! # Shared locking domains
//!
//! Each `build()` draws a fresh lock, bound to a dedicated locking object
//! unless one is supplied; proxies built over the same
//! [`LockObject`] serialize against each other:
//!
//! ```rust
//! # use std::sync::Arc;
//! # use sync_proxy::{synchronized, SyncProxyBuilder, LockObject};
//! # #[synchronized]
//! # pub trait Store { fn put(&self, value: u64); }
//! # pub struct S;
//! # impl Store for S { fn put(&self, _value: u64) {} }
//! # fn main() -> Result<(), sync_proxy::ProxyError> {
//! # let subject: Arc<dyn Store + Send + Sync> = Arc::new(S);
//! let domain = Arc::new(LockObject::new());
//!
//! let first: StoreProxy = SyncProxyBuilder::new(Arc::clone(&subject))
//!     .with_locking_object(Arc::clone(&domain))
//!     .build()?;
//! let second: StoreProxy = SyncProxyBuilder::new(subject)
//!     .with_locking_object(domain)
//!     .build()?;
//! # let _ = (first, second);
//! # Ok(())
//! # }
//! ```
//!
//! # Generated Types
//!
//! For a trait `Foo`, `#[synchronized]` generates:
//!
//! | Type | Purpose |
//! |------|---------|
//! | `FooOps` | One [`Operation`] const per member, plus the capability descriptor |
//! | `FooProxy` | Forwarding proxy implementing `Foo`, routing calls through a [`SyncInterceptor`] |
//!
//! On an inherent `impl Foo { .. }` block the same pair is generated, with
//! `FooProxy` wrapping `Arc<Foo>` and mirroring the block's methods (methods
//! declared elsewhere on `Foo` are not exposed on the proxy).

mod builder;
mod controller;
mod dynamic;
mod error;
mod interceptor;
mod lock;
mod operation;
mod proxy;
mod selector;
mod standard;

pub use builder::{configure, thread_safe_proxy, ExceptClause, ProxyConstructor, SyncProxyBuilder};
pub use controller::{
    BlockingLockController, LockController, LockControllerChain, SafeFailingLockController,
};
pub use dynamic::{DynamicProxyFactory, TypedCall};
pub use error::{LockError, LockFailure, ProxyError};
pub use interceptor::{IncludePredicate, SyncInterceptor};
pub use lock::{LockObject, MonitorLock, SafeFailingLock, SafeFailingMonitorLock, ThreadLock};
pub use operation::{CapabilityDescriptor, CapabilityInfo, MemberRef, Operation, OperationKind};
pub use proxy::SynchronizedProxy;
pub use selector::MemberSelector;
pub use standard::{standard_controller_chain, standard_lock_source, Dependencies, LockSource};
pub use sync_proxy_derive::synchronized;
