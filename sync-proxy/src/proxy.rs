use std::sync::Arc;

use crate::interceptor::SyncInterceptor;
use crate::operation::CapabilityInfo;

/// Implemented by every proxy type that `#[synchronized]` generates.
///
/// The builder is generic over this trait: it resolves member selections
/// against [`capability`](SynchronizedProxy::capability) and assembles the
/// final proxy through [`from_parts`](SynchronizedProxy::from_parts).
pub trait SynchronizedProxy: Sized + 'static {
    /// The wrapped subject type: `dyn Trait + Send + Sync` for trait
    /// proxies, the concrete type for inherent-impl proxies.
    type Subject: ?Sized + Send + Sync + 'static;

    /// Descriptor of the proxy's capability set.
    fn capability() -> CapabilityInfo;

    /// Assembles a proxy from a subject and a configured interceptor.
    fn from_parts(subject: Arc<Self::Subject>, interceptor: SyncInterceptor) -> Self;
}

/// Routes supertrait members of a generated proxy through its interceptor.
///
/// `#[synchronized]` on `trait Greeter: Named` makes `Named`'s operations
/// selectable, but it cannot see `Named`'s method signatures, so the
/// `impl Named for GreeterProxy` must be written out once:
///
/// ```ignore
/// sync_proxy::forward_members! {
///     impl Named for GreeterProxy {
///         fn name(&self) -> String => NamedOps::NAME;
///     }
/// }
/// ```
#[macro_export]
macro_rules! forward_members {
    (impl $trait_:ident for $proxy:ty {
        $( fn $method:ident(&self $(, $arg:ident : $ty:ty)* $(,)?) $(-> $ret:ty)? => $op:expr; )*
    }) => {
        impl $trait_ for $proxy {
            $(
                fn $method(&self $(, $arg: $ty)*) $(-> $ret)? {
                    self.__intercept(&$op, || self.subject().$method($($arg),*))
                }
            )*
        }
    };
}
