use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use sync_proxy::{forward_members, synchronized, LockError, SyncProxyBuilder, ThreadLock};

#[synchronized]
pub trait Named {
    fn name(&self) -> String;
}

#[synchronized]
pub trait Greeter: Named {
    fn greet(&self) -> String;
}

// The proxy for `Greeter` forwards the inherited operations too, under
// their declaring capability's identity.
forward_members! {
    impl Named for GreeterProxy {
        fn name(&self) -> String => NamedOps::NAME;
    }
}

pub struct FriendlyGreeter;

impl Named for FriendlyGreeter {
    fn name(&self) -> String {
        "friendly".to_owned()
    }
}

impl Greeter for FriendlyGreeter {
    fn greet(&self) -> String {
        format!("hello from {}", self.name())
    }
}

struct CountingLock {
    entries: Arc<AtomicU64>,
}

impl ThreadLock for CountingLock {
    fn enter(&self) -> Result<(), LockError> {
        self.entries.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn exit(&self) {}
}

fn builder(entries: &Arc<AtomicU64>) -> SyncProxyBuilder<GreeterProxy> {
    let entries = Arc::clone(entries);
    let subject: Arc<dyn Greeter + Send + Sync> = Arc::new(FriendlyGreeter);
    SyncProxyBuilder::new(subject).with_lock_source(move |_object| {
        Box::new(CountingLock {
            entries: Arc::clone(&entries),
        })
    })
}

#[test]
fn inherited_operation_is_synchronized_by_default() {
    let entries = Arc::new(AtomicU64::new(0));
    let proxy = builder(&entries).build().unwrap();

    assert_eq!(proxy.name(), "friendly");
    assert_eq!(entries.load(Ordering::SeqCst), 1);
}

#[test]
fn inherited_operation_is_selectable_through_the_derived_capability() {
    let entries = Arc::new(AtomicU64::new(0));
    let proxy = builder(&entries)
        .for_member(NamedOps::NAME)
        .build()
        .unwrap();

    assert_eq!(proxy.name(), "friendly");
    assert_eq!(entries.load(Ordering::SeqCst), 1);

    // Not selected, so forwarded without the lock.
    assert_eq!(proxy.greet(), "hello from friendly");
    assert_eq!(entries.load(Ordering::SeqCst), 1);
}

#[test]
fn declared_operation_can_be_selected_without_the_inherited_one() {
    let entries = Arc::new(AtomicU64::new(0));
    let proxy = builder(&entries)
        .for_member(GreeterOps::GREET)
        .build()
        .unwrap();

    assert_eq!(proxy.greet(), "hello from friendly");
    assert_eq!(entries.load(Ordering::SeqCst), 1);
    assert_eq!(proxy.name(), "friendly");
    assert_eq!(entries.load(Ordering::SeqCst), 1);
}

mod metrics {
    use sync_proxy::synchronized;

    #[synchronized]
    pub trait Reporter {
        fn report(&self);
    }
}

mod billing {
    use sync_proxy::synchronized;

    #[synchronized]
    pub trait Reporter {
        fn report(&self);
    }
}

#[test]
fn same_named_capabilities_in_different_modules_stay_distinct() {
    assert_ne!(metrics::ReporterOps::REPORT, billing::ReporterOps::REPORT);
    assert_ne!(
        metrics::ReporterOps::REPORT.owner(),
        billing::ReporterOps::REPORT.owner()
    );
}

#[test]
fn derived_capability_reaches_inherited_operations() {
    use sync_proxy::{CapabilityDescriptor, MemberSelector};

    let selector = MemberSelector::new(<GreeterOps as CapabilityDescriptor>::capability());
    let reachable = selector.reachable();

    assert!(reachable.contains(&GreeterOps::GREET));
    assert!(reachable.contains(&NamedOps::NAME));
}
