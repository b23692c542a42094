use std::fmt;

/// What kind of member an [`Operation`] denotes.
///
/// Property accessors are normalized to their getter/setter operations; a
/// property reference selects both unless a getter-only or setter-only
/// extraction is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Method,
    Getter,
    Setter,
}

/// A stable identity for one interceptable operation: a method or property
/// accessor declared on a specific capability (trait or inherent impl block).
///
/// Two operations are equal iff they denote the same declared member. These
/// are the unit of inclusion/exclusion in the builder; `#[synchronized]`
/// generates one `Operation` const per member on the `{Name}Ops` type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Operation {
    owner: &'static str,
    name: &'static str,
    kind: OperationKind,
    property: Option<&'static str>,
}

impl Operation {
    /// An ordinary method operation.
    pub const fn method(owner: &'static str, name: &'static str) -> Self {
        Self {
            owner,
            name,
            kind: OperationKind::Method,
            property: None,
        }
    }

    /// A getter accessor for `property`.
    pub const fn getter(owner: &'static str, name: &'static str, property: &'static str) -> Self {
        Self {
            owner,
            name,
            kind: OperationKind::Getter,
            property: Some(property),
        }
    }

    /// A setter accessor for `property`.
    pub const fn setter(owner: &'static str, name: &'static str, property: &'static str) -> Self {
        Self {
            owner,
            name,
            kind: OperationKind::Setter,
            property: Some(property),
        }
    }

    /// Path-qualified name of the capability that declares the operation.
    /// Qualification keeps same-named capabilities in different modules
    /// distinct.
    pub fn owner(&self) -> &'static str {
        self.owner
    }

    /// Method name of the operation.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> OperationKind {
        self.kind
    }

    /// The property this accessor belongs to, if it is a getter or setter.
    pub fn property(&self) -> Option<&'static str> {
        self.property
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.owner, self.name)
    }
}

/// A by-reference member selection: either one concrete operation, or a
/// property (which resolves to both of its accessors).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberRef {
    Operation(Operation),
    Property(&'static str),
}

impl MemberRef {
    /// Reference a property by name; resolves to its getter and setter.
    pub const fn property(name: &'static str) -> Self {
        MemberRef::Property(name)
    }
}

impl From<Operation> for MemberRef {
    fn from(operation: Operation) -> Self {
        MemberRef::Operation(operation)
    }
}

/// Static description of a capability set: the operations a type declares
/// plus the capabilities it extends (supertraits).
///
/// Produced by the `CapabilityDescriptor` impl that `#[synchronized]`
/// generates on each `{Name}Ops` type. The member selector walks this graph
/// breadth-first, visiting each capability at most once, so a selection
/// expressed against a derived capability still resolves members declared on
/// an ancestor.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityInfo {
    /// Capability name, used to detect already-visited nodes.
    pub name: &'static str,
    /// Operations declared directly on this capability.
    pub declared: &'static [Operation],
    /// Descriptors of the capabilities this one extends.
    pub parents: &'static [fn() -> CapabilityInfo],
}

/// Implemented by generated `{Name}Ops` types to expose their capability
/// graph.
pub trait CapabilityDescriptor {
    fn capability() -> CapabilityInfo;
}
