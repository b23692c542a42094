use std::collections::VecDeque;

use crate::operation::{CapabilityInfo, MemberRef, Operation, OperationKind};

/// Resolves member selections into concrete [`Operation`] sets.
///
/// All resolution walks the capability graph of the proxy type breadth-first:
/// the root capability, then its parents, then theirs, each visited at most
/// once. A member declared on a supertrait is therefore reachable through a
/// selection expressed against the derived capability.
#[derive(Debug, Clone, Copy)]
pub struct MemberSelector {
    root: CapabilityInfo,
}

impl MemberSelector {
    pub fn new(root: CapabilityInfo) -> Self {
        Self { root }
    }

    /// Every operation reachable from the root capability.
    pub fn reachable(&self) -> Vec<Operation> {
        self.collect(|_| true)
    }

    /// Resolves a by-reference selection. An operation reference yields that
    /// operation (if reachable); a property reference yields both accessors.
    pub fn resolve(&self, member: &MemberRef) -> Vec<Operation> {
        match member {
            MemberRef::Operation(operation) => self.collect(|candidate| candidate == operation),
            MemberRef::Property(property) => self.collect(|candidate| {
                matches!(
                    candidate.kind(),
                    OperationKind::Getter | OperationKind::Setter
                ) && candidate.property() == Some(*property)
            }),
        }
    }

    /// Getter-only extraction for a property reference.
    pub fn resolve_getter(&self, property: &str) -> Vec<Operation> {
        self.collect(|candidate| {
            candidate.kind() == OperationKind::Getter && candidate.property() == Some(property)
        })
    }

    /// Setter-only extraction for a property reference.
    pub fn resolve_setter(&self, property: &str) -> Vec<Operation> {
        self.collect(|candidate| {
            candidate.kind() == OperationKind::Setter && candidate.property() == Some(property)
        })
    }

    /// An explicit list, filtered to the operations reachable from the root.
    pub fn filter_list(&self, operations: &[Operation]) -> Vec<Operation> {
        self.collect(|candidate| operations.contains(candidate))
    }

    /// Every reachable operation matching the predicate.
    pub fn matching(&self, predicate: impl Fn(&Operation) -> bool) -> Vec<Operation> {
        self.collect(predicate)
    }

    fn collect(&self, mut filter: impl FnMut(&Operation) -> bool) -> Vec<Operation> {
        let mut visited: Vec<&'static str> = Vec::new();
        let mut waiting: VecDeque<CapabilityInfo> = VecDeque::new();
        let mut operations = Vec::new();

        waiting.push_back(self.root);

        while let Some(capability) = waiting.pop_front() {
            if visited.contains(&capability.name) {
                continue;
            }
            visited.push(capability.name);

            for operation in capability.declared {
                if filter(operation) && !operations.contains(operation) {
                    operations.push(*operation);
                }
            }

            for parent in capability.parents {
                let parent = parent();
                if !visited.contains(&parent.name) {
                    waiting.push_back(parent);
                }
            }
        }

        operations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE_OPS: &[Operation] = &[
        Operation::method("Base", "poke"),
        Operation::getter("Base", "label", "label"),
        Operation::setter("Base", "set_label", "label"),
    ];

    const DERIVED_OPS: &[Operation] = &[Operation::method("Derived", "prod")];

    fn base() -> CapabilityInfo {
        CapabilityInfo {
            name: "Base",
            declared: BASE_OPS,
            parents: &[],
        }
    }

    fn derived() -> CapabilityInfo {
        CapabilityInfo {
            name: "Derived",
            declared: DERIVED_OPS,
            parents: &[base],
        }
    }

    // Both parents reach Base; it must only be visited once.
    fn diamond() -> CapabilityInfo {
        CapabilityInfo {
            name: "Diamond",
            declared: &[],
            parents: &[derived, base],
        }
    }

    #[test]
    fn reachable_includes_parent_operations() {
        let selector = MemberSelector::new(derived());
        let operations = selector.reachable();
        assert_eq!(operations.len(), 4);
        assert!(operations.contains(&Operation::method("Base", "poke")));
        assert!(operations.contains(&Operation::method("Derived", "prod")));
    }

    #[test]
    fn diamond_hierarchy_visits_each_capability_once() {
        let selector = MemberSelector::new(diamond());
        assert_eq!(selector.reachable().len(), 4);
    }

    #[test]
    fn property_reference_yields_both_accessors() {
        let selector = MemberSelector::new(derived());
        let operations = selector.resolve(&MemberRef::property("label"));
        assert_eq!(operations.len(), 2);
    }

    #[test]
    fn getter_only_extraction() {
        let selector = MemberSelector::new(base());
        let operations = selector.resolve_getter("label");
        assert_eq!(operations, vec![Operation::getter("Base", "label", "label")]);
    }

    #[test]
    fn list_is_filtered_to_reachable_operations() {
        let selector = MemberSelector::new(base());
        let operations = selector.filter_list(&[
            Operation::method("Base", "poke"),
            Operation::method("Elsewhere", "other"),
        ]);
        assert_eq!(operations, vec![Operation::method("Base", "poke")]);
    }

    #[test]
    fn predicate_runs_over_the_whole_graph() {
        let selector = MemberSelector::new(derived());
        let operations = selector.matching(|op| op.kind() == OperationKind::Method);
        assert_eq!(operations.len(), 2);
    }
}
