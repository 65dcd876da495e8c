use crate::arclight_assert_moderate;
use crate::basic_types::EmptyDomain;
use crate::engine::event_sink::EventSink;
use crate::engine::BoolNode;
use crate::engine::DomainEvent;
use crate::engine::Node;
use crate::engine::NodeId;
use crate::engine::NodeStore;
use crate::sets::NumericSet;
use crate::sets::NumericValue;
use crate::sets::SetEvent;

/// The view of the domains an arc gets while it propagates.
///
/// All mutations funnel through this context so that every change is classified into the
/// [`DomainEvent`]s the watch lists are keyed by, and so the exact removed ranges are captured
/// for the delta of each watching arc.
pub struct PropagationContextMut<'a, T: NumericValue> {
    nodes: &'a mut NodeStore<T>,
    events: &'a mut EventSink,
    deltas: &'a mut Vec<(NodeId, SetEvent<T>)>,
}

impl<T: NumericValue> std::fmt::Debug for PropagationContextMut<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropagationContextMut")
            .field("nodes", &self.nodes)
            .finish_non_exhaustive()
    }
}

impl<'a, T: NumericValue> PropagationContextMut<'a, T> {
    pub(crate) fn new(
        nodes: &'a mut NodeStore<T>,
        events: &'a mut EventSink,
        deltas: &'a mut Vec<(NodeId, SetEvent<T>)>,
    ) -> Self {
        PropagationContextMut {
            nodes,
            events,
            deltas,
        }
    }

    fn node(&self, node: NodeId) -> &Node<T> {
        self.nodes.node(node)
    }

    pub fn min(&self, node: NodeId) -> T {
        self.node(node).min()
    }

    pub fn max(&self, node: NodeId) -> T {
        self.node(node).max()
    }

    pub fn is_bound(&self, node: NodeId) -> bool {
        self.node(node).is_bound()
    }

    pub fn is_empty(&self, node: NodeId) -> bool {
        self.node(node).is_empty()
    }

    pub fn size(&self, node: NodeId) -> u64 {
        self.node(node).size()
    }

    pub fn contains(&self, node: NodeId, value: T) -> bool {
        self.node(node).contains(value)
    }

    pub fn next_higher(&self, node: NodeId, value: T) -> T {
        self.node(node).next_higher(value)
    }

    pub fn next_lower(&self, node: NodeId, value: T) -> T {
        self.node(node).next_lower(value)
    }

    pub fn set(&self, node: NodeId) -> &NumericSet<T> {
        self.node(node).set()
    }

    pub fn clone_set(&self, node: NodeId) -> NumericSet<T> {
        self.node(node).set().clone()
    }

    /// The domain as a flat value list. Only meaningful for small domains; callers gate on
    /// [`PropagationContextMut::size`] first.
    pub fn collect_values(&self, node: NodeId) -> Vec<T> {
        self.node(node).set().collect_values()
    }

    /// The truth state of a boolean node: bound to 1, bound to 0, or undetermined.
    pub fn bool_state(&self, node: BoolNode) -> Option<bool> {
        let id = node.node_id();
        if self.min(id) > T::ZERO {
            Some(true)
        } else if self.max(id) < T::ONE {
            Some(false)
        } else {
            None
        }
    }

    /// Applies a mutation to a node and translates the raw set events it produced into domain
    /// events and per-arc deltas.
    fn apply(
        &mut self,
        node: NodeId,
        operation: impl FnOnce(&mut Node<T>) -> Result<(), EmptyDomain>,
    ) -> Result<(), EmptyDomain> {
        let target = self.nodes.node_mut(node);
        let min_before = target.min();
        let max_before = target.max();
        let bound_before = target.is_bound();

        let result = operation(target);

        let raw_events = target.drain_events();
        if raw_events.is_empty() {
            return result;
        }

        for (_, event) in raw_events {
            arclight_assert_moderate!(matches!(
                event,
                SetEvent::RangeRemoved { .. } | SetEvent::ValueRemoved(_)
            ));
            self.deltas.push((node, event));
        }

        let target = self.nodes.node(node);
        if target.min() > min_before {
            self.events.event_occurred(DomainEvent::LowerBound, node);
        }
        if target.max() < max_before {
            self.events.event_occurred(DomainEvent::UpperBound, node);
        }
        self.events.event_occurred(DomainEvent::Removal, node);
        if !bound_before && target.is_bound() {
            self.events.event_occurred(DomainEvent::Assign, node);
        }

        result
    }

    pub fn set_min(&mut self, node: NodeId, bound: T) -> Result<(), EmptyDomain> {
        self.apply(node, |target| target.set_min(bound))
    }

    pub fn set_max(&mut self, node: NodeId, bound: T) -> Result<(), EmptyDomain> {
        self.apply(node, |target| target.set_max(bound))
    }

    pub fn assign(&mut self, node: NodeId, value: T) -> Result<(), EmptyDomain> {
        self.apply(node, |target| target.assign(value))
    }

    pub fn remove_value(&mut self, node: NodeId, value: T) -> Result<(), EmptyDomain> {
        self.apply(node, |target| target.remove_value(value))
    }

    pub fn remove_range(&mut self, node: NodeId, start: T, end: T) -> Result<(), EmptyDomain> {
        self.apply(node, |target| target.remove_range(start, end))
    }

    /// Keeps only the values of `node` that are members of `keep`.
    pub fn retain_set(&mut self, node: NodeId, keep: &NumericSet<T>) -> Result<(), EmptyDomain> {
        self.apply(node, |target| target.retain_set(keep))
    }

    /// Removes every member of `forbidden` from `node`.
    pub fn remove_set(
        &mut self,
        node: NodeId,
        forbidden: &NumericSet<T>,
    ) -> Result<(), EmptyDomain> {
        self.apply(node, |target| target.remove_set(forbidden))
    }

    /// Keeps only the values of `node` that are also in the domain of `other`.
    pub fn retain_node(&mut self, node: NodeId, other: NodeId) -> Result<(), EmptyDomain> {
        let keep = self.clone_set(other);
        self.retain_set(node, &keep)
    }

    /// Binds a boolean node to the given truth value.
    pub fn bind_bool(&mut self, node: BoolNode, value: bool) -> Result<(), EmptyDomain> {
        let target = if value { T::ONE } else { T::ZERO };
        self.assign(node.node_id(), target)
    }
}
