use crate::arclight_assert_moderate;
use crate::basic_types::EmptyDomain;
use crate::containers::KeyedVec;
use crate::containers::StorageKey;
use crate::sets::NumericSet;
use crate::sets::NumericValue;
use crate::sets::SetEvent;

/// A node references a single domain in the [`NodeStore`].
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NodeId {
    pub id: u32,
}

impl NodeId {
    pub const fn new(id: u32) -> Self {
        NodeId { id }
    }
}

impl StorageKey for NodeId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        NodeId::new(index as u32)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node{}", self.id)
    }
}

/// A node whose domain is a subset of `{0, 1}`, read and written as a three-valued truth
/// assignment: bound to 1, bound to 0, or still undetermined.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub struct BoolNode {
    node_id: NodeId,
}

impl BoolNode {
    pub(crate) const fn new(node_id: NodeId) -> Self {
        BoolNode { node_id }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }
}

/// A single variable of the engine: a domain plus the identity under which its changes are
/// reported.
///
/// An empty domain reads as an inverted pair of bounds (`min() > max()`), which mutators never
/// let escape: any operation that empties the domain reports [`EmptyDomain`] instead.
#[derive(Clone, Debug)]
pub struct Node<T> {
    id: NodeId,
    set: NumericSet<T>,
}

impl<T: NumericValue> Node<T> {
    fn new(id: NodeId, mut set: NumericSet<T>) -> Self {
        set.set_listener(id.id);
        Node { id, set }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn set(&self) -> &NumericSet<T> {
        &self.set
    }

    /// The smallest value in the domain, or `MAX_BOUND` when the domain is empty.
    pub fn min(&self) -> T {
        self.set.min().unwrap_or(T::MAX_BOUND)
    }

    /// The largest value in the domain, or `MIN_BOUND` when the domain is empty.
    pub fn max(&self) -> T {
        self.set.max().unwrap_or(T::MIN_BOUND)
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    pub fn is_bound(&self) -> bool {
        !self.set.is_empty() && self.min() == self.max()
    }

    pub fn size(&self) -> u64 {
        self.set.size()
    }

    pub fn contains(&self, value: T) -> bool {
        self.set.contains(value)
    }

    pub fn next_higher(&self, value: T) -> T {
        self.set.next_higher(value)
    }

    pub fn next_lower(&self, value: T) -> T {
        self.set.next_lower(value)
    }

    fn check_consistency(&self) -> Result<(), EmptyDomain> {
        if self.set.is_empty() {
            Err(EmptyDomain)
        } else {
            Ok(())
        }
    }

    /// Removes all values smaller than `bound`. A bound weaker than the current minimum is a
    /// no-op.
    pub fn set_min(&mut self, bound: T) -> Result<(), EmptyDomain> {
        if bound.is_invalid() || bound <= self.min() {
            return Ok(());
        }
        self.set.remove_ending_before(bound);
        self.check_consistency()
    }

    /// Removes all values greater than `bound`. A bound weaker than the current maximum is a
    /// no-op.
    pub fn set_max(&mut self, bound: T) -> Result<(), EmptyDomain> {
        if bound.is_invalid() || bound >= self.max() {
            return Ok(());
        }
        self.set.remove_starting_after(bound);
        self.check_consistency()
    }

    /// Binds the node to `value`, removing everything else.
    pub fn assign(&mut self, value: T) -> Result<(), EmptyDomain> {
        if !self.set.contains(value) {
            // Emptying the domain here keeps the invariant that a failed node reads as
            // min() > max().
            self.set.remove_range(self.min(), self.max());
            return Err(EmptyDomain);
        }
        self.set.remove_ending_before(value);
        self.set.remove_starting_after(value);
        arclight_assert_moderate!(self.is_bound());
        Ok(())
    }

    pub fn remove_value(&mut self, value: T) -> Result<(), EmptyDomain> {
        self.set.remove(value);
        self.check_consistency()
    }

    /// Removes the closed range `[start, end]` from the domain.
    pub fn remove_range(&mut self, start: T, end: T) -> Result<(), EmptyDomain> {
        self.set.remove_range(start, end);
        self.check_consistency()
    }

    /// Keeps only the values that are also members of `other`.
    pub fn retain_set(&mut self, other: &NumericSet<T>) -> Result<(), EmptyDomain> {
        self.set.retain_all(other);
        self.check_consistency()
    }

    /// Removes every member of `other` from the domain.
    pub fn remove_set(&mut self, other: &NumericSet<T>) -> Result<(), EmptyDomain> {
        self.set.remove_all(other);
        self.check_consistency()
    }

    pub(crate) fn drain_events(&mut self) -> Vec<(u32, SetEvent<T>)> {
        self.set.drain_events()
    }
}

/// The store of all node domains of an engine.
#[derive(Clone, Debug)]
pub struct NodeStore<T> {
    nodes: KeyedVec<NodeId, Node<T>>,
}

impl<T> Default for NodeStore<T> {
    fn default() -> Self {
        NodeStore {
            nodes: KeyedVec::default(),
        }
    }
}

impl<T: NumericValue> NodeStore<T> {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn new_node(&mut self, set: NumericSet<T>) -> NodeId {
        let id = NodeId::new(self.nodes.len() as u32);
        let _ = self.nodes.push(Node::new(id, set));
        id
    }

    pub fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id]
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }
}
