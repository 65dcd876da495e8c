//! Test helper wrapping a [`PropagationEngine`], so arc tests read as scenario scripts.

use crate::basic_types::PropagationStatus;
use crate::engine::BoolNode;
use crate::engine::NodeId;
use crate::engine::PropagationEngine;
use crate::propagation::ArcBuilder;
use crate::sets::NumericValue;

pub(crate) struct TestEngine<T: NumericValue = i32> {
    pub(crate) engine: PropagationEngine<T>,
}

impl<T: NumericValue> Default for TestEngine<T> {
    fn default() -> Self {
        TestEngine {
            engine: PropagationEngine::default(),
        }
    }
}

impl<T: NumericValue> TestEngine<T> {
    pub(crate) fn new_node(&mut self, min: T, max: T) -> NodeId {
        self.engine.new_interval_node(min, max)
    }

    pub(crate) fn new_sparse_node(&mut self, values: Vec<T>) -> NodeId {
        self.engine.new_sparse_node(values)
    }

    pub(crate) fn new_bool(&mut self) -> BoolNode {
        self.engine.new_bool_node()
    }

    /// Registers the arc and immediately propagates to its fixpoint.
    pub(crate) fn add_arc<Builder: ArcBuilder<T>>(&mut self, builder: Builder) -> PropagationStatus {
        let _ = self.engine.add_arc(builder);
        self.engine.propagate()
    }

    pub(crate) fn propagate(&mut self) -> PropagationStatus {
        self.engine.propagate()
    }

    pub(crate) fn set_min(&mut self, node: NodeId, bound: T) -> PropagationStatus {
        self.engine.set_min(node, bound)?;
        self.engine.propagate()
    }

    pub(crate) fn set_max(&mut self, node: NodeId, bound: T) -> PropagationStatus {
        self.engine.set_max(node, bound)?;
        self.engine.propagate()
    }

    pub(crate) fn assign(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.engine.assign(node, value)?;
        self.engine.propagate()
    }

    pub(crate) fn remove_value(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.engine.remove_value(node, value)?;
        self.engine.propagate()
    }

    pub(crate) fn assign_bool(&mut self, node: BoolNode, value: bool) -> PropagationStatus {
        self.engine.assign_bool(node, value)?;
        self.engine.propagate()
    }

    pub(crate) fn lower_bound(&self, node: NodeId) -> T {
        self.engine.min(node)
    }

    pub(crate) fn upper_bound(&self, node: NodeId) -> T {
        self.engine.max(node)
    }

    pub(crate) fn contains(&self, node: NodeId, value: T) -> bool {
        self.engine.contains(node, value)
    }

    pub(crate) fn is_bound(&self, node: NodeId) -> bool {
        self.engine.is_bound(node)
    }

    pub(crate) fn bool_state(&self, node: BoolNode) -> Option<bool> {
        self.engine.bool_state(node)
    }

    pub(crate) fn assert_bounds(&self, node: NodeId, min: T, max: T) {
        assert_eq!(
            (min, max),
            (self.engine.min(node), self.engine.max(node)),
            "expected {node} to have bounds [{min:?}, {max:?}] but got [{:?}, {:?}]",
            self.engine.min(node),
            self.engine.max(node),
        );
    }
}
