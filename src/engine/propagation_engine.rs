use log::debug;
use log::trace;

use crate::arclight_assert_simple;
use crate::basic_types::PropagationFailure;
use crate::basic_types::PropagationStatus;
use crate::containers::KeyedVec;
use crate::engine::arc_queue::ArcQueue;
use crate::engine::event_sink::EventSink;
use crate::engine::node::BoolNode;
use crate::engine::node::Node;
use crate::engine::node::NodeId;
use crate::engine::node::NodeStore;
use crate::engine::watch_list::WatchList;
use crate::engine::DomainEvent;
use crate::propagation::Arc;
use crate::propagation::ArcBuilder;
use crate::propagation::ArcId;
use crate::propagation::ArcRegistrationContext;
use crate::propagation::Delta;
use crate::propagation::EnqueueDecision;
use crate::propagation::PropagationContextMut;
use crate::sets::NumericSet;
use crate::sets::NumericValue;
use crate::sets::SetEvent;

/// The propagation engine: a store of node domains, the arcs that connect them, and the
/// scheduling machinery that runs the arcs to a fixpoint.
///
/// The engine is generic over the scalar kind of its domains. Mixing kinds within one engine is
/// not supported; a model over several kinds runs one engine per kind, bridged externally.
///
/// Failure is terminal: once a propagation attempt empties a domain or an arc reports a
/// contradiction, the engine rejects further mutation and propagation. Recovering (for instance
/// when a search layer backtracks) means rebuilding the engine from the retained model.
pub struct PropagationEngine<T: NumericValue> {
    nodes: NodeStore<T>,
    arcs: KeyedVec<ArcId, Box<dyn Arc<T>>>,
    watch_list: WatchList,
    queue: ArcQueue,
    event_sink: EventSink,
    delta_sink: Vec<(NodeId, SetEvent<T>)>,
    pending_deltas: KeyedVec<ArcId, Delta<T>>,
    failed: bool,
}

// `Box<dyn Arc<T>>` rules out deriving; the arcs render by name.
impl<T: NumericValue> std::fmt::Debug for PropagationEngine<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropagationEngine")
            .field("nodes", &self.nodes)
            .field("arcs", &self.arcs.iter().map(|arc| arc.name()).collect::<Vec<_>>())
            .field("failed", &self.failed)
            .finish_non_exhaustive()
    }
}

impl<T: NumericValue> Default for PropagationEngine<T> {
    fn default() -> Self {
        PropagationEngine {
            nodes: NodeStore::default(),
            arcs: KeyedVec::default(),
            watch_list: WatchList::default(),
            queue: ArcQueue::default(),
            event_sink: EventSink::default(),
            delta_sink: Vec::new(),
            pending_deltas: KeyedVec::default(),
            failed: false,
        }
    }
}

impl<T: NumericValue> PropagationEngine<T> {
    /// Creates a node whose domain is the closed interval `[min, max]`.
    pub fn new_interval_node(&mut self, min: T, max: T) -> NodeId {
        self.new_node(NumericSet::new_interval_set(min, max))
    }

    /// Creates a node whose domain holds exactly the given values.
    pub fn new_sparse_node(&mut self, values: Vec<T>) -> NodeId {
        self.new_node(NumericSet::sparse_from_values(values))
    }

    /// Creates a boolean node: an interval node over `[0, 1]` with a three-valued read/write
    /// surface.
    pub fn new_bool_node(&mut self) -> BoolNode {
        BoolNode::new(self.new_interval_node(T::ZERO, T::ONE))
    }

    fn new_node(&mut self, set: NumericSet<T>) -> NodeId {
        self.watch_list.grow();
        self.event_sink.grow();
        self.nodes.new_node(set)
    }

    /// Registers an arc and schedules its first run. The arc does not propagate until the next
    /// call to [`PropagationEngine::propagate`].
    pub fn add_arc<Builder: ArcBuilder<T>>(&mut self, builder: Builder) -> ArcId {
        let arc_id = ArcId(self.arcs.len() as u32);
        let arc = builder.create(ArcRegistrationContext::new(arc_id, &mut self.watch_list));
        let priority = arc.priority();

        let stored_id = self.arcs.push(Box::new(arc));
        arclight_assert_simple!(stored_id == arc_id);
        let _ = self.pending_deltas.push(Delta::default());

        trace!("registered {} ({})", arc_id, self.arcs[arc_id].name());
        self.queue.enqueue(arc_id, priority);
        arc_id
    }

    pub fn node(&self, id: NodeId) -> &Node<T> {
        self.nodes.node(id)
    }

    pub fn min(&self, node: NodeId) -> T {
        self.nodes.node(node).min()
    }

    pub fn max(&self, node: NodeId) -> T {
        self.nodes.node(node).max()
    }

    pub fn contains(&self, node: NodeId, value: T) -> bool {
        self.nodes.node(node).contains(value)
    }

    pub fn is_bound(&self, node: NodeId) -> bool {
        self.nodes.node(node).is_bound()
    }

    pub fn size(&self, node: NodeId) -> u64 {
        self.nodes.node(node).size()
    }

    /// The truth state of a boolean node.
    pub fn bool_state(&self, node: BoolNode) -> Option<bool> {
        let node = self.nodes.node(node.node_id());
        if node.min() > T::ZERO {
            Some(true)
        } else if node.max() < T::ONE {
            Some(false)
        } else {
            None
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failed
    }

    /// Narrows a node from outside the engine (a search decision, or an external bound). The
    /// affected arcs are scheduled but do not run until [`PropagationEngine::propagate`].
    pub fn set_min(&mut self, node: NodeId, bound: T) -> PropagationStatus {
        self.mutate(|context| context.set_min(node, bound))
    }

    pub fn set_max(&mut self, node: NodeId, bound: T) -> PropagationStatus {
        self.mutate(|context| context.set_max(node, bound))
    }

    pub fn assign(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.mutate(|context| context.assign(node, value))
    }

    pub fn remove_value(&mut self, node: NodeId, value: T) -> PropagationStatus {
        self.mutate(|context| context.remove_value(node, value))
    }

    pub fn remove_range(&mut self, node: NodeId, start: T, end: T) -> PropagationStatus {
        self.mutate(|context| context.remove_range(node, start, end))
    }

    /// Binds a boolean node to the given truth value.
    pub fn assign_bool(&mut self, node: BoolNode, value: bool) -> PropagationStatus {
        self.mutate(|context| context.bind_bool(node, value))
    }

    fn mutate(
        &mut self,
        operation: impl FnOnce(
            &mut PropagationContextMut<'_, T>,
        ) -> Result<(), crate::basic_types::EmptyDomain>,
    ) -> PropagationStatus {
        if self.failed {
            return Err(already_failed());
        }

        let mut context =
            PropagationContextMut::new(&mut self.nodes, &mut self.event_sink, &mut self.delta_sink);
        let result = operation(&mut context);

        match result {
            Ok(()) => {
                self.notify_watchers(None);
                Ok(())
            }
            Err(empty) => {
                debug!("external mutation emptied a domain");
                self.fail();
                Err(empty.into())
            }
        }
    }

    /// Runs the scheduled arcs to a fixpoint.
    ///
    /// Returns an error when some domain became empty or an arc detected a contradiction; the
    /// engine is then failed and its domains are in an unspecified narrowed state.
    pub fn propagate(&mut self) -> PropagationStatus {
        if self.failed {
            return Err(already_failed());
        }

        while let Some(arc_id) = self.queue.pop() {
            let delta = std::mem::take(&mut self.pending_deltas[arc_id]);

            let arc = &mut self.arcs[arc_id];
            trace!("running {} ({})", arc_id, arc.name());

            let context = PropagationContextMut::new(
                &mut self.nodes,
                &mut self.event_sink,
                &mut self.delta_sink,
            );
            let result = if delta.is_empty() {
                arc.propagate(context)
            } else {
                arc.propagate_incremental(context, &delta)
            };

            match result {
                Ok(()) => self.notify_watchers(Some(arc_id)),
                Err(failure) => {
                    debug!("{} ({}) detected infeasibility", arc_id, self.arcs[arc_id].name());
                    self.fail();
                    return Err(failure);
                }
            }
        }

        Ok(())
    }

    /// Turns the changes accumulated by the last mutation batch into scheduled arcs and per-arc
    /// deltas. The arc that caused the changes, when there is one, is not notified of its own
    /// prunings.
    fn notify_watchers(&mut self, ran_arc: Option<ArcId>) {
        let removals = std::mem::take(&mut self.delta_sink);
        for (node, set_event) in removals {
            for &watcher in self.watch_list.affected(DomainEvent::Removal, node) {
                if Some(watcher.arc_id) == ran_arc {
                    continue;
                }
                self.pending_deltas[watcher.arc_id].push(watcher.local_id, set_event);
            }
        }

        for (event, node) in self.event_sink.drain() {
            for &watcher in self.watch_list.affected(event, node) {
                if Some(watcher.arc_id) == ran_arc {
                    continue;
                }
                let arc = &mut self.arcs[watcher.arc_id];
                if arc.notify(watcher.local_id, event) == EnqueueDecision::Enqueue {
                    let priority = arc.priority();
                    self.queue.enqueue(watcher.arc_id, priority);
                }
            }
        }
    }

    fn fail(&mut self) {
        self.failed = true;
        self.queue.clear();
        self.event_sink.clear();
        self.delta_sink.clear();
        for delta in self.pending_deltas.iter_mut() {
            delta.clear();
        }
    }
}

fn already_failed() -> PropagationFailure {
    PropagationFailure::with_message("the engine has already failed")
}
