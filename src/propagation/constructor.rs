use crate::engine::watch_list::ArcVarId;
use crate::engine::watch_list::WatchList;
use crate::engine::BoolNode;
use crate::engine::DomainEvents;
use crate::engine::NodeId;
use crate::propagation::Arc;
use crate::propagation::ArcId;
use crate::propagation::LocalId;
use crate::sets::NumericValue;

/// A type which constructs an [`Arc`] while registering it to the sources it watches.
///
/// Builders are the user-facing argument structs of the concrete arcs: they carry the node
/// handles and parameters, and [`ArcBuilder::create`] turns them into the running arc once the
/// engine hands out an id.
pub trait ArcBuilder<T: NumericValue> {
    type ArcImpl: Arc<T> + 'static;

    fn create(self, context: ArcRegistrationContext<'_>) -> Self::ArcImpl;
}

/// The context given to an [`ArcBuilder`], through which the arc subscribes to changes of its
/// source nodes.
pub struct ArcRegistrationContext<'a> {
    arc_id: ArcId,
    watch_list: &'a mut WatchList,
}

impl std::fmt::Debug for ArcRegistrationContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArcRegistrationContext")
            .field("arc_id", &self.arc_id)
            .finish_non_exhaustive()
    }
}

impl<'a> ArcRegistrationContext<'a> {
    pub(crate) fn new(arc_id: ArcId, watch_list: &'a mut WatchList) -> Self {
        ArcRegistrationContext { arc_id, watch_list }
    }

    pub fn arc_id(&self) -> ArcId {
        self.arc_id
    }

    /// Subscribes the arc to the given events of `node`. Future notifications identify the node
    /// by `local_id`.
    pub fn register(&mut self, node: NodeId, events: DomainEvents, local_id: LocalId) {
        self.watch_list.watch_all(
            node,
            events.get_events(),
            ArcVarId {
                arc_id: self.arc_id,
                local_id,
            },
        );
    }

    pub fn register_bool(&mut self, node: BoolNode, events: DomainEvents, local_id: LocalId) {
        self.register(node.node_id(), events, local_id);
    }
}
