use enumset::EnumSet;

use crate::containers::KeyedVec;
use crate::engine::domain_events::DomainEvent;
use crate::engine::node::NodeId;
use crate::propagation::ArcId;
use crate::propagation::LocalId;

/// A source slot of an arc: which arc to notify, and under which local id the changed node is
/// known to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct ArcVarId {
    pub(crate) arc_id: ArcId,
    pub(crate) local_id: LocalId,
}

#[derive(Clone, Debug, Default)]
struct NodeWatchers {
    assign_watchers: Vec<ArcVarId>,
    lower_bound_watchers: Vec<ArcVarId>,
    upper_bound_watchers: Vec<ArcVarId>,
    removal_watchers: Vec<ArcVarId>,
}

/// For each node, the arcs subscribed to each category of change of its domain.
#[derive(Clone, Debug, Default)]
pub(crate) struct WatchList {
    watchers: KeyedVec<NodeId, NodeWatchers>,
}

impl WatchList {
    pub(crate) fn grow(&mut self) {
        let _ = self.watchers.push(NodeWatchers::default());
    }

    pub(crate) fn watch_all(
        &mut self,
        node: NodeId,
        events: EnumSet<DomainEvent>,
        arc_var: ArcVarId,
    ) {
        let watchers = &mut self.watchers[node];
        for event in events {
            let list = match event {
                DomainEvent::Assign => &mut watchers.assign_watchers,
                DomainEvent::LowerBound => &mut watchers.lower_bound_watchers,
                DomainEvent::UpperBound => &mut watchers.upper_bound_watchers,
                DomainEvent::Removal => &mut watchers.removal_watchers,
            };
            if !list.contains(&arc_var) {
                list.push(arc_var);
            }
        }
    }

    pub(crate) fn affected(&self, event: DomainEvent, node: NodeId) -> &[ArcVarId] {
        let watchers = &self.watchers[node];
        match event {
            DomainEvent::Assign => &watchers.assign_watchers,
            DomainEvent::LowerBound => &watchers.lower_bound_watchers,
            DomainEvent::UpperBound => &watchers.upper_bound_watchers,
            DomainEvent::Removal => &watchers.removal_watchers,
        }
    }
}
