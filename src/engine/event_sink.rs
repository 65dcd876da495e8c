use enumset::EnumSet;

use crate::containers::KeyedVec;
use crate::engine::domain_events::DomainEvent;
use crate::engine::node::NodeId;

/// While propagation executes, the domain changes are captured in the event sink. The events are
/// deduplicated: if the same event happens multiple times on the same node before the sink is
/// drained, it is stored only once.
#[derive(Clone, Debug, Default)]
pub(crate) struct EventSink {
    present: KeyedVec<NodeId, EnumSet<DomainEvent>>,
    events: Vec<(DomainEvent, NodeId)>,
}

impl EventSink {
    pub(crate) fn grow(&mut self) {
        let _ = self.present.push(EnumSet::new());
    }

    pub(crate) fn event_occurred(&mut self, event: DomainEvent, node: NodeId) {
        let events = &mut self.present[node];
        if events.insert(event) {
            self.events.push((event, node));
        }
    }

    pub(crate) fn drain(&mut self) -> Vec<(DomainEvent, NodeId)> {
        for (event, node) in &self.events {
            let _ = self.present[*node].remove(*event);
        }
        std::mem::take(&mut self.events)
    }

    pub(crate) fn clear(&mut self) {
        for (event, node) in self.events.drain(..) {
            let _ = self.present[node].remove(event);
        }
    }
}
