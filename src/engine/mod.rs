//! The engine layer: node domains, change classification, and the scheduling machinery that
//! drives arcs to a fixpoint.

pub(crate) mod arc_queue;
mod domain_events;
pub(crate) mod event_sink;
mod node;
mod propagation_engine;
#[cfg(test)]
pub(crate) mod test_engine;
pub(crate) mod watch_list;

pub use domain_events::DomainEvent;
pub use domain_events::DomainEvents;
pub use node::BoolNode;
pub use node::Node;
pub use node::NodeId;
pub use node::NodeStore;
pub use propagation_engine::PropagationEngine;
