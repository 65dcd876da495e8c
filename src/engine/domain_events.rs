use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// A broad category of domain change, used to decide which arcs get notified.
///
/// Raw [`crate::sets::SetEvent`]s carry the exact changed ranges; a `DomainEvent` is the
/// coarse classification the watch lists are keyed by.
#[derive(Debug, EnumSetType, Hash)]
pub enum DomainEvent {
    /// Event where a node became bound to a single value.
    Assign,
    /// Event where the lower bound of a node increased.
    LowerBound,
    /// Event where the upper bound of a node decreased.
    UpperBound,
    /// Event where one or more values were removed from a node's domain.
    Removal,
}

/// A description of the events an arc subscribes a source node to.
#[derive(Debug, Copy, Clone)]
pub struct DomainEvents {
    events: EnumSet<DomainEvent>,
}

impl DomainEvents {
    /// Events that can result in the node being assigned a single value.
    pub const ASSIGN: DomainEvents = DomainEvents::new(enum_set!(DomainEvent::Assign));
    /// Events that can change either bound of the node.
    pub const BOUNDS: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::LowerBound | DomainEvent::UpperBound
    ));
    /// Any change to the domain of the node.
    pub const ANY: DomainEvents = DomainEvents::new(enum_set!(
        DomainEvent::Assign
            | DomainEvent::LowerBound
            | DomainEvent::UpperBound
            | DomainEvent::Removal
    ));

    const fn new(events: EnumSet<DomainEvent>) -> DomainEvents {
        DomainEvents { events }
    }

    pub fn get_events(&self) -> EnumSet<DomainEvent> {
        self.events
    }
}
