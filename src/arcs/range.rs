use crate::basic_types::PropagationStatus;
use crate::engine::DomainEvents;
use crate::engine::NodeId;
use crate::propagation::Arc;
use crate::propagation::ArcBuilder;
use crate::propagation::ArcRegistrationContext;
use crate::propagation::LocalId;
use crate::propagation::PropagationContextMut;
use crate::propagation::Priority;
use crate::sets::NumericValue;

/// One end of a range constraint: a constant, or the bound of another node.
#[derive(Clone, Copy, Debug)]
pub enum RangeEnd<T> {
    Value(T),
    Node(NodeId),
}

const ID_TARGET: LocalId = LocalId::from(0);
const ID_LOW: LocalId = LocalId::from(1);
const ID_HIGH: LocalId = LocalId::from(2);

/// An arc confining `target` to the range between `low` and `high`, each end independently
/// inclusive or exclusive.
///
/// Node-valued ends couple both ways: the target is clamped into the range the end nodes still
/// admit, and each end node must leave room for the target.
#[derive(Debug)]
pub struct RangeArc<T> {
    target: NodeId,
    low: RangeEnd<T>,
    high: RangeEnd<T>,
    low_exclusive: bool,
    high_exclusive: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct RangeBuilder<T> {
    pub target: NodeId,
    pub low: RangeEnd<T>,
    pub high: RangeEnd<T>,
    pub low_exclusive: bool,
    pub high_exclusive: bool,
}

impl<T: NumericValue> ArcBuilder<T> for RangeBuilder<T> {
    type ArcImpl = RangeArc<T>;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        context.register(self.target, DomainEvents::BOUNDS, ID_TARGET);
        if let RangeEnd::Node(node) = self.low {
            context.register(node, DomainEvents::BOUNDS, ID_LOW);
        }
        if let RangeEnd::Node(node) = self.high {
            context.register(node, DomainEvents::BOUNDS, ID_HIGH);
        }
        RangeArc {
            target: self.target,
            low: self.low,
            high: self.high,
            low_exclusive: self.low_exclusive,
            high_exclusive: self.high_exclusive,
        }
    }
}

impl<T: NumericValue> Arc<T> for RangeArc<T> {
    fn name(&self) -> &str {
        "Range"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        let target = self.target;

        // target >= low, where a node-valued end contributes its weakest still-possible value.
        let low = match self.low {
            RangeEnd::Value(value) => value,
            RangeEnd::Node(node) => context.min(node),
        };
        let low = if self.low_exclusive {
            low.next_higher()
        } else {
            low
        };
        context.set_min(target, low)?;

        let high = match self.high {
            RangeEnd::Value(value) => value,
            RangeEnd::Node(node) => context.max(node),
        };
        let high = if self.high_exclusive {
            high.next_lower()
        } else {
            high
        };
        context.set_max(target, high)?;

        // A node-valued end cannot move past the target entirely.
        if let RangeEnd::Node(node) = self.low {
            let limit = if self.low_exclusive {
                context.max(target).next_lower()
            } else {
                context.max(target)
            };
            context.set_max(node, limit)?;
        }
        if let RangeEnd::Node(node) = self.high {
            let limit = if self.high_exclusive {
                context.min(target).next_higher()
            } else {
                context.min(target)
            };
            context.set_min(node, limit)?;
        }

        Ok(())
    }
}

/// An arc excluding `target` from the range between `low` and `high`.
///
/// The removable window is where the exclusion holds for every still-possible value of the end
/// nodes: from the largest possible `low` to the smallest possible `high`.
#[derive(Debug)]
pub struct NotBetweenArc<T> {
    target: NodeId,
    low: RangeEnd<T>,
    high: RangeEnd<T>,
    low_exclusive: bool,
    high_exclusive: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct NotBetweenBuilder<T> {
    pub target: NodeId,
    pub low: RangeEnd<T>,
    pub high: RangeEnd<T>,
    /// When true, `low` itself stays feasible for the target.
    pub low_exclusive: bool,
    pub high_exclusive: bool,
}

impl<T: NumericValue> ArcBuilder<T> for NotBetweenBuilder<T> {
    type ArcImpl = NotBetweenArc<T>;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        if let RangeEnd::Node(node) = self.low {
            context.register(node, DomainEvents::BOUNDS, ID_LOW);
        }
        if let RangeEnd::Node(node) = self.high {
            context.register(node, DomainEvents::BOUNDS, ID_HIGH);
        }
        NotBetweenArc {
            target: self.target,
            low: self.low,
            high: self.high,
            low_exclusive: self.low_exclusive,
            high_exclusive: self.high_exclusive,
        }
    }
}

impl<T: NumericValue> Arc<T> for NotBetweenArc<T> {
    fn name(&self) -> &str {
        "NotBetween"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        let low = match self.low {
            RangeEnd::Value(value) => value,
            RangeEnd::Node(node) => context.max(node),
        };
        let high = match self.high {
            RangeEnd::Value(value) => value,
            RangeEnd::Node(node) => context.min(node),
        };

        let removal_start = if self.low_exclusive {
            low.next_higher()
        } else {
            low
        };
        let removal_end = if self.high_exclusive {
            high.next_lower()
        } else {
            high
        };

        if removal_start <= removal_end {
            context.remove_range(self.target, removal_start, removal_end)?;
        }

        Ok(())
    }
}
