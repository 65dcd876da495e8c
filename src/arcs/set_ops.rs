use crate::basic_types::PropagationStatus;
use crate::engine::DomainEvents;
use crate::engine::NodeId;
use crate::propagation::Arc;
use crate::propagation::ArcBuilder;
use crate::propagation::ArcRegistrationContext;
use crate::propagation::Delta;
use crate::propagation::LocalId;
use crate::propagation::PropagationContextMut;
use crate::propagation::Priority;
use crate::sets::NumericSet;
use crate::sets::NumericValue;
use crate::sets::SetEvent;

const ID_X: LocalId = LocalId::from(0);
const ID_Y: LocalId = LocalId::from(1);
const ID_Z: LocalId = LocalId::from(2);

/// An arc confining `z` to values possible in both `x` and `y`.
///
/// One-directional: `z` shrinks as the operands shrink; the operands are not widened or
/// narrowed from `z`.
#[derive(Clone, Copy, Debug)]
pub struct IntersectionArc {
    x: NodeId,
    y: NodeId,
    z: NodeId,
}

#[derive(Clone, Copy, Debug)]
pub struct IntersectionBuilder {
    pub x: NodeId,
    pub y: NodeId,
    pub z: NodeId,
}

impl<T: NumericValue> ArcBuilder<T> for IntersectionBuilder {
    type ArcImpl = IntersectionArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        context.register(self.x, DomainEvents::ANY, ID_X);
        context.register(self.y, DomainEvents::ANY, ID_Y);
        IntersectionArc {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

impl<T: NumericValue> Arc<T> for IntersectionArc {
    fn name(&self) -> &str {
        "Intersection"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        context.retain_node(self.z, self.x)?;
        context.retain_node(self.z, self.y)?;
        Ok(())
    }
}

/// An arc confining `z` to values possible in at least one of `x` and `y`, and each operand to
/// values possible in `z`.
#[derive(Clone, Copy, Debug)]
pub struct UnionArc {
    x: NodeId,
    y: NodeId,
    z: NodeId,
}

#[derive(Clone, Copy, Debug)]
pub struct UnionBuilder {
    pub x: NodeId,
    pub y: NodeId,
    pub z: NodeId,
}

impl<T: NumericValue> ArcBuilder<T> for UnionBuilder {
    type ArcImpl = UnionArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        context.register(self.x, DomainEvents::ANY, ID_X);
        context.register(self.y, DomainEvents::ANY, ID_Y);
        context.register(self.z, DomainEvents::ANY, ID_Z);
        UnionArc {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

impl<T: NumericValue> Arc<T> for UnionArc {
    fn name(&self) -> &str {
        "Union"
    }

    fn priority(&self) -> Priority {
        Priority::Low
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        let union = union_scratch(&context, self.x, self.y);
        context.retain_set(self.z, &union)?;
        context.retain_node(self.x, self.z)?;
        context.retain_node(self.y, self.z)?;
        Ok(())
    }

    /// When only the target lost values, those exact values are pushed out of both operands
    /// without re-deriving the union. Operand changes still need the full pass.
    fn propagate_incremental(
        &mut self,
        mut context: PropagationContextMut<'_, T>,
        delta: &Delta<T>,
    ) -> PropagationStatus {
        if delta.iter().any(|(local_id, _)| local_id != ID_Z) {
            return self.propagate(context);
        }

        for event in delta.for_source(ID_Z) {
            match event {
                SetEvent::ValueRemoved(value) => {
                    context.remove_value(self.x, value)?;
                    context.remove_value(self.y, value)?;
                }
                SetEvent::RangeRemoved { start, end } => {
                    context.remove_range(self.x, start, end)?;
                    context.remove_range(self.y, start, end)?;
                }
                SetEvent::ValueAdded(_) | SetEvent::RangeAdded { .. } => {
                    return self.propagate(context);
                }
            }
        }
        Ok(())
    }
}

/// Builds the union of two domains in a scratch set. Cloning the interval-backed operand first
/// keeps the accumulation within the operations every variant pairing supports.
fn union_scratch<T: NumericValue>(
    context: &PropagationContextMut<'_, T>,
    x: NodeId,
    y: NodeId,
) -> NumericSet<T> {
    let (base, extension) = match (context.set(x), context.set(y)) {
        (NumericSet::Sparse(_), NumericSet::Interval(_)) => (y, x),
        _ => (x, y),
    };
    let mut union = context.clone_set(base);
    union
        .add_all(context.set(extension))
        .expect("an interval base accepts ranges and a sparse base only receives values");
    union
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_engine::TestEngine;

    #[test]
    fn intersection_narrows_the_target_only() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(0, 20);
        let y = engine.new_node(10, 30);
        let z = engine.new_node(0, 100);

        engine
            .add_arc(IntersectionBuilder { x, y, z })
            .expect("feasible");

        engine.assert_bounds(z, 10, 20);
        engine.assert_bounds(x, 0, 20);
        engine.assert_bounds(y, 10, 30);

        engine.set_min(x, 15).expect("feasible");
        engine.assert_bounds(z, 15, 20);
    }

    #[test]
    fn union_bounds_the_target_and_the_operands() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(0, 10);
        let y = engine.new_node(20, 30);
        let z = engine.new_node(-100, 100);

        engine.add_arc(UnionBuilder { x, y, z }).expect("feasible");

        engine.assert_bounds(z, 0, 30);
        assert!(!engine.contains(z, 15));

        engine.set_max(z, 25).expect("feasible");
        engine.assert_bounds(y, 20, 25);
    }

    #[test]
    fn target_removals_flow_back_into_the_operands() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(0, 10);
        let y = engine.new_node(5, 15);
        let z = engine.new_node(0, 100);

        engine.add_arc(UnionBuilder { x, y, z }).expect("feasible");
        engine.assert_bounds(z, 0, 15);

        // An external removal on the target reaches the arc as a delta; the same values must
        // leave both operands.
        engine.engine.remove_range(z, 4, 6).expect("feasible");
        engine.engine.propagate().expect("feasible");

        assert!(!engine.contains(x, 5));
        assert!(!engine.contains(y, 5));
        assert!(!engine.contains(y, 6));
        assert!(engine.contains(x, 3));
        assert!(engine.contains(y, 7));
    }

    #[test]
    fn union_of_mixed_variants() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_sparse_node(vec![1, 5, 9]);
        let y = engine.new_node(20, 22);
        let z = engine.new_node(-100, 100);

        engine.add_arc(UnionBuilder { x, y, z }).expect("feasible");

        assert!(engine.contains(z, 5));
        assert!(engine.contains(z, 21));
        assert!(!engine.contains(z, 10));
        assert_eq!(engine.engine.size(z), 6);
    }
}
