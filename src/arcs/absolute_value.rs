use crate::arcs::tighten_max;
use crate::arcs::tighten_min;
use crate::basic_types::EmptyDomain;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainEvents;
use crate::engine::NodeId;
use crate::propagation::Arc;
use crate::propagation::ArcBuilder;
use crate::propagation::ArcRegistrationContext;
use crate::propagation::LocalId;
use crate::propagation::PropagationContextMut;
use crate::propagation::Priority;
use crate::sets::max_of;
use crate::sets::NumericValue;

/// An arc maintaining `|x| = z`.
#[derive(Clone, Copy, Debug)]
pub struct AbsoluteValueArc {
    x: NodeId,
    z: NodeId,
}

#[derive(Clone, Copy, Debug)]
pub struct AbsoluteValueBuilder {
    pub x: NodeId,
    pub z: NodeId,
}

const ID_X: LocalId = LocalId::from(0);
const ID_Z: LocalId = LocalId::from(1);

impl<T: NumericValue> ArcBuilder<T> for AbsoluteValueBuilder {
    type ArcImpl = AbsoluteValueArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        context.register(self.x, DomainEvents::BOUNDS, ID_X);
        context.register(self.z, DomainEvents::BOUNDS, ID_Z);
        AbsoluteValueArc {
            x: self.x,
            z: self.z,
        }
    }
}

impl<T: NumericValue> Arc<T> for AbsoluteValueArc {
    fn name(&self) -> &str {
        "AbsoluteValue"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        perform_propagation(&mut context, self.x, self.z)?;
        Ok(())
    }
}

fn perform_propagation<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    x: NodeId,
    z: NodeId,
) -> Result<(), EmptyDomain> {
    context.set_min(z, T::ZERO)?;

    let x_min = context.min(x);
    let x_max = context.max(x);
    tighten_max(context, z, Some(max_of(x_min.abs_val(), x_max.abs_val())))?;

    // When x is sign-fixed, |x| is monotone over its domain and the coupling is exact.
    if x_min >= T::ZERO {
        tighten_min(context, z, Some(x_min))?;
    } else if x_max <= T::ZERO {
        tighten_min(context, z, Some(x_max.negated()))?;
    }

    let z_max = context.max(z);
    tighten_max(context, x, Some(z_max))?;
    tighten_min(context, x, Some(z_max.negated()))?;

    let z_min = context.min(z);
    if context.min(x) >= T::ZERO {
        tighten_min(context, x, Some(z_min))?;
    } else if context.max(x) <= T::ZERO {
        tighten_max(context, x, Some(z_min.negated()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_engine::TestEngine;

    #[test]
    fn magnitude_follows_the_wider_side() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(-7, 3);
        let z = engine.new_node(-100, 100);

        engine
            .add_arc(AbsoluteValueBuilder { x, z })
            .expect("feasible");

        engine.assert_bounds(z, 0, 7);
    }

    #[test]
    fn magnitude_bound_clamps_the_input() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(-100, 100);
        let z = engine.new_node(0, 5);

        engine
            .add_arc(AbsoluteValueBuilder { x, z })
            .expect("feasible");

        engine.assert_bounds(x, -5, 5);
    }

    #[test]
    fn sign_fixed_input_couples_exactly() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(-9, -2);
        let z = engine.new_node(0, 100);

        engine
            .add_arc(AbsoluteValueBuilder { x, z })
            .expect("feasible");

        engine.assert_bounds(z, 2, 9);
    }
}
