use crate::arclight_assert_simple;
use crate::basic_types::EmptyDomain;
use crate::basic_types::PropagationStatus;
use crate::engine::DomainEvents;
use crate::engine::NodeId;
use crate::propagation::Arc;
use crate::propagation::ArcBuilder;
use crate::propagation::ArcRegistrationContext;
use crate::propagation::LocalId;
use crate::propagation::PropagationContextMut;
use crate::sets::NumericValue;

const ID_X: LocalId = LocalId::from(0);
const ID_Z: LocalId = LocalId::from(1);

/// An arc maintaining `x ^ exponent = z` for a constant positive exponent, restricted to
/// non-negative `x` where the power function is monotone increasing.
///
/// The underlying computation goes through `f64`; every derived bound is rounded outward before
/// it is imposed, so the arc never cuts off a feasible value to rounding.
#[derive(Clone, Copy, Debug)]
pub struct PowerArc {
    x: NodeId,
    z: NodeId,
    exponent: f64,
}

#[derive(Clone, Copy, Debug)]
pub struct PowerBuilder {
    pub x: NodeId,
    pub z: NodeId,
    pub exponent: f64,
}

impl<T: NumericValue> ArcBuilder<T> for PowerBuilder {
    type ArcImpl = PowerArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        arclight_assert_simple!(self.exponent > 0.0, "the exponent must be positive");
        context.register(self.x, DomainEvents::BOUNDS, ID_X);
        context.register(self.z, DomainEvents::BOUNDS, ID_Z);
        PowerArc {
            x: self.x,
            z: self.z,
            exponent: self.exponent,
        }
    }
}

impl<T: NumericValue> Arc<T> for PowerArc {
    fn name(&self) -> &str {
        "Power"
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        let (x, z) = (self.x, self.z);
        context.set_min(x, T::ZERO)?;
        context.set_min(z, T::ZERO)?;

        let x_min = context.min(x).as_f64();
        let x_max = context.max(x).as_f64();
        set_min_outward(&mut context, z, x_min.powf(self.exponent))?;
        set_max_outward(&mut context, z, x_max.powf(self.exponent))?;

        let inverse = 1.0 / self.exponent;
        let z_min = context.min(z).as_f64();
        let z_max = context.max(z).as_f64();
        set_min_outward(&mut context, x, z_min.powf(inverse))?;
        set_max_outward(&mut context, x, z_max.powf(inverse))?;

        Ok(())
    }
}

/// An arc maintaining `ln(x) = z`, defined for strictly positive `x`.
#[derive(Clone, Copy, Debug)]
pub struct LogArc {
    x: NodeId,
    z: NodeId,
}

#[derive(Clone, Copy, Debug)]
pub struct LogBuilder {
    pub x: NodeId,
    pub z: NodeId,
}

impl<T: NumericValue> ArcBuilder<T> for LogBuilder {
    type ArcImpl = LogArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        context.register(self.x, DomainEvents::BOUNDS, ID_X);
        context.register(self.z, DomainEvents::BOUNDS, ID_Z);
        LogArc {
            x: self.x,
            z: self.z,
        }
    }
}

impl<T: NumericValue> Arc<T> for LogArc {
    fn name(&self) -> &str {
        "Log"
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        let (x, z) = (self.x, self.z);

        // The logarithm needs a strictly positive argument.
        context.set_min(x, smallest_positive::<T>())?;

        let x_min = context.min(x).as_f64();
        let x_max = context.max(x).as_f64();
        set_min_outward(&mut context, z, x_min.ln())?;
        set_max_outward(&mut context, z, x_max.ln())?;

        let z_min = context.min(z).as_f64();
        let z_max = context.max(z).as_f64();
        set_min_outward(&mut context, x, z_min.exp())?;
        set_max_outward(&mut context, x, z_max.exp())?;

        Ok(())
    }
}

fn smallest_positive<T: NumericValue>() -> T {
    if T::INTEGRAL {
        T::ONE
    } else {
        T::ZERO.next_higher()
    }
}

/// Imposes `node >= bound`, rounding the bound down into the kind so the cut stays sound.
pub(super) fn set_min_outward<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    node: NodeId,
    bound: f64,
) -> Result<(), EmptyDomain> {
    match T::from_f64_floor(bound) {
        Some(bound) if !bound.is_invalid() => context.set_min(node, bound),
        _ => Ok(()),
    }
}

/// Imposes `node <= bound`, rounding the bound up into the kind.
pub(super) fn set_max_outward<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    node: NodeId,
    bound: f64,
) -> Result<(), EmptyDomain> {
    match T::from_f64_ceil(bound) {
        Some(bound) if !bound.is_invalid() => context.set_max(node, bound),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_engine::TestEngine;

    #[test]
    fn squares_narrow_both_directions() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(2, 5);
        let z = engine.new_node(0, 1000);

        engine
            .add_arc(PowerBuilder {
                x,
                z,
                exponent: 2.0,
            })
            .expect("feasible");

        engine.assert_bounds(z, 4, 25);

        engine.set_max(z, 16).expect("feasible");
        engine.assert_bounds(x, 2, 4);
    }

    #[test]
    fn log_couples_with_exp() {
        let mut engine: TestEngine<f64> = TestEngine::default();
        let x = engine.new_node(1.0, 100.0);
        let z = engine.new_node(-1000.0, 1000.0);

        engine.add_arc(LogBuilder { x, z }).expect("feasible");

        // ln over [1, 100] lands within [0, ln(100)], modulo outward rounding.
        assert!(engine.lower_bound(z) <= 0.0);
        assert!(engine.upper_bound(z) >= 100.0f64.ln().next_down());
        assert!(engine.upper_bound(z) <= 100.0f64.ln().next_up());
    }

    #[test]
    fn log_forces_a_positive_argument() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(-10, 10);
        let z = engine.new_node(-100, 100);

        engine.add_arc(LogBuilder { x, z }).expect("feasible");

        assert!(engine.lower_bound(x) >= 1);
    }
}
