use std::f64::consts::FRAC_PI_2;
use std::f64::consts::PI;
use std::f64::consts::TAU;

use crate::arcs::power::set_max_outward;
use crate::arcs::power::set_min_outward;
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

/// Beyond this magnitude the integer arithmetic on wave indices loses the precision the
/// extreme-containment and monotone-segment tests rely on; the arc falls back to the `[-1, 1]`
/// envelope.
const ANGLE_LIMIT: f64 = 1e6;

/// Angle-space slack for the extreme-containment and segment tests. The slack is biased so that
/// an uncertain decision weakens a bound instead of cutting off a feasible value.
const SLACK: f64 = 1e-9;

/// An arc maintaining `sin(x) = z`.
///
/// The target is always confined to `[-1, 1]`. Tighter bounds are derived from the extremes of
/// the wave over the argument range, and the argument is narrowed back through `asin` whenever
/// its range fits inside a single monotone half-wave.
#[derive(Clone, Copy, Debug)]
pub struct SineArc {
    x: NodeId,
    z: NodeId,
}

#[derive(Clone, Copy, Debug)]
pub struct SineBuilder {
    pub x: NodeId,
    pub z: NodeId,
}

impl<T: NumericValue> ArcBuilder<T> for SineBuilder {
    type ArcImpl = SineArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        context.register(self.x, DomainEvents::BOUNDS, ID_X);
        context.register(self.z, DomainEvents::BOUNDS, ID_Z);
        SineArc {
            x: self.x,
            z: self.z,
        }
    }
}

impl<T: NumericValue> Arc<T> for SineArc {
    fn name(&self) -> &str {
        "Sine"
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        propagate_wave(&mut context, self.x, self.z, 0.0)
    }
}

/// An arc maintaining `cos(x) = z`, expressed as the sine wave shifted by a quarter turn.
#[derive(Clone, Copy, Debug)]
pub struct CosineArc {
    x: NodeId,
    z: NodeId,
}

#[derive(Clone, Copy, Debug)]
pub struct CosineBuilder {
    pub x: NodeId,
    pub z: NodeId,
}

impl<T: NumericValue> ArcBuilder<T> for CosineBuilder {
    type ArcImpl = CosineArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        context.register(self.x, DomainEvents::BOUNDS, ID_X);
        context.register(self.z, DomainEvents::BOUNDS, ID_Z);
        CosineArc {
            x: self.x,
            z: self.z,
        }
    }
}

impl<T: NumericValue> Arc<T> for CosineArc {
    fn name(&self) -> &str {
        "Cosine"
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        propagate_wave(&mut context, self.x, self.z, FRAC_PI_2)
    }
}

/// Propagates `sin(x + phase) = z` in both directions.
fn propagate_wave<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    x: NodeId,
    z: NodeId,
    phase: f64,
) -> PropagationStatus {
    set_min_outward(context, z, -1.0)?;
    set_max_outward(context, z, 1.0)?;

    let lo = context.min(x).as_f64() + phase;
    let hi = context.max(x).as_f64() + phase;
    if lo.abs() > ANGLE_LIMIT || hi.abs() > ANGLE_LIMIT {
        return Ok(());
    }

    let (wave_min, wave_max) = wave_range(lo, hi);
    set_min_outward(context, z, wave_min)?;
    set_max_outward(context, z, wave_max)?;

    // Inversion only applies while the whole argument range sits inside one monotone half-wave
    // [kπ - π/2, kπ + π/2].
    let k = ((lo + FRAC_PI_2) / PI).floor();
    if hi + SLACK > (k + 1.0) * PI - FRAC_PI_2 {
        return Ok(());
    }

    let z_lo = context.min(z).as_f64().clamp(-1.0, 1.0);
    let z_hi = context.max(z).as_f64().clamp(-1.0, 1.0);
    let (angle_lo, angle_hi) = if (k as i64) % 2 == 0 {
        // Increasing half-wave: t = asin(z) + kπ.
        (z_lo.asin() + k * PI, z_hi.asin() + k * PI)
    } else {
        // Decreasing half-wave: t = kπ - asin(z).
        (k * PI - z_hi.asin(), k * PI - z_lo.asin())
    };
    set_min_outward(context, x, pad_down(angle_lo - phase))?;
    set_max_outward(context, x, pad_up(angle_hi - phase))?;

    Ok(())
}

/// The range of `sin` over the closed angle range `[lo, hi]`, padded outward.
fn wave_range(lo: f64, hi: f64) -> (f64, f64) {
    if hi - lo >= TAU {
        return (-1.0, 1.0);
    }

    let at_lo = lo.sin();
    let at_hi = hi.sin();
    let max = if contains_angle(lo, hi, FRAC_PI_2) {
        1.0
    } else {
        pad_up(at_lo.max(at_hi))
    };
    let min = if contains_angle(lo, hi, -FRAC_PI_2) {
        -1.0
    } else {
        pad_down(at_lo.min(at_hi))
    };
    (min.max(-1.0), max.min(1.0))
}

/// Whether some representative `target + k·2π` falls in `[lo, hi]`, biased toward containment:
/// falsely including an extreme only weakens the derived bound.
fn contains_angle(lo: f64, hi: f64, target: f64) -> bool {
    let k = ((lo - SLACK - target) / TAU).ceil();
    target + k * TAU <= hi + SLACK
}

/// Relative padding absorbing the few-ulp error of the transcendental calls and the `k·π`
/// offsets, so a derived bound never cuts off a feasible value.
fn pad_down(value: f64) -> f64 {
    value - value.abs() * 1e-12 - f64::MIN_POSITIVE
}

fn pad_up(value: f64) -> f64 {
    value + value.abs() * 1e-12 + f64::MIN_POSITIVE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_engine::TestEngine;

    #[test]
    fn sine_narrows_within_a_monotone_segment() {
        let mut engine: TestEngine<f64> = TestEngine::default();
        let x = engine.new_node(0.0, 1.5);
        let z = engine.new_node(-10.0, 10.0);

        engine.add_arc(SineBuilder { x, z }).expect("feasible");

        assert!(engine.lower_bound(z) >= -1e-9);
        assert!(engine.lower_bound(z) <= 0.0);
        assert!((engine.upper_bound(z) - 1.5f64.sin()).abs() <= 1e-9);
    }

    #[test]
    fn sine_reaches_the_crest_inside_the_range() {
        let mut engine: TestEngine<f64> = TestEngine::default();
        let x = engine.new_node(0.0, 4.0);
        let z = engine.new_node(-10.0, 10.0);

        engine.add_arc(SineBuilder { x, z }).expect("feasible");

        // The crest at π/2 lies inside [0, 4]; the trough does not.
        assert_eq!(engine.upper_bound(z), 1.0);
        assert!((engine.lower_bound(z) - 4.0f64.sin()).abs() <= 1e-9);
    }

    #[test]
    fn sine_inverts_a_target_bound() {
        let mut engine: TestEngine<f64> = TestEngine::default();
        let x = engine.new_node(0.0, 1.5);
        let z = engine.new_node(-10.0, 10.0);

        engine.add_arc(SineBuilder { x, z }).expect("feasible");
        engine.set_max(z, 0.5).expect("feasible");

        assert!((engine.upper_bound(x) - 0.5f64.asin()).abs() <= 1e-9);
    }

    #[test]
    fn cosine_follows_the_decreasing_segment() {
        let mut engine: TestEngine<f64> = TestEngine::default();
        let x = engine.new_node(0.5, 3.0);
        let z = engine.new_node(-10.0, 10.0);

        engine.add_arc(CosineBuilder { x, z }).expect("feasible");

        assert!((engine.upper_bound(z) - 0.5f64.cos()).abs() <= 1e-9);
        assert!((engine.lower_bound(z) - 3.0f64.cos()).abs() <= 1e-9);
    }

    #[test]
    fn wide_integer_arguments_keep_the_envelope() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(-100, 100);
        let z = engine.new_node(-50, 50);

        engine.add_arc(SineBuilder { x, z }).expect("feasible");

        engine.assert_bounds(z, -1, 1);
        engine.assert_bounds(x, -100, 100);
    }

    #[test]
    fn target_outside_the_envelope_is_infeasible() {
        let mut engine: TestEngine<f64> = TestEngine::default();
        let x = engine.new_node(0.0, 10.0);
        let z = engine.new_node(5.0, 5.0);

        assert!(engine.add_arc(SineBuilder { x, z }).is_err());
    }
}
