use crate::arcs::corner_max;
use crate::arcs::corner_min;
use crate::arcs::tighten_max;
use crate::arcs::tighten_min;
use crate::arcs::RelOp;
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

/// Domains small enough to justify the value-level support pass.
const SUPPORT_PASS_LIMIT: u64 = 64;

/// An arc maintaining `x * y ⊙ z`.
///
/// Bound reasoning uses interval arithmetic over the four corner products. Inverting the
/// product to narrow a factor requires the other factor to be sign-fixed and zero-free,
/// otherwise values arbitrarily far from the corners remain feasible. For small integral
/// domains an additional support pass removes individual values without a witness pair.
#[derive(Clone, Copy, Debug)]
pub struct TernaryProductArc {
    x: NodeId,
    y: NodeId,
    z: NodeId,
    op: RelOp,
}

#[derive(Clone, Copy, Debug)]
pub struct TernaryProductBuilder {
    pub x: NodeId,
    pub y: NodeId,
    pub z: NodeId,
    pub op: RelOp,
}

const ID_X: LocalId = LocalId::from(0);
const ID_Y: LocalId = LocalId::from(1);
const ID_Z: LocalId = LocalId::from(2);

impl<T: NumericValue> ArcBuilder<T> for TernaryProductBuilder {
    type ArcImpl = TernaryProductArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        let events = match self.op {
            RelOp::Eq => DomainEvents::ANY,
            RelOp::Neq => DomainEvents::ASSIGN,
            _ => DomainEvents::BOUNDS,
        };
        context.register(self.x, events, ID_X);
        context.register(self.y, events, ID_Y);
        context.register(self.z, events, ID_Z);
        TernaryProductArc {
            x: self.x,
            y: self.y,
            z: self.z,
            op: self.op,
        }
    }
}

impl<T: NumericValue> Arc<T> for TernaryProductArc {
    fn name(&self) -> &str {
        "TernaryProduct"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        let (x, y, z) = (self.x, self.y, self.z);

        match self.op {
            RelOp::Eq => {
                propagate_equality(&mut context, x, y, z)?;
                if T::INTEGRAL {
                    support_pass(&mut context, x, y, z)?;
                }
            }
            RelOp::Leq | RelOp::Lt => {
                let strict = self.op == RelOp::Lt;
                propagate_product_at_most(&mut context, x, y, z, strict)?;
            }
            RelOp::Geq | RelOp::Gt => {
                let strict = self.op == RelOp::Gt;
                propagate_product_at_least(&mut context, x, y, z, strict)?;
            }
            RelOp::Neq => propagate_not_equal(&mut context, x, y, z)?,
        }

        Ok(())
    }
}

fn product_corners<T: NumericValue>(
    context: &PropagationContextMut<'_, T>,
    a: NodeId,
    b: NodeId,
) -> [Option<T>; 4] {
    let a_min = context.min(a);
    let a_max = context.max(a);
    let b_min = context.min(b);
    let b_max = context.max(b);
    [
        a_min.checked_mul(b_min),
        a_min.checked_mul(b_max),
        a_max.checked_mul(b_min),
        a_max.checked_mul(b_max),
    ]
}

/// Whether every value of `node` has the same non-zero sign, which is what makes dividing by
/// its bounds monotone.
fn is_sign_fixed<T: NumericValue>(context: &PropagationContextMut<'_, T>, node: NodeId) -> bool {
    context.min(node) > T::ZERO || context.max(node) < T::ZERO
}

fn propagate_equality<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    x: NodeId,
    y: NodeId,
    z: NodeId,
) -> Result<(), crate::basic_types::EmptyDomain> {
    let corners = product_corners(context, x, y);
    tighten_min(context, z, corner_min(corners))?;
    tighten_max(context, z, corner_max(corners))?;

    if is_sign_fixed(context, y) {
        narrow_factor(context, x, y, z)?;
    }
    if is_sign_fixed(context, x) {
        narrow_factor(context, y, x, z)?;
    }
    Ok(())
}

/// Narrows `factor` in `factor * other = z`, given that `other` is sign-fixed.
fn narrow_factor<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    factor: NodeId,
    other: NodeId,
    z: NodeId,
) -> Result<(), crate::basic_types::EmptyDomain> {
    let z_min = context.min(z);
    let z_max = context.max(z);
    let other_min = context.min(other);
    let other_max = context.max(other);

    let lower_corners = [
        z_min.div_ceil_bound(other_min),
        z_min.div_ceil_bound(other_max),
        z_max.div_ceil_bound(other_min),
        z_max.div_ceil_bound(other_max),
    ];
    tighten_min(context, factor, corner_min(lower_corners))?;

    let upper_corners = [
        z_min.div_floor_bound(other_min),
        z_min.div_floor_bound(other_max),
        z_max.div_floor_bound(other_min),
        z_max.div_floor_bound(other_max),
    ];
    tighten_max(context, factor, corner_max(upper_corners))?;
    Ok(())
}

fn propagate_product_at_most<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    x: NodeId,
    y: NodeId,
    z: NodeId,
    strict: bool,
) -> Result<(), crate::basic_types::EmptyDomain> {
    // x * y <= z, so z is at least the smallest corner product.
    let corners = product_corners(context, x, y);
    let z_bound = corner_min(corners).map(|b| if strict { b.next_higher() } else { b });
    tighten_min(context, z, z_bound)?;

    let z_max = if strict {
        context.max(z).next_lower()
    } else {
        context.max(z)
    };
    limit_factor_upward(context, x, y, z_max)?;
    limit_factor_upward(context, y, x, z_max)?;
    Ok(())
}

fn propagate_product_at_least<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    x: NodeId,
    y: NodeId,
    z: NodeId,
    strict: bool,
) -> Result<(), crate::basic_types::EmptyDomain> {
    let corners = product_corners(context, x, y);
    let z_bound = corner_max(corners).map(|b| if strict { b.next_lower() } else { b });
    tighten_max(context, z, z_bound)?;

    let z_min = if strict {
        context.min(z).next_higher()
    } else {
        context.min(z)
    };
    limit_factor_downward(context, x, y, z_min)?;
    limit_factor_downward(context, y, x, z_min)?;
    Ok(())
}

/// Enforces `factor * other <= limit` on `factor`, when `other` is sign-fixed.
fn limit_factor_upward<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    factor: NodeId,
    other: NodeId,
    limit: T,
) -> Result<(), crate::basic_types::EmptyDomain> {
    if !is_sign_fixed(context, other) {
        return Ok(());
    }
    let other_min = context.min(other);
    let other_max = context.max(other);
    if other_min > T::ZERO {
        // Positive multiplier keeps the inequality direction; the weakest bound comes from the
        // smallest multiplier.
        tighten_max(context, factor, corner_max([
            limit.div_floor_bound(other_min),
            limit.div_floor_bound(other_max),
            None,
            None,
        ]))?;
    } else {
        // Negative multiplier flips the inequality.
        tighten_min(context, factor, corner_min([
            limit.div_ceil_bound(other_min),
            limit.div_ceil_bound(other_max),
            None,
            None,
        ]))?;
    }
    Ok(())
}

/// Enforces `factor * other >= limit` on `factor`, when `other` is sign-fixed.
fn limit_factor_downward<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    factor: NodeId,
    other: NodeId,
    limit: T,
) -> Result<(), crate::basic_types::EmptyDomain> {
    if !is_sign_fixed(context, other) {
        return Ok(());
    }
    let other_min = context.min(other);
    let other_max = context.max(other);
    if other_min > T::ZERO {
        tighten_min(context, factor, corner_min([
            limit.div_ceil_bound(other_min),
            limit.div_ceil_bound(other_max),
            None,
            None,
        ]))?;
    } else {
        tighten_max(context, factor, corner_max([
            limit.div_floor_bound(other_min),
            limit.div_floor_bound(other_max),
            None,
            None,
        ]))?;
    }
    Ok(())
}

fn propagate_not_equal<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    x: NodeId,
    y: NodeId,
    z: NodeId,
) -> Result<(), crate::basic_types::EmptyDomain> {
    if context.is_bound(x) && context.is_bound(y) {
        if let Some(forbidden) = context.min(x).checked_mul(context.min(y)) {
            context.remove_value(z, forbidden)?;
        }
    }
    Ok(())
}

/// Removes individual values without a witness pair in the other two domains. Only run for
/// small integral domains; the pair enumeration iterates the smaller of the two candidate
/// domains first so the early exit hits as soon as possible.
fn support_pass<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    x: NodeId,
    y: NodeId,
    z: NodeId,
) -> Result<(), crate::basic_types::EmptyDomain> {
    if context.size(x) > SUPPORT_PASS_LIMIT
        || context.size(y) > SUPPORT_PASS_LIMIT
        || context.size(z) > SUPPORT_PASS_LIMIT
    {
        return Ok(());
    }

    let x_values = context.collect_values(x);
    let y_values = context.collect_values(y);
    let z_values = context.collect_values(z);

    for &value in &z_values {
        let supported = pairs_smaller_first(&x_values, &y_values)
            .any(|(a, b)| a.checked_mul(b) == Some(value));
        if !supported {
            context.remove_value(z, value)?;
        }
    }

    for &value in &x_values {
        let supported = y_values.iter().any(|&b| {
            value
                .checked_mul(b)
                .is_some_and(|product| context.contains(z, product))
        });
        if !supported {
            context.remove_value(x, value)?;
        }
    }

    for &value in &y_values {
        let supported = x_values.iter().any(|&a| {
            a.checked_mul(value)
                .is_some_and(|product| context.contains(z, product))
        });
        if !supported {
            context.remove_value(y, value)?;
        }
    }

    Ok(())
}

fn pairs_smaller_first<'a, T: NumericValue>(
    a: &'a [T],
    b: &'a [T],
) -> impl Iterator<Item = (T, T)> + 'a {
    let (outer, inner, swapped) = if a.len() <= b.len() {
        (a, b, false)
    } else {
        (b, a, true)
    };
    outer.iter().flat_map(move |&first| {
        inner.iter().map(move |&second| {
            if swapped {
                (second, first)
            } else {
                (first, second)
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_engine::TestEngine;

    #[test]
    fn zero_factor_forces_zero_product() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(-10, 10);
        let y = engine.new_node(0, 0);
        let z = engine.new_node(-100, 100);

        engine
            .add_arc(TernaryProductBuilder {
                x,
                y,
                z,
                op: RelOp::Eq,
            })
            .expect("feasible");

        engine.assert_bounds(z, 0, 0);
        assert!(engine.is_bound(z));
    }

    #[test]
    fn positive_factors_narrow_the_product() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(2, 3);
        let y = engine.new_node(4, 5);
        let z = engine.new_node(-100, 100);

        engine
            .add_arc(TernaryProductBuilder {
                x,
                y,
                z,
                op: RelOp::Eq,
            })
            .expect("feasible");

        engine.assert_bounds(z, 8, 15);
    }

    #[test]
    fn sign_fixed_factor_inverts_the_product() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(-100, 100);
        let y = engine.new_node(2, 4);
        let z = engine.new_node(8, 8);

        engine
            .add_arc(TernaryProductBuilder {
                x,
                y,
                z,
                op: RelOp::Eq,
            })
            .expect("feasible");

        engine.assert_bounds(x, 2, 4);
    }

    #[test]
    fn support_pass_removes_unsupported_values() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(2, 3);
        let y = engine.new_node(2, 3);
        let z = engine.new_node(4, 9);

        engine
            .add_arc(TernaryProductBuilder {
                x,
                y,
                z,
                op: RelOp::Eq,
            })
            .expect("feasible");

        // Products of {2, 3} x {2, 3} are {4, 6, 9}.
        assert!(engine.contains(z, 4));
        assert!(engine.contains(z, 6));
        assert!(engine.contains(z, 9));
        assert!(!engine.contains(z, 5));
        assert!(!engine.contains(z, 7));
        assert!(!engine.contains(z, 8));
    }

    #[test]
    fn mixed_sign_factor_does_not_invert() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(-10, 10);
        let y = engine.new_node(-2, 3);
        let z = engine.new_node(6, 6);

        engine
            .add_arc(TernaryProductBuilder {
                x,
                y,
                z,
                op: RelOp::Eq,
            })
            .expect("feasible");

        // y straddles zero, so x = 6 (with y = 1) must survive.
        assert!(engine.contains(x, 6));
    }

    #[test]
    fn product_at_most_limits_the_factors() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(0, 100);
        let y = engine.new_node(2, 5);
        let z = engine.new_node(0, 10);

        engine
            .add_arc(TernaryProductBuilder {
                x,
                y,
                z,
                op: RelOp::Leq,
            })
            .expect("feasible");

        // x * 2 <= 10.
        engine.assert_bounds(x, 0, 5);
    }

    #[test]
    fn infeasible_product_fails() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(2, 2);
        let y = engine.new_node(3, 3);
        let z = engine.new_node(7, 7);

        let status = engine.add_arc(TernaryProductBuilder {
            x,
            y,
            z,
            op: RelOp::Eq,
        });
        assert!(status.is_err());
    }

    #[test]
    fn float_product_bounds() {
        let mut engine: TestEngine<f64> = TestEngine::default();
        let x = engine.new_node(0.5, 2.0);
        let y = engine.new_node(4.0, 8.0);
        let z = engine.new_node(-1000.0, 1000.0);

        engine
            .add_arc(TernaryProductBuilder {
                x,
                y,
                z,
                op: RelOp::Eq,
            })
            .expect("feasible");

        engine.assert_bounds(z, 2.0, 16.0);
    }
}
