use crate::arcs::RelOp;
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
use crate::sets::NumericValue;

/// An arc maintaining `x / y ⊙ z`, where `/` is the kind's native division (truncating for the
/// integer kinds, exact for the real kinds).
///
/// The denominator may not contain zero when the arc is posted. While the denominator domain
/// straddles zero with both signs present the arc does nothing; any solution has to fix the
/// denominator's sign eventually, at which point the domains are normalized to a positive
/// denominator through negated views and propagated there.
#[derive(Clone, Copy, Debug)]
pub struct TernaryQuotientArc {
    x: NodeId,
    y: NodeId,
    z: NodeId,
    op: RelOp,
}

#[derive(Clone, Copy, Debug)]
pub struct TernaryQuotientBuilder {
    pub x: NodeId,
    pub y: NodeId,
    pub z: NodeId,
    pub op: RelOp,
}

const ID_X: LocalId = LocalId::from(0);
const ID_Y: LocalId = LocalId::from(1);
const ID_Z: LocalId = LocalId::from(2);

impl<T: NumericValue> ArcBuilder<T> for TernaryQuotientBuilder {
    type ArcImpl = TernaryQuotientArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        let events = match self.op {
            RelOp::Neq => DomainEvents::ASSIGN,
            _ => DomainEvents::BOUNDS,
        };
        context.register(self.x, events, ID_X);
        context.register(self.y, events, ID_Y);
        context.register(self.z, events, ID_Z);
        TernaryQuotientArc {
            x: self.x,
            y: self.y,
            z: self.z,
            op: self.op,
        }
    }
}

impl<T: NumericValue> Arc<T> for TernaryQuotientArc {
    fn name(&self) -> &str {
        "TernaryQuotient"
    }

    fn priority(&self) -> Priority {
        Priority::Medium
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        let (x, y, z) = (self.x, self.y, self.z);

        if context.min(y) < T::ZERO && context.max(y) > T::ZERO {
            // Both denominator signs are still possible; nothing sound can be derived yet.
            return Ok(());
        }

        match self.op {
            RelOp::Eq => propagate_equality(&mut context, x, y, z)?,
            RelOp::Neq => {
                if context.is_bound(x) && context.is_bound(y) {
                    if let Some(forbidden) = context.min(x).div_trunc(context.min(y)) {
                        context.remove_value(z, forbidden)?;
                    }
                }
            }
            _ => propagate_inequality(&mut context, x, y, z, self.op)?,
        }

        Ok(())
    }
}

/// A node read either directly or through negation, which turns a negative-denominator instance
/// into the positive-denominator form all the bound reasoning assumes.
#[derive(Clone, Copy, Debug)]
struct View {
    node: NodeId,
    negated: bool,
}

impl View {
    fn of(node: NodeId) -> Self {
        View {
            node,
            negated: false,
        }
    }

    fn negation(self) -> Self {
        View {
            node: self.node,
            negated: !self.negated,
        }
    }

    fn min<T: NumericValue>(self, context: &PropagationContextMut<'_, T>) -> T {
        if self.negated {
            context.max(self.node).negated()
        } else {
            context.min(self.node)
        }
    }

    fn max<T: NumericValue>(self, context: &PropagationContextMut<'_, T>) -> T {
        if self.negated {
            context.min(self.node).negated()
        } else {
            context.max(self.node)
        }
    }

    fn set_min<T: NumericValue>(
        self,
        context: &mut PropagationContextMut<'_, T>,
        bound: T,
    ) -> Result<(), EmptyDomain> {
        if bound.is_invalid() {
            return Ok(());
        }
        if self.negated {
            context.set_max(self.node, bound.negated())
        } else {
            context.set_min(self.node, bound)
        }
    }

    fn set_max<T: NumericValue>(
        self,
        context: &mut PropagationContextMut<'_, T>,
        bound: T,
    ) -> Result<(), EmptyDomain> {
        if bound.is_invalid() {
            return Ok(());
        }
        if self.negated {
            context.set_min(self.node, bound.negated())
        } else {
            context.set_max(self.node, bound)
        }
    }
}

fn propagate_equality<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    x: NodeId,
    y: NodeId,
    z: NodeId,
) -> Result<(), EmptyDomain> {
    let mut numerator = View::of(x);
    let mut denominator = View::of(y);
    let rhs = View::of(z);

    if context.max(y) < T::ZERO {
        // Negative denominator: negating both numerator and denominator preserves the quotient.
        numerator = numerator.negation();
        denominator = denominator.negation();
    }

    propagate_signs(context, numerator, rhs)?;

    if numerator.max(context) >= T::ZERO && rhs.max(context) >= T::ZERO {
        propagate_upper_bounds(context, numerator, denominator, rhs)?;
    }

    if numerator.negation().max(context) >= T::ZERO && rhs.negation().max(context) >= T::ZERO {
        propagate_upper_bounds(context, numerator.negation(), denominator, rhs.negation())?;
    }

    if numerator.min(context) >= T::ZERO && rhs.min(context) >= T::ZERO {
        propagate_positive_domains(context, numerator, denominator, rhs)?;
    }

    if numerator.negation().min(context) >= T::ZERO && rhs.negation().min(context) >= T::ZERO {
        propagate_positive_domains(context, numerator.negation(), denominator, rhs.negation())?;
    }

    Ok(())
}

/// Sign coupling between the numerator and the quotient, given a positive denominator: they
/// cannot disagree in sign, and a non-zero quotient needs a numerator of matching sign.
fn propagate_signs<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    numerator: View,
    rhs: View,
) -> Result<(), EmptyDomain> {
    if numerator.min(context) >= T::ZERO && rhs.min(context) < T::ZERO {
        rhs.set_min(context, T::ZERO)?;
    }

    if numerator.min(context) <= T::ZERO && rhs.min(context) > T::ZERO {
        numerator.set_min(context, smallest_positive::<T>())?;
    }

    if numerator.max(context) <= T::ZERO && rhs.max(context) > T::ZERO {
        rhs.set_max(context, T::ZERO)?;
    }

    if numerator.max(context) >= T::ZERO && rhs.max(context) < T::ZERO {
        numerator.set_max(context, smallest_positive::<T>().negated())?;
    }

    Ok(())
}

/// Upper bounds of the quotient and the numerator, valid whenever both have non-negative upper
/// bounds and the denominator is positive.
fn propagate_upper_bounds<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    numerator: View,
    denominator: View,
    rhs: View,
) -> Result<(), EmptyDomain> {
    let numerator_max = numerator.max(context);
    let denominator_min = denominator.min(context);
    let denominator_max = denominator.max(context);
    let rhs_max = rhs.max(context);

    if let Some(new_max_rhs) = numerator_max.div_trunc(denominator_min) {
        rhs.set_max(context, new_max_rhs)?;
    }

    // From numerator / denominator <= rhs_max. For integers: numerator < (rhs_max + 1) *
    // denominator, so numerator <= (rhs_max + 1) * denominator_max - 1. For reals the product
    // bound is exact.
    let new_max_numerator = if T::INTEGRAL {
        rhs_max
            .next_higher()
            .checked_mul(denominator_max)
            .map(NumericValue::next_lower)
    } else {
        rhs_max.checked_mul(denominator_max)
    };
    if let Some(new_max_numerator) = new_max_numerator {
        numerator.set_max(context, new_max_numerator)?;
    }

    Ok(())
}

/// The all-non-negative case: quotient, numerator and denominator bounds tighten each other.
fn propagate_positive_domains<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    numerator: View,
    denominator: View,
    rhs: View,
) -> Result<(), EmptyDomain> {
    let numerator_min = numerator.min(context);
    let numerator_max = numerator.max(context);
    let denominator_min = denominator.min(context);
    let rhs_min = rhs.min(context);
    let rhs_max = rhs.max(context);

    if let Some(new_min_rhs) = numerator_min.div_trunc(denominator.max(context)) {
        rhs.set_min(context, new_min_rhs)?;
    }

    if let Some(new_min_numerator) = denominator_min.checked_mul(rhs_min) {
        numerator.set_min(context, new_min_numerator)?;
    }

    if rhs_min > T::ZERO {
        if let Some(new_max_denominator) = numerator_max.div_trunc(rhs_min) {
            denominator.set_max(context, new_max_denominator)?;
        }
    }

    // numerator / denominator <= rhs_max requires, for integers, denominator >=
    // ceil((numerator_min + 1) / (rhs_max + 1)).
    let new_min_denominator = if T::INTEGRAL {
        numerator_min
            .next_higher()
            .div_ceil_bound(rhs_max.next_higher())
    } else if rhs_max > T::ZERO {
        numerator_min.div_ceil_bound(rhs_max)
    } else {
        None
    };
    if let Some(new_min_denominator) = new_min_denominator {
        denominator.set_min(context, new_min_denominator)?;
    }

    Ok(())
}

/// Bound reasoning for the inequality forms: only the quotient is narrowed, from the corner
/// quotients of the numerator and the (sign-fixed) denominator.
fn propagate_inequality<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    x: NodeId,
    y: NodeId,
    z: NodeId,
    op: RelOp,
) -> Result<(), EmptyDomain> {
    let x_min = context.min(x);
    let x_max = context.max(x);
    let y_min = context.min(y);
    let y_max = context.max(y);

    let corners = [
        x_min.div_trunc(y_min),
        x_min.div_trunc(y_max),
        x_max.div_trunc(y_min),
        x_max.div_trunc(y_max),
    ];

    match op {
        RelOp::Leq | RelOp::Lt => {
            // x / y <= z, so z is at least the smallest achievable quotient.
            let bound = crate::arcs::corner_min(corners)
                .map(|b| if op == RelOp::Lt { b.next_higher() } else { b });
            crate::arcs::tighten_min(context, z, bound)?;
        }
        RelOp::Geq | RelOp::Gt => {
            let bound = crate::arcs::corner_max(corners)
                .map(|b| if op == RelOp::Gt { b.next_lower() } else { b });
            crate::arcs::tighten_max(context, z, bound)?;
        }
        RelOp::Eq | RelOp::Neq => unreachable!("handled by the caller"),
    }

    Ok(())
}

/// The smallest strictly positive value of the kind: 1 for integers, the smallest positive
/// representable step above zero for reals.
fn smallest_positive<T: NumericValue>() -> T {
    if T::INTEGRAL {
        T::ONE
    } else {
        T::ZERO.next_higher()
    }
}
