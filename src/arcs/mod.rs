//! The concrete arcs: arithmetic, range, membership, set-combination and boolean propagation
//! rules over the engine's nodes.

mod absolute_value;
mod boolean;
mod membership;
mod power;
mod product;
mod quotient;
mod range;
mod set_ops;
mod sum;
mod trig;

pub use absolute_value::AbsoluteValueArc;
pub use absolute_value::AbsoluteValueBuilder;
pub use boolean::BoolOp;
pub use boolean::BoolOperand;
pub use boolean::TernaryBoolArc;
pub use boolean::TernaryBoolBuilder;
pub use membership::MembershipArc;
pub use membership::MembershipBuilder;
pub use membership::NotMemberArc;
pub use membership::NotMemberBuilder;
pub use power::LogArc;
pub use power::LogBuilder;
pub use power::PowerArc;
pub use power::PowerBuilder;
pub use product::TernaryProductArc;
pub use product::TernaryProductBuilder;
pub use quotient::TernaryQuotientArc;
pub use quotient::TernaryQuotientBuilder;
pub use range::NotBetweenArc;
pub use range::NotBetweenBuilder;
pub use range::RangeArc;
pub use range::RangeBuilder;
pub use range::RangeEnd;
pub use set_ops::IntersectionArc;
pub use set_ops::IntersectionBuilder;
pub use set_ops::UnionArc;
pub use set_ops::UnionBuilder;
pub use sum::TernarySumArc;
pub use sum::TernarySumBuilder;
pub use trig::CosineArc;
pub use trig::CosineBuilder;
pub use trig::SineArc;
pub use trig::SineBuilder;

use crate::basic_types::EmptyDomain;
use crate::engine::NodeId;
use crate::propagation::PropagationContextMut;
use crate::sets::max_of;
use crate::sets::min_of;
use crate::sets::NumericValue;

/// The relational operator connecting the combined sources of an arithmetic arc to its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelOp {
    Eq,
    Neq,
    Leq,
    Lt,
    Geq,
    Gt,
}

/// The smallest valid candidate among interval-arithmetic corners. Corners that overflowed or
/// produced NaN come in as `None` and are excluded.
pub(crate) fn corner_min<T: NumericValue>(corners: [Option<T>; 4]) -> Option<T> {
    corners.into_iter().flatten().reduce(min_of)
}

pub(crate) fn corner_max<T: NumericValue>(corners: [Option<T>; 4]) -> Option<T> {
    corners.into_iter().flatten().reduce(max_of)
}

/// Tightens the lower bound of `node` when a candidate bound exists. A `None` candidate means
/// the corner computation gave no information, which never justifies narrowing.
pub(crate) fn tighten_min<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    node: NodeId,
    bound: Option<T>,
) -> Result<(), EmptyDomain> {
    match bound {
        Some(bound) if !bound.is_invalid() => context.set_min(node, bound),
        _ => Ok(()),
    }
}

pub(crate) fn tighten_max<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    node: NodeId,
    bound: Option<T>,
) -> Result<(), EmptyDomain> {
    match bound {
        Some(bound) if !bound.is_invalid() => context.set_max(node, bound),
        _ => Ok(()),
    }
}
