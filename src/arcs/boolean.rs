use crate::basic_types::EmptyDomain;
use crate::basic_types::PropagationStatus;
use crate::engine::BoolNode;
use crate::engine::DomainEvents;
use crate::propagation::Arc;
use crate::propagation::ArcBuilder;
use crate::propagation::ArcRegistrationContext;
use crate::propagation::LocalId;
use crate::propagation::PropagationContextMut;
use crate::propagation::Priority;
use crate::sets::NumericValue;

/// The boolean connective of a [`TernaryBoolArc`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoolOp {
    And,
    Or,
    Xor,
    Eq,
    Implies,
}

/// A boolean node read through an optional negation, so `!x` participates in a connective
/// without materializing a separate node.
#[derive(Clone, Copy, Debug)]
pub struct BoolOperand {
    pub node: BoolNode,
    pub negate: bool,
}

impl BoolOperand {
    pub fn plain(node: BoolNode) -> Self {
        BoolOperand {
            node,
            negate: false,
        }
    }

    pub fn negated(node: BoolNode) -> Self {
        BoolOperand { node, negate: true }
    }

    fn state<T: NumericValue>(self, context: &PropagationContextMut<'_, T>) -> Option<bool> {
        context.bool_state(self.node).map(|value| value ^ self.negate)
    }

    fn bind<T: NumericValue>(
        self,
        context: &mut PropagationContextMut<'_, T>,
        value: bool,
    ) -> Result<(), EmptyDomain> {
        context.bind_bool(self.node, value ^ self.negate)
    }
}

/// An arc maintaining `x ⊙ y = z` over three-valued boolean operands.
///
/// Each direction of the connective's truth table is propagated as soon as enough operands are
/// determined; a contradiction between determined operands surfaces as a failed binding.
#[derive(Clone, Copy, Debug)]
pub struct TernaryBoolArc {
    x: BoolOperand,
    y: BoolOperand,
    z: BoolOperand,
    op: BoolOp,
}

#[derive(Clone, Copy, Debug)]
pub struct TernaryBoolBuilder {
    pub x: BoolOperand,
    pub y: BoolOperand,
    pub z: BoolOperand,
    pub op: BoolOp,
}

const ID_X: LocalId = LocalId::from(0);
const ID_Y: LocalId = LocalId::from(1);
const ID_Z: LocalId = LocalId::from(2);

impl<T: NumericValue> ArcBuilder<T> for TernaryBoolBuilder {
    type ArcImpl = TernaryBoolArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        context.register_bool(self.x.node, DomainEvents::ASSIGN, ID_X);
        context.register_bool(self.y.node, DomainEvents::ASSIGN, ID_Y);
        context.register_bool(self.z.node, DomainEvents::ASSIGN, ID_Z);
        TernaryBoolArc {
            x: self.x,
            y: self.y,
            z: self.z,
            op: self.op,
        }
    }
}

impl<T: NumericValue> Arc<T> for TernaryBoolArc {
    fn name(&self) -> &str {
        "TernaryBool"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        let (x, y, z) = (self.x, self.y, self.z);
        let sx = x.state(&context);
        let sy = y.state(&context);
        let sz = z.state(&context);

        match self.op {
            BoolOp::And => {
                match (sx, sy) {
                    (Some(true), Some(true)) => z.bind(&mut context, true)?,
                    (Some(false), _) | (_, Some(false)) => z.bind(&mut context, false)?,
                    _ => {}
                }
                if sz == Some(true) {
                    x.bind(&mut context, true)?;
                    y.bind(&mut context, true)?;
                }
                if sz == Some(false) {
                    if sx == Some(true) {
                        y.bind(&mut context, false)?;
                    }
                    if sy == Some(true) {
                        x.bind(&mut context, false)?;
                    }
                }
            }
            BoolOp::Or => {
                match (sx, sy) {
                    (Some(false), Some(false)) => z.bind(&mut context, false)?,
                    (Some(true), _) | (_, Some(true)) => z.bind(&mut context, true)?,
                    _ => {}
                }
                if sz == Some(false) {
                    x.bind(&mut context, false)?;
                    y.bind(&mut context, false)?;
                }
                if sz == Some(true) {
                    if sx == Some(false) {
                        y.bind(&mut context, true)?;
                    }
                    if sy == Some(false) {
                        x.bind(&mut context, true)?;
                    }
                }
            }
            BoolOp::Xor => {
                propagate_parity(&mut context, x, y, z, false)?;
            }
            BoolOp::Eq => {
                // x = y is the complement of x ^ y.
                propagate_parity(&mut context, x, y, z, true)?;
            }
            BoolOp::Implies => {
                match (sx, sy) {
                    (Some(false), _) | (_, Some(true)) => z.bind(&mut context, true)?,
                    (Some(true), Some(false)) => z.bind(&mut context, false)?,
                    _ => {}
                }
                if sz == Some(false) {
                    x.bind(&mut context, true)?;
                    y.bind(&mut context, false)?;
                }
                if sz == Some(true) {
                    if sx == Some(true) {
                        y.bind(&mut context, true)?;
                    }
                    if sy == Some(false) {
                        x.bind(&mut context, false)?;
                    }
                }
            }
        }

        Ok(())
    }
}

/// Parity propagation: `z = x ^ y`, or its complement for the equivalence connective. Any two
/// determined operands force the third.
fn propagate_parity<T: NumericValue>(
    context: &mut PropagationContextMut<'_, T>,
    x: BoolOperand,
    y: BoolOperand,
    z: BoolOperand,
    complement: bool,
) -> Result<(), EmptyDomain> {
    let sx = x.state(context);
    let sy = y.state(context);
    let sz = z.state(context).map(|value| value ^ complement);

    if let (Some(a), Some(b)) = (sx, sy) {
        z.bind(context, a ^ b ^ complement)?;
    }
    if let (Some(a), Some(c)) = (sx, sz) {
        y.bind(context, a ^ c)?;
    }
    if let (Some(b), Some(c)) = (sy, sz) {
        x.bind(context, b ^ c)?;
    }
    Ok(())
}
