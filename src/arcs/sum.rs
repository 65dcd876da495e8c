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

/// An arc maintaining `x + y ⊙ z` for a relational operator `⊙`.
///
/// Bound reasoning only, except for `Neq` which waits until two operands are bound and then
/// removes the implied value from the third.
#[derive(Clone, Copy, Debug)]
pub struct TernarySumArc {
    x: NodeId,
    y: NodeId,
    z: NodeId,
    op: RelOp,
}

#[derive(Clone, Copy, Debug)]
pub struct TernarySumBuilder {
    pub x: NodeId,
    pub y: NodeId,
    pub z: NodeId,
    pub op: RelOp,
}

const ID_X: LocalId = LocalId::from(0);
const ID_Y: LocalId = LocalId::from(1);
const ID_Z: LocalId = LocalId::from(2);

impl<T: NumericValue> ArcBuilder<T> for TernarySumBuilder {
    type ArcImpl = TernarySumArc;

    fn create(self, mut context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        let events = match self.op {
            RelOp::Neq => DomainEvents::ASSIGN,
            _ => DomainEvents::BOUNDS,
        };
        context.register(self.x, events, ID_X);
        context.register(self.y, events, ID_Y);
        context.register(self.z, events, ID_Z);
        TernarySumArc {
            x: self.x,
            y: self.y,
            z: self.z,
            op: self.op,
        }
    }
}

impl<T: NumericValue> Arc<T> for TernarySumArc {
    fn name(&self) -> &str {
        "TernarySum"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        let (x, y, z) = (self.x, self.y, self.z);
        let x_min = context.min(x);
        let x_max = context.max(x);
        let y_min = context.min(y);
        let y_max = context.max(y);
        let z_min = context.min(z);
        let z_max = context.max(z);

        match self.op {
            RelOp::Eq => {
                tighten_min(&mut context, z, x_min.checked_add(y_min))?;
                tighten_max(&mut context, z, x_max.checked_add(y_max))?;
                tighten_min(&mut context, x, z_min.checked_sub(y_max))?;
                tighten_max(&mut context, x, z_max.checked_sub(y_min))?;
                tighten_min(&mut context, y, z_min.checked_sub(x_max))?;
                tighten_max(&mut context, y, z_max.checked_sub(x_min))?;
            }
            RelOp::Leq | RelOp::Lt => {
                // x + y <= z, with the strict variant tightened by one step on each bound.
                let strict = self.op == RelOp::Lt;
                let z_bound = x_min.checked_add(y_min).map(|b| nudge_up(b, strict));
                tighten_min(&mut context, z, z_bound)?;
                let x_bound = z_max.checked_sub(y_min).map(|b| nudge_down(b, strict));
                tighten_max(&mut context, x, x_bound)?;
                let y_bound = z_max.checked_sub(x_min).map(|b| nudge_down(b, strict));
                tighten_max(&mut context, y, y_bound)?;
            }
            RelOp::Geq | RelOp::Gt => {
                // x + y >= z.
                let strict = self.op == RelOp::Gt;
                let z_bound = x_max.checked_add(y_max).map(|b| nudge_down(b, strict));
                tighten_max(&mut context, z, z_bound)?;
                let x_bound = z_min.checked_sub(y_max).map(|b| nudge_up(b, strict));
                tighten_min(&mut context, x, x_bound)?;
                let y_bound = z_min.checked_sub(x_max).map(|b| nudge_up(b, strict));
                tighten_min(&mut context, y, y_bound)?;
            }
            RelOp::Neq => {
                if context.is_bound(x) && context.is_bound(y) {
                    if let Some(forbidden) = x_min.checked_add(y_min) {
                        context.remove_value(z, forbidden)?;
                    }
                }
                if context.is_bound(x) && context.is_bound(z) {
                    if let Some(forbidden) = z_min.checked_sub(x_min) {
                        context.remove_value(y, forbidden)?;
                    }
                }
                if context.is_bound(y) && context.is_bound(z) {
                    if let Some(forbidden) = z_min.checked_sub(y_min) {
                        context.remove_value(x, forbidden)?;
                    }
                }
            }
        }

        Ok(())
    }
}

fn nudge_up<T: NumericValue>(bound: T, strict: bool) -> T {
    if strict {
        bound.next_higher()
    } else {
        bound
    }
}

fn nudge_down<T: NumericValue>(bound: T, strict: bool) -> T {
    if strict {
        bound.next_lower()
    } else {
        bound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_engine::TestEngine;

    #[test]
    fn equality_narrows_all_three_nodes() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(1, 5);
        let y = engine.new_node(2, 4);
        let z = engine.new_node(0, 100);

        engine
            .add_arc(TernarySumBuilder {
                x,
                y,
                z,
                op: RelOp::Eq,
            })
            .expect("feasible");

        engine.assert_bounds(z, 3, 9);
        engine.assert_bounds(x, 1, 5);
        engine.assert_bounds(y, 2, 4);

        engine.set_max(z, 4).expect("feasible");
        engine.assert_bounds(x, 1, 2);
        engine.assert_bounds(y, 2, 3);
    }

    #[test]
    fn strict_inequality_is_one_step_tighter() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(0, 10);
        let y = engine.new_node(0, 10);
        let z = engine.new_node(0, 5);

        engine
            .add_arc(TernarySumBuilder {
                x,
                y,
                z,
                op: RelOp::Lt,
            })
            .expect("feasible");

        // x + y < z <= 5, so x <= 4.
        engine.assert_bounds(x, 0, 4);
        engine.assert_bounds(y, 0, 4);
    }

    #[test]
    fn not_equal_waits_for_two_bound_operands() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(3, 3);
        let y = engine.new_node(0, 5);
        let z = engine.new_node(7, 7);

        engine
            .add_arc(TernarySumBuilder {
                x,
                y,
                z,
                op: RelOp::Neq,
            })
            .expect("feasible");

        assert!(!engine.contains(y, 4));
        assert!(engine.contains(y, 3));
    }

    #[test]
    fn infeasible_equality_fails() {
        let mut engine: TestEngine = TestEngine::default();
        let x = engine.new_node(5, 5);
        let y = engine.new_node(5, 5);
        let z = engine.new_node(0, 3);

        let status = engine.add_arc(TernarySumBuilder {
            x,
            y,
            z,
            op: RelOp::Eq,
        });
        assert!(status.is_err());
    }

    #[test]
    fn float_bounds_propagate() {
        let mut engine: TestEngine<f64> = TestEngine::default();
        let x = engine.new_node(0.5, 1.5);
        let y = engine.new_node(1.0, 2.0);
        let z = engine.new_node(-10.0, 10.0);

        engine
            .add_arc(TernarySumBuilder {
                x,
                y,
                z,
                op: RelOp::Eq,
            })
            .expect("feasible");

        engine.assert_bounds(z, 1.5, 3.5);
    }
}
