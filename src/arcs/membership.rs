use crate::basic_types::PropagationStatus;
use crate::engine::NodeId;
use crate::propagation::Arc;
use crate::propagation::ArcBuilder;
use crate::propagation::ArcRegistrationContext;
use crate::propagation::PropagationContextMut;
use crate::propagation::Priority;
use crate::sets::NumericSet;
use crate::sets::NumericValue;

/// An arc confining `target` to a constant set of values.
///
/// The set never changes, so the arc registers no watches; the single run at posting time does
/// all the work, and the run is idempotent if it is ever scheduled again.
#[derive(Debug)]
pub struct MembershipArc<T> {
    target: NodeId,
    allowed: NumericSet<T>,
}

#[derive(Debug)]
pub struct MembershipBuilder<T> {
    pub target: NodeId,
    pub allowed: NumericSet<T>,
}

impl<T: NumericValue> ArcBuilder<T> for MembershipBuilder<T> {
    type ArcImpl = MembershipArc<T>;

    fn create(self, _context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        MembershipArc {
            target: self.target,
            allowed: self.allowed,
        }
    }
}

impl<T: NumericValue> Arc<T> for MembershipArc<T> {
    fn name(&self) -> &str {
        "Membership"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        context.retain_set(self.target, &self.allowed)?;
        Ok(())
    }
}

/// An arc excluding a constant set of values from `target`.
#[derive(Debug)]
pub struct NotMemberArc<T> {
    target: NodeId,
    forbidden: NumericSet<T>,
}

#[derive(Debug)]
pub struct NotMemberBuilder<T> {
    pub target: NodeId,
    pub forbidden: NumericSet<T>,
}

impl<T: NumericValue> ArcBuilder<T> for NotMemberBuilder<T> {
    type ArcImpl = NotMemberArc<T>;

    fn create(self, _context: ArcRegistrationContext<'_>) -> Self::ArcImpl {
        NotMemberArc {
            target: self.target,
            forbidden: self.forbidden,
        }
    }
}

impl<T: NumericValue> Arc<T> for NotMemberArc<T> {
    fn name(&self) -> &str {
        "NotMember"
    }

    fn priority(&self) -> Priority {
        Priority::High
    }

    fn propagate(&mut self, mut context: PropagationContextMut<'_, T>) -> PropagationStatus {
        context.remove_set(self.target, &self.forbidden)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_engine::TestEngine;

    #[test]
    fn membership_intersects_the_domain() {
        let mut engine: TestEngine = TestEngine::default();
        let target = engine.new_node(0, 100);

        engine
            .add_arc(MembershipBuilder {
                target,
                allowed: NumericSet::sparse_from_values(vec![5, 50, 200]),
            })
            .expect("feasible");

        assert_eq!(engine.engine.size(target), 2);
        assert!(engine.contains(target, 5));
        assert!(engine.contains(target, 50));
        assert!(!engine.contains(target, 200));
    }

    #[test]
    fn membership_with_no_overlap_fails() {
        let mut engine: TestEngine = TestEngine::default();
        let target = engine.new_node(0, 10);

        let status = engine.add_arc(MembershipBuilder {
            target,
            allowed: NumericSet::new_interval_set(20, 30),
        });
        assert!(status.is_err());
    }

    #[test]
    fn exclusion_subtracts_the_set() {
        let mut engine: TestEngine = TestEngine::default();
        let target = engine.new_node(0, 10);

        engine
            .add_arc(NotMemberBuilder {
                target,
                forbidden: NumericSet::new_interval_set(3, 5),
            })
            .expect("feasible");

        assert_eq!(engine.engine.size(target), 8);
        assert!(!engine.contains(target, 4));
        assert!(engine.contains(target, 6));
    }
}
