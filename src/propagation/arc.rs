use crate::basic_types::PropagationStatus;
use crate::engine::DomainEvent;
use crate::propagation::contexts::PropagationContextMut;
use crate::propagation::Delta;
use crate::propagation::LocalId;
use crate::sets::NumericValue;

/// How urgently a scheduled arc should run, where lower values take precedence. Cheap arcs
/// should run at high priority so their prunings are available before expensive arcs run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Priority {
    High = 0,
    Medium = 1,
    Low = 2,
    VeryLow = 3,
}

impl Priority {
    pub(crate) const LEVELS: u32 = 4;
}

/// Indicates whether an arc that was notified of a source change wants to be scheduled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnqueueDecision {
    /// The arc should be scheduled.
    Enqueue,
    /// The arc should not be scheduled.
    Skip,
}

/// A directed propagation rule: it reads its source nodes and narrows its target nodes so that
/// every remaining value participates in at least one bound-consistent support.
///
/// Arcs are the unit of scheduling. The engine notifies an arc when a source it registered for
/// changes, queues it according to [`Arc::priority`], and eventually invokes one of the
/// propagate methods with exclusive access to the domains.
pub trait Arc<T: NumericValue> {
    /// The name of the arc, used in logging.
    fn name(&self) -> &str;

    /// The priority at which the arc is scheduled.
    fn priority(&self) -> Priority {
        Priority::VeryLow
    }

    /// Narrows the target domains from scratch, based only on the current domains.
    ///
    /// Must be idempotent: running it twice in a row narrows nothing the second time.
    fn propagate(&mut self, context: PropagationContextMut<'_, T>) -> PropagationStatus;

    /// Narrows the target domains given the changes its sources underwent since the arc last
    /// ran.
    ///
    /// The default forwards to [`Arc::propagate`]; arcs that can do cheaper delta-driven work
    /// override this.
    fn propagate_incremental(
        &mut self,
        context: PropagationContextMut<'_, T>,
        _delta: &Delta<T>,
    ) -> PropagationStatus {
        self.propagate(context)
    }

    /// Called when a source the arc registered for changes. Returning [`EnqueueDecision::Skip`]
    /// suppresses scheduling for this change.
    fn notify(&mut self, _local_id: LocalId, _event: DomainEvent) -> EnqueueDecision {
        EnqueueDecision::Enqueue
    }
}
