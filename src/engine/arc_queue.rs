use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::collections::VecDeque;

use fnv::FnvHashSet;

use crate::arclight_assert_moderate;
use crate::propagation::ArcId;
use crate::propagation::Priority;

/// The scheduling queue of the engine: arcs waiting to run, bucketed by priority.
///
/// An arc is present at most once; enqueueing an already-queued arc is a no-op, so however many
/// of its sources change before it runs, it runs once. Within a priority bucket arcs run in
/// first-scheduled order.
#[derive(Clone, Debug)]
pub(crate) struct ArcQueue {
    queues: Vec<VecDeque<ArcId>>,
    present_arcs: FnvHashSet<ArcId>,
    present_priorities: BinaryHeap<Reverse<u32>>,
}

impl Default for ArcQueue {
    fn default() -> Self {
        ArcQueue {
            queues: vec![VecDeque::new(); Priority::LEVELS as usize],
            present_arcs: FnvHashSet::default(),
            present_priorities: BinaryHeap::new(),
        }
    }
}

impl ArcQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.present_arcs.is_empty()
    }

    pub(crate) fn enqueue(&mut self, arc_id: ArcId, priority: Priority) {
        let priority = priority as u32;
        arclight_assert_moderate!((priority as usize) < self.queues.len());

        if !self.present_arcs.contains(&arc_id) {
            if self.queues[priority as usize].is_empty() {
                self.present_priorities.push(Reverse(priority));
            }
            self.queues[priority as usize].push_back(arc_id);
            let _ = self.present_arcs.insert(arc_id);
        }
    }

    pub(crate) fn pop(&mut self) -> Option<ArcId> {
        let top_priority = self.present_priorities.peek()?.0 as usize;
        arclight_assert_moderate!(!self.queues[top_priority].is_empty());

        let next_arc_id = self.queues[top_priority]
            .pop_front()
            .expect("a present priority has a non-empty bucket");
        let _ = self.present_arcs.remove(&next_arc_id);

        if self.queues[top_priority].is_empty() {
            let _ = self.present_priorities.pop();
        }

        Some(next_arc_id)
    }

    pub(crate) fn clear(&mut self) {
        for queue in &mut self.queues {
            queue.clear();
        }
        self.present_arcs.clear();
        self.present_priorities.clear();
    }
}
