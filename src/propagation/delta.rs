use crate::propagation::LocalId;
use crate::sets::NumericValue;
use crate::sets::SetEvent;

/// The accumulated domain changes an arc is notified of between two of its runs.
///
/// Each entry pairs the local id of the changed source with the raw set event that occurred.
/// Deltas are coalesced per arc: however many times a source changes while the arc sits in the
/// queue, the arc runs once and receives all changes together.
#[derive(Clone, Debug)]
pub struct Delta<T> {
    entries: Vec<(LocalId, SetEvent<T>)>,
}

// Not derived: deriving would demand `T: Default`, which the scalar kinds do not carry.
impl<T> Default for Delta<T> {
    fn default() -> Self {
        Delta {
            entries: Vec::new(),
        }
    }
}

impl<T: NumericValue> Delta<T> {
    pub(crate) fn push(&mut self, local_id: LocalId, event: SetEvent<T>) {
        self.entries.push((local_id, event));
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LocalId, SetEvent<T>)> + '_ {
        self.entries.iter().copied()
    }

    /// The events that affected the source registered under `local_id`.
    pub fn for_source(&self, local_id: LocalId) -> impl Iterator<Item = SetEvent<T>> + '_ {
        self.entries
            .iter()
            .filter(move |(id, _)| *id == local_id)
            .map(|(_, event)| *event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_fresh_delta_is_empty() {
        let delta: Delta<f64> = Delta::default();
        assert!(delta.is_empty());
    }

    #[test]
    fn for_source_filters_by_local_id() {
        let mut delta: Delta<i32> = Delta::default();
        delta.push(LocalId::from(0), SetEvent::ValueRemoved(5));
        delta.push(LocalId::from(1), SetEvent::RangeRemoved { start: 1, end: 3 });
        delta.push(LocalId::from(0), SetEvent::ValueRemoved(9));

        let first: Vec<_> = delta.for_source(LocalId::from(0)).collect();
        assert_eq!(
            first,
            vec![SetEvent::ValueRemoved(5), SetEvent::ValueRemoved(9)]
        );
        assert_eq!(delta.iter().count(), 3);
    }
}
