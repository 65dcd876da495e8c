use crate::sets::numeric_value::NumericValue;
use crate::sets::set_event::SetEvent;
use crate::sets::set_event::SetEventSink;

/// A set of individual values stored as a sorted flat sequence, without run compression.
///
/// Used when values are not naturally interval-like: discrete enumerable domains, or real
/// domains where individual float/double values are tracked as singletons.
#[derive(Clone, Debug)]
pub struct SparseSet<T> {
    values: Vec<T>,
    pub(crate) events: SetEventSink<T>,
}

impl<T: NumericValue> Default for SparseSet<T> {
    fn default() -> Self {
        SparseSet {
            values: Vec::new(),
            events: SetEventSink::default(),
        }
    }
}

impl<T: NumericValue> SparseSet<T> {
    /// Creates a set from the given values; duplicates and invalid values are dropped.
    pub fn from_values(mut values: Vec<T>) -> Self {
        values.retain(|value| !value.is_invalid());
        values.sort_by(|a, b| a.partial_cmp(b).expect("invalid values were dropped"));
        values.dedup();
        SparseSet {
            values,
            events: SetEventSink::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn size(&self) -> u64 {
        self.values.len() as u64
    }

    pub fn min(&self) -> Option<T> {
        self.values.first().copied()
    }

    pub fn max(&self) -> Option<T> {
        self.values.last().copied()
    }

    pub fn contains(&self, value: T) -> bool {
        if value.is_invalid() {
            return false;
        }
        let idx = self.values.partition_point(|&stored| stored < value);
        self.values.get(idx).is_some_and(|&stored| stored == value)
    }

    /// The smallest member strictly greater than `value`, or `value` itself when no such member
    /// exists.
    pub fn next_higher(&self, value: T) -> T {
        let idx = self.values.partition_point(|&stored| stored <= value);
        self.values.get(idx).copied().unwrap_or(value)
    }

    /// The largest member strictly smaller than `value`, or `value` itself when no such member
    /// exists.
    pub fn next_lower(&self, value: T) -> T {
        let idx = self.values.partition_point(|&stored| stored < value);
        if idx == 0 {
            value
        } else {
            self.values[idx - 1]
        }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.values.iter().copied()
    }

    pub fn add(&mut self, value: T) {
        if value.is_invalid() {
            return;
        }
        let idx = self.values.partition_point(|&stored| stored < value);
        if self.values.get(idx).is_some_and(|&stored| stored == value) {
            return;
        }
        self.values.insert(idx, value);
        self.events.record(SetEvent::ValueAdded(value));
    }

    pub fn remove(&mut self, value: T) {
        let idx = self.values.partition_point(|&stored| stored < value);
        if self.values.get(idx).is_some_and(|&stored| stored == value) {
            let _ = self.values.remove(idx);
            self.events.record(SetEvent::ValueRemoved(value));
        }
    }

    /// Removes every member in the closed range `[start, end]`, one notification per removed
    /// value.
    pub fn remove_range(&mut self, start: T, end: T) {
        if start.is_invalid() || end.is_invalid() || start > end {
            return;
        }
        let low = self.values.partition_point(|&stored| stored < start);
        let high = self.values.partition_point(|&stored| stored <= end);
        for value in self.values.drain(low..high) {
            self.events.record(SetEvent::ValueRemoved(value));
        }
    }

    pub fn remove_starting_from(&mut self, value: T) {
        if let Some(max) = self.max() {
            if value <= max {
                self.remove_range(value, max);
            }
        }
    }

    pub fn remove_starting_after(&mut self, value: T) {
        if let Some(max) = self.max() {
            if value < max {
                self.remove_range(value.next_higher(), max);
            }
        }
    }

    pub fn remove_ending_at(&mut self, value: T) {
        if let Some(min) = self.min() {
            if value >= min {
                self.remove_range(min, value);
            }
        }
    }

    pub fn remove_ending_before(&mut self, value: T) {
        if let Some(min) = self.min() {
            if value > min {
                self.remove_range(min, value.next_lower());
            }
        }
    }

    /// Keeps only the members for which `keep` returns true.
    pub(crate) fn retain_where(&mut self, mut keep: impl FnMut(T) -> bool) {
        let removed = std::mem::take(&mut self.values);
        for value in removed {
            if keep(value) {
                self.values.push(value);
            } else {
                self.events.record(SetEvent::ValueRemoved(value));
            }
        }
    }
}

impl<T: NumericValue> PartialEq for SparseSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}
