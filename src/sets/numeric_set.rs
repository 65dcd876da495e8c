use crate::basic_types::SetOperationError;
use crate::sets::interval_set::IntervalSet;
use crate::sets::numeric_value::NumericValue;
use crate::sets::set_event::SetEvent;
use crate::sets::sparse_set::SparseSet;

/// The domain container of a single variable: either an interval-based set or a sparse set of
/// singleton values.
///
/// The two variants share the mutation and query API; the handful of call sites that need to
/// special-case interval structure pattern-match through [`NumericSet::intervals`].
#[derive(Clone, Debug)]
pub enum NumericSet<T> {
    Interval(IntervalSet<T>),
    Sparse(SparseSet<T>),
}

/// Equality is structural: both the variant and the stored value runs must match. Two sets
/// denoting the same values through different variants do not compare equal.
impl<T: NumericValue> PartialEq for NumericSet<T> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (NumericSet::Interval(lhs), NumericSet::Interval(rhs)) => lhs == rhs,
            (NumericSet::Sparse(lhs), NumericSet::Sparse(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

impl<T: NumericValue> NumericSet<T> {
    /// A fresh interval-based set holding the closed range `[min, max]`.
    pub fn new_interval_set(min: T, max: T) -> Self {
        NumericSet::Interval(IntervalSet::from_bounds(min, max))
    }

    /// A fresh empty sparse set.
    pub fn new_sparse_set() -> Self {
        NumericSet::Sparse(SparseSet::default())
    }

    /// A fresh sparse set holding the given values.
    pub fn sparse_from_values(values: Vec<T>) -> Self {
        NumericSet::Sparse(SparseSet::from_values(values))
    }

    /// The interval structure of this set, when it has one.
    pub fn intervals(&self) -> Option<&IntervalSet<T>> {
        match self {
            NumericSet::Interval(set) => Some(set),
            NumericSet::Sparse(_) => None,
        }
    }

    /// Registers a change listener. The opaque `tag` is forwarded on every recorded event so a
    /// single listener can demultiplex events from many sets.
    pub fn set_listener(&mut self, tag: u32) {
        match self {
            NumericSet::Interval(set) => set.events.register(tag),
            NumericSet::Sparse(set) => set.events.register(tag),
        }
    }

    /// Drains the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<(u32, SetEvent<T>)> {
        match self {
            NumericSet::Interval(set) => set.events.drain().collect(),
            NumericSet::Sparse(set) => set.events.drain().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            NumericSet::Interval(set) => set.is_empty(),
            NumericSet::Sparse(set) => set.is_empty(),
        }
    }

    pub fn size(&self) -> u64 {
        match self {
            NumericSet::Interval(set) => set.size(),
            NumericSet::Sparse(set) => set.size(),
        }
    }

    pub fn min(&self) -> Option<T> {
        match self {
            NumericSet::Interval(set) => set.min(),
            NumericSet::Sparse(set) => set.min(),
        }
    }

    pub fn max(&self) -> Option<T> {
        match self {
            NumericSet::Interval(set) => set.max(),
            NumericSet::Sparse(set) => set.max(),
        }
    }

    /// The members as a flat sorted list. Intended for small domains only.
    pub fn collect_values(&self) -> Vec<T> {
        match self {
            NumericSet::Interval(set) => set.values().collect(),
            NumericSet::Sparse(set) => set.values().to_vec(),
        }
    }

    pub fn contains(&self, value: T) -> bool {
        match self {
            NumericSet::Interval(set) => set.contains(value),
            NumericSet::Sparse(set) => set.contains(value),
        }
    }

    pub fn next_higher(&self, value: T) -> T {
        match self {
            NumericSet::Interval(set) => set.next_higher(value),
            NumericSet::Sparse(set) => set.next_higher(value),
        }
    }

    pub fn next_lower(&self, value: T) -> T {
        match self {
            NumericSet::Interval(set) => set.next_lower(value),
            NumericSet::Sparse(set) => set.next_lower(value),
        }
    }

    pub fn add(&mut self, value: T) {
        match self {
            NumericSet::Interval(set) => set.add(value),
            NumericSet::Sparse(set) => set.add(value),
        }
    }

    /// Adds the closed range `[start, end]`.
    ///
    /// A sparse set only supports degenerate (single-value) ranges; a non-degenerate range is a
    /// usage error, not an infeasibility.
    pub fn add_range(&mut self, start: T, end: T) -> Result<(), SetOperationError> {
        match self {
            NumericSet::Interval(set) => {
                set.add_range(start, end);
                Ok(())
            }
            NumericSet::Sparse(set) => {
                if start == end {
                    set.add(start);
                    Ok(())
                } else {
                    Err(SetOperationError::Unsupported {
                        operation: "add_range",
                        variant: "sparse",
                    })
                }
            }
        }
    }

    pub fn remove(&mut self, value: T) {
        match self {
            NumericSet::Interval(set) => set.remove(value),
            NumericSet::Sparse(set) => set.remove(value),
        }
    }

    pub fn remove_range(&mut self, start: T, end: T) {
        match self {
            NumericSet::Interval(set) => set.remove_range(start, end),
            NumericSet::Sparse(set) => set.remove_range(start, end),
        }
    }

    pub fn remove_starting_from(&mut self, value: T) {
        match self {
            NumericSet::Interval(set) => set.remove_starting_from(value),
            NumericSet::Sparse(set) => set.remove_starting_from(value),
        }
    }

    pub fn remove_starting_after(&mut self, value: T) {
        match self {
            NumericSet::Interval(set) => set.remove_starting_after(value),
            NumericSet::Sparse(set) => set.remove_starting_after(value),
        }
    }

    pub fn remove_ending_at(&mut self, value: T) {
        match self {
            NumericSet::Interval(set) => set.remove_ending_at(value),
            NumericSet::Sparse(set) => set.remove_ending_at(value),
        }
    }

    pub fn remove_ending_before(&mut self, value: T) {
        match self {
            NumericSet::Interval(set) => set.remove_ending_before(value),
            NumericSet::Sparse(set) => set.remove_ending_before(value),
        }
    }

    /// Adds every member of `other` to `self`, dispatching on `other`'s variant: an interval
    /// set contributes its interval list, a sparse set its individual values.
    pub fn add_all(&mut self, other: &NumericSet<T>) -> Result<(), SetOperationError> {
        match other {
            NumericSet::Interval(other_set) => {
                for (start, end) in other_set.iter() {
                    self.add_range(start, end)?;
                }
                Ok(())
            }
            NumericSet::Sparse(other_set) => {
                for value in other_set.iter() {
                    self.add(value);
                }
                Ok(())
            }
        }
    }

    /// Removes every member of `other` from `self`.
    pub fn remove_all(&mut self, other: &NumericSet<T>) {
        match other {
            NumericSet::Interval(other_set) => {
                for (start, end) in other_set.iter() {
                    self.remove_range(start, end);
                }
            }
            NumericSet::Sparse(other_set) => {
                for value in other_set.iter() {
                    self.remove(value);
                }
            }
        }
    }

    /// Keeps only the members of `self` that are also in `other`.
    pub fn retain_all(&mut self, other: &NumericSet<T>) {
        match (self, other) {
            (NumericSet::Interval(set), NumericSet::Interval(other_set)) => {
                set.intersect(other_set);
            }
            (NumericSet::Interval(set), NumericSet::Sparse(other_set)) => {
                set.retain_values(other_set.values());
            }
            (NumericSet::Sparse(set), other) => {
                set.retain_where(|value| other.contains(value));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_range_on_a_sparse_set_is_a_usage_error() {
        let mut set: NumericSet<i32> = NumericSet::new_sparse_set();

        assert_eq!(set.add_range(3, 3), Ok(()));
        assert_eq!(
            set.add_range(0, 10),
            Err(SetOperationError::Unsupported {
                operation: "add_range",
                variant: "sparse",
            })
        );
    }

    #[test]
    fn add_all_dispatches_on_the_other_variant() {
        let mut set = NumericSet::new_interval_set(0, 5);
        let sparse = NumericSet::sparse_from_values(vec![10, 12]);
        set.add_all(&sparse).unwrap();

        assert!(set.contains(10));
        assert!(set.contains(12));
        assert!(!set.contains(11));

        let interval = NumericSet::new_interval_set(20, 22);
        set.add_all(&interval).unwrap();
        assert!(set.contains(21));
    }

    #[test]
    fn retain_all_intersects_across_variants() {
        let mut set = NumericSet::new_interval_set(0, 100);
        let sparse = NumericSet::sparse_from_values(vec![5, 50, 95]);
        set.retain_all(&sparse);
        assert_eq!(set.size(), 3);
        assert!(set.contains(50));
        assert!(!set.contains(51));

        let mut sparse_self = NumericSet::sparse_from_values(vec![1, 2, 3, 4]);
        let window = NumericSet::new_interval_set(2, 3);
        sparse_self.retain_all(&window);
        assert_eq!(sparse_self.size(), 2);
        assert!(sparse_self.contains(2));
        assert!(!sparse_self.contains(4));
    }

    #[test]
    fn equality_is_structural_per_variant() {
        let interval = NumericSet::new_interval_set(1, 3);
        let same = NumericSet::new_interval_set(1, 3);
        let sparse = NumericSet::sparse_from_values(vec![1, 2, 3]);

        assert_eq!(interval, same);
        // Same denoted values, different variant: not equal.
        assert_ne!(interval, sparse);
    }

    #[test]
    fn remove_all_subtracts_the_other_set() {
        let mut set = NumericSet::new_interval_set(0, 20);
        let other = NumericSet::new_interval_set(5, 15);
        set.remove_all(&other);
        assert_eq!(set.size(), 10);
        assert!(!set.contains(10));
    }
}
