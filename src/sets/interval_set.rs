use itertools::Itertools;

use crate::arclight_assert_extreme;
use crate::arclight_assert_moderate;
use crate::sets::numeric_value::max_of;
use crate::sets::numeric_value::min_of;
use crate::sets::numeric_value::NumericValue;
use crate::sets::set_event::SetEvent;
use crate::sets::set_event::SetEventSink;

/// Sentinel slot index marking the end of the interval list.
const NIL: usize = usize::MAX;
/// Marker stored in `prev` for slots that are on the free chain rather than in the live list.
const FREE: usize = usize::MAX - 1;

/// A set of values represented as disjoint, sorted, non-adjacent closed intervals.
///
/// The intervals live in parallel arrays (`starts`, `ends`, `prev`, `next`) addressed by slot
/// index; `prev`/`next` form an intrusive doubly-linked list over the live intervals in
/// ascending order. Vacated slots are recycled through a singly-linked free chain threaded
/// through the same `next` array, distinguished by the [`FREE`] marker in `prev`. This keeps
/// allocate/free amortized O(1) without per-interval heap allocation.
///
/// Invariants: intervals are sorted ascending by start, and no two stored intervals touch or
/// overlap; adjacent intervals are always merged. The size is tracked as a saturating 64-bit
/// running total so that huge ranges cannot overflow it.
///
/// An empty set is a valid state at this layer. Emptiness-as-failure is enforced by the node
/// layer.
#[derive(Clone, Debug)]
pub struct IntervalSet<T> {
    starts: Vec<T>,
    ends: Vec<T>,
    prev: Vec<usize>,
    next: Vec<usize>,
    first: usize,
    last: usize,
    free_head: usize,
    size: u64,
    pub(crate) events: SetEventSink<T>,
}

impl<T: NumericValue> Default for IntervalSet<T> {
    fn default() -> Self {
        IntervalSet {
            starts: Vec::new(),
            ends: Vec::new(),
            prev: Vec::new(),
            next: Vec::new(),
            first: NIL,
            last: NIL,
            free_head: NIL,
            size: 0,
            events: SetEventSink::default(),
        }
    }
}

impl<T: NumericValue> IntervalSet<T> {
    /// Creates a set containing exactly the closed range `[start, end]`.
    pub fn from_bounds(start: T, end: T) -> Self {
        let mut set = IntervalSet::default();
        set.add_range(start, end);
        set
    }

    pub fn is_empty(&self) -> bool {
        self.first == NIL
    }

    /// The number of values in the set, saturating at `u64::MAX`.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The number of stored intervals.
    pub fn interval_count(&self) -> usize {
        self.iter().count()
    }

    pub fn min(&self) -> Option<T> {
        (self.first != NIL).then(|| self.starts[self.first])
    }

    pub fn max(&self) -> Option<T> {
        (self.last != NIL).then(|| self.ends[self.last])
    }

    pub fn contains(&self, value: T) -> bool {
        if value.is_invalid() {
            return false;
        }
        let mut cur = self.first;
        while cur != NIL && self.ends[cur] < value {
            cur = self.next[cur];
        }
        cur != NIL && self.starts[cur] <= value
    }

    /// The smallest member strictly greater than `value`, or `value` itself when no such member
    /// exists. The identity fallback is a documented contract, not an error: callers detect
    /// "no strictly greater value" by comparing the result against the input.
    pub fn next_higher(&self, value: T) -> T {
        let mut cur = self.first;
        while cur != NIL {
            if value < self.starts[cur] {
                return self.starts[cur];
            }
            if value < self.ends[cur] {
                return value.next_higher();
            }
            cur = self.next[cur];
        }
        value
    }

    /// The largest member strictly smaller than `value`, or `value` itself when no such member
    /// exists.
    pub fn next_lower(&self, value: T) -> T {
        let mut cur = self.last;
        while cur != NIL {
            if value > self.ends[cur] {
                return self.ends[cur];
            }
            if value > self.starts[cur] {
                return value.next_lower();
            }
            cur = self.prev[cur];
        }
        value
    }

    /// Iterates the stored intervals in ascending order as `(start, end)` pairs.
    pub fn iter(&self) -> IntervalIter<'_, T> {
        IntervalIter {
            set: self,
            cursor: self.first,
        }
    }

    /// Iterates the individual values of the set in ascending order.
    ///
    /// Only meaningful for integral kinds; a non-degenerate real interval would enumerate every
    /// representable value in it.
    pub fn values(&self) -> IntervalValueIter<'_, T> {
        IntervalValueIter {
            set: self,
            cursor: self.first,
            current: self.min(),
        }
    }

    pub fn add(&mut self, value: T) {
        self.add_range(value, value);
    }

    /// Adds the closed range `[start, end]`, merging with any overlapping or adjacent
    /// intervals. An inverted or invalid range is a no-op.
    ///
    /// One [`SetEvent::RangeAdded`] is recorded per *gap* that got filled, not one for the whole
    /// range.
    pub fn add_range(&mut self, start: T, end: T) {
        if start.is_invalid() || end.is_invalid() || start > end {
            return;
        }

        // Find the first interval that overlaps or touches [start, end].
        let mut cur = self.first;
        while cur != NIL && self.ends[cur].next_higher() < start {
            cur = self.next[cur];
        }

        if cur == NIL || self.starts[cur].next_lower() > end {
            // No overlap and no adjacency: splice in a fresh interval.
            let idx = self.alloc(start, end);
            self.insert_before(cur, idx);
            self.size = self.size.saturating_add(T::count(start, end));
            self.events.record(SetEvent::RangeAdded { start, end });
        } else {
            self.add_range_merging(start, end, cur);
        }

        arclight_assert_extreme!(self.debug_invariants_hold());
    }

    /// The overlapping/adjacent case of [`IntervalSet::add_range`]: consume the run of affected
    /// intervals, record one event per filled gap, and record a single merged interval.
    fn add_range_merging(&mut self, start: T, end: T, mut cur: usize) {
        let new_start = min_of(start, self.starts[cur]);
        let mut new_end = end;
        let mut gap_lo = start;
        let mut tail_gap = true;

        while cur != NIL && self.starts[cur].next_lower() <= end {
            let interval_start = self.starts[cur];
            let interval_end = self.ends[cur];

            if gap_lo < interval_start {
                let gap_hi = min_of(interval_start.next_lower(), end);
                if gap_lo <= gap_hi {
                    self.size = self.size.saturating_add(T::count(gap_lo, gap_hi));
                    self.events.record(SetEvent::RangeAdded {
                        start: gap_lo,
                        end: gap_hi,
                    });
                }
            }

            new_end = max_of(new_end, interval_end);
            if interval_end >= end {
                tail_gap = false;
            } else {
                gap_lo = interval_end.next_higher();
            }

            let following = self.next[cur];
            self.unlink(cur);
            self.free(cur);
            cur = following;
        }

        if tail_gap && gap_lo <= end {
            self.size = self.size.saturating_add(T::count(gap_lo, end));
            self.events.record(SetEvent::RangeAdded {
                start: gap_lo,
                end,
            });
        }

        let idx = self.alloc(new_start, new_end);
        self.insert_before(cur, idx);
    }

    pub fn remove(&mut self, value: T) {
        self.remove_range(value, value);
    }

    /// Removes the closed range `[start, end]`. Fully covered intervals are freed, clipped
    /// intervals shrink in place, and a strictly interior removal splits an interval into head
    /// and tail fragments. One [`SetEvent::RangeRemoved`] is recorded per removed sub-range.
    pub fn remove_range(&mut self, start: T, end: T) {
        if start.is_invalid() || end.is_invalid() || start > end {
            return;
        }

        let mut cur = self.first;
        while cur != NIL && self.ends[cur] < start {
            cur = self.next[cur];
        }

        while cur != NIL && self.starts[cur] <= end {
            let following = self.next[cur];
            let interval_start = self.starts[cur];
            let interval_end = self.ends[cur];

            let cut_lo = max_of(interval_start, start);
            let cut_hi = min_of(interval_end, end);

            self.size = self.size.saturating_sub(T::count(cut_lo, cut_hi));
            self.events.record(SetEvent::RangeRemoved {
                start: cut_lo,
                end: cut_hi,
            });

            match (interval_start < cut_lo, interval_end > cut_hi) {
                (false, false) => {
                    self.unlink(cur);
                    self.free(cur);
                }
                (true, false) => self.ends[cur] = cut_lo.next_lower(),
                (false, true) => self.starts[cur] = cut_hi.next_higher(),
                (true, true) => {
                    // Interior removal: free the original and relink two fragments.
                    self.unlink(cur);
                    self.free(cur);
                    let head = self.alloc(interval_start, cut_lo.next_lower());
                    self.insert_before(following, head);
                    let tail = self.alloc(cut_hi.next_higher(), interval_end);
                    self.insert_before(following, tail);
                }
            }

            cur = following;
        }

        arclight_assert_extreme!(self.debug_invariants_hold());
    }

    /// Removes every member `>= value`.
    pub fn remove_starting_from(&mut self, value: T) {
        if let Some(max) = self.max() {
            if value <= max {
                self.remove_range(value, max);
            }
        }
    }

    /// Removes every member `> value`.
    pub fn remove_starting_after(&mut self, value: T) {
        if let Some(max) = self.max() {
            if value < max {
                self.remove_range(value.next_higher(), max);
            }
        }
    }

    /// Removes every member `<= value`.
    pub fn remove_ending_at(&mut self, value: T) {
        if let Some(min) = self.min() {
            if value >= min {
                self.remove_range(min, value);
            }
        }
    }

    /// Removes every member `< value`.
    pub fn remove_ending_before(&mut self, value: T) {
        if let Some(min) = self.min() {
            if value > min {
                self.remove_range(min, value.next_lower());
            }
        }
    }

    /// Returns the complement of `self` within the window `[start, end]`: a fresh set seeded
    /// with the window, minus every interval of `self` that falls in it. Used by
    /// scheduling-style constraints that need the available slots.
    pub fn free_intervals_between(&self, start: T, end: T) -> IntervalSet<T> {
        let mut complement = IntervalSet::from_bounds(start, end);
        for (interval_start, interval_end) in self.iter() {
            if interval_end < start {
                continue;
            }
            if interval_start > end {
                break;
            }
            complement.remove_range(interval_start, interval_end);
        }
        complement
    }

    /// Destructively trims `self` to `other`: removes everything outside `other`'s extremes and
    /// every gap between `other`'s consecutive intervals.
    pub fn intersect(&mut self, other: &IntervalSet<T>) {
        let (Some(other_min), Some(other_max)) = (other.min(), other.max()) else {
            if let (Some(min), Some(max)) = (self.min(), self.max()) {
                self.remove_range(min, max);
            }
            return;
        };

        self.remove_ending_before(other_min);
        self.remove_starting_after(other_max);

        let gaps = other
            .iter()
            .tuple_windows()
            .map(|((_, left_end), (right_start, _))| {
                (left_end.next_higher(), right_start.next_lower())
            })
            .collect::<Vec<_>>();
        for (gap_start, gap_end) in gaps {
            self.remove_range(gap_start, gap_end);
        }
    }

    /// Trims `self` to the sorted value list `values` (the sparse-set counterpart of
    /// [`IntervalSet::intersect`]).
    pub(crate) fn retain_values(&mut self, values: &[T]) {
        let (Some(&first_value), Some(&last_value)) = (values.first(), values.last()) else {
            if let (Some(min), Some(max)) = (self.min(), self.max()) {
                self.remove_range(min, max);
            }
            return;
        };

        self.remove_ending_before(first_value);
        self.remove_starting_after(last_value);

        for (&low, &high) in values.iter().tuple_windows() {
            self.remove_range(low.next_higher(), high.next_lower());
        }
    }

    fn alloc(&mut self, start: T, end: T) -> usize {
        if self.free_head == NIL {
            self.grow(start);
        }

        let idx = self.free_head;
        arclight_assert_moderate!(self.prev[idx] == FREE);
        self.free_head = self.next[idx];
        self.starts[idx] = start;
        self.ends[idx] = end;
        idx
    }

    fn free(&mut self, idx: usize) {
        self.prev[idx] = FREE;
        self.next[idx] = self.free_head;
        self.free_head = idx;
    }

    /// Grows the backing arrays by half their current length plus two slots, chaining the new
    /// slots onto the free list. `placeholder` is only used to fill the value arrays.
    fn grow(&mut self, placeholder: T) {
        let additional = self.starts.len() / 2 + 2;
        for _ in 0..additional {
            let idx = self.starts.len();
            self.starts.push(placeholder);
            self.ends.push(placeholder);
            self.prev.push(FREE);
            self.next.push(self.free_head);
            self.free_head = idx;
        }
    }

    /// Splices `idx` into the live list immediately before `before` (`NIL` appends at the back).
    fn insert_before(&mut self, before: usize, idx: usize) {
        let previous = if before == NIL {
            self.last
        } else {
            self.prev[before]
        };

        self.prev[idx] = previous;
        self.next[idx] = before;

        if previous == NIL {
            self.first = idx;
        } else {
            self.next[previous] = idx;
        }

        if before == NIL {
            self.last = idx;
        } else {
            self.prev[before] = idx;
        }
    }

    fn unlink(&mut self, idx: usize) {
        let previous = self.prev[idx];
        let following = self.next[idx];

        if previous == NIL {
            self.first = following;
        } else {
            self.next[previous] = following;
        }

        if following == NIL {
            self.last = previous;
        } else {
            self.prev[following] = previous;
        }
    }

    fn debug_invariants_hold(&self) -> bool {
        let mut cur = self.first;
        while cur != NIL {
            if self.prev[cur] == FREE || self.starts[cur] > self.ends[cur] {
                return false;
            }
            let following = self.next[cur];
            if following != NIL {
                // Sorted, disjoint and non-adjacent.
                if self.ends[cur].next_higher() >= self.starts[following]
                    && !(self.ends[cur] == T::MAX_BOUND)
                {
                    return false;
                }
            }
            cur = following;
        }
        true
    }
}

/// Structural equality: two sets are equal when their ordered interval sequences have identical
/// boundaries. Two representations covering the same values but split differently would compare
/// unequal; the adjacency-merge invariant means such representations should never arise, and
/// callers depend on the boundary-level comparison.
impl<T: NumericValue> PartialEq for IntervalSet<T> {
    fn eq(&self, other: &Self) -> bool {
        self.iter().eq(other.iter())
    }
}

#[derive(Debug)]
pub struct IntervalIter<'a, T> {
    set: &'a IntervalSet<T>,
    cursor: usize,
}

impl<T: NumericValue> Iterator for IntervalIter<'_, T> {
    type Item = (T, T);

    fn next(&mut self) -> Option<(T, T)> {
        if self.cursor == NIL {
            return None;
        }
        let item = (self.set.starts[self.cursor], self.set.ends[self.cursor]);
        self.cursor = self.set.next[self.cursor];
        Some(item)
    }
}

#[derive(Debug)]
pub struct IntervalValueIter<'a, T> {
    set: &'a IntervalSet<T>,
    cursor: usize,
    current: Option<T>,
}

impl<T: NumericValue> Iterator for IntervalValueIter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        let value = self.current?;
        if self.cursor == NIL {
            self.current = None;
            return None;
        }

        let interval_end = self.set.ends[self.cursor];
        if value < interval_end {
            self.current = Some(value.next_higher());
        } else {
            self.cursor = self.set.next[self.cursor];
            self.current = (self.cursor != NIL).then(|| self.set.starts[self.cursor]);
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drained(set: &mut IntervalSet<i32>) -> Vec<SetEvent<i32>> {
        set.events.drain().map(|(_, event)| event).collect()
    }

    #[test]
    fn adjacent_ranges_merge_into_one_interval() {
        let mut set = IntervalSet::default();
        set.add_range(25, 100);
        set.add_range(0, 24);

        assert_eq!(set.interval_count(), 1);
        assert_eq!(set.min(), Some(0));
        assert_eq!(set.max(), Some(100));
        assert_eq!(set.size(), 101);
    }

    #[test]
    fn overlapping_add_notifies_once_per_filled_gap() {
        let mut set = IntervalSet::default();
        set.add_range(5, 10);
        set.add_range(20, 25);
        set.events.register(7);

        set.add_range(0, 30);

        let events = drained(&mut set);
        assert_eq!(
            events,
            vec![
                SetEvent::RangeAdded { start: 0, end: 4 },
                SetEvent::RangeAdded { start: 11, end: 19 },
                SetEvent::RangeAdded { start: 26, end: 30 },
            ]
        );
        assert_eq!(set.interval_count(), 1);
        assert_eq!(set.size(), 31);
    }

    #[test]
    fn add_within_existing_interval_is_silent() {
        let mut set = IntervalSet::from_bounds(0, 100);
        set.events.register(0);

        set.add_range(10, 20);

        assert!(drained(&mut set).is_empty());
        assert_eq!(set.size(), 101);
    }

    #[test]
    fn interior_removal_splits_an_interval() {
        let mut set = IntervalSet::from_bounds(0, 100);
        set.events.register(0);

        set.remove_range(25, 75);

        assert_eq!(
            drained(&mut set),
            vec![SetEvent::RangeRemoved { start: 25, end: 75 }]
        );
        assert_eq!(set.interval_count(), 2);
        assert_eq!(set.size(), 50);
        assert!(set.contains(24));
        assert!(!set.contains(25));
        assert!(!set.contains(75));
        assert!(set.contains(76));
    }

    #[test]
    fn removal_clips_head_and_tail_in_place() {
        let mut set = IntervalSet::from_bounds(10, 20);

        set.remove_range(5, 12);
        assert_eq!(set.min(), Some(13));

        set.remove_range(18, 25);
        assert_eq!(set.max(), Some(17));
        assert_eq!(set.interval_count(), 1);
        assert_eq!(set.size(), 5);
    }

    #[test]
    fn removal_spanning_multiple_intervals_notifies_each_intersection() {
        let mut set = IntervalSet::default();
        set.add_range(0, 10);
        set.add_range(20, 30);
        set.add_range(40, 50);
        set.events.register(0);

        set.remove_range(5, 45);

        assert_eq!(
            drained(&mut set),
            vec![
                SetEvent::RangeRemoved { start: 5, end: 10 },
                SetEvent::RangeRemoved { start: 20, end: 30 },
                SetEvent::RangeRemoved { start: 40, end: 45 },
            ]
        );
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(0, 4), (46, 50)]);
    }

    #[test]
    fn next_higher_and_lower_fall_back_to_the_input() {
        let set: IntervalSet<i32> = IntervalSet::default();
        assert_eq!(set.next_higher(5), 5);
        assert_eq!(set.next_lower(5), 5);

        let mut set = IntervalSet::from_bounds(0, 10);
        set.remove_range(4, 6);
        assert_eq!(set.next_higher(3), 7);
        assert_eq!(set.next_lower(7), 3);
        assert_eq!(set.next_higher(10), 10);
        assert_eq!(set.next_lower(0), 0);
        assert_eq!(set.next_higher(-5), 0);
        assert_eq!(set.next_lower(100), 10);
    }

    #[test]
    fn clone_is_fully_independent() {
        let set = IntervalSet::from_bounds(3, 10);
        let mut copy = set.clone();

        copy.remove_range(3, 7);

        assert_eq!(set.min(), Some(3));
        assert_eq!(set.max(), Some(10));
        assert_eq!(copy.min(), Some(8));
    }

    #[test]
    fn size_accounting_follows_adds_and_removes() {
        let mut set = IntervalSet::default();
        set.add_range(0, 100);
        assert_eq!(set.size(), 101);

        set.remove_range(25, 75);
        assert_eq!(set.size(), 50);

        set.add(25);
        assert_eq!(set.size(), 51);
    }

    #[test]
    fn size_saturates_for_huge_ranges() {
        let mut set: IntervalSet<i64> = IntervalSet::default();
        set.add_range(i64::MIN, i64::MAX);
        assert_eq!(set.size(), u64::MAX);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut set = IntervalSet::default();
        for i in 0..10 {
            set.add_range(i * 10, i * 10 + 5);
        }
        let slots = set.starts.len();

        // Merging everything frees nine slots; subsequent adds must not grow the arrays.
        set.add_range(0, 95);
        for i in 0..8 {
            set.remove(i * 10 + 7);
        }
        assert!(set.starts.len() <= slots + slots / 2 + 2);
        assert_eq!(set.interval_count(), 9);
    }

    #[test]
    fn structural_equality_compares_interval_boundaries() {
        let mut left = IntervalSet::default();
        left.add_range(0, 5);
        left.add_range(10, 15);

        let mut right = IntervalSet::default();
        right.add_range(10, 15);
        right.add_range(0, 5);

        assert_eq!(left, right);

        right.remove(12);
        assert_ne!(left, right);
    }

    #[test]
    fn free_intervals_between_is_the_windowed_complement() {
        let mut set = IntervalSet::default();
        set.add_range(5, 10);
        set.add_range(20, 25);

        let complement = set.free_intervals_between(0, 30);
        assert_eq!(
            complement.iter().collect::<Vec<_>>(),
            vec![(0, 4), (11, 19), (26, 30)]
        );
    }

    #[test]
    fn intersect_trims_to_the_other_set() {
        let mut set = IntervalSet::from_bounds(0, 100);
        let mut other = IntervalSet::default();
        other.add_range(10, 20);
        other.add_range(40, 50);

        set.intersect(&other);

        assert_eq!(set.iter().collect::<Vec<_>>(), vec![(10, 20), (40, 50)]);

        let empty = IntervalSet::default();
        set.intersect(&empty);
        assert!(set.is_empty());
        assert_eq!(set.size(), 0);
    }

    #[test]
    fn values_iterates_across_holes() {
        let mut set = IntervalSet::default();
        set.add_range(1, 3);
        set.add_range(7, 8);

        assert_eq!(set.values().collect::<Vec<_>>(), vec![1, 2, 3, 7, 8]);
    }

    #[test]
    fn float_adjacency_merges_at_representable_neighbours() {
        let mut set: IntervalSet<f64> = IntervalSet::default();
        set.add_range(1.0, 2.0);
        set.add_range(2.0f64.next_up(), 3.0);

        assert_eq!(set.interval_count(), 1);
        assert_eq!(set.min(), Some(1.0));
        assert_eq!(set.max(), Some(3.0));
    }

    #[test]
    fn add_at_the_representable_extremes() {
        let mut set: IntervalSet<i32> = IntervalSet::default();
        set.add_range(i32::MAX - 1, i32::MAX);
        set.add_range(i32::MIN, i32::MIN + 1);
        assert_eq!(set.interval_count(), 2);

        set.add_range(i32::MIN, i32::MAX);
        assert_eq!(set.interval_count(), 1);
        assert!(set.contains(0));
    }
}
