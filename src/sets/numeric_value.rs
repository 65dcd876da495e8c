use crate::math::num_ext::NumExt;

/// The per-kind operations that differ between the scalar kinds a domain can hold.
///
/// The domain and arc code is generic over this trait; the four implementations (`i32`, `i64`,
/// `f32`, `f64`) capture exactly the behaviour that varies per kind: the successor/predecessor
/// representable value, the invalid-result sentinel, saturating range counting and the rounding
/// rules used when tightening bounds under division.
///
/// Arithmetic that would overflow the kind, or produce a non-finite float, yields `None`. Such
/// results are "invalid" in the sense of the propagation contract: they must be excluded from
/// min/max reductions instead of corrupting a bound.
pub trait NumericValue:
    Copy + PartialOrd + PartialEq + std::fmt::Debug + std::fmt::Display + 'static
{
    /// The smallest representable value of this kind.
    const MIN_BOUND: Self;
    /// The largest representable value of this kind.
    const MAX_BOUND: Self;
    const ZERO: Self;
    const ONE: Self;
    /// Whether the kind is an integer kind. Integral kinds admit full arc-consistency passes
    /// over explicit value lists; real kinds only support bound reasoning.
    const INTEGRAL: bool;

    /// The next representable value above `self`, saturating at [`Self::MAX_BOUND`].
    fn next_higher(self) -> Self;

    /// The next representable value below `self`, saturating at [`Self::MIN_BOUND`].
    fn next_lower(self) -> Self;

    /// Whether the value is the invalid sentinel of this kind (NaN or an infinity for the real
    /// kinds; integer kinds have no invalid values).
    fn is_invalid(self) -> bool;

    /// The number of representable values in the closed range `[start, end]`, saturating at
    /// `u64::MAX`. Non-degenerate real ranges saturate.
    fn count(start: Self, end: Self) -> u64;

    fn checked_add(self, other: Self) -> Option<Self>;

    fn checked_sub(self, other: Self) -> Option<Self>;

    fn checked_mul(self, other: Self) -> Option<Self>;

    /// `self / other` rounded towards negative infinity, used when tightening upper bounds.
    /// `None` when `other` is zero or the result is invalid.
    fn div_floor_bound(self, other: Self) -> Option<Self>;

    /// `self / other` rounded towards positive infinity, used when tightening lower bounds.
    /// `None` when `other` is zero or the result is invalid.
    fn div_ceil_bound(self, other: Self) -> Option<Self>;

    /// `self / other` with the kind's native division (truncating for integer kinds). `None`
    /// when `other` is zero or the result is invalid.
    fn div_trunc(self, other: Self) -> Option<Self>;

    /// Negation, saturating at the representable extremes.
    fn negated(self) -> Self;

    /// Absolute value, saturating at [`Self::MAX_BOUND`].
    fn abs_val(self) -> Self;

    fn as_f64(self) -> f64;

    /// The largest value of this kind that is `<= value`, or `None` when `value` is invalid or
    /// below the representable range.
    fn from_f64_floor(value: f64) -> Option<Self>;

    /// The smallest value of this kind that is `>= value`, or `None` when `value` is invalid or
    /// above the representable range.
    fn from_f64_ceil(value: f64) -> Option<Self>;
}

pub(crate) fn min_of<T: NumericValue>(a: T, b: T) -> T {
    if a <= b { a } else { b }
}

pub(crate) fn max_of<T: NumericValue>(a: T, b: T) -> T {
    if a >= b { a } else { b }
}

macro_rules! impl_numeric_value_int {
    ($type:ty, $wide:ty) => {
        impl NumericValue for $type {
            const MIN_BOUND: Self = <$type>::MIN;
            const MAX_BOUND: Self = <$type>::MAX;
            const ZERO: Self = 0;
            const ONE: Self = 1;
            const INTEGRAL: bool = true;

            fn next_higher(self) -> Self {
                self.saturating_add(1)
            }

            fn next_lower(self) -> Self {
                self.saturating_sub(1)
            }

            fn is_invalid(self) -> bool {
                false
            }

            fn count(start: Self, end: Self) -> u64 {
                if start > end {
                    return 0;
                }
                let width = (end as $wide) - (start as $wide) + 1;
                u64::try_from(width).unwrap_or(u64::MAX)
            }

            fn checked_add(self, other: Self) -> Option<Self> {
                <$type>::checked_add(self, other)
            }

            fn checked_sub(self, other: Self) -> Option<Self> {
                <$type>::checked_sub(self, other)
            }

            fn checked_mul(self, other: Self) -> Option<Self> {
                <$type>::checked_mul(self, other)
            }

            fn div_floor_bound(self, other: Self) -> Option<Self> {
                if other == 0 || (self == <$type>::MIN && other == -1) {
                    None
                } else {
                    Some(self.div_flooring(other))
                }
            }

            fn div_ceil_bound(self, other: Self) -> Option<Self> {
                if other == 0 || (self == <$type>::MIN && other == -1) {
                    None
                } else {
                    Some(self.div_ceiling(other))
                }
            }

            fn div_trunc(self, other: Self) -> Option<Self> {
                <$type>::checked_div(self, other)
            }

            fn negated(self) -> Self {
                self.saturating_neg()
            }

            fn abs_val(self) -> Self {
                self.saturating_abs()
            }

            fn as_f64(self) -> f64 {
                self as f64
            }

            fn from_f64_floor(value: f64) -> Option<Self> {
                if value.is_nan() || value < <$type>::MIN as f64 {
                    return None;
                }
                if value >= <$type>::MAX as f64 {
                    return Some(<$type>::MAX);
                }
                Some(value.floor() as $type)
            }

            fn from_f64_ceil(value: f64) -> Option<Self> {
                if value.is_nan() || value > <$type>::MAX as f64 {
                    return None;
                }
                if value <= <$type>::MIN as f64 {
                    return Some(<$type>::MIN);
                }
                Some(value.ceil() as $type)
            }
        }
    };
}

impl_numeric_value_int!(i32, i64);
impl_numeric_value_int!(i64, i128);

macro_rules! impl_numeric_value_float {
    ($type:ty) => {
        // The casts are identities in the `f64` expansion of the macro.
        #[allow(trivial_numeric_casts)]
        impl NumericValue for $type {
            const MIN_BOUND: Self = <$type>::MIN;
            const MAX_BOUND: Self = <$type>::MAX;
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const INTEGRAL: bool = false;

            fn next_higher(self) -> Self {
                let up = self.next_up();
                if up.is_finite() { up } else { <$type>::MAX }
            }

            fn next_lower(self) -> Self {
                let down = self.next_down();
                if down.is_finite() { down } else { <$type>::MIN }
            }

            fn is_invalid(self) -> bool {
                !self.is_finite()
            }

            fn count(start: Self, end: Self) -> u64 {
                if start > end {
                    0
                } else if start == end {
                    1
                } else {
                    // Counting representable reals in a non-degenerate range is not meaningful;
                    // the size counter saturates.
                    u64::MAX
                }
            }

            fn checked_add(self, other: Self) -> Option<Self> {
                let result = self + other;
                result.is_finite().then_some(result)
            }

            fn checked_sub(self, other: Self) -> Option<Self> {
                let result = self - other;
                result.is_finite().then_some(result)
            }

            fn checked_mul(self, other: Self) -> Option<Self> {
                let result = self * other;
                result.is_finite().then_some(result)
            }

            fn div_floor_bound(self, other: Self) -> Option<Self> {
                if other == 0.0 {
                    return None;
                }
                let result = self / other;
                result.is_finite().then_some(result)
            }

            fn div_ceil_bound(self, other: Self) -> Option<Self> {
                self.div_floor_bound(other)
            }

            fn div_trunc(self, other: Self) -> Option<Self> {
                self.div_floor_bound(other)
            }

            fn negated(self) -> Self {
                -self
            }

            fn abs_val(self) -> Self {
                self.abs()
            }

            fn as_f64(self) -> f64 {
                self as f64
            }

            fn from_f64_floor(value: f64) -> Option<Self> {
                if value.is_nan() || value < <$type>::MIN as f64 {
                    return None;
                }
                let converted = value as $type;
                // Conversion rounds to nearest; nudge down if it overshot.
                if (converted as f64) > value {
                    Some(converted.next_lower())
                } else {
                    Some(converted)
                }
            }

            fn from_f64_ceil(value: f64) -> Option<Self> {
                if value.is_nan() || value > <$type>::MAX as f64 {
                    return None;
                }
                let converted = value as $type;
                if (converted as f64) < value {
                    Some(converted.next_higher())
                } else {
                    Some(converted)
                }
            }
        }
    };
}

impl_numeric_value_float!(f32);
impl_numeric_value_float!(f64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_successors_saturate_at_the_extremes() {
        assert_eq!(5i32.next_higher(), 6);
        assert_eq!(i32::MAX.next_higher(), i32::MAX);
        assert_eq!(i64::MIN.next_lower(), i64::MIN);
    }

    #[test]
    fn float_successors_are_adjacent_representable_values() {
        let value = 1.0f64;
        assert!(value.next_higher() > value);
        assert_eq!(value.next_higher().next_lower(), value);
        assert_eq!(f32::MAX.next_higher(), f32::MAX);
    }

    #[test]
    fn count_saturates_for_huge_integer_ranges() {
        assert_eq!(i32::count(0, 100), 101);
        assert_eq!(i64::count(i64::MIN, i64::MAX), u64::MAX);
        assert_eq!(i32::count(10, 5), 0);
    }

    #[test]
    fn count_of_real_ranges_is_degenerate_or_saturated() {
        assert_eq!(f64::count(3.5, 3.5), 1);
        assert_eq!(f64::count(0.0, 1.0), u64::MAX);
    }

    #[test]
    fn overflowing_arithmetic_is_invalid() {
        assert_eq!(i32::MAX.checked_add(1), None);
        assert_eq!(i64::MIN.checked_mul(-1), None);
        assert_eq!(f64::MAX.checked_mul(2.0), None);
    }

    #[test]
    fn division_bounds_round_outward() {
        assert_eq!(7i32.div_ceil_bound(2), Some(4));
        assert_eq!(7i32.div_floor_bound(2), Some(3));
        assert_eq!((-7i32).div_ceil_bound(2), Some(-3));
        assert_eq!((-7i32).div_floor_bound(2), Some(-4));
        assert_eq!(1i32.div_floor_bound(0), None);
    }

    #[test]
    fn f64_bounds_convert_outward_into_f32() {
        let value = 0.1f64;
        let floor = f32::from_f64_floor(value).unwrap();
        let ceil = f32::from_f64_ceil(value).unwrap();
        assert!((floor as f64) <= value);
        assert!((ceil as f64) >= value);
        assert!(floor == ceil || floor.next_higher() == ceil);
    }
}
