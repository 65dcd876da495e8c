//! Extensions for numbers that are not present in the stable standard library.

pub(crate) trait NumExt {
    /// Division with rounding up.
    fn div_ceiling(self, other: Self) -> Self;

    /// Division with rounding down.
    ///
    /// Note this is different from truncating, which is rounding toward zero.
    fn div_flooring(self, other: Self) -> Self;
}

macro_rules! impl_num_ext {
    ($type:ty) => {
        impl NumExt for $type {
            fn div_ceiling(self, other: Self) -> Self {
                let d = self / other;
                let r = self % other;
                if (r > 0 && other > 0) || (r < 0 && other < 0) {
                    d + 1
                } else {
                    d
                }
            }

            fn div_flooring(self, other: Self) -> Self {
                let d = self / other;
                let r = self % other;
                if (r > 0 && other < 0) || (r < 0 && other > 0) {
                    d - 1
                } else {
                    d
                }
            }
        }
    };
}

impl_num_ext!(i32);
impl_num_ext!(i64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn division_rounds_in_the_right_direction() {
        assert_eq!(7i32.div_ceiling(2), 4);
        assert_eq!(7i32.div_flooring(2), 3);
        assert_eq!((-7i32).div_ceiling(2), -3);
        assert_eq!((-7i32).div_flooring(2), -4);
        assert_eq!(7i64.div_ceiling(-2), -3);
        assert_eq!(7i64.div_flooring(-2), -4);
        assert_eq!(6i32.div_ceiling(3), 2);
        assert_eq!(6i32.div_flooring(3), 2);
    }
}
