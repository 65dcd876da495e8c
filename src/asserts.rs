//! Leveled assertion macros.
//!
//! Assertions are grouped by how expensive they are to evaluate. Simple assertions are always
//! compiled in; the more expensive levels are only enabled in tests or when the `debug-checks`
//! feature is active.

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const ARCLIGHT_ASSERT_LEVEL_DEFINITION: u8 = ARCLIGHT_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const ARCLIGHT_ASSERT_LEVEL_DEFINITION: u8 = ARCLIGHT_ASSERT_EXTREME;

pub const ARCLIGHT_ASSERT_SIMPLE: u8 = 1;
pub const ARCLIGHT_ASSERT_MODERATE: u8 = 2;
pub const ARCLIGHT_ASSERT_ADVANCED: u8 = 3;
pub const ARCLIGHT_ASSERT_EXTREME: u8 = 4;

#[macro_export]
#[doc(hidden)]
macro_rules! arclight_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::ARCLIGHT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::ARCLIGHT_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! arclight_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::ARCLIGHT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::ARCLIGHT_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! arclight_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::ARCLIGHT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::ARCLIGHT_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! arclight_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::ARCLIGHT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::ARCLIGHT_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! arclight_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::ARCLIGHT_ASSERT_LEVEL_DEFINITION >= $crate::asserts::ARCLIGHT_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}
