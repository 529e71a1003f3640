#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const CUMULATIVE_ASSERT_LEVEL_DEFINITION: u8 = CUMULATIVE_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const CUMULATIVE_ASSERT_LEVEL_DEFINITION: u8 = CUMULATIVE_ASSERT_EXTREME;

pub const CUMULATIVE_ASSERT_SIMPLE: u8 = 1;
pub const CUMULATIVE_ASSERT_MODERATE: u8 = 2;
pub const CUMULATIVE_ASSERT_EXTREME: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! cumulative_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::CUMULATIVE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CUMULATIVE_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cumulative_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::CUMULATIVE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CUMULATIVE_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! cumulative_assert_extreme {
    ($($arg:tt)*) => {
        if $crate::asserts::CUMULATIVE_ASSERT_LEVEL_DEFINITION >= $crate::asserts::CUMULATIVE_ASSERT_EXTREME {
            assert!($($arg)*);
        }
    };
}
