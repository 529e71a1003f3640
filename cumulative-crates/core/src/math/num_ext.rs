//! Rounding divisions used by the energy-based rules.

pub(crate) trait NumExt {
    /// Division with rounding up.
    fn div_ceil(self, other: Self) -> Self;

    /// Division with rounding down.
    ///
    /// Note this is different from truncating, which is rounding toward zero.
    fn div_floor(self, other: Self) -> Self;
}

macro_rules! impl_num_ext {
    ($($int:ty),+) => {
        $(
            impl NumExt for $int {
                fn div_ceil(self, other: Self) -> Self {
                    let d = self / other;
                    let r = self % other;
                    if (r > 0 && other > 0) || (r < 0 && other < 0) {
                        d + 1
                    } else {
                        d
                    }
                }

                fn div_floor(self, other: Self) -> Self {
                    let d = self / other;
                    let r = self % other;
                    if (r > 0 && other < 0) || (r < 0 && other > 0) {
                        d - 1
                    } else {
                        d
                    }
                }
            }
        )+
    };
}

impl_num_ext!(i32, i64);
