//! A trait for numeric types usable as point elements and distance values.

use core::fmt::{Debug, Display};

/// A trait for types that can be used as point coordinates or distance values.
///
/// There is a blanket implementation for every type that satisfies the
/// trait bounds, so this never needs to be implemented by hand.
pub trait Number:
    PartialEq
    + PartialOrd
    + Copy
    + Display
    + Debug
    + Default
    + Send
    + Sync
    + num_traits::Num
    + num_traits::NumCast
    + num_traits::Bounded
    + num_traits::ToPrimitive
    + num_traits::FromPrimitive
    + std::iter::Sum
{
    /// Returns half of the value.
    fn half(self) -> Self {
        self / (Self::one() + Self::one())
    }
}

impl<T> Number for T where
    T: PartialEq
        + PartialOrd
        + Copy
        + Display
        + Debug
        + Default
        + Send
        + Sync
        + num_traits::Num
        + num_traits::NumCast
        + num_traits::Bounded
        + num_traits::ToPrimitive
        + num_traits::FromPrimitive
        + std::iter::Sum
{
}
