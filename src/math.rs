//! Unsigned helpers shared by the fixed-point layer and the callers' balance math.
//!
//! The same functions serve u64, u128 and U256 through the `Uint` trait. Every
//! multiplication is checked: exceeding the width is an `Overflow` error.

use crate::error::{LedgerError, Result};
use crate::u256::U256;
use num_traits::{CheckedMul, One, Zero};
use core::ops::{Add, Div, Shl, Shr, Sub};

/// Fixed-width unsigned integer usable by the helpers in this module.
pub trait Uint:
    Copy
    + Ord
    + Zero
    + One
    + CheckedMul
    + Add<Output = Self>
    + Sub<Output = Self>
    + Div<Output = Self>
    + Shl<u32, Output = Self>
    + Shr<u32, Output = Self>
{
    /// Number of significant bits (0 for zero).
    fn bit_len(self) -> u32;
}

macro_rules! impl_uint {
    ($($t:ty),*) => {
        $(
            impl Uint for $t {
                #[inline]
                fn bit_len(self) -> u32 {
                    <$t>::BITS - self.leading_zeros()
                }
            }
        )*
    };
}

impl_uint!(u8, u16, u32, u64, u128);

impl Zero for U256 {
    fn zero() -> Self {
        U256::zero()
    }

    fn is_zero(&self) -> bool {
        U256::is_zero(self)
    }
}

impl One for U256 {
    fn one() -> Self {
        U256::one()
    }
}

impl CheckedMul for U256 {
    fn checked_mul(&self, v: &Self) -> Option<Self> {
        U256::checked_mul(*self, *v)
    }
}

impl Uint for U256 {
    #[inline]
    fn bit_len(self) -> u32 {
        self.bits() as u32
    }
}

/// `1` for zero, `x` otherwise. Floors collateral amounts at one unit.
#[inline]
pub fn norm<T: Uint>(x: T) -> T {
    if x.is_zero() {
        T::one()
    } else {
        x
    }
}

#[inline]
pub fn min<T: Uint>(x: T, y: T) -> T {
    core::cmp::min(x, y)
}

#[inline]
pub fn max<T: Uint>(x: T, y: T) -> T {
    core::cmp::max(x, y)
}

/// `|x - y|`.
#[inline]
pub fn diff<T: Uint>(x: T, y: T) -> T {
    if x > y {
        x - y
    } else {
        y - x
    }
}

/// `x^y` by repeated squaring. `pow(x, 0) == 1`, including `x == 0`.
pub fn pow<T: Uint>(x: T, y: u8) -> Result<T> {
    let mut base = x;
    let mut exp = y;
    let mut acc = T::one();
    while exp >= 1 {
        if exp % 2 == 0 {
            base = base.checked_mul(&base).ok_or(LedgerError::Overflow)?;
            exp /= 2;
        } else {
            acc = acc.checked_mul(&base).ok_or(LedgerError::Overflow)?;
            exp -= 1;
        }
    }
    Ok(acc)
}

/// `floor(sqrt(x))` by Newton's method.
///
/// The seed `2^ceil(bits/2)` is never below the root, so the iterates decrease
/// monotonically and stop at the floor. Intermediates stay below `2r`, which
/// fits every supported width.
pub fn sqrt<T: Uint>(x: T) -> T {
    if x.is_zero() {
        return x;
    }
    let two = T::one() + T::one();
    let mut r = T::one() << ((x.bit_len() + 1) / 2);
    loop {
        let next = (r + x / r) / two;
        if next >= r {
            return r;
        }
        r = next;
    }
}

/// `floor(x * y / z)` with a 128-bit intermediate.
pub fn scaled(x: u64, y: u64, z: u64) -> Result<u64> {
    if z == 0 {
        return Err(LedgerError::DivideByZero);
    }
    let q = (x as u128) * (y as u128) / (z as u128);
    u64::try_from(q).map_err(|_| LedgerError::Overflow)
}
