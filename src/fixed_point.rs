//! Unsigned Q64.64 fixed-point numbers.
//!
//! An `FP64` is a u128 word read as `bits / 2^64`. There is no sign: every
//! value is a non-negative ratio, and subtraction below zero is an error.
//! Multiplication and division go through a `U256` intermediate and truncate
//! toward zero, so results are bit-exact across platforms.

use crate::constants::{FP64_FRAC_MASK, FP64_HALF, FP64_ONE};
use crate::error::{LedgerError, Result};
use crate::math;
use crate::u256::U256;
use bytemuck::{Pod, Zeroable};

#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
pub struct FP64 {
    bits: u128,
}

#[allow(clippy::should_implement_trait)]
impl FP64 {
    pub const ZERO: Self = Self { bits: 0 };
    pub const ONE: Self = Self { bits: FP64_ONE };

    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    #[inline]
    pub const fn from_bits(bits: u128) -> Self {
        Self { bits }
    }

    /// `x` as a whole number.
    #[inline]
    pub const fn from_int(x: u64) -> Self {
        Self { bits: (x as u128) << 64 }
    }

    /// `x / y`, truncated.
    pub fn frac(x: u64, y: u64) -> Result<Self> {
        if y == 0 {
            return Err(LedgerError::DivideByZero);
        }
        Ok(Self { bits: ((x as u128) << 64) / (y as u128) })
    }

    /// Widens a Q32.32 word.
    #[inline]
    pub const fn from_fp32(bits: u64) -> Self {
        Self { bits: (bits as u128) << 32 }
    }

    #[inline]
    pub const fn bits(self) -> u128 {
        self.bits
    }

    /// Middle 64 bits, i.e. the value as Q32.32 (truncated at both ends).
    #[inline]
    pub const fn center(self) -> u64 {
        (self.bits >> 32) as u64
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.bits == 0
    }

    pub fn add(self, other: Self) -> Result<Self> {
        let bits = self.bits.checked_add(other.bits).ok_or(LedgerError::Overflow)?;
        Ok(Self { bits })
    }

    pub fn sub(self, other: Self) -> Result<Self> {
        let bits = self.bits.checked_sub(other.bits).ok_or(LedgerError::Underflow)?;
        Ok(Self { bits })
    }

    /// `floor(x * y / 2^64)`.
    pub fn mul(self, other: Self) -> Result<Self> {
        let product = U256::widening_mul(self.bits, other.bits) >> 64u32;
        Ok(Self { bits: product.narrow_u128()? })
    }

    /// `floor(x * 2^64 / y)`.
    pub fn div(self, other: Self) -> Result<Self> {
        if other.bits == 0 {
            return Err(LedgerError::DivideByZero);
        }
        let num = U256::from(self.bits) << 64u32;
        let quot = num.checked_div(U256::from(other.bits)).ok_or(LedgerError::DivideByZero)?;
        Ok(Self { bits: quot.narrow_u128()? })
    }

    /// `|x - y|`.
    #[inline]
    pub fn diff(self, other: Self) -> Self {
        Self { bits: math::diff(self.bits, other.bits) }
    }

    /// `floor(x * self)` for an integer amount `x`.
    pub fn mul_u64(self, x: u64) -> Result<u64> {
        let product = U256::widening_mul(x as u128, self.bits) >> 64u32;
        product.narrow_u64()
    }

    /// `ceil(x * self)` for an integer amount `x`.
    pub fn mul_u64_up(self, x: u64) -> Result<u64> {
        let product = U256::widening_mul(x as u128, self.bits);
        let mut whole = product >> 64u32;
        if product.low_u64() != 0 {
            whole = whole.checked_add(U256::one()).ok_or(LedgerError::Overflow)?;
        }
        whole.narrow_u64()
    }

    /// `floor(x / self)` for an integer amount `x`.
    pub fn div_u64(self, x: u64) -> Result<u64> {
        if self.bits == 0 {
            return Err(LedgerError::DivideByZero);
        }
        let num = U256::from((x as u128) << 64);
        let quot = num.checked_div(U256::from(self.bits)).ok_or(LedgerError::DivideByZero)?;
        quot.narrow_u64()
    }

    /// `ceil(x / self)` for an integer amount `x`.
    pub fn div_u64_up(self, x: u64) -> Result<u64> {
        if self.bits == 0 {
            return Err(LedgerError::DivideByZero);
        }
        let num = U256::from((x as u128) << 64);
        let (mut quot, rem) = num.div_mod(U256::from(self.bits));
        if !rem.is_zero() {
            quot = quot.checked_add(U256::one()).ok_or(LedgerError::Overflow)?;
        }
        quot.narrow_u64()
    }

    /// `floor(sqrt(x))` in Q64.64, from the integer root of `bits << 64`.
    pub fn sqrt(self) -> Self {
        let root = math::sqrt(U256::from(self.bits) << 64u32);
        // sqrt(2^192) = 2^96, so the root always fits.
        Self { bits: root.low_u128() }
    }

    /// Integer part.
    #[inline]
    pub const fn floor(self) -> u64 {
        (self.bits >> 64) as u64
    }

    /// Integer part, plus one if any fractional bit is set.
    pub fn ceil(self) -> Result<u64> {
        let whole = self.floor();
        if self.bits & FP64_FRAC_MASK == 0 {
            return Ok(whole);
        }
        whole.checked_add(1).ok_or(LedgerError::Overflow)
    }

    /// Nearest integer; ties round up.
    pub fn round(self) -> Result<u64> {
        let whole = self.floor();
        if (self.bits & FP64_FRAC_MASK) < FP64_HALF as u128 {
            return Ok(whole);
        }
        whole.checked_add(1).ok_or(LedgerError::Overflow)
    }

    #[inline]
    pub fn eq(self, other: Self) -> bool {
        self.bits == other.bits
    }

    #[inline]
    pub fn lt(self, other: Self) -> bool {
        self.bits < other.bits
    }

    #[inline]
    pub fn lte(self, other: Self) -> bool {
        self.bits <= other.bits
    }

    #[inline]
    pub fn gt(self, other: Self) -> bool {
        self.bits > other.bits
    }

    #[inline]
    pub fn gte(self, other: Self) -> bool {
        self.bits >= other.bits
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }
}

impl core::fmt::Display for FP64 {
    /// Integer part and nine truncated decimal digits.
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let frac = self.bits & FP64_FRAC_MASK;
        // frac < 2^64 and 10^9 < 2^30: the product fits in u128.
        let decimals = (frac * 1_000_000_000) >> 64;
        write!(f, "{}.{:09}", self.floor(), decimals)
    }
}
