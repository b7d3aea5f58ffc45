// ============================================================================
// I64 - sign-magnitude signed integer in one u64 word
// ============================================================================
//
// Bit 63 is the sign flag, bits 0..63 the magnitude. Zero is always stored
// with a clear sign bit. Arithmetic that would produce a magnitude of 2^63 or
// more fails with Overflow instead of wrapping.

use crate::constants::{MAGNITUDE_MASK, SIGN_BIT};
use crate::error::{LedgerError, Result};
use bytemuck::{Pod, Zeroable};
use core::cmp::Ordering;

#[repr(transparent)]
#[derive(Clone, Copy, Default, Pod, Zeroable)]
pub struct I64 {
    bits: u64,
}

#[allow(clippy::should_implement_trait)]
impl I64 {
    pub const ZERO: Self = Self { bits: 0 };

    /// Wraps a non-negative magnitude. Fails if `x >= 2^63 - 1`.
    #[inline]
    pub fn new(x: u64) -> Result<Self> {
        if x >= MAGNITUDE_MASK {
            return Err(LedgerError::Overflow);
        }
        Ok(Self { bits: x })
    }

    #[inline]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Reinterprets a raw word. A negative zero is normalized.
    #[inline]
    pub const fn from_bits(bits: u64) -> Self {
        if bits & MAGNITUDE_MASK == 0 {
            Self::ZERO
        } else {
            Self { bits }
        }
    }

    #[inline]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    // Sign and magnitude must already be in range; zero drops the sign.
    #[inline]
    const fn pack(negative: bool, magnitude: u64) -> Self {
        if magnitude == 0 || !negative {
            Self { bits: magnitude }
        } else {
            Self { bits: magnitude | SIGN_BIT }
        }
    }

    /// `(is_non_negative, magnitude)`.
    #[inline]
    pub const fn split(self) -> (bool, u64) {
        (self.bits & SIGN_BIT == 0, self.bits & MAGNITUDE_MASK)
    }

    #[inline]
    pub const fn is_neg(self) -> bool {
        self.bits & SIGN_BIT != 0
    }

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.bits & MAGNITUDE_MASK == 0
    }

    /// Native value; exact because magnitudes never exceed `2^63 - 1`.
    #[inline]
    pub const fn as_i64(self) -> i64 {
        let magnitude = (self.bits & MAGNITUDE_MASK) as i64;
        if self.is_neg() {
            -magnitude
        } else {
            magnitude
        }
    }

    /// `max(0, x)` as a magnitude.
    #[inline]
    pub const fn plus(self) -> u64 {
        if self.is_neg() {
            0
        } else {
            self.bits
        }
    }

    /// `max(0, -x)` as a magnitude.
    #[inline]
    pub const fn minus(self) -> u64 {
        if self.is_neg() {
            self.bits & MAGNITUDE_MASK
        } else {
            0
        }
    }

    #[inline]
    pub const fn neg(self) -> Self {
        if self.is_zero() {
            self
        } else {
            Self { bits: self.bits ^ SIGN_BIT }
        }
    }

    /// `-|x|`.
    #[inline]
    pub const fn force(self) -> Self {
        Self::pack(true, self.bits & MAGNITUDE_MASK)
    }

    /// `|x|`.
    #[inline]
    pub const fn abs(self) -> u64 {
        self.bits & MAGNITUDE_MASK
    }

    #[inline]
    pub fn eq(self, other: Self) -> bool {
        self == other
    }

    #[inline]
    pub fn lt(self, other: Self) -> bool {
        self < other
    }

    #[inline]
    pub fn lte(self, other: Self) -> bool {
        self <= other
    }

    #[inline]
    pub fn gt(self, other: Self) -> bool {
        self > other
    }

    #[inline]
    pub fn gte(self, other: Self) -> bool {
        self >= other
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Ord::min(self, other)
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Ord::max(self, other)
    }

    pub fn add(self, other: Self) -> Result<Self> {
        let (x_pos, x_mag) = self.split();
        let (y_pos, y_mag) = other.split();
        if x_pos == y_pos {
            // Both magnitudes are below 2^63, so the u64 sum cannot wrap.
            let sum = x_mag + y_mag;
            if sum & SIGN_BIT != 0 {
                return Err(LedgerError::Overflow);
            }
            return Ok(Self::pack(!x_pos, sum));
        }
        if x_mag >= y_mag {
            Ok(Self::pack(!x_pos, x_mag - y_mag))
        } else {
            Ok(Self::pack(!y_pos, y_mag - x_mag))
        }
    }

    pub fn sub(self, other: Self) -> Result<Self> {
        self.add(other.neg())
    }

    pub fn mul(self, other: Self) -> Result<Self> {
        let (x_pos, x_mag) = self.split();
        let (y_pos, y_mag) = other.split();
        if x_mag == 0 || y_mag == 0 {
            return Ok(Self::ZERO);
        }
        let product = (x_mag as u128) * (y_mag as u128);
        if product >= SIGN_BIT as u128 {
            return Err(LedgerError::Overflow);
        }
        Ok(Self::pack(x_pos != y_pos, product as u64))
    }

    /// Truncating division of magnitudes.
    pub fn div(self, other: Self) -> Result<Self> {
        let (x_pos, x_mag) = self.split();
        let (y_pos, y_mag) = other.split();
        if y_mag == 0 {
            return Err(LedgerError::DivideByZero);
        }
        Ok(Self::pack(x_pos != y_pos, x_mag / y_mag))
    }

    /// `|x - y|`.
    pub fn diff(self, other: Self) -> Result<u64> {
        Ok(self.sub(other)?.abs())
    }

    /// `x^y`; negative only for a negative base and an odd exponent.
    pub fn pow(self, exp: u8) -> Result<Self> {
        let (x_pos, x_mag) = self.split();
        let mut base = x_mag;
        let mut e = exp;
        let mut acc: u64 = 1;
        while e >= 1 {
            if e % 2 == 0 {
                base = mul_magnitude(base, base)?;
                e /= 2;
            } else {
                acc = mul_magnitude(acc, base)?;
                e -= 1;
            }
        }
        Ok(Self::pack(!x_pos && exp % 2 == 1, acc))
    }
}

// Product of two magnitudes, bounded by the sign bit.
#[inline]
fn mul_magnitude(a: u64, b: u64) -> Result<u64> {
    let product = (a as u128) * (b as u128);
    if product >= SIGN_BIT as u128 {
        return Err(LedgerError::Overflow);
    }
    Ok(product as u64)
}

impl PartialEq for I64 {
    fn eq(&self, other: &Self) -> bool {
        self.as_i64() == other.as_i64()
    }
}

impl Eq for I64 {}

impl PartialOrd for I64 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for I64 {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_i64().cmp(&other.as_i64())
    }
}

impl core::fmt::Debug for I64 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "I64({})", self.as_i64())
    }
}

impl core::fmt::Display for I64 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_i64())
    }
}

impl TryFrom<i64> for I64 {
    type Error = LedgerError;

    fn try_from(val: i64) -> Result<Self> {
        // i64::MIN has no sign-magnitude counterpart.
        if val == i64::MIN {
            return Err(LedgerError::Overflow);
        }
        Ok(Self::pack(val < 0, val.unsigned_abs()))
    }
}

impl From<I64> for i64 {
    fn from(val: I64) -> Self {
        val.as_i64()
    }
}
