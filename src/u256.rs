// ============================================================================
// U256 - double-width intermediate for 128-bit arithmetic
// ============================================================================
//
// Products of two u128 words and Q64.64 values shifted left by 64 do not fit
// in a u128. U256 carries those intermediates; narrowing back is checked.

use crate::error::{LedgerError, Result as LedgerResult};
use uint::construct_uint;

construct_uint! {
    /// Unsigned 256-bit integer, four little-endian u64 words.
    pub struct U256(4);
}

impl U256 {
    /// Exact product of two u128 words.
    #[inline]
    pub fn widening_mul(a: u128, b: u128) -> Self {
        // (2^128 - 1)^2 < 2^256, so the flag is always clear.
        Self::from(a).overflowing_mul(Self::from(b)).0
    }

    /// Narrows to u128. Fails with `Overflow` above `u128::MAX`.
    #[inline]
    pub fn narrow_u128(self) -> LedgerResult<u128> {
        if self.bits() > 128 {
            return Err(LedgerError::Overflow);
        }
        Ok(self.low_u128())
    }

    /// Narrows to u64. Fails with `Overflow` above `u64::MAX`.
    #[inline]
    pub fn narrow_u64(self) -> LedgerResult<u64> {
        if self.bits() > 64 {
            return Err(LedgerError::Overflow);
        }
        Ok(self.low_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_widening_mul_max() {
        // (2^128 - 1)^2 = 2^256 - 2^129 + 1
        let p = U256::widening_mul(u128::MAX, u128::MAX);
        assert_eq!(p.low_u128(), 1);
        assert_eq!(p >> 128u32, U256::from(u128::MAX - 1));
    }

    #[test]
    fn test_widening_mul_matches_native_when_small() {
        let p = U256::widening_mul(0xFFFF_FFFF_FFFF, 0x1234_5678);
        assert_eq!(p, U256::from(0xFFFF_FFFF_FFFFu128 * 0x1234_5678));
    }

    #[test]
    fn test_narrowing_is_checked() {
        let two_128 = U256::one() << 128u32;
        assert_eq!(two_128.narrow_u128(), Err(LedgerError::Overflow));
        assert_eq!((two_128 - U256::one()).narrow_u128().unwrap(), u128::MAX);
        assert_eq!(U256::from(u64::MAX as u128 + 1).narrow_u64(), Err(LedgerError::Overflow));
        assert_eq!(U256::from(u64::MAX).narrow_u64().unwrap(), u64::MAX);
    }

    #[test]
    fn test_wide_division_round_trips() {
        let n = U256::widening_mul(u128::MAX, 12345);
        let (q, r) = n.div_mod(U256::from(12345u64));
        assert_eq!(q, U256::from(u128::MAX));
        assert!(r.is_zero());
        assert!(U256::one().checked_div(U256::zero()).is_none());
    }
}
