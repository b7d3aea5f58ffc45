//! Ledgerprim: deterministic arithmetic and storage-backed containers for on-chain programs.
//!
//! The crate is split in two layers:
//! - Arithmetic: `I64` (sign-magnitude 64-bit integer), `FP64` (unsigned Q64.64
//!   fixed-point) and the shared unsigned helpers in `math`, with `U256` as the
//!   double-width intermediate.
//! - Containers: `BigVector` and `LinkedBag`, which keep their elements in the
//!   dynamic fields of a `Uid` so that every operation touches a bounded number
//!   of stored segments.
//!
//! Every operation is deterministic and side-effect free apart from explicit
//! mutation through `&mut self`. Invalid input never wraps or clamps: it is
//! reported as a `LedgerError`, which maps onto `ProgramError::Custom` so a
//! caller can abort the enclosing transaction.

#![deny(unsafe_code)]

extern crate alloc;

// 1. mod constants
pub mod constants {
    /// Maximum serialized size of one stored segment (the host's max object size).
    pub const MAX_BUCKET_BYTES: u64 = 256_000;

    /// Upper bound on dynamic-field accesses a single container operation performs.
    pub const MAX_FIELD_ACCESSES_PER_OP: u64 = 3;

    /// Sign flag of an `I64` word.
    pub const SIGN_BIT: u64 = 1 << 63;

    /// Magnitude bits of an `I64` word.
    pub const MAGNITUDE_MASK: u64 = SIGN_BIT - 1;

    /// 1.0 in Q64.64.
    pub const FP64_ONE: u128 = 1 << 64;

    /// 0.5 in Q64.64; rounding threshold for the fractional part.
    pub const FP64_HALF: u64 = 1 << 63;

    /// Fractional bits of an `FP64` word.
    pub const FP64_FRAC_MASK: u128 = (1 << 64) - 1;
}

// 2. mod error
pub mod error {
    use num_derive::FromPrimitive;
    use solana_program::{
        decode_error::DecodeError,
        msg,
        program_error::{PrintProgramError, ProgramError},
    };
    use thiserror::Error;

    /// Errors raised by the arithmetic layer and the containers.
    ///
    /// Codes are stable: they are the `ProgramError::Custom` payload.
    #[derive(Clone, Copy, Debug, Eq, Error, FromPrimitive, PartialEq)]
    pub enum LedgerError {
        /// Result exceeds the representable range
        #[error("Arithmetic overflow")]
        Overflow,
        /// Division with a zero divisor
        #[error("Division by zero")]
        DivideByZero,
        /// Unsigned subtraction below zero
        #[error("Arithmetic underflow")]
        Underflow,
        /// No dynamic field or entry under the key
        #[error("Key not found")]
        KeyNotFound,
        /// A dynamic field or entry already exists under the key
        #[error("Duplicate key")]
        DuplicateKey,
        /// Stored value has a different type than requested
        #[error("Stored value type mismatch")]
        TypeMismatch,
        /// Index past the end of the container
        #[error("Index out of bounds")]
        IndexOutOfBounds,
        /// Bulk input larger than a segment, or an unusable element size
        #[error("Invalid size")]
        InvalidSize,
        /// Container destroyed while still holding elements
        #[error("Container not empty")]
        NotEmpty,
        /// Pop on an empty container
        #[error("Container is empty")]
        EmptyContainer,
    }

    impl From<LedgerError> for ProgramError {
        fn from(e: LedgerError) -> Self {
            ProgramError::Custom(e as u32)
        }
    }

    impl<T> DecodeError<T> for LedgerError {
        fn type_of() -> &'static str {
            "LedgerError"
        }
    }

    impl PrintProgramError for LedgerError {
        fn print<E>(&self)
        where
            E: 'static + std::error::Error + DecodeError<E> + PrintProgramError + num_traits::FromPrimitive,
        {
            msg!("Error: {}", self);
        }
    }

    pub type Result<T> = core::result::Result<T, LedgerError>;
}

// 3. arithmetic
pub mod u256;
pub mod math;
pub mod integer;
pub mod fixed_point;

// 4. storage collaborators and containers
pub mod object;
pub mod big_vector;
pub mod linked_bag;
pub mod vec_map;

pub use big_vector::BigVector;
pub use error::{LedgerError, Result};
pub use fixed_point::FP64;
pub use integer::I64;
pub use linked_bag::LinkedBag;
pub use object::{TxContext, Uid};
pub use u256::U256;
pub use vec_map::VecMap;
