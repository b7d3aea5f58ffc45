//! Chunked dynamic array stored in the dynamic fields of its `Uid`.
//!
//! Elements live in buckets of `bucket_size` elements, keyed by bucket index.
//! Every bucket except the last is full. An operation borrows at most one
//! bucket at a time and touches at most `MAX_FIELD_ACCESSES_PER_OP` of them.

use crate::constants::MAX_BUCKET_BYTES;
use crate::error::{LedgerError, Result};
use crate::object::{TxContext, Uid};
use alloc::{vec, vec::Vec};
use core::marker::PhantomData;
use solana_program::{msg, pubkey::Pubkey};

#[derive(Debug)]
pub struct BigVector<E> {
    id: Uid,
    bucket_size: u64,
    bucket_count: u64,
    length: u64,
    _element: PhantomData<E>,
}

impl<E: 'static> BigVector<E> {
    /// Creates an empty vector for elements of roughly `element_size` bytes.
    ///
    /// `bucket_size = MAX_BUCKET_BYTES / element_size - 1`; the spare slot lets a
    /// bucket hold one extra element while `swap` moves values between buckets.
    pub fn empty(element_size: u64, ctx: &mut TxContext) -> Result<Self> {
        if element_size == 0 {
            return Err(LedgerError::InvalidSize);
        }
        let bucket_size = (MAX_BUCKET_BYTES / element_size).saturating_sub(1);
        if bucket_size == 0 {
            return Err(LedgerError::InvalidSize);
        }
        Ok(Self {
            id: Uid::new(ctx),
            bucket_size,
            bucket_count: 0,
            length: 0,
            _element: PhantomData,
        })
    }

    pub fn singleton(e: E, element_size: u64, ctx: &mut TxContext) -> Result<Self> {
        let mut v = Self::empty(element_size, ctx)?;
        v.id.add(0u64, vec![e])?;
        v.bucket_count = 1;
        v.length = 1;
        Ok(v)
    }

    pub fn id(&self) -> &Pubkey {
        self.id.id()
    }

    pub fn uid(&self) -> &Uid {
        &self.id
    }

    pub fn length(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn bucket_size(&self) -> u64 {
        self.bucket_size
    }

    pub fn bucket_count(&self) -> u64 {
        self.bucket_count
    }

    // Elements held by the last bucket.
    fn tail_len(&self) -> u64 {
        if self.bucket_count == 0 {
            0
        } else {
            self.length - (self.bucket_count - 1) * self.bucket_size
        }
    }

    fn bucket(&self, idx: u64) -> Result<&Vec<E>> {
        self.id.borrow::<u64, Vec<E>>(idx).map_err(|_| LedgerError::IndexOutOfBounds)
    }

    fn bucket_mut(&mut self, idx: u64) -> Result<&mut Vec<E>> {
        self.id.borrow_mut::<u64, Vec<E>>(idx).map_err(|_| LedgerError::IndexOutOfBounds)
    }

    #[inline]
    fn audit(&self, _op: &str, _start: u64) {
        #[cfg(feature = "cu-audit")]
        msg!("big_vector::{} accesses={}", _op, self.id.access_count() - _start);
    }

    pub fn borrow(&self, i: u64) -> Result<&E> {
        if i >= self.length {
            return Err(LedgerError::IndexOutOfBounds);
        }
        let bucket = self.bucket(i / self.bucket_size)?;
        bucket.get((i % self.bucket_size) as usize).ok_or(LedgerError::IndexOutOfBounds)
    }

    pub fn borrow_mut(&mut self, i: u64) -> Result<&mut E> {
        if i >= self.length {
            return Err(LedgerError::IndexOutOfBounds);
        }
        let offset = (i % self.bucket_size) as usize;
        let bucket = self.bucket_mut(i / self.bucket_size)?;
        bucket.get_mut(offset).ok_or(LedgerError::IndexOutOfBounds)
    }

    pub fn push_back(&mut self, e: E) -> Result<()> {
        let start = self.id.access_count();
        if self.length / self.bucket_size == self.bucket_count {
            self.id.add(self.bucket_count, vec![e])?;
            self.bucket_count += 1;
        } else {
            let last = self.bucket_count - 1;
            self.bucket_mut(last)?.push(e);
        }
        self.length += 1;
        self.audit("push_back", start);
        Ok(())
    }

    pub fn pop_back(&mut self) -> Result<E> {
        if self.length == 0 {
            return Err(LedgerError::EmptyContainer);
        }
        let start = self.id.access_count();
        let last = self.bucket_count - 1;
        let e = if self.tail_len() == 1 {
            let mut bucket = self.id.remove::<u64, Vec<E>>(last)?;
            self.bucket_count -= 1;
            bucket.pop()
        } else {
            self.bucket_mut(last)?.pop()
        };
        let e = e.ok_or(LedgerError::EmptyContainer)?;
        self.length -= 1;
        self.audit("pop_back", start);
        Ok(e)
    }

    /// Swaps elements `i` and `j`.
    pub fn swap(&mut self, i: u64, j: u64) -> Result<()> {
        if i >= self.length || j >= self.length {
            return Err(LedgerError::IndexOutOfBounds);
        }
        let start = self.id.access_count();
        let (bi, oi) = (i / self.bucket_size, (i % self.bucket_size) as usize);
        let (bj, oj) = (j / self.bucket_size, (j % self.bucket_size) as usize);
        if bi == bj {
            self.bucket_mut(bi)?.swap(oi, oj);
            self.audit("swap", start);
            return Ok(());
        }

        // Only one bucket is borrowed at a time: move i into bucket j in
        // exchange for j, then put j back at i's slot in bucket i.
        let x = self.bucket_mut(bi)?.swap_remove(oi);
        let y = {
            let bucket_j = self.bucket_mut(bj)?;
            bucket_j.push(x);
            bucket_j.swap_remove(oj)
        };
        let bucket_i = self.bucket_mut(bi)?;
        bucket_i.push(y);
        let last = bucket_i.len() - 1;
        bucket_i.swap(oi, last);
        self.audit("swap", start);
        Ok(())
    }

    /// Appends up to `bucket_size` elements, keeping their order.
    ///
    /// Input that fits the free space of the last bucket (exactly filling it
    /// included) is merged in place; otherwise the overflow becomes a new bucket.
    pub fn append(&mut self, mut v: Vec<E>) -> Result<()> {
        let n = v.len() as u64;
        if n > self.bucket_size {
            msg!("big_vector: append of {} exceeds bucket size {}", n, self.bucket_size);
            return Err(LedgerError::InvalidSize);
        }
        if n == 0 {
            return Ok(());
        }
        let start = self.id.access_count();
        let tail = self.tail_len();
        if self.bucket_count == 0 || tail == self.bucket_size {
            self.id.add(self.bucket_count, v)?;
            self.bucket_count += 1;
        } else {
            let last = self.bucket_count - 1;
            let free = (self.bucket_size - tail) as usize;
            if v.len() > free {
                let spill = v.split_off(free);
                self.id.add(self.bucket_count, spill)?;
                self.bucket_count += 1;
            }
            self.bucket_mut(last)?.append(&mut v);
        }
        self.length += n;
        self.audit("append", start);
        Ok(())
    }

    /// Removes element `i`, moving the last element into its place.
    pub fn swap_remove(&mut self, i: u64) -> Result<E> {
        if i >= self.length {
            return Err(LedgerError::IndexOutOfBounds);
        }
        let start = self.id.access_count();
        let last = self.pop_back()?;
        if i == self.length {
            return Ok(last);
        }
        let slot = self.borrow_mut(i)?;
        let removed = core::mem::replace(slot, last);
        self.audit("swap_remove", start);
        Ok(removed)
    }

    pub fn destroy_empty(self) -> Result<()> {
        if self.length != 0 {
            msg!("big_vector: destroy_empty with {} elements", self.length);
            return Err(LedgerError::NotEmpty);
        }
        self.id.delete();
        Ok(())
    }

    /// Disposes the vector together with any elements still stored.
    pub fn destroy(self) {
        self.id.delete();
    }

    pub fn iter(&self) -> Iter<'_, E> {
        let empty: &[E] = &[];
        Iter { vec: self, bucket: empty.iter(), next_bucket: 0 }
    }
}

/// Front-to-back iterator; loads one bucket at a time.
pub struct Iter<'a, E> {
    vec: &'a BigVector<E>,
    bucket: core::slice::Iter<'a, E>,
    next_bucket: u64,
}

impl<'a, E: 'static> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<&'a E> {
        loop {
            if let Some(e) = self.bucket.next() {
                return Some(e);
            }
            let vec = self.vec;
            if self.next_bucket >= vec.bucket_count {
                return None;
            }
            let bucket = vec.bucket(self.next_bucket).ok()?;
            self.next_bucket += 1;
            self.bucket = bucket.iter();
        }
    }
}
