//! Insertion-ordered bag of heterogeneous values keyed by one key type.
//!
//! Entries are stored as dynamic fields under their key and linked into a
//! doubly linked list through `prev`/`next`, so insertion and removal at any
//! position touch only the entry and its two neighbours.

use crate::error::{LedgerError, Result};
use crate::object::{TxContext, Uid};
use alloc::boxed::Box;
use bytemuck::Pod;
use core::any::Any;
use solana_program::{msg, pubkey::Pubkey};

#[derive(Debug)]
pub struct LinkedBag<K: Pod> {
    id: Uid,
    size: u64,
    head: Option<K>,
    tail: Option<K>,
}

struct Entry<K> {
    prev: Option<K>,
    next: Option<K>,
    value: Box<dyn Any>,
}

impl<K: Pod> LinkedBag<K> {
    pub fn new(ctx: &mut TxContext) -> Self {
        Self { id: Uid::new(ctx), size: 0, head: None, tail: None }
    }

    pub fn id(&self) -> &Pubkey {
        self.id.id()
    }

    pub fn uid(&self) -> &Uid {
        &self.id
    }

    pub fn length(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn front(&self) -> Option<K> {
        self.head
    }

    pub fn back(&self) -> Option<K> {
        self.tail
    }

    fn entry(&self, k: K) -> Result<&Entry<K>> {
        self.id.borrow::<K, Entry<K>>(k)
    }

    fn entry_mut(&mut self, k: K) -> Result<&mut Entry<K>> {
        self.id.borrow_mut::<K, Entry<K>>(k)
    }

    #[inline]
    fn audit(&self, _op: &str, _start: u64) {
        #[cfg(feature = "cu-audit")]
        msg!("linked_bag::{} accesses={}", _op, self.id.access_count() - _start);
    }

    pub fn push_front<V: Any>(&mut self, k: K, v: V) -> Result<()> {
        if self.id.exists(k) {
            return Err(LedgerError::DuplicateKey);
        }
        let start = self.id.access_count();
        let next = self.head;
        if let Some(old_head) = next {
            self.entry_mut(old_head)?.prev = Some(k);
        }
        self.id.add(k, Entry { prev: None, next, value: Box::new(v) })?;
        self.head = Some(k);
        if self.tail.is_none() {
            self.tail = Some(k);
        }
        self.size += 1;
        self.audit("push_front", start);
        Ok(())
    }

    pub fn push_back<V: Any>(&mut self, k: K, v: V) -> Result<()> {
        if self.id.exists(k) {
            return Err(LedgerError::DuplicateKey);
        }
        let start = self.id.access_count();
        let prev = self.tail;
        if let Some(old_tail) = prev {
            self.entry_mut(old_tail)?.next = Some(k);
        }
        self.id.add(k, Entry { prev, next: None, value: Box::new(v) })?;
        self.tail = Some(k);
        if self.head.is_none() {
            self.head = Some(k);
        }
        self.size += 1;
        self.audit("push_back", start);
        Ok(())
    }

    pub fn borrow<V: Any>(&self, k: K) -> Result<&V> {
        self.entry(k)?.value.downcast_ref::<V>().ok_or(LedgerError::TypeMismatch)
    }

    pub fn borrow_mut<V: Any>(&mut self, k: K) -> Result<&mut V> {
        self.entry_mut(k)?.value.downcast_mut::<V>().ok_or(LedgerError::TypeMismatch)
    }

    pub fn prev(&self, k: K) -> Result<Option<K>> {
        Ok(self.entry(k)?.prev)
    }

    pub fn next(&self, k: K) -> Result<Option<K>> {
        Ok(self.entry(k)?.next)
    }

    // Detaches `k` and splices its neighbours together: one access for the
    // entry and one per neighbour. On a type mismatch the entry is put back.
    fn unlink<V: Any>(&mut self, k: K) -> Result<V> {
        let entry = self.id.remove::<K, Entry<K>>(k)?;
        if !entry.value.is::<V>() {
            self.id.add(k, entry)?;
            return Err(LedgerError::TypeMismatch);
        }
        let Entry { prev, next, value } = entry;
        match prev {
            Some(p) => self.entry_mut(p)?.next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.entry_mut(n)?.prev = prev,
            None => self.tail = prev,
        }
        self.size -= 1;
        value.downcast::<V>().map(|b| *b).map_err(|_| LedgerError::TypeMismatch)
    }

    /// Unlinks `k` and returns its value.
    pub fn remove<V: Any>(&mut self, k: K) -> Result<V> {
        let start = self.id.access_count();
        let v = self.unlink(k)?;
        self.audit("remove", start);
        Ok(v)
    }

    pub fn pop_front<V: Any>(&mut self) -> Result<(K, V)> {
        let k = self.head.ok_or(LedgerError::EmptyContainer)?;
        let start = self.id.access_count();
        let v = self.unlink(k)?;
        self.audit("pop_front", start);
        Ok((k, v))
    }

    pub fn pop_back<V: Any>(&mut self) -> Result<(K, V)> {
        let k = self.tail.ok_or(LedgerError::EmptyContainer)?;
        let start = self.id.access_count();
        let v = self.unlink(k)?;
        self.audit("pop_back", start);
        Ok((k, v))
    }

    pub fn contains(&self, k: K) -> bool {
        self.id.exists(k)
    }

    pub fn contains_with_type<V: Any>(&self, k: K) -> bool {
        self.id.borrow::<K, Entry<K>>(k).map_or(false, |e| e.value.is::<V>())
    }

    /// Keys from front to back.
    pub fn keys(&self) -> Keys<'_, K> {
        Keys { bag: self, cursor: self.head }
    }

    pub fn destroy_empty(self) -> Result<()> {
        if self.size != 0 {
            msg!("linked_bag: destroy_empty with {} entries", self.size);
            return Err(LedgerError::NotEmpty);
        }
        self.id.delete();
        Ok(())
    }
}

/// Forward traversal over the links; one access per key.
pub struct Keys<'a, K: Pod> {
    bag: &'a LinkedBag<K>,
    cursor: Option<K>,
}

impl<K: Pod> Iterator for Keys<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        let k = self.cursor?;
        self.cursor = self.bag.next(k).ok().flatten();
        Some(k)
    }
}
