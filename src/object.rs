//! Object identity and dynamic fields.
//!
//! `TxContext` hands out fresh object ids; `Uid` is an id together with the
//! keyed values attached to it. Containers own a `Uid` and keep their segments
//! and entries there, addressing them by key instead of holding them inline.
//!
//! Keys are `Pod` values, so their byte encoding is canonical; the key type is
//! part of the field name, so `1u64` and `1u32` name different fields. Values
//! are type-erased, and every read checks the stored type.

use crate::error::{LedgerError, Result};
use bytemuck::Pod;
use core::any::{Any, TypeId};
use core::cell::Cell;
use solana_program::{hash::hashv, pubkey::Pubkey};
use alloc::{boxed::Box, collections::BTreeMap, vec::Vec};

/// Issues deterministic object ids for one transaction.
#[derive(Clone, Debug)]
pub struct TxContext {
    sender: Pubkey,
    digest: [u8; 32],
    ids_created: u64,
}

impl TxContext {
    pub fn new(sender: Pubkey, digest: [u8; 32]) -> Self {
        Self { sender, digest, ids_created: 0 }
    }

    pub fn sender(&self) -> &Pubkey {
        &self.sender
    }

    pub fn ids_created(&self) -> u64 {
        self.ids_created
    }

    /// `sha256(sender || digest || ids_created)`; never repeats within a transaction.
    pub fn fresh_id(&mut self) -> Pubkey {
        let h = hashv(&[&self.sender.to_bytes()[..], &self.digest[..], &self.ids_created.to_le_bytes()[..]]);
        self.ids_created += 1;
        Pubkey::new_from_array(h.to_bytes())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct FieldName {
    key_type: TypeId,
    key: Vec<u8>,
}

impl FieldName {
    fn of<K: Pod>(k: &K) -> Self {
        Self { key_type: TypeId::of::<K>(), key: bytemuck::bytes_of(k).to_vec() }
    }
}

/// An object id and the dynamic fields attached to it.
pub struct Uid {
    id: Pubkey,
    fields: BTreeMap<FieldName, Box<dyn Any>>,
    accesses: Cell<u64>,
}

impl Uid {
    pub fn new(ctx: &mut TxContext) -> Self {
        Self { id: ctx.fresh_id(), fields: BTreeMap::new(), accesses: Cell::new(0) }
    }

    pub fn id(&self) -> &Pubkey {
        &self.id
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Total add/borrow/remove accesses since creation.
    pub fn access_count(&self) -> u64 {
        self.accesses.get()
    }

    #[inline]
    fn touch(&self) {
        self.accesses.set(self.accesses.get() + 1);
    }

    /// Attaches `value` under `key`. Fails if the name is taken.
    pub fn add<K: Pod, V: Any>(&mut self, key: K, value: V) -> Result<()> {
        self.touch();
        let name = FieldName::of(&key);
        if self.fields.contains_key(&name) {
            return Err(LedgerError::DuplicateKey);
        }
        self.fields.insert(name, Box::new(value));
        Ok(())
    }

    pub fn borrow<K: Pod, V: Any>(&self, key: K) -> Result<&V> {
        self.touch();
        let stored = self.fields.get(&FieldName::of(&key)).ok_or(LedgerError::KeyNotFound)?;
        stored.downcast_ref::<V>().ok_or(LedgerError::TypeMismatch)
    }

    pub fn borrow_mut<K: Pod, V: Any>(&mut self, key: K) -> Result<&mut V> {
        self.touch();
        let stored = self.fields.get_mut(&FieldName::of(&key)).ok_or(LedgerError::KeyNotFound)?;
        stored.downcast_mut::<V>().ok_or(LedgerError::TypeMismatch)
    }

    /// Detaches and returns the value. The field is left in place on a type mismatch.
    pub fn remove<K: Pod, V: Any>(&mut self, key: K) -> Result<V> {
        self.touch();
        let name = FieldName::of(&key);
        match self.fields.get(&name) {
            None => return Err(LedgerError::KeyNotFound),
            Some(stored) if !stored.is::<V>() => return Err(LedgerError::TypeMismatch),
            Some(_) => {}
        }
        let stored = self.fields.remove(&name).ok_or(LedgerError::KeyNotFound)?;
        stored.downcast::<V>().map(|b| *b).map_err(|_| LedgerError::TypeMismatch)
    }

    pub fn exists<K: Pod>(&self, key: K) -> bool {
        self.fields.contains_key(&FieldName::of(&key))
    }

    pub fn exists_with_type<K: Pod, V: Any>(&self, key: K) -> bool {
        self.fields.get(&FieldName::of(&key)).map_or(false, |stored| stored.is::<V>())
    }

    /// Deletes the object. Fields still attached are dropped with it.
    pub fn delete(self) {
        #[cfg(feature = "cu-audit")]
        solana_program::msg!("uid {} deleted after {} accesses", self.id, self.access_count());
    }
}

impl core::fmt::Debug for Uid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Uid")
            .field("id", &self.id)
            .field("fields", &self.fields.len())
            .finish()
    }
}
