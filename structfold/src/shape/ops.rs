//! Typed bridges that let the executor re-enter concrete container APIs.
//!
//! Plans traverse values through raw `*mut u8` locations, but pointers,
//! sequences, and maps cannot be driven by offsets alone: their payloads
//! live behind their own APIs. Each bridge here is a set of function
//! pointers monomorphized while the concrete type is still known, so the
//! executor can call back into `Option`, `Vec`, and the map types without
//! re-discovering what it is looking at.

use std::collections::{btree_map, hash_map, BTreeMap, HashMap};
use std::hash::Hash;
use std::mem;
use std::ptr;

/// Callback used by [`MapOps::merge_into`] to combine two value slots.
pub type ValueFold<'a> = &'a mut dyn FnMut(*mut u8, *mut u8);

/// Bridge for nullable and owning pointer slots.
#[derive(Clone, Copy, Debug)]
pub struct PtrOps {
    /// Location of the pointee, or null when the slot holds nothing.
    pub target: unsafe fn(*mut u8) -> *mut u8,
    /// Moves the right slot's payload into the empty left slot, leaving
    /// the right slot empty.
    pub take: unsafe fn(*mut u8, *mut u8),
}

impl PtrOps {
    /// Bridge for an `Option<T>` slot.
    #[must_use]
    pub fn option<T>() -> Self {
        Self {
            target: option_target::<T>,
            take: option_take::<T>,
        }
    }

    /// Bridge for a `Box<T>` slot, which is never empty.
    #[must_use]
    pub fn boxed<T>() -> Self {
        Self {
            target: boxed_target::<T>,
            take: boxed_take,
        }
    }
}

unsafe fn option_target<T>(slot: *mut u8) -> *mut u8 {
    match &mut *slot.cast::<Option<T>>() {
        Some(value) => ptr::from_mut(value).cast(),
        None => ptr::null_mut(),
    }
}

unsafe fn option_take<T>(l: *mut u8, r: *mut u8) {
    let right = &mut *r.cast::<Option<T>>();
    *l.cast::<Option<T>>() = right.take();
}

unsafe fn boxed_target<T>(slot: *mut u8) -> *mut u8 {
    ptr::from_mut::<T>(&mut **slot.cast::<Box<T>>()).cast()
}

unsafe fn boxed_take(_l: *mut u8, _r: *mut u8) {
    unreachable!("a boxed pointer slot is never empty");
}

/// Bridge for dynamic sequence headers.
#[derive(Clone, Copy, Debug)]
pub struct SeqOps {
    /// Element count of the sequence at the slot.
    pub len: unsafe fn(*const u8) -> usize,
    /// Location of the first element.
    pub data: unsafe fn(*mut u8) -> *mut u8,
    /// Swaps the two sequence headers in place.
    pub swap: unsafe fn(*mut u8, *mut u8),
}

impl SeqOps {
    /// Bridge for a `Vec<T>` slot.
    #[must_use]
    pub fn vec<T>() -> Self {
        Self {
            len: vec_len::<T>,
            data: vec_data::<T>,
            swap: vec_swap::<T>,
        }
    }
}

unsafe fn vec_len<T>(slot: *const u8) -> usize {
    (*slot.cast::<Vec<T>>()).len()
}

unsafe fn vec_data<T>(slot: *mut u8) -> *mut u8 {
    (*slot.cast::<Vec<T>>()).as_mut_ptr().cast()
}

unsafe fn vec_swap<T>(l: *mut u8, r: *mut u8) {
    mem::swap(&mut *l.cast::<Vec<T>>(), &mut *r.cast::<Vec<T>>());
}

/// Bridge for keyed maps.
#[derive(Clone, Copy, Debug)]
pub struct MapOps {
    /// Drains the right map into the left: entries whose key is absent on
    /// the left move across whole; colliding keys invoke `fold` on the
    /// two value slots, left first.
    pub merge_into: unsafe fn(*mut u8, *mut u8, ValueFold<'_>),
}

impl MapOps {
    /// Bridge for a `HashMap<K, V>` slot.
    #[must_use]
    pub fn hash<K: Eq + Hash, V>() -> Self {
        Self {
            merge_into: hash_merge_into::<K, V>,
        }
    }

    /// Bridge for a `BTreeMap<K, V>` slot.
    #[must_use]
    pub fn btree<K: Ord, V>() -> Self {
        Self {
            merge_into: btree_merge_into::<K, V>,
        }
    }
}

unsafe fn hash_merge_into<K: Eq + Hash, V>(l: *mut u8, r: *mut u8, fold: ValueFold<'_>) {
    let left = &mut *l.cast::<HashMap<K, V>>();
    let right = &mut *r.cast::<HashMap<K, V>>();
    for (key, mut incoming) in right.drain() {
        match left.entry(key) {
            hash_map::Entry::Occupied(mut slot) => {
                fold(
                    ptr::from_mut(slot.get_mut()).cast(),
                    ptr::from_mut(&mut incoming).cast(),
                );
            }
            hash_map::Entry::Vacant(slot) => {
                slot.insert(incoming);
            }
        }
    }
}

unsafe fn btree_merge_into<K: Ord, V>(l: *mut u8, r: *mut u8, fold: ValueFold<'_>) {
    let left = &mut *l.cast::<BTreeMap<K, V>>();
    let right = &mut *r.cast::<BTreeMap<K, V>>();
    for (key, mut incoming) in mem::take(right) {
        match left.entry(key) {
            btree_map::Entry::Occupied(mut slot) => {
                fold(
                    ptr::from_mut(slot.get_mut()).cast(),
                    ptr::from_mut(&mut incoming).cast(),
                );
            }
            btree_map::Entry::Vacant(slot) => {
                slot.insert(incoming);
            }
        }
    }
}
