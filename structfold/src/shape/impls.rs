//! [`Mergeable`] implementations for the built-in kinds.
//!
//! Primitives, pointers, arrays, sequences, and maps make up the closed
//! mergeable set. The deliberately unmergeable kinds (strings, raw
//! pointers, channels, callables, opaque handles) also carry shapes so
//! they can sit inside aggregates and be pruned by skip paths; reaching
//! one without a skip fails generation with a kind-specific diagnostic.

use std::any::{type_name, Any};
use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;
use std::sync::mpsc;

use num_complex::Complex;

use super::{intern, MapOps, Prim, PtrOps, SeqOps, Shape};
use crate::Mergeable;

macro_rules! prim_mergeable {
    ($($ty:ty => $prim:ident),* $(,)?) => {
        $(impl Mergeable for $ty {
            fn shape() -> &'static Shape {
                intern::<$ty>(|| Shape::prim::<$ty>(stringify!($ty), Prim::$prim))
            }
        })*
    };
}

prim_mergeable! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    i128 => I128,
    isize => Isize,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    usize => Usize,
    f32 => F32,
    f64 => F64,
}

impl Mergeable for Complex<f32> {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::prim::<Self>("Complex<f32>", Prim::C32))
    }
}

impl Mergeable for Complex<f64> {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::prim::<Self>("Complex<f64>", Prim::C64))
    }
}

impl<T: Mergeable> Mergeable for Option<T> {
    fn shape() -> &'static Shape {
        intern::<Self>(|| {
            Shape::pointer::<Self>(type_name::<Self>(), T::shape, PtrOps::option::<T>())
        })
    }
}

impl<T: Mergeable> Mergeable for Box<T> {
    fn shape() -> &'static Shape {
        intern::<Self>(|| {
            Shape::pointer::<Self>(type_name::<Self>(), T::shape, PtrOps::boxed::<T>())
        })
    }
}

impl<T: Mergeable, const N: usize> Mergeable for [T; N] {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::array::<Self>(type_name::<Self>(), T::shape, N))
    }
}

impl<T: Mergeable> Mergeable for Vec<T> {
    fn shape() -> &'static Shape {
        intern::<Self>(|| {
            Shape::sequence::<Self>(type_name::<Self>(), T::shape, SeqOps::vec::<T>())
        })
    }
}

impl<K, V> Mergeable for HashMap<K, V>
where
    K: Eq + Hash + 'static,
    V: Mergeable,
{
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::map::<Self>(type_name::<Self>(), V::shape, MapOps::hash::<K, V>()))
    }
}

impl<K, V> Mergeable for BTreeMap<K, V>
where
    K: Ord + 'static,
    V: Mergeable,
{
    fn shape() -> &'static Shape {
        intern::<Self>(|| {
            Shape::map::<Self>(type_name::<Self>(), V::shape, MapOps::btree::<K, V>())
        })
    }
}

impl Mergeable for String {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::unsupported::<Self>("String", "string"))
    }
}

impl Mergeable for &'static str {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::unsupported::<Self>("&str", "string"))
    }
}

impl<T: 'static> Mergeable for *const T {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::unsupported::<Self>(type_name::<Self>(), "raw pointer"))
    }
}

impl<T: 'static> Mergeable for *mut T {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::unsupported::<Self>(type_name::<Self>(), "raw pointer"))
    }
}

impl<T: 'static> Mergeable for mpsc::Sender<T> {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::unsupported::<Self>(type_name::<Self>(), "channel"))
    }
}

impl<T: 'static> Mergeable for mpsc::Receiver<T> {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::unsupported::<Self>(type_name::<Self>(), "channel"))
    }
}

impl Mergeable for Box<dyn Any> {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::unsupported::<Self>(type_name::<Self>(), "opaque handle"))
    }
}

impl Mergeable for Box<dyn Any + Send> {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::unsupported::<Self>(type_name::<Self>(), "opaque handle"))
    }
}

impl Mergeable for Box<dyn Any + Send + Sync> {
    fn shape() -> &'static Shape {
        intern::<Self>(|| Shape::unsupported::<Self>(type_name::<Self>(), "opaque handle"))
    }
}

macro_rules! callable_mergeable {
    ($(($($arg:ident),*)),* $(,)?) => {
        $(impl<R: 'static $(, $arg: 'static)*> Mergeable for fn($($arg),*) -> R {
            fn shape() -> &'static Shape {
                intern::<Self>(|| Shape::unsupported::<Self>(type_name::<Self>(), "function"))
            }
        })*
    };
}

callable_mergeable! {
    (),
    (A),
    (A, B),
    (A, B, C),
}
