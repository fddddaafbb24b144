//! Generated field-wise merge functions for user-declared types.
//!
//! If you have ever written a merge function for a struct by hand, only
//! to add fields to the struct later, this crate may benefit you: derive
//! [`Mergeable`] and the [`merger`] entry point generates the merge for
//! whatever the struct currently contains. Numeric fields add, booleans
//! OR, nested structs merge recursively, maps union by key, and
//! sequences zip element-wise with the longer tail retained. Fields can
//! be excluded selectively, at any nesting depth, with `>`-separated
//! skip paths.
//!
//! The per-type traversal cost is paid once, at generation time: the
//! descriptor tree is walked into an immutable plan, and the returned
//! [`Merger`] performs only the arithmetic and pointer chasing the plan
//! prescribes.
//!
//! # Examples
//!
//! ```rust
//! use structfold::{merger, Mergeable};
//!
//! #[derive(Debug, Default, Mergeable, PartialEq)]
//! struct Stats {
//!     hits: u64,
//!     latency_total: f64,
//!     saturated: bool,
//! }
//!
//! # fn main() -> structfold::MergeResult<()> {
//! let merge = merger::<Stats>()?;
//! let mut left = Stats { hits: 3, latency_total: 1.5, saturated: false };
//! let mut right = Stats { hits: 4, latency_total: 0.5, saturated: true };
//! merge.merge(&mut left, &mut right);
//! assert_eq!(left, Stats { hits: 7, latency_total: 2.0, saturated: true });
//! # Ok(())
//! # }
//! ```
//!
//! Some kinds have no sensible merge: strings, raw pointers, channels,
//! callables, and opaque `Box<dyn Any>` handles fail generation unless a
//! skip path prunes them. Map merging goes through the map's own lookup
//! and insert rather than raw offsets, so it is opt-in via
//! [`MergerBuilder::merge_maps`].
//!
//! After a merge the right value may have been partially donated to the
//! left: pointer payloads move across, the longer sequence storage is
//! swapped in, and map entries drain. Treat the right value as spent.

pub use structfold_macros::Mergeable;

mod error;
mod merger;
mod plan;
pub mod shape;
mod skip;

pub use error::{MergeError, MergeResult};
pub use merger::{merger, Merger, MergerBuilder};

/// Types that can describe their structure to the merge generator.
///
/// Implementations are provided for the primitive numeric types, `bool`,
/// complex numbers, `Option<T>`, `Box<T>`, `[T; N]`, `Vec<T>`,
/// `HashMap<K, V>`, and `BTreeMap<K, V>`. Structs with named fields
/// derive it:
///
/// ```rust
/// use structfold::Mergeable;
///
/// #[derive(Mergeable)]
/// struct Sample {
///     count: u32,
///     nested: Option<Box<Sample>>,
/// }
/// ```
pub trait Mergeable: Sized + 'static {
    /// Returns the descriptor the plan generator walks.
    ///
    /// The descriptor must describe `Self`'s actual memory layout:
    /// aggregate field offsets and element strides are trusted by the
    /// executor. The provided implementations and the derive macro
    /// uphold this.
    fn shape() -> &'static shape::Shape;
}
