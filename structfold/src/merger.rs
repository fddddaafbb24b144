//! Executor generation and invocation.

use std::any::Any;
use std::marker::PhantomData;
use std::ptr;

use crate::error::{MergeError, MergeResult};
use crate::plan::generate::Generator;
use crate::plan::{NodeId, Plan};
use crate::shape::Kind;
use crate::skip;
use crate::Mergeable;

/// Builder for merge executors.
///
/// Options are folded into a fresh configuration, consumed once by
/// [`build`](Self::build), and never consulted again at merge time.
///
/// # Examples
///
/// ```rust
/// use structfold::{Mergeable, MergerBuilder};
///
/// #[derive(Default, Mergeable)]
/// struct Totals {
///     visible: u64,
///     hidden: u64,
/// }
///
/// # fn main() -> structfold::MergeResult<()> {
/// let merge = MergerBuilder::new().skip_field("hidden").build::<Totals>()?;
/// let mut left = Totals { visible: 1, hidden: 1 };
/// let mut right = Totals { visible: 2, hidden: 2 };
/// merge.merge(&mut left, &mut right);
/// assert_eq!((left.visible, left.hidden), (3, 1));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct MergerBuilder {
    skips: Vec<String>,
    merge_maps: bool,
}

impl MergerBuilder {
    /// Creates a builder with no skips and map merging disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Excludes the field named by `path` from merging.
    ///
    /// A path is a `>`-separated chain of field names descending from
    /// the root aggregate, such as `foo>bar>baz`. Every configured path
    /// must match a field or generation fails.
    #[must_use]
    pub fn skip_field(mut self, path: impl Into<String>) -> Self {
        self.skips.push(path.into());
        self
    }

    /// Excludes several fields at once; equivalent to repeated
    /// [`skip_field`](Self::skip_field) calls.
    #[must_use]
    pub fn skip_fields<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skips.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Enables merging of map fields.
    ///
    /// Maps are merged by keyed union through the map's own lookup and
    /// insert, which is slower than the offset-driven traversal used
    /// everywhere else, so it is opt-in.
    #[must_use]
    pub fn merge_maps(mut self) -> Self {
        self.merge_maps = true;
        self
    }

    /// Generates a merge executor for `T`.
    ///
    /// # Errors
    ///
    /// Returns a [`MergeError`] when `T` is itself a pointer, contains an
    /// unmergeable kind that no skip prunes, contains a map without
    /// [`merge_maps`](Self::merge_maps), or when a configured skip path
    /// is invalid or goes unconsumed.
    pub fn build<T: Mergeable>(self) -> MergeResult<Merger<T>> {
        let shape = T::shape();
        if matches!(shape.kind(), Kind::Pointer { .. }) {
            return Err(MergeError::PointerRoot {
                type_name: shape.name(),
            });
        }

        let skips = skip::parse(&self.skips)?;
        let mut generator = Generator::new(self.merge_maps);
        let root = generator.generate(shape, skips)?;

        Ok(Merger {
            plan: generator.finish(),
            root,
            _root_type: PhantomData,
        })
    }

    /// Generates a merge executor for `T`, panicking on failure.
    ///
    /// # Panics
    ///
    /// Panics when [`build`](Self::build) would return an error.
    #[must_use]
    pub fn must_build<T: Mergeable>(self) -> Merger<T> {
        match self.build() {
            Ok(merger) => merger,
            Err(err) => panic!("failed to generate merge executor: {err}"),
        }
    }
}

/// Generates a merge executor for `T` with default options.
///
/// # Errors
///
/// Returns a [`MergeError`] under the same conditions as
/// [`MergerBuilder::build`].
pub fn merger<T: Mergeable>() -> MergeResult<Merger<T>> {
    MergerBuilder::new().build()
}

/// A generated merge executor for values of `T`.
///
/// The executor closes over an immutable plan and may be invoked any
/// number of times, including concurrently against disjoint pairs of
/// values. Merging folds the right value into the left; the right value
/// may be partially donated in the process (pointer payloads move,
/// longer sequence storage is swapped in, map entries drain), so reusing
/// it afterwards is not meaningful.
#[derive(Debug)]
pub struct Merger<T> {
    plan: Plan,
    root: Option<NodeId>,
    _root_type: PhantomData<fn(T)>,
}

impl<T: Mergeable> Merger<T> {
    /// Merges `r` into `l` field by field.
    pub fn merge(&self, l: &mut T, r: &mut T) {
        if let Some(root) = self.root {
            // SAFETY: the plan was generated from `T`'s own shape, and
            // `&mut` guarantees two distinct, valid, aligned values.
            unsafe {
                self.plan
                    .run(root, ptr::from_mut(l).cast(), ptr::from_mut(r).cast());
            }
        }
    }

    /// Dynamically-typed variant of [`merge`](Self::merge).
    ///
    /// This is the surface for callers holding type-erased values; the
    /// type-identity guard established at generation is enforced here at
    /// call time. An all-pruned executor still performs the guard.
    ///
    /// # Panics
    ///
    /// Panics when either argument is not a `T`.
    pub fn merge_dyn(&self, l: &mut dyn Any, r: &mut dyn Any) {
        let Some(l) = l.downcast_mut::<T>() else {
            panic!("merge executor invoked with a type it was not generated for");
        };
        let Some(r) = r.downcast_mut::<T>() else {
            panic!("merge executor invoked with a type it was not generated for");
        };
        self.merge(l, r);
    }
}
