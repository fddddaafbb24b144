//! Error types produced by merge-plan generation.

use thiserror::Error;

/// Convenience alias for results carrying [`MergeError`].
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors that can occur while generating a merge executor.
///
/// All of these are generation-time failures: once a [`crate::Merger`] has
/// been built, merging itself cannot fail (invoking it with values of the
/// wrong type is a programmer error and panics instead).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum MergeError {
    /// A kind outside the mergeable set was reached without being skipped.
    #[error("unable to merge {kind} values (`{type_name}`)")]
    UnmergeableKind {
        /// Label of the offending kind, such as `string` or `channel`.
        kind: &'static str,
        /// Name of the concrete type that carries the kind.
        type_name: &'static str,
    },

    /// A map type was encountered without map merging enabled.
    #[error(
        "unable to merge maps (`{type_name}`): opt in with `MergerBuilder::merge_maps`"
    )]
    MapsDisabled {
        /// Name of the map type that triggered the failure.
        type_name: &'static str,
    },

    /// A skip path segment did not match any field.
    #[error("skip path `{path}` does not match any field")]
    SkipNotFound {
        /// The offending skip path as originally spelled.
        path: String,
    },

    /// A skip path descends into a kind that has no fields to skip.
    #[error("skip path `{path}` descends into `{type_name}`, which has no fields to skip")]
    SkipKindMismatch {
        /// The offending skip path as originally spelled.
        path: String,
        /// Name of the non-descending type the path ran into.
        type_name: &'static str,
    },

    /// A skip path contains an empty segment (`>>`, or a leading or
    /// trailing `>`).
    #[error("skip path `{path}` contains an empty segment")]
    EmptySkipSegment {
        /// The offending skip path as originally spelled.
        path: String,
    },

    /// The root type is itself a pointer, so merging it through `&mut`
    /// would be a double indirection.
    #[error("merge roots must be singly indirected: `{type_name}` is itself a pointer")]
    PointerRoot {
        /// Name of the rejected root type.
        type_name: &'static str,
    },
}
