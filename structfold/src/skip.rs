//! Skip-path parsing and per-level partitioning.
//!
//! A skip path is a `>`-separated chain of field names, such as
//! `foo>bar>baz`. At each aggregate level the active paths split two
//! ways: single-segment paths name fields dropped at that level,
//! multi-segment paths are grouped by their head segment and forwarded
//! into the matching child. The partition is recomputed per aggregate
//! from whatever set it inherited.

use std::collections::BTreeMap;

use crate::error::{MergeError, MergeResult};

/// One skip path: its remaining segments plus the original spelling,
/// which is kept verbatim for diagnostics however deep the descent.
#[derive(Clone, Debug)]
pub(crate) struct SkipPath {
    segments: Vec<String>,
    origin: String,
}

impl SkipPath {
    /// The path as originally spelled.
    pub(crate) fn origin(&self) -> &str {
        &self.origin
    }

    /// Surrenders the original spelling for an error.
    pub(crate) fn into_origin(self) -> String {
        self.origin
    }

    fn is_leaf(&self) -> bool {
        self.segments.len() == 1
    }

    fn descend(mut self) -> (String, Self) {
        let head = self.segments.remove(0);
        (head, self)
    }
}

/// Parses raw skip paths, rejecting any with an empty segment.
pub(crate) fn parse(paths: &[String]) -> MergeResult<Vec<SkipPath>> {
    paths
        .iter()
        .map(|path| {
            if path.is_empty() || path.split('>').any(str::is_empty) {
                return Err(MergeError::EmptySkipSegment { path: path.clone() });
            }
            Ok(SkipPath {
                segments: path.split('>').map(str::to_owned).collect(),
                origin: path.clone(),
            })
        })
        .collect()
}

/// The two-level dispatch for one aggregate node.
///
/// Ordered maps keep "unconsumed skip" diagnostics deterministic.
#[derive(Debug, Default)]
pub(crate) struct Partition {
    /// Field names dropped at this level, mapped to the original path.
    pub(crate) drop: BTreeMap<String, String>,
    /// Residual paths forwarded into the named child field.
    pub(crate) forward: BTreeMap<String, Vec<SkipPath>>,
}

/// Splits the active set for the aggregate level about to be generated.
pub(crate) fn partition(active: Vec<SkipPath>) -> Partition {
    let mut part = Partition::default();
    for path in active {
        if path.is_leaf() {
            part.drop
                .insert(path.segments[0].clone(), path.into_origin());
        } else {
            let (head, rest) = path.descend();
            part.forward.entry(head).or_default().push(rest);
        }
    }
    part
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{parse, partition};
    use crate::error::MergeError;

    fn paths(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|p| (*p).to_owned()).collect()
    }

    #[rstest]
    #[case(">foo")]
    #[case("foo>")]
    #[case("foo>>bar")]
    #[case("")]
    fn rejects_empty_segments(#[case] path: &str) {
        let err = parse(&paths(&[path])).expect_err("path should be rejected");
        assert!(
            matches!(err, MergeError::EmptySkipSegment { path: p } if p == path),
            "unexpected error for `{path}`"
        );
    }

    #[test]
    fn partitions_drops_from_forwards() {
        let active = parse(&paths(&["f1", "foo>bar", "foo>baz>qux"])).expect("paths parse");
        let part = partition(active);

        assert_eq!(part.drop.len(), 1);
        assert_eq!(part.drop.get("f1").map(String::as_str), Some("f1"));

        let forwarded = part.forward.get("foo").expect("foo forwards");
        assert_eq!(forwarded.len(), 2);
        assert_eq!(forwarded[0].origin(), "foo>bar");
        assert_eq!(forwarded[1].origin(), "foo>baz>qux");
    }

    #[test]
    fn duplicate_drops_collapse() {
        let active = parse(&paths(&["f1", "f1"])).expect("paths parse");
        let part = partition(active);
        assert_eq!(part.drop.len(), 1);
    }
}
