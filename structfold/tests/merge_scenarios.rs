//! End-to-end merge behaviour over derived aggregates.

use anyhow::{ensure, Result};
use num_complex::Complex;
use rstest::rstest;
use structfold::{merger, Mergeable, MergerBuilder};

#[derive(Debug, Default, Mergeable, PartialEq)]
struct Sample {
    x: u64,
    y: f32,
    z: bool,
}

#[derive(Clone, Debug, Default, Mergeable, PartialEq)]
struct Pair {
    o: i32,
    t: i32,
}

#[rstest]
fn adds_numerics_and_ors_bools() -> Result<()> {
    let merge = merger::<Sample>()?;
    let mut left = Sample {
        x: 1,
        y: 2.0,
        z: false,
    };
    let mut right = Sample {
        x: 7,
        y: 8.0,
        z: true,
    };
    merge.merge(&mut left, &mut right);
    ensure!(
        left == Sample {
            x: 8,
            y: 10.0,
            z: true
        },
        "unexpected merge result: {left:?}"
    );
    Ok(())
}

#[rstest]
fn merging_a_zeroed_right_is_identity() -> Result<()> {
    let merge = merger::<Sample>()?;
    let mut left = Sample {
        x: 42,
        y: 0.5,
        z: true,
    };
    let mut right = Sample::default();
    merge.merge(&mut left, &mut right);
    ensure!(
        left == Sample {
            x: 42,
            y: 0.5,
            z: true
        },
        "a zero-valued right should leave the left intact: {left:?}"
    );
    Ok(())
}

#[rstest]
fn additive_fields_merge_commutatively() -> Result<()> {
    let merge = merger::<Pair>()?;
    let a = Pair { o: 3, t: -7 };
    let b = Pair { o: 10, t: 2 };

    let mut forward = a.clone();
    merge.merge(&mut forward, &mut b.clone());
    let mut backward = b.clone();
    merge.merge(&mut backward, &mut a.clone());

    ensure!(forward == backward, "{forward:?} != {backward:?}");
    ensure!(forward == Pair { o: 13, t: -5 }, "{forward:?}");
    Ok(())
}

#[rstest]
fn booleans_never_unset() -> Result<()> {
    let merge = merger::<Sample>()?;
    let mut left = Sample {
        z: true,
        ..Sample::default()
    };
    let mut right = Sample::default();
    merge.merge(&mut left, &mut right);
    ensure!(left.z, "a true flag must survive every merge");
    Ok(())
}

#[derive(Debug, Default, Mergeable, PartialEq)]
struct Wrapping {
    small: u8,
}

#[rstest]
fn integer_overflow_wraps() -> Result<()> {
    let merge = merger::<Wrapping>()?;
    let mut left = Wrapping { small: 250 };
    let mut right = Wrapping { small: 10 };
    merge.merge(&mut left, &mut right);
    ensure!(left.small == 4, "expected wraparound, got {}", left.small);
    Ok(())
}

#[derive(Debug, Default, Mergeable, PartialEq)]
struct Signals {
    amplitude: Complex<f64>,
}

#[rstest]
fn complex_pairs_add_componentwise() -> Result<()> {
    let merge = merger::<Signals>()?;
    let mut left = Signals {
        amplitude: Complex::new(1.0, -2.0),
    };
    let mut right = Signals {
        amplitude: Complex::new(0.5, 4.0),
    };
    merge.merge(&mut left, &mut right);
    ensure!(
        left.amplitude == Complex::new(1.5, 2.0),
        "unexpected sum: {}",
        left.amplitude
    );
    Ok(())
}

#[derive(Debug, Default, Mergeable, PartialEq)]
struct Sequences {
    s: Vec<Pair>,
}

#[rstest]
fn shorter_right_merges_overlap_and_keeps_tail() -> Result<()> {
    let merge = merger::<Sequences>()?;
    let mut left = Sequences {
        s: vec![Pair { o: 2, t: 3 }, Pair { o: 4, t: 5 }],
    };
    let mut right = Sequences {
        s: vec![Pair { o: 2, t: 2 }],
    };
    merge.merge(&mut left, &mut right);
    ensure!(
        left.s == vec![Pair { o: 4, t: 5 }, Pair { o: 4, t: 5 }],
        "unexpected left sequence: {:?}",
        left.s
    );
    Ok(())
}

#[rstest]
fn longer_right_swaps_its_storage_to_the_left() -> Result<()> {
    let merge = merger::<Sequences>()?;
    let mut left = Sequences {
        s: vec![Pair { o: 1, t: 1 }],
    };
    let mut right = Sequences {
        s: vec![Pair { o: 10, t: 10 }, Pair { o: 20, t: 20 }],
    };
    merge.merge(&mut left, &mut right);

    ensure!(
        left.s == vec![Pair { o: 11, t: 11 }, Pair { o: 20, t: 20 }],
        "the left should own the longer storage: {:?}",
        left.s
    );
    // The swap donates the former left storage to the right.
    ensure!(
        right.s == vec![Pair { o: 1, t: 1 }],
        "the right should hold the former left header: {:?}",
        right.s
    );
    Ok(())
}

#[rstest]
#[case(0, 0)]
#[case(0, 3)]
#[case(3, 0)]
#[case(2, 5)]
fn merged_sequence_length_is_the_maximum(#[case] left_len: usize, #[case] right_len: usize) -> Result<()> {
    let merge = merger::<Sequences>()?;
    let mut left = Sequences {
        s: (0..left_len).map(|i| Pair { o: i as i32, t: 0 }).collect(),
    };
    let mut right = Sequences {
        s: (0..right_len).map(|i| Pair { o: i as i32, t: 1 }).collect(),
    };
    merge.merge(&mut left, &mut right);
    ensure!(
        left.s.len() == left_len.max(right_len),
        "expected {} elements, got {}",
        left_len.max(right_len),
        left.s.len()
    );
    Ok(())
}

#[derive(Debug, Default, Mergeable, PartialEq)]
struct Fixed {
    f: [i32; 2],
}

#[rstest]
fn fixed_arrays_merge_every_element() -> Result<()> {
    let merge = merger::<Fixed>()?;
    let mut left = Fixed { f: [1, 1] };
    let mut right = Fixed { f: [2, 3] };
    merge.merge(&mut left, &mut right);
    ensure!(left.f == [3, 4], "unexpected array: {:?}", left.f);
    Ok(())
}

#[derive(Debug, Default, Mergeable, PartialEq)]
struct Holder {
    p: Option<Box<i32>>,
}

#[rstest]
fn empty_left_pointer_steals_the_right_payload() -> Result<()> {
    let merge = merger::<Holder>()?;
    let mut left = Holder { p: None };
    let mut right = Holder {
        p: Some(Box::new(6)),
    };
    merge.merge(&mut left, &mut right);
    ensure!(left.p.as_deref() == Some(&6), "left should own the payload");
    ensure!(right.p.is_none(), "right should be emptied by the transfer");

    let mut next = Holder {
        p: Some(Box::new(5)),
    };
    merge.merge(&mut left, &mut next);
    ensure!(left.p.as_deref() == Some(&11), "payloads should add");
    ensure!(
        next.p.as_deref() == Some(&5),
        "a populated right is only read"
    );
    Ok(())
}

#[rstest]
fn empty_right_pointer_changes_nothing() -> Result<()> {
    let merge = merger::<Holder>()?;
    let mut left = Holder {
        p: Some(Box::new(9)),
    };
    let mut right = Holder { p: None };
    merge.merge(&mut left, &mut right);
    ensure!(left.p.as_deref() == Some(&9), "left should be untouched");
    Ok(())
}

#[derive(Debug, Default, Mergeable, PartialEq)]
struct Boxed {
    b: Box<u32>,
}

#[rstest]
fn owning_pointers_always_recurse() -> Result<()> {
    let merge = merger::<Boxed>()?;
    let mut left = Boxed { b: Box::new(40) };
    let mut right = Boxed { b: Box::new(2) };
    merge.merge(&mut left, &mut right);
    ensure!(*left.b == 42, "expected 42, got {}", left.b);
    Ok(())
}

#[derive(Debug, Default, Mergeable, PartialEq)]
struct Skippable {
    f1: u64,
    f2: u64,
}

#[rstest]
fn skipped_root_fields_are_left_alone() -> Result<()> {
    let merge = MergerBuilder::new().skip_field("f1").build::<Skippable>()?;
    let mut left = Skippable { f1: 1, f2: 3 };
    let mut right = Skippable { f1: 7, f2: 9 };
    merge.merge(&mut left, &mut right);
    ensure!(
        left == Skippable { f1: 1, f2: 12 },
        "unexpected result: {left:?}"
    );
    Ok(())
}
