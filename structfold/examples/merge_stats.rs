//! Accumulating per-endpoint statistics with a generated merge.
//!
//! Run with `cargo run --example merge_stats`.

use std::collections::HashMap;

use structfold::{Mergeable, MergerBuilder};

#[derive(Debug, Default, Mergeable)]
struct Endpoint {
    requests: u64,
    errors: u64,
    latency_total_ms: f64,
    saturated: bool,
}

#[derive(Debug, Default, Mergeable)]
struct Stats {
    totals: Endpoint,
    by_status: HashMap<u16, u64>,
}

fn main() -> structfold::MergeResult<()> {
    // Generated once; the merge itself is a flat walk over offsets.
    let merge = MergerBuilder::new()
        .skip_field("totals>saturated")
        .merge_maps()
        .build::<Stats>()?;

    let mut accumulated = Stats {
        totals: Endpoint {
            requests: 90,
            errors: 2,
            latency_total_ms: 1_433.8,
            saturated: false,
        },
        by_status: HashMap::from([(200, 88), (500, 2)]),
    };
    let mut window = Stats {
        totals: Endpoint {
            requests: 10,
            errors: 1,
            latency_total_ms: 210.4,
            saturated: true,
        },
        by_status: HashMap::from([(200, 9), (429, 1)]),
    };

    merge.merge(&mut accumulated, &mut window);
    println!("{accumulated:#?}");
    Ok(())
}
