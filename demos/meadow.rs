//! The default meadow: a 175x175 blade grid over a 30x30 field with 100
//! drifting particles. Drag to orbit, scroll to zoom.
//!
//! Run with: `cargo run --example meadow`

use sward::prelude::*;

fn main() {
    Meadow::new()
        .with_grid(175, 175)
        .with_area(30.0, 30.0)
        .with_particle_count(100)
        .with_title("sward - meadow")
        .run()
        .unwrap();
}
