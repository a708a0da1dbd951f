//! A denser field in a stiff breeze: stronger wind bending and more
//! per-blade height variance than the default scene.
//!
//! Run with: `cargo run --example breeze`

use sward::prelude::*;

fn main() {
    let params = GrassParams {
        wind_strength: 9.0,
        wind_noise_scale: 0.35,
        minor_height_noise_amplitude: 0.9,
        ..GrassParams::default()
    };

    Meadow::new()
        .with_grid(220, 220)
        .with_params(params)
        .with_particle_count(160)
        .with_generated_noise(256, 42)
        .with_title("sward - breeze")
        .run()
        .unwrap();
}
