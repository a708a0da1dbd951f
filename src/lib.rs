//! # sward
//!
//! Procedural grass meadows on the GPU: tens of thousands of instanced
//! blades bent, scaled, and colored per vertex by layered noise, with a
//! ground plane and a drift of ambient particles.
//!
//! ## Quick Start
//!
//! ```ignore
//! use sward::Meadow;
//!
//! fn main() {
//!     Meadow::new()
//!         .with_grid(175, 175)
//!         .with_area(30.0, 30.0)
//!         .with_noise_texture("assets/noise.png")
//!         .run()
//!         .unwrap();
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Instances
//!
//! Every blade is the same small box mesh, placed by a normalized `(u, v)`
//! grid offset ([`GridSpec`]). The offset is both the blade's position key
//! and the coordinate all its noise lookups hang off, so each instance is
//! fully determined by `(base vertex, offset, time)` — no per-blade state,
//! no cross-instance dependency, which is what lets the GPU evaluate the
//! whole field in parallel.
//!
//! ### Displacement
//!
//! The vertex stage layers four noise samples — ground undulation, fine
//! height variance, broad height patches, and a time-shifted wind sample —
//! on top of a tip-ward taper and bend ([`displace`] is the CPU reference
//! of the exact same math, used by the tests and benches).
//!
//! ### Noise fields
//!
//! All variation reads through the [`NoiseField`] capability: a tileable
//! 2D scalar field. Use an image ([`TextureField::from_image`]), a
//! generated hash-noise field ([`TextureField::generated`]), or anything
//! else implementing the trait.
//!
//! ### The driver
//!
//! [`Meadow`] owns the renderable set and a single monotonic clock. Each
//! frame it advances time once, repacks the immutable parameter structs
//! into uniforms, and issues one render pass. Grass is skipped (never
//! failed) on frames before the noise asset is ready.

pub mod camera;
pub mod displace;
pub mod error;
mod gpu;
pub mod grid;
pub mod meadow;
pub mod mesh;
pub mod noise;
pub mod particles;
pub mod shader;
pub mod shading;
pub mod time;

pub use bytemuck;
pub use glam::{Vec2, Vec3, Vec4};

pub use camera::Camera;
pub use displace::{displace, displace_mesh, BladeVertex, GrassParams};
pub use error::{GridError, MeadowError, NoiseError};
pub use grid::GridSpec;
pub use meadow::{Meadow, NoiseSource};
pub use mesh::{Mesh, Vertex};
pub use noise::{sample_scaled, FlatField, NoiseField, TextureField};
pub use particles::{drift, ParticleInstance, ParticleSet};
pub use shading::{fog_factor, shade};
pub use time::FrameClock;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use sward::prelude::*;
/// ```
pub mod prelude {
    pub use crate::camera::Camera;
    pub use crate::displace::{displace, displace_mesh, BladeVertex, GrassParams};
    pub use crate::grid::GridSpec;
    pub use crate::meadow::{Meadow, NoiseSource};
    pub use crate::mesh::{Mesh, Vertex};
    pub use crate::noise::{sample_scaled, FlatField, NoiseField, TextureField};
    pub use crate::particles::{drift, ParticleInstance, ParticleSet};
    pub use crate::shading::{fog_factor, shade};
    pub use crate::time::FrameClock;
    pub use crate::{Vec2, Vec3, Vec4};
}
