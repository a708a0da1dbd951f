//! WGSL sources and their uniform buffer layouts.
//!
//! Each `*Uniforms` struct must match the struct of the same name in its
//! shader field for field; the layout tests below and the naga validation
//! in `tests/` keep the two sides honest.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2};

use crate::displace::GrassParams;

/// Grass vertex/fragment shader.
pub const GRASS_SOURCE: &str = include_str!("shaders/grass.wgsl");
/// Ground plane shader.
pub const GROUND_SOURCE: &str = include_str!("shaders/ground.wgsl");
/// Particle sprite shader.
pub const PARTICLE_SOURCE: &str = include_str!("shaders/particles.wgsl");

/// Uniforms for the grass pipeline: camera matrices plus the full
/// displacement parameter set, rebuilt from [`GrassParams`] every frame.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct GrassUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub area: [f32; 2],
    pub moved: [f32; 2],
    pub time: f32,
    pub height: f32,
    pub plane_noise_scale: f32,
    pub plane_noise_amplitude: f32,
    pub minor_height_noise_scale: f32,
    pub minor_height_noise_amplitude: f32,
    pub major_height_noise_scale: f32,
    pub major_height_noise_amplitude: f32,
    pub wind_noise_scale: f32,
    pub wind_strength: f32,
    pub _padding: [f32; 2],
}

impl GrassUniforms {
    /// Pack the per-frame grass uniforms.
    pub fn new(view_proj: Mat4, view: Mat4, params: &GrassParams, moved: Vec2, time: f32) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            area: params.area.to_array(),
            moved: moved.to_array(),
            time,
            height: params.height,
            plane_noise_scale: params.plane_noise_scale,
            plane_noise_amplitude: params.plane_noise_amplitude,
            minor_height_noise_scale: params.minor_height_noise_scale,
            minor_height_noise_amplitude: params.minor_height_noise_amplitude,
            major_height_noise_scale: params.major_height_noise_scale,
            major_height_noise_amplitude: params.major_height_noise_amplitude,
            wind_noise_scale: params.wind_noise_scale,
            wind_strength: params.wind_strength,
            _padding: [0.0; 2],
        }
    }
}

/// Uniforms for the ground pipeline.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct GroundUniforms {
    pub view_proj: [[f32; 4]; 4],
}

/// Uniforms for the particle pipeline.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct ParticleUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub area: [f32; 2],
    pub resolution: [f32; 2],
    pub time: f32,
    pub _padding: [f32; 3],
}

impl ParticleUniforms {
    /// Pack the per-frame particle uniforms.
    pub fn new(view: Mat4, proj: Mat4, area: Vec2, resolution: Vec2, time: f32) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            area: area.to_array(),
            resolution: resolution.to_array(),
            time,
            _padding: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_sizes_match_wgsl_layout() {
        // mat4 + mat4 + 2 vec2 + 10 f32, rounded to 16-byte struct align.
        assert_eq!(std::mem::size_of::<GrassUniforms>(), 192);
        assert_eq!(std::mem::size_of::<GroundUniforms>(), 64);
        // mat4 + mat4 + 2 vec2 + f32, rounded to 16-byte struct align.
        assert_eq!(std::mem::size_of::<ParticleUniforms>(), 160);
    }

    #[test]
    fn test_grass_uniforms_pack_params() {
        let params = GrassParams::default();
        let u = GrassUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, &params, Vec2::ZERO, 2.5);
        assert_eq!(u.time, 2.5);
        assert_eq!(u.height, params.height);
        assert_eq!(u.wind_strength, params.wind_strength);
        assert_eq!(u.area, [30.0, 30.0]);
    }
}
