//! Per-vertex grass displacement.
//!
//! This is the CPU reference of the grass vertex stage in
//! `src/shaders/grass.wgsl`: the same constants, the same operations, in
//! the same order. The GPU path exists for throughput; this path exists so
//! the math is testable without a device.
//!
//! Each evaluation is a pure function of its inputs. Blades share no state
//! with each other, which is what makes the per-instance work freely
//! parallelizable: the whole field is just this function mapped over
//! `vertices x instances`.
//!
//! Three noise layers at different spatial scales (ground undulation, fine
//! per-blade variance, broad patches) plus one time-shifted wind sample
//! give non-repeating organic motion without any per-blade simulation
//! state.

use glam::{Vec2, Vec3};

use crate::mesh::Mesh;
use crate::noise::{sample_scaled, NoiseField};
use crate::shading::mix;

/// Tunable displacement parameters.
///
/// An immutable value struct handed to every evaluation (and re-packed into
/// the uniform buffer each frame) rather than mutable state on a shared
/// program object. Defaults are the tuned values of the meadow scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrassParams {
    /// World-space footprint the unit grid is scaled into.
    pub area: Vec2,
    /// Blade height; `basePosition.y` spans `[-height/2, height/2]`.
    pub height: f32,
    /// Scale of the ground-undulation noise layer.
    pub plane_noise_scale: f32,
    /// Amplitude of the ground-undulation noise layer.
    pub plane_noise_amplitude: f32,
    /// Scale of the fine per-blade height variance.
    pub minor_height_noise_scale: f32,
    /// Amplitude of the fine per-blade height variance.
    pub minor_height_noise_amplitude: f32,
    /// Scale of the broad height patches.
    pub major_height_noise_scale: f32,
    /// Amplitude of the broad height patches.
    pub major_height_noise_amplitude: f32,
    /// Scale of the time-shifted wind sample.
    pub wind_noise_scale: f32,
    /// How hard the wind bends blade tips.
    pub wind_strength: f32,
}

impl Default for GrassParams {
    fn default() -> Self {
        Self {
            area: Vec2::splat(30.0),
            height: 0.2,
            plane_noise_scale: 0.2,
            plane_noise_amplitude: 2.0,
            minor_height_noise_scale: 10.0,
            minor_height_noise_amplitude: 0.6,
            major_height_noise_scale: 0.2,
            major_height_noise_amplitude: 2.0,
            wind_noise_scale: 0.2,
            wind_strength: 5.0,
        }
    }
}

/// One displaced blade vertex: final position plus the two varyings the
/// shading policy consumes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BladeVertex {
    /// World-space position (before the driver's root lift).
    pub position: Vec3,
    /// Root-to-tip fraction in `[0, 1]`.
    pub height_frac: f32,
    /// Broad height variation normalized by its amplitude; drives color
    /// blotching.
    pub height_diff: f32,
}

/// Displace one base mesh vertex of one grass instance.
///
/// `base` is a vertex of the shared blade mesh, `offset` the instance's
/// grid coordinate, `moved` a camera-relative pan offset, `time` the
/// animation clock. Deterministic: identical inputs always produce the
/// identical output.
pub fn displace(
    base: Vec3,
    offset: Vec2,
    moved: Vec2,
    time: f32,
    field: &dyn NoiseField,
    params: &GrassParams,
) -> BladeVertex {
    // 0 at the root, 1 at the tip.
    let h = (base.y + params.height / 2.0) / params.height;

    let offset_adjusted = offset + moved;

    let rand = (offset.x * 100000.0).sin();
    let plane_noise = sample_scaled(
        field,
        offset_adjusted,
        params.plane_noise_scale,
        params.plane_noise_amplitude,
    );
    let shuffle = mix(
        -2.0,
        2.0,
        sample_scaled(
            field,
            Vec2::new((offset.x * 100.0).sin(), (offset.y * 100.0).sin()),
            1.0,
            1.0,
        ),
    );
    let minor_height_noise = sample_scaled(
        field,
        offset,
        params.minor_height_noise_scale,
        params.minor_height_noise_amplitude,
    );
    let major_height_noise = sample_scaled(
        field,
        offset,
        params.major_height_noise_scale,
        params.major_height_noise_amplitude,
    );
    let wind_noise = sample_scaled(
        field,
        offset + Vec2::splat(time * 0.5),
        params.wind_noise_scale,
        1.0,
    );

    // Bending eases in toward the tip; the root term is exactly zero.
    let curved_adjust = (1.0 - (h.cos() + 1.0) / 2.0) * wind_noise * params.wind_strength;

    let grid_position = (offset - Vec2::splat(0.5)) * params.area;

    // Blade taper: full cross-section at the root, 1% at the tip.
    let height_pinch = mix(1.0, 0.01, h);
    let pinched = Vec2::new(base.x, base.z) * height_pinch;

    let lateral = grid_position + Vec2::splat(shuffle) + pinched
        - Vec2::new(curved_adjust + rand * 0.2, curved_adjust);

    // Height variance fades to zero at the root so blades stay planted.
    let scaled_y = base.y * h + minor_height_noise * h + major_height_noise * h;

    BladeVertex {
        position: Vec3::new(lateral.x, base.y + scaled_y + plane_noise, lateral.y),
        height_frac: h,
        height_diff: major_height_noise / params.major_height_noise_amplitude,
    }
}

/// Displace every vertex of a blade mesh for one instance.
///
/// Vertices are evaluated independently; a degenerate input yields a
/// degenerate vertex, never a failed batch.
pub fn displace_mesh(
    mesh: &Mesh,
    offset: Vec2,
    moved: Vec2,
    time: f32,
    field: &dyn NoiseField,
    params: &GrassParams,
) -> Vec<BladeVertex> {
    mesh.vertices
        .iter()
        .map(|v| displace(Vec3::from(v.position), offset, moved, time, field, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noise::{FlatField, TextureField};

    /// Params with every noise amplitude zeroed.
    fn silent_params() -> GrassParams {
        GrassParams {
            plane_noise_amplitude: 0.0,
            minor_height_noise_amplitude: 0.0,
            major_height_noise_amplitude: 0.0,
            wind_strength: 0.0,
            ..GrassParams::default()
        }
    }

    #[test]
    fn test_deterministic() {
        let field = TextureField::generated(64, 9);
        let params = GrassParams::default();
        let base = Vec3::new(0.03, 0.07, -0.02);
        let offset = Vec2::new(0.42, 0.77);

        let a = displace(base, offset, Vec2::ZERO, 12.5, &field, &params);
        let b = displace(base, offset, Vec2::ZERO, 12.5, &field, &params);
        assert_eq!(a, b);
    }

    #[test]
    fn test_height_frac_spans_root_to_tip() {
        let field = FlatField(0.5);
        let params = GrassParams::default();

        let root = displace(
            Vec3::new(0.0, -params.height / 2.0, 0.0),
            Vec2::new(0.2, 0.2),
            Vec2::ZERO,
            0.0,
            &field,
            &params,
        );
        let tip = displace(
            Vec3::new(0.0, params.height / 2.0, 0.0),
            Vec2::new(0.2, 0.2),
            Vec2::ZERO,
            0.0,
            &field,
            &params,
        );

        assert_eq!(root.height_frac, 0.0);
        assert_eq!(tip.height_frac, 1.0);
    }

    #[test]
    fn test_root_ignores_wind_and_height_noise() {
        // Wind changes over time, height noise over amplitude; the root
        // must see neither.
        let field = TextureField::generated(64, 5);
        let params = GrassParams::default();
        let base = Vec3::new(0.05, -params.height / 2.0, 0.05);
        let offset = Vec2::new(0.31, 0.64);

        let early = displace(base, offset, Vec2::ZERO, 0.0, &field, &params);
        let late = displace(base, offset, Vec2::ZERO, 60.0, &field, &params);
        assert_eq!(early.position, late.position);

        // The only vertical displacement left at the root is the plane
        // noise shared with the ground.
        let plane = sample_scaled(
            &field,
            offset,
            params.plane_noise_scale,
            params.plane_noise_amplitude,
        );
        assert_eq!(early.position.y, base.y + plane);
    }

    #[test]
    fn test_tip_moves_with_wind() {
        let field = TextureField::generated(64, 5);
        let params = GrassParams::default();
        let base = Vec3::new(0.0, params.height / 2.0, 0.0);
        let offset = Vec2::new(0.31, 0.64);

        let early = displace(base, offset, Vec2::ZERO, 0.0, &field, &params);
        let late = displace(base, offset, Vec2::ZERO, 1.0, &field, &params);
        assert_ne!(early.position, late.position);
    }

    #[test]
    fn test_tip_cross_section_is_pinched() {
        // A flat field at 0.5 centers the shuffle remap on zero; zero
        // amplitudes remove every other lateral term but the taper.
        let field = FlatField(0.5);
        let params = silent_params();
        let offset = Vec2::ZERO; // sin(0 * 100000) = 0, no jitter

        let grid = (offset - Vec2::splat(0.5)) * params.area;

        let root = displace(
            Vec3::new(0.05, -params.height / 2.0, 0.05),
            offset,
            Vec2::ZERO,
            0.0,
            &field,
            &params,
        );
        let tip = displace(
            Vec3::new(0.05, params.height / 2.0, 0.05),
            offset,
            Vec2::ZERO,
            0.0,
            &field,
            &params,
        );

        let root_radius = Vec2::new(root.position.x, root.position.z) - grid;
        let tip_radius = Vec2::new(tip.position.x, tip.position.z) - grid;

        assert!((root_radius.x - 0.05).abs() < 1e-5);
        assert!((tip_radius.x - 0.0005).abs() < 1e-5);
        assert!(root_radius.length() / tip_radius.length() > 10.0);
    }

    #[test]
    fn test_no_noise_baseline() {
        // With variation silenced, a root vertex lands exactly on its grid
        // cell plus the unmodified local vertex.
        let field = FlatField(0.5);
        let params = silent_params();
        let offset = Vec2::ZERO;
        let base = Vec3::new(0.05, -params.height / 2.0, -0.05);

        let out = displace(base, offset, Vec2::ZERO, 3.0, &field, &params);

        let grid = (offset - Vec2::splat(0.5)) * params.area;
        assert_eq!(out.position.x, grid.x + base.x);
        assert_eq!(out.position.y, base.y);
        assert_eq!(out.position.z, grid.y + base.z);
    }

    #[test]
    fn test_pan_shifts_plane_noise_only() {
        // `moved` feeds the ground-undulation sample, not the grid cell.
        let field = TextureField::generated(64, 21);
        let params = GrassParams::default();
        let base = Vec3::new(0.0, -params.height / 2.0, 0.0);
        let offset = Vec2::new(0.25, 0.5);

        let still = displace(base, offset, Vec2::ZERO, 0.0, &field, &params);
        let panned = displace(base, offset, Vec2::new(0.3, 0.1), 0.0, &field, &params);

        assert_eq!(still.position.x, panned.position.x);
        assert_eq!(still.position.z, panned.position.z);
        assert_ne!(still.position.y, panned.position.y);
    }

    #[test]
    fn test_height_diff_is_normalized_major_noise() {
        let field = FlatField(1.0);
        let params = GrassParams::default();
        let out = displace(
            Vec3::new(0.0, 0.05, 0.0),
            Vec2::new(0.4, 0.1),
            Vec2::ZERO,
            0.0,
            &field,
            &params,
        );
        // Flat field at 1.0: major sample == amplitude.
        assert_eq!(out.height_diff, 1.0);
    }

    #[test]
    fn test_displace_mesh_covers_every_vertex() {
        let mesh = Mesh::blade(0.1, 0.2, 0.1, 4);
        let field = TextureField::generated(32, 2);
        let params = GrassParams::default();

        let out = displace_mesh(&mesh, Vec2::new(0.5, 0.5), Vec2::ZERO, 1.0, &field, &params);
        assert_eq!(out.len(), mesh.vertex_count());
    }

    #[test]
    fn test_instances_are_independent() {
        // Evaluating one instance is unaffected by whatever else was
        // evaluated before it.
        let field = TextureField::generated(32, 2);
        let params = GrassParams::default();
        let base = Vec3::new(0.02, 0.08, 0.01);

        let alone = displace(base, Vec2::new(0.6, 0.2), Vec2::ZERO, 2.0, &field, &params);

        for i in 0..50 {
            let other = Vec2::new(i as f32 / 50.0, 1.0 - i as f32 / 50.0);
            let _ = displace(base, other, Vec2::ZERO, 2.0, &field, &params);
        }
        let again = displace(base, Vec2::new(0.6, 0.2), Vec2::ZERO, 2.0, &field, &params);

        assert_eq!(alone, again);
    }
}
