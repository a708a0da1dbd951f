//! Height- and fog-keyed blade coloring.
//!
//! CPU reference of the grass fragment stage: two vertical color gradients
//! blended by the large-scale height variation, then washed toward white
//! with camera distance. Pure and stateless, evaluated per pixel on the GPU
//! and per sample here.

use glam::Vec3;

/// Blade color gradient at the root/tip for the base layer.
pub const BLADE_DARK_ROOT: Vec3 = Vec3::new(40.0 / 255.0, 80.0 / 255.0, 5.0 / 255.0);
/// Tip of the base gradient.
pub const BLADE_DARK_TIP: Vec3 = Vec3::new(65.0 / 255.0, 152.0 / 255.0, 10.0 / 255.0);
/// Root of the highlight gradient.
pub const BLADE_BRIGHT_ROOT: Vec3 = Vec3::new(90.0 / 255.0, 100.0 / 255.0, 2.0 / 255.0);
/// Tip of the highlight gradient.
pub const BLADE_BRIGHT_TIP: Vec3 = Vec3::new(216.0 / 255.0, 242.0 / 255.0, 100.0 / 255.0);

/// Flat color of the ground plane.
pub const GROUND_COLOR: Vec3 = Vec3::new(140.0 / 255.0, 160.0 / 255.0, 100.0 / 255.0);

/// Camera distance at which fog starts to bite.
pub const FOG_NEAR: f32 = -5.0;
/// Camera distance at which the color is pure white.
pub const FOG_FAR: f32 = 25.0;

/// Linear interpolation, GLSL `mix` semantics (extrapolates outside `[0,1]`).
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Hermite smoothstep between `edge0` and `edge1`, clamped.
#[inline]
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Fog blend factor for a camera-space distance: 0 unfogged, 1 pure white.
#[inline]
pub fn fog_factor(camera_dist: f32) -> f32 {
    smoothstep(FOG_NEAR, FOG_FAR, camera_dist)
}

/// Final blade color for a fragment.
///
/// `height_frac` is the root-to-tip fraction, `height_diff` the normalized
/// large-scale height variation from displacement, `camera_dist` the
/// view-space distance used for fog.
pub fn shade(height_frac: f32, height_diff: f32, camera_dist: f32) -> Vec3 {
    let dark = BLADE_DARK_ROOT.lerp(BLADE_DARK_TIP, height_frac);
    let bright = BLADE_BRIGHT_ROOT.lerp(BLADE_BRIGHT_TIP, height_frac);

    let blended = dark.lerp(bright, height_diff * 1.5);
    blended.lerp(Vec3::ONE, fog_factor(camera_dist))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mix_endpoints_and_extrapolation() {
        assert_eq!(mix(-2.0, 2.0, 0.0), -2.0);
        assert_eq!(mix(-2.0, 2.0, 1.0), 2.0);
        assert_eq!(mix(-2.0, 2.0, 0.5), 0.0);
        assert_eq!(mix(0.0, 1.0, 2.0), 2.0);
    }

    #[test]
    fn test_smoothstep_clamps() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert_eq!(smoothstep(0.0, 1.0, 0.5), 0.5);
    }

    #[test]
    fn test_no_fog_up_close() {
        // At or below the near distance the blended color passes through.
        let base = shade(0.3, 0.2, FOG_NEAR);
        assert_eq!(shade(0.3, 0.2, FOG_NEAR - 10.0), base);
        assert!(base != Vec3::ONE);
    }

    #[test]
    fn test_full_fog_is_white() {
        assert_eq!(shade(0.3, 0.2, FOG_FAR), Vec3::ONE);
        assert_eq!(shade(0.9, -0.5, FOG_FAR + 100.0), Vec3::ONE);
    }

    #[test]
    fn test_root_color_without_height_diff() {
        assert_eq!(shade(0.0, 0.0, -10.0), BLADE_DARK_ROOT);
        assert_eq!(shade(1.0, 0.0, -10.0), BLADE_DARK_TIP);
    }

    #[test]
    fn test_continuous_in_height_frac() {
        // No jumps along the blade for a fixed height_diff and distance.
        let mut prev = shade(0.0, 0.4, 5.0);
        let steps = 1000;
        for i in 1..=steps {
            let h = i as f32 / steps as f32;
            let next = shade(h, 0.4, 5.0);
            assert!((next - prev).length() < 1e-2);
            prev = next;
        }
    }
}
