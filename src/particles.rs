//! Ambient floating particles.
//!
//! A handful of soft white points drifting over the meadow. Each particle
//! is a base position plus a four-lane random seed, both frozen at
//! creation; all motion is a sinusoidal function of time and seed,
//! evaluated in the vertex stage (`src/shaders/particles.wgsl`). [`drift`]
//! is the CPU reference of that math.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use crate::shading::mix;

/// Per-particle instance data as uploaded to the GPU. Immutable after
/// creation; the shader derives each frame's position from it.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ParticleInstance {
    /// Base position, each component in `[0, 1)`.
    pub position: [f32; 3],
    /// Random seed lanes, each in `[0, 1)`.
    pub random: [f32; 4],
}

/// The full particle field.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    instances: Vec<ParticleInstance>,
    area: Vec2,
}

impl ParticleSet {
    /// Create `num` particles spread over `area`.
    ///
    /// Seeding is hash-based, so a set is reproducible for a given count.
    pub fn new(num: u32, area: Vec2) -> Self {
        let instances = (0..num)
            .map(|i| ParticleInstance {
                position: [
                    pseudo_random(i * 7),
                    pseudo_random(i * 7 + 1),
                    pseudo_random(i * 7 + 2),
                ],
                random: [
                    pseudo_random(i * 7 + 3),
                    pseudo_random(i * 7 + 4),
                    pseudo_random(i * 7 + 5),
                    pseudo_random(i * 7 + 6),
                ],
            })
            .collect();

        Self { instances, area }
    }

    /// Number of particles.
    #[inline]
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Whether the set is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Instance data for upload.
    #[inline]
    pub fn instances(&self) -> &[ParticleInstance] {
        &self.instances
    }

    /// Horizontal drift extents.
    #[inline]
    pub fn area(&self) -> Vec2 {
        self.area
    }
}

/// World position of a particle at a given time.
///
/// The base position maps from `[0,1)^3` to `[-1,1]^3` with the depth axis
/// stretched toward the camera, then each axis drifts on its own sine wave
/// keyed by the seed.
pub fn drift(instance: &ParticleInstance, time: f32, area: Vec2) -> Vec3 {
    let base = Vec3::from(instance.position) * 2.0 - Vec3::ONE;
    let base = Vec3::new(base.x, base.y, base.z * 10.0);

    let [r0, r1, r2, _] = instance.random;
    let t = time * 0.2;

    Vec3::new(
        base.x + (t * r0 + 6.28 * r0).sin() * mix(0.1, 1.5, r0) * area.x,
        base.y + (t * r1 + 6.28 * r1).sin() * mix(0.1, 1.5, r1) * 4.0,
        base.z + (t * r2 + 6.28 * r2).sin() * mix(0.1, 1.5, r2) * area.y,
    )
}

/// Cheap integer-hash random in `[0, 1)`.
fn pseudo_random(seed: u32) -> f32 {
    let x = seed.wrapping_mul(1103515245).wrapping_add(12345);
    let x = x ^ (x >> 16);
    (x & 0x7FFFFFFF) as f32 / 0x7FFFFFFF as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_has_requested_count() {
        let set = ParticleSet::new(100, Vec2::splat(30.0));
        assert_eq!(set.len(), 100);
        assert!(!set.is_empty());
        assert!(ParticleSet::new(0, Vec2::splat(30.0)).is_empty());
    }

    #[test]
    fn test_seeds_in_unit_range() {
        let set = ParticleSet::new(256, Vec2::splat(30.0));
        for p in set.instances() {
            for v in p.position.iter().chain(p.random.iter()) {
                assert!((0.0..1.0).contains(v), "seed {} out of range", v);
            }
        }
    }

    #[test]
    fn test_sets_are_reproducible() {
        let a = ParticleSet::new(64, Vec2::splat(30.0));
        let b = ParticleSet::new(64, Vec2::splat(30.0));
        assert_eq!(a.instances(), b.instances());
    }

    #[test]
    fn test_drift_is_deterministic_and_time_varying() {
        let set = ParticleSet::new(8, Vec2::splat(30.0));
        let p = &set.instances()[3];

        assert_eq!(drift(p, 4.0, set.area()), drift(p, 4.0, set.area()));
        assert_ne!(drift(p, 0.0, set.area()), drift(p, 10.0, set.area()));
    }

    #[test]
    fn test_drift_leaves_base_unchanged() {
        let set = ParticleSet::new(8, Vec2::splat(30.0));
        let before = *set.instances().first().unwrap();
        let _ = drift(&before, 123.0, set.area());
        assert_eq!(set.instances()[0], before);
    }
}
