//! Base geometry: the shared blade box and the ground plane.
//!
//! One blade mesh is built once and drawn for every instance; all shaping
//! (taper, bending, height variance) happens per vertex in the displacement
//! stage, so the box side faces carry enough height segments to curve.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Interleaved mesh vertex as uploaded to the GPU.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Face-local texture coordinate.
    pub uv: [f32; 2],
}

/// Indexed triangle mesh.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex data, interleaved.
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`.
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Build the base blade: a `width x height x depth` box centered at the
    /// origin (`y` in `[-height/2, height/2]`) whose four side faces are
    /// split into `height_segments` rows so displacement can bend them.
    pub fn blade(width: f32, height: f32, depth: f32, height_segments: u32) -> Self {
        let (hw, hh, hd) = (width / 2.0, height / 2.0, depth / 2.0);
        let segments = height_segments.max(1);
        let mut mesh = Mesh::default();

        let up = Vec3::new(0.0, height, 0.0);

        // Side faces, subdivided vertically.
        mesh.push_face(Vec3::new(hw, -hh, hd), Vec3::new(0.0, 0.0, -depth), up, 1, segments);
        mesh.push_face(Vec3::new(-hw, -hh, -hd), Vec3::new(0.0, 0.0, depth), up, 1, segments);
        mesh.push_face(Vec3::new(-hw, -hh, hd), Vec3::new(width, 0.0, 0.0), up, 1, segments);
        mesh.push_face(Vec3::new(hw, -hh, -hd), Vec3::new(-width, 0.0, 0.0), up, 1, segments);

        // Caps.
        mesh.push_face(
            Vec3::new(-hw, hh, hd),
            Vec3::new(width, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -depth),
            1,
            1,
        );
        mesh.push_face(
            Vec3::new(-hw, -hh, -hd),
            Vec3::new(width, 0.0, 0.0),
            Vec3::new(0.0, 0.0, depth),
            1,
            1,
        );

        mesh
    }

    /// Build the ground plane: a `width x depth` quad lying in the XZ plane
    /// at `y = 0`, centered at the origin.
    pub fn ground_plane(width: f32, depth: f32) -> Self {
        let mut mesh = Mesh::default();
        mesh.push_face(
            Vec3::new(-width / 2.0, 0.0, depth / 2.0),
            Vec3::new(width, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -depth),
            1,
            1,
        );
        mesh
    }

    /// Number of vertices.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices.
    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Append a subdivided quad face spanning `origin` to
    /// `origin + du + dv`, with `cols x rows` cells.
    fn push_face(&mut self, origin: Vec3, du: Vec3, dv: Vec3, cols: u32, rows: u32) {
        let base = self.vertices.len() as u32;

        for row in 0..=rows {
            for col in 0..=cols {
                let fu = col as f32 / cols as f32;
                let fv = row as f32 / rows as f32;
                let position = origin + du * fu + dv * fv;
                self.vertices.push(Vertex {
                    position: position.to_array(),
                    uv: [fu, fv],
                });
            }
        }

        let stride = cols + 1;
        for row in 0..rows {
            for col in 0..cols {
                let a = base + row * stride + col;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                self.indices.extend_from_slice(&[a, b, c, b, d, c]);
            }
        }
    }
}
