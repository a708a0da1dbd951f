//! Instance grid layout for the grass field.
//!
//! Every blade is an instance of the same base mesh, keyed by a normalized
//! `(u, v)` offset into the grid. The offsets double as the blade's spatial
//! address and as the coordinate all its noise lookups are anchored to, so
//! their layout is load-bearing: row-major order, `u = row/rows`,
//! `v = col/columns`, each in `[0, 1)`.
//!
//! # Example
//!
//! ```ignore
//! use sward::GridSpec;
//! use glam::Vec2;
//!
//! let grid = GridSpec::new(175, 175, Vec2::splat(30.0))?;
//! let offsets = grid.offset_buffer(); // upload as a per-instance attribute
//! ```

use glam::Vec2;

use crate::error::GridError;

/// An immutable description of the grass instance grid.
///
/// `rows * columns` is the total instance count; `area` is the world-space
/// footprint the unit grid is scaled into, centered at the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSpec {
    rows: u32,
    columns: u32,
    area: Vec2,
}

impl GridSpec {
    /// Create a grid spec, rejecting degenerate layouts.
    ///
    /// Fails if `rows` or `columns` is zero, or if either extent of `area`
    /// is not strictly positive.
    pub fn new(rows: u32, columns: u32, area: Vec2) -> Result<Self, GridError> {
        if rows == 0 || columns == 0 {
            return Err(GridError::EmptyGrid { rows, columns });
        }
        if !(area.x > 0.0) || !(area.y > 0.0) {
            return Err(GridError::NonPositiveArea {
                width: area.x,
                depth: area.y,
            });
        }
        Ok(Self {
            rows,
            columns,
            area,
        })
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Total instance count (`rows * columns`).
    #[inline]
    pub fn count(&self) -> u32 {
        self.rows * self.columns
    }

    /// World-space footprint of the grid.
    #[inline]
    pub fn area(&self) -> Vec2 {
        self.area
    }

    /// Generate the per-instance offsets in row-major order.
    ///
    /// The offset at index `i` has `u = floor(i / columns) / rows` and
    /// `v = (i % columns) / columns`. Other code may rely on this ordering
    /// to correlate an instance index with its grid cell.
    pub fn offsets(&self) -> Vec<Vec2> {
        let mut offsets = Vec::with_capacity(self.count() as usize);
        for row in 0..self.rows {
            for col in 0..self.columns {
                offsets.push(Vec2::new(
                    row as f32 / self.rows as f32,
                    col as f32 / self.columns as f32,
                ));
            }
        }
        offsets
    }

    /// The offsets flattened to `rows * columns * 2` floats for upload as an
    /// instanced vertex attribute.
    pub fn offset_buffer(&self) -> Vec<f32> {
        let mut buffer = Vec::with_capacity(self.count() as usize * 2);
        for offset in self.offsets() {
            buffer.push(offset.x);
            buffer.push(offset.y);
        }
        buffer
    }
}
