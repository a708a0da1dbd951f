//! Error types for sward.
//!
//! This module provides error types for grid construction, noise texture
//! loading, GPU initialization, and running the meadow.

use std::fmt;

/// Errors that can occur when constructing a [`crate::GridSpec`].
///
/// A grid with zero instances or a non-positive footprint has no valid
/// layout, so construction is rejected up front.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridError {
    /// Rows or columns was zero.
    EmptyGrid {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// The world-space footprint had a non-positive extent.
    NonPositiveArea {
        /// Requested width of the footprint.
        width: f32,
        /// Requested depth of the footprint.
        depth: f32,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::EmptyGrid { rows, columns } => write!(
                f,
                "Grid must have at least one row and one column (got {}x{})",
                rows, columns
            ),
            GridError::NonPositiveArea { width, depth } => write!(
                f,
                "Grid area must have positive extents (got {}x{})",
                width, depth
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Errors that can occur while loading a noise texture.
#[derive(Debug)]
pub enum NoiseError {
    /// Failed to decode the image file.
    ImageLoad(image::ImageError),
    /// Failed to read the file from disk.
    Io(std::io::Error),
}

impl fmt::Display for NoiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseError::ImageLoad(e) => write!(f, "Failed to decode noise texture: {}", e),
            NoiseError::Io(e) => write!(f, "Failed to read noise texture file: {}", e),
        }
    }
}

impl std::error::Error for NoiseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NoiseError::ImageLoad(e) => Some(e),
            NoiseError::Io(e) => Some(e),
        }
    }
}

impl From<image::ImageError> for NoiseError {
    fn from(e: image::ImageError) -> Self {
        NoiseError::ImageLoad(e)
    }
}

impl From<std::io::Error> for NoiseError {
    fn from(e: std::io::Error) -> Self {
        NoiseError::Io(e)
    }
}

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter(wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter(e) => write!(
                f,
                "No compatible GPU adapter found ({}). Ensure your system has a GPU with WebGPU/Vulkan/Metal/DX12 support.",
                e
            ),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::NoAdapter(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestAdapterError> for GpuError {
    fn from(e: wgpu::RequestAdapterError) -> Self {
        GpuError::NoAdapter(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur when running a meadow.
#[derive(Debug)]
pub enum MeadowError {
    /// Failed to create the event loop.
    EventLoop(winit::error::EventLoopError),
    /// The grass grid was rejected at construction.
    Grid(GridError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for MeadowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeadowError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            MeadowError::Grid(e) => write!(f, "Invalid grass grid: {}", e),
            MeadowError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for MeadowError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MeadowError::EventLoop(e) => Some(e),
            MeadowError::Grid(e) => Some(e),
            MeadowError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for MeadowError {
    fn from(e: winit::error::EventLoopError) -> Self {
        MeadowError::EventLoop(e)
    }
}

impl From<GridError> for MeadowError {
    fn from(e: GridError) -> Self {
        MeadowError::Grid(e)
    }
}

impl From<GpuError> for MeadowError {
    fn from(e: GpuError) -> Self {
        MeadowError::Gpu(e)
    }
}
