//! wgpu backend: device setup, the three scene pipelines, and the
//! per-frame render pass.
//!
//! The backend owns every GPU resource and nothing else; scene content
//! (meshes, offsets, particles) is built by the driver and uploaded once,
//! per-frame state arrives as immutable values through [`GpuState::render`].

use std::sync::Arc;

use glam::Vec2;
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::Camera;
use crate::displace::GrassParams;
use crate::error::GpuError;
use crate::mesh::{Mesh, Vertex};
use crate::noise::TextureField;
use crate::particles::{ParticleInstance, ParticleSet};
use crate::shader::{
    GrassUniforms, GroundUniforms, ParticleUniforms, GRASS_SOURCE, GROUND_SOURCE, PARTICLE_SOURCE,
};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Scene background; fog fades into it.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

pub struct GpuState {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    depth_texture: wgpu::TextureView,
    pub camera: Camera,

    ground_pipeline: wgpu::RenderPipeline,
    ground_vertex_buffer: wgpu::Buffer,
    ground_index_buffer: wgpu::Buffer,
    ground_index_count: u32,
    ground_uniform_buffer: wgpu::Buffer,
    ground_bind_group: wgpu::BindGroup,

    grass_pipeline: wgpu::RenderPipeline,
    blade_vertex_buffer: wgpu::Buffer,
    blade_index_buffer: wgpu::Buffer,
    blade_index_count: u32,
    offset_buffer: wgpu::Buffer,
    instance_count: u32,
    grass_uniform_buffer: wgpu::Buffer,
    grass_bind_group_layout: wgpu::BindGroupLayout,
    // Completed once the noise field is in; grass is skipped until then.
    grass_bind_group: Option<wgpu::BindGroup>,

    particle_pipeline: wgpu::RenderPipeline,
    particle_buffer: wgpu::Buffer,
    particle_count: u32,
    particle_area: Vec2,
    particle_uniform_buffer: wgpu::Buffer,
    particle_bind_group: wgpu::BindGroup,
}

impl GpuState {
    pub async fn new(
        window: Arc<Window>,
        blade: &Mesh,
        ground: &Mesh,
        offsets: &[f32],
        instance_count: u32,
        particles: &ParticleSet,
    ) -> Result<Self, GpuError> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                trace: Default::default(),
                experimental_features: Default::default(),
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .copied()
            .unwrap_or(surface_caps.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = create_depth_texture(&device, &config);
        let camera = Camera::new();

        // Mesh and instance data, uploaded once.
        let ground_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ground Vertex Buffer"),
            contents: bytemuck::cast_slice(&ground.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let ground_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ground Index Buffer"),
            contents: bytemuck::cast_slice(&ground.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let blade_vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Blade Vertex Buffer"),
            contents: bytemuck::cast_slice(&blade.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let blade_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Blade Index Buffer"),
            contents: bytemuck::cast_slice(&blade.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let offset_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grass Offset Buffer"),
            contents: bytemuck::cast_slice(offsets),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let particle_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Buffer"),
            contents: bytemuck::cast_slice(particles.instances()),
            usage: wgpu::BufferUsages::VERTEX,
        });

        // Uniform buffers, rewritten every frame.
        let ground_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ground Uniform Buffer"),
            contents: bytemuck::bytes_of(&GroundUniforms {
                view_proj: glam::Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let grass_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Grass Uniform Buffer"),
            contents: bytemuck::bytes_of(&GrassUniforms::new(
                glam::Mat4::IDENTITY,
                glam::Mat4::IDENTITY,
                &GrassParams::default(),
                Vec2::ZERO,
                0.0,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let particle_uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Particle Uniform Buffer"),
            contents: bytemuck::bytes_of(&ParticleUniforms::new(
                glam::Mat4::IDENTITY,
                glam::Mat4::IDENTITY,
                particles.area(),
                Vec2::ONE,
                0.0,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        // Bind group layouts.
        let uniform_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let ground_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Ground Bind Group Layout"),
                entries: &[uniform_entry(0)],
            });
        let particle_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Particle Bind Group Layout"),
                entries: &[uniform_entry(0)],
            });
        // Grass samples the noise texture in the vertex stage.
        let grass_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Grass Bind Group Layout"),
                entries: &[
                    uniform_entry(0),
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 2,
                        visibility: wgpu::ShaderStages::VERTEX,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
            });

        let ground_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Ground Bind Group"),
            layout: &ground_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ground_uniform_buffer.as_entire_binding(),
            }],
        });
        let particle_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Bind Group"),
            layout: &particle_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: particle_uniform_buffer.as_entire_binding(),
            }],
        });

        // Vertex layouts.
        let mesh_attributes = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x2,
            },
        ];
        let mesh_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &mesh_attributes,
        };

        let offset_attributes = [wgpu::VertexAttribute {
            offset: 0,
            shader_location: 2,
            format: wgpu::VertexFormat::Float32x2,
        }];
        let offset_layout = wgpu::VertexBufferLayout {
            array_stride: (std::mem::size_of::<f32>() * 2) as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &offset_attributes,
        };

        let particle_attributes = [
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x4,
            },
        ];
        let particle_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ParticleInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &particle_attributes,
        };

        // Pipelines.
        let ground_pipeline = create_pipeline(
            &device,
            "Ground Pipeline",
            GROUND_SOURCE,
            &ground_bind_group_layout,
            &[mesh_layout.clone()],
            config.format,
            None,
            true,
            wgpu::CompareFunction::Less,
        );
        let grass_pipeline = create_pipeline(
            &device,
            "Grass Pipeline",
            GRASS_SOURCE,
            &grass_bind_group_layout,
            &[mesh_layout, offset_layout],
            config.format,
            None,
            true,
            wgpu::CompareFunction::Less,
        );
        // Particles blend over everything and ignore depth, so they draw
        // last.
        let particle_pipeline = create_pipeline(
            &device,
            "Particle Pipeline",
            PARTICLE_SOURCE,
            &particle_bind_group_layout,
            &[particle_layout],
            config.format,
            Some(wgpu::BlendState::ALPHA_BLENDING),
            false,
            wgpu::CompareFunction::Always,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            camera,
            ground_pipeline,
            ground_vertex_buffer,
            ground_index_buffer,
            ground_index_count: ground.index_count(),
            ground_uniform_buffer,
            ground_bind_group,
            grass_pipeline,
            blade_vertex_buffer,
            blade_index_buffer,
            blade_index_count: blade.index_count(),
            offset_buffer,
            instance_count,
            grass_uniform_buffer,
            grass_bind_group_layout,
            grass_bind_group: None,
            particle_pipeline,
            particle_buffer,
            particle_count: particles.len() as u32,
            particle_area: particles.area(),
            particle_uniform_buffer,
            particle_bind_group,
        })
    }

    /// Upload the noise field and complete the grass bind group.
    ///
    /// Until this is called, [`render`](Self::render) draws the
    /// resource-independent objects only.
    pub fn set_noise_field(&mut self, field: &TextureField) {
        let size = wgpu::Extent3d {
            width: field.width(),
            height: field.height(),
            depth_or_array_layers: 1,
        };
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Noise Texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::R8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &field.to_r8(),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(field.width()),
                rows_per_image: Some(field.height()),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Repeat + linear to match the CPU reference sampling.
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Noise Sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });

        self.grass_bind_group = Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Grass Bind Group"),
            layout: &self.grass_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: self.grass_uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        }));
    }

    /// Whether the noise field has been uploaded.
    pub fn has_noise_field(&self) -> bool {
        self.grass_bind_group.is_some()
    }

    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
            self.depth_texture = create_depth_texture(&self.device, &self.config);
        }
    }

    fn update_uniforms(&mut self, time: f32, params: &GrassParams, moved: Vec2) {
        let aspect = self.config.width as f32 / self.config.height as f32;
        let view = self.camera.view_matrix();
        let proj = self.camera.projection(aspect);
        let view_proj = proj * view;
        let resolution = Vec2::new(self.config.width as f32, self.config.height as f32);

        self.queue.write_buffer(
            &self.ground_uniform_buffer,
            0,
            bytemuck::bytes_of(&GroundUniforms {
                view_proj: view_proj.to_cols_array_2d(),
            }),
        );
        self.queue.write_buffer(
            &self.grass_uniform_buffer,
            0,
            bytemuck::bytes_of(&GrassUniforms::new(view_proj, view, params, moved, time)),
        );
        self.queue.write_buffer(
            &self.particle_uniform_buffer,
            0,
            bytemuck::bytes_of(&ParticleUniforms::new(
                view,
                proj,
                self.particle_area,
                resolution,
                time,
            )),
        );
    }

    /// Render one frame of the scene.
    pub fn render(
        &mut self,
        time: f32,
        params: &GrassParams,
        moved: Vec2,
    ) -> Result<(), wgpu::SurfaceError> {
        self.update_uniforms(time, params, moved);

        let output = self.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    depth_slice: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            render_pass.set_pipeline(&self.ground_pipeline);
            render_pass.set_bind_group(0, &self.ground_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.ground_vertex_buffer.slice(..));
            render_pass
                .set_index_buffer(self.ground_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..self.ground_index_count, 0, 0..1);

            if let Some(ref grass_bind_group) = self.grass_bind_group {
                render_pass.set_pipeline(&self.grass_pipeline);
                render_pass.set_bind_group(0, grass_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.blade_vertex_buffer.slice(..));
                render_pass.set_vertex_buffer(1, self.offset_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.blade_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..self.blade_index_count, 0, 0..self.instance_count);
            }

            render_pass.set_pipeline(&self.particle_pipeline);
            render_pass.set_bind_group(0, &self.particle_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.particle_buffer.slice(..));
            render_pass.draw(0..6, 0..self.particle_count);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }
}

#[allow(clippy::too_many_arguments)]
fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    shader_source: &str,
    bind_group_layout: &wgpu::BindGroupLayout,
    vertex_layouts: &[wgpu::VertexBufferLayout<'_>],
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_write_enabled: bool,
    depth_compare: wgpu::CompareFunction,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(shader_source.into()),
    });

    let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some(label),
        bind_group_layouts: &[bind_group_layout],
        push_constant_ranges: &[],
    });

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(&pipeline_layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Blades and the plane are visible from both sides.
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

fn create_depth_texture(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    texture.create_view(&wgpu::TextureViewDescriptor::default())
}
