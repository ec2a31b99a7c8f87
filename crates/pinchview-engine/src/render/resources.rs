use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::config::ViewerConfig;
use crate::device::{Gpu, GpuInit};
use crate::error::{SetupError, SetupResult};
use crate::geometry::{self, Vertex};
use crate::uniform::{Uniform, UNIFORM_SIZE};

use super::shader::{self, ShaderSource, FRAGMENT_ENTRY, VERTEX_ENTRY};
use super::texture::{self, QuadTexture};

/// Vertex buffer slot of the quad geometry.
pub const VERTEX_BUFFER_SLOT: u32 = 0;
/// Bind group holding uniform, texture and sampler.
pub const BIND_GROUP_INDEX: u32 = 0;
pub const UNIFORM_BINDING: u32 = 0;
pub const TEXTURE_BINDING: u32 = 1;
pub const SAMPLER_BINDING: u32 = 2;

/// Every GPU object the viewer uses, created once and dropped together.
///
/// Construction runs the setup protocol in order and stops at the first
/// failure:
/// 1. device, 2. queue ([`Gpu::new`]),
/// 3. shader + pipeline for the surface format,
/// 4. texture,
/// 5. vertex buffer (written once),
/// 6. uniform buffer (rewritten every frame).
pub struct GpuResources<'w> {
    // Field order is drop order: GPU objects go before the device/surface.
    quad: QuadResources,
    gpu: Gpu<'w>,
}

impl<'w> GpuResources<'w> {
    pub fn new(window: &'w Window, gpu_init: GpuInit, config: &ViewerConfig) -> SetupResult<Self> {
        log::debug!("setup: acquiring device and queue");
        let gpu = pollster::block_on(Gpu::new(window, gpu_init))?;
        let quad = QuadResources::new(gpu.device(), gpu.queue(), gpu.surface_format(), config)?;

        let (width, height) = quad.image_size();
        log::info!("setup complete: {width}x{height} image, {:?} surface", gpu.surface_format());
        Ok(Self { quad, gpu })
    }

    pub fn gpu(&self) -> &Gpu<'w> {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut Gpu<'w> {
        &mut self.gpu
    }

    /// Overwrites the uniform buffer in place.
    pub fn write_uniform(&self, uniform: &Uniform) {
        self.gpu
            .queue()
            .write_buffer(&self.quad.uniform_buffer, 0, uniform.as_bytes());
    }

    /// Records the quad draw into `encoder`, clearing `target` first.
    pub fn encode_draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: wgpu::Color,
    ) {
        self.quad.encode_draw(encoder, target, clear);
    }
}

/// Setup steps 3 to 6: everything that only needs a device and a queue.
pub struct QuadResources {
    pipeline: wgpu::RenderPipeline,
    bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    texture: QuadTexture,
}

impl QuadResources {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        format: wgpu::TextureFormat,
        config: &ViewerConfig,
    ) -> SetupResult<Self> {
        log::debug!("setup: compiling shader `{}`", config.shader.label);
        let (pipeline, bind_group_layout) = create_pipeline(device, &config.shader, format)?;

        log::debug!("setup: loading texture `{}`", config.texture.name());
        let image = texture::decode(&config.texture)?;
        let texture = QuadTexture::upload(device, queue, &image)?;
        log::debug!("setup: uploaded texture `{}`", image.name);

        log::debug!("setup: allocating buffers");
        let vertices = geometry::quad_vertices(texture.width, texture.height);
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("pinchview quad vbo"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("pinchview uniform ubo"),
            size: UNIFORM_SIZE as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("pinchview bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: UNIFORM_BINDING,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: TEXTURE_BINDING,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: SAMPLER_BINDING,
                    resource: wgpu::BindingResource::Sampler(&texture.sampler),
                },
            ],
        });

        Ok(Self {
            pipeline,
            bind_group,
            vertex_buffer,
            uniform_buffer,
            texture,
        })
    }

    /// Size of the uploaded image in pixels.
    pub fn image_size(&self) -> (u32, u32) {
        (self.texture.width, self.texture.height)
    }

    fn encode_draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        clear: wgpu::Color,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("pinchview quad pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(VERTEX_BUFFER_SLOT, self.vertex_buffer.slice(..));
        rpass.set_bind_group(BIND_GROUP_INDEX, &self.bind_group, &[]);
        rpass.draw(0..geometry::QUAD_VERTEX_COUNT, 0..1);
    }
}

fn create_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some("pinchview bgl"),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: UNIFORM_BINDING,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: wgpu::BufferSize::new(UNIFORM_SIZE as u64),
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: TEXTURE_BINDING,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: SAMPLER_BINDING,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

/// Compiles `shader` and links it against the quad's vertex layout and
/// bind group layout.
///
/// Mismatches that naga alone cannot see (binding types, vertex input
/// formats, uniform size) are raised by wgpu as validation errors; they are
/// captured in an error scope and returned as `PipelineCreation`.
fn create_pipeline(
    device: &wgpu::Device,
    shader: &ShaderSource,
    format: wgpu::TextureFormat,
) -> SetupResult<(wgpu::RenderPipeline, wgpu::BindGroupLayout)> {
    shader::validate(shader)?;

    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("pinchview quad shader"),
        source: wgpu::ShaderSource::Wgsl(shader.wgsl.clone()),
    });

    let bind_group_layout = create_bind_group_layout(device);
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("pinchview pipeline layout"),
        bind_group_layouts: &[&bind_group_layout],
        immediate_size: 0,
    });

    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("pinchview quad pipeline"),
        layout: Some(&layout),

        vertex: wgpu::VertexState {
            module: &module,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: &[Vertex::layout()],
        },

        fragment: Some(wgpu::FragmentState {
            module: &module,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),

        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },

        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    });

    if let Some(err) = pollster::block_on(scope.pop()) {
        return Err(SetupError::PipelineCreation(format!("shader `{}`: {err}", shader.label)));
    }

    Ok((pipeline, bind_group_layout))
}
