//! wgpu tile renderer shared by the web and native front ends.
//!
//! Every tile is one instanced quad with its own texture bind group. Tiles
//! with depth testing off go through an overlay pipeline that ignores and
//! leaves the depth buffer alone, so a focused tile always draws on top.

use glam::Mat4;

use crate::camera::Camera;
use crate::error::AssetError;
use crate::tile::{SurfaceFactory, SurfaceHandle, Tile, TileRegistry};
use crate::transform::SphereGroup;

pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const TILE_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const PLACEHOLDER_RGBA: [u8; 4] = [0xdd, 0xdd, 0xdd, 0xff];

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct TileInstance {
    model: [[f32; 4]; 4],
    params: [f32; 4],
}

impl TileInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x4,
        1 => Float32x4,
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
    ];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<TileInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

struct Slot {
    width: f32,
    height: f32,
    texture: Option<(wgpu::Texture, wgpu::BindGroup)>,
}

pub struct TileRenderer {
    depth_pipeline: wgpu::RenderPipeline,
    overlay_pipeline: wgpu::RenderPipeline,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    texture_bgl: wgpu::BindGroupLayout,
    placeholder: (wgpu::Texture, wgpu::BindGroup),
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    depth_view: wgpu::TextureView,
    slots: Vec<Slot>,
    width: u32,
    height: u32,
    pub clear_color: wgpu::Color,
}

impl TileRenderer {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("tiles_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::TILES_WGSL.into()),
        });
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tiles_globals_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let texture_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tiles_texture_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
        });
        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("tiles_globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("tiles_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("tiles_globals_bg"),
            layout: &globals_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: globals_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tiles_pipeline_layout"),
            bind_group_layouts: &[&globals_bgl, &texture_bgl],
            push_constant_ranges: &[],
        });
        let depth_pipeline = make_tile_pipeline(
            device,
            &layout,
            &shader,
            color_format,
            wgpu::CompareFunction::Less,
            true,
        );
        let overlay_pipeline = make_tile_pipeline(
            device,
            &layout,
            &shader,
            color_format,
            wgpu::CompareFunction::Always,
            false,
        );
        let placeholder = create_tile_texture(device, queue, &texture_bgl, 1, 1, &PLACEHOLDER_RGBA);
        let instance_capacity = 64;
        let instance_buffer = create_instance_buffer(device, instance_capacity);
        let depth_view = create_depth_view(device, width, height);
        Self {
            depth_pipeline,
            overlay_pipeline,
            globals_buffer,
            globals_bind_group,
            texture_bgl,
            placeholder,
            instance_buffer,
            instance_capacity,
            depth_view,
            slots: Vec::new(),
            width: width.max(1),
            height: height.max(1),
            clear_color: wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.0,
                a: 1.0,
            },
        }
    }

    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 || (width == self.width && height == self.height) {
            return;
        }
        self.width = width;
        self.height = height;
        self.depth_view = create_depth_view(device, width, height);
    }

    /// Replace a quad's placeholder with decoded RGBA8 pixels.
    pub fn upload_rgba(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface: SurfaceHandle,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<(), AssetError> {
        let slot = self
            .slots
            .get_mut(surface.0 as usize)
            .ok_or(AssetError::UnknownTile(surface.0))?;
        if width == 0 || height == 0 {
            return Err(AssetError::EmptyImage {
                url: format!("surface {}", surface.0),
            });
        }
        if rgba.len() < (width as usize) * (height as usize) * 4 {
            return Err(AssetError::Load {
                url: format!("surface {}", surface.0),
                reason: format!("{} bytes for {}x{} RGBA", rgba.len(), width, height),
            });
        }
        slot.texture = Some(create_tile_texture(
            device,
            queue,
            &self.texture_bgl,
            width,
            height,
            rgba,
        ));
        log::debug!(
            "[gpu] surface {} texture {}x{} ({}x{} quad)",
            surface.0,
            width,
            height,
            slot.width,
            slot.height
        );
        Ok(())
    }

    /// Draw all tiles into `target`. Depth-tested tiles go first, overlay
    /// tiles last. Within each pass `draw_order` decides first; only tiles
    /// with equal `draw_order` are drawn back to front.
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target: &wgpu::TextureView,
        camera: &Camera,
        group: &SphereGroup,
        tiles: &TileRegistry,
    ) {
        let globals = Globals {
            view_proj: camera.view_proj().to_cols_array_2d(),
        };
        queue.write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let group_m = group.world_matrix();
        let mut order: Vec<(&Tile, f32)> = tiles
            .iter()
            .filter(|t| t.opacity > 0.0)
            .map(|t| {
                let world = group_m.transform_point3(t.transform.position);
                (t, world.distance_squared(camera.eye))
            })
            .collect();
        order.sort_by(|(a, da), (b, db)| {
            (!a.depth_test)
                .cmp(&!b.depth_test)
                .then(a.draw_order.cmp(&b.draw_order))
                .then(db.total_cmp(da))
        });

        let instances: Vec<TileInstance> = order
            .iter()
            .map(|(t, _)| TileInstance {
                model: tile_model(group_m, t).to_cols_array_2d(),
                params: [t.opacity, 0.0, 0.0, 0.0],
            })
            .collect();
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("tiles_encoder"),
        });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("tiles_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.globals_bind_group, &[]);
            rpass.set_vertex_buffer(0, self.instance_buffer.slice(..));
            let mut overlay = None;
            for (i, (tile, _)) in order.iter().enumerate() {
                if overlay != Some(!tile.depth_test) {
                    overlay = Some(!tile.depth_test);
                    rpass.set_pipeline(if tile.depth_test {
                        &self.depth_pipeline
                    } else {
                        &self.overlay_pipeline
                    });
                }
                let bind_group = self
                    .slots
                    .get(tile.surface.0 as usize)
                    .and_then(|s| s.texture.as_ref())
                    .map(|(_, bg)| bg)
                    .unwrap_or(&self.placeholder.1);
                rpass.set_bind_group(1, bind_group, &[]);
                let i = i as u32;
                rpass.draw(0..6, i..i + 1);
            }
        }
        queue.submit(Some(encoder.finish()));
    }
}

impl SurfaceFactory for TileRenderer {
    fn create_quad(&mut self, width: f32, height: f32) -> SurfaceHandle {
        let handle = SurfaceHandle(self.slots.len() as u32);
        self.slots.push(Slot {
            width,
            height,
            texture: None,
        });
        handle
    }
}

fn tile_model(group_m: Mat4, tile: &Tile) -> Mat4 {
    group_m * tile.transform.matrix() * Mat4::from_scale(tile.base_size.extend(1.0))
}

fn make_tile_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    color_format: wgpu::TextureFormat,
    depth_compare: wgpu::CompareFunction,
    depth_write_enabled: bool,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("tiles_pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_tile"),
            buffers: &[TileInstance::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            cull_mode: None,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_tile"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("tiles_instances"),
        size: (capacity * std::mem::size_of::<TileInstance>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("tiles_depth"),
        size: wgpu::Extent3d {
            width: width.max(1),
            height: height.max(1),
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_tile_texture(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    width: u32,
    height: u32,
    rgba: &[u8],
) -> (wgpu::Texture, wgpu::BindGroup) {
    let size = wgpu::Extent3d {
        width,
        height,
        depth_or_array_layers: 1,
    };
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("tile_texture"),
        size,
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: TILE_TEXTURE_FORMAT,
        usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
        view_formats: &[],
    });
    queue.write_texture(
        wgpu::TexelCopyTextureInfo {
            texture: &tex,
            mip_level: 0,
            origin: wgpu::Origin3d::ZERO,
            aspect: wgpu::TextureAspect::All,
        },
        &rgba[..(width as usize) * (height as usize) * 4],
        wgpu::TexelCopyBufferLayout {
            offset: 0,
            bytes_per_row: Some(4 * width),
            rows_per_image: Some(height),
        },
        size,
    );
    let view = tex.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("tile_texture_bg"),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::TextureView(&view),
        }],
    });
    (tex, bind_group)
}

