//! WGPU-based rendering engine for the grab scene viewer
//!
//! Two passes per frame: a depth-only shadow pass renders the shapes from
//! the overhead light, then the forward pass draws the floor, every shape
//! and the device rays with depth testing and a shadow map lookup.
//! Geometry is uploaded once per mesh kind; per-object data (model matrix,
//! base color, emissive) lives in a dynamic-offset uniform buffer rewritten
//! every frame and shared by both passes.

use std::collections::HashMap;

use cgmath::Matrix4;
use log::{debug, info, warn};
use wgpu::util::DeviceExt;
use wgpu::TextureFormat;

use super::frame::{FrameRenderer, SceneView};
use super::shadow::ShadowLight;
use crate::error::GrabError;
use crate::gfx::{
    camera::camera_utils::CameraUniform,
    geometry::{generate_box, generate_plane, GeometryData, ShapeKind},
    resources::texture_resource::TextureResource,
    scene::vertex::Vertex3D,
};
use crate::wgpu_utils::{binding_types, DynamicUniformBuffer, UniformBuffer};

/// Floor color (0xeeeeee)
const FLOOR_COLOR: [f32; 4] = [0.933, 0.933, 0.933, 1.0];
/// Hemisphere sky color (0x808080)
const SKY_COLOR: [f32; 4] = [0.502, 0.502, 0.502, 1.0];
/// Hemisphere ground color (0x606060)
const GROUND_COLOR: [f32; 4] = [0.376, 0.376, 0.376, 1.0];
/// Ray colors per device
const RAY_COLORS: [[f32; 4]; 2] = [[1.0, 0.9, 0.2, 1.0], [0.2, 1.0, 0.6, 1.0]];
/// Cross-section of the ray bars
const RAY_THICKNESS: f32 = 0.004;

/// Shared scene uniforms. MUST match `Globals` in shader.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    view_proj: [[f32; 4]; 4],
    view_position: [f32; 4],
    sky_color: [f32; 4],
    ground_color: [f32; 4],
    light_direction: [f32; 4],
    light_color: [f32; 4],
    light_view_proj: [[f32; 4]; 4],
}

impl GlobalUniform {
    fn new(camera: CameraUniform, light: &ShadowLight) -> Self {
        let direction = light.direction();
        Self {
            view_proj: camera.view_proj,
            view_position: camera.view_position,
            sky_color: SKY_COLOR,
            ground_color: GROUND_COLOR,
            light_direction: [direction.x, direction.y, direction.z, 0.0],
            light_color: [1.0, 1.0, 1.0, 1.0],
            light_view_proj: light.view_proj().into(),
        }
    }
}

/// Per-draw uniforms. MUST match `DrawUniform` in shader.wgsl.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    model: [[f32; 4]; 4],
    base_color: [f32; 4],
    emissive: [f32; 4],
}

impl DrawUniform {
    fn new(model: Matrix4<f32>, base_color: [f32; 4], emissive: [f32; 3]) -> Self {
        Self {
            model: model.into(),
            base_color,
            emissive: [emissive[0], emissive[1], emissive[2], 0.0],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum MeshKey {
    Shape(ShapeKind),
    Floor,
    RayBar,
}

impl MeshKey {
    /// Only shapes are drawn into the shadow map; floor and rays just receive
    fn casts_shadow(self) -> bool {
        matches!(self, MeshKey::Shape(_))
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuMesh {
    fn upload(device: &wgpu::Device, label: &str, geometry: &GeometryData) -> Self {
        let vertices: Vec<Vertex3D> = geometry.to_vertices();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: geometry.indices.len() as u32,
        }
    }
}

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pipeline: wgpu::RenderPipeline,
    shadow_pipeline: wgpu::RenderPipeline,
    shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup,
    light: ShadowLight,
    globals: UniformBuffer<GlobalUniform>,
    globals_bind_group: wgpu::BindGroup,
    draws: DynamicUniformBuffer<DrawUniform>,
    draw_layout: wgpu::BindGroupLayout,
    draw_bind_group: wgpu::BindGroup,
    meshes: HashMap<MeshKey, GpuMesh>,
    background: wgpu::Color,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// # Arguments
    /// * `window` - Window surface target for rendering
    /// * `width` - Initial surface width in pixels
    /// * `height` - Initial surface height in pixels
    /// * `background` - Clear color (linear RGB)
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
        background: [f32; 3],
    ) -> Result<RenderEngine, GrabError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .map_err(|e| GrabError::Render(format!("failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| GrabError::Render(format!("no suitable adapter: {e}")))?;
        info!("Using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .map_err(|e| GrabError::Render(format!("failed to request device: {e}")))?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| GrabError::Render("surface reports no formats".to_string()))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_texture = TextureResource::create_depth_texture(&device, &config, "depth_texture");

        let light = ShadowLight::default();
        let shadow_map = TextureResource::create_shadow_map(&device, light.map_size);

        // Bindings: group 0 = globals, group 1 = per-draw (dynamic offset)
        let globals = UniformBuffer::<GlobalUniform>::new(&device);
        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: binding_types::uniform(),
                count: None,
            }],
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals.binding_resource(),
            }],
        });

        let draws = DynamicUniformBuffer::<DrawUniform>::new(&device, 64);
        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Draw Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: binding_types::dynamic_uniform::<DrawUniform>(),
                count: None,
            }],
        });
        let draw_bind_group = Self::create_draw_bind_group(&device, &draw_layout, &draws);

        // Group 2 = shadow map, main pass only (the shadow pass writes it)
        let shadow_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Shadow Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::depth_texture_2d(),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: binding_types::comparison_sampler(),
                    count: None,
                },
            ],
        });
        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Shadow Bind Group"),
            layout: &shadow_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&shadow_map.sampler),
                },
            ],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shader.wgsl").into()),
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &draw_layout, &shadow_layout],
            push_constant_ranges: &[],
        });
        let shadow_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[&globals_layout, &draw_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex3D::desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // Floor and torus are seen from both sides
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        // Depth only; no culling so thin shapes and the torus cast from both sides
        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Shadow Pipeline"),
            layout: Some(&shadow_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_shadow"),
                buffers: &[Vertex3D::desc()],
                compilation_options: Default::default(),
            },
            fragment: None,
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: TextureResource::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let mut meshes = HashMap::new();
        for kind in ShapeKind::ALL {
            meshes.insert(
                MeshKey::Shape(kind),
                GpuMesh::upload(&device, kind.name(), &kind.geometry()),
            );
        }
        meshes.insert(
            MeshKey::Floor,
            GpuMesh::upload(&device, "Floor", &generate_plane(4.0, 4.0)),
        );
        // Unit-length bar from the origin along -Z, stretched per frame
        meshes.insert(
            MeshKey::RayBar,
            GpuMesh::upload(
                &device,
                "Ray",
                &generate_box(RAY_THICKNESS, RAY_THICKNESS, 1.0).translated([0.0, 0.0, -0.5]),
            ),
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_texture,
            format,
            pipeline,
            shadow_pipeline,
            shadow_map,
            shadow_bind_group,
            light,
            globals,
            globals_bind_group,
            draws,
            draw_layout,
            draw_bind_group,
            meshes,
            background: wgpu::Color {
                r: background[0] as f64,
                g: background[1] as f64,
                b: background[2] as f64,
                a: 1.0,
            },
        })
    }

    fn create_draw_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        draws: &DynamicUniformBuffer<DrawUniform>,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Draw Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: draws.binding_resource(),
            }],
        })
    }

    /// Updates the camera part of the global uniforms
    pub fn update(&mut self, camera_uniform: CameraUniform) {
        self.globals
            .update_content(&self.queue, GlobalUniform::new(camera_uniform, &self.light));
    }

    /// The shadow-casting light
    pub fn light(&self) -> &ShadowLight {
        &self.light
    }

    /// Resizes the render engine surface and recreates depth buffer
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Returns current surface dimensions
    pub fn get_surface_size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Returns the surface texture format
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    /// Draw list for a frame: floor, shapes, then rays of tracked devices
    fn collect_draws(view: &SceneView<'_>) -> Vec<(MeshKey, DrawUniform)> {
        let mut draws = Vec::with_capacity(view.objects.len() + 3);
        draws.push((
            MeshKey::Floor,
            DrawUniform::new(Matrix4::from_scale(1.0), FLOOR_COLOR, [0.0; 3]),
        ));

        for object in &view.objects {
            draws.push((
                MeshKey::Shape(object.kind),
                DrawUniform::new(
                    object.world.to_matrix(),
                    object.material.base_color,
                    object.material.emissive,
                ),
            ));
        }

        for device in view.devices.iter().filter(|device| device.tracked) {
            let model = device.pose.to_matrix()
                * Matrix4::from_nonuniform_scale(1.0, 1.0, device.ray_length);
            draws.push((
                MeshKey::RayBar,
                DrawUniform::new(model, RAY_COLORS[device.id.index()], [0.3; 3]),
            ));
        }
        draws
    }
}

impl FrameRenderer for RenderEngine {
    fn render_frame(&mut self, view: &SceneView<'_>) -> Result<(), GrabError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                debug!("Surface lost or outdated; reconfiguring");
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface timeout; skipping frame {}", view.frame);
                return Ok(());
            }
            Err(e) => return Err(GrabError::Render(e.to_string())),
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let draws = Self::collect_draws(view);
        let uniforms: Vec<DrawUniform> = draws.iter().map(|(_, uniform)| *uniform).collect();
        if self.draws.write(&self.device, &self.queue, &uniforms) {
            self.draw_bind_group =
                Self::create_draw_bind_group(&self.device, &self.draw_layout, &self.draws);
        }

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: shapes into the shadow map (floor and rays only receive)
        {
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Shadow Depth Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            shadow_pass.set_pipeline(&self.shadow_pipeline);
            shadow_pass.set_bind_group(0, &self.globals_bind_group, &[]);

            for (slot, (key, _)) in draws.iter().enumerate() {
                if !key.casts_shadow() {
                    continue;
                }
                let Some(mesh) = self.meshes.get(key) else {
                    continue;
                };
                shadow_pass.set_bind_group(1, &self.draw_bind_group, &[self.draws.offset(slot)]);
                shadow_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                shadow_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                shadow_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        // PASS 2: lit scene with shadow lookup
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.background),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);
            render_pass.set_bind_group(2, &self.shadow_bind_group, &[]);

            for (slot, (key, _)) in draws.iter().enumerate() {
                let Some(mesh) = self.meshes.get(key) else {
                    continue;
                };
                render_pass.set_bind_group(1, &self.draw_bind_group, &[self.draws.offset(slot)]);
                render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::rendering::frame::{DeviceView, ObjectView};
    use crate::gfx::resources::Material;
    use crate::gfx::scene::object::{ObjectId, Owner};
    use crate::gfx::scene::transform::Transform;
    use crate::input::DeviceId;
    use cgmath::Vector3;

    #[test]
    fn test_uniform_sizes_match_shader_layout() {
        // Two mat4x4 + five vec4 in Globals, one mat4x4 + two vec4 per draw
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 2 * 64 + 5 * 16);
        assert_eq!(std::mem::size_of::<DrawUniform>(), 64 + 2 * 16);
    }

    #[test]
    fn test_draw_list_order_and_shadow_casters() {
        let material = Material::default();
        let device = |id: DeviceId, tracked| DeviceView {
            id,
            pose: Transform::from_position(Vector3::new(0.0, 1.6, 3.0)),
            tracked,
            ray_length: 2.5,
            holding: None,
        };
        let view = SceneView {
            frame: 1,
            objects: vec![ObjectView {
                id: ObjectId(0),
                kind: ShapeKind::Torus,
                world: Transform::identity(),
                material: &material,
                owner: Owner::Pool,
            }],
            devices: [device(DeviceId::Left, true), device(DeviceId::Right, false)],
        };

        let draws = RenderEngine::collect_draws(&view);
        let keys: Vec<MeshKey> = draws.iter().map(|(key, _)| *key).collect();
        assert_eq!(
            keys,
            vec![MeshKey::Floor, MeshKey::Shape(ShapeKind::Torus), MeshKey::RayBar]
        );

        let casters: Vec<MeshKey> = keys.into_iter().filter(|key| key.casts_shadow()).collect();
        assert_eq!(casters, vec![MeshKey::Shape(ShapeKind::Torus)]);

        // Ray bar is stretched along its length
        let ray = draws[2].1;
        assert!((ray.model[2][2] - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_globals_carry_light_from_above() {
        let light = ShadowLight::default();
        let globals = GlobalUniform::new(CameraUniform::default(), &light);
        assert_eq!(globals.light_direction, [0.0, 1.0, 0.0, 0.0]);
        let expected: [[f32; 4]; 4] = light.view_proj().into();
        assert_eq!(globals.light_view_proj, expected);
    }
}
