//! wgpu rendering pipeline for the bear scene.
//!
//! Static vertex/index buffers are created once from the rig's meshes;
//! per-frame animation only rewrites the per-part uniform buffers (model
//! matrices from the posed scene graph). Rendering goes to an offscreen
//! color + depth target which is blitted into the egui pass over the sky
//! gradient.

use std::sync::Mutex;

use bytemuck::{Pod, Zeroable};
use eframe::wgpu;
use glam::{Mat3, Mat4, Quat, Vec3};

use crate::scene::{mesh, BearRig};
use crate::ui::camera::FOV_Y;

/// Vertex layout matching the shader.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}

/// Uniform buffer layout matching the shader.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub mvp: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub normal_mat: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub light_dir_0: [f32; 4],
    pub light_dir_1: [f32; 4],
    pub light_col_0: [f32; 4],
    pub light_col_1: [f32; 4],
    pub ambient: [f32; 4],
    pub base_color: [f32; 4],
    /// roughness, metallic, shade_mode, shadow_opacity
    pub material: [f32; 4],
    pub fog_color: [f32; 4],
    /// near, far, unused, unused
    pub fog_range: [f32; 4],
}

/// Shadow disc placement: on the ground plane under the bear.
const SHADOW_Y: f32 = -2.8;
const SHADOW_RADIUS: f32 = 2.5;
const SHADOW_OPACITY: f32 = 0.25;

/// Linear fog parameters (#F0F4F8, near 8, far 20).
const FOG_COLOR: [f32; 4] = [0.941, 0.957, 0.973, 0.0];
const FOG_NEAR: f32 = 8.0;
const FOG_FAR: f32 = 20.0;

/// One draw call's GPU resources. `node` indexes the rig's scene graph;
/// the shadow disc is renderer-owned and carries a fixed model matrix.
struct DrawCall {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    num_indices: u32,
    base_color: [f32; 4],
    material: [f32; 4],
    node: Option<usize>,
}

/// Mutable offscreen state behind a Mutex for resize support.
struct OffscreenState {
    offscreen_texture: wgpu::Texture,
    offscreen_view: wgpu::TextureView,
    depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,
    blit_bind_group: wgpu::BindGroup,
    offscreen_size: [u32; 2],
    projection_matrix: Mat4,
}

/// Per-frame scene state pushed by the app before the paint callback runs.
struct FrameState {
    model_matrices: Vec<Mat4>,
    visible: Vec<bool>,
    view_matrix: Mat4,
    camera_pos: Vec3,
}

struct LightInfo {
    /// Unit vector from the surface toward the light.
    direction: Vec3,
    color_intensity: [f32; 4],
}

/// The scene renderer. Holds all GPU resources for offscreen rendering.
pub struct SceneRenderer {
    scene_pipeline: wgpu::RenderPipeline,
    blit_pipeline: wgpu::RenderPipeline,
    draw_calls: Vec<DrawCall>,
    offscreen: Mutex<OffscreenState>,
    frame: Mutex<FrameState>,
    blit_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    lights: [LightInfo; 2],
    ambient: [f32; 4],
}

impl SceneRenderer {
    /// Create a new renderer from the assembled rig.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        rig: &BearRig,
        width: u32,
        height: u32,
    ) -> Self {
        let shader_src = include_str!("shader.wgsl");
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("bear_shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let scene_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("bear_scene_bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let scene_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("bear_scene_pl"),
                bind_group_layouts: &[&scene_bind_group_layout],
                push_constant_ranges: &[],
            });

        let offscreen_format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let scene_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("bear_scene_pipeline"),
            layout: Some(&scene_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: offscreen_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let blit_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("bear_blit_bgl"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                            view_dimension: wgpu::TextureViewDimension::D2,
                            multisampled: false,
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

        let blit_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("bear_blit_pl"),
                bind_group_layouts: &[&blit_bind_group_layout],
                push_constant_ranges: &[],
            });

        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("bear_blit_pipeline"),
            layout: Some(&blit_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_blit"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_blit"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let (offscreen_texture, offscreen_view) =
            create_color_texture(device, width, height, offscreen_format);
        let (depth_texture, depth_view) = create_depth_texture(device, width, height);

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("bear_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let blit_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bear_blit_bg"),
            layout: &blit_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&offscreen_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        });

        // One draw call per mesh-bearing node, in graph order.
        let mut draw_calls = Vec::new();
        for (node_idx, node) in rig.graph.nodes().iter().enumerate() {
            let (mesh_data, material) = match (&node.mesh, &node.material) {
                (Some(m), Some(mat)) => (m, mat),
                _ => continue,
            };

            draw_calls.push(create_draw_call(
                device,
                queue,
                &scene_bind_group_layout,
                node.name,
                mesh_data,
                material.base_color,
                [material.roughness, material.metallic, 0.0, 0.0],
                Some(node_idx),
            ));
        }

        // Ground-contact shadow, drawn last so its alpha blends over the
        // already-rendered body.
        let shadow_mesh = mesh::disc(1.0, 48);
        draw_calls.push(create_draw_call(
            device,
            queue,
            &scene_bind_group_layout,
            "contact_shadow",
            &shadow_mesh,
            [0.0, 0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0, SHADOW_OPACITY],
            None,
        ));

        let aspect = width as f32 / height as f32;
        let projection_matrix = Mat4::perspective_rh(FOV_Y, aspect, 0.1, 100.0);

        // Key light from (10, 10, 10), fill from (-10, -10, -10).
        let lights = [
            LightInfo {
                direction: Vec3::new(10.0, 10.0, 10.0).normalize(),
                color_intensity: [1.0, 1.0, 1.0, 1.5],
            },
            LightInfo {
                direction: Vec3::new(-10.0, -10.0, -10.0).normalize(),
                color_intensity: [1.0, 1.0, 1.0, 0.5],
            },
        ];

        let node_count = rig.graph.len();
        Self {
            scene_pipeline,
            blit_pipeline,
            draw_calls,
            offscreen: Mutex::new(OffscreenState {
                offscreen_texture,
                offscreen_view,
                depth_texture,
                depth_view,
                blit_bind_group,
                offscreen_size: [width, height],
                projection_matrix,
            }),
            frame: Mutex::new(FrameState {
                model_matrices: vec![Mat4::IDENTITY; node_count],
                visible: vec![true; node_count],
                view_matrix: Mat4::look_at_rh(Vec3::new(0.0, 0.0, 6.0), Vec3::ZERO, Vec3::Y),
                camera_pos: Vec3::new(0.0, 0.0, 6.0),
            }),
            blit_bind_group_layout,
            sampler,
            lights,
            ambient: [1.0, 1.0, 1.0, 0.7],
        }
    }

    /// Push the frame's posed scene state. Called by the app each frame
    /// before the paint callback fires.
    pub fn set_frame(
        &self,
        model_matrices: Vec<Mat4>,
        visible: Vec<bool>,
        view_matrix: Mat4,
        camera_pos: Vec3,
    ) {
        let mut frame = self.frame.lock().unwrap();
        frame.model_matrices = model_matrices;
        frame.visible = visible;
        frame.view_matrix = view_matrix;
        frame.camera_pos = camera_pos;
    }

    /// Resize the offscreen render target if the viewport size changed.
    pub fn resize(&self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        let mut state = self.offscreen.lock().unwrap();

        if state.offscreen_size == [width, height] {
            return;
        }
        state.offscreen_size = [width, height];

        let offscreen_format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let (tex, view) = create_color_texture(device, width, height, offscreen_format);
        state.offscreen_texture = tex;
        state.offscreen_view = view;

        let (dtex, dview) = create_depth_texture(device, width, height);
        state.depth_texture = dtex;
        state.depth_view = dview;

        state.blit_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("bear_blit_bg"),
            layout: &self.blit_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&state.offscreen_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let aspect = width as f32 / height as f32;
        state.projection_matrix = Mat4::perspective_rh(FOV_Y, aspect, 0.1, 100.0);
    }

    /// Render the scene offscreen. Call this in `prepare()`.
    pub fn render_offscreen(&self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let state = self.offscreen.lock().unwrap();
        let frame = self.frame.lock().unwrap();
        let view_proj = state.projection_matrix * frame.view_matrix;

        let shadow_model = Mat4::from_scale_rotation_translation(
            Vec3::new(SHADOW_RADIUS, 1.0, SHADOW_RADIUS),
            Quat::IDENTITY,
            Vec3::new(0.0, SHADOW_Y, 0.0),
        );

        let mut skip = vec![false; self.draw_calls.len()];
        for (i, dc) in self.draw_calls.iter().enumerate() {
            let model = match dc.node {
                Some(node) => {
                    if !frame.visible[node] {
                        skip[i] = true;
                        continue;
                    }
                    frame.model_matrices[node]
                }
                None => shadow_model,
            };

            // Inverse-transpose handles the eyes' non-uniform scale.
            let normal_mat =
                Mat4::from_mat3(Mat3::from_mat4(model).inverse().transpose());

            let uniforms = Uniforms {
                mvp: (view_proj * model).to_cols_array_2d(),
                model: model.to_cols_array_2d(),
                normal_mat: normal_mat.to_cols_array_2d(),
                camera_pos: frame.camera_pos.extend(1.0).to_array(),
                light_dir_0: self.lights[0].direction.extend(0.0).to_array(),
                light_dir_1: self.lights[1].direction.extend(0.0).to_array(),
                light_col_0: self.lights[0].color_intensity,
                light_col_1: self.lights[1].color_intensity,
                ambient: self.ambient,
                base_color: dc.base_color,
                material: dc.material,
                fog_color: FOG_COLOR,
                fog_range: [FOG_NEAR, FOG_FAR, 0.0, 0.0],
            };
            queue.write_buffer(&dc.uniform_buffer, 0, bytemuck::bytes_of(&uniforms));
        }
        drop(frame);

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("bear_offscreen_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("bear_offscreen_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &state.offscreen_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        // Transparent clear; the blit composites the sky.
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &state.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.scene_pipeline);

            for (i, dc) in self.draw_calls.iter().enumerate() {
                if skip[i] {
                    continue;
                }
                pass.set_bind_group(0, &dc.bind_group, &[]);
                pass.set_vertex_buffer(0, dc.vertex_buffer.slice(..));
                pass.set_index_buffer(dc.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..dc.num_indices, 0, 0..1);
            }
        }

        // Drop lock before submit
        drop(state);
        queue.submit(std::iter::once(encoder.finish()));
    }

    /// Blit the offscreen texture to the current render pass. Call this in `paint()`.
    pub fn blit(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        let state = self.offscreen.lock().unwrap();
        render_pass.set_pipeline(&self.blit_pipeline);
        render_pass.set_bind_group(0, Some(&state.blit_bind_group), &[]);
        drop(state);
        render_pass.draw(0..3, 0..1); // fullscreen triangle
    }
}

#[allow(clippy::too_many_arguments)]
fn create_draw_call(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    bind_group_layout: &wgpu::BindGroupLayout,
    name: &str,
    mesh_data: &mesh::MeshData,
    base_color: [f32; 4],
    material: [f32; 4],
    node: Option<usize>,
) -> DrawCall {
    let vertices: Vec<Vertex> = mesh_data
        .positions
        .iter()
        .zip(mesh_data.normals.iter())
        .map(|(p, n)| Vertex {
            position: [p.x, p.y, p.z],
            normal: [n.x, n.y, n.z],
        })
        .collect();

    let vertex_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("bear_vb_{}", name)),
        size: (vertices.len() * std::mem::size_of::<Vertex>()) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    queue.write_buffer(&vertex_buffer, 0, bytemuck::cast_slice(&vertices));

    let index_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("bear_ib_{}", name)),
        size: (mesh_data.indices.len() * std::mem::size_of::<u32>()) as u64,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });
    queue.write_buffer(&index_buffer, 0, bytemuck::cast_slice(&mesh_data.indices));

    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("bear_ub_{}", name)),
        size: std::mem::size_of::<Uniforms>() as u64,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("bear_bg_{}", name)),
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: uniform_buffer.as_entire_binding(),
        }],
    });

    DrawCall {
        vertex_buffer,
        index_buffer,
        uniform_buffer,
        bind_group,
        num_indices: mesh_data.indices.len() as u32,
        base_color,
        material,
        node,
    }
}

fn create_color_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
    format: wgpu::TextureFormat,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("bear_offscreen_color"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        view_formats: &[],
    });
    let view = texture.create_view(&Default::default());
    (texture, view)
}

fn create_depth_texture(
    device: &wgpu::Device,
    width: u32,
    height: u32,
) -> (wgpu::Texture, wgpu::TextureView) {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("bear_offscreen_depth"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Depth32Float,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = texture.create_view(&Default::default());
    (texture, view)
}
