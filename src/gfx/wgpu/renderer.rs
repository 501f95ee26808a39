//! wgpu 渲染器实现
//!
//! 本模块实现了基于 wgpu 的渲染器，包括：
//! - 渲染管线创建
//! - 帧 Uniform（MVP 矩阵、光照、着色模式）
//! - 模型上传
//! - 渲染循环（场景 + GUI）与表面丢失恢复

use tracing::{debug, info, warn};
use bytemuck::{Pod, Zeroable};
use winit::event_loop::EventLoop;

use super::backend::WgpuBackend;
use super::gpu_model::{GpuModel, MaterialResources};
use super::texture::{
    create_depth_texture, create_msaa_target, create_sampler, create_white_texture, DEPTH_FORMAT,
};
use crate::component::DirectionalLight;
use crate::core::Config;
use crate::core::error::{Result, GraphicsError};
use crate::geometry::{ModelData, Vertex};
use crate::gfx::ShadingMode;
use crate::gui::GuiManager;
use crate::math::{Matrix4, Vector3};

/// 帧 Uniform，与着色器中的 `Frame` 对应
///
/// 必须使用 #[repr(C)] 保证内存布局与着色器一致。
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct FrameUniform {
    view: [[f32; 4]; 4],
    projection: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    normal_matrix: [[f32; 4]; 4],
    light_dir: [f32; 4],
    light_color: [f32; 4],
    camera_pos: [f32; 4],
    solid_color: [f32; 4],
    params: [u32; 4],
}

/// 一帧的场景参数
pub struct SceneFrame<'a> {
    pub view: Matrix4,
    pub projection: Matrix4,
    pub model: Matrix4,
    pub camera_position: Vector3,
    pub light: &'a DirectionalLight,
    pub shading: ShadingMode,
    pub clear_color: [f32; 4],
    pub solid_color: [f32; 3],
}

impl FrameUniform {
    fn new(frame: &SceneFrame<'_>) -> Self {
        // 法线矩阵：模型矩阵的逆转置
        let normal_matrix = frame
            .model
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or(frame.model);

        let light_dir = frame.light.direction();
        let radiance = frame.light.radiance();
        let camera = frame.camera_position;

        Self {
            view: *frame.view.as_ref(),
            projection: *frame.projection.as_ref(),
            model: *frame.model.as_ref(),
            normal_matrix: *normal_matrix.as_ref(),
            light_dir: [light_dir.x, light_dir.y, light_dir.z, 0.0],
            light_color: [radiance[0], radiance[1], radiance[2], frame.light.ambient],
            camera_pos: [camera.x, camera.y, camera.z, 1.0],
            solid_color: [frame.solid_color[0], frame.solid_color[1], frame.solid_color[2], 1.0],
            params: [frame.shading.as_u32(), 0, 0, 0],
        }
    }
}

/// wgpu 渲染器
pub struct Renderer {
    gfx: WgpuBackend,

    // 渲染管线和资源
    render_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    _white_texture: wgpu::Texture,
    white_view: wgpu::TextureView,
    _depth_texture: wgpu::Texture,
    depth_view: wgpu::TextureView,

    // 多重采样
    sample_count: u32,
    msaa_target: Option<(wgpu::Texture, wgpu::TextureView)>,
}

impl Renderer {
    /// 创建窗口、设备与渲染管线
    pub fn new(event_loop: &EventLoop<()>, config: &Config) -> Result<Self> {
        info!("Creating wgpu renderer");

        // 1. 创建 wgpu 后端
        let gfx = WgpuBackend::new(event_loop, config)?;
        let device = &gfx.device;

        // 2. 加载着色器模块
        debug!("Loading shaders");
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Model Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/model.wgsl").into()),
        });

        // 3. 创建帧 Uniform Buffer
        debug!("Creating uniform buffer");
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        // 4. 创建 Bind Group Layout
        debug!("Creating bind group layouts");
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
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

        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
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
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // 5. 创建 Bind Group
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        // 6. 创建渲染管线布局
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Render Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &material_layout],
            push_constant_ranges: &[],
        });

        // 7. 创建深度纹理和多重采样目标
        debug!("Creating depth texture");
        let sample_count = supported_sample_count(&gfx, config.graphics.msaa_samples);
        let size = gfx.size();
        let (depth_texture, depth_view) =
            create_depth_texture(device, size.width, size.height, sample_count);
        let msaa_target = create_msaa_target(
            device,
            gfx.surface_format(),
            size.width,
            size.height,
            sample_count,
        );

        // 8. 创建渲染管线
        debug!("Creating render pipeline");
        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[Vertex::layout()],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[Some(wgpu::ColorTargetState {
                    format: gfx.surface_format(),
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // 导入的模型绕序不一定一致，双面绘制
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
        });

        // 9. 默认贴图和采样器
        let white_texture = create_white_texture(device, &gfx.queue);
        let white_view = white_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = create_sampler(device);

        info!("wgpu renderer created successfully");

        Ok(Self {
            gfx,
            render_pipeline,
            frame_buffer,
            frame_bind_group,
            material_layout,
            sampler,
            _white_texture: white_texture,
            white_view,
            _depth_texture: depth_texture,
            depth_view,
            sample_count,
            msaa_target,
        })
    }

    /// 后端（设备、队列、表面）
    pub fn backend(&self) -> &WgpuBackend {
        &self.gfx
    }

    /// 获取窗口引用
    pub fn window(&self) -> &winit::window::Window {
        self.gfx.window()
    }

    /// 当前宽高比
    pub fn aspect(&self) -> f32 {
        let size = self.gfx.size();
        size.width as f32 / size.height.max(1) as f32
    }

    /// 上传模型到 GPU
    pub fn upload_model(&self, model: &ModelData) -> GpuModel {
        let resources = MaterialResources {
            device: &self.gfx.device,
            queue: &self.gfx.queue,
            layout: &self.material_layout,
            sampler: &self.sampler,
            white_view: &self.white_view,
        };
        let gpu_model = GpuModel::upload(model, &resources);
        info!(
            model = %model.name,
            meshes = gpu_model.mesh_count(),
            "Model uploaded"
        );
        gpu_model
    }

    /// 处理窗口大小调整
    ///
    /// 返回 false 表示窗口被最小化，没有重新配置。
    pub fn resize(&mut self, width: u32, height: u32) -> bool {
        if !self.gfx.reconfigure_surface(width, height) {
            return false;
        }

        debug!("Resizing to {}x{}", width, height);
        let (depth_texture, depth_view) =
            create_depth_texture(&self.gfx.device, width, height, self.sample_count);
        self._depth_texture = depth_texture;
        self.depth_view = depth_view;
        self.msaa_target = create_msaa_target(
            &self.gfx.device,
            self.gfx.surface_format(),
            width,
            height,
            self.sample_count,
        );
        true
    }

    /// 绘制一帧：场景通道 + GUI 通道
    ///
    /// 表面丢失或过期时重新配置并跳过这一帧。
    pub fn render(
        &mut self,
        frame: &SceneFrame<'_>,
        model: Option<&GpuModel>,
        gui: &mut GuiManager,
    ) -> Result<()> {
        // 1. 获取交换链纹理
        let output = match self.gfx.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.gfx.recover_surface();
                let size = self.gfx.size();
                self.resize(size.width, size.height);
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Timed out acquiring surface texture, skipping frame");
                return Ok(());
            }
            Err(e) => {
                return Err(GraphicsError::SwapchainError(format!("Failed to acquire next image: {}", e)).into());
            }
        };

        let view = output.texture.create_view(&wgpu::TextureViewDescriptor::default());

        // 2. 创建命令编码器
        let mut encoder = self.gfx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });

        // 3. 更新帧 Uniform
        let uniform = FrameUniform::new(frame);
        self.gfx.queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&uniform));

        // 4. 场景渲染通道（多重采样时解析到交换链纹理）
        {
            let clear = frame.clear_color;
            let (target, resolve_target) = match &self.msaa_target {
                Some((_, msaa_view)) => (msaa_view, Some(&view)),
                None => (&view, None),
            };
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear[0] as f64,
                            g: clear[1] as f64,
                            b: clear[2] as f64,
                            a: clear[3] as f64,
                        }),
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

            if let Some(model) = model {
                render_pass.set_pipeline(&self.render_pipeline);
                render_pass.set_bind_group(0, &self.frame_bind_group, &[]);
                model.draw(&mut render_pass);
            }
        }

        // 5. GUI 渲染通道
        let size = self.gfx.size();
        let gui_commands = gui.render(
            &self.gfx.device,
            &self.gfx.queue,
            &mut encoder,
            &view,
            [size.width, size.height],
        );

        // 6. 提交命令
        self.gfx
            .queue
            .submit(gui_commands.into_iter().chain(std::iter::once(encoder.finish())));
        output.present();

        Ok(())
    }
}

/// 检查表面格式和深度格式是否支持所需的采样数，不支持时退回 1
fn supported_sample_count(gfx: &WgpuBackend, requested: u32) -> u32 {
    if requested <= 1 {
        return 1;
    }

    // 4 倍以外的采样数需要设备启用格式相关特性
    let adapter_specific = gfx
        .device
        .features()
        .contains(wgpu::Features::TEXTURE_ADAPTER_SPECIFIC_FORMAT_FEATURES);
    let color = gfx.adapter.get_texture_format_features(gfx.surface_format());
    let depth = gfx.adapter.get_texture_format_features(DEPTH_FORMAT);
    let supported = (requested == 4 || adapter_specific)
        && color.flags.sample_count_supported(requested)
        && depth.flags.sample_count_supported(requested);

    if supported {
        debug!(samples = requested, "MSAA enabled");
        requested
    } else {
        warn!(samples = requested, "MSAA sample count not supported by the adapter, disabling");
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_uniform_size_is_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<FrameUniform>(), 4 * 64 + 5 * 16);
    }

    #[test]
    fn test_frame_uniform_contents() {
        let light = DirectionalLight::new(Vector3::new(0.0, -2.0, 0.0), [1.0, 0.5, 0.25], 2.0, 0.1);
        let model = Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));
        let frame = SceneFrame {
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            model,
            camera_position: Vector3::new(0.0, 0.0, 3.0),
            light: &light,
            shading: ShadingMode::Normals,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            solid_color: [0.2, 0.45, 0.95],
        };

        let uniform = FrameUniform::new(&frame);
        assert_eq!(uniform.light_dir, [0.0, -1.0, 0.0, 0.0]);
        assert_eq!(uniform.light_color, [2.0, 1.0, 0.5, 0.1]);
        assert_eq!(uniform.camera_pos, [0.0, 0.0, 3.0, 1.0]);
        assert_eq!(uniform.params[0], 2);
        // 非均匀缩放的法线矩阵为逆转置
        assert_eq!(uniform.model[0][0], 2.0);
        assert_eq!(uniform.normal_matrix[0][0], 0.5);
    }
}
