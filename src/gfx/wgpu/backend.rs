//! wgpu 后端设备管理
//!
//! 本模块负责 wgpu 图形设备的初始化和管理，包括：
//! - 创建 wgpu 实例
//! - 创建窗口和窗口表面
//! - 选择和创建图形适配器
//! - 创建逻辑设备和命令队列
//! - 配置交换链

use std::sync::Arc;
use tracing::{info, debug};
use winit::dpi::PhysicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use crate::core::Config;
use crate::core::error::{Result, GraphicsError};

/// wgpu 图形后端
///
/// 封装了 wgpu 的核心设备和表面管理。
pub struct WgpuBackend {
    /// wgpu 实例（入口点）
    pub instance: wgpu::Instance,
    /// 窗口表面
    pub surface: wgpu::Surface<'static>,
    /// 图形适配器（GPU）
    pub adapter: wgpu::Adapter,
    /// 逻辑设备
    pub device: wgpu::Device,
    /// 命令队列
    pub queue: wgpu::Queue,
    /// 表面配置
    pub surface_config: wgpu::SurfaceConfiguration,
    /// 窗口引用
    window: Arc<Window>,
}

impl WgpuBackend {
    /// 创建窗口并初始化 wgpu 设备
    pub fn new(event_loop: &EventLoop<()>, config: &Config) -> Result<Self> {
        info!("Initializing wgpu backend");

        // 1. 创建 wgpu 实例
        debug!("Creating wgpu instance");
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),  // 支持所有后端（Vulkan, Metal, DX12, OpenGL）
            dx12_shader_compiler: Default::default(),
            flags: wgpu::InstanceFlags::default(),
            gles_minor_version: wgpu::Gles3MinorVersion::Automatic,
        });

        // 2. 创建窗口
        debug!("Creating window");
        let window = WindowBuilder::new()
            .with_title(config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                config.window.width,
                config.window.height,
            ))
            .with_resizable(config.window.resizable)
            .build(event_loop)
            .map_err(|e| GraphicsError::DeviceCreation(format!("Failed to create window: {}", e)))?;

        let window = Arc::new(window);

        // 3. 创建表面（wgpu 0.19 API）
        debug!("Creating surface");
        let surface = instance.create_surface(window.clone())
            .map_err(|e| GraphicsError::DeviceCreation(format!("Failed to create surface: {}", e)))?;

        // 4. 请求适配器（选择 GPU）
        debug!("Requesting adapter");
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,  // 优先选择高性能 GPU
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .ok_or_else(|| GraphicsError::DeviceCreation("Failed to find suitable adapter".to_string()))?;

        let adapter_info = adapter.get_info();
        info!(
            name = %adapter_info.name,
            backend = ?adapter_info.backend,
            "Selected adapter"
        );

        // 5. 请求设备和队列
        debug!("Requesting device and queue");
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Main Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default().using_resolution(adapter.limits()),
            },
            None,  // 不跟踪 API 调用
        ))
        .map_err(|e| GraphicsError::DeviceCreation(format!("Failed to create device: {}", e)))?;

        // 6. 配置表面
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())  // 优先选择 sRGB 格式
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| GraphicsError::DeviceCreation("Surface reports no formats".to_string()))?;

        debug!("Surface format: {:?}", surface_format);

        let present_mode = if config.graphics.vsync {
            wgpu::PresentMode::Fifo  // 垂直同步
        } else if surface_caps.present_modes.contains(&wgpu::PresentMode::Immediate) {
            wgpu::PresentMode::Immediate  // 立即呈现
        } else {
            wgpu::PresentMode::Fifo
        };

        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let size = window.inner_size();
        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        surface.configure(&device, &surface_config);

        info!("wgpu backend initialized successfully");

        Ok(Self {
            instance,
            surface,
            adapter,
            device,
            queue,
            surface_config,
            window,
        })
    }

    /// 获取窗口引用
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// 当前表面尺寸
    pub fn size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(self.surface_config.width, self.surface_config.height)
    }

    /// 表面颜色格式
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_config.format
    }

    /// 重新配置表面（用于窗口调整）
    ///
    /// 尺寸为 0（窗口最小化）时忽略。
    pub fn reconfigure_surface(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        true
    }

    /// 以当前配置重新配置表面（表面丢失后恢复）
    pub fn recover_surface(&mut self) {
        let size = self.window.inner_size();
        if !self.reconfigure_surface(size.width, size.height) {
            self.surface.configure(&self.device, &self.surface_config);
        }
    }
}
