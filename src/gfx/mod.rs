//! 图形后端模块
//!
//! 基于 wgpu 的渲染实现（支持 Vulkan、Metal、DX12、OpenGL），
//! 以及与后端无关的着色模式定义。

mod shading;
pub mod wgpu;

pub use shading::ShadingMode;
pub use self::wgpu::{GpuModel, Renderer, SceneFrame, WgpuBackend};
