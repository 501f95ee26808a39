//! wgpu 图形后端实现
//!
//! wgpu 是一个跨平台的图形 API，可以在 Vulkan、Metal、DirectX 12、OpenGL
//! 等多种后端上运行。
//!
//! # 模块结构
//!
//! - `backend` - WgpuBackend 结构（窗口、设备初始化和管理）
//! - `renderer` - Renderer 结构（管线与渲染循环）
//! - `gpu_model` - 上传到 GPU 的模型
//! - `texture` - 纹理、深度缓冲和采样器

mod backend;
mod gpu_model;
mod renderer;
mod texture;

pub use backend::WgpuBackend;
pub use gpu_model::GpuModel;
pub use renderer::{Renderer, SceneFrame};
