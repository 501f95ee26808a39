//! 核心功能模块
//!
//! 本模块提供了查看器的基础功能，包括日志系统、配置管理、错误处理和输入处理。
//! 这些模块独立于具体的图形 API。
//!
//! # 模块组织
//!
//! - `log`：日志系统，提供结构化的日志记录功能
//! - `config`：配置管理，支持从配置文件加载设置
//! - `scene`：场景配置（背景色、光照、启动模型）
//! - `error`：错误处理，定义统一的错误类型
//! - `input`：键盘与鼠标输入，转换为相机和模型操作

pub mod log;
pub mod config;
pub mod scene;
pub mod error;
pub mod input;

// 重新导出常用类型，方便使用
pub use error::{Result, GripxelError};
pub use config::Config;
pub use scene::SceneConfig;
pub use input::{InputSystem, MouseMotion, ViewerCommand};
