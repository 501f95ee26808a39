//! GripXel - 桌面 3D 模型查看器
//!
//! 打开一个窗口，通过导入对话框（或拖放）加载 OBJ / glTF / GLB / STL
//! （以及启用 `assimp` 特性时的 FBX）模型，用可移动的相机和基础光照
//! 渲染，并叠加 egui 菜单与信息面板。
//!
//! # 模块结构
//!
//! - `core`: 核心功能模块（日志、配置、场景配置、错误处理、输入）
//! - `math`: nalgebra 类型别名与矩阵工具
//! - `component`: 相机、模型变换、撤销历史、光源
//! - `geometry`: 模型数据与各格式加载器
//! - `gfx`: wgpu 渲染后端
//! - `gui`: egui 菜单、面板与文件对话框
//! - `viewer`: 事件循环与交互逻辑
//!
//! # 使用示例
//!
//! ```no_run
//! use gripxel::geometry::load_model;
//! use std::path::Path;
//!
//! let model = load_model(Path::new("models/teapot.obj")).unwrap();
//! println!("{} triangles", model.total_triangles());
//! ```

pub mod core;
pub mod math;
pub mod component;
pub mod geometry;
pub mod gfx;
pub mod gui;
pub mod viewer;

pub use viewer::Viewer;
