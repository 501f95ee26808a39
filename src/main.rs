//! GripXel - 桌面 3D 模型查看器
//!
//! # 使用方法
//!
//! ```bash
//! # 使用配置文件
//! cargo run
//!
//! # 启动时直接打开模型，并覆盖窗口尺寸
//! cargo run -- models/teapot.obj --width 1280 --height 720
//! ```
//!
//! # 架构概览
//!
//! ```text
//! ┌─────────────┐
//! │   main.rs   │  应用程序入口（配置、日志）
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Viewer    │  事件循环、输入、导入流程
//! └──────┬──────┘
//!        │
//!   ┌────┴─────┐
//!   │          │
//! ┌─▼──────┐ ┌─▼──┐
//! │Renderer│ │GUI │  wgpu 场景通道 + egui 通道
//! └────────┘ └────┘
//! ```

use anyhow::Context;
use gripxel::core::{log, Config, SceneConfig};
use gripxel::Viewer;
use tracing::info;
use winit::event_loop::EventLoop;

/// 应用程序入口点
///
/// # 初始化流程
///
/// 1. 加载配置文件（config.toml）
/// 2. 应用命令行参数覆盖
/// 3. 初始化日志系统
/// 4. 加载场景配置文件（scene.toml）
/// 5. 创建事件循环和查看器
/// 6. 启动主循环
///
/// # 命令行参数
///
/// - `--width <value>`: 设置窗口宽度
/// - `--height <value>`: 设置窗口高度
/// - `--no-vsync`: 关闭垂直同步
/// - `--log-level <level>`: 设置日志级别
/// - `<path>`: 启动时打开的模型
fn main() -> anyhow::Result<()> {
    // 1. 加载配置（在初始化日志之前）
    let mut config = Config::from_file_or_default("config.toml");

    // 2. 应用命令行参数
    config.apply_args(std::env::args());
    config.validate().context("Invalid configuration")?;

    // 3. 初始化日志系统
    let log_file = config
        .logging
        .file_output
        .then_some(config.logging.log_file.as_str());
    log::init_logger(config.logging.level, config.logging.file_output, log_file);
    info!("GripXel starting...");
    info!(version = env!("CARGO_PKG_VERSION"), "Application initialized");

    // 4. 加载场景配置
    let scene = SceneConfig::from_file_or_default("scene.toml");

    info!(
        width = config.window.width,
        height = config.window.height,
        vsync = config.graphics.vsync,
        "Window configuration"
    );
    info!(
        model_path = ?scene.model.path,
        light_direction = ?scene.light.direction,
        "Scene configuration"
    );

    // 5. 创建事件循环和查看器
    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let viewer = Viewer::new(&event_loop, config, scene).context("Failed to initialize viewer")?;
    info!("Viewer initialized successfully");

    // 6. 启动事件循环
    viewer.run(event_loop).context("Event loop terminated with an error")?;
    Ok(())
}
