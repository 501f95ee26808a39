//! 日志系统模块
//!
//! 基于 `tracing` 提供结构化的日志记录功能。
//!
//! # 特性
//!
//! - 结构化日志：支持键值对
//! - 灵活输出：支持控制台和文件输出
//! - 日志级别：trace, debug, info, warn, error
//! - `RUST_LOG` 环境变量优先于配置文件中的级别
//!
//! # 使用示例
//!
//! ```no_run
//! use gripxel::core::log;
//! use gripxel::core::config::LogLevel;
//!
//! log::init_logger(LogLevel::Info, false, None);
//! tracing::info!(width = 1000, height = 800, "Window created");
//! ```

use tracing::Level;
use tracing_subscriber::{
    fmt,
    prelude::*,
    EnvFilter,
};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use std::path::Path;

use super::config::LogLevel;

/// 默认日志文件名
const DEFAULT_LOG_FILE: &str = "gripxel.log";

/// 初始化日志系统
///
/// 必须在程序开始时调用一次。
///
/// # 参数
///
/// * `level` - 日志级别
/// * `file_output` - 是否输出到文件
/// * `log_file_path` - 日志文件路径（可选，默认为 "gripxel.log"）
pub fn init_logger(level: LogLevel, file_output: bool, log_file_path: Option<&str>) {
    // wgpu / naga 在 info 级别非常吵，默认压到 warn
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},wgpu_core=warn,wgpu_hal=warn,naga=warn",
            level.as_filter()
        ))
    });

    let console_layer = fmt::layer()
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_ansi(true);

    if file_output {
        let (directory, filename) = split_log_path(log_file_path.unwrap_or(DEFAULT_LOG_FILE));

        // 创建滚动文件 appender（每天滚动）
        let file_appender = RollingFileAppender::new(Rotation::DAILY, directory, filename);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_ansi(false)  // 文件不需要 ANSI 颜色
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .init();
    }
}

/// 拆分日志文件路径为（目录，文件名）
fn split_log_path(log_path: &str) -> (&Path, &str) {
    let path = Path::new(log_path);
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let filename = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);
    (directory, filename)
}

/// 日志级别转换
impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}
