//! 配置管理模块
//!
//! 提供查看器配置的加载、解析和管理功能。
//! 支持从 TOML 配置文件加载，也支持命令行参数覆盖。
//!
//! # 配置文件格式 (config.toml)
//!
//! ```toml
//! [window]
//! width = 1000
//! height = 800
//! title = "GripXel MK 1"
//! resizable = true
//!
//! [graphics]
//! vsync = true
//! msaa_samples = 1
//!
//! [camera]
//! movement_speed = 2.5
//! mouse_sensitivity = 0.1
//! zoom = 45.0
//!
//! [gui]
//! font_scale = 1.5
//!
//! [logging]
//! level = "info"      # trace, debug, info, warn, error
//! file_output = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::error::{ConfigError, Result};

/// 查看器配置
///
/// 每个配置段都有默认值，配置文件只需要写出想覆盖的字段。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// 窗口配置
    #[serde(default)]
    pub window: WindowConfig,

    /// 图形配置
    #[serde(default)]
    pub graphics: GraphicsConfig,

    /// 相机配置
    #[serde(default)]
    pub camera: CameraSettings,

    /// GUI 配置
    #[serde(default)]
    pub gui: GuiConfig,

    /// 日志配置
    #[serde(default)]
    pub logging: LoggingConfig,

    /// 启动时打开的模型（仅来自命令行）
    #[serde(skip)]
    pub startup_model: Option<PathBuf>,
}

/// 窗口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    /// 窗口宽度
    #[serde(default = "default_width")]
    pub width: u32,

    /// 窗口高度
    #[serde(default = "default_height")]
    pub height: u32,

    /// 窗口标题
    #[serde(default = "default_title")]
    pub title: String,

    /// 是否可调整大小
    #[serde(default = "default_resizable")]
    pub resizable: bool,
}

/// 图形配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicsConfig {
    /// 垂直同步
    #[serde(default = "default_vsync")]
    pub vsync: bool,

    /// MSAA 采样数
    #[serde(default = "default_msaa")]
    pub msaa_samples: u32,
}

/// 相机配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    /// 键盘移动速度（单位/秒）
    #[serde(default = "default_movement_speed")]
    pub movement_speed: f32,

    /// 鼠标灵敏度（度/像素）
    #[serde(default = "default_mouse_sensitivity")]
    pub mouse_sensitivity: f32,

    /// 初始缩放（垂直视场角，度）
    #[serde(default = "default_zoom")]
    pub zoom: f32,

    /// 滚轮缩放下限（度）
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f32,

    /// 滚轮缩放上限（度）
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f32,

    /// 近裁剪面距离
    #[serde(default = "default_near_clip")]
    pub near_clip: f32,

    /// 远裁剪面距离
    #[serde(default = "default_far_clip")]
    pub far_clip: f32,

    /// 初始位置
    #[serde(default = "default_camera_position")]
    pub position: [f32; 3],
}

/// GUI 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuiConfig {
    /// 全局字体缩放
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,

    /// 是否使用暗色主题
    #[serde(default = "default_dark_theme")]
    pub dark_theme: bool,

    /// 启动时显示信息面板
    #[serde(default = "default_show_info_panel")]
    pub show_info_panel: bool,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// 是否输出到文件
    #[serde(default = "default_file_output")]
    pub file_output: bool,

    /// 日志文件路径
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

// 默认值函数
fn default_width() -> u32 { 1000 }
fn default_height() -> u32 { 800 }
fn default_title() -> String { "GripXel MK 1".to_string() }
fn default_resizable() -> bool { true }
fn default_vsync() -> bool { true }
fn default_msaa() -> u32 { 1 }
fn default_movement_speed() -> f32 { 2.5 }
fn default_mouse_sensitivity() -> f32 { 0.1 }
fn default_zoom() -> f32 { 45.0 }
fn default_min_zoom() -> f32 { 1.0 }
fn default_max_zoom() -> f32 { 45.0 }
fn default_near_clip() -> f32 { 0.1 }
fn default_far_clip() -> f32 { 100.0 }
fn default_camera_position() -> [f32; 3] { [0.0, 0.0, 3.0] }
fn default_font_scale() -> f32 { 1.5 }
fn default_dark_theme() -> bool { true }
fn default_show_info_panel() -> bool { true }
fn default_log_level() -> LogLevel { LogLevel::Info }
fn default_file_output() -> bool { false }
fn default_log_file() -> String { "gripxel.log".to_string() }

impl Default for Config {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            graphics: GraphicsConfig::default(),
            camera: CameraSettings::default(),
            gui: GuiConfig::default(),
            logging: LoggingConfig::default(),
            startup_model: None,
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            title: default_title(),
            resizable: default_resizable(),
        }
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            vsync: default_vsync(),
            msaa_samples: default_msaa(),
        }
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            movement_speed: default_movement_speed(),
            mouse_sensitivity: default_mouse_sensitivity(),
            zoom: default_zoom(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            near_clip: default_near_clip(),
            far_clip: default_far_clip(),
            position: default_camera_position(),
        }
    }
}

impl Default for GuiConfig {
    fn default() -> Self {
        Self {
            font_scale: default_font_scale(),
            dark_theme: default_dark_theme(),
            show_info_panel: default_show_info_panel(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_output: default_file_output(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    /// 从配置文件加载
    ///
    /// # 参数
    ///
    /// * `path` - 配置文件路径
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let contents = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path_str.clone()))?;

        Self::from_toml_str(&contents)
    }

    /// 从 TOML 字符串解析
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()).into())
    }

    /// 从配置文件加载，如果文件不存在则使用默认配置
    ///
    /// 文件存在但解析失败时同样回退到默认值；此时日志系统尚未初始化，
    /// 所以直接写到 stderr。
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            return Self::default();
        }

        match Self::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("{}, using default configuration", e);
                Self::default()
            }
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;

        std::fs::write(path, contents)?;
        Ok(())
    }

    /// 从命令行参数覆盖配置
    ///
    /// 支持的参数：
    /// - `--width <value>`: 设置窗口宽度
    /// - `--height <value>`: 设置窗口高度
    /// - `--no-vsync`: 关闭垂直同步
    /// - `--log-level <level>`: 设置日志级别
    /// - 第一个非选项参数：启动时打开的模型路径
    ///
    /// 第一个参数视为程序名并跳过。
    pub fn apply_args<I>(&mut self, args: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

        let mut iter = args.iter().skip(1);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--width" => {
                    if let Some(width) = iter.next().and_then(|v| v.parse().ok()) {
                        self.window.width = width;
                    }
                }
                "--height" => {
                    if let Some(height) = iter.next().and_then(|v| v.parse().ok()) {
                        self.window.height = height;
                    }
                }
                "--no-vsync" => self.graphics.vsync = false,
                "--log-level" => {
                    if let Some(level) = iter.next().and_then(|v| v.parse().ok()) {
                        self.logging.level = level;
                    }
                }
                other if other.starts_with("--") => {
                    eprintln!("Ignoring unknown argument: {}", other);
                }
                path => {
                    if self.startup_model.is_none() {
                        self.startup_model = Some(PathBuf::from(path));
                    }
                }
            }
        }
    }

    /// 验证配置的有效性
    pub fn validate(&self) -> Result<()> {
        // 验证窗口尺寸
        if self.window.width == 0 || self.window.height == 0 {
            return Err(invalid("window.width/height", "Window dimensions must be greater than 0"));
        }

        // 验证 MSAA 采样数
        if !matches!(self.graphics.msaa_samples, 1 | 2 | 4 | 8 | 16) {
            return Err(invalid("graphics.msaa_samples", "MSAA samples must be 1, 2, 4, 8, or 16"));
        }

        let camera = &self.camera;
        if !(1.0 <= camera.min_zoom
            && camera.min_zoom <= camera.zoom
            && camera.zoom <= camera.max_zoom
            && camera.max_zoom < 180.0)
        {
            return Err(invalid(
                "camera.zoom",
                "Zoom must satisfy 1 <= min_zoom <= zoom <= max_zoom < 180",
            ));
        }

        if !(camera.near_clip > 0.0 && camera.near_clip < camera.far_clip) {
            return Err(invalid("camera.near_clip/far_clip", "Clip planes must satisfy 0 < near < far"));
        }

        if camera.movement_speed <= 0.0 || camera.mouse_sensitivity <= 0.0 {
            return Err(invalid(
                "camera.movement_speed/mouse_sensitivity",
                "Speed and sensitivity must be positive",
            ));
        }

        if self.gui.font_scale <= 0.0 {
            return Err(invalid("gui.font_scale", "Font scale must be positive"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> super::error::GripxelError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
    .into()
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            other => Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                reason: format!("unknown level '{}'", other),
            }),
        }
    }
}

impl LogLevel {
    /// EnvFilter 使用的过滤指令
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.window.width, 1000);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.window.title, "GripXel MK 1");
        assert_eq!(config.camera.zoom, 45.0);
        assert_eq!(config.gui.font_scale, 1.5);
        assert!(config.startup_model.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.window.width = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zoom_range_validation() {
        let mut config = Config::default();
        config.camera.zoom = 60.0;
        assert!(config.validate().is_err());

        config.camera.max_zoom = 90.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_clip_validation() {
        let mut config = Config::default();
        config.camera.near_clip = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [window]
            width = 640

            [camera]
            movement_speed = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 800);
        assert_eq!(config.camera.movement_speed, 5.0);
        assert_eq!(config.camera.mouse_sensitivity, 0.1);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml_str("[window]\nwidth = \"wide\"").is_err());
    }

    #[test]
    fn test_apply_args() {
        let mut config = Config::default();
        config.apply_args([
            "gripxel",
            "--width",
            "1280",
            "--no-vsync",
            "--log-level",
            "debug",
            "models/backpack.obj",
            "ignored.obj",
        ]);

        assert_eq!(config.window.width, 1280);
        assert!(!config.graphics.vsync);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.startup_model, Some(PathBuf::from("models/backpack.obj")));
    }

    #[test]
    fn test_apply_args_bad_value_keeps_default() {
        let mut config = Config::default();
        config.apply_args(["gripxel", "--height", "tall"]);
        assert_eq!(config.window.height, 800);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("WARN".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert!("verbose".parse::<LogLevel>().is_err());
    }
}
