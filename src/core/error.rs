//! 错误处理模块
//!
//! 定义了查看器中使用的统一错误类型。
//!
//! # 设计原则
//!
//! - 为每种错误类型提供清晰的上下文信息
//! - 支持错误链（error source）
//! - 易于模式匹配和错误处理

use std::fmt;
use std::path::PathBuf;

/// 统一的 Result 类型
///
/// 所有可能返回错误的函数都应该使用这个类型。
pub type Result<T> = std::result::Result<T, GripxelError>;

/// GripXel 的错误类型
#[derive(Debug)]
pub enum GripxelError {
    /// 配置错误
    Config(ConfigError),

    /// 图形 API 错误
    Graphics(GraphicsError),

    /// 模型加载错误
    MeshLoading(MeshLoadError),

    /// IO 错误
    Io(std::io::Error),

    /// 日志系统错误
    Log(String),

    /// 初始化错误
    Initialization(String),
}

/// 配置相关的错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),

    /// 配置文件解析失败
    ParseError(String),

    /// 配置值无效
    InvalidValue { field: String, reason: String },
}

/// 图形 API 相关的错误
#[derive(Debug)]
pub enum GraphicsError {
    /// 设备创建失败
    DeviceCreation(String),

    /// 交换链错误
    SwapchainError(String),

    /// 资源创建失败
    ResourceCreation(String),

    /// GUI 渲染失败
    Gui(String),
}

/// 模型加载相关的错误
#[derive(Debug)]
pub enum MeshLoadError {
    /// 文件不存在
    FileNotFound(PathBuf),

    /// 不支持的文件格式
    UnsupportedFormat(String),

    /// 解析失败
    ParseError(String),

    /// 数据验证失败
    ValidationError(String),

    /// 几何数据无效
    InvalidGeometry(String),

    /// 纹理解码失败
    Texture { path: PathBuf, reason: String },
}

impl fmt::Display for GripxelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GripxelError::Config(e) => write!(f, "Configuration error: {}", e),
            GripxelError::Graphics(e) => write!(f, "Graphics error: {}", e),
            GripxelError::MeshLoading(e) => write!(f, "Model loading error: {}", e),
            GripxelError::Io(e) => write!(f, "IO error: {}", e),
            GripxelError::Log(msg) => write!(f, "Log error: {}", msg),
            GripxelError::Initialization(msg) => write!(f, "Initialization error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseError(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "Invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphicsError::DeviceCreation(msg) => write!(f, "Device creation failed: {}", msg),
            GraphicsError::SwapchainError(msg) => write!(f, "Swapchain error: {}", msg),
            GraphicsError::ResourceCreation(msg) => write!(f, "Resource creation failed: {}", msg),
            GraphicsError::Gui(msg) => write!(f, "GUI error: {}", msg),
        }
    }
}

impl fmt::Display for MeshLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeshLoadError::FileNotFound(path) => write!(f, "Model file not found: {}", path.display()),
            MeshLoadError::UnsupportedFormat(msg) => write!(f, "Unsupported model format: {}", msg),
            MeshLoadError::ParseError(msg) => write!(f, "Failed to parse model: {}", msg),
            MeshLoadError::ValidationError(msg) => write!(f, "Model validation failed: {}", msg),
            MeshLoadError::InvalidGeometry(msg) => write!(f, "Invalid geometry data: {}", msg),
            MeshLoadError::Texture { path, reason } => {
                write!(f, "Failed to decode texture '{}': {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for GripxelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GripxelError::Io(e) => Some(e),
            GripxelError::Config(e) => Some(e),
            GripxelError::Graphics(e) => Some(e),
            GripxelError::MeshLoading(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for ConfigError {}
impl std::error::Error for GraphicsError {}
impl std::error::Error for MeshLoadError {}

// 实现 From trait 以便于错误转换
impl From<std::io::Error> for GripxelError {
    fn from(err: std::io::Error) -> Self {
        GripxelError::Io(err)
    }
}

impl From<ConfigError> for GripxelError {
    fn from(err: ConfigError) -> Self {
        GripxelError::Config(err)
    }
}

impl From<GraphicsError> for GripxelError {
    fn from(err: GraphicsError) -> Self {
        GripxelError::Graphics(err)
    }
}

impl From<MeshLoadError> for GripxelError {
    fn from(err: MeshLoadError) -> Self {
        GripxelError::MeshLoading(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_mesh_error_display() {
        let err: GripxelError = MeshLoadError::UnsupportedFormat(".xyz".to_string()).into();
        assert_eq!(err.to_string(), "Model loading error: Unsupported model format: .xyz");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: GripxelError = io.into();
        assert!(matches!(err, GripxelError::Io(_)));
    }
}
