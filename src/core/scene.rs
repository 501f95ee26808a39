//! 场景配置模块
//!
//! 定义场景配置，包括背景色、光照、启动模型及其初始变换。

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::fs;
use crate::core::error::{Result, GripxelError, ConfigError};
use crate::math::{Vector3, Matrix4};
use crate::math::utils::deg_to_rad;

/// 3D 变换数据
///
/// 包含位置、旋转和缩放信息。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transform {
    /// 位置 (x, y, z)
    #[serde(default = "default_position")]
    pub position: [f32; 3],

    /// 旋转（欧拉角，度数）(pitch, yaw, roll)
    #[serde(default = "default_rotation")]
    pub rotation: [f32; 3],

    /// 缩放 (x, y, z)
    #[serde(default = "default_scale")]
    pub scale: [f32; 3],
}

fn default_position() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_rotation() -> [f32; 3] {
    [0.0, 0.0, 0.0]
}

fn default_scale() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: default_position(),
            rotation: default_rotation(),
            scale: default_scale(),
        }
    }
}

impl Transform {
    /// 创建模型矩阵
    ///
    /// 变换顺序：缩放 -> 旋转 -> 平移
    pub fn to_matrix(&self) -> Matrix4 {
        let pitch = deg_to_rad(self.rotation[0]);
        let yaw = deg_to_rad(self.rotation[1]);
        let roll = deg_to_rad(self.rotation[2]);

        let translation = Matrix4::new_translation(&Vector3::from(self.position));

        let rotation_x = Matrix4::from_axis_angle(&Vector3::x_axis(), pitch);
        let rotation_y = Matrix4::from_axis_angle(&Vector3::y_axis(), yaw);
        let rotation_z = Matrix4::from_axis_angle(&Vector3::z_axis(), roll);
        let rotation = rotation_z * rotation_y * rotation_x;

        let scale = Matrix4::new_nonuniform_scaling(&Vector3::from(self.scale));

        // 组合：T * R * S
        translation * rotation * scale
    }
}

/// 光照配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightConfig {
    /// 光照方向（从光源指向场景）
    #[serde(default = "default_light_direction")]
    pub direction: [f32; 3],

    /// 光照颜色 (RGB)
    #[serde(default = "default_light_color")]
    pub color: [f32; 3],

    /// 光照强度
    #[serde(default = "default_light_intensity")]
    pub intensity: f32,

    /// 环境光强度
    #[serde(default = "default_ambient")]
    pub ambient: f32,
}

fn default_light_direction() -> [f32; 3] {
    [-0.3, -1.0, -0.5]
}

fn default_light_color() -> [f32; 3] {
    [1.0, 1.0, 1.0]
}

fn default_light_intensity() -> f32 {
    1.0
}

fn default_ambient() -> f32 {
    0.15
}

impl Default for LightConfig {
    fn default() -> Self {
        Self {
            direction: default_light_direction(),
            color: default_light_color(),
            intensity: default_light_intensity(),
            ambient: default_ambient(),
        }
    }
}

/// 模型配置
///
/// 定义启动时加载的模型路径和初始变换。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelConfig {
    /// 启动时加载的模型（可选）
    #[serde(default)]
    pub path: Option<String>,

    /// 模型初始变换
    #[serde(default)]
    pub transform: Transform,
}

/// 场景配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    /// 背景色 (RGBA)
    #[serde(default = "default_clear_color")]
    pub clear_color: [f32; 4],

    /// "实体"着色模式使用的颜色
    #[serde(default = "default_solid_color")]
    pub solid_color: [f32; 3],

    /// 光照配置
    #[serde(default)]
    pub light: LightConfig,

    /// 模型配置
    #[serde(default)]
    pub model: ModelConfig,
}

fn default_clear_color() -> [f32; 4] {
    [0.0, 0.0, 0.0, 1.0]
}

fn default_solid_color() -> [f32; 3] {
    [0.2, 0.45, 0.95]
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            clear_color: default_clear_color(),
            solid_color: default_solid_color(),
            light: LightConfig::default(),
            model: ModelConfig::default(),
        }
    }
}

impl SceneConfig {
    /// 从文件加载场景配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .map_err(|e| GripxelError::Config(ConfigError::FileNotFound(format!(
                "Failed to read scene config file '{}': {}",
                path.display(),
                e
            ))))?;

        toml::from_str(&contents)
            .map_err(|e| GripxelError::Config(ConfigError::ParseError(format!(
                "Failed to parse scene config: {}",
                e
            ))))
    }

    /// 从文件加载，如果文件不存在则返回默认配置
    pub fn from_file_or_default<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        if path.exists() {
            match Self::from_file(path) {
                Ok(config) => {
                    tracing::info!("Loaded scene config from: {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to load scene config: {}, using defaults", e);
                    Self::default()
                }
            }
        } else {
            tracing::info!("Scene config not found, using defaults");
            Self::default()
        }
    }

    /// 保存配置到文件
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = toml::to_string_pretty(self)
            .map_err(|e| GripxelError::Config(ConfigError::ParseError(format!(
                "Failed to serialize scene config: {}",
                e
            ))))?;

        fs::write(path, contents)?;

        tracing::info!("Saved scene config to: {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_transform() {
        let transform = Transform::default();
        assert_eq!(transform.position, [0.0, 0.0, 0.0]);
        assert_eq!(transform.rotation, [0.0, 0.0, 0.0]);
        assert_eq!(transform.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_transform_to_matrix() {
        let transform = Transform {
            position: [1.0, 2.0, 3.0],
            rotation: [0.0, 0.0, 0.0],
            scale: [2.0, 2.0, 2.0],
        };
        let matrix = transform.to_matrix();

        // 检查平移部分
        assert!((matrix[(0, 3)] - 1.0).abs() < 0.001);
        assert!((matrix[(1, 3)] - 2.0).abs() < 0.001);
        assert!((matrix[(2, 3)] - 3.0).abs() < 0.001);
        // 检查缩放部分
        assert!((matrix[(0, 0)] - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_default_scene() {
        let scene = SceneConfig::default();
        assert_eq!(scene.clear_color, [0.0, 0.0, 0.0, 1.0]);
        assert!(scene.model.path.is_none());
        assert_eq!(scene.light.intensity, 1.0);
    }

    #[test]
    fn test_scene_roundtrip_through_file() {
        let path = std::env::temp_dir().join(format!("gripxel_scene_{}.toml", std::process::id()));
        let mut scene = SceneConfig::default();
        scene.model.path = Some("assets/backpack.obj".to_string());
        scene.light.intensity = 0.5;

        scene.save_to_file(&path).unwrap();
        let loaded = SceneConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.model.path.as_deref(), Some("assets/backpack.obj"));
        assert_eq!(loaded.light.intensity, 0.5);
    }

    #[test]
    fn test_missing_scene_file_uses_defaults() {
        let scene = SceneConfig::from_file_or_default("definitely/not/here/scene.toml");
        assert!(scene.model.path.is_none());
    }
}
