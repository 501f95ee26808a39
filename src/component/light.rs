//! 光照组件模块
//!
//! 查看器只使用一盏方向光加环境光，参数来自场景配置。

use crate::core::scene::LightConfig;
use crate::math::Vector3;

/// 方向光（平行光）
///
/// 模拟太阳光等远距离光源，所有光线平行
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    /// 光照方向（归一化向量，从光源指向场景）
    direction: Vector3,
    /// 光照颜色
    pub color: [f32; 3],
    /// 光照强度
    pub intensity: f32,
    /// 环境光系数
    pub ambient: f32,
}

impl DirectionalLight {
    /// 创建新的方向光
    pub fn new(direction: Vector3, color: [f32; 3], intensity: f32, ambient: f32) -> Self {
        let mut light = Self {
            direction: Vector3::new(0.0, -1.0, 0.0),
            color,
            intensity: intensity.max(0.0),
            ambient: ambient.clamp(0.0, 1.0),
        };
        light.set_direction(direction);
        light
    }

    /// 从场景配置创建
    pub fn from_config(config: &LightConfig) -> Self {
        Self::new(
            Vector3::from(config.direction),
            config.color,
            config.intensity,
            config.ambient,
        )
    }

    /// 光照方向
    pub fn direction(&self) -> Vector3 {
        self.direction
    }

    /// 设置光照方向（零向量被忽略）
    pub fn set_direction(&mut self, direction: Vector3) {
        if let Some(normalized) = direction.try_normalize(f32::EPSILON) {
            self.direction = normalized;
        }
    }

    /// 带强度的颜色（颜色 * 强度）
    pub fn radiance(&self) -> [f32; 3] {
        [
            self.color[0] * self.intensity,
            self.color[1] * self.intensity,
            self.color[2] * self.intensity,
        ]
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::from_config(&LightConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_is_normalized() {
        let light = DirectionalLight::new(Vector3::new(0.0, -4.0, 0.0), [1.0; 3], 1.0, 0.1);
        assert!((light.direction() - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-6);
    }

    #[test]
    fn test_zero_direction_is_ignored() {
        let mut light = DirectionalLight::default();
        let before = light.direction();
        light.set_direction(Vector3::zeros());
        assert_eq!(light.direction(), before);
    }

    #[test]
    fn test_radiance() {
        let light = DirectionalLight::new(Vector3::new(1.0, 0.0, 0.0), [0.5, 1.0, 0.25], 2.0, 0.2);
        assert_eq!(light.radiance(), [1.0, 2.0, 0.5]);
    }

    #[test]
    fn test_from_config_clamps_ambient() {
        let config = LightConfig {
            ambient: 3.0,
            ..LightConfig::default()
        };
        let light = DirectionalLight::from_config(&config);
        assert_eq!(light.ambient, 1.0);
        assert!((light.direction().norm() - 1.0).abs() < 1e-6);
    }
}
