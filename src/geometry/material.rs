//! 材质数据
//!
//! 加载器只提取查看器会用到的部分：漫反射颜色与漫反射贴图。

use std::path::PathBuf;
use std::sync::Arc;

/// 解码后的 RGBA8 图像
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// 按行排列的 RGBA8 像素，长度为 width * height * 4
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// 从像素创建，尺寸不匹配时返回 `None`
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        if width == 0 || height == 0 || pixels.len() != (width as usize) * (height as usize) * 4 {
            return None;
        }
        Some(Self { width, height, pixels })
    }
}

/// 材质的漫反射贴图
#[derive(Debug, Clone)]
pub struct TextureRef {
    /// 纹理来源（文件路径，或内嵌纹理的描述）
    pub source: PathBuf,
    /// 解码后的图像，同一文件的多个材质共享同一份数据
    pub image: Arc<ImageData>,
}

/// CPU 侧材质
#[derive(Debug, Clone)]
pub struct MaterialData {
    pub name: String,
    /// 线性 RGBA 基础颜色，与贴图相乘
    pub base_color: [f32; 4],
    pub diffuse_texture: Option<TextureRef>,
}

impl MaterialData {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn has_texture(&self) -> bool {
        self.diffuse_texture.is_some()
    }
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            base_color: [1.0, 1.0, 1.0, 1.0],
            diffuse_texture: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_data_size_check() {
        assert!(ImageData::new(2, 2, vec![0; 16]).is_some());
        assert!(ImageData::new(2, 2, vec![0; 15]).is_none());
        assert!(ImageData::new(0, 2, Vec::new()).is_none());
    }

    #[test]
    fn test_default_material() {
        let material = MaterialData::new("steel");
        assert_eq!(material.name, "steel");
        assert_eq!(material.base_color, [1.0; 4]);
        assert!(!material.has_texture());
    }
}
