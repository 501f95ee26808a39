//! 纹理缓存
//!
//! 一个模型中多个材质常常引用同一张贴图，每个文件只解码一次。

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::material::{ImageData, TextureRef};
use crate::core::error::{MeshLoadError, Result};

/// 按规范化路径去重的纹理缓存
#[derive(Debug, Default)]
pub struct TextureCache {
    loaded: HashMap<PathBuf, Arc<ImageData>>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 加载纹理文件（已加载过则直接返回缓存）
    pub fn load(&mut self, path: &Path) -> Result<TextureRef> {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        if let Some(image) = self.loaded.get(&key) {
            return Ok(TextureRef {
                source: key,
                image: Arc::clone(image),
            });
        }

        let decoded = image::open(&key).map_err(|e| MeshLoadError::Texture {
            path: key.clone(),
            reason: e.to_string(),
        })?;
        let image = Arc::new(to_image_data(decoded, &key)?);

        tracing::debug!(
            path = %key.display(),
            width = image.width,
            height = image.height,
            "Decoded texture"
        );

        self.loaded.insert(key.clone(), Arc::clone(&image));
        Ok(TextureRef { source: key, image })
    }

    /// 登记已解码的图像（例如 glTF 内嵌或缓冲区中的图像），`label` 作为缓存键
    pub fn insert_decoded(&mut self, label: &str, image: ImageData) -> TextureRef {
        let key = PathBuf::from(label);
        let image = Arc::clone(self.loaded.entry(key.clone()).or_insert_with(|| Arc::new(image)));
        TextureRef { source: key, image }
    }

    /// 加载纹理；失败时记录警告并返回 `None`，材质退回纯色
    pub fn load_or_warn(&mut self, path: &Path) -> Option<TextureRef> {
        match self.load(path) {
            Ok(texture) => Some(texture),
            Err(e) => {
                tracing::warn!("{}", e);
                None
            }
        }
    }

    /// 已缓存的纹理数量
    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }
}

fn to_image_data(decoded: image::DynamicImage, path: &Path) -> Result<ImageData> {
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    ImageData::new(width, height, rgba.into_raw()).ok_or_else(|| {
        MeshLoadError::Texture {
            path: path.to_path_buf(),
            reason: format!("invalid image size {}x{}", width, height),
        }
        .into()
    })
}
