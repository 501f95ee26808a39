/// FBX 文件加载器
///
/// 使用 russimp (Assimp) 加载 Autodesk FBX 格式的3D模型。
/// Assimp 需要系统库，因此只在启用 `assimp` feature 时可用；
/// 未启用时返回 `UnsupportedFormat`。

use super::MeshLoader;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::model::ModelData;
use std::path::Path;

/// FBX 格式加载器
///
/// # 特性
///
/// - 自动三角化、生成平滑法线、翻转 UV
/// - 预先应用节点变换（PreTransformVertices）
/// - 读取漫反射颜色和漫反射贴图路径
pub struct FbxLoader;

impl MeshLoader for FbxLoader {
    fn load_from_file(path: &Path) -> Result<ModelData> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }
        imp::load_file(path)
    }

    fn load_from_memory(data: &[u8]) -> Result<ModelData> {
        imp::load_memory(data)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["fbx"]
    }
}

#[cfg(feature = "assimp")]
mod imp {
    use super::*;
    use crate::geometry::material::MaterialData;
    use crate::geometry::mesh::MeshData;
    use crate::geometry::texture::TextureCache;
    use crate::geometry::vertex::Vertex;
    use russimp::material::{PropertyTypeInfo, TextureType};
    use russimp::scene::{PostProcess, Scene};

    fn post_process() -> Vec<PostProcess> {
        vec![
            PostProcess::Triangulate,
            PostProcess::GenerateSmoothNormals,
            PostProcess::FlipUVs,
            PostProcess::JoinIdenticalVertices,
            PostProcess::PreTransformVertices,
        ]
    }

    pub fn load_file(path: &Path) -> Result<ModelData> {
        let path_str = path.to_str().ok_or_else(|| {
            MeshLoadError::ParseError(format!("non UTF-8 path: {}", path.display()))
        })?;
        let scene = Scene::from_file(path_str, post_process())
            .map_err(|e| MeshLoadError::ParseError(format!("assimp: {}", e)))?;

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let model = convert(path, &scene, base_dir)?;

        tracing::info!(
            "Loaded FBX '{}': {} meshes, {} vertices, {} triangles",
            model.name,
            model.mesh_count(),
            model.total_vertices(),
            model.total_triangles()
        );
        Ok(model)
    }

    pub fn load_memory(data: &[u8]) -> Result<ModelData> {
        let scene = Scene::from_buffer(data, post_process(), "fbx")
            .map_err(|e| MeshLoadError::ParseError(format!("assimp: {}", e)))?;
        convert(Path::new("memory.fbx"), &scene, Path::new("."))
    }

    fn convert(source: &Path, scene: &Scene, base_dir: &Path) -> Result<ModelData> {
        let mut textures = TextureCache::new();

        let materials: Vec<MaterialData> = scene
            .materials
            .iter()
            .enumerate()
            .map(|(i, material)| {
                let mut data = MaterialData::new(format!("material{}", i));
                for property in &material.properties {
                    match (property.key.as_str(), &property.data) {
                        ("?mat.name", PropertyTypeInfo::String(name)) => data.name = name.clone(),
                        ("$clr.diffuse", PropertyTypeInfo::FloatArray(c)) if c.len() >= 3 => {
                            data.base_color = [c[0], c[1], c[2], c.get(3).copied().unwrap_or(1.0)];
                        }
                        ("$tex.file", PropertyTypeInfo::String(file))
                            if property.semantic == TextureType::Diffuse && property.index == 0 =>
                        {
                            // 以 '*' 开头的是内嵌纹理，不支持，材质退回纯色
                            if file.starts_with('*') {
                                tracing::warn!(texture = %file, "Embedded FBX textures are not supported");
                            } else {
                                data.diffuse_texture = textures.load_or_warn(&base_dir.join(file));
                            }
                        }
                        _ => {}
                    }
                }
                data
            })
            .collect();

        let meshes = scene
            .meshes
            .iter()
            .map(|mesh| {
                let uvs = mesh.texture_coords.first().and_then(|c| c.as_ref());
                let mut data = MeshData::with_capacity(
                    mesh.name.clone(),
                    mesh.vertices.len(),
                    mesh.faces.len() * 3,
                );

                for (i, p) in mesh.vertices.iter().enumerate() {
                    let normal = mesh
                        .normals
                        .get(i)
                        .map(|n| [n.x, n.y, n.z])
                        .unwrap_or([0.0, 0.0, 0.0]);
                    let texcoord = uvs
                        .and_then(|uv| uv.get(i))
                        .map(|t| [t.x, t.y])
                        .unwrap_or([0.0, 0.0]);
                    data.vertices.push(Vertex::new([p.x, p.y, p.z], normal, texcoord));
                }

                // Triangulate 之后仍可能残留点和线图元
                for face in mesh.faces.iter().filter(|f| f.0.len() == 3) {
                    data.indices.extend_from_slice(&face.0);
                }

                let index = mesh.material_index as usize;
                data.material_index = (index < materials.len()).then_some(index);
                data
            })
            .collect();

        ModelData::new(source, meshes, materials)
    }
}

#[cfg(not(feature = "assimp"))]
mod imp {
    use super::*;

    fn unsupported() -> crate::core::error::GripxelError {
        MeshLoadError::UnsupportedFormat(
            "FBX support requires building with the `assimp` feature".to_string(),
        )
        .into()
    }

    pub fn load_file(_path: &Path) -> Result<ModelData> {
        Err(unsupported())
    }

    pub fn load_memory(_data: &[u8]) -> Result<ModelData> {
        Err(unsupported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert_eq!(FbxLoader::supported_extensions(), &["fbx"]);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = FbxLoader::load_from_file(Path::new("nonexistent.fbx"));
        assert!(matches!(
            result,
            Err(crate::core::GripxelError::MeshLoading(MeshLoadError::FileNotFound(_)))
        ));
    }

    #[cfg(not(feature = "assimp"))]
    #[test]
    fn test_fbx_requires_assimp_feature() {
        let result = FbxLoader::load_from_memory(b"Kaydara FBX Binary");
        assert!(matches!(
            result,
            Err(crate::core::GripxelError::MeshLoading(MeshLoadError::UnsupportedFormat(_)))
        ));
    }
}
