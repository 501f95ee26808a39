/// OBJ 文件加载器
///
/// 使用 tobj crate 加载 Wavefront OBJ 格式的3D模型及其 MTL 材质。
use super::MeshLoader;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::material::MaterialData;
use crate::geometry::math_utils::{lacks_normals, reconstruct_normals};
use crate::geometry::mesh::MeshData;
use crate::geometry::model::ModelData;
use crate::geometry::texture::TextureCache;
use crate::geometry::vertex::Vertex;
use std::path::Path;

/// OBJ 格式加载器
///
/// # 特性
///
/// - 自动三角化，单一索引
/// - UV 坐标翻转（V轴：1.0 - v）
/// - 读取 MTL 漫反射颜色和贴图，贴图路径相对于 OBJ 所在目录
/// - 自动重建缺失的法线
///
/// # 使用示例
///
/// ```rust,no_run
/// use gripxel::geometry::loaders::{MeshLoader, ObjLoader};
/// use std::path::Path;
///
/// let model = ObjLoader::load_from_file(Path::new("model.obj"))?;
/// println!("加载了 {} 个顶点", model.total_vertices());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct ObjLoader;

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

impl MeshLoader for ObjLoader {
    fn load_from_file(path: &Path) -> Result<ModelData> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let (models, materials) = tobj::load_obj(path, &load_options())
            .map_err(|e| MeshLoadError::ParseError(format!("tobj: {}", e)))?;

        let materials = match materials {
            Ok(materials) => materials,
            Err(e) => {
                tracing::warn!(path = %path.display(), "Failed to load MTL materials: {}", e);
                Vec::new()
            }
        };

        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut textures = TextureCache::new();
        let materials = convert_materials(&materials, base_dir, &mut textures);
        let meshes = convert_models(&models, materials.len())?;

        let model = ModelData::new(path, meshes, materials)?;

        tracing::info!(
            "Loaded OBJ '{}': {} meshes, {} vertices, {} triangles, {} textures",
            model.name,
            model.mesh_count(),
            model.total_vertices(),
            model.total_triangles(),
            textures.len()
        );

        Ok(model)
    }

    /// 从内存加载（不解析 mtllib，材质使用默认值）
    fn load_from_memory(data: &[u8]) -> Result<ModelData> {
        let mut reader = std::io::BufReader::new(data);
        let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_| {
            Ok((Vec::new(), Default::default()))
        })
        .map_err(|e| MeshLoadError::ParseError(format!("tobj: {}", e)))?;

        let meshes = convert_models(&models, 0)?;
        ModelData::new("memory.obj", meshes, Vec::new())
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["obj"]
    }
}

fn convert_materials(
    materials: &[tobj::Material],
    base_dir: &Path,
    textures: &mut TextureCache,
) -> Vec<MaterialData> {
    materials
        .iter()
        .map(|material| {
            let diffuse = material.diffuse.unwrap_or([1.0, 1.0, 1.0]);
            let alpha = material.dissolve.unwrap_or(1.0);

            let diffuse_texture = material
                .diffuse_texture
                .as_deref()
                .and_then(|name| resolve_texture_path(base_dir, name))
                .and_then(|texture_path| textures.load_or_warn(&texture_path));

            MaterialData {
                name: material.name.clone(),
                base_color: [diffuse[0], diffuse[1], diffuse[2], alpha],
                diffuse_texture,
            }
        })
        .collect()
}

/// MTL 中的贴图语句可能带有选项（`-bm 0.5 file.png`），取最后一个记号作为后备
fn resolve_texture_path(base_dir: &Path, name: &str) -> Option<std::path::PathBuf> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    let direct = base_dir.join(name);
    if direct.exists() {
        return Some(direct);
    }
    let last_token = name.split_whitespace().last()?;
    Some(base_dir.join(last_token))
}

fn convert_models(models: &[tobj::Model], material_count: usize) -> Result<Vec<MeshData>> {
    if models.is_empty() {
        return Err(MeshLoadError::ValidationError("OBJ file contains no objects".to_string()).into());
    }

    let mut meshes = Vec::with_capacity(models.len());
    for model in models {
        let mesh = &model.mesh;
        let positions = &mesh.positions;
        let normals = &mesh.normals;
        let texcoords = &mesh.texcoords;

        if positions.len() % 3 != 0 {
            return Err(MeshLoadError::InvalidGeometry(format!(
                "incomplete position data in '{}': {} floats",
                model.name,
                positions.len()
            ))
            .into());
        }

        let vertex_count = positions.len() / 3;
        let mut data = MeshData::with_capacity(model.name.clone(), vertex_count, mesh.indices.len());

        for i in 0..vertex_count {
            let position = [positions[i * 3], positions[i * 3 + 1], positions[i * 3 + 2]];

            let normal = if normals.len() >= (i + 1) * 3 {
                [normals[i * 3], normals[i * 3 + 1], normals[i * 3 + 2]]
            } else {
                [0.0, 0.0, 0.0]
            };

            // 翻转V坐标
            let texcoord = if texcoords.len() >= (i + 1) * 2 {
                [texcoords[i * 2], 1.0 - texcoords[i * 2 + 1]]
            } else {
                [0.0, 0.0]
            };

            data.vertices.push(Vertex::new(position, normal, texcoord));
        }

        data.indices.extend_from_slice(&mesh.indices);
        data.material_index = mesh.material_id.filter(|&id| id < material_count);

        if lacks_normals(&data.vertices) {
            tracing::debug!(mesh = %data.name, "Reconstructing missing normals");
            reconstruct_normals(&mut data.vertices, &data.indices);
        }

        meshes.push(data);
    }

    Ok(meshes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    const QUAD_OBJ: &str = "\
mtllib quad.mtl
o Quad
v 0.0 0.0 0.0
v 2.0 0.0 0.0
v 2.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
usemtl red
f 1/1 2/2 3/3 4/4
";

    #[test]
    fn test_supported_extensions() {
        assert_eq!(ObjLoader::supported_extensions(), &["obj"]);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = ObjLoader::load_from_file(Path::new("nonexistent.obj"));
        assert!(matches!(
            result,
            Err(crate::core::GripxelError::MeshLoading(MeshLoadError::FileNotFound(_)))
        ));
    }

    #[test]
    fn test_load_quad_with_material_and_texture() {
        let dir = temp_dir("gripxel_obj_loader_test");
        let obj_path = dir.join("quad.obj");
        fs::write(&obj_path, QUAD_OBJ).unwrap();
        fs::write(dir.join("quad.mtl"), "newmtl red\nKd 1.0 0.0 0.0\nmap_Kd quad.png\n").unwrap();
        image::RgbaImage::from_pixel(1, 1, image::Rgba([255, 255, 255, 255]))
            .save(dir.join("quad.png"))
            .unwrap();

        let model = ObjLoader::load_from_file(&obj_path).unwrap();

        assert_eq!(model.name, "quad.obj");
        assert_eq!(model.mesh_count(), 1);
        assert_eq!(model.total_vertices(), 4);
        assert_eq!(model.total_triangles(), 2);

        assert_eq!(model.materials.len(), 1);
        assert_eq!(model.materials[0].base_color, [1.0, 0.0, 0.0, 1.0]);
        assert!(model.materials[0].has_texture());
        assert_eq!(model.meshes[0].material_index, Some(0));

        // V 轴翻转
        let first = model.meshes[0].vertices.iter().find(|v| v.position == [0.0, 0.0, 0.0]).unwrap();
        assert_eq!(first.texcoord, [0.0, 1.0]);

        // 缺失的法线被重建为 +Z
        for vertex in &model.meshes[0].vertices {
            assert!((vertex.normal[2] - 1.0).abs() < 1e-5);
        }

        assert_eq!(model.bounds.width(), 2.0);
        assert_eq!(model.bounds.height(), 1.0);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_missing_mtl_falls_back_to_default_material() {
        let dir = temp_dir("gripxel_obj_loader_no_mtl");
        let obj_path = dir.join("quad.obj");
        fs::write(&obj_path, QUAD_OBJ).unwrap();

        let model = ObjLoader::load_from_file(&obj_path).unwrap();
        assert!(model.materials.is_empty());
        assert_eq!(model.meshes[0].material_index, None);

        fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn test_load_from_memory() {
        let data = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n";
        let model = ObjLoader::load_from_memory(data).unwrap();
        assert_eq!(model.total_triangles(), 1);
        assert_eq!(model.meshes[0].vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_points_only_obj_is_rejected() {
        let data = b"v 0 0 0\nv 1 0 0\n";
        assert!(ObjLoader::load_from_memory(data).is_err());
    }
}
