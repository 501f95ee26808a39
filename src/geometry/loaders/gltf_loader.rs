//! glTF / GLB 文件加载器
//!
//! 使用 gltf crate 导入文件（外部缓冲区、data URI 和 GLB 二进制块都由它处理），
//! 再沿节点层次把每个图元烘焙到模型空间。

use super::MeshLoader;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::material::{ImageData, MaterialData};
use crate::geometry::math_utils::{lacks_normals, reconstruct_normals};
use crate::geometry::mesh::MeshData;
use crate::geometry::model::ModelData;
use crate::geometry::texture::TextureCache;
use crate::geometry::vertex::Vertex;
use crate::math::{Matrix4, Point3, Vector3};
use gltf::mesh::util::ReadIndices;
use nalgebra::Matrix3;
use std::path::Path;

/// glTF 格式加载器
pub struct GltfLoader;

impl MeshLoader for GltfLoader {
    fn load_from_file(path: &Path) -> Result<ModelData> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let (document, buffers, images) = gltf::import(path)
            .map_err(|e| MeshLoadError::ParseError(format!("gltf: {}", e)))?;

        let label = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("model");
        let model = build_model(path, label, &document, &buffers, &images)?;

        tracing::info!(
            "Loaded glTF '{}': {} meshes, {} vertices, {} triangles",
            model.name,
            model.mesh_count(),
            model.total_vertices(),
            model.total_triangles()
        );

        Ok(model)
    }

    fn load_from_memory(data: &[u8]) -> Result<ModelData> {
        let (document, buffers, images) = gltf::import_slice(data)
            .map_err(|e| MeshLoadError::ParseError(format!("gltf: {}", e)))?;
        build_model(Path::new("memory.glb"), "memory", &document, &buffers, &images)
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["gltf", "glb"]
    }
}

fn build_model(
    source: &Path,
    label: &str,
    document: &gltf::Document,
    buffers: &[gltf::buffer::Data],
    images: &[gltf::image::Data],
) -> Result<ModelData> {
    let mut textures = TextureCache::new();
    let materials = convert_materials(document, images, label, &mut textures);

    let mut meshes = Vec::new();
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next());

    match scene {
        Some(scene) => {
            for node in scene.nodes() {
                visit_node(&node, &Matrix4::identity(), buffers, &mut meshes)?;
            }
        }
        // 没有场景时直接读取所有网格（单位变换）
        None => {
            for mesh in document.meshes() {
                append_mesh(&mesh, &Matrix4::identity(), buffers, &mut meshes)?;
            }
        }
    }

    ModelData::new(source, meshes, materials)
}

fn visit_node(
    node: &gltf::Node,
    parent: &Matrix4,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<MeshData>,
) -> Result<()> {
    let local = Matrix4::from(node.transform().matrix());
    let world = parent * local;

    if let Some(mesh) = node.mesh() {
        append_mesh(&mesh, &world, buffers, meshes)?;
    }
    for child in node.children() {
        visit_node(&child, &world, buffers, meshes)?;
    }
    Ok(())
}

fn append_mesh(
    mesh: &gltf::Mesh,
    transform: &Matrix4,
    buffers: &[gltf::buffer::Data],
    meshes: &mut Vec<MeshData>,
) -> Result<()> {
    let normal_matrix = normal_matrix(transform);
    let mesh_name = mesh
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| format!("mesh{}", mesh.index()));

    for primitive in mesh.primitives() {
        if primitive.mode() != gltf::mesh::Mode::Triangles {
            tracing::warn!(mesh = %mesh_name, mode = ?primitive.mode(), "Skipping non-triangle primitive");
            continue;
        }

        let reader = primitive.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
        let positions: Vec<[f32; 3]> = match reader.read_positions() {
            Some(it) => it.collect(),
            None => continue,
        };
        let normals: Vec<[f32; 3]> = reader.read_normals().map(|it| it.collect()).unwrap_or_default();
        let texcoords: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|tc| tc.into_f32().collect())
            .unwrap_or_default();

        let indices: Vec<u32> = match reader.read_indices() {
            Some(ReadIndices::U8(it)) => it.map(u32::from).collect(),
            Some(ReadIndices::U16(it)) => it.map(u32::from).collect(),
            Some(ReadIndices::U32(it)) => it.collect(),
            None => (0..positions.len() as u32).collect(),
        };

        let mut data = MeshData::with_capacity(
            format!("{}#{}", mesh_name, primitive.index()),
            positions.len(),
            indices.len(),
        );

        for (i, position) in positions.iter().enumerate() {
            let world = transform.transform_point(&Point3::from(*position)).coords;
            let normal = normals
                .get(i)
                .and_then(|n| (normal_matrix * Vector3::from(*n)).try_normalize(1e-12))
                .map(|n| n.into())
                .unwrap_or([0.0, 0.0, 0.0]);
            let texcoord = texcoords.get(i).copied().unwrap_or([0.0, 0.0]);

            data.vertices.push(Vertex::new(world.into(), normal, texcoord));
        }
        data.indices = indices;
        data.material_index = primitive.material().index();

        if mirrors(transform) {
            // 负行列式会翻转绕序
            for triangle in data.indices.chunks_exact_mut(3) {
                triangle.swap(1, 2);
            }
        }

        if lacks_normals(&data.vertices) {
            reconstruct_normals(&mut data.vertices, &data.indices);
        }

        meshes.push(data);
    }

    Ok(())
}

fn convert_materials(
    document: &gltf::Document,
    images: &[gltf::image::Data],
    label: &str,
    textures: &mut TextureCache,
) -> Vec<MaterialData> {
    document
        .materials()
        .enumerate()
        .map(|(i, material)| {
            let pbr = material.pbr_metallic_roughness();
            let diffuse_texture = pbr.base_color_texture().and_then(|info| {
                let image_index = info.texture().source().index();
                let image = images.get(image_index)?;
                match to_rgba8(image) {
                    Some(decoded) => Some(textures.insert_decoded(
                        &format!("{}#image{}", label, image_index),
                        decoded,
                    )),
                    None => {
                        tracing::warn!(image = image_index, format = ?image.format, "Unsupported glTF image format");
                        None
                    }
                }
            });

            MaterialData {
                name: material
                    .name()
                    .map(str::to_string)
                    .unwrap_or_else(|| format!("material{}", i)),
                base_color: pbr.base_color_factor(),
                diffuse_texture,
            }
        })
        .collect()
}

/// 把 gltf 解码出的像素转换为 RGBA8
fn to_rgba8(image: &gltf::image::Data) -> Option<ImageData> {
    use gltf::image::Format;

    let pixel_count = (image.width as usize) * (image.height as usize);
    let pixels = match image.format {
        Format::R8G8B8A8 => image.pixels.clone(),
        Format::R8G8B8 => image
            .pixels
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        Format::R8G8 => image
            .pixels
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        Format::R8 => image.pixels.iter().flat_map(|&p| [p, p, p, 255]).collect(),
        _ => return None,
    };

    if pixels.len() != pixel_count * 4 {
        return None;
    }
    ImageData::new(image.width, image.height, pixels)
}

fn normal_matrix(transform: &Matrix4) -> Matrix3<f32> {
    let linear: Matrix3<f32> = transform.fixed_view::<3, 3>(0, 0).into_owned();
    linear
        .try_inverse()
        .map(|inverse| inverse.transpose())
        .unwrap_or(linear)
}

fn mirrors(transform: &Matrix4) -> bool {
    let linear: Matrix3<f32> = transform.fixed_view::<3, 3>(0, 0).into_owned();
    linear.determinant() < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 一个三角形，位置缓冲区 + u16 索引，节点平移 (5, 0, 0)
    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [ { "nodes": [0] } ],
        "nodes": [ { "mesh": 0, "translation": [5.0, 0.0, 0.0] } ],
        "meshes": [ { "name": "tri", "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 } ] } ],
        "materials": [ { "name": "green", "pbrMetallicRoughness": { "baseColorFactor": [0.0, 1.0, 0.0, 1.0] } } ],
        "buffers": [ { "byteLength": 44, "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIAAAA=" } ],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3", "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    #[test]
    fn test_supported_extensions() {
        assert_eq!(GltfLoader::supported_extensions(), &["gltf", "glb"]);
    }

    #[test]
    fn test_load_embedded_triangle() {
        let model = GltfLoader::load_from_memory(TRIANGLE_GLTF.as_bytes()).unwrap();

        assert_eq!(model.mesh_count(), 1);
        assert_eq!(model.total_triangles(), 1);
        assert_eq!(model.meshes[0].material_index, Some(0));
        assert_eq!(model.materials[0].name, "green");
        assert_eq!(model.materials[0].base_color, [0.0, 1.0, 0.0, 1.0]);

        // 节点平移已烘焙进顶点
        assert_eq!(model.bounds.min, Vector3::new(5.0, 0.0, 0.0));
        assert_eq!(model.bounds.max, Vector3::new(6.0, 1.0, 0.0));

        // 文件中没有法线，按面重建
        for vertex in &model.meshes[0].vertices {
            assert!((vertex.normal[2] - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("gripxel_gltf_loader_test.gltf");
        std::fs::write(&path, TRIANGLE_GLTF).unwrap();

        let model = GltfLoader::load_from_file(&path).unwrap();
        assert_eq!(model.name, "gripxel_gltf_loader_test.gltf");
        assert_eq!(model.total_vertices(), 3);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_invalid_data() {
        assert!(GltfLoader::load_from_memory(b"not a gltf").is_err());
    }

    #[test]
    fn test_mirror_detection() {
        let scale = Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0));
        assert!(mirrors(&scale));
        assert!(!mirrors(&Matrix4::identity()));
    }
}
