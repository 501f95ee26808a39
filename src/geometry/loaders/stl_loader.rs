//! STL 文件加载器
//!
//! 使用 stl_io 读取二进制或 ASCII STL。STL 没有 UV 和材质，
//! 每个面拆成独立的三个顶点并使用面法线（平直着色）。

use super::MeshLoader;
use crate::core::error::{MeshLoadError, Result};
use crate::geometry::mesh::MeshData;
use crate::geometry::model::ModelData;
use crate::geometry::vertex::Vertex;
use crate::math::Vector3;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// STL 格式加载器
pub struct StlLoader;

impl MeshLoader for StlLoader {
    fn load_from_file(path: &Path) -> Result<ModelData> {
        if !path.exists() {
            return Err(MeshLoadError::FileNotFound(path.to_path_buf()).into());
        }

        let mut reader = BufReader::new(File::open(path)?);
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("stl");
        let mesh = read_mesh(&mut reader, name)?;
        let model = ModelData::new(path, vec![mesh], Vec::new())?;

        tracing::info!(
            "Loaded STL '{}': {} triangles",
            model.name,
            model.total_triangles()
        );

        Ok(model)
    }

    fn load_from_memory(data: &[u8]) -> Result<ModelData> {
        let mesh = read_mesh(&mut Cursor::new(data), "memory")?;
        ModelData::new("memory.stl", vec![mesh], Vec::new())
    }

    fn supported_extensions() -> &'static [&'static str] {
        &["stl"]
    }
}

fn read_mesh<R: Read + Seek>(reader: &mut R, name: &str) -> Result<MeshData> {
    let indexed = stl_io::read_stl(reader)
        .map_err(|e| MeshLoadError::ParseError(format!("stl: {}", e)))?;

    let mut mesh = MeshData::with_capacity(name, indexed.faces.len() * 3, indexed.faces.len() * 3);

    for face in &indexed.faces {
        let mut corners = [Vector3::zeros(); 3];
        for (corner, &index) in corners.iter_mut().zip(face.vertices.iter()) {
            let v = indexed.vertices.get(index).ok_or_else(|| {
                MeshLoadError::InvalidGeometry(format!("vertex index {} out of range", index))
            })?;
            *corner = Vector3::new(v[0], v[1], v[2]);
        }

        let computed = (corners[1] - corners[0]).cross(&(corners[2] - corners[0]));
        let stored = Vector3::new(face.normal[0], face.normal[1], face.normal[2]);
        // 文件里的法线经常是零向量，或与绕序不一致
        let normal = stored
            .try_normalize(1e-12)
            .or_else(|| computed.try_normalize(1e-12))
            .unwrap_or_else(Vector3::zeros);

        let base = mesh.vertices.len() as u32;
        for corner in &corners {
            mesh.vertices.push(Vertex::new((*corner).into(), normal.into(), [0.0, 0.0]));
        }
        mesh.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }

    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TETRA_FACE: &str = "solid test
facet normal 0 0 0
  outer loop
    vertex 0 0 0
    vertex 1 0 0
    vertex 0 1 0
  endloop
endfacet
facet normal 0 -1 0
  outer loop
    vertex 0 0 0
    vertex 0 0 2
    vertex 1 0 0
  endloop
endfacet
endsolid test
";

    #[test]
    fn test_supported_extensions() {
        assert_eq!(StlLoader::supported_extensions(), &["stl"]);
    }

    #[test]
    fn test_load_ascii_from_memory() {
        let model = StlLoader::load_from_memory(TETRA_FACE.as_bytes()).unwrap();

        assert_eq!(model.total_triangles(), 2);
        assert_eq!(model.total_vertices(), 6);
        assert!(model.materials.is_empty());
        assert_eq!(model.meshes[0].material_index, None);

        // 第一个面的法线为零向量，按绕序计算
        assert_eq!(model.meshes[0].vertices[0].normal, [0.0, 0.0, 1.0]);
        // 第二个面使用文件中的法线
        assert_eq!(model.meshes[0].vertices[3].normal, [0.0, -1.0, 0.0]);

        assert_eq!(model.bounds.depth(), 2.0);
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("gripxel_stl_loader_test.stl");
        std::fs::write(&path, TETRA_FACE).unwrap();

        let model = StlLoader::load_from_file(&path).unwrap();
        assert_eq!(model.name, "gripxel_stl_loader_test.stl");
        assert_eq!(model.meshes[0].name, "gripxel_stl_loader_test");

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_garbage_is_rejected() {
        assert!(StlLoader::load_from_memory(b"solid broken\nfacet nonsense").is_err());
    }
}
