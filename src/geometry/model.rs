//! 模型数据
//!
//! 一次导入的完整结果：若干网格、材质表和模型空间包围盒。

use std::path::PathBuf;

use super::bounds::Aabb;
use super::material::MaterialData;
use super::mesh::MeshData;
use crate::core::error::{MeshLoadError, Result};
use crate::math::Vector3;

/// CPU 侧模型
#[derive(Debug, Clone)]
pub struct ModelData {
    /// 显示名称（通常为文件名）
    pub name: String,
    /// 源文件路径
    pub source: PathBuf,
    pub meshes: Vec<MeshData>,
    pub materials: Vec<MaterialData>,
    /// 模型空间包围盒
    pub bounds: Aabb,
}

impl ModelData {
    /// 组装模型：丢弃空网格、校验索引并计算包围盒
    ///
    /// 没有任何三角形时返回 `InvalidGeometry`。
    pub fn new(
        source: impl Into<PathBuf>,
        meshes: Vec<MeshData>,
        materials: Vec<MaterialData>,
    ) -> Result<Self> {
        let source = source.into();
        let name = source
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("Unnamed")
            .to_string();

        let meshes: Vec<MeshData> = meshes.into_iter().filter(|m| !m.is_empty()).collect();
        for mesh in &meshes {
            mesh.validate().map_err(MeshLoadError::ValidationError)?;
            if let Some(index) = mesh.material_index {
                if index >= materials.len() {
                    return Err(MeshLoadError::ValidationError(format!(
                        "mesh '{}' references missing material {}",
                        mesh.name, index
                    ))
                    .into());
                }
            }
        }

        let bounds = Aabb::from_points(
            meshes
                .iter()
                .flat_map(|m| m.vertices.iter().map(|v| Vector3::from(v.position))),
        );

        let bounds = match bounds {
            Some(bounds) if meshes.iter().any(|m| m.triangle_count() > 0) => bounds,
            _ => {
                return Err(MeshLoadError::InvalidGeometry(format!(
                    "'{}' contains no triangles",
                    name
                ))
                .into())
            }
        };

        Ok(Self {
            name,
            source,
            meshes,
            materials,
            bounds,
        })
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn total_vertices(&self) -> usize {
        self.meshes.iter().map(MeshData::vertex_count).sum()
    }

    pub fn total_triangles(&self) -> usize {
        self.meshes.iter().map(MeshData::triangle_count).sum()
    }

    /// 带贴图的材质数量
    pub fn textured_materials(&self) -> usize {
        self.materials.iter().filter(|m| m.has_texture()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vertex;

    fn quad(material_index: Option<usize>) -> MeshData {
        let mut mesh = MeshData::with_name("quad");
        mesh.vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
            Vertex::new([2.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 1.0]),
            Vertex::new([2.0, 1.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
            Vertex::new([0.0, 1.0, -3.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        ];
        mesh.indices = vec![0, 1, 2, 0, 2, 3];
        mesh.material_index = material_index;
        mesh
    }

    #[test]
    fn test_model_totals_and_bounds() {
        let model = ModelData::new(
            "assets/quad.obj",
            vec![quad(Some(0)), quad(None), MeshData::with_name("empty")],
            vec![MaterialData::new("m")],
        )
        .unwrap();

        assert_eq!(model.name, "quad.obj");
        assert_eq!(model.mesh_count(), 2);
        assert_eq!(model.total_vertices(), 8);
        assert_eq!(model.total_triangles(), 4);
        assert_eq!(model.textured_materials(), 0);
        assert_eq!(model.bounds.min, Vector3::new(0.0, 0.0, -3.0));
        assert_eq!(model.bounds.max, Vector3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_model_without_triangles_is_rejected() {
        let result = ModelData::new("empty.obj", vec![MeshData::new()], Vec::new());
        assert!(matches!(
            result,
            Err(crate::core::GripxelError::MeshLoading(MeshLoadError::InvalidGeometry(_)))
        ));
    }

    #[test]
    fn test_missing_material_is_rejected() {
        let result = ModelData::new("bad.obj", vec![quad(Some(3))], Vec::new());
        assert!(result.is_err());
    }
}
