/// 网格数据结构模块
///
/// 定义 CPU 侧的网格数据容器，用于存储从文件加载的原始几何数据。
/// 每个 `MeshData` 只引用一个材质，多材质模型拆分为多个网格。

use super::vertex::Vertex;

/// CPU 侧网格数据
///
/// 这是一个简单的数据持有者，不包含 GPU 资源。
///
/// # 示例
///
/// ```rust
/// use gripxel::geometry::{MeshData, Vertex};
///
/// let mut mesh = MeshData::with_name("Triangle");
/// mesh.vertices = vec![
///     Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
///     Vertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [1.0, 0.0]),
///     Vertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0]),
/// ];
/// mesh.indices = vec![0, 1, 2];
/// assert!(mesh.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// 网格名称
    pub name: String,

    /// 顶点数组
    pub vertices: Vec<Vertex>,

    /// 索引数组
    ///
    /// 三角形顶点索引，每3个索引定义一个三角形。
    pub indices: Vec<u32>,

    /// 材质索引（指向 `ModelData::materials`），`None` 表示使用默认材质
    pub material_index: Option<usize>,
}

impl MeshData {
    /// 创建一个空的网格数据
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建一个指定名称的空网格数据
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// 创建一个带容量预分配的网格数据
    pub fn with_capacity(name: impl Into<String>, vertex_capacity: usize, index_capacity: usize) -> Self {
        Self {
            name: name.into(),
            vertices: Vec::with_capacity(vertex_capacity),
            indices: Vec::with_capacity(index_capacity),
            material_index: None,
        }
    }

    /// 获取顶点数量
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// 获取索引数量
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// 获取三角形数量
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// 是否没有可绘制的三角形
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.indices.len() < 3
    }

    /// 验证网格数据的有效性
    ///
    /// 检查索引数量是3的倍数，且所有索引都在有效范围内。
    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err(format!(
                "mesh '{}': index count {} is not a multiple of 3",
                self.name,
                self.indices.len()
            ));
        }

        let vertex_count = self.vertices.len();
        if let Some((i, &index)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, &index)| index as usize >= vertex_count)
        {
            return Err(format!(
                "mesh '{}': index {} at position {} is out of range (vertex count {})",
                self.name, index, i, vertex_count
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        let mut mesh = MeshData::with_name("tri");
        mesh.vertices = vec![Vertex::default(); 3];
        mesh.indices = vec![0, 1, 2];
        mesh
    }

    #[test]
    fn test_mesh_data_creation() {
        let mesh = MeshData::new();

        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
        assert!(mesh.is_empty());
        assert!(mesh.material_index.is_none());
    }

    #[test]
    fn test_mesh_data_with_capacity() {
        let mesh = MeshData::with_capacity("big", 100, 300);

        assert_eq!(mesh.name, "big");
        assert!(mesh.vertices.capacity() >= 100);
        assert!(mesh.indices.capacity() >= 300);
    }

    #[test]
    fn test_mesh_data_counts() {
        let mesh = triangle();

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.index_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.is_empty());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_mesh_data_validation_invalid_index_count() {
        let mut mesh = triangle();
        mesh.indices.push(0);

        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_mesh_data_validation_invalid_index_range() {
        let mut mesh = triangle();
        mesh.indices = vec![0, 1, 5];

        let result = mesh.validate();
        assert!(result.unwrap_err().contains("out of range"));
    }
}
