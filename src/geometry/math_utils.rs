//! 几何数学工具模块
//!
//! 加载后处理：为缺少法线的网格重建顶点法线。

use crate::geometry::vertex::Vertex;
use crate::math::Vector3;

/// 从三角形面重建顶点法线
///
/// 面法线不归一化直接累加到三个顶点上，因此大三角形权重更高（面积加权），
/// 最后归一化。越界的索引被跳过，退化三角形对结果没有贡献。
///
/// # 示例
///
/// ```rust
/// use gripxel::geometry::math_utils::reconstruct_normals;
/// use gripxel::geometry::Vertex;
///
/// let mut vertices = vec![
///     Vertex::new([0.0, 0.0, 0.0], [0.0; 3], [0.0, 0.0]),
///     Vertex::new([1.0, 0.0, 0.0], [0.0; 3], [1.0, 0.0]),
///     Vertex::new([0.0, 1.0, 0.0], [0.0; 3], [0.0, 1.0]),
/// ];
/// reconstruct_normals(&mut vertices, &[0, 1, 2]);
/// assert!((vertices[0].normal[2] - 1.0).abs() < 1e-6);
/// ```
pub fn reconstruct_normals(vertices: &mut [Vertex], indices: &[u32]) {
    let mut accumulated = vec![Vector3::zeros(); vertices.len()];

    for triangle in indices.chunks_exact(3) {
        let i0 = triangle[0] as usize;
        let i1 = triangle[1] as usize;
        let i2 = triangle[2] as usize;
        if i0 >= vertices.len() || i1 >= vertices.len() || i2 >= vertices.len() {
            continue;
        }

        let p0 = Vector3::from(vertices[i0].position);
        let p1 = Vector3::from(vertices[i1].position);
        let p2 = Vector3::from(vertices[i2].position);

        let face_normal = (p1 - p0).cross(&(p2 - p0));

        accumulated[i0] += face_normal;
        accumulated[i1] += face_normal;
        accumulated[i2] += face_normal;
    }

    for (vertex, normal) in vertices.iter_mut().zip(accumulated) {
        vertex.normal = normal
            .try_normalize(1e-12)
            .map(|n| n.into())
            .unwrap_or([0.0, 0.0, 0.0]);
    }
}

/// 网格是否缺少可用的法线（全部为零向量）
pub fn lacks_normals(vertices: &[Vertex]) -> bool {
    vertices.iter().all(|v| v.normal == [0.0, 0.0, 0.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(position: [f32; 3]) -> Vertex {
        Vertex::new(position, [0.0; 3], [0.0, 0.0])
    }

    #[test]
    fn test_reconstruct_normals_simple_triangle() {
        // XZ 平面上的三角形，逆时针（从 +Y 看）
        let mut vertices = vec![
            flat([0.0, 0.0, 0.0]),
            flat([0.0, 0.0, 1.0]),
            flat([1.0, 0.0, 0.0]),
        ];

        reconstruct_normals(&mut vertices, &[0, 1, 2]);

        for vertex in &vertices {
            let n = Vector3::from(vertex.normal);
            assert!((n - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6, "{:?}", vertex.normal);
        }
    }

    #[test]
    fn test_shared_vertex_is_area_weighted() {
        // 顶点 0 同时属于一个大三角形（+Z 朝向）和一个小三角形（+X 朝向）
        let mut vertices = vec![
            flat([0.0, 0.0, 0.0]),
            flat([4.0, 0.0, 0.0]),
            flat([0.0, 4.0, 0.0]),
            flat([0.0, 0.1, 0.0]),
            flat([0.0, 0.0, 0.1]),
        ];

        reconstruct_normals(&mut vertices, &[0, 1, 2, 0, 3, 4]);

        let n = vertices[0].normal;
        assert!(n[2] > n[0]);
        assert!(((n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_indices_are_skipped() {
        let mut vertices = vec![flat([0.0; 3]), flat([1.0, 0.0, 0.0])];
        reconstruct_normals(&mut vertices, &[0, 1, 7]);
        assert!(lacks_normals(&vertices));
    }

    #[test]
    fn test_lacks_normals() {
        let mut vertices = vec![flat([0.0; 3])];
        assert!(lacks_normals(&vertices));
        vertices[0].normal = [0.0, 1.0, 0.0];
        assert!(!lacks_normals(&vertices));
    }
}
