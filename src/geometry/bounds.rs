//! 轴对齐包围盒

use crate::math::{Matrix4, Point3, Vector3};

/// 轴对齐包围盒（AABB）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vector3,
    pub max: Vector3,
}

impl Aabb {
    /// 由两个角点创建，分量会被重新排序
    pub fn new(a: Vector3, b: Vector3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// 空包围盒（min > max），与任何点合并后即为该点
    pub fn empty() -> Self {
        Self {
            min: Vector3::repeat(f32::INFINITY),
            max: Vector3::repeat(f32::NEG_INFINITY),
        }
    }

    /// 包含所有点的最小包围盒，没有点时返回 `None`
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vector3>,
    {
        let mut bounds = Self::empty();
        for point in points {
            bounds.expand(&point);
        }
        if bounds.is_empty() {
            None
        } else {
            Some(bounds)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// 扩展以包含一个点
    pub fn expand(&mut self, point: &Vector3) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    pub fn depth(&self) -> f32 {
        self.max.z - self.min.z
    }

    pub fn size(&self) -> Vector3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vector3 {
        (self.min + self.max) * 0.5
    }

    /// 三维对角线长度
    pub fn diagonal(&self) -> f32 {
        self.size().norm()
    }

    /// XY 平面上的对角线长度，用作平移速度的尺度
    pub fn diagonal_xy(&self) -> f32 {
        (self.width() * self.width() + self.height() * self.height()).sqrt()
    }

    /// 变换后的包围盒（对 8 个角点变换后重新求包围盒）
    pub fn transformed(&self, matrix: &Matrix4) -> Aabb {
        let corners = (0..8).map(|i| {
            let corner = Point3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            matrix.transform_point(&corner).coords
        });
        Aabb::from_points(corners).unwrap_or(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points() {
        let bounds = Aabb::from_points(vec![
            Vector3::new(1.0, -2.0, 0.5),
            Vector3::new(-1.0, 3.0, 0.0),
            Vector3::new(0.0, 0.0, 2.5),
        ])
        .unwrap();

        assert_eq!(bounds.min, Vector3::new(-1.0, -2.0, 0.0));
        assert_eq!(bounds.max, Vector3::new(1.0, 3.0, 2.5));
        assert_eq!(bounds.width(), 2.0);
        assert_eq!(bounds.height(), 5.0);
        assert_eq!(bounds.depth(), 2.5);
        assert_eq!(bounds.center(), Vector3::new(0.0, 0.5, 1.25));
    }

    #[test]
    fn test_from_no_points() {
        assert!(Aabb::from_points(Vec::new()).is_none());
        assert!(Aabb::empty().is_empty());
    }

    #[test]
    fn test_new_orders_corners() {
        let bounds = Aabb::new(Vector3::new(1.0, 1.0, 1.0), Vector3::new(-1.0, 0.0, 2.0));
        assert_eq!(bounds.min, Vector3::new(-1.0, 0.0, 1.0));
        assert_eq!(bounds.max, Vector3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn test_diagonals() {
        let bounds = Aabb::new(Vector3::zeros(), Vector3::new(3.0, 4.0, 12.0));
        assert!((bounds.diagonal_xy() - 5.0).abs() < 1e-6);
        assert!((bounds.diagonal() - 13.0).abs() < 1e-6);
    }

    #[test]
    fn test_transformed() {
        let bounds = Aabb::new(Vector3::new(-1.0, -1.0, -1.0), Vector3::new(1.0, 1.0, 1.0));
        let matrix = Matrix4::new_translation(&Vector3::new(10.0, 0.0, 0.0))
            * Matrix4::new_nonuniform_scaling(&Vector3::new(2.0, 1.0, 1.0));

        let moved = bounds.transformed(&matrix);
        assert_eq!(moved.min, Vector3::new(8.0, -1.0, -1.0));
        assert_eq!(moved.max, Vector3::new(12.0, 1.0, 1.0));
    }
}
