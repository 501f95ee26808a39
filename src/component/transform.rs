//! 模型变换组件
//!
//! 查看器通过旋转模型（而不是绕模型转动相机）实现轨道观察。
//! 旋转以模型包围盒中心为支点，模型在旋转时不会移出视野。

use crate::math::{Matrix4, Point3, Vector3};
use crate::math::matrix::rotation_about;
use crate::math::utils::deg_to_rad;

/// 模型变换
#[derive(Debug, Clone)]
pub struct ModelTransform {
    /// 场景配置给出的初始矩阵
    initial: Matrix4,

    /// 当前模型矩阵
    matrix: Matrix4,

    /// 旋转支点（模型空间）
    pivot: Vector3,
}

impl ModelTransform {
    /// 从初始矩阵创建
    pub fn new(initial: Matrix4) -> Self {
        Self {
            initial,
            matrix: initial,
            pivot: Vector3::zeros(),
        }
    }

    /// 当前模型矩阵
    pub fn matrix(&self) -> Matrix4 {
        self.matrix
    }

    /// 直接设置模型矩阵（撤销时使用）
    pub fn set_matrix(&mut self, matrix: Matrix4) {
        self.matrix = matrix;
    }

    /// 设置旋转支点（模型空间坐标，通常是包围盒中心）
    pub fn set_pivot(&mut self, pivot: Vector3) {
        self.pivot = pivot;
    }

    /// 支点在世界空间中的位置
    pub fn world_pivot(&self) -> Vector3 {
        self.matrix.transform_point(&Point3::from(self.pivot)).coords
    }

    /// 轨道旋转
    ///
    /// `dx` 绕世界 Y 轴偏航，`dy` 绕世界 X 轴俯仰，单位为像素，
    /// 乘以 `sensitivity`（度/像素）。旋转组合为 pitch * yaw * model。
    pub fn orbit(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        let yaw = deg_to_rad(dx * sensitivity);
        let pitch = deg_to_rad(dy * sensitivity);

        let yaw_rotation = Matrix4::from_axis_angle(&Vector3::y_axis(), yaw);
        let pitch_rotation = Matrix4::from_axis_angle(&Vector3::x_axis(), pitch);

        let pivot = self.world_pivot();
        self.matrix = rotation_about(&pivot, &(pitch_rotation * yaw_rotation)) * self.matrix;
    }

    /// 恢复初始矩阵
    pub fn reset(&mut self) {
        self.matrix = self.initial;
    }
}

impl Default for ModelTransform {
    fn default() -> Self {
        Self::new(Matrix4::identity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orbit_keeps_pivot_in_place() {
        let mut transform = ModelTransform::default();
        transform.set_pivot(Vector3::new(2.0, 1.0, 0.0));

        transform.orbit(120.0, -45.0, 0.1);
        transform.orbit(300.0, 200.0, 0.1);

        assert!((transform.world_pivot() - Vector3::new(2.0, 1.0, 0.0)).norm() < 1e-4);
    }

    #[test]
    fn test_orbit_yaw_rotates_around_y() {
        let mut transform = ModelTransform::default();
        // 900 px * 0.1 deg/px = 90 degrees
        transform.orbit(900.0, 0.0, 0.1);

        let p = transform.matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p.coords - Vector3::new(0.0, 0.0, -1.0)).norm() < 1e-4);
    }

    #[test]
    fn test_orbit_pitch_rotates_around_x() {
        let mut transform = ModelTransform::default();
        transform.orbit(0.0, 900.0, 0.1);

        let p = transform.matrix().transform_point(&Point3::new(0.0, 1.0, 0.0));
        assert!((p.coords - Vector3::new(0.0, 0.0, 1.0)).norm() < 1e-4);
    }

    #[test]
    fn test_reset() {
        let initial = Matrix4::new_translation(&Vector3::new(0.0, 1.0, 0.0));
        let mut transform = ModelTransform::new(initial);
        transform.orbit(50.0, 50.0, 0.1);
        assert_ne!(transform.matrix(), initial);

        transform.reset();
        assert_eq!(transform.matrix(), initial);
    }
}
