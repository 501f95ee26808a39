//! 统一的数学库模块
//!
//! 基于 `nalgebra` 提供查看器使用的向量、矩阵类型以及少量辅助函数。
//!
//! # 模块组织
//!
//! - **基础类型**：Vector2/3/4, Matrix4, Point3
//! - **常量**：DEG_TO_RAD, EPSILON 等
//! - **工具函数**：clamp, approx_eq 等
//! - **矩阵辅助函数**：透视投影（0..1 深度）、look_at、绕点旋转

pub use nalgebra::{
    Matrix4 as Mat4, Point3 as Pnt3, Vector2 as Vec2, Vector3 as Vec3, Vector4 as Vec4,
};

// 类型别名，使用更简洁的名称
pub type Vector2 = Vec2<f32>;
pub type Vector3 = Vec3<f32>;
pub type Vector4 = Vec4<f32>;
pub type Matrix4 = Mat4<f32>;
pub type Point3 = Pnt3<f32>;

/// 数学常量
pub mod constants {
    /// 角度转弧度的系数
    pub const DEG_TO_RAD: f32 = std::f32::consts::PI / 180.0;

    /// 弧度转角度的系数
    pub const RAD_TO_DEG: f32 = 180.0 / std::f32::consts::PI;

    /// 浮点数比较的 epsilon
    pub const EPSILON: f32 = 1e-6;
}

/// 数学工具函数
pub mod utils {
    use super::constants::*;

    /// 限制值在范围内
    pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
        if value < min {
            min
        } else if value > max {
            max
        } else {
            value
        }
    }

    /// 角度转弧度
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * DEG_TO_RAD
    }

    /// 弧度转角度
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * RAD_TO_DEG
    }

    /// 近似相等比较
    pub fn approx_eq(a: f32, b: f32, epsilon: f32) -> bool {
        (a - b).abs() < epsilon
    }
}

/// 矩阵辅助函数
pub mod matrix {
    use super::*;

    /// 右手坐标系透视投影，深度范围 [0, 1]（wgpu / D3D 约定）
    ///
    /// `nalgebra::Matrix4::new_perspective` 输出的是 OpenGL 的 [-1, 1] 深度，
    /// 直接用于 wgpu 会丢掉一半的深度精度并裁掉近处的几何体。
    pub fn perspective_rh_zo(fov_y: f32, aspect: f32, near: f32, far: f32) -> Matrix4 {
        let f = 1.0 / (0.5 * fov_y).tan();
        let range = far / (near - far);

        #[rustfmt::skip]
        let m = Matrix4::new(
            f / aspect, 0.0, 0.0,          0.0,
            0.0,        f,   0.0,          0.0,
            0.0,        0.0, range,        range * near,
            0.0,        0.0, -1.0,         0.0,
        );
        m
    }

    /// 视图矩阵（右手坐标系）
    pub fn look_at(eye: &Vector3, target: &Vector3, up: &Vector3) -> Matrix4 {
        Matrix4::look_at_rh(&Point3::from(*eye), &Point3::from(*target), up)
    }

    /// 绕世界空间中的某点旋转：T(p) * R * T(-p)
    pub fn rotation_about(pivot: &Vector3, rotation: &Matrix4) -> Matrix4 {
        Matrix4::new_translation(pivot) * rotation * Matrix4::new_translation(&-pivot)
    }
}
