//! Camera 组件
//!
//! 自由飞行相机：键盘移动、滚轮缩放、平移，以及把模型包围盒放进视野的
//! "适配屏幕"操作。

use crate::core::config::CameraSettings;
use crate::geometry::Aabb;
use crate::math::{Vector3, Matrix4};
use crate::math::matrix::{look_at, perspective_rh_zo};
use crate::math::utils::{clamp, deg_to_rad};

/// 默认偏航角（度），使相机初始朝向 -Z
const DEFAULT_YAW: f32 = -90.0;

/// 适配屏幕时视场角的放大系数
const FIT_FOV_FACTOR: f32 = 1.2;

/// 适配屏幕时的距离系数
const FIT_DISTANCE_FACTOR: f32 = 5.0;

/// 键盘移动方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMovement {
    Forward,
    Backward,
    Left,
    Right,
    Up,
    Down,
}

/// Camera 组件
///
/// 使用欧拉角（yaw / pitch）描述朝向，`zoom` 即垂直视场角（度）。
#[derive(Debug, Clone)]
pub struct Camera {
    /// 相机位置
    position: Vector3,

    /// 相机坐标系：前向量
    front: Vector3,

    /// 相机坐标系：上向量
    up: Vector3,

    /// 相机坐标系：右向量
    right: Vector3,

    /// 世界上向量
    world_up: Vector3,

    /// 偏航角（度）
    yaw: f32,

    /// 俯仰角（度）
    pitch: f32,

    /// 移动速度（单位/秒）
    movement_speed: f32,

    /// 鼠标灵敏度（度/像素）
    mouse_sensitivity: f32,

    /// 缩放（垂直视场角，度）
    zoom: f32,
    min_zoom: f32,
    max_zoom: f32,

    /// 近裁剪面距离
    near_z: f32,

    /// 远裁剪面距离（适配屏幕时可能被扩大）
    far_z: f32,

    /// 配置中的远裁剪面距离
    base_far_z: f32,

    /// 宽高比
    aspect: f32,
}

impl Camera {
    /// 从配置创建相机
    pub fn new(settings: &CameraSettings, aspect: f32) -> Self {
        let mut camera = Self {
            position: Vector3::from(settings.position),
            front: Vector3::new(0.0, 0.0, -1.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            right: Vector3::new(1.0, 0.0, 0.0),
            world_up: Vector3::new(0.0, 1.0, 0.0),
            yaw: DEFAULT_YAW,
            pitch: 0.0,
            movement_speed: settings.movement_speed,
            mouse_sensitivity: settings.mouse_sensitivity,
            zoom: settings.zoom,
            min_zoom: settings.min_zoom,
            max_zoom: settings.max_zoom,
            near_z: settings.near_clip,
            far_z: settings.far_clip,
            base_far_z: settings.far_clip,
            aspect,
        };
        camera.update_camera_vectors();
        camera
    }

    // ========== 属性 ==========

    /// 获取相机位置
    pub fn position(&self) -> Vector3 {
        self.position
    }

    /// 获取前向量
    pub fn front(&self) -> Vector3 {
        self.front
    }

    /// 获取右向量
    pub fn right(&self) -> Vector3 {
        self.right
    }

    /// 获取上向量
    pub fn up(&self) -> Vector3 {
        self.up
    }

    /// 获取缩放（垂直视场角，度）
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// 获取鼠标灵敏度
    pub fn mouse_sensitivity(&self) -> f32 {
        self.mouse_sensitivity
    }

    /// 获取移动速度
    pub fn movement_speed(&self) -> f32 {
        self.movement_speed
    }

    /// 获取远裁剪面距离
    pub fn far_z(&self) -> f32 {
        self.far_z
    }

    /// 获取宽高比
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// 设置宽高比
    pub fn set_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    // ========== 矩阵 ==========

    /// 获取视图矩阵
    pub fn view_matrix(&self) -> Matrix4 {
        look_at(&self.position, &(self.position + self.front), &self.up)
    }

    /// 获取投影矩阵（深度范围 0..1）
    pub fn projection_matrix(&self) -> Matrix4 {
        perspective_rh_zo(deg_to_rad(self.zoom), self.aspect, self.near_z, self.far_z)
    }

    // ========== 相机操作 ==========

    /// 键盘移动
    pub fn process_keyboard(&mut self, direction: CameraMovement, delta_time: f32) {
        let velocity = self.movement_speed * delta_time;
        match direction {
            CameraMovement::Forward => self.position += self.front * velocity,
            CameraMovement::Backward => self.position -= self.front * velocity,
            CameraMovement::Left => self.position -= self.right * velocity,
            CameraMovement::Right => self.position += self.right * velocity,
            CameraMovement::Up => self.position += self.up * velocity,
            CameraMovement::Down => self.position -= self.up * velocity,
        }
    }

    /// 滚轮缩放：向上滚动减小视场角（拉近）
    pub fn process_scroll(&mut self, y_offset: f32) {
        self.zoom = clamp(self.zoom - y_offset, self.min_zoom, self.max_zoom);
    }

    /// 平移相机
    ///
    /// 平移速度与模型尺寸（包围盒 XY 对角线）和帧时间成正比，
    /// 拖动方向与屏幕坐标一致（`dx` 向右，`dy` 向下）。
    pub fn pan(&mut self, dx: f32, dy: f32, extent: f32, delta_time: f32) {
        let pan_speed = extent * delta_time;
        self.position += -self.right * (dx * pan_speed);
        self.position += self.up * (dy * pan_speed);
    }

    /// 适配屏幕：沿当前朝向后退，直到包围盒进入视野
    ///
    /// 返回相机到包围盒中心的距离。远裁剪面会被扩大以容纳整个模型。
    pub fn fit_to_bounds(&mut self, bounds: &Aabb) -> f32 {
        let mut extent = bounds.width().max(bounds.height());
        if extent <= f32::EPSILON {
            extent = bounds.depth().max(1.0);
        }
        let half_size = extent / 2.0;

        let angle = deg_to_rad((FIT_FOV_FACTOR * self.zoom).min(89.0));
        let distance = half_size / angle.tan() * FIT_DISTANCE_FACTOR;

        let forward = self.front.normalize();
        self.position = bounds.center() - forward * distance;
        self.far_z = self.base_far_z.max(distance + bounds.diagonal() * 2.0);
        self.update_camera_vectors();

        distance
    }

    /// 根据欧拉角重新计算坐标系向量
    pub fn update_camera_vectors(&mut self) {
        let yaw = deg_to_rad(self.yaw);
        let pitch = deg_to_rad(self.pitch);

        let front = Vector3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        );
        self.front = front.normalize();
        self.right = self.front.cross(&self.world_up).normalize();
        self.up = self.right.cross(&self.front).normalize();
    }

    /// 恢复到配置中的位置与朝向
    pub fn reset(&mut self, settings: &CameraSettings) {
        let aspect = self.aspect;
        *self = Self::new(settings, aspect);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(&CameraSettings::default(), 1.25)
    }

    fn approx(a: Vector3, b: Vector3) -> bool {
        (a - b).norm() < 1e-4
    }

    #[test]
    fn test_default_orientation() {
        let camera = camera();
        assert!(approx(camera.front(), Vector3::new(0.0, 0.0, -1.0)));
        assert!(approx(camera.right(), Vector3::new(1.0, 0.0, 0.0)));
        assert!(approx(camera.up(), Vector3::new(0.0, 1.0, 0.0)));
        assert!(approx(camera.position(), Vector3::new(0.0, 0.0, 3.0)));
    }

    #[test]
    fn test_keyboard_movement() {
        let mut camera = camera();
        camera.process_keyboard(CameraMovement::Forward, 1.0);
        assert!(approx(camera.position(), Vector3::new(0.0, 0.0, 0.5)));

        camera.process_keyboard(CameraMovement::Right, 2.0);
        assert!(approx(camera.position(), Vector3::new(5.0, 0.0, 0.5)));

        camera.process_keyboard(CameraMovement::Down, 0.4);
        assert!(approx(camera.position(), Vector3::new(5.0, -1.0, 0.5)));
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut camera = camera();
        camera.process_scroll(10.0);
        assert_eq!(camera.zoom(), 35.0);

        camera.process_scroll(100.0);
        assert_eq!(camera.zoom(), 1.0);

        camera.process_scroll(-100.0);
        assert_eq!(camera.zoom(), 45.0);
    }

    #[test]
    fn test_fit_to_bounds() {
        let mut camera = camera();
        let bounds = Aabb::new(Vector3::new(-1.0, -2.0, -1.0), Vector3::new(3.0, 2.0, 1.0));

        let distance = camera.fit_to_bounds(&bounds);

        // half = 2, angle = 54 deg
        let expected = 2.0 / deg_to_rad(54.0).tan() * 5.0;
        assert!((distance - expected).abs() < 1e-4);
        assert!(approx(camera.position(), Vector3::new(1.0, 0.0, expected)));
        assert!(camera.far_z() >= 100.0);
    }

    #[test]
    fn test_fit_extends_far_plane_for_large_models() {
        let mut camera = camera();
        let bounds = Aabb::new(Vector3::new(-500.0, -500.0, -500.0), Vector3::new(500.0, 500.0, 500.0));

        let distance = camera.fit_to_bounds(&bounds);
        assert!(camera.far_z() > distance + 500.0);
    }

    #[test]
    fn test_fit_degenerate_bounds() {
        let mut camera = camera();
        let point = Aabb::new(Vector3::new(1.0, 1.0, 1.0), Vector3::new(1.0, 1.0, 1.0));
        let distance = camera.fit_to_bounds(&point);
        assert!(distance.is_finite() && distance > 0.0);
    }

    #[test]
    fn test_pan_moves_against_drag_horizontally() {
        let mut camera = camera();
        camera.pan(10.0, 0.0, 2.0, 0.1);
        assert!(approx(camera.position(), Vector3::new(-2.0, 0.0, 3.0)));

        camera.pan(0.0, 5.0, 2.0, 0.1);
        assert!(approx(camera.position(), Vector3::new(-2.0, 1.0, 3.0)));
    }

    #[test]
    fn test_projection_uses_zoom() {
        let mut camera = camera();
        let wide = camera.projection_matrix();
        camera.process_scroll(20.0);
        let narrow = camera.projection_matrix();
        assert!(narrow[(1, 1)] > wide[(1, 1)]);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = camera();
        let view = camera.view_matrix();
        let eye = view.transform_point(&crate::math::Point3::new(0.0, 0.0, 3.0));
        assert!(eye.coords.norm() < 1e-5);
    }
}
