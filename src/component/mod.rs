//! 组件模块
//!
//! 查看器状态中与渲染无关的部分：相机、模型变换、撤销历史和光源。

mod camera;
mod history;
mod light;
mod transform;

pub use camera::{Camera, CameraMovement};
pub use history::{UndoStack, DEFAULT_UNDO_CAPACITY};
pub use light::DirectionalLight;
pub use transform::ModelTransform;
