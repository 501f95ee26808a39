//! GUI 状态管理
//!
//! GuiState 保存所有 GUI 相关的状态数据，与具体的图形后端无关。
//! 查看器每帧把模型和相机信息写进来，菜单和面板只读取或切换开关。

use crate::core::config::GuiConfig;
use crate::geometry::ModelData;
use crate::gfx::ShadingMode;

/// 当前模型的摘要信息
#[derive(Debug, Clone, PartialEq)]
pub struct ModelInfo {
    pub name: String,
    pub path: String,
    pub meshes: usize,
    pub vertices: usize,
    pub triangles: usize,
    pub materials: usize,
    pub textured_materials: usize,
    /// 包围盒尺寸（宽、高、深）
    pub size: [f32; 3],
}

impl ModelInfo {
    pub fn from_model(model: &ModelData) -> Self {
        let size = model.bounds.size();
        Self {
            name: model.name.clone(),
            path: model.source.display().to_string(),
            meshes: model.mesh_count(),
            vertices: model.total_vertices(),
            triangles: model.total_triangles(),
            materials: model.materials.len(),
            textured_materials: model.textured_materials(),
            size: [size.x, size.y, size.z],
        }
    }
}

/// GUI 状态（与后端无关）
#[derive(Debug, Clone)]
pub struct GuiState {
    // 性能监控
    pub fps: f32,
    pub frame_time_ms: f32,

    // 模型与相机
    pub model: Option<ModelInfo>,
    pub camera_position: [f32; 3],
    pub camera_zoom: f32,

    // 渲染设置
    pub shading: ShadingMode,

    // 窗口开关
    pub show_info_panel: bool,
    pub show_controls: bool,
    pub show_about: bool,

    /// 状态栏文本（最近一次导入的结果）
    pub status: String,

    /// 是否有可撤销的操作
    pub can_undo: bool,
}

impl GuiState {
    /// 从配置创建 GUI 状态
    pub fn new(config: &GuiConfig) -> Self {
        Self {
            fps: 0.0,
            frame_time_ms: 0.0,
            model: None,
            camera_position: [0.0; 3],
            camera_zoom: 45.0,
            shading: ShadingMode::default(),
            show_info_panel: config.show_info_panel,
            show_controls: false,
            show_about: false,
            status: "No model loaded.".to_string(),
            can_undo: false,
        }
    }

    /// 更新性能统计
    pub fn update_performance(&mut self, fps: f32, frame_time_ms: f32) {
        self.fps = fps;
        self.frame_time_ms = frame_time_ms;
    }

    /// 设置状态栏文本
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{MeshData, Vertex};

    #[test]
    fn test_new_state_follows_config() {
        let config = GuiConfig {
            show_info_panel: false,
            ..GuiConfig::default()
        };
        let state = GuiState::new(&config);
        assert!(!state.show_info_panel);
        assert!(state.model.is_none());
        assert_eq!(state.shading, ShadingMode::Textured);
    }

    #[test]
    fn test_model_info() {
        let mut mesh = MeshData::with_name("tri");
        mesh.vertices = vec![
            Vertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([2.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
            Vertex::new([0.0, 3.0, 1.0], [0.0, 0.0, 1.0], [0.0, 0.0]),
        ];
        mesh.indices = vec![0, 1, 2];
        let model = ModelData::new("dir/tri.stl", vec![mesh], Vec::new()).unwrap();

        let info = ModelInfo::from_model(&model);
        assert_eq!(info.name, "tri.stl");
        assert_eq!(info.triangles, 1);
        assert_eq!(info.vertices, 3);
        assert_eq!(info.size, [2.0, 3.0, 1.0]);
    }
}
