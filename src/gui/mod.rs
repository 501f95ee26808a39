//! GUI 系统模块
//!
//! 基于 egui + wgpu 实现的 GUI：主菜单栏、信息面板、帮助窗口和导入对话框。

mod manager;
mod state;
mod metrics;
mod menu;
pub mod dialog;
pub mod panels;

pub use manager::GuiManager;
pub use menu::GuiAction;
pub use state::{GuiState, ModelInfo};
