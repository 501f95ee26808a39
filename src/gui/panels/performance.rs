//! 性能监控面板
//!
//! 显示 FPS、帧时间等性能指标。

use crate::gui::state::GuiState;

/// 渲染性能面板
pub fn render(ui: &mut egui::Ui, state: &GuiState) {
    ui.collapsing("Performance", |ui| {
        ui.label(format!("FPS: {:.1}", state.fps));
        ui.label(format!("Frame time: {:.2} ms", state.frame_time_ms));

        if state.frame_time_ms > 0.0 {
            let target_60fps = 1000.0 / 60.0;
            let color = if state.frame_time_ms <= target_60fps {
                egui::Color32::GREEN
            } else {
                egui::Color32::RED
            };

            ui.colored_label(color,
                if state.frame_time_ms <= target_60fps {
                    "✓ 60 FPS"
                } else {
                    "⚠ below 60 FPS"
                }
            );
        }
    });
}
