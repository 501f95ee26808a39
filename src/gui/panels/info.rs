//! 信息面板
//!
//! 当前模型、相机和最近一次导入的状态。

use crate::gui::panels::performance;
use crate::gui::state::GuiState;

/// 渲染右侧信息面板
pub fn render(ctx: &egui::Context, state: &GuiState) {
    egui::SidePanel::right("info_panel")
        .default_width(280.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Info");
            ui.separator();

            performance::render(ui, state);
            ui.separator();

            ui.collapsing("Model", |ui| match &state.model {
                Some(model) => {
                    egui::Grid::new("model_info").num_columns(2).show(ui, |ui| {
                        ui.label("Name");
                        ui.label(&model.name);
                        ui.end_row();
                        ui.label("Meshes");
                        ui.label(model.meshes.to_string());
                        ui.end_row();
                        ui.label("Vertices");
                        ui.label(model.vertices.to_string());
                        ui.end_row();
                        ui.label("Triangles");
                        ui.label(model.triangles.to_string());
                        ui.end_row();
                        ui.label("Materials");
                        ui.label(format!("{} ({} textured)", model.materials, model.textured_materials));
                        ui.end_row();
                        ui.label("Size");
                        ui.label(format!(
                            "{:.3} x {:.3} x {:.3}",
                            model.size[0], model.size[1], model.size[2]
                        ));
                        ui.end_row();
                    });
                    ui.label(egui::RichText::new(&model.path).small().weak());
                }
                None => {
                    ui.label("No model loaded. Use File → Import...");
                }
            });
            ui.separator();

            ui.collapsing("Camera", |ui| {
                let p = state.camera_position;
                ui.label(format!("Position: ({:.2}, {:.2}, {:.2})", p[0], p[1], p[2]));
                ui.label(format!("Zoom: {:.1}°", state.camera_zoom));
                ui.label(format!("Shading: {}", state.shading.label()));
            });
            ui.separator();

            ui.label(egui::RichText::new(&state.status).italics());
        });
}
