//! Help 菜单打开的窗口

use crate::gui::state::GuiState;

/// 按键说明
const CONTROLS: &[(&str, &str)] = &[
    ("W / S", "Move forward / backward"),
    ("A / D", "Move left / right"),
    ("E / R", "Move up / down"),
    ("Mouse wheel", "Zoom"),
    ("Middle drag / X + move", "Orbit the model"),
    ("Ctrl + Shift + move", "Pan"),
    ("Ctrl + middle drag", "Pan"),
    ("F", "Fit model to screen"),
    ("K", "Log camera position"),
    ("Ctrl + O", "Import model"),
    ("Ctrl + Z", "Undo rotation"),
    ("Esc", "Quit"),
];

/// 渲染 Controls 和 About 窗口
pub fn render(ctx: &egui::Context, state: &mut GuiState) {
    egui::Window::new("Controls")
        .open(&mut state.show_controls)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            egui::Grid::new("controls_grid").num_columns(2).striped(true).show(ui, |ui| {
                for (keys, action) in CONTROLS {
                    ui.label(egui::RichText::new(*keys).strong());
                    ui.label(*action);
                    ui.end_row();
                }
            });
        });

    egui::Window::new("About")
        .open(&mut state.show_about)
        .resizable(false)
        .collapsible(false)
        .show(ctx, |ui| {
            ui.heading("GripXel MK 1");
            ui.label(format!("Version {}", env!("CARGO_PKG_VERSION")));
            ui.label("A 3D model viewer for OBJ, glTF, STL and FBX files.");
        });
}
