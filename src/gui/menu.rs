//! 主菜单栏
//!
//! 菜单只产生 [`GuiAction`]，由查看器在 GUI 帧结束后执行
//! （文件对话框会阻塞，不能在 egui 帧内部打开）。

use crate::gfx::ShadingMode;
use crate::gui::state::GuiState;

/// 菜单触发的操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuiAction {
    /// File → Import...
    Import,
    /// File → Close
    CloseModel,
    /// File → Exit
    Exit,
    /// Edit → Undo
    Undo,
    /// View → Fit to screen
    FitToScreen,
    /// View → Reset view
    ResetView,
    /// View → Shading
    SetShading(ShadingMode),
}

/// 绘制菜单栏
pub fn render(ctx: &egui::Context, state: &mut GuiState, actions: &mut Vec<GuiAction>) {
    egui::TopBottomPanel::top("main_menu").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.add(egui::Button::new("Import...").shortcut_text("Ctrl+O")).clicked() {
                    actions.push(GuiAction::Import);
                    ui.close_menu();
                }
                if ui.add_enabled(state.model.is_some(), egui::Button::new("Close")).clicked() {
                    actions.push(GuiAction::CloseModel);
                    ui.close_menu();
                }
                ui.separator();
                if ui.add(egui::Button::new("Exit").shortcut_text("Esc")).clicked() {
                    actions.push(GuiAction::Exit);
                    ui.close_menu();
                }
            });

            ui.menu_button("Edit", |ui| {
                let undo = egui::Button::new("Undo").shortcut_text("Ctrl+Z");
                if ui.add_enabled(state.can_undo, undo).clicked() {
                    actions.push(GuiAction::Undo);
                    ui.close_menu();
                }
            });

            ui.menu_button("View", |ui| {
                let fit = egui::Button::new("Fit to screen").shortcut_text("F");
                if ui.add_enabled(state.model.is_some(), fit).clicked() {
                    actions.push(GuiAction::FitToScreen);
                    ui.close_menu();
                }
                if ui.button("Reset view").clicked() {
                    actions.push(GuiAction::ResetView);
                    ui.close_menu();
                }
                ui.separator();
                ui.label("Shading");
                for mode in ShadingMode::ALL {
                    if ui.radio(state.shading == mode, mode.label()).clicked() && state.shading != mode {
                        actions.push(GuiAction::SetShading(mode));
                    }
                }
                ui.separator();
                ui.checkbox(&mut state.show_info_panel, "Show info panel");
            });

            ui.menu_button("Help", |ui| {
                if ui.button("Controls").clicked() {
                    state.show_controls = true;
                    ui.close_menu();
                }
                if ui.button("About").clicked() {
                    state.show_about = true;
                    ui.close_menu();
                }
            });
        });
    });
}
