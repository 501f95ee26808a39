//! GUI 管理器
//!
//! GuiManager 是 GUI 系统的核心，负责集成 egui 和 wgpu，
//! 处理输入事件，构建 UI，并渲染 GUI。

use egui_wgpu::Renderer as EguiRenderer;
use egui_winit::State as EguiState;
use winit::window::Window;

use crate::core::config::GuiConfig;
use crate::gui::menu::{self, GuiAction};
use crate::gui::metrics::PerformanceMetrics;
use crate::gui::panels;
use crate::gui::state::GuiState;

/// 一帧 UI 的输出，等待渲染
struct PendingFrame {
    paint_jobs: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

/// GUI 管理器（使用 egui + wgpu）
pub struct GuiManager {
    // egui 核心组件
    context: egui::Context,
    state: EguiState,
    renderer: EguiRenderer,

    metrics: PerformanceMetrics,
    pending: Option<PendingFrame>,
}

impl GuiManager {
    /// 创建 GUI 管理器
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        config: &GuiConfig,
    ) -> Self {
        // 创建 egui context
        let context = egui::Context::default();
        apply_style(&context, config);

        // 创建 egui-winit state
        let state = EguiState::new(
            context.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            Some(device.limits().max_texture_dimension_2d as usize),
        );

        // 创建 egui-wgpu renderer
        let renderer = EguiRenderer::new(device, surface_format, None, 1);

        Self {
            context,
            state,
            renderer,
            metrics: PerformanceMetrics::new(),
            pending: None,
        }
    }

    /// 处理输入事件
    /// 返回 true 如果事件被 GUI 消费
    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        let response = self.state.on_window_event(window, event);
        if response.repaint {
            window.request_redraw();
        }
        response.consumed
    }

    /// 鼠标是否位于 GUI 上（此时不应转动模型）
    pub fn wants_pointer_input(&self) -> bool {
        self.context.wants_pointer_input() || self.context.is_pointer_over_area()
    }

    /// 是否有文本框获得键盘焦点
    pub fn wants_keyboard_input(&self) -> bool {
        self.context.wants_keyboard_input()
    }

    /// 构建一帧 UI，返回菜单触发的操作
    pub fn run_frame(&mut self, window: &Window, gui_state: &mut GuiState) -> Vec<GuiAction> {
        // 记录帧
        self.metrics.record_frame();
        gui_state.update_performance(self.metrics.fps(), self.metrics.frame_time_ms());

        let mut actions = Vec::new();

        // 开始新帧
        let raw_input = self.state.take_egui_input(window);
        self.context.begin_frame(raw_input);

        menu::render(&self.context, gui_state, &mut actions);
        if gui_state.show_info_panel {
            panels::info::render(&self.context, gui_state);
        }
        panels::help::render(&self.context, gui_state);

        // 结束帧，获取输出
        let full_output = self.context.end_frame();

        // 处理平台输出（光标、复制粘贴等）
        self.state.handle_platform_output(window, full_output.platform_output);

        let paint_jobs = self
            .context
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        // 上一帧没渲染出去时（例如表面丢失）纹理更新不能丢
        let textures_delta = match self.pending.take() {
            Some(mut previous) => {
                previous.textures_delta.append(full_output.textures_delta);
                previous.textures_delta
            }
            None => full_output.textures_delta,
        };

        self.pending = Some(PendingFrame {
            paint_jobs,
            textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        });

        actions
    }

    /// 渲染 GUI（绘制到 wgpu）
    ///
    /// 返回 egui-wgpu 生成的额外命令缓冲，需要与主编码器一起提交。
    pub fn render(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: [u32; 2],
    ) -> Vec<wgpu::CommandBuffer> {
        let Some(frame) = self.pending.take() else {
            return Vec::new();
        };

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: frame.pixels_per_point,
        };

        // 更新纹理和缓冲
        for (id, image_delta) in &frame.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let command_buffers = self.renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.paint_jobs,
            &screen_descriptor,
        );

        // 渲染
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("GUI Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,  // 保留场景渲染结果
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.renderer.render(&mut render_pass, &frame.paint_jobs, &screen_descriptor);
        }

        // 清理释放的纹理
        for id in &frame.textures_delta.free {
            self.renderer.free_texture(id);
        }

        command_buffers
    }
}

/// 主题和字体缩放
fn apply_style(context: &egui::Context, config: &GuiConfig) {
    context.set_visuals(if config.dark_theme {
        egui::Visuals::dark()
    } else {
        egui::Visuals::light()
    });

    let mut style = (*context.style()).clone();
    for font in style.text_styles.values_mut() {
        font.size *= config.font_scale;
    }
    context.set_style(style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_scale_is_applied() {
        let context = egui::Context::default();
        let before = context.style().text_styles[&egui::TextStyle::Body].size;

        let config = GuiConfig {
            font_scale: 1.5,
            dark_theme: true,
            ..GuiConfig::default()
        };
        apply_style(&context, &config);

        let after = context.style().text_styles[&egui::TextStyle::Body].size;
        assert!((after - before * 1.5).abs() < 1e-4);
        assert!(context.style().visuals.dark_mode);
    }
}
