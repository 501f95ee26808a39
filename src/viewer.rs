//! 查看器主循环
//!
//! Viewer 持有窗口、渲染器、GUI 与全部交互状态，负责把 winit 事件
//! 分发给 GUI、输入系统、相机和模型变换，并在每次重绘时渲染一帧。

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, error, info, warn};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::EventLoop;
use winit::keyboard::PhysicalKey;

use crate::component::{Camera, DirectionalLight, ModelTransform, UndoStack, DEFAULT_UNDO_CAPACITY};
use crate::core::{Config, GripxelError, InputSystem, MouseMotion, Result, SceneConfig, ViewerCommand};
use crate::geometry::{loaders, load_model, Aabb};
use crate::gfx::{GpuModel, Renderer, SceneFrame};
use crate::gui::{dialog, GuiAction, GuiManager, GuiState, ModelInfo};
use crate::math::Matrix4;

/// 没有模型时平移使用的尺度
const DEFAULT_PAN_EXTENT: f32 = 1.0;

/// 已加载的模型
struct LoadedModel {
    gpu: GpuModel,

    /// 模型空间包围盒
    bounds: Aabb,
}

/// 查看器
pub struct Viewer {
    config: Config,
    scene: SceneConfig,

    renderer: Renderer,
    gui: GuiManager,
    gui_state: GuiState,
    input: InputSystem,

    camera: Camera,
    transform: ModelTransform,
    undo: UndoStack<Matrix4>,
    light: DirectionalLight,

    model: Option<LoadedModel>,

    last_frame: Instant,
    delta_time: f32,
    exit_requested: bool,
}

impl Viewer {
    /// 创建窗口、渲染器和 GUI，并加载启动模型（如果有）
    pub fn new(event_loop: &EventLoop<()>, config: Config, scene: SceneConfig) -> Result<Self> {
        let renderer = Renderer::new(event_loop, &config)?;

        let gui = GuiManager::new(
            &renderer.backend().device,
            renderer.backend().surface_format(),
            renderer.window(),
            &config.gui,
        );
        let gui_state = GuiState::new(&config.gui);

        let camera = Camera::new(&config.camera, renderer.aspect());
        let transform = ModelTransform::new(scene.model.transform.to_matrix());
        let light = DirectionalLight::from_config(&scene.light);

        let mut viewer = Self {
            config,
            scene,
            renderer,
            gui,
            gui_state,
            input: InputSystem::new(),
            camera,
            transform,
            undo: UndoStack::new(DEFAULT_UNDO_CAPACITY),
            light,
            model: None,
            last_frame: Instant::now(),
            delta_time: 0.0,
            exit_requested: false,
        };

        if let Some(path) = startup_model_path(&viewer.config, &viewer.scene) {
            info!(path = %path.display(), "Loading startup model");
            viewer.import_path(&path);
        }

        Ok(viewer)
    }

    /// 进入事件循环，直到窗口关闭
    pub fn run(mut self, event_loop: EventLoop<()>) -> Result<()> {
        info!("Entering main loop...");

        event_loop
            .run(move |event, elwt| {
                match event {
                    Event::WindowEvent { event, window_id }
                        if window_id == self.renderer.window().id() =>
                    {
                        self.handle_window_event(&event);
                    }
                    Event::AboutToWait => {
                        self.renderer.window().request_redraw();
                    }
                    _ => (),
                }

                if self.exit_requested {
                    info!("Shutting down...");
                    elwt.exit();
                }
            })
            .map_err(|e| GripxelError::Initialization(format!("Event loop error: {}", e)))
    }

    /// 处理窗口事件（GUI 优先）
    fn handle_window_event(&mut self, event: &WindowEvent) {
        let consumed = self.gui.handle_event(self.renderer.window(), event);

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                self.exit_requested = true;
            }
            WindowEvent::Resized(size) => {
                debug!(width = size.width, height = size.height, "Window resized");
                if self.renderer.resize(size.width, size.height) {
                    self.camera.set_aspect(self.renderer.aspect());
                }
            }
            WindowEvent::Focused(false) => {
                self.input.reset();
                self.input.sync_cursor(self.renderer.window());
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                // 文本框有焦点时按键只属于 GUI，但松开必须送达，避免按键卡住
                if *state == ElementState::Pressed && consumed && self.gui.wants_keyboard_input() {
                    return;
                }
                if let Some(command) = self.input.on_keyboard_input(*code, *state, *repeat) {
                    self.apply_command(command);
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if *state == ElementState::Pressed && self.gui.wants_pointer_input() {
                    return;
                }
                self.input.on_mouse_button(*button, *state);
            }
            WindowEvent::CursorMoved { position, .. } => {
                let position = (position.x, position.y);
                if self.gui.wants_pointer_input() {
                    self.input.track_cursor(position);
                } else if let Some(motion) = self.input.on_mouse_move(position) {
                    self.apply_motion(motion);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if consumed || self.gui.wants_pointer_input() {
                    return;
                }
                let lines = self.input.on_scroll(*delta);
                self.camera.process_scroll(lines);
            }
            WindowEvent::DroppedFile(path) => {
                if loaders::is_supported(path) {
                    info!(path = %path.display(), "File dropped");
                    self.import_path(path);
                } else {
                    warn!(path = %path.display(), "Dropped file is not a supported model");
                    self.gui_state
                        .set_status(format!("Unsupported file type: {}", path.display()));
                }
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    /// 一帧：更新相机、构建 GUI、执行菜单操作、渲染
    fn redraw(&mut self) {
        let now = Instant::now();
        self.delta_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;

        for movement in self.input.movement_directions() {
            self.camera.process_keyboard(movement, self.delta_time);
        }

        self.sync_gui_state();
        let actions = self.gui.run_frame(self.renderer.window(), &mut self.gui_state);
        for action in actions {
            self.apply_action(action);
        }
        if self.exit_requested {
            return;
        }

        let frame = SceneFrame {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            model: self.transform.matrix(),
            camera_position: self.camera.position(),
            light: &self.light,
            shading: self.gui_state.shading,
            clear_color: self.scene.clear_color,
            solid_color: self.scene.solid_color,
        };
        let model = self.model.as_ref().map(|loaded| &loaded.gpu);

        if let Err(e) = self.renderer.render(&frame, model, &mut self.gui) {
            error!("Draw failed: {}", e);
            self.exit_requested = true;
            return;
        }

        self.input.sync_cursor(self.renderer.window());
    }

    /// 把相机与撤销状态同步给 GUI
    fn sync_gui_state(&mut self) {
        self.gui_state.camera_position = self.camera.position().into();
        self.gui_state.camera_zoom = self.camera.zoom();
        self.gui_state.can_undo = !self.undo.is_empty();
    }

    /// 处理按键命令
    fn apply_command(&mut self, command: ViewerCommand) {
        match command_action(command) {
            Some(action) => self.apply_action(action),
            None => {
                let position = self.camera.position();
                info!(
                    "Camera position: ({:.3}, {:.3}, {:.3})",
                    position.x, position.y, position.z
                );
            }
        }
    }

    /// 处理鼠标拖动
    fn apply_motion(&mut self, motion: MouseMotion) {
        match motion {
            MouseMotion::Pan { dx, dy } => {
                let extent = pan_extent(self.world_bounds().as_ref());
                self.camera.pan(dx, dy, extent, self.delta_time);
            }
            MouseMotion::Orbit { dx, dy, begin } => {
                if self.model.is_none() {
                    return;
                }
                if begin {
                    self.undo.push(self.transform.matrix());
                }
                self.transform.orbit(dx, dy, self.camera.mouse_sensitivity());
            }
        }
    }

    /// 执行菜单或快捷键操作
    fn apply_action(&mut self, action: GuiAction) {
        match action {
            GuiAction::Import => self.import_from_dialog(),
            GuiAction::CloseModel => self.close_model(),
            GuiAction::Exit => {
                info!("Exit requested");
                self.exit_requested = true;
            }
            GuiAction::Undo => match self.undo.undo() {
                Some(matrix) => {
                    debug!(remaining = self.undo.len(), "Undo");
                    self.transform.set_matrix(matrix);
                }
                None => debug!("Nothing to undo"),
            },
            GuiAction::FitToScreen => self.fit_to_screen(),
            GuiAction::ResetView => {
                self.camera.reset(&self.config.camera);
                self.transform.reset();
                self.undo.clear();
                self.fit_to_screen();
            }
            GuiAction::SetShading(mode) => {
                debug!(mode = mode.label(), "Shading mode changed");
                self.gui_state.shading = mode;
            }
        }
    }

    /// 打开文件对话框导入模型
    fn import_from_dialog(&mut self) {
        if let Some(path) = accept_selection(dialog::pick_model_file(), &mut self.gui_state) {
            self.import_path(&path);
        }
    }

    /// 加载模型并替换当前模型
    ///
    /// 加载失败时保留原模型，错误显示在状态栏。
    fn import_path(&mut self, path: &Path) {
        let result = load_model(path).map(|data| {
            let loaded = LoadedModel {
                gpu: self.renderer.upload_model(&data),
                bounds: data.bounds,
            };
            (loaded, ModelInfo::from_model(&data))
        });

        // 旧模型的 GPU 资源在替换时释放
        if !apply_import(&mut self.model, &mut self.gui_state, path, result) {
            return;
        }
        let Some(center) = self.model.as_ref().map(|loaded| loaded.bounds.center()) else {
            return;
        };

        self.transform.reset();
        self.transform.set_pivot(center);
        self.undo.clear();
        self.fit_to_screen();
    }

    /// 关闭当前模型
    fn close_model(&mut self) {
        if self.model.take().is_some() {
            info!("Model closed");
        }
        self.gui_state.model = None;
        self.gui_state.set_status("No model loaded.");
        self.transform.reset();
        self.undo.clear();
    }

    /// 相机对准当前模型
    fn fit_to_screen(&mut self) {
        let Some(bounds) = self.world_bounds() else {
            debug!("Fit to screen ignored: no model loaded");
            return;
        };
        let distance = self.camera.fit_to_bounds(&bounds);
        debug!(distance, far = self.camera.far_z(), "Fit to screen");
    }

    /// 当前模型在世界空间的包围盒
    fn world_bounds(&self) -> Option<Aabb> {
        self.model
            .as_ref()
            .map(|loaded| loaded.bounds.transformed(&self.transform.matrix()))
    }
}

/// 处理对话框的返回值；取消时更新状态栏
fn accept_selection(picked: Option<PathBuf>, gui_state: &mut GuiState) -> Option<PathBuf> {
    match &picked {
        Some(path) => info!("Selected File: {}", path.display()),
        None => {
            info!("No file selected.");
            gui_state.set_status("No file selected.");
        }
    }
    picked
}

/// 应用一次导入的结果
///
/// 成功时替换 `slot` 中的模型并返回 true；失败时保留原模型，
/// 把错误写进状态栏并返回 false。
fn apply_import<T>(
    slot: &mut Option<T>,
    gui_state: &mut GuiState,
    path: &Path,
    result: Result<(T, ModelInfo)>,
) -> bool {
    match result {
        Ok((model, info)) => {
            info!(
                model = %info.name,
                meshes = info.meshes,
                vertices = info.vertices,
                triangles = info.triangles,
                "Model loaded"
            );
            gui_state.set_status(format!("Loaded {}", info.name));
            gui_state.model = Some(info);
            *slot = Some(model);
            true
        }
        Err(e) => {
            error!(path = %path.display(), "Failed to load model: {}", e);
            gui_state.set_status(format!("Failed to load {}: {}", path.display(), e));
            false
        }
    }
}

/// 按键命令对应的菜单操作；`LogCameraPosition` 没有菜单项
fn command_action(command: ViewerCommand) -> Option<GuiAction> {
    match command {
        ViewerCommand::Quit => Some(GuiAction::Exit),
        ViewerCommand::FitToScreen => Some(GuiAction::FitToScreen),
        ViewerCommand::Undo => Some(GuiAction::Undo),
        ViewerCommand::Import => Some(GuiAction::Import),
        ViewerCommand::LogCameraPosition => None,
    }
}

/// 启动模型：命令行 / config.toml 优先于 scene.toml
fn startup_model_path(config: &Config, scene: &SceneConfig) -> Option<PathBuf> {
    config
        .startup_model
        .clone()
        .or_else(|| scene.model.path.as_ref().map(PathBuf::from))
        .filter(|path| !path.as_os_str().is_empty())
}

/// 平移尺度取模型 XY 对角线
fn pan_extent(bounds: Option<&Aabb>) -> f32 {
    match bounds {
        Some(bounds) if bounds.diagonal_xy() > f32::EPSILON => bounds.diagonal_xy(),
        _ => DEFAULT_PAN_EXTENT,
    }
}
