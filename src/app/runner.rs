//! winit application handler driving a [`Window`]

use std::sync::Arc;

use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window as NativeWindow, WindowId as NativeWindowId};

use super::translate::EventTranslator;
use super::window::{apply_cursor_mode, window_attributes_from_config};
use crate::config::AppConfig;
use crate::time::FrameClock;
use crate::window::{CursorMode, Window};

/// Per-frame application logic
pub trait Scene {
    /// Called once, after the window has been created
    fn setup(&mut self, _window: &Window) {}

    /// Called every loop iteration with the seconds since the previous frame
    fn frame(&mut self, window: &Window, dt: f32);
}

/// Runs a [`Scene`] inside a winit event loop
///
/// winit events are translated and delivered to the native window, so
/// everything downstream sees them exactly as native callbacks.
pub struct App<S: Scene> {
    config: AppConfig,
    scene: S,
    native: Option<Arc<NativeWindow>>,
    window: Option<Window>,
    translator: EventTranslator,
    clock: FrameClock,
    applied_cursor: CursorMode,
}

impl<S: Scene> App<S> {
    pub fn new(config: AppConfig, scene: S) -> Self {
        info!(profile = %config.profile, "Starting application");
        info!(?config.window, "Window configuration");
        Self {
            config,
            scene,
            native: None,
            window: None,
            translator: EventTranslator::default(),
            clock: FrameClock::new(),
            applied_cursor: CursorMode::Normal,
        }
    }

    /// Creates the application with configuration loaded from environment
    pub fn from_env(scene: S) -> Self {
        let config = AppConfig::load_from_env().unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load config, using default configuration");
            AppConfig::default()
        });
        Self::new(config, scene)
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// The wrapped window, once the event loop has resumed
    pub fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }

    /// Mirrors the requested cursor mode onto the real window
    fn sync_cursor(&mut self) {
        let (Some(native), Some(window)) = (&self.native, &self.window) else {
            return;
        };
        let mode = window.cursor_mode();
        if mode != self.applied_cursor {
            apply_cursor_mode(native, mode);
            self.applied_cursor = mode;
        }
    }

    fn exit_if_closing(&self, event_loop: &ActiveEventLoop) {
        if self.window.as_ref().is_some_and(Window::should_close) {
            info!("Close requested, exiting");
            event_loop.exit();
        }
    }
}

impl<S: Scene> ApplicationHandler for App<S> {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = window_attributes_from_config(&self.config.window);
        let native = match event_loop.create_window(attributes) {
            Ok(native) => Arc::new(native),
            Err(e) => {
                error!(error = %e, "Failed to create window");
                event_loop.exit();
                return;
            }
        };

        let scale = native.scale_factor();
        let size = native.inner_size().to_logical::<f64>(scale);
        info!(
            window.width = size.width,
            window.height = size.height,
            scale,
            "Window created successfully"
        );
        self.translator.set_scale(scale);

        let window = Window::new(
            &self.config.window.title,
            size.width.round() as i32,
            size.height.round() as i32,
        );
        if !window.exists() {
            event_loop.exit();
            return;
        }
        window.set_chaining(self.config.window.chaining);
        for event in self
            .translator
            .translate(&WindowEvent::Resized(native.inner_size()))
        {
            window.deliver(event);
        }
        if native.has_focus() {
            window.deliver(crate::window::NativeEvent::Focus(true));
        }

        self.scene.setup(&window);
        self.native = Some(native);
        self.window = Some(window);
        self.clock.reset();
        self.sync_cursor();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: NativeWindowId,
        event: WindowEvent,
    ) {
        let Some(window) = &self.window else {
            return;
        };

        // A locked cursor is driven by device motion instead
        let disabled = window.cursor_mode() == CursorMode::Disabled;
        if !(disabled && matches!(event, WindowEvent::CursorMoved { .. })) {
            for native_event in self.translator.translate(&event) {
                window.deliver(native_event);
            }
        }

        self.sync_cursor();
        self.exit_if_closing(event_loop);
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(window) = &self.window else {
            return;
        };
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event
            && window.cursor_mode() == CursorMode::Disabled
            && window.is_focused()
        {
            window.deliver(self.translator.motion(dx, dy));
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Some(window) = &self.window else {
            return;
        };

        let dt = self.clock.tick();
        self.scene.frame(window, dt);

        if let Some(native) = &self.native {
            let title = window.title();
            if native.title() != title {
                native.set_title(&title);
            }
            native.request_redraw();
        }

        self.sync_cursor();
        self.exit_if_closing(event_loop);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Drop the wrapper before the native window it mirrors
        self.window = None;
        self.native = None;
    }
}
