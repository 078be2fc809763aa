//! Event handler: routes winit events into the session.

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, MouseButton, TouchPhase, WindowEvent},
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::app::app_state::AppState;
use crate::config::Options;
use crate::game::keys::{GameKey, PadKey, winit_key_to_game_key};
use crate::gaze::GazeSource;

/// The application: owns the window, the state, and the gaze source handed
/// over at startup.
pub struct App {
    options: Options,
    pending_gaze: Option<Box<dyn GazeSource>>,
    pub state: Option<AppState>,
    pub window: Option<Window>,
}

impl App {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            pending_gaze: None,
            state: None,
            window: None,
        }
    }

    /// Installs an eye-tracking source before the event loop starts.
    pub fn with_gaze_source(mut self, source: Box<dyn GazeSource>) -> Self {
        self.pending_gaze = Some(source);
        self
    }

    fn handle_key_event(&mut self, event: &KeyEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let Some(key) = winit_key_to_game_key(&event.logical_key) else {
            return;
        };

        match event.state {
            ElementState::Pressed => match key {
                GameKey::Escape => {
                    state.capture_mouse = false;
                    if let Some(window) = self.window.as_ref() {
                        state.triage_mouse(window);
                    }
                }
                GameKey::ExportData => {
                    if !event.repeat {
                        state.export();
                    }
                }
                _ => state.keys.press_key(key),
            },
            ElementState::Released => state.keys.release_key(key),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let attributes = Window::default_attributes().with_title("sightline");
        let window = match event_loop.create_window(attributes) {
            Ok(window) => window,
            Err(err) => {
                error!("failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };

        match AppState::new(&self.options, self.pending_gaze.take()) {
            Ok(state) => {
                info!("session ready, click to capture the pointer, WASD to move");
                self.state = Some(state);
                self.window = Some(window);
            }
            Err(err) => {
                error!("failed to start session: {err}");
                event_loop.exit();
            }
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if let Some(state) = self.state.as_mut() {
                if state.capture_mouse {
                    state.session.mouse_look(delta.0);
                }
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                if let Some(state) = self.state.as_mut() {
                    state.cancel_tasks();
                }
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                if let Some(state) = self.state.as_mut() {
                    state.scene.resize(size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.handle_key_event(&event);
            }
            WindowEvent::CursorMoved { position, .. } => {
                if let Some(state) = self.state.as_mut() {
                    state.cursor_position = position;
                    if !state.capture_mouse {
                        state.pointer_hover();
                    }
                }
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(state) = self.state.as_mut() {
                    if state.pointer_click() {
                        if let Some(window) = self.window.as_ref() {
                            state.triage_mouse(window);
                        }
                    }
                }
            }
            WindowEvent::Touch(touch) => {
                if let (Some(state), Some(window)) = (self.state.as_mut(), self.window.as_ref()) {
                    let size = window.inner_size();
                    match touch.phase {
                        TouchPhase::Started | TouchPhase::Moved => {
                            let key = PadKey::from_touch(
                                touch.location,
                                (f64::from(size.width), f64::from(size.height)),
                            );
                            state.keys.press_pad(touch.id, key);
                        }
                        TouchPhase::Ended | TouchPhase::Cancelled => {
                            state.keys.release_pad(touch.id);
                        }
                    }
                }
            }
            WindowEvent::RedrawRequested => {
                self.handle_redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}
