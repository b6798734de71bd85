//! Application Loop
//!
//! Owns the window, renderer and camera, and drives frames at the configured
//! rate from the winit event loop.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use cardtable_core::{camera_channel, CameraQueue, CameraSender, CameraState};
use cardtable_platform::{
    create_event_loop, FrameTimer, InputEvent, InputState, KeyCode, WindowEvent, WindowState,
};
use cardtable_renderer::Renderer;
use winit::application::ApplicationHandler;
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::window::{Window, WindowId};

use crate::config::AppConfig;

/// Seconds between frame rate reports
const FPS_REPORT_SECONDS: u64 = 5;

/// Turns input events into queued camera actions
#[derive(Debug)]
pub struct InputRouter {
    input: InputState,
    sender: CameraSender,
}

impl InputRouter {
    pub fn new(sender: CameraSender) -> Self {
        Self {
            input: InputState::new(),
            sender,
        }
    }

    /// Forward an event; returns true if it asks the application to quit
    pub fn route(&mut self, event: &InputEvent) -> bool {
        if *event == InputEvent::KeyPressed(KeyCode::Escape) {
            return true;
        }
        for action in self.input.handle_event(event) {
            self.sender.send(action);
        }
        false
    }
}

/// The card table viewer
pub struct CardTableApp {
    config: AppConfig,
    runtime: tokio::runtime::Runtime,
    window: Option<Arc<Window>>,
    renderer: Option<Renderer>,
    window_state: WindowState,
    router: InputRouter,
    camera: CameraState,
    camera_queue: CameraQueue,
    timer: FrameTimer,
    error: Option<anyhow::Error>,
}

impl CardTableApp {
    pub fn new(config: AppConfig) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .context("creating async runtime")?;
        let (sender, camera_queue) = camera_channel();

        Ok(Self {
            window_state: WindowState::new(&config.window),
            router: InputRouter::new(sender),
            camera: CameraState::with_eye_distance(config.scene.eye_distance),
            camera_queue,
            timer: FrameTimer::new(config.window.target_fps),
            runtime,
            window: None,
            renderer: None,
            error: None,
            config,
        })
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window = self.config.window.create_window(event_loop)?;
        let size = window.inner_size();
        self.window_state.handle_event(&WindowEvent::Resized {
            width: size.width,
            height: size.height,
        });

        let renderer = self
            .runtime
            .block_on(Renderer::new(
                window.clone(),
                &self.config.renderer,
                &self.config.shaders,
                &self.config.scene,
            ))
            .context("initialising renderer")?;

        self.renderer = Some(renderer);
        self.window = Some(window);
        self.timer = FrameTimer::new(self.config.window.target_fps);
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.error = Some(err);
        event_loop.exit();
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.timer.tick();
        let applied = self.camera_queue.drain_into(&mut self.camera);
        log::trace!("camera {:?} ({} actions)", self.camera, applied);

        if !self.window_state.is_drawable() {
            return;
        }
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };
        if let Err(err) = renderer.render(&self.camera) {
            self.fail(event_loop, anyhow::Error::new(err).context("rendering frame"));
            return;
        }

        let report_every = u64::from(self.config.window.target_fps.max(1)) * FPS_REPORT_SECONDS;
        if self.timer.frame_count() % report_every == 0 {
            log::debug!(
                "{:.1} fps ({:.2} ms/frame)",
                self.timer.fps(),
                self.timer.average_frame_time_ms()
            );
        }
    }

    /// The error that stopped the loop, if any
    pub fn finish(self) -> Result<()> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for CardTableApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init(event_loop) {
            self.fail(event_loop, err);
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: winit::event::WindowEvent) {
        if let Some(input) = InputEvent::from_winit(&event) {
            if self.router.route(&input) {
                log::info!("Escape pressed, exiting");
                event_loop.exit();
                return;
            }
        }

        if let Some(window_event) = WindowEvent::from_winit(&event) {
            self.window_state.handle_event(&window_event);
            match window_event {
                WindowEvent::Resized { width, height } => {
                    if let Some(renderer) = self.renderer.as_mut() {
                        renderer.resize(width, height);
                    }
                }
                WindowEvent::CloseRequested => {
                    log::info!("Window closed, exiting");
                    event_loop.exit();
                }
            }
        }

        if matches!(event, winit::event::WindowEvent::RedrawRequested) {
            self.redraw(event_loop);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if event_loop.exiting() {
            return;
        }
        if self.timer.is_due(Instant::now()) {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.timer.next_deadline()));
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(renderer) = self.renderer.take() {
            let stats = renderer.stats();
            log::info!(
                "Presented {} frames ({} skipped)",
                stats.frames_presented,
                stats.frames_skipped
            );
        }
        self.window = None;
    }
}

/// Open the window and run until it is closed
pub fn run(config: AppConfig) -> Result<()> {
    let event_loop = create_event_loop()?;
    let mut app = CardTableApp::new(config)?;
    event_loop.run_app(&mut app).context("running event loop")?;
    app.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardtable_platform::MouseButton;

    #[test]
    fn test_escape_requests_exit() {
        let (sender, queue) = camera_channel();
        let mut router = InputRouter::new(sender);
        assert!(router.route(&InputEvent::KeyPressed(KeyCode::Escape)));
        assert_eq!(queue.pending(), 0);
    }

    #[test]
    fn test_input_reaches_camera_through_queue() {
        let (sender, queue) = camera_channel();
        let mut router = InputRouter::new(sender);
        let mut camera = CameraState::default();

        assert!(!router.route(&InputEvent::KeyPressed(KeyCode::Left)));
        assert!(!router.route(&InputEvent::KeyPressed(KeyCode::Left)));
        assert!(!router.route(&InputEvent::KeyReleased(KeyCode::Left)));
        // not applied until drained
        assert_eq!(camera.rotation_y, 0.0);

        assert_eq!(queue.drain_into(&mut camera), 2);
        assert_eq!(camera.rotation_y, -4.0);
    }

    #[test]
    fn test_drag_then_reset() {
        let (sender, queue) = camera_channel();
        let mut router = InputRouter::new(sender);
        let mut camera = CameraState::default();

        router.route(&InputEvent::MouseMoved { x: 0.0, y: 0.0 });
        router.route(&InputEvent::MousePressed(MouseButton::Left));
        router.route(&InputEvent::MouseMoved { x: 4.0, y: 0.0 });
        queue.drain_into(&mut camera);
        assert_eq!(camera.rotation_y, 2.0);

        router.route(&InputEvent::KeyPressed(KeyCode::R));
        queue.drain_into(&mut camera);
        assert_eq!(camera, CameraState::default());
    }

    #[test]
    fn test_app_starts_without_window() {
        let app = CardTableApp::new(AppConfig::default()).unwrap();
        assert!(app.window.is_none());
        assert!(app.renderer.is_none());
        assert_eq!(app.camera, CameraState::default());
        assert!(app.finish().is_ok());
    }
}
