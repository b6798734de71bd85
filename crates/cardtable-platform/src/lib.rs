//! # Card Table Platform
//!
//! Window, input and timing layer for the card table viewer.
//!
//! This crate provides:
//! - **Window**: window configuration and tracked window state
//! - **Input**: keyboard/mouse events and their camera bindings
//! - **Timers**: fixed-rate frame scheduling and scoped timings

pub mod input;
pub mod timer;
pub mod window;

pub use input::{InputEvent, InputState, KeyCode, Modifiers, MouseButton};
pub use timer::{FrameTimer, RollingTimer, ScopedTimer, MAX_FPS};
pub use window::{WindowConfig, WindowEvent, WindowState};

use thiserror::Error;

/// Platform-specific errors
#[derive(Error, Debug)]
pub enum PlatformError {
    #[error("Window creation failed: {0}")]
    WindowCreation(#[from] winit::error::OsError),

    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Result type for platform operations
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Create the event loop the application runs on
pub fn create_event_loop() -> PlatformResult<winit::event_loop::EventLoop<()>> {
    Ok(winit::event_loop::EventLoop::new()?)
}
