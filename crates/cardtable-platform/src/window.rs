//! Window Management
//!
//! Window configuration and the drawable size the render loop tracks.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use winit::dpi::LogicalSize;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

use crate::PlatformResult;

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width in logical pixels
    pub width: u32,
    /// Initial height in logical pixels
    pub height: u32,
    /// Whether the window is resizable
    pub resizable: bool,
    /// Target frames per second for the render tick
    pub target_fps: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: String::from("Card Table - Programmable Pipeline"),
            width: 800,
            height: 650,
            resizable: true,
            target_fps: 60,
        }
    }
}

impl WindowConfig {
    /// Attributes used to create the native window
    pub fn attributes(&self) -> WindowAttributes {
        WindowAttributes::default()
            .with_title(self.title.clone())
            .with_inner_size(LogicalSize::new(self.width.max(1), self.height.max(1)))
            .with_resizable(self.resizable)
    }

    /// Create the native window on a running event loop
    pub fn create_window(&self, event_loop: &ActiveEventLoop) -> PlatformResult<Arc<Window>> {
        let window = event_loop.create_window(self.attributes())?;
        log::info!("Created window \"{}\" ({}x{})", self.title, self.width, self.height);
        Ok(Arc::new(window))
    }
}

/// Window events the render loop reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum WindowEvent {
    /// Window was resized
    Resized { width: u32, height: u32 },
    /// Window close was requested
    CloseRequested,
}

impl WindowEvent {
    /// Translate a winit window event, if it is one we track
    pub fn from_winit(event: &winit::event::WindowEvent) -> Option<Self> {
        use winit::event::WindowEvent as W;

        match event {
            W::Resized(size) => Some(Self::Resized {
                width: size.width,
                height: size.height,
            }),
            W::CloseRequested => Some(Self::CloseRequested),
            _ => None,
        }
    }
}

/// Current drawable size of the window
#[derive(Debug, Clone, PartialEq)]
pub struct WindowState {
    /// Current width in physical pixels
    pub width: u32,
    /// Current height in physical pixels
    pub height: u32,
}

impl WindowState {
    /// Initial state for a window created from the given config
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            width: config.width,
            height: config.height,
        }
    }

    /// A zero-sized window (minimized on some platforms) cannot be drawn into
    pub fn is_drawable(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Update state from an event
    pub fn handle_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::Resized { width, height } = event {
            self.width = *width;
            self.height = *height;
        }
    }
}
