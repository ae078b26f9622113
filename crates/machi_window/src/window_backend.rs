use std::fmt::Display;

use nalgebra_glm::UVec2;

use crate::{RawWindowEvent, WindowConfig, WindowResult};

/// Description of the window system and graphics context in use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    pub backend: String,
    pub video_driver: String,
    pub context_version: String,
}

impl Display for ContextInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (driver: {}, context: {})",
            self.backend, self.video_driver, self.context_version
        )
    }
}

/// OS window plus the graphics context bound to it.
pub trait WindowBackend {
    /// Creates the window and makes its context current.
    fn initialize(&mut self, config: &WindowConfig) -> WindowResult<()>;
    fn is_initialized(&self) -> bool;

    fn should_close(&self) -> bool;
    fn request_close(&mut self);

    /// Pumps the platform queue and returns what happened since the last call.
    fn poll_events(&mut self) -> WindowResult<Vec<RawWindowEvent>>;
    fn swap_buffers(&mut self);

    fn size(&self) -> UVec2;
    fn set_size(&mut self, size: UVec2) -> WindowResult<()>;
    fn set_title(&mut self, title: &str) -> WindowResult<()>;
    fn set_fullscreen(&mut self, fullscreen: bool) -> WindowResult<()>;
    fn is_fullscreen(&self) -> bool;
    fn set_vsync(&mut self, enabled: bool) -> WindowResult<()>;

    fn context_info(&self) -> ContextInfo;
}
