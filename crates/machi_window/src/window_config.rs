use nalgebra_glm::UVec2;

/// Window creation parameters.
///
/// Backends treat `size` as a hint for fullscreen windows; it is used again
/// when the window goes back to windowed mode.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub size: UVec2,
    pub fullscreen: bool,
    pub vsync: bool,
    /// Multisample count, 0 disables multisampling.
    pub samples: u8,
    pub resizable: bool,
}

impl WindowConfig {
    pub fn normal_window(title: impl Into<String>, size: UVec2) -> Self {
        Self {
            title: title.into(),
            size,
            fullscreen: false,
            vsync: true,
            samples: 0,
            resizable: true,
        }
    }

    pub fn fullscreen_window(title: impl Into<String>, size: UVec2) -> Self {
        Self {
            fullscreen: true,
            ..Self::normal_window(title, size)
        }
    }
}
