use machi_input::InputManager;
use machi_render::GraphicsDevice;
use nalgebra_glm::UVec2;

use crate::EngineControl;

/// Everything an [`Application`] sees during one frame.
pub struct Frame<'a> {
    pub device: &'a mut dyn GraphicsDevice,
    pub input: &'a InputManager,
    pub control: &'a EngineControl,
    /// Seconds since the previous frame.
    pub delta_time: f32,
    /// Seconds since the engine was initialized.
    pub total_time: f32,
    pub window_size: UVec2,
}

impl Frame<'_> {
    pub fn aspect_ratio(&self) -> f32 {
        if self.window_size.y == 0 {
            1.0
        } else {
            self.window_size.x as f32 / self.window_size.y as f32
        }
    }
}

/// User code driven by the engine loop. `update` and `render` are skipped
/// while the engine is paused.
pub trait Application {
    fn update(&mut self, _frame: &mut Frame<'_>) {}

    fn render(&mut self, _frame: &mut Frame<'_>) {}

    /// Called once after the loop ends, before the engine shuts down.
    fn on_shutdown(&mut self, _device: &mut dyn GraphicsDevice) {}
}

impl Application for () {}
