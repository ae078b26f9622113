pub mod input_manager;
pub mod keyboard;
pub mod mouse;

pub use input_manager::{InputManager, KEY_COUNT, MOUSE_BUTTON_COUNT};
pub use keyboard::Key;
pub use machi_event::Modifiers;
pub use mouse::MouseButton;
