mod headless;
mod raw_event;
mod window_backend;
mod window_config;
mod window_manager;

#[cfg(feature = "sdl")]
mod sdl;

pub mod window_error;

pub use headless::{HeadlessProbe, HeadlessWindow};
pub use raw_event::{Action, RawWindowEvent};
pub use window_backend::{ContextInfo, WindowBackend};
pub use window_config::WindowConfig;
pub use window_error::{WindowError, WindowResult};
pub use window_manager::{WindowEventContext, WindowManager};

#[cfg(feature = "sdl")]
pub use sdl::SdlWindow;
