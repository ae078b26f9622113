pub use machi_config as config;
pub use machi_core as core;
pub use machi_event as event;
pub use machi_input as input;
pub use machi_log as log;
pub use machi_render as render;
pub use machi_window as window;

mod application;
mod clock;
mod control;
mod engine;
mod engine_config;
mod engine_error;

pub use application::{Application, Frame};
pub use clock::{Clock, ManualClock, SystemClock};
pub use control::EngineControl;
pub use engine::{engine_version, Engine, EngineState, ENGINE_VERSION};
pub use engine_config::EngineConfig;
pub use engine_error::{EngineError, EngineResult};

pub mod prelude {
    pub use crate::{Application, Engine, EngineConfig, EngineControl, Frame};
    pub use machi_event::{Event, EventKind, EventQueue, EventType};
    pub use machi_input::{InputManager, Key, MouseButton};
    pub use machi_log::{debug, error, fatal, info, trace, warning, Logger};
    pub use machi_render::{Camera, GraphicsDevice, Shader, Texture};
}
