use machi_window::WindowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Window system failed: {0}")]
    Window(#[from] WindowError),
    #[error("The engine has been shut down")]
    ShutDown,
}

pub type EngineResult<T> = Result<T, EngineError>;
