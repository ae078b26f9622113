use thiserror::Error;

pub type WindowResult<T> = Result<T, WindowError>;

#[derive(Error, Debug)]
pub enum WindowError {
    #[error("Failed to initialize the window system: {0}")]
    InitFailed(String),
    #[error("Failed to create a graphics context: {0}")]
    ContextCreation(String),
    #[error("The window is not initialized")]
    NotInitialized,
    #[error("Invalid window size {width}x{height}")]
    InvalidSize { width: u32, height: u32 },
    #[error("The window backend reported an error: {0}")]
    Backend(String),
}
