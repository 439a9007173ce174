use thiserror::Error;

use grindvakt_capture::CaptureError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Capture error: {0}")]
    Capture(#[from] CaptureError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Runtime error: {0}")]
    Runtime(String),
}
