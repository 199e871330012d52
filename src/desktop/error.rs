use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for desktop capture and pointer operations.
pub type DesktopResult<T> = Result<T, DesktopError>;

/// The error type for all host screen and pointer operations.
#[derive(Debug, Error)]
pub enum DesktopError {
    #[error("No monitor found to capture")]
    NoMonitor,

    #[error("Screen capture failed: {source}")]
    Capture {
        #[from]
        source: xcap::XCapError,
    },

    #[error("Failed to connect to the input system: {source}")]
    PointerConnection {
        #[from]
        source: enigo::NewConError,
    },

    #[error("Pointer input failed: {source}")]
    PointerInput {
        #[from]
        source: enigo::InputError,
    },

    #[error("Failed to save screenshot to {path:?}: {source}")]
    ScreenshotSave {
        path: PathBuf,
        source: image::ImageError,
    },
}
