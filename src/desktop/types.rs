// Core desktop types and capability traits
use super::error::{DesktopError, DesktopResult};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Pixel position on the host screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A screenshot that was written to disk
#[derive(Debug, Clone, Serialize)]
pub struct ImageCapture {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub duration_ms: u128,
}

// Trait defining screen capture (real monitor or scripted frames)
#[allow(async_fn_in_trait)]
pub trait ScreenCapture {
    // Raw backend-specific capture of the full screen
    async fn capture(&mut self) -> DesktopResult<DynamicImage>;

    // Capture and overwrite `path` with the new frame
    async fn capture_to(&mut self, path: &Path) -> DesktopResult<ImageCapture> {
        let start = std::time::Instant::now();
        let image = self.capture().await?;
        // JPEG cannot carry alpha, so drop it before encoding
        DynamicImage::ImageRgb8(image.to_rgb8())
            .save(path)
            .map_err(|source| DesktopError::ScreenshotSave {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(ImageCapture {
            path: path.to_path_buf(),
            width: image.width(),
            height: image.height(),
            duration_ms: start.elapsed().as_millis(),
        })
    }
}

// Trait defining pointer control
#[allow(async_fn_in_trait)]
pub trait Pointer {
    /// Move to `target`, easing in and out over `duration`
    async fn move_to(&mut self, target: Point, duration: Duration) -> DesktopResult<()>;

    /// Primary-button click at the current position
    async fn click(&mut self) -> DesktopResult<()>;
}

/// Everything the automation needs from the host
pub trait Desktop: ScreenCapture + Pointer {}

impl<T: ScreenCapture + Pointer> Desktop for T {}
