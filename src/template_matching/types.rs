/// Template matching data types
use image::DynamicImage;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Where an image for matching comes from
#[derive(Debug, Clone, Copy)]
pub enum ImageSource<'a> {
    /// Image file on disk, decoded on every call
    Path(&'a Path),
    /// Already decoded pixels (any colour depth)
    Decoded(&'a DynamicImage),
}

impl<'a> From<&'a Path> for ImageSource<'a> {
    fn from(path: &'a Path) -> Self {
        ImageSource::Path(path)
    }
}

impl<'a> From<&'a PathBuf> for ImageSource<'a> {
    fn from(path: &'a PathBuf) -> Self {
        ImageSource::Path(path.as_path())
    }
}

impl<'a> From<&'a DynamicImage> for ImageSource<'a> {
    fn from(image: &'a DynamicImage) -> Self {
        ImageSource::Decoded(image)
    }
}

impl ImageSource<'_> {
    /// Human readable origin for log lines
    pub fn describe(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Decoded(image) => format!("<image {}x{}>", image.width(), image.height()),
        }
    }
}

/// Bounding box of a match in screen pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Region {
    /// X coordinate of the top-left corner
    pub x: u32,
    /// Y coordinate of the top-left corner
    pub y: u32,
    /// Width of the scaled template
    pub width: u32,
    /// Height of the scaled template
    pub height: u32,
}

impl Region {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Best match over every scale that was tried
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchResult {
    /// Correlation coefficient in [-1, 1]; higher is a stronger match
    pub confidence: f32,
    /// Location and size of the best-scoring window
    pub region: Region,
    /// Scale factor that produced this match
    pub scale: f32,
}

impl MatchResult {
    /// Whether this match clears `threshold`
    pub fn is_confident(&self, threshold: f32) -> bool {
        self.confidence >= threshold
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{},{},{},{}] conf={:.3} scale={:.2}",
            self.region.x,
            self.region.y,
            self.region.width,
            self.region.height,
            self.confidence,
            self.scale
        )
    }
}
