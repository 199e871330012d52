use std::path::PathBuf;
use thiserror::Error;

/// The error type for template matching.
#[derive(Debug, Error)]
pub enum MatchError {
    #[error("Failed to load image {path:?}: {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("At least one scale factor is required")]
    EmptyScaleSet,

    #[error("Scale factor {scale} is not a positive number")]
    InvalidScale { scale: f32 },

    #[error(
        "Template {template_width}x{template_height} does not fit in {image_width}x{image_height} at any of the scales {scales:?}"
    )]
    NoScaleFits {
        template_width: u32,
        template_height: u32,
        image_width: u32,
        image_height: u32,
        scales: Vec<f32>,
    },
}
