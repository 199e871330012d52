/// Template matching module for locating UI elements in screenshots
///
/// This module provides:
/// - Grayscale loading from a file path or a decoded image
/// - Area-averaging template rescaling
/// - Normalized correlation-coefficient matching over a set of scales
pub mod error;
pub mod matcher;
pub mod resize;
pub mod types;

pub use error::MatchError;
pub use matcher::{correlation_coefficient_normed, load_gray, match_gray, match_template};
pub use types::{ImageSource, MatchResult, Region};
