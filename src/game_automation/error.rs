use crate::desktop::DesktopError;
use crate::template_matching::MatchError;
use thiserror::Error;

/// A specialized `Result` type for automation steps.
pub type AutomationResult<T> = Result<T, AutomationError>;

/// Failures the automation cannot recover from. Low confidence, exhausted
/// retries and timeouts are outcomes, not errors.
#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("Template matching failed: {source}")]
    Matching {
        #[from]
        source: MatchError,
    },

    #[error("Desktop operation failed: {source}")]
    Desktop {
        #[from]
        source: DesktopError,
    },
}
