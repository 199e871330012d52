// Desktop module - host screen capture and pointer control
// The automation only talks to the `ScreenCapture` and `Pointer` traits, so
// tests can swap the real monitor/pointer for scripted fakes.

pub mod backend;
pub mod error;
pub mod motion;
pub mod types;


// Re-export the main types and functions for easy access
pub use backend::DesktopBackend;
pub use error::{DesktopError, DesktopResult};
pub use motion::{ease_in_out_quad, motion_path};
pub use types::{Desktop, ImageCapture, Point, Pointer, ScreenCapture};
