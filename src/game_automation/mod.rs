// Game automation module
// Click tasks with bounded retries and the stage loop built on them. Talks to
// the host only through the desktop traits.

pub mod clicker;
pub mod error;
pub mod scenario;
pub mod task;
pub mod types;


// Re-export the main types and functions for easy access
pub use clicker::{click_point, locate_and_click};
pub use error::{AutomationError, AutomationResult};
pub use scenario::{ScenarioController, run_scenario};
pub use task::{ClickTask, ClickTaskState, TaskTransition, run_click_task};
pub use types::{BattleOutcome, ClickAttempt, ClickOffset, ScenarioOutcome, ScenarioStep};
