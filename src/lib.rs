pub mod config;
pub mod desktop;
pub mod game_automation;
pub mod template_matching;

#[cfg(test)]
mod test_support;

pub use config::{ConfigError, ScenarioConfig};
pub use desktop::DesktopBackend;
pub use game_automation::{ScenarioController, ScenarioOutcome, run_scenario};
