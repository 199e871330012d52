//! Configuration types for the stage loop.
//!
//! Every constant the scenario needs (thresholds, offsets, delays, file names)
//! lives here and is passed into the controller. Loaded from a JSON file when
//! one is given; any missing field takes its default.

use crate::desktop::Point;
use crate::game_automation::ClickOffset;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Confidence threshold {0} is outside [-1, 1]")]
    InvalidThreshold(f32),

    #[error("Scales must be a non-empty list of positive numbers, got {0:?}")]
    InvalidScales(Vec<f32>),

    #[error("Click offset for {step} must lie in [0, 1], got ({x}, {y})")]
    InvalidOffset { step: &'static str, x: f64, y: f64 },

    #[error("Battle poll interval must be at least one second")]
    ZeroPollInterval,

    #[error("Retry limit must allow at least one click attempt")]
    ZeroRetryLimit,

    #[error("Round limit must be at least one round")]
    ZeroRoundLimit,
}

/// Template file names inside the image directory
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateNames {
    /// Stage entry on the stage list
    pub stage: String,
    /// Team selection screen with the start button
    pub team_select: String,
    /// Prompt shown when there is no stamina left
    pub no_stamina: String,
    /// Battle won banner
    pub battle_success: String,
    /// Button leading back to the stage list
    pub return_to_stage: String,
}

impl Default for TemplateNames {
    fn default() -> Self {
        Self {
            stage: "stage105.png".to_string(),
            team_select: "teamselect.png".to_string(),
            no_stamina: "buystamina.png".to_string(),
            battle_success: "success.png".to_string(),
            return_to_stage: "return.png".to_string(),
        }
    }
}

/// Where to click inside a match, and how long to let the game settle after
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepConfig {
    pub offset: ClickOffset,
    pub delay_ms: u64,
}

impl StepConfig {
    pub const fn new(x: f64, y: f64, delay_ms: u64) -> Self {
        Self {
            offset: ClickOffset::new(x, y),
            delay_ms,
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

/// Per-step click settings
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepTimings {
    pub select_stage: StepConfig,
    pub select_team: StepConfig,
    pub dismiss_result: StepConfig,
    pub return_to_stage: StepConfig,
}

impl Default for StepTimings {
    fn default() -> Self {
        Self {
            select_stage: StepConfig::new(0.75, 0.5, 2000),
            select_team: StepConfig::new(0.9, 0.92, 3000),
            dismiss_result: StepConfig::new(0.5, 0.5, 2000),
            return_to_stage: StepConfig::new(0.5, 0.5, 3000),
        }
    }
}

/// Complete scenario configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Directory holding the templates and the screenshot file
    pub image_dir: PathBuf,
    /// Screenshot file name inside `image_dir`, overwritten on every capture
    pub screenshot_file: String,
    /// Minimum correlation to treat a template as present
    pub confidence_threshold: f32,
    /// Template scale factors tried on every match
    pub scales: Vec<f32>,
    /// Click attempts per step before the scenario gives up
    pub retry_limit: u32,
    /// Longest a battle may take before the run is abandoned
    pub max_battle_secs: u64,
    /// Interval between battle outcome checks
    pub battle_poll_secs: u64,
    /// Duration of every eased pointer move
    pub pointer_motion_ms: u64,
    /// Where the pointer rests during battle
    pub neutral_point: Point,
    /// Grace period before the first capture, to bring the game to the front
    pub startup_delay_ms: u64,
    /// Stop after this many completed rounds; run until a stop condition if unset
    pub max_rounds: Option<u32>,
    pub templates: TemplateNames,
    pub steps: StepTimings,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            image_dir: PathBuf::from("images"),
            screenshot_file: "screenshot.png".to_string(),
            confidence_threshold: 0.8,
            scales: vec![1.0],
            retry_limit: 3,
            max_battle_secs: 120,
            battle_poll_secs: 10,
            pointer_motion_ms: 500,
            neutral_point: Point::new(4, 4),
            startup_delay_ms: 1000,
            max_rounds: None,
            templates: TemplateNames::default(),
            steps: StepTimings::default(),
        }
    }
}

impl ScenarioConfig {
    /// Load a JSON config file; absent fields keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Reject values the matcher or the scenario cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(-1.0..=1.0).contains(&self.confidence_threshold) {
            return Err(ConfigError::InvalidThreshold(self.confidence_threshold));
        }
        if self.scales.is_empty() || self.scales.iter().any(|s| !(s.is_finite() && *s > 0.0)) {
            return Err(ConfigError::InvalidScales(self.scales.clone()));
        }
        if self.battle_poll_secs == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.retry_limit == 0 {
            return Err(ConfigError::ZeroRetryLimit);
        }
        if self.max_rounds == Some(0) {
            return Err(ConfigError::ZeroRoundLimit);
        }

        let steps = [
            ("select_stage", &self.steps.select_stage),
            ("select_team", &self.steps.select_team),
            ("dismiss_result", &self.steps.dismiss_result),
            ("return_to_stage", &self.steps.return_to_stage),
        ];
        for (step, config) in steps {
            if !config.offset.is_within_region() {
                return Err(ConfigError::InvalidOffset {
                    step,
                    x: config.offset.x,
                    y: config.offset.y,
                });
            }
        }
        Ok(())
    }

    pub fn screenshot_path(&self) -> PathBuf {
        self.image_dir.join(&self.screenshot_file)
    }

    pub fn template_path(&self, file_name: &str) -> PathBuf {
        self.image_dir.join(file_name)
    }

    pub fn max_battle(&self) -> Duration {
        Duration::from_secs(self.max_battle_secs)
    }

    pub fn battle_poll_interval(&self) -> Duration {
        Duration::from_secs(self.battle_poll_secs)
    }

    pub fn pointer_motion(&self) -> Duration {
        Duration::from_millis(self.pointer_motion_ms)
    }

    pub fn startup_delay(&self) -> Duration {
        Duration::from_millis(self.startup_delay_ms)
    }
}
