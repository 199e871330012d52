// Types and enums for game automation
use crate::desktop::Point;
use serde::{Deserialize, Serialize};

/// Where to click inside a matched region, as fractions of its width and height
/// measured from the top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClickOffset {
    pub x: f64,
    pub y: f64,
}

impl ClickOffset {
    pub const CENTER: ClickOffset = ClickOffset::new(0.5, 0.5);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Both ratios lie in [0, 1]
    pub fn is_within_region(&self) -> bool {
        (0.0..=1.0).contains(&self.x) && (0.0..=1.0).contains(&self.y)
    }
}

impl Default for ClickOffset {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Result of one locate-and-click attempt
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickAttempt {
    /// Template found; the pointer moved to `at` and clicked
    Clicked { at: Point, confidence: f32 },
    /// Best confidence stayed under the threshold; nothing was touched
    Missed { confidence: f32 },
}

impl ClickAttempt {
    pub fn clicked(&self) -> bool {
        matches!(self, ClickAttempt::Clicked { .. })
    }

    pub fn confidence(&self) -> f32 {
        match self {
            ClickAttempt::Clicked { confidence, .. } | ClickAttempt::Missed { confidence } => {
                *confidence
            }
        }
    }
}

/// The clicking steps of one round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStep {
    SelectStage,
    SelectTeam,
    DismissResult,
    ReturnToStage,
}

impl ScenarioStep {
    /// Log line when the step ran out of attempts
    pub fn failure_reason(&self) -> &'static str {
        match self {
            ScenarioStep::SelectStage => "Entering team selection failed",
            ScenarioStep::SelectTeam => "Starting the battle failed",
            ScenarioStep::DismissResult => "Dismissing the battle result failed",
            ScenarioStep::ReturnToStage => "Returning to the stage list failed",
        }
    }
}

/// Why the scenario stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// A clicking step exhausted its retries
    StepFailed(ScenarioStep),
    /// The no-stamina prompt appeared after starting a battle
    StaminaExhausted,
    /// No victory banner before the battle deadline
    BattleTimeout,
    /// The configured number of rounds completed
    RoundLimitReached(u32),
}

impl ScenarioOutcome {
    /// Expected stops, as opposed to failures
    pub fn is_clean_stop(&self) -> bool {
        matches!(
            self,
            ScenarioOutcome::StaminaExhausted | ScenarioOutcome::RoundLimitReached(_)
        )
    }
}

impl std::fmt::Display for ScenarioOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioOutcome::StepFailed(step) => write!(f, "{}", step.failure_reason()),
            ScenarioOutcome::StaminaExhausted => write!(f, "No stamina left"),
            ScenarioOutcome::BattleTimeout => write!(f, "Battle did not finish in time"),
            ScenarioOutcome::RoundLimitReached(rounds) => write!(f, "Completed {rounds} rounds"),
        }
    }
}

/// How the wait for the battle result ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BattleOutcome {
    Won { confidence: f32, polls: u32 },
    TimedOut { polls: u32 },
}
