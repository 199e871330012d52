//! Click tasks: click a template and confirm the screen moved on
//!
//! A click only counts once a fresh screenshot shows the template gone. The
//! attempt bookkeeping is a small pure state machine so it can be tested
//! without a screen.

use super::clicker::locate_and_click;
use super::error::AutomationResult;
use super::types::ClickOffset;
use crate::desktop::{Desktop, ScreenCapture};
use crate::template_matching::match_template;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;

/// Attempt counter and the confidence seen on the last attempt
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ClickTaskState {
    pub attempt: u32,
    pub last_confidence: Option<f32>,
}

/// Where a click task goes next
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskTransition {
    /// Make (another) attempt from this state
    Attempt(ClickTaskState),
    /// The template disappeared after a click
    Completed(ClickTaskState),
    /// Every attempt was used without a transition
    Exhausted(ClickTaskState),
}

impl TaskTransition {
    pub fn is_completed(&self) -> bool {
        matches!(self, TaskTransition::Completed(_))
    }

    pub fn state(&self) -> ClickTaskState {
        match self {
            TaskTransition::Attempt(s) | TaskTransition::Completed(s) | TaskTransition::Exhausted(s) => *s,
        }
    }
}

impl ClickTaskState {
    /// Initial transition; a zero limit is exhausted before any click
    pub fn start(retry_limit: u32) -> TaskTransition {
        let state = ClickTaskState::default();
        if retry_limit == 0 {
            TaskTransition::Exhausted(state)
        } else {
            TaskTransition::Attempt(state)
        }
    }

    /// The template was not found, so nothing was clicked
    pub fn on_click_missed(self, confidence: f32, retry_limit: u32) -> TaskTransition {
        self.advance(confidence, retry_limit)
    }

    /// The click happened but the template is still on screen
    pub fn on_still_present(self, confidence: f32, retry_limit: u32) -> TaskTransition {
        self.advance(confidence, retry_limit)
    }

    /// The click happened and the template is gone
    pub fn on_transitioned(self, confidence: f32) -> TaskTransition {
        TaskTransition::Completed(ClickTaskState {
            attempt: self.attempt + 1,
            last_confidence: Some(confidence),
        })
    }

    fn advance(self, confidence: f32, retry_limit: u32) -> TaskTransition {
        let next = ClickTaskState {
            attempt: self.attempt + 1,
            last_confidence: Some(confidence),
        };
        if next.attempt >= retry_limit {
            TaskTransition::Exhausted(next)
        } else {
            TaskTransition::Attempt(next)
        }
    }
}

/// One click-and-confirm unit of work
#[derive(Debug, Clone)]
pub struct ClickTask {
    /// Screenshot file, overwritten on every capture
    pub screen_path: PathBuf,
    pub template_path: PathBuf,
    pub scales: Vec<f32>,
    pub offset: ClickOffset,
    pub threshold: f32,
    pub retry_limit: u32,
    /// Wait after every attempt so the game can react
    pub post_click_delay: Duration,
    /// Duration of the eased pointer move before clicking
    pub pointer_motion: Duration,
}

impl ClickTask {
    /// Run the task and return where the state machine ended up
    ///
    /// The screen is captured once up front and again after every click that
    /// landed. A missed attempt retries against the same screenshot.
    pub async fn run<D: Desktop>(&self, desktop: &mut D) -> AutomationResult<TaskTransition> {
        desktop.capture_to(&self.screen_path).await?;

        let mut transition = ClickTaskState::start(self.retry_limit);
        while let TaskTransition::Attempt(state) = transition {
            let attempt = locate_and_click(
                &mut *desktop,
                &self.screen_path,
                &self.template_path,
                &self.scales,
                self.offset,
                self.threshold,
                self.pointer_motion,
            )
            .await?;

            sleep(self.post_click_delay).await;

            transition = if attempt.clicked() {
                desktop.capture_to(&self.screen_path).await?;
                let recheck = match_template(&self.screen_path, &self.template_path, &self.scales)?;
                if recheck.is_confident(self.threshold) {
                    log::debug!(
                        "🔁 {} still on screen ({:.2}) after attempt {}",
                        self.template_path.display(),
                        recheck.confidence,
                        state.attempt + 1
                    );
                    state.on_still_present(recheck.confidence, self.retry_limit)
                } else {
                    state.on_transitioned(recheck.confidence)
                }
            } else {
                state.on_click_missed(attempt.confidence(), self.retry_limit)
            };
        }

        if let TaskTransition::Exhausted(state) = transition {
            log::debug!(
                "❌ Gave up on {} after {} attempts",
                self.template_path.display(),
                state.attempt
            );
        }
        Ok(transition)
    }
}

/// Click `task`'s template until the screen changes; `false` once every attempt is used
pub async fn run_click_task<D: Desktop>(desktop: &mut D, task: &ClickTask) -> AutomationResult<bool> {
    Ok(task.run(desktop).await?.is_completed())
}
