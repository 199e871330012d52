//! The stage loop: select stage, start battle, wait for victory, collect and
//! go back, until something stops it.

use super::error::AutomationResult;
use super::task::{ClickTask, run_click_task};
use super::types::{BattleOutcome, ScenarioOutcome, ScenarioStep};
use crate::config::ScenarioConfig;
use crate::desktop::{Desktop, Pointer, ScreenCapture};
use crate::template_matching::match_template;
use std::path::PathBuf;
use tokio::time::{Instant, sleep};

pub struct ScenarioController<D: Desktop> {
    desktop: D,
    config: ScenarioConfig,
    rounds_completed: u32,
}

impl<D: Desktop> ScenarioController<D> {
    pub fn new(desktop: D, config: ScenarioConfig) -> Self {
        Self {
            desktop,
            config,
            rounds_completed: 0,
        }
    }

    pub fn desktop(&self) -> &D {
        &self.desktop
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    /// Run rounds until a stop condition
    ///
    /// Every expected stop comes back as a [`ScenarioOutcome`]; only capture,
    /// pointer and image-loading failures are errors.
    pub async fn run(&mut self) -> AutomationResult<ScenarioOutcome> {
        loop {
            if let Some(limit) = self.config.max_rounds
                && self.rounds_completed >= limit
            {
                let outcome = ScenarioOutcome::RoundLimitReached(self.rounds_completed);
                log::info!("🏁 {}. End script.", outcome);
                return Ok(outcome);
            }

            if let Some(outcome) = self.run_round().await? {
                log::warn!("⏹️ {}! End script.", outcome);
                return Ok(outcome);
            }
            self.rounds_completed += 1;
            log::info!("🔄 Round {} done.", self.rounds_completed);
        }
    }

    /// One pass through every step; `Some` when the scenario has to stop
    pub async fn run_round(&mut self) -> AutomationResult<Option<ScenarioOutcome>> {
        if !self.click_step(ScenarioStep::SelectStage).await? {
            return Ok(Some(ScenarioOutcome::StepFailed(ScenarioStep::SelectStage)));
        }
        log::info!("Entered stage.");

        if !self.click_step(ScenarioStep::SelectTeam).await? {
            return Ok(Some(ScenarioOutcome::StepFailed(ScenarioStep::SelectTeam)));
        }

        let deadline = Instant::now() + self.config.max_battle();

        // Keep the pointer off the battlefield so nothing shows a hover state
        self.desktop
            .move_to(self.config.neutral_point, self.config.pointer_motion())
            .await?;

        if self.stamina_exhausted()? {
            return Ok(Some(ScenarioOutcome::StaminaExhausted));
        }
        log::info!("⚔️ Battle started.");

        match self.wait_for_battle(deadline).await? {
            BattleOutcome::Won { confidence, polls } => {
                log::info!(
                    "🏆 Battle succeeded after {} checks (confidence {:.2}).",
                    polls,
                    confidence
                );
            }
            BattleOutcome::TimedOut { polls } => {
                log::debug!("Battle result not seen in {} checks", polls);
                return Ok(Some(ScenarioOutcome::BattleTimeout));
            }
        }

        if !self.click_step(ScenarioStep::DismissResult).await? {
            return Ok(Some(ScenarioOutcome::StepFailed(ScenarioStep::DismissResult)));
        }
        if !self.click_step(ScenarioStep::ReturnToStage).await? {
            return Ok(Some(ScenarioOutcome::StepFailed(ScenarioStep::ReturnToStage)));
        }
        Ok(None)
    }

    /// Build the click task for `step` from the config
    pub fn click_task(&self, step: ScenarioStep) -> ClickTask {
        let names = &self.config.templates;
        let (template, settings) = match step {
            ScenarioStep::SelectStage => (&names.stage, &self.config.steps.select_stage),
            ScenarioStep::SelectTeam => (&names.team_select, &self.config.steps.select_team),
            ScenarioStep::DismissResult => {
                (&names.battle_success, &self.config.steps.dismiss_result)
            }
            ScenarioStep::ReturnToStage => {
                (&names.return_to_stage, &self.config.steps.return_to_stage)
            }
        };

        ClickTask {
            screen_path: self.config.screenshot_path(),
            template_path: self.config.template_path(template),
            scales: self.config.scales.clone(),
            offset: settings.offset,
            threshold: self.config.confidence_threshold,
            retry_limit: self.config.retry_limit,
            post_click_delay: settings.delay(),
            pointer_motion: self.config.pointer_motion(),
        }
    }

    async fn click_step(&mut self, step: ScenarioStep) -> AutomationResult<bool> {
        let task = self.click_task(step);
        log::debug!("▶️ {:?}: {}", step, task.template_path.display());
        run_click_task(&mut self.desktop, &task).await
    }

    /// Check the last screenshot for the no-stamina prompt, without clicking
    fn stamina_exhausted(&self) -> AutomationResult<bool> {
        let found = match_template(
            &self.screenshot_path(),
            &self.config.template_path(&self.config.templates.no_stamina),
            &self.config.scales,
        )?;
        log::debug!("🔋 No-stamina prompt confidence {:.2}", found.confidence);
        Ok(found.is_confident(self.config.confidence_threshold))
    }

    /// Poll for the victory banner until it shows or `deadline` passes
    async fn wait_for_battle(&mut self, deadline: Instant) -> AutomationResult<BattleOutcome> {
        let screen = self.screenshot_path();
        let template = self
            .config
            .template_path(&self.config.templates.battle_success);
        let mut polls = 0;

        while Instant::now() < deadline {
            sleep(self.config.battle_poll_interval()).await;
            self.desktop.capture_to(&screen).await?;
            polls += 1;

            let found = match_template(&screen, &template, &self.config.scales)?;
            log::debug!("⏳ Battle check {}: confidence {:.2}", polls, found.confidence);
            if found.is_confident(self.config.confidence_threshold) {
                return Ok(BattleOutcome::Won {
                    confidence: found.confidence,
                    polls,
                });
            }
        }
        Ok(BattleOutcome::TimedOut { polls })
    }

    fn screenshot_path(&self) -> PathBuf {
        self.config.screenshot_path()
    }
}

/// Run the stage loop on `desktop` until it stops
pub async fn run_scenario<D: Desktop>(
    desktop: D,
    config: ScenarioConfig,
) -> AutomationResult<ScenarioOutcome> {
    ScenarioController::new(desktop, config).run().await
}
