use clap::{Parser, Subcommand};
use desktop_stage_run::ScenarioConfig;
use desktop_stage_run::game_automation::ClickOffset;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "desktop-stage-run",
    version = env!("STAGE_RUN_VERSION"),
    long_version = env!("STAGE_RUN_LONG_VERSION"),
    about = "🤖 Replays a stage on a desktop game: screenshot, match, click, repeat"
)]
pub struct Args {
    /// Enable debug output for matching and pointer motion
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
pub enum Mode {
    /// Run the stage loop on the primary monitor (default)
    Run(RunArgs),
    /// Take a screenshot and save it, to cut templates from
    Screenshot {
        #[arg(long, short, default_value = "screenshot.png")]
        output: PathBuf,
    },
    /// Match a template against a saved screenshot and report the click point
    Match {
        screen: PathBuf,
        template: PathBuf,
        #[arg(long, value_delimiter = ',', default_value = "1.0")]
        scales: Vec<f32>,
        #[arg(long, value_parser = parse_offset, default_value = "0.5,0.5")]
        offset: ClickOffset,
    },
}

#[derive(Debug, Default, clap::Args)]
pub struct RunArgs {
    /// JSON config file; every field is optional
    #[arg(long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub image_dir: Option<PathBuf>,
    #[arg(long)]
    pub screenshot_file: Option<String>,
    #[arg(long)]
    pub threshold: Option<f32>,
    /// Comma separated template scales, e.g. 1.0,0.9,0.8
    #[arg(long, value_delimiter = ',')]
    pub scales: Option<Vec<f32>>,
    /// Click attempts per step
    #[arg(long)]
    pub retries: Option<u32>,
    #[arg(long)]
    pub max_battle_secs: Option<u64>,
    /// Stop after this many rounds
    #[arg(long)]
    pub rounds: Option<u32>,
}

impl Args {
    /// Subcommand to run; `run` with defaults when none was given
    pub fn mode(self) -> Mode {
        self.mode.unwrap_or_else(|| Mode::Run(RunArgs::default()))
    }
}

impl RunArgs {
    /// Overwrite loaded values with whatever was given on the command line
    pub fn apply(self, config: &mut ScenarioConfig) {
        if let Some(dir) = self.image_dir {
            config.image_dir = dir;
        }
        if let Some(file) = self.screenshot_file {
            config.screenshot_file = file;
        }
        if let Some(threshold) = self.threshold {
            config.confidence_threshold = threshold;
        }
        if let Some(scales) = self.scales {
            config.scales = scales;
        }
        if let Some(retries) = self.retries {
            config.retry_limit = retries;
        }
        if let Some(secs) = self.max_battle_secs {
            config.max_battle_secs = secs;
        }
        if self.rounds.is_some() {
            config.max_rounds = self.rounds;
        }
    }
}

fn parse_offset(raw: &str) -> Result<ClickOffset, String> {
    let (x, y) = raw
        .split_once(',')
        .ok_or_else(|| format!("expected X,Y but got '{raw}'"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid ratio '{v}': {e}"))
    };
    let offset = ClickOffset::new(parse(x)?, parse(y)?);
    if !offset.is_within_region() {
        return Err(format!("ratios must lie in [0, 1], got '{raw}'"));
    }
    Ok(offset)
}
