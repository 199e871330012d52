mod args;

use args::{Args, Mode, RunArgs};
use clap::Parser;
use desktop_stage_run::desktop::{DesktopBackend, ScreenCapture};
use desktop_stage_run::game_automation::{ClickOffset, click_point};
use desktop_stage_run::template_matching::match_template;
use desktop_stage_run::{ScenarioConfig, run_scenario};
use std::error::Error;
use std::path::Path;
use std::process::ExitCode;

type MainResult<T> = Result<T, Box<dyn Error>>;

fn main() -> ExitCode {
    let args = Args::parse();

    let default_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            log::error!("❌ Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match args.mode() {
        Mode::Run(run) => runtime.block_on(run_stage_loop(run)),
        Mode::Screenshot { output } => runtime.block_on(take_screenshot(&output)),
        Mode::Match {
            screen,
            template,
            scales,
            offset,
        } => check_match(&screen, &template, &scales, offset),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run_stage_loop(run: RunArgs) -> MainResult<()> {
    let mut config = match &run.config {
        Some(path) => ScenarioConfig::load(path)?,
        None => ScenarioConfig::default(),
    };
    run.apply(&mut config);
    config.validate()?;

    log::info!("🚀 Starting...");
    log::debug!("Config: {:?}", config);
    tokio::time::sleep(config.startup_delay()).await;

    let desktop = DesktopBackend::connect()?;
    let outcome = run_scenario(desktop, config).await?;
    if outcome.is_clean_stop() {
        log::info!("✅ Stopped: {outcome}");
    } else {
        log::warn!("🛑 Stopped: {outcome}");
    }
    Ok(())
}

async fn take_screenshot(output: &Path) -> MainResult<()> {
    println!("📸 Capturing primary monitor...");
    let mut desktop = DesktopBackend::connect()?;
    let capture = desktop.capture_to(output).await?;
    println!(
        "✅ Screenshot {}x{} ({}ms) saved to {}",
        capture.width,
        capture.height,
        capture.duration_ms,
        capture.path.display()
    );
    Ok(())
}

fn check_match(
    screen: &Path,
    template: &Path,
    scales: &[f32],
    offset: ClickOffset,
) -> MainResult<()> {
    let found = match_template(screen, template, scales)?;
    println!("🔍 {found}");
    println!("🎯 Click point: {}", click_point(found.region, offset));
    Ok(())
}
