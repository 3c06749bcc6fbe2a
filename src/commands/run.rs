use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use navcheck::config::{ConfigOverrides, RunConfig};
use navcheck::errors::ScenarioFailed;
use navcheck::report;
use navcheck::runner::ScenarioRunner;
use navcheck::scenario::Scenario;
use navcheck::types::OutputFormat;
use navcheck::webdriver::AppiumDriver;

pub async fn handle_run(
    path: PathBuf,
    config_path: Option<PathBuf>,
    overrides: ConfigOverrides,
    format: OutputFormat,
) -> Result<()> {
    let scenario = Scenario::from_file(&path)?;
    scenario.validate()?;

    let config = RunConfig::load(config_path.as_deref())?.apply(overrides);
    config.validate()?;
    info!(
        "Running '{}' against {}",
        scenario.name, config.webdriver_url
    );

    let driver = AppiumDriver::connect(&config).await?;
    let mut runner = ScenarioRunner::new(driver, config.timing())
        .with_budget(config.budget_ms.map(Duration::from_millis));
    let result = runner
        .run(&scenario)
        .await
        .context("Scenario runner could not start")?;

    // The session belongs to this run only
    if let Err(e) = runner.into_driver().close().await {
        warn!("Failed to close WebDriver session: {}", e);
    }

    println!("{}", report::render(&result, format)?);

    match ScenarioFailed::from_status(result.scenario(), result.status()) {
        Some(failed) => Err(failed.into()),
        None => Ok(()),
    }
}
