use anyhow::Result;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;

use navcheck::scenario::Scenario;
use navcheck::types::OutputFormat;

pub async fn handle_validate(path: PathBuf, format: OutputFormat) -> Result<()> {
    info!("Validating scenario {}", path.display());

    let scenario = Scenario::from_file(&path)?;
    scenario.validate()?;
    let positional = scenario.positional_steps();

    match format {
        OutputFormat::Json => {
            let summary = json!({
                "valid": true,
                "name": scenario.name,
                "steps": scenario.steps.len(),
                "budget_ms": scenario.budget_ms,
                "positional_steps": positional,
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        OutputFormat::Simple => {
            println!(
                "Scenario '{}' is valid ({} steps)",
                scenario.name,
                scenario.steps.len()
            );
            for (index, step) in scenario.steps.iter().enumerate() {
                println!("  {} {} {}", index, step.action.kind(), step.display_label());
            }
            if positional > 0 {
                println!(
                    "Note: {} step(s) fall back to positional locators, which break silently when UI order changes",
                    positional
                );
            }
        }
    }

    Ok(())
}
