//! Rendering of scenario results

use anyhow::Result;

use crate::types::{OutputFormat, ScenarioResult, ScenarioStatus, StepOutcome, StepResult};

/// Render `result` in the requested format
pub fn render(result: &ScenarioResult, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Simple => Ok(render_simple(result)),
    }
}

fn render_simple(result: &ScenarioResult) -> String {
    let mut lines = vec![format!(
        "Scenario: {} (run {})",
        result.scenario(),
        result.run_id()
    )];

    for step in result.steps() {
        lines.push(step_line(step));
    }

    if !result.warnings().is_empty() {
        lines.push(String::new());
        lines.push("Warnings:".to_string());
        for warning in result.warnings() {
            lines.push(format!("  - {}", warning));
        }
    }

    lines.push(String::new());
    lines.push(match result.status() {
        ScenarioStatus::Passed => format!("PASSED in {}ms", result.elapsed_ms()),
        ScenarioStatus::Failed { step_index, reason } => format!(
            "FAILED at step {}: {} (after {}ms)",
            step_index,
            reason,
            result.elapsed_ms()
        ),
    });

    lines.join("\n")
}

fn step_line(step: &StepResult) -> String {
    let (marker, detail) = match &step.outcome {
        StepOutcome::Success => ("ok", String::new()),
        StepOutcome::Recovered {
            strategy_index,
            last_resort: true,
        } => ("last-resort", format!(" via strategy {}", strategy_index)),
        StepOutcome::Recovered { strategy_index, .. } => {
            ("degraded", format!(" via strategy {}", strategy_index))
        }
        StepOutcome::Failed { reason } => ("FAIL", format!(": {}", reason)),
    };

    let via = step
        .resolved_by
        .as_deref()
        .map(|query| format!(" [{}]", query))
        .unwrap_or_default();

    format!(
        "  [{}] {} {}{}{} ({}ms)",
        marker, step.index, step.label, detail, via, step.elapsed_ms
    )
}
