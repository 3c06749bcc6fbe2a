use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::locator::Locator;

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON format for programmatic consumption
    Json,
    /// Human-readable simple format
    Simple,
}

/// Whether a failed step ends the scenario
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPolicy {
    /// Failure aborts the scenario
    #[default]
    Critical,
    /// Failure is recorded and the scenario continues
    BestEffort,
}

/// What a step does
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepAction {
    /// Click the first locator in the chain that resolves
    Click {
        target: Vec<Locator>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
    /// Pass if any of the alternatives exists
    AssertExists {
        any_of: Vec<Locator>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
    /// Unconditional pause
    FixedDelay { ms: u64 },
    /// Wait until any indicator exists, optionally falling back to a pause
    WaitReady {
        indicator: Vec<Locator>,
        timeout_ms: u64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fallback_delay_ms: Option<u64>,
    },
}

impl StepAction {
    pub fn kind(&self) -> &'static str {
        match self {
            StepAction::Click { .. } => "click",
            StepAction::AssertExists { .. } => "assert_exists",
            StepAction::FixedDelay { .. } => "fixed_delay",
            StepAction::WaitReady { .. } => "wait_ready",
        }
    }

    /// Locators the action depends on
    pub fn locators(&self) -> &[Locator] {
        match self {
            StepAction::Click { target, .. } => target,
            StepAction::AssertExists { any_of, .. } => any_of,
            StepAction::WaitReady { indicator, .. } => indicator,
            StepAction::FixedDelay { .. } => &[],
        }
    }
}

/// One stateless, re-executable navigation action
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Step {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub policy: StepPolicy,
    #[serde(flatten)]
    pub action: StepAction,
}

impl Step {
    pub fn click(target: Vec<Locator>) -> Self {
        Self::new(StepAction::Click {
            target,
            timeout_ms: None,
        })
    }

    pub fn assert_exists(any_of: Vec<Locator>) -> Self {
        Self::new(StepAction::AssertExists {
            any_of,
            timeout_ms: None,
        })
    }

    pub fn fixed_delay(ms: u64) -> Self {
        Self::new(StepAction::FixedDelay { ms })
    }

    pub fn wait_ready(indicator: Vec<Locator>, timeout_ms: u64) -> Self {
        Self::new(StepAction::WaitReady {
            indicator,
            timeout_ms,
            fallback_delay_ms: None,
        })
    }

    fn new(action: StepAction) -> Self {
        Self {
            label: None,
            policy: StepPolicy::Critical,
            action,
        }
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn best_effort(mut self) -> Self {
        self.policy = StepPolicy::BestEffort;
        self
    }

    /// Explicit per-attempt timeout for click and assert steps
    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        match &mut self.action {
            StepAction::Click { timeout_ms, .. } | StepAction::AssertExists { timeout_ms, .. } => {
                *timeout_ms = Some(ms)
            }
            StepAction::WaitReady { timeout_ms, .. } => *timeout_ms = ms,
            StepAction::FixedDelay { .. } => {}
        }
        self
    }

    pub fn with_fallback_delay_ms(mut self, ms: u64) -> Self {
        if let StepAction::WaitReady {
            fallback_delay_ms, ..
        } = &mut self.action
        {
            *fallback_delay_ms = Some(ms);
        }
        self
    }

    /// Label for logs, falling back to the action kind
    pub fn display_label(&self) -> String {
        self.label
            .clone()
            .unwrap_or_else(|| self.action.kind().to_string())
    }
}

/// Why a step failed
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    /// No candidate of a click chain resolved in time
    ElementNotFound,
    /// None of the alternative verification locators resolved
    AssertionFailure { alternatives: usize },
    /// No readiness indicator appeared and no fallback delay was allowed
    ScreenNotReady,
    /// Infrastructure fault from the driver
    Driver { message: String },
    /// The whole-scenario budget ran out before the step started
    DeadlineExceeded { budget_ms: u64 },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::ElementNotFound => write!(f, "element not found"),
            FailureReason::AssertionFailure { alternatives } => {
                write!(f, "assertion failed: none of {} alternative(s) exist", alternatives)
            }
            FailureReason::ScreenNotReady => write!(f, "screen not ready"),
            FailureReason::Driver { message } => write!(f, "driver error: {}", message),
            FailureReason::DeadlineExceeded { budget_ms } => {
                write!(f, "scenario budget of {}ms exceeded", budget_ms)
            }
        }
    }
}

/// Result of one step
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Success,
    /// Resolved only through a non-primary strategy
    Recovered {
        strategy_index: usize,
        /// The winning strategy was the positional fallback
        last_resort: bool,
    },
    Failed { reason: FailureReason },
}

impl StepOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, StepOutcome::Failed { .. })
    }
}

/// Trace entry for one executed step
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct StepResult {
    pub index: usize,
    pub label: String,
    pub action: String,
    pub outcome: StepOutcome,
    /// Query of the locator that satisfied the step
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by: Option<String>,
    pub elapsed_ms: u64,
}

/// Final verdict of a scenario
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ScenarioStatus {
    Passed,
    Failed {
        step_index: usize,
        reason: FailureReason,
    },
}

/// Ordered trace plus verdict. Only the runner appends to it.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ScenarioResult {
    run_id: Uuid,
    scenario: String,
    started_at: DateTime<Utc>,
    elapsed_ms: u64,
    status: ScenarioStatus,
    steps: Vec<StepResult>,
    warnings: Vec<String>,
}

impl ScenarioResult {
    pub(crate) fn start(scenario: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            scenario: scenario.into(),
            started_at: Utc::now(),
            elapsed_ms: 0,
            status: ScenarioStatus::Passed,
            steps: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, step: StepResult) {
        self.steps.push(step);
    }

    pub(crate) fn warn(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    pub(crate) fn finish(mut self, status: ScenarioStatus, elapsed_ms: u64) -> Self {
        self.status = status;
        self.elapsed_ms = elapsed_ms;
        self
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn status(&self) -> &ScenarioStatus {
        &self.status
    }

    pub fn passed(&self) -> bool {
        matches!(self.status, ScenarioStatus::Passed)
    }

    pub fn steps(&self) -> &[StepResult] {
        &self.steps
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Steps that needed a non-primary strategy
    pub fn degraded_steps(&self) -> impl Iterator<Item = &StepResult> {
        self.steps
            .iter()
            .filter(|step| matches!(step.outcome, StepOutcome::Recovered { .. }))
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
