//! Runs a scenario's steps in order and produces the trace and verdict.

use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tracing::{error, info, warn};

use crate::config::Timing;
use crate::driver::Driver;
use crate::executor::StepExecutor;
use crate::scenario::Scenario;
use crate::types::{
    FailureReason, ScenarioResult, ScenarioStatus, StepOutcome, StepPolicy, StepResult,
};

/// Lifecycle of a runner. `Passed` and `Failed` are final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunState {
    NotStarted,
    Running,
    Passed,
    Failed { step_index: usize },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RunnerError {
    #[error("runner cannot start from state {0:?}; scenarios are never re-run")]
    AlreadyRun(RunState),
}

/// Owns the driver session for the duration of one scenario
pub struct ScenarioRunner<D> {
    driver: D,
    timing: Timing,
    budget: Option<Duration>,
    state: RunState,
}

impl<D> ScenarioRunner<D>
where
    D: Driver,
{
    pub fn new(driver: D, timing: Timing) -> Self {
        Self {
            driver,
            timing,
            budget: None,
            state: RunState::NotStarted,
        }
    }

    /// Whole-scenario budget; takes precedence over the scenario's own
    pub fn with_budget(mut self, budget: Option<Duration>) -> Self {
        self.budget = budget;
        self
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Give the session back, e.g. to close it
    pub fn into_driver(self) -> D {
        self.driver
    }

    /// Execute every step in order.
    ///
    /// Critical failures and driver faults stop the run. Best-effort failures
    /// are recorded and the run continues. The budget is enforced at step
    /// boundaries, and waits inside a step are clamped to it.
    pub async fn run(&mut self, scenario: &Scenario) -> Result<ScenarioResult, RunnerError> {
        if self.state != RunState::NotStarted {
            return Err(RunnerError::AlreadyRun(self.state.clone()));
        }
        self.state = RunState::Running;

        let started = Instant::now();
        let budget = self.budget.or_else(|| scenario.budget());
        let deadline = budget.map(|budget| started + budget);
        info!(
            "Running scenario '{}' ({} steps, budget {})",
            scenario.name,
            scenario.steps.len(),
            budget.map_or_else(|| "none".to_string(), |b| format!("{}ms", b.as_millis()))
        );

        let executor = StepExecutor::new(&self.driver, self.timing).with_deadline(deadline);
        let mut result = ScenarioResult::start(scenario.name.clone());
        let mut status = ScenarioStatus::Passed;

        for (index, step) in scenario.steps.iter().enumerate() {
            if let (Some(deadline), Some(budget)) = (deadline, budget)
                && Instant::now() >= deadline
            {
                let reason = FailureReason::DeadlineExceeded {
                    budget_ms: budget.as_millis() as u64,
                };
                error!("Stopping before step {}: {}", index, reason);
                status = ScenarioStatus::Failed {
                    step_index: index,
                    reason,
                };
                break;
            }

            let step_started = Instant::now();
            let step_result = match executor.execute(index, step).await {
                Ok(step_result) => step_result,
                Err(err) => {
                    error!("Driver fault at step {}: {}", index, err);
                    let reason = FailureReason::Driver {
                        message: err.to_string(),
                    };
                    result.record(StepResult {
                        index,
                        label: step.display_label(),
                        action: step.action.kind().to_string(),
                        outcome: StepOutcome::Failed {
                            reason: reason.clone(),
                        },
                        resolved_by: None,
                        elapsed_ms: step_started.elapsed().as_millis() as u64,
                    });
                    status = ScenarioStatus::Failed {
                        step_index: index,
                        reason,
                    };
                    break;
                }
            };

            let via = step_result.resolved_by.clone().unwrap_or_default();
            match &step_result.outcome {
                StepOutcome::Recovered {
                    strategy_index,
                    last_resort: true,
                } => result.warn(format!(
                    "step {} '{}': used last-resort strategy {} ({})",
                    index, step_result.label, strategy_index, via
                )),
                StepOutcome::Recovered { strategy_index, .. } => result.warn(format!(
                    "step {} '{}': degraded path via strategy {} ({})",
                    index, step_result.label, strategy_index, via
                )),
                StepOutcome::Success | StepOutcome::Failed { .. } => {}
            }

            let failure = match &step_result.outcome {
                StepOutcome::Failed { reason } => Some(reason.clone()),
                _ => None,
            };
            let label = step_result.label.clone();
            result.record(step_result);

            if let Some(reason) = failure {
                match step.policy {
                    StepPolicy::Critical => {
                        error!("Step {} '{}' failed: {}", index, label, reason);
                        status = ScenarioStatus::Failed {
                            step_index: index,
                            reason,
                        };
                        break;
                    }
                    StepPolicy::BestEffort => {
                        warn!("Best-effort step {} '{}' failed: {}", index, label, reason);
                        result.warn(format!(
                            "step {} '{}': best-effort step failed: {}",
                            index, label, reason
                        ));
                    }
                }
            }
        }

        let elapsed_ms = started.elapsed().as_millis() as u64;
        self.state = match &status {
            ScenarioStatus::Passed => RunState::Passed,
            ScenarioStatus::Failed { step_index, .. } => RunState::Failed {
                step_index: *step_index,
            },
        };

        let result = result.finish(status, elapsed_ms);
        if result.passed() {
            info!(
                "Scenario '{}' passed in {}ms ({} degraded step(s))",
                scenario.name,
                elapsed_ms,
                result.degraded_steps().count()
            );
        }
        Ok(result)
    }
}

#[cfg(test)]
#[path = "runner_test.rs"]
mod runner_test;
