//! Executes a single navigation step against the driver.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::chain::{AttemptTimeout, LocatorChain, Resolution};
use crate::config::Timing;
use crate::driver::{Driver, DriverError};
use crate::locator::Locator;
use crate::types::{FailureReason, Step, StepAction, StepOutcome, StepResult};
use crate::wait::wait_for_any;

/// Runs steps one at a time. Does not retry: a failed step is reported as is.
pub struct StepExecutor<'a, D: ?Sized> {
    driver: &'a D,
    timing: Timing,
    deadline: Option<Instant>,
}

impl<'a, D> StepExecutor<'a, D>
where
    D: Driver + ?Sized,
{
    pub fn new(driver: &'a D, timing: Timing) -> Self {
        Self {
            driver,
            timing,
            deadline: None,
        }
    }

    /// Waits and delays never extend past `deadline`
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    /// Execute `step`. `NotFound` becomes a failed outcome; driver faults are returned as errors.
    pub async fn execute(&self, index: usize, step: &Step) -> Result<StepResult, DriverError> {
        let started = Instant::now();
        let label = step.display_label();
        info!("Step {}: {} ({})", index, label, step.action.kind());

        let (outcome, resolved_by) = match &step.action {
            StepAction::Click { target, timeout_ms } => self.click(target, *timeout_ms).await?,
            StepAction::AssertExists { any_of, timeout_ms } => {
                self.assert_exists(any_of, *timeout_ms).await?
            }
            StepAction::FixedDelay { ms } => {
                warn!(
                    "Fixed delay of {}ms used in place of a readiness check",
                    ms
                );
                self.pause(Duration::from_millis(*ms)).await;
                (StepOutcome::Success, None)
            }
            StepAction::WaitReady {
                indicator,
                timeout_ms,
                fallback_delay_ms,
            } => {
                self.wait_ready(indicator, *timeout_ms, *fallback_delay_ms)
                    .await?
            }
        };

        Ok(StepResult {
            index,
            label,
            action: step.action.kind().to_string(),
            outcome,
            resolved_by,
            elapsed_ms: started.elapsed().as_millis() as u64,
        })
    }

    async fn click(
        &self,
        target: &[Locator],
        timeout_ms: Option<u64>,
    ) -> Result<(StepOutcome, Option<String>), DriverError> {
        let chain = LocatorChain::new(
            target,
            AttemptTimeout::from_step(timeout_ms, &self.timing),
            &self.timing,
        )
        .with_deadline(self.deadline);

        match chain.resolve(self.driver).await? {
            Resolution::Found(resolved) => {
                self.driver.click(&resolved.handle).await?;
                let outcome = if resolved.is_degraded() {
                    StepOutcome::Recovered {
                        strategy_index: resolved.strategy_index,
                        last_resort: resolved.is_last_resort(),
                    }
                } else {
                    StepOutcome::Success
                };
                Ok((outcome, Some(resolved.locator.describe())))
            }
            Resolution::NotFound { attempted } => {
                warn!("No element found after {} strategies", attempted);
                Ok((
                    StepOutcome::Failed {
                        reason: FailureReason::ElementNotFound,
                    },
                    None,
                ))
            }
        }
    }

    async fn assert_exists(
        &self,
        any_of: &[Locator],
        timeout_ms: Option<u64>,
    ) -> Result<(StepOutcome, Option<String>), DriverError> {
        let timeout = timeout_ms
            .map(Duration::from_millis)
            .unwrap_or(self.timing.resolve_budget);

        match wait_for_any(
            self.driver,
            any_of,
            self.clamp(timeout),
            self.timing.poll_interval,
        )
        .await?
        {
            Some(matched) => Ok((StepOutcome::Success, Some(any_of[matched].describe()))),
            None => Ok((
                StepOutcome::Failed {
                    reason: FailureReason::AssertionFailure {
                        alternatives: any_of.len(),
                    },
                },
                None,
            )),
        }
    }

    async fn wait_ready(
        &self,
        indicator: &[Locator],
        timeout_ms: u64,
        fallback_delay_ms: Option<u64>,
    ) -> Result<(StepOutcome, Option<String>), DriverError> {
        let timeout = self.clamp(Duration::from_millis(timeout_ms));

        if let Some(matched) =
            wait_for_any(self.driver, indicator, timeout, self.timing.poll_interval).await?
        {
            return Ok((StepOutcome::Success, Some(indicator[matched].describe())));
        }

        match fallback_delay_ms {
            Some(ms) => {
                warn!(
                    "Screen-ready indicator not seen within {}ms, falling back to a {}ms fixed delay",
                    timeout_ms, ms
                );
                self.pause(Duration::from_millis(ms)).await;
                Ok((
                    StepOutcome::Recovered {
                        strategy_index: indicator.len(),
                        last_resort: true,
                    },
                    Some(format!("fixed delay {}ms", ms)),
                ))
            }
            None => Ok((
                StepOutcome::Failed {
                    reason: FailureReason::ScreenNotReady,
                },
                None,
            )),
        }
    }

    async fn pause(&self, duration: Duration) {
        let duration = self.clamp(duration);
        if !duration.is_zero() {
            self.driver.sleep(duration).await;
        }
    }

    fn clamp(&self, duration: Duration) -> Duration {
        match self.deadline {
            Some(deadline) => duration.min(deadline.saturating_duration_since(Instant::now())),
            None => duration,
        }
    }
}

#[cfg(test)]
#[path = "executor_test.rs"]
mod executor_test;
