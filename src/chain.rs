//! Ordered locator fallback.
//!
//! Candidates are listed from most to least reliable: exact text, broader
//! text or accessibility matches, and finally a positional lookup inside a
//! container. They are tried strictly one after another, never raced. Any
//! resolution past index 0 is reported as degraded, and a positional win is
//! reported as last resort because UI reordering breaks it without any error.

use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::Timing;
use crate::driver::{Driver, DriverError};
use crate::locator::Locator;
use crate::wait::wait_for_existence;

/// How long each candidate may wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptTimeout {
    /// Every candidate gets the full duration
    PerAttempt(Duration),
    /// The duration is divided evenly between candidates
    Split(Duration),
}

impl AttemptTimeout {
    /// Explicit step timeouts apply per attempt; otherwise the default budget is split
    pub fn from_step(timeout_ms: Option<u64>, timing: &Timing) -> Self {
        match timeout_ms {
            Some(ms) => AttemptTimeout::PerAttempt(Duration::from_millis(ms)),
            None => AttemptTimeout::Split(timing.resolve_budget),
        }
    }

    pub fn per_candidate(&self, candidates: usize) -> Duration {
        match *self {
            AttemptTimeout::PerAttempt(timeout) => timeout,
            AttemptTimeout::Split(total) => total / candidates.max(1) as u32,
        }
    }
}

/// A candidate that resolved
#[derive(Debug, Clone)]
pub struct Resolved<H> {
    pub handle: H,
    pub strategy_index: usize,
    pub locator: Locator,
}

impl<H> Resolved<H> {
    pub fn is_degraded(&self) -> bool {
        self.strategy_index > 0
    }

    pub fn is_last_resort(&self) -> bool {
        self.locator.is_positional()
    }
}

/// Result of walking the whole chain
#[derive(Debug, Clone)]
pub enum Resolution<H> {
    Found(Resolved<H>),
    /// Every candidate was attempted and none resolved
    NotFound { attempted: usize },
}

/// Fallback list for one logical target
#[derive(Debug, Clone)]
pub struct LocatorChain<'a> {
    candidates: &'a [Locator],
    timeout: AttemptTimeout,
    poll_interval: Duration,
    deadline: Option<Instant>,
}

impl<'a> LocatorChain<'a> {
    pub fn new(candidates: &'a [Locator], timeout: AttemptTimeout, timing: &Timing) -> Self {
        Self {
            candidates,
            timeout,
            poll_interval: timing.poll_interval,
            deadline: None,
        }
    }

    /// Clamp every attempt to end no later than `deadline`
    pub fn with_deadline(mut self, deadline: Option<Instant>) -> Self {
        self.deadline = deadline;
        self
    }

    fn attempt_timeout(&self) -> Duration {
        let per_candidate = self.timeout.per_candidate(self.candidates.len());
        match self.deadline {
            Some(deadline) => {
                per_candidate.min(deadline.saturating_duration_since(Instant::now()))
            }
            None => per_candidate,
        }
    }

    /// Try each candidate in order and return the first that resolves
    pub async fn resolve<D>(&self, driver: &D) -> Result<Resolution<D::Handle>, DriverError>
    where
        D: Driver + ?Sized,
    {
        for (index, locator) in self.candidates.iter().enumerate() {
            let timeout = self.attempt_timeout();
            debug!(
                "Strategy {}/{}: {} (timeout {}ms)",
                index + 1,
                self.candidates.len(),
                locator,
                timeout.as_millis()
            );

            if !wait_for_existence(driver, locator, timeout, self.poll_interval).await? {
                continue;
            }

            let Some(handle) = fetch_handle(driver, locator).await? else {
                debug!("{} disappeared before it could be resolved", locator);
                continue;
            };

            let resolved = Resolved {
                handle,
                strategy_index: index,
                locator: locator.clone(),
            };

            if resolved.is_last_resort() {
                warn!(
                    "Last-resort positional strategy {} used: {}. A change in UI order would select a different element",
                    index, locator
                );
            } else if resolved.is_degraded() {
                warn!("Degraded path: resolved via strategy {} ({})", index, locator);
            } else {
                info!("Resolved {}", locator);
            }

            return Ok(Resolution::Found(resolved));
        }

        Ok(Resolution::NotFound {
            attempted: self.candidates.len(),
        })
    }
}

async fn fetch_handle<D>(driver: &D, locator: &Locator) -> Result<Option<D::Handle>, DriverError>
where
    D: Driver + ?Sized,
{
    match locator {
        Locator::Index { container, index } => {
            Ok(driver.find_all(container).await?.into_iter().nth(*index))
        }
        other => driver.find_element(&other.selector()).await,
    }
}

#[cfg(test)]
#[path = "chain_test.rs"]
mod chain_test;
