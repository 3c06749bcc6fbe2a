//! Bounded waits on element existence

use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

use crate::driver::{Driver, DriverError};
use crate::locator::Locator;

/// Check once whether `locator` currently resolves.
///
/// A positional locator exists when its container query yields more than
/// `index` elements.
pub async fn exists_now<D>(driver: &D, locator: &Locator) -> Result<bool, DriverError>
where
    D: Driver + ?Sized,
{
    match locator {
        Locator::Index { container, index } => {
            let elements = driver.find_all(container).await?;
            debug!(
                "Found {} element(s) for {}, need index {}",
                elements.len(),
                container,
                index
            );
            Ok(elements.len() > *index)
        }
        other => driver.element_exists(&other.selector()).await,
    }
}

/// Poll until `locator` exists or `timeout` elapses.
///
/// Returns `Ok(false)` when the element never shows up. At least one check
/// is made even for a zero timeout. Driver faults are returned immediately.
pub async fn wait_for_existence<D>(
    driver: &D,
    locator: &Locator,
    timeout: Duration,
    poll_interval: Duration,
) -> Result<bool, DriverError>
where
    D: Driver + ?Sized,
{
    let deadline = Instant::now() + timeout;
    let poll_interval = poll_interval.max(Duration::from_millis(1));
    let mut polls = 0usize;

    loop {
        polls += 1;
        if exists_now(driver, locator).await? {
            debug!("{} exists after {} poll(s)", locator, polls);
            return Ok(true);
        }

        let now = Instant::now();
        if now >= deadline {
            debug!(
                "{} not found within {}ms ({} poll(s))",
                locator,
                timeout.as_millis(),
                polls
            );
            return Ok(false);
        }

        driver.sleep(poll_interval.min(deadline - now)).await;
    }
}

/// Poll every locator in turn until one exists or `timeout` elapses.
///
/// Returns the index of the first locator seen. Alternatives are checked
/// one after another on each round, so their order only affects which one
/// is reported when several exist at once.
pub async fn wait_for_any<D>(
    driver: &D,
    locators: &[Locator],
    timeout: Duration,
    poll_interval: Duration,
) -> Result<Option<usize>, DriverError>
where
    D: Driver + ?Sized,
{
    let deadline = Instant::now() + timeout;
    let poll_interval = poll_interval.max(Duration::from_millis(1));

    loop {
        for (index, locator) in locators.iter().enumerate() {
            if exists_now(driver, locator).await? {
                debug!("Alternative {} matched: {}", index, locator);
                return Ok(Some(index));
            }
        }

        let now = Instant::now();
        if now >= deadline {
            return Ok(None);
        }

        driver.sleep(poll_interval.min(deadline - now)).await;
    }
}

#[cfg(test)]
#[path = "wait_test.rs"]
mod wait_test;
