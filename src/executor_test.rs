// Unit tests for the step executor

use super::*;
use crate::fake::{FakeDriver, FakeElement};
use crate::locator::Selector;
use pretty_assertions::assert_eq;

fn timing() -> Timing {
    Timing {
        poll_interval: Duration::from_millis(100),
        resolve_budget: Duration::from_secs(1),
    }
}

const TICKERS: [&str; 3] = ["AAPL", "GOOG", "MSFT"];

#[tokio::test(start_paused = true)]
async fn test_click_primary_locator() {
    let driver = FakeDriver::new(vec![FakeElement::text("Stocks")]);
    let executor = StepExecutor::new(&driver, timing());

    let result = executor
        .execute(0, &Step::click(vec![Locator::by_text("Stocks")]).labeled("Open Stocks"))
        .await
        .unwrap();

    assert_eq!(result.outcome, StepOutcome::Success);
    assert_eq!(result.label, "Open Stocks");
    assert_eq!(result.action, "click");
    assert_eq!(
        result.resolved_by.as_deref(),
        Some(r#"new UiSelector().text("Stocks")"#)
    );
    assert_eq!(driver.clicks(), vec!["Stocks".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_click_missing_element_fails_without_retry() {
    let driver = FakeDriver::new(vec![]);
    let executor = StepExecutor::new(&driver, timing());

    let result = executor
        .execute(
            0,
            &Step::click(vec![Locator::by_text("Stocks")]).with_timeout_ms(500),
        )
        .await
        .unwrap();

    assert_eq!(
        result.outcome,
        StepOutcome::Failed {
            reason: FailureReason::ElementNotFound
        }
    );
    assert!(result.outcome.is_failure());
    // 500ms at 100ms polling, checked once per poll and never repeated
    assert_eq!(driver.queries(&Selector::text("Stocks")), 6);
    assert!(driver.clicks().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_click_via_fallback_is_recovered() {
    let driver = FakeDriver::new(vec![FakeElement::description("Tab Two")]);
    let executor = StepExecutor::new(&driver, timing());
    let step = Step::click(vec![
        Locator::by_text("Favorites"),
        Locator::by_description("Tab Two"),
    ]);

    let result = executor.execute(4, &step).await.unwrap();

    assert_eq!(
        result.outcome,
        StepOutcome::Recovered {
            strategy_index: 1,
            last_resort: false
        }
    );
    assert_eq!(result.index, 4);
    assert_eq!(driver.clicks(), vec!["Tab Two".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn test_assert_exists_every_presence_combination() {
    for mask in 0u8..8 {
        let present: Vec<FakeElement> = TICKERS
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, ticker)| FakeElement::text(format!("{} quote", ticker)))
            .collect();
        let driver = FakeDriver::new(present);
        let executor = StepExecutor::new(&driver, timing());
        let step = Step::assert_exists(
            TICKERS
                .iter()
                .map(|ticker| Locator::by_text_contains(*ticker))
                .collect(),
        )
        .best_effort();

        let result = executor.execute(0, &step).await.unwrap();

        if mask == 0 {
            assert_eq!(
                result.outcome,
                StepOutcome::Failed {
                    reason: FailureReason::AssertionFailure { alternatives: 3 }
                },
                "mask {:03b}",
                mask
            );
        } else {
            assert_eq!(result.outcome, StepOutcome::Success, "mask {:03b}", mask);
            let first_present = TICKERS[mask.trailing_zeros() as usize];
            assert!(
                result
                    .resolved_by
                    .as_deref()
                    .is_some_and(|query| query.contains(first_present)),
                "mask {:03b}",
                mask
            );
        }
        assert!(driver.clicks().is_empty());
    }
}

#[tokio::test(start_paused = true)]
async fn test_assert_exists_finds_late_alternative() {
    let driver = FakeDriver::new(vec![
        FakeElement::text("GOOG 140.10").appearing_after(Duration::from_millis(300)),
    ]);
    let executor = StepExecutor::new(&driver, timing());
    let step = Step::assert_exists(vec![
        Locator::by_text_contains("AAPL"),
        Locator::by_text_contains("GOOG"),
    ]);

    let result = executor.execute(0, &step).await.unwrap();

    assert_eq!(result.outcome, StepOutcome::Success);
    assert_eq!(result.elapsed_ms, 300);
}

#[tokio::test(start_paused = true)]
async fn test_fixed_delay_sleeps_through_driver() {
    let driver = FakeDriver::new(vec![]);
    let executor = StepExecutor::new(&driver, timing());

    let result = executor.execute(1, &Step::fixed_delay(2_000)).await.unwrap();

    assert_eq!(result.outcome, StepOutcome::Success);
    assert_eq!(result.elapsed_ms, 2_000);
    assert_eq!(driver.slept(), Duration::from_millis(2_000));
    assert_eq!(driver.total_queries(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_fixed_delay_clamped_to_deadline() {
    let driver = FakeDriver::new(vec![]);
    let deadline = Instant::now() + Duration::from_millis(750);
    let executor = StepExecutor::new(&driver, timing()).with_deadline(Some(deadline));

    executor.execute(0, &Step::fixed_delay(5_000)).await.unwrap();

    assert_eq!(driver.slept(), Duration::from_millis(750));
}

#[tokio::test(start_paused = true)]
async fn test_wait_ready_returns_as_soon_as_indicator_exists() {
    let driver = FakeDriver::new(vec![
        FakeElement::text("Stocks").appearing_after(Duration::from_millis(1_200)),
    ]);
    let executor = StepExecutor::new(&driver, timing());
    let step = Step::wait_ready(vec![Locator::by_text("Stocks")], 10_000).with_fallback_delay_ms(5_000);

    let result = executor.execute(0, &step).await.unwrap();

    assert_eq!(result.outcome, StepOutcome::Success);
    assert_eq!(result.elapsed_ms, 1_200);
}

#[tokio::test(start_paused = true)]
async fn test_wait_ready_falls_back_to_delay() {
    let driver = FakeDriver::new(vec![]);
    let executor = StepExecutor::new(&driver, timing());
    let step = Step::wait_ready(vec![Locator::by_text("Stocks")], 1_000).with_fallback_delay_ms(2_000);

    let result = executor.execute(0, &step).await.unwrap();

    assert_eq!(
        result.outcome,
        StepOutcome::Recovered {
            strategy_index: 1,
            last_resort: true
        }
    );
    assert_eq!(result.resolved_by.as_deref(), Some("fixed delay 2000ms"));
    assert_eq!(result.elapsed_ms, 3_000);
}

#[tokio::test(start_paused = true)]
async fn test_wait_ready_without_fallback_fails() {
    let driver = FakeDriver::new(vec![]);
    let executor = StepExecutor::new(&driver, timing());
    let step = Step::wait_ready(vec![Locator::by_text("Stocks")], 500);

    let result = executor.execute(0, &step).await.unwrap();

    assert_eq!(
        result.outcome,
        StepOutcome::Failed {
            reason: FailureReason::ScreenNotReady
        }
    );
}

#[tokio::test(start_paused = true)]
async fn test_stale_click_is_a_driver_error() {
    let driver = FakeDriver::new(vec![FakeElement::text("Stocks")]).losing_session_after(2);
    let executor = StepExecutor::new(&driver, timing());

    // existence check and handle lookup succeed, the click does not
    let err = executor
        .execute(0, &Step::click(vec![Locator::by_text("Stocks")]))
        .await
        .unwrap_err();

    assert!(matches!(err, DriverError::SessionLost(_)));
}
