// Unit tests for types module

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_step_json_defaults_to_critical() {
    let step: Step = serde_json::from_str(
        r#"{"action": "click", "label": "Open Stocks tab", "target": [{"by": "text", "text": "Stocks"}], "timeout_ms": 10000}"#,
    )
    .unwrap();

    assert_eq!(step.policy, StepPolicy::Critical);
    assert_eq!(step.label.as_deref(), Some("Open Stocks tab"));
    assert_eq!(
        step.action,
        StepAction::Click {
            target: vec![Locator::by_text("Stocks")],
            timeout_ms: Some(10_000),
        }
    );
}

#[test]
fn test_best_effort_assert_from_json() {
    let step: Step = serde_json::from_str(
        r#"{
            "action": "assert_exists",
            "policy": "best_effort",
            "any_of": [
                {"by": "text_contains", "text": "AAPL"},
                {"by": "text_contains", "text": "GOOG"}
            ]
        }"#,
    )
    .unwrap();

    assert_eq!(step.policy, StepPolicy::BestEffort);
    assert_eq!(step.action.locators().len(), 2);
    assert_eq!(step.display_label(), "assert_exists");
}

#[test]
fn test_wait_ready_builder() {
    let step = Step::wait_ready(vec![Locator::by_text("Stocks")], 10_000)
        .with_fallback_delay_ms(5_000)
        .labeled("App launched");

    assert_eq!(
        step.action,
        StepAction::WaitReady {
            indicator: vec![Locator::by_text("Stocks")],
            timeout_ms: 10_000,
            fallback_delay_ms: Some(5_000),
        }
    );
    assert_eq!(step.display_label(), "App launched");
}

#[test]
fn test_step_round_trips_through_json() {
    let step = Step::click(vec![Locator::by_text("Favorites")])
        .with_timeout_ms(2_000)
        .best_effort();
    let json = serde_json::to_value(&step).unwrap();

    assert_eq!(json["action"], "click");
    assert_eq!(json["policy"], "best_effort");
    assert_eq!(json["timeout_ms"], 2000);
    assert!(json.get("label").is_none());

    let back: Step = serde_json::from_value(json).unwrap();
    assert_eq!(back, step);
}

#[test]
fn test_fixed_delay_ignores_timeout() {
    let step = Step::fixed_delay(2_000).with_timeout_ms(10);
    assert_eq!(step.action, StepAction::FixedDelay { ms: 2_000 });
    assert!(step.action.locators().is_empty());
}

#[test]
fn test_failure_reason_messages() {
    assert_eq!(FailureReason::ElementNotFound.to_string(), "element not found");
    assert_eq!(
        FailureReason::AssertionFailure { alternatives: 4 }.to_string(),
        "assertion failed: none of 4 alternative(s) exist"
    );
    assert_eq!(
        FailureReason::DeadlineExceeded { budget_ms: 30_000 }.to_string(),
        "scenario budget of 30000ms exceeded"
    );
}

#[test]
fn test_outcome_serialization() {
    let outcome = StepOutcome::Recovered {
        strategy_index: 3,
        last_resort: true,
    };
    assert_eq!(
        serde_json::to_value(&outcome).unwrap(),
        serde_json::json!({"status": "recovered", "strategy_index": 3, "last_resort": true})
    );

    let failed = StepOutcome::Failed {
        reason: FailureReason::ElementNotFound,
    };
    assert!(failed.is_failure());
    assert_eq!(
        serde_json::to_value(&failed).unwrap(),
        serde_json::json!({"status": "failed", "reason": {"kind": "element_not_found"}})
    );
}

#[test]
fn test_scenario_result_accumulates() {
    let mut result = ScenarioResult::start("demo");
    result.record(StepResult {
        index: 0,
        label: "Open tab".to_string(),
        action: "click".to_string(),
        outcome: StepOutcome::Recovered {
            strategy_index: 1,
            last_resort: false,
        },
        resolved_by: Some("new UiSelector().text(\"Tab Two\")".to_string()),
        elapsed_ms: 12,
    });
    result.warn("degraded".to_string());
    let result = result.finish(ScenarioStatus::Passed, 40);

    assert!(result.passed());
    assert_eq!(result.scenario(), "demo");
    assert_eq!(result.steps().len(), 1);
    assert_eq!(result.degraded_steps().count(), 1);
    assert_eq!(result.warnings().to_vec(), vec!["degraded".to_string()]);
    assert_eq!(result.elapsed_ms(), 40);
}
