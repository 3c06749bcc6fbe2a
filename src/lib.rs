//! # navcheck
//!
//! Resilient navigation verification for mobile apps driven over WebDriver
//! (typically an Appium server with UiAutomator2).
//!
//! A scenario is a linear list of steps: click a target, assert that a
//! screen is showing, wait for a screen to become ready, or pause. Targets
//! are described by an ordered chain of locators, most reliable first, so a
//! run survives an app that exposes the same control by text on one build
//! and only by accessibility description or position on another.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Check a scenario file without a device
//! navcheck validate scenarios/trendscope.json
//!
//! # Run it against a local Appium server
//! navcheck run scenarios/trendscope.json --webdriver-url http://localhost:4723
//!
//! # Human-readable trace with a 60s overall budget
//! navcheck run scenarios/trendscope.json --budget-ms 60000 --format simple
//! ```
//!
//! Exit codes: 0 passed, 1 error, 2 scenario failed, 3 invalid scenario,
//! 4 WebDriver failure, 5 scenario budget exceeded.
//!
//! ## Scenario Format
//!
//! ```json
//! {
//!   "name": "favorites",
//!   "budget_ms": 60000,
//!   "steps": [
//!     { "action": "click", "label": "Open Favorites",
//!       "target": [
//!         { "by": "text", "text": "Favorites" },
//!         { "by": "description", "text": "Tab Two" },
//!         { "by": "index", "index": 1,
//!           "container": { "by": "class", "class_name": "android.view.View" } }
//!       ] },
//!     { "action": "assert_exists", "policy": "best_effort",
//!       "any_of": [{ "by": "text_contains", "text": "AAPL" }] }
//!   ]
//! }
//! ```
//!
//! ## Library Usage
//!
//! ```no_run
//! use navcheck::{FakeDriver, FakeElement, Locator, Scenario, ScenarioRunner, Step, Timing};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let driver = FakeDriver::new(vec![FakeElement::text("Stocks")]);
//! let scenario = Scenario::new(
//!     "stocks",
//!     vec![Step::click(vec![Locator::by_text("Stocks")]).labeled("Open Stocks")],
//! );
//!
//! let mut runner = ScenarioRunner::new(driver, Timing::default());
//! let result = runner.run(&scenario).await?;
//! assert!(result.passed());
//! # Ok(())
//! # }
//! ```

#![allow(clippy::uninlined_format_args)]

/// Ordered locator fallback
pub mod chain;

/// Run configuration
pub mod config;

/// Driver capability trait
pub mod driver;

/// CLI error type with exit codes
pub mod errors;

/// Step executor
pub mod executor;

/// In-memory driver for tests and dry runs
pub mod fake;

/// Locators and query strings
pub mod locator;

/// Result rendering
pub mod report;

/// Scenario runner
pub mod runner;

/// Scenario documents
pub mod scenario;

/// Steps, outcomes and results
pub mod types;

/// Bounded existence waits
pub mod wait;

/// WebDriver/Appium backed driver
pub mod webdriver;

pub use chain::{AttemptTimeout, LocatorChain, Resolution, Resolved};
pub use config::{RunConfig, Timing};
pub use driver::{Driver, DriverError};
pub use executor::StepExecutor;
pub use fake::{FakeDriver, FakeElement};
pub use locator::{Locator, Selector};
pub use runner::{RunState, RunnerError, ScenarioRunner};
pub use scenario::{Scenario, ScenarioError};
pub use types::{
    FailureReason, OutputFormat, ScenarioResult, ScenarioStatus, Step, StepAction, StepOutcome,
    StepPolicy, StepResult,
};
pub use wait::{wait_for_any, wait_for_existence};
pub use webdriver::AppiumDriver;
