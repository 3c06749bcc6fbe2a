use std::fmt;

use crate::driver::DriverError;
use crate::scenario::ScenarioError;
use crate::types::{FailureReason, ScenarioStatus};

/// A scenario ran to completion and did not pass
#[derive(Debug, thiserror::Error)]
#[error("scenario '{scenario}' failed at step {step_index}: {reason}")]
pub struct ScenarioFailed {
    pub scenario: String,
    pub step_index: usize,
    pub reason: FailureReason,
}

impl ScenarioFailed {
    pub fn from_status(scenario: &str, status: &ScenarioStatus) -> Option<Self> {
        match status {
            ScenarioStatus::Passed => None,
            ScenarioStatus::Failed { step_index, reason } => Some(Self {
                scenario: scenario.to_string(),
                step_index: *step_index,
                reason: reason.clone(),
            }),
        }
    }
}

/// Custom error type that includes exit codes
#[derive(Debug)]
pub enum NavcheckError {
    /// A step failed (exit code 2)
    ScenarioFailed(String),
    /// The scenario document is malformed (exit code 3)
    InvalidScenario(String),
    /// WebDriver connection or session failed (exit code 4)
    WebDriverFailed(String),
    /// Scenario budget exhausted (exit code 5)
    Timeout(String),
    /// Generic error (exit code 1)
    Other(anyhow::Error),
}

impl NavcheckError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NavcheckError::ScenarioFailed(_) => 2,
            NavcheckError::InvalidScenario(_) => 3,
            NavcheckError::WebDriverFailed(_) => 4,
            NavcheckError::Timeout(_) => 5,
            NavcheckError::Other(_) => 1,
        }
    }
}

impl fmt::Display for NavcheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavcheckError::ScenarioFailed(msg) => write!(f, "{}", msg),
            NavcheckError::InvalidScenario(msg) => write!(f, "Invalid scenario: {}", msg),
            NavcheckError::WebDriverFailed(msg) => write!(f, "WebDriver failure: {}", msg),
            NavcheckError::Timeout(msg) => write!(f, "Operation timed out: {}", msg),
            NavcheckError::Other(err) => write!(f, "{:#}", err),
        }
    }
}

impl std::error::Error for NavcheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NavcheckError::Other(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl From<anyhow::Error> for NavcheckError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(failed) = err.downcast_ref::<ScenarioFailed>() {
            return match failed.reason {
                FailureReason::DeadlineExceeded { .. } => NavcheckError::Timeout(failed.to_string()),
                FailureReason::Driver { .. } => NavcheckError::WebDriverFailed(failed.to_string()),
                _ => NavcheckError::ScenarioFailed(failed.to_string()),
            };
        }
        if let Some(invalid) = err.downcast_ref::<ScenarioError>() {
            return NavcheckError::InvalidScenario(invalid.to_string());
        }
        if let Some(driver) = err.downcast_ref::<DriverError>() {
            return NavcheckError::WebDriverFailed(driver.to_string());
        }

        // Connection problems surface from the session setup as plain context messages
        let msg = format!("{:#}", err);
        if msg.contains("Cannot connect to WebDriver") || msg.contains("Failed to connect to WebDriver")
        {
            NavcheckError::WebDriverFailed(msg)
        } else if msg.contains("Invalid scenario document") {
            NavcheckError::InvalidScenario(msg)
        } else {
            NavcheckError::Other(err)
        }
    }
}
