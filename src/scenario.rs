//! Scenario documents: an ordered list of steps plus an optional time budget

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::locator::{Locator, Selector};
use crate::types::{Step, StepAction};

/// Problems that make a scenario impossible to run
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("scenario name is empty")]
    EmptyName,
    #[error("scenario has no steps")]
    NoSteps,
    #[error("step {index} ({kind}) has no locators")]
    NoLocators { index: usize, kind: &'static str },
    #[error("step {index} has a locator with an empty value")]
    EmptyLocator { index: usize },
    #[error("step {index} (wait_ready) needs a timeout greater than zero")]
    ZeroTimeout { index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    /// Whole-scenario budget, checked at every step boundary
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub budget_ms: Option<u64>,
    pub steps: Vec<Step>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
        Self {
            name: name.into(),
            budget_ms: None,
            steps,
        }
    }

    pub fn with_budget_ms(mut self, budget_ms: u64) -> Self {
        self.budget_ms = Some(budget_ms);
        self
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid scenario document")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario {}", path.display()))?;
        Self::from_json(&contents).with_context(|| format!("In {}", path.display()))
    }

    pub fn budget(&self) -> Option<Duration> {
        self.budget_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::EmptyName);
        }
        if self.steps.is_empty() {
            return Err(ScenarioError::NoSteps);
        }

        for (index, step) in self.steps.iter().enumerate() {
            let locators = step.action.locators();
            if !matches!(step.action, StepAction::FixedDelay { .. }) && locators.is_empty() {
                return Err(ScenarioError::NoLocators {
                    index,
                    kind: step.action.kind(),
                });
            }
            if locators.iter().any(is_blank) {
                return Err(ScenarioError::EmptyLocator { index });
            }
            if let StepAction::WaitReady { timeout_ms: 0, .. } = step.action {
                return Err(ScenarioError::ZeroTimeout { index });
            }
        }

        Ok(())
    }

    /// Number of steps whose locators include a positional fallback
    pub fn positional_steps(&self) -> usize {
        self.steps
            .iter()
            .filter(|step| step.action.locators().iter().any(Locator::is_positional))
            .count()
    }
}

fn is_blank(locator: &Locator) -> bool {
    match locator {
        Locator::Index { container, .. } => match container {
            Selector::Class { class_name, .. } => class_name.trim().is_empty(),
            other => other.value().is_empty(),
        },
        other => other.selector().value().is_empty(),
    }
}
