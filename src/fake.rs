//! In-memory driver for exercising scenarios without a device.
//!
//! Every query is counted per selector so callers can assert exactly which
//! strategies were attempted.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;

use crate::driver::{Driver, DriverError};
use crate::locator::Selector;

/// A UI element on the fake screen
#[derive(Debug, Clone, Default)]
pub struct FakeElement {
    pub text: Option<String>,
    pub description: Option<String>,
    pub class_name: String,
    pub clickable: bool,
    appear_after: Option<Duration>,
    reveals: Vec<FakeElement>,
}

impl FakeElement {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            class_name: "android.widget.TextView".to_string(),
            clickable: true,
            ..Self::default()
        }
    }

    pub fn description(description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            class_name: "android.widget.ImageButton".to_string(),
            clickable: true,
            ..Self::default()
        }
    }

    pub fn widget(class_name: impl Into<String>, clickable: bool) -> Self {
        Self {
            class_name: class_name.into(),
            clickable,
            ..Self::default()
        }
    }

    /// Only visible once `delay` has passed since the driver was created
    pub fn appearing_after(mut self, delay: Duration) -> Self {
        self.appear_after = Some(delay);
        self
    }

    /// Elements added to the screen when this one is clicked
    pub fn revealing(mut self, elements: Vec<FakeElement>) -> Self {
        self.reveals = elements;
        self
    }

    fn matches(&self, selector: &Selector) -> bool {
        match selector {
            Selector::Text { text } => self.text.as_deref() == Some(text.as_str()),
            Selector::TextContains { text } => self
                .text
                .as_deref()
                .is_some_and(|own| own.contains(text.as_str())),
            Selector::Description { text } => self.description.as_deref() == Some(text.as_str()),
            Selector::Class {
                class_name,
                clickable,
            } => self.class_name == *class_name && self.clickable == *clickable,
        }
    }

    fn label(&self, id: usize) -> String {
        self.text
            .clone()
            .or_else(|| self.description.clone())
            .unwrap_or_else(|| format!("{}#{}", self.class_name, id))
    }
}

/// Opaque handle returned by [`FakeDriver`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeHandle(usize);

#[derive(Debug)]
struct FakeState {
    elements: Vec<FakeElement>,
    queries: HashMap<String, usize>,
    clicks: Vec<String>,
    slept: Duration,
    calls: usize,
    fail_after: Option<usize>,
}

/// Scriptable [`Driver`] backed by a list of elements
#[derive(Debug)]
pub struct FakeDriver {
    created: Instant,
    state: Mutex<FakeState>,
}

impl FakeDriver {
    pub fn new(elements: Vec<FakeElement>) -> Self {
        Self {
            created: Instant::now(),
            state: Mutex::new(FakeState {
                elements,
                queries: HashMap::new(),
                clicks: Vec::new(),
                slept: Duration::ZERO,
                calls: 0,
                fail_after: None,
            }),
        }
    }

    /// Every driver call after the first `calls` fails with `SessionLost`
    pub fn losing_session_after(self, calls: usize) -> Self {
        self.state().fail_after = Some(calls);
        self
    }

    /// Number of queries issued for `selector`
    pub fn queries(&self, selector: &Selector) -> usize {
        self.state()
            .queries
            .get(&selector.to_query())
            .copied()
            .unwrap_or(0)
    }

    /// Total queries across all selectors
    pub fn total_queries(&self) -> usize {
        self.state().queries.values().sum()
    }

    /// Labels of clicked elements, in click order
    pub fn clicks(&self) -> Vec<String> {
        self.state().clicks.clone()
    }

    /// Total time spent in [`Driver::sleep`]
    pub fn slept(&self) -> Duration {
        self.state().slept
    }

    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn begin_call(&self, state: &mut FakeState) -> Result<(), DriverError> {
        state.calls += 1;
        match state.fail_after {
            Some(limit) if state.calls > limit => Err(DriverError::SessionLost(
                "fake session terminated".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn visible(&self, element: &FakeElement) -> bool {
        element
            .appear_after
            .is_none_or(|delay| self.created.elapsed() >= delay)
    }

    fn matching(&self, selector: &Selector) -> Result<Vec<FakeHandle>, DriverError> {
        let mut state = self.state();
        self.begin_call(&mut state)?;
        *state.queries.entry(selector.to_query()).or_insert(0) += 1;

        Ok(state
            .elements
            .iter()
            .enumerate()
            .filter(|(_, element)| self.visible(element) && element.matches(selector))
            .map(|(id, _)| FakeHandle(id))
            .collect())
    }
}

#[async_trait]
impl Driver for FakeDriver {
    type Handle = FakeHandle;

    async fn find_element(&self, selector: &Selector) -> Result<Option<FakeHandle>, DriverError> {
        Ok(self.matching(selector)?.into_iter().next())
    }

    async fn element_exists(&self, selector: &Selector) -> Result<bool, DriverError> {
        Ok(!self.matching(selector)?.is_empty())
    }

    async fn click(&self, handle: &FakeHandle) -> Result<(), DriverError> {
        let mut state = self.state();
        self.begin_call(&mut state)?;

        let element = match state.elements.get(handle.0) {
            Some(element) if self.visible(element) => element.clone(),
            _ => return Err(DriverError::StaleElement(format!("{:?}", handle))),
        };
        state.clicks.push(element.label(handle.0));
        state.elements.extend(element.reveals);
        Ok(())
    }

    async fn find_all(&self, selector: &Selector) -> Result<Vec<FakeHandle>, DriverError> {
        self.matching(selector)
    }

    async fn sleep(&self, duration: Duration) {
        self.state().slept += duration;
        tokio::time::sleep(duration).await;
    }
}
