//! The automation driver capability consumed by the navigation engine.

use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Duration;
use thiserror::Error;

use crate::locator::Selector;

/// Infrastructure faults. Absence of an element is never a `DriverError`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DriverError {
    /// The device/app session is gone
    #[error("session lost: {0}")]
    SessionLost(String),
    /// A handle outlived the element it referred to
    #[error("stale element: {0}")]
    StaleElement(String),
    /// Any other failed driver command
    #[error("driver command failed: {0}")]
    Command(String),
}

/// Locate, click, wait and inspect against one device/app session.
///
/// Handles are only valid inside the session that produced them and are
/// re-resolved for every step.
#[async_trait]
pub trait Driver: Send + Sync {
    type Handle: Clone + Debug + Send + Sync;

    /// First element matching `selector`, if any
    async fn find_element(&self, selector: &Selector) -> Result<Option<Self::Handle>, DriverError>;

    /// Whether at least one element matches `selector` right now
    async fn element_exists(&self, selector: &Selector) -> Result<bool, DriverError>;

    /// Click a previously resolved element
    async fn click(&self, handle: &Self::Handle) -> Result<(), DriverError>;

    /// All elements matching `selector`, in document order
    async fn find_all(&self, selector: &Selector) -> Result<Vec<Self::Handle>, DriverError>;

    /// Cooperatively suspend the caller
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
