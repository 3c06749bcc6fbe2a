use anyhow::{Context, Result};
use async_trait::async_trait;
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator as WdLocator};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::driver::{Driver, DriverError};
use crate::locator::Selector;

/// [`Driver`] over a WebDriver session, typically an Appium server driving
/// an Android device through UiAutomator2
pub struct AppiumDriver {
    client: Client,
}

impl AppiumDriver {
    /// Open a session with the configured capabilities
    ///
    /// # Arguments
    /// * `config` - WebDriver URL and session capabilities
    pub async fn connect(config: &RunConfig) -> Result<Self> {
        let webdriver_url = config.webdriver_url.trim_end_matches('/');
        info!("Connecting to WebDriver at {}", webdriver_url);

        if !Self::is_webdriver_running(webdriver_url).await {
            anyhow::bail!(
                "Cannot connect to WebDriver at {}.\n\
                Please ensure an Appium server is running:\n\
                  appium --port 4723\n\n\
                Install instructions:\n\
                  npm install -g appium\n\
                  appium driver install uiautomator2",
                webdriver_url
            );
        }

        debug!(
            "Requesting session with {} capabilities",
            config.capabilities.len()
        );
        let client = ClientBuilder::rustls()
            .capabilities(config.capabilities.clone())
            .connect(webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        info!("WebDriver session established");
        Ok(Self { client })
    }

    async fn is_webdriver_running(url: &str) -> bool {
        // Try to connect to the WebDriver status endpoint
        let status_url = format!("{}/status", url);

        match reqwest::get(&status_url).await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn query(&self, selector: &Selector) -> Result<Vec<Element>, DriverError> {
        let xpath = selector.to_xpath();
        debug!("Querying {} as {}", selector, xpath);
        self.client
            .find_all(WdLocator::XPath(&xpath))
            .await
            .map_err(map_cmd_error)
    }

    /// End the session
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[async_trait]
impl Driver for AppiumDriver {
    type Handle = Element;

    async fn find_element(&self, selector: &Selector) -> Result<Option<Element>, DriverError> {
        Ok(self.query(selector).await?.into_iter().next())
    }

    async fn element_exists(&self, selector: &Selector) -> Result<bool, DriverError> {
        Ok(!self.query(selector).await?.is_empty())
    }

    async fn click(&self, handle: &Element) -> Result<(), DriverError> {
        handle.click().await.map_err(map_cmd_error)
    }

    async fn find_all(&self, selector: &Selector) -> Result<Vec<Element>, DriverError> {
        self.query(selector).await
    }
}

/// Classify a WebDriver command error by its message
fn map_cmd_error(err: CmdError) -> DriverError {
    classify_error_message(&err.to_string())
}

fn classify_error_message(message: &str) -> DriverError {
    let lower = message.to_lowercase();
    if lower.contains("invalid session id")
        || lower.contains("session deleted")
        || lower.contains("session not created")
        || lower.contains("no such session")
        || lower.contains("connection refused")
    {
        DriverError::SessionLost(message.to_string())
    } else if lower.contains("stale element") {
        DriverError::StaleElement(message.to_string())
    } else {
        DriverError::Command(message.to_string())
    }
}
