// Common test utilities and fixtures

use navcheck::FakeElement;
use std::path::PathBuf;
use tempfile::TempDir;

#[allow(dead_code)]
pub const TAB_CLASS: &str = "android.view.View";

/// Write `contents` to a scenario file inside a fresh temporary directory
#[allow(dead_code)]
pub fn write_scenario(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("scenario.json");
    std::fs::write(&path, contents).expect("Failed to write scenario");
    (temp_dir, path)
}

/// Bottom navigation bar with unlabeled, clickable tab views
#[allow(dead_code)]
pub fn unlabeled_tab_bar(tabs: usize) -> Vec<FakeElement> {
    (0..tabs)
        .map(|_| FakeElement::widget(TAB_CLASS, true))
        .collect()
}

/// App screens as exposed by a build that labels tabs by text
#[allow(dead_code)]
pub fn trendscope_app() -> Vec<FakeElement> {
    let favorites = vec![
        FakeElement::text("AAPL"),
        FakeElement::text("GOOG"),
        FakeElement::text("TSLA"),
    ];
    let details = vec![
        FakeElement::text("MSFT · Microsoft Corp"),
        FakeElement::description("Navigate up"),
    ];
    let stock_list = vec![FakeElement::text("MSFT 412.50").revealing(details)];

    vec![
        FakeElement::text("Stocks").revealing(stock_list),
        FakeElement::text("Favorites").revealing(favorites),
    ]
}

#[allow(dead_code)]
pub mod fixtures {
    pub const VALID_SCENARIO: &str = r#"{
        "name": "smoke",
        "budget_ms": 30000,
        "steps": [
            {"action": "click", "label": "Open Stocks", "target": [{"by": "text", "text": "Stocks"}]},
            {"action": "fixed_delay", "ms": 500},
            {"action": "click", "target": [
                {"by": "text", "text": "Favorites"},
                {"by": "index", "index": 1, "container": {"by": "class", "class_name": "android.view.View"}}
            ]}
        ]
    }"#;

    pub const EMPTY_STEPS: &str = r#"{"name": "empty", "steps": []}"#;
}
