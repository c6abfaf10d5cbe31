//! JSON output formatter

use crate::error::Result;
use crate::format::{MapView, ViewFormatter};

/// JSON formatter - outputs the full view as pretty-printed JSON
pub struct JsonFormatter;

impl ViewFormatter for JsonFormatter {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Viewport and markers as JSON"
    }

    fn format(&self, view: &MapView) -> Result<String> {
        Ok(serde_json::to_string_pretty(view)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::sample_view;

    #[test]
    fn test_json_format() {
        let output = JsonFormatter.format(&sample_view()).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(parsed.get("viewport").is_some());
        assert_eq!(parsed["zoom"], 10);
        assert_eq!(parsed["phase"], "idle");
        assert_eq!(parsed["markers"].as_array().unwrap().len(), 2);
        assert_eq!(parsed["markers"][0]["count"], 2);
    }

    #[test]
    fn test_json_formatter_info() {
        assert_eq!(JsonFormatter.name(), "json");
        assert!(!JsonFormatter.description().is_empty());
    }
}
