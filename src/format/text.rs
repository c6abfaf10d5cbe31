//! Human-readable text output formatter

use crate::error::Result;
use crate::format::{MapView, ViewFormatter};
use std::fmt::Write;

/// Text formatter - outputs a human-readable summary
pub struct TextFormatter;

impl ViewFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, view: &MapView) -> Result<String> {
        let mut output = String::new();
        let viewport = &view.snapshot.viewport;

        // Writing to a String cannot fail
        let _ = writeln!(output, "Center: {}", viewport.center);
        let _ = writeln!(
            output,
            "Span: {:.4} x {:.4} (zoom {})",
            viewport.lat_delta, viewport.lng_delta, view.zoom
        );
        if let Some(address) = &view.snapshot.resolved_address {
            let _ = writeln!(output, "Search: {}", address);
        }
        if let Some(error) = &view.snapshot.error {
            let _ = writeln!(output, "Error: {}", error.message);
        }

        let _ = writeln!(output, "\nMarkers ({}):", view.markers.len());
        for marker in &view.markers {
            if marker.is_single() {
                let name = marker.members.first().map(|b| b.name.as_str()).unwrap_or("");
                let _ = writeln!(output, "  {} {} \"{}\"", marker.center, marker.id, name);
            } else {
                let _ = writeln!(
                    output,
                    "  {} {} [{} branches]",
                    marker.center, marker.id, marker.count
                );
            }
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::tests::sample_view;

    #[test]
    fn test_text_format() {
        let output = TextFormatter.format(&sample_view()).unwrap();

        assert!(output.contains("Center: (14.554700, 121.024400)"));
        assert!(output.contains("zoom 10"));
        assert!(output.contains("Search: Ayala Avenue"));
        assert!(output.contains("Markers (2):"));
        assert!(output.contains("[2 branches]"));
        assert!(output.contains("\"Cebu IT Park\""));
    }

    #[test]
    fn test_text_formatter_info() {
        assert_eq!(TextFormatter.name(), "text");
        assert!(!TextFormatter.description().is_empty());
    }
}
