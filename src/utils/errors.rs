//! User-Friendly Error Formatting
//!
//! Provides user-friendly error messages with troubleshooting hints
//! for common error scenarios.

use std::fmt::Write;

/// Format error for user consumption
///
/// Takes technical error and produces user-friendly message with
/// troubleshooting steps and context.
pub fn format_user_error(error: &anyhow::Error) -> String {
    let mut output = String::new();

    // Header
    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "╔════════════════════════════════════════════════════════════╗"
    )
    .ok();
    writeln!(
        &mut output,
        "║                     ERROR                                  ║"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();
    writeln!(&mut output).ok();

    // Match on the whole chain; the outermost context is often generic.
    let error_msg = format!("{:#}", error);

    if error_msg.contains("snapshot") {
        format_snapshot_error(&mut output, &error_msg);
    } else if error_msg.contains("primary display")
        || error_msg.contains("base display")
        || error_msg.contains("not connected")
    {
        format_topology_error(&mut output, &error_msg);
    } else if error_msg.contains("Invalid dimensions") || error_msg.contains("Degenerate") {
        format_dimensions_error(&mut output, &error_msg);
    } else if error_msg.contains("drag script") {
        format_script_error(&mut output, &error_msg);
    } else if error_msg.contains("config")
        || error_msg.contains("render area")
        || error_msg.contains("min_visual_scale")
        || error_msg.contains("log level")
    {
        format_config_error(&mut output, &error_msg);
    } else {
        format_generic_error(&mut output, &error_msg);
    }

    // Technical details
    writeln!(&mut output).ok();
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Technical Details:").ok();
    writeln!(&mut output).ok();
    writeln!(&mut output, "{:#}", error).ok();
    writeln!(&mut output).ok();

    // Footer with help
    writeln!(
        &mut output,
        "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━"
    )
    .ok();
    writeln!(&mut output, "Need Help?").ok();
    writeln!(
        &mut output,
        "  - Run with --verbose for detailed logs: lamco-display-layout -vv"
    )
    .ok();
    writeln!(
        &mut output,
        "  - Use --log-format json --log-file layout.log to capture a trace"
    )
    .ok();
    writeln!(
        &mut output,
        "╚════════════════════════════════════════════════════════════╝"
    )
    .ok();

    output
}

fn format_snapshot_error(output: &mut String, _error: &str) {
    writeln!(output, "Display Snapshot Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not load the display snapshot.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Snapshot file not found").ok();
    writeln!(output, "     → Pass it with: --snapshot /path/to/displays.toml").ok();
    writeln!(output, "     → See demos/displays.toml for the format").ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid TOML or missing fields").ok();
    writeln!(
        output,
        "     → Every [[display]] needs id, left, top, width and height"
    )
    .ok();
    writeln!(output, "     → id must be a quoted string: id = \"1\"").ok();
    writeln!(output).ok();
    writeln!(output, "  3. Primary display count").ok();
    writeln!(output, "     → Exactly one [[display]] must set primary = true").ok();
}

fn format_script_error(output: &mut String, _error: &str) {
    writeln!(output, "Drag Script Error").ok();
    writeln!(output).ok();
    writeln!(output, "Could not read or replay the drag script.").ok();
    writeln!(output).ok();
    writeln!(output, "Expected Format:").ok();
    writeln!(output).ok();
    writeln!(output, "  A JSON array of pointer events, for example:").ok();
    writeln!(output, "    [{{\"type\": \"start\", \"x\": 400, \"y\": 150}},").ok();
    writeln!(output, "     {{\"type\": \"move\", \"x\": 260, \"y\": 610}},").ok();
    writeln!(output, "     {{\"type\": \"end\"}}]").ok();
    writeln!(output).ok();
    writeln!(output, "  Coordinates are rendered-area pixels; run without a").ok();
    writeln!(output, "  script first to see where each display is drawn.").ok();
}

fn format_config_error(output: &mut String, _error: &str) {
    writeln!(output, "Configuration Error").ok();
    writeln!(output).ok();
    writeln!(output, "Problem with configuration file.").ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. Configuration file not found").ok();
    writeln!(
        output,
        "     → Or specify: lamco-display-layout -c /path/to/config.toml"
    )
    .ok();
    writeln!(
        output,
        "     → Create from example: cp demos/config.toml config.toml"
    )
    .ok();
    writeln!(output).ok();
    writeln!(output, "  2. Invalid TOML syntax").ok();
    writeln!(output, "     → Check for typos, missing quotes, etc.").ok();
    writeln!(output).ok();
    writeln!(output, "  3. Out of range values").ok();
    writeln!(output, "     → min_visual_scale must be > 0").ok();
    writeln!(output, "     → render_area width and height must be > 0").ok();
}

fn format_topology_error(output: &mut String, _error: &str) {
    writeln!(output, "Display Topology Error").ok();
    writeln!(output).ok();
    writeln!(
        output,
        "The reported displays cannot be arranged relative to each other."
    )
    .ok();
    writeln!(output).ok();
    writeln!(output, "Common Causes:").ok();
    writeln!(output).ok();
    writeln!(output, "  1. No primary display, or more than one").ok();
    writeln!(output, "  2. A layout names a parent that does not exist").ok();
    writeln!(output, "  3. Parent links form a loop instead of reaching the primary").ok();
    writeln!(output, "  4. A lone primary display was dragged (nothing to attach to)").ok();
}

fn format_dimensions_error(output: &mut String, _error: &str) {
    writeln!(output, "Display Dimensions Error").ok();
    writeln!(output).ok();
    writeln!(output, "A display reports zero width or height.").ok();
    writeln!(output).ok();
    writeln!(
        output,
        "  → Check width and height of every [[display]] in the snapshot"
    )
    .ok();
}

fn format_generic_error(output: &mut String, error: &str) {
    writeln!(output, "Layout Error").ok();
    writeln!(output).ok();
    writeln!(output, "An error occurred while arranging displays.").ok();
    writeln!(output).ok();
    writeln!(output, "Error: {}", error).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutError;
    use anyhow::Context;

    #[test]
    fn test_format_user_error() {
        let error = anyhow::anyhow!("Failed to read display snapshot: No such file");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("ERROR"));
        assert!(formatted.contains("Display Snapshot Error"));
    }

    #[test]
    fn test_topology_error_formatting() {
        let error = Err::<(), _>(LayoutError::MissingBase("1".to_string()))
            .context("Failed to move display 1")
            .unwrap_err();
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Display Topology Error"));
        assert!(formatted.contains("No base display found for 1"));
    }

    #[test]
    fn test_topology_error_wins_over_script_context() {
        let error = Err::<(), _>(LayoutError::Unanchored("3".to_string()))
            .context("drag script event 2 failed")
            .unwrap_err();
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Display Topology Error"));
    }

    #[test]
    fn test_config_error_formatting() {
        let error = anyhow::anyhow!("Invalid render area: 0x320");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Configuration Error"));
    }

    #[test]
    fn test_generic_error_formatting() {
        let error = anyhow::anyhow!("something odd");
        let formatted = format_user_error(&error);
        assert!(formatted.contains("Layout Error"));
        assert!(formatted.contains("something odd"));
    }
}
