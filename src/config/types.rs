use std::fmt;

use serde::Deserialize;

/// Top-level configuration.
///
/// ```toml
/// [strip]
/// gap = 48.0
///
/// [disclosure]
/// min_margin_space = 420.0
/// panel_gap = 24.0
/// panel_width = 380.0
///
/// [host]
/// scroll_step = 1.0
/// max_flush_passes = 8
/// ```
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub strip: StripConfig,
    #[serde(default)]
    pub disclosure: DisclosureConfig,
    #[serde(default)]
    pub host: HostConfig,
}

/// Tiling label strip defaults.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct StripConfig {
    /// Gap between label instances when a strip does not set its own.
    #[serde(default = "default_strip_gap")]
    pub gap: f32,
}

impl Default for StripConfig {
    fn default() -> Self {
        Self {
            gap: default_strip_gap(),
        }
    }
}

/// Anchored disclosure geometry.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct DisclosureConfig {
    /// Space needed to the right of the content region before the panel floats.
    #[serde(default = "default_min_margin_space")]
    pub min_margin_space: f32,
    /// Distance between the content region's right edge and the floating panel.
    #[serde(default = "default_panel_gap")]
    pub panel_gap: f32,
    /// Width of the floating panel.
    #[serde(default = "default_panel_width")]
    pub panel_width: f32,
}

impl Default for DisclosureConfig {
    fn default() -> Self {
        Self {
            min_margin_space: default_min_margin_space(),
            panel_gap: default_panel_gap(),
            panel_width: default_panel_width(),
        }
    }
}

/// Rendering host settings.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct HostConfig {
    /// Document distance scrolled per wheel notch.
    #[serde(default = "default_scroll_step")]
    pub scroll_step: f32,
    /// Upper bound on layout/observe passes in a single flush.
    #[serde(default = "default_max_flush_passes")]
    pub max_flush_passes: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            scroll_step: default_scroll_step(),
            max_flush_passes: default_max_flush_passes(),
        }
    }
}

fn default_strip_gap() -> f32 {
    48.0
}

fn default_min_margin_space() -> f32 {
    420.0
}

fn default_panel_gap() -> f32 {
    24.0
}

fn default_panel_width() -> f32 {
    380.0
}

fn default_scroll_step() -> f32 {
    1.0
}

fn default_max_flush_passes() -> usize {
    8
}

// =============================================================================
// Validation
// =============================================================================

/// A single problem found by [`Config::validate`].
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigIssue {
    pub field: &'static str,
    pub message: String,
    pub is_error: bool,
}

impl ConfigIssue {
    fn error(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            is_error: true,
        }
    }

    fn warning(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
            is_error: false,
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = if self.is_error { "error" } else { "warning" };
        write!(f, "{} in {}: {}", level, self.field, self.message)
    }
}

impl Config {
    /// Check the configuration for values the components cannot honor.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let lengths = [
            ("strip.gap", self.strip.gap),
            ("disclosure.min_margin_space", self.disclosure.min_margin_space),
            ("disclosure.panel_gap", self.disclosure.panel_gap),
            ("disclosure.panel_width", self.disclosure.panel_width),
            ("host.scroll_step", self.host.scroll_step),
        ];
        for (field, value) in lengths {
            if !value.is_finite() || value < 0.0 {
                issues.push(ConfigIssue::error(
                    field,
                    format!("must be a non-negative length, got {}", value),
                ));
            }
        }

        if self.host.max_flush_passes == 0 {
            issues.push(ConfigIssue::error(
                "host.max_flush_passes",
                "must allow at least one pass",
            ));
        }

        let d = &self.disclosure;
        if d.panel_width + d.panel_gap > d.min_margin_space {
            issues.push(ConfigIssue::warning(
                "disclosure.panel_width",
                format!(
                    "panel ({} + gap {}) is wider than min_margin_space ({}); floating panels may leave the viewport",
                    d.panel_width, d.panel_gap, d.min_margin_space
                ),
            ));
        }

        issues
    }
}
