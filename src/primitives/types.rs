//! Primitive types - Props, cleanup and subscription guards.

use crate::config::DisclosureConfig;
use crate::types::Orientation;

// =============================================================================
// Cleanup Function
// =============================================================================

/// Cleanup function returned by registrations.
pub type Cleanup = Box<dyn FnOnce()>;

// =============================================================================
// Subscription Guard
// =============================================================================

/// Owns one registration and releases it exactly once.
///
/// Released by `release()` or on drop, whichever happens first.
#[derive(Default)]
pub struct Subscription {
    cleanup: Option<Cleanup>,
}

impl Subscription {
    pub fn new(cleanup: impl FnOnce() + 'static) -> Self {
        Self {
            cleanup: Some(Box::new(cleanup)),
        }
    }

    /// An empty guard that holds nothing.
    pub fn none() -> Self {
        Self { cleanup: None }
    }

    pub fn is_active(&self) -> bool {
        self.cleanup.is_some()
    }

    pub fn release(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

// =============================================================================
// Label Strip Props
// =============================================================================

/// Properties for a tiling label strip.
#[derive(Debug, Clone)]
pub struct LabelStripProps {
    /// Element the strip is appended to. `None` makes it a root.
    pub parent: Option<usize>,
    pub label: String,
    pub orientation: Orientation,
    /// Cross-axis size of the strip.
    pub thickness: f32,
    /// Spacing between instances. Defaults to `strip.gap` from configuration.
    pub gap: Option<f32>,
    /// Rotation hint in degrees, applied to every instance. Visual only.
    pub rotate: Option<f32>,
}

impl Default for LabelStripProps {
    fn default() -> Self {
        Self {
            parent: None,
            label: String::new(),
            orientation: Orientation::Horizontal,
            thickness: 1.0,
            gap: None,
            rotate: None,
        }
    }
}

// =============================================================================
// Disclosure Props
// =============================================================================

/// Supplementary content revealed by a disclosure.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisclosureContent {
    pub body: String,
    pub attribution: Option<String>,
}

impl DisclosureContent {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            attribution: None,
        }
    }

    pub fn with_attribution(mut self, attribution: impl Into<String>) -> Self {
        self.attribution = Some(attribution.into());
        self
    }

    /// Body as rendered: wrapped in quotation marks.
    pub fn quoted_body(&self) -> String {
        format!("\"{}\"", self.body)
    }

    /// Attribution as rendered, if any.
    pub fn attribution_line(&self) -> Option<String> {
        self.attribution.as_ref().map(|a| format!("— {}", a))
    }
}

/// Properties for an anchored disclosure.
#[derive(Debug, Clone, Default)]
pub struct DisclosureProps {
    /// Element the trigger is appended to. `None` makes it a root.
    pub parent: Option<usize>,
    pub trigger: String,
    pub content: DisclosureContent,
    /// Overrides the `disclosure` section of the active configuration.
    pub config: Option<DisclosureConfig>,
}
