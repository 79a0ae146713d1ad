use crate::types::SubjectId;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// UnitConfig
// ---------------------------------------------------------------------------

/// Per-unit configuration: stripe width and the two outreach templates.
///
/// Templates are free text; the literal `{subject}` is replaced with the
/// subject id at render time. Rendering never fails — a template without the
/// placeholder is sent as-is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    #[serde(default = "default_stripe_count")]
    pub stripe_count: u32,
    #[serde(default = "default_zen_template")]
    pub zen_template: String,
    #[serde(default = "default_whip_template")]
    pub whip_template: String,
}

fn default_stripe_count() -> u32 {
    3
}

fn default_zen_template() -> String {
    "Hi {subject}! Reaching out to make first contact — reply here when you get a moment."
        .to_string()
}

fn default_whip_template() -> String {
    "Reminder for {subject}: the current update round is underway and we have not heard from you yet."
        .to_string()
}

impl Default for UnitConfig {
    fn default() -> Self {
        Self {
            stripe_count: default_stripe_count(),
            zen_template: default_zen_template(),
            whip_template: default_whip_template(),
        }
    }
}

impl UnitConfig {
    pub fn render_zen(&self, subject: SubjectId) -> String {
        render(&self.zen_template, subject)
    }

    pub fn render_whip(&self, subject: SubjectId) -> String {
        render(&self.whip_template, subject)
    }
}

fn render(template: &str, subject: SubjectId) -> String {
    template.replace("{subject}", &subject.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
