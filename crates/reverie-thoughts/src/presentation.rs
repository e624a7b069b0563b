//! Display strings derived from a thought. Nothing here is stored.

use crate::types::{Thought, ThoughtKind};

/// `created_at` rendering: day/month/year, 24-hour clock.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Render `"[DD/MM/YYYY HH:MM] brief"` with the brief trimmed.
///
/// Reflections carry a `Reflection: ` marker before the brief.
pub fn brief_with_timestamp(thought: &Thought) -> String {
    let timestamp = thought.created_at.format(TIMESTAMP_FORMAT);
    let brief = thought.brief.trim();

    match thought.kind {
        ThoughtKind::Reflection => format!("[{}] Reflection: {}", timestamp, brief),
        ThoughtKind::Base | ThoughtKind::Observation => format!("[{}] {}", timestamp, brief),
    }
}

impl Thought {
    /// See [`brief_with_timestamp`].
    pub fn brief_with_timestamp(&self) -> String {
        brief_with_timestamp(self)
    }
}
