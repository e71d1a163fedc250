//! Non-fatal diagnostic collection.
//!
//! Validation and line processing never print; they record keyed warnings
//! here and the caller decides whether and where to surface them. Keys make
//! repeated occurrences of the same condition (e.g. the same bad transform
//! value hit on every line) collapse to a single report entry.

/// A single keyed warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Deduplication key; warnings sharing a key are reported once.
    pub key: String,
    /// Human-readable message.
    pub message: String,
}

/// Collector for non-fatal warnings, deduplicated by key at report time.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a warning under a deduplication key.
    pub fn warn(&mut self, key: impl Into<String>, message: impl Into<String>) {
        self.entries.push(Diagnostic {
            key: key.into(),
            message: message.into(),
        });
    }

    /// Absorbs another collector's entries.
    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All recorded entries in insertion order, duplicates included.
    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    /// One entry per key, keeping the first occurrence, in insertion order.
    pub fn deduped(&self) -> Vec<&Diagnostic> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .iter()
            .filter(|d| seen.insert(d.key.as_str()))
            .collect()
    }
}
