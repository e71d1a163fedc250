//! Inline markup resolution.
//!
//! Splits a line into styled fragments by scanning it once with a combined
//! alternation of the configured inline rules. Each inline rule's pattern
//! carries an outer named group (the whole span, delimiters included) and a
//! nested `content_<name>` group (the text between the delimiters); the
//! emitted fragment holds the content text with the inline style composed
//! over the line's base style. Unmatched spans pass through under the base
//! style, so a line with no markup is reproduced exactly.

use regex::Regex;

use crate::diagnostics::Diagnostics;
use crate::rules::RuleSet;
use crate::style::{ResolvedStyle, StyleEntry, StyleTable};

/// A run of text with one resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub text: String,
    pub style: ResolvedStyle,
}

impl Fragment {
    pub fn new(text: impl Into<String>, style: ResolvedStyle) -> Self {
        Fragment {
            text: text.into(),
            style,
        }
    }
}

/// The per-run inline scanner: combined alternation plus per-group styles.
#[derive(Debug)]
pub struct InlineResolver {
    finder: Option<Regex>,
    groups: Vec<(&'static str, StyleEntry)>,
}

impl InlineResolver {
    /// Builds the resolver from the configured inline rules.
    ///
    /// A combined alternation that fails to compile (e.g. colliding group
    /// names across user-edited rules) is reported once and the resolver
    /// degrades to passthrough.
    pub fn new(rules: &RuleSet, styles: &StyleTable, diag: &mut Diagnostics) -> Self {
        let mut patterns = Vec::new();
        let mut groups = Vec::new();

        for rule in rules.inline() {
            let Some(group) = rule.kind.inline_group() else {
                continue;
            };
            patterns.push(rule.pattern.clone());
            groups.push((group, group_style(group, styles)));
        }

        if patterns.is_empty() {
            return InlineResolver {
                finder: None,
                groups,
            };
        }

        let combined = patterns.join("|");
        let finder = match Regex::new(&combined) {
            Ok(re) => Some(re),
            Err(e) => {
                diag.warn(
                    "inline-combined-pattern",
                    format!("inline rules do not combine: {}", e),
                );
                None
            }
        };

        InlineResolver { finder, groups }
    }

    /// Resolves one line of text into fragments over a base style.
    pub fn resolve(
        &self,
        text: &str,
        base: &ResolvedStyle,
        diag: &mut Diagnostics,
    ) -> Vec<Fragment> {
        let Some(finder) = &self.finder else {
            return passthrough(text, base);
        };

        let mut fragments = Vec::new();
        let mut last = 0;

        for caps in finder.captures_iter(text) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            if whole.start() > last {
                fragments.push(Fragment::new(&text[last..whole.start()], base.clone()));
            }

            let fired = self
                .groups
                .iter()
                .find(|(group, _)| caps.name(group).is_some());
            match fired {
                Some((group, entry)) => {
                    let content_group = format!("content_{}", group);
                    match caps.name(&content_group) {
                        Some(content) => {
                            let style =
                                base.overlay(&entry.attrs, entry.transform.as_ref());
                            push_nonempty(&mut fragments, content.as_str(), style);
                        }
                        None => {
                            // Span matched but the content group did not
                            // capture; keep the raw text rather than drop it.
                            diag.warn(
                                format!("inline-extract:{}", group),
                                format!(
                                    "inline rule '{}' matched without a '{}' capture, emitting raw text",
                                    group, content_group
                                ),
                            );
                            push_nonempty(&mut fragments, whole.as_str(), base.clone());
                        }
                    }
                }
                None => push_nonempty(&mut fragments, whole.as_str(), base.clone()),
            }

            last = whole.end();
        }

        if last < text.len() {
            fragments.push(Fragment::new(&text[last..], base.clone()));
        }
        fragments
    }
}

fn passthrough(text: &str, base: &ResolvedStyle) -> Vec<Fragment> {
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Fragment::new(text, base.clone())]
    }
}

fn push_nonempty(fragments: &mut Vec<Fragment>, text: &str, style: ResolvedStyle) {
    if !text.is_empty() {
        fragments.push(Fragment::new(text, style));
    }
}

/// Inline group styles resolve through well-known style table keys, with
/// built-in bare-attribute fallbacks when the table does not define them.
fn group_style(group: &str, styles: &StyleTable) -> StyleEntry {
    let (key, fallback) = match group {
        "code" => ("style_inline_code", ResolvedStyle::plain()),
        "bold_star" | "bold_under" => (
            "style_inline_bold",
            ResolvedStyle {
                bold: true,
                ..Default::default()
            },
        ),
        _ => (
            "style_inline_italic",
            ResolvedStyle {
                italic: true,
                ..Default::default()
            },
        ),
    };

    styles.get(key).cloned().unwrap_or(StyleEntry {
        attrs: fallback,
        transform: None,
    })
}
