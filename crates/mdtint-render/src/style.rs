//! Style definitions and composition.
//!
//! A style starts life as a config value: either a plain attribute string
//! (`"bold yellow"`) or an object carrying an attribute string plus a color
//! transform. Parsing happens once, at validation time; the rest of the
//! engine works with [`ResolvedStyle`] values and composes them with
//! [`ResolvedStyle::overlay`].
//!
//! The attribute string grammar is whitespace-separated words:
//!
//! - attribute flags: `bold`, `dim`, `italic`, `underline`, `blink`,
//!   `reverse`, `strikethrough`
//! - a foreground color (any word the color parser accepts)
//! - `on <color>` for the background

use serde::Deserialize;

use crate::color::ColorDef;
use crate::hsl::{self, TransformSpec};

/// A fully parsed terminal style: attribute flags plus optional colors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub bold: bool,
    pub dim: bool,
    pub italic: bool,
    pub underline: bool,
    pub blink: bool,
    pub reverse: bool,
    pub strikethrough: bool,
    pub fg: Option<ColorDef>,
    pub bg: Option<ColorDef>,
}

impl ResolvedStyle {
    /// The empty style: no flags, terminal default colors.
    pub fn plain() -> Self {
        Self::default()
    }

    /// Parses an attribute string.
    pub fn parse(s: &str) -> Result<Self, String> {
        let mut style = ResolvedStyle::default();
        let mut words = s.split_whitespace();

        while let Some(word) = words.next() {
            match word.to_lowercase().as_str() {
                "bold" => style.bold = true,
                "dim" => style.dim = true,
                "italic" => style.italic = true,
                "underline" => style.underline = true,
                "blink" => style.blink = true,
                "reverse" => style.reverse = true,
                "strikethrough" => style.strikethrough = true,
                "on" => {
                    let color_word = words
                        .next()
                        .ok_or_else(|| "'on' must be followed by a color".to_string())?;
                    let color = ColorDef::parse(color_word)?;
                    if style.bg.is_some() {
                        return Err(format!("duplicate background color '{}'", color_word));
                    }
                    style.bg = Some(color);
                }
                _ => {
                    let color = ColorDef::parse(word)?;
                    if style.fg.is_some() {
                        return Err(format!("duplicate foreground color '{}'", word));
                    }
                    style.fg = Some(color);
                }
            }
        }

        Ok(style)
    }

    /// Composes `over` on top of `self`.
    ///
    /// Attribute flags are additive. When `transform` is present the
    /// foreground is derived from `self`'s foreground through it and the
    /// overlay's own foreground is not consulted; otherwise the overlay's
    /// foreground wins where set. The background follows the same
    /// overlay-wins rule and is never transformed.
    pub fn overlay(&self, over: &ResolvedStyle, transform: Option<&TransformSpec>) -> ResolvedStyle {
        let fg = match transform {
            Some(spec) => self.fg.as_ref().map(|c| hsl::transform(c, spec)),
            None => over.fg.clone().or_else(|| self.fg.clone()),
        };

        ResolvedStyle {
            bold: self.bold || over.bold,
            dim: self.dim || over.dim,
            italic: self.italic || over.italic,
            underline: self.underline || over.underline,
            blink: self.blink || over.blink,
            reverse: self.reverse || over.reverse,
            strikethrough: self.strikethrough || over.strikethrough,
            fg,
            bg: over.bg.clone().or_else(|| self.bg.clone()),
        }
    }

    /// Converts to a `console::Style` ready to apply to text.
    pub fn to_console_style(&self) -> console::Style {
        let mut style = console::Style::new();
        if self.bold {
            style = style.bold();
        }
        if self.dim {
            style = style.dim();
        }
        if self.italic {
            style = style.italic();
        }
        if self.underline {
            style = style.underlined();
        }
        if self.blink {
            style = style.blink();
        }
        if self.reverse {
            style = style.reverse();
        }
        if self.strikethrough {
            style = style.strikethrough();
        }
        if let Some(fg) = self.fg.as_ref().and_then(ColorDef::to_console_color) {
            style = style.fg(fg);
        }
        if let Some(bg) = self.bg.as_ref().and_then(ColorDef::to_console_color) {
            style = style.bg(bg);
        }
        style
    }
}

/// A raw style definition as it appears in the style table document.
///
/// Either a bare attribute string or an object with an attribute string and
/// an optional color transform. The shape is decided at deserialization
/// time, not re-inspected downstream.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StyleDef {
    Simple(String),
    Composite {
        attributes: String,
        #[serde(default)]
        transform: Option<serde_json::Value>,
    },
}

impl StyleDef {
    pub fn attributes(&self) -> &str {
        match self {
            StyleDef::Simple(s) => s,
            StyleDef::Composite { attributes, .. } => attributes,
        }
    }

    pub fn transform_value(&self) -> Option<&serde_json::Value> {
        match self {
            StyleDef::Simple(_) => None,
            StyleDef::Composite { transform, .. } => transform.as_ref(),
        }
    }
}

/// A validated style table entry: parsed attributes plus parsed transform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyleEntry {
    pub attrs: ResolvedStyle,
    pub transform: Option<TransformSpec>,
}

/// The validated style table.
///
/// Lookup is by name; every entry has already survived validation, so
/// access never re-parses anything.
#[derive(Debug, Clone, Default)]
pub struct StyleTable {
    entries: std::collections::BTreeMap<String, StyleEntry>,
}

impl StyleTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: StyleEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&StyleEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Resolves a named style against the plain base.
    ///
    /// The plain base carries no color, where a transform would degrade to
    /// identity anyway, so the entry's attributes come through as-is.
    pub fn materialize(&self, name: &str) -> Option<ResolvedStyle> {
        self.get(name)
            .map(|e| ResolvedStyle::plain().overlay(&e.attrs, None))
    }
}
