//! The rule-to-style mapping document.
//!
//! Maps detection rule names to either a style name (plain lines, headers,
//! rules) or a block mapping object (code blocks, quotes, list blocks) that
//! names the styles for the block's parts.

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::diagnostics::Diagnostics;

/// A mapping target: a style name or a block mapping object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MappingValue {
    Style(String),
    Block(BlockMapping),
}

/// Style assignments for the parts of a composite block.
///
/// All fields are optional; consumers fall back to built-in defaults for
/// anything left out.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockMapping {
    #[serde(default)]
    pub panel_border_style: Option<String>,
    #[serde(default)]
    pub panel_title_style: Option<String>,
    #[serde(default)]
    pub content_style: Option<String>,
    #[serde(default)]
    pub guide_style: Option<String>,
    #[serde(default)]
    pub syntax_theme: Option<String>,
    #[serde(default)]
    pub panel_padding: Option<serde_json::Value>,
}

impl BlockMapping {
    /// Reads the panel padding as `(vertical, horizontal)`.
    ///
    /// Accepts a two-element array of non-negative integers; anything else
    /// is reported and replaced with the default of `(0, 1)`.
    pub fn padding(&self, block_name: &str, diag: &mut Diagnostics) -> (usize, usize) {
        const DEFAULT: (usize, usize) = (0, 1);

        let Some(raw) = &self.panel_padding else {
            return DEFAULT;
        };
        let parsed = raw.as_array().filter(|a| a.len() == 2).and_then(|a| {
            let y = a[0].as_u64()?;
            let x = a[1].as_u64()?;
            Some((y as usize, x as usize))
        });
        match parsed {
            Some(p) => p,
            None => {
                diag.warn(
                    format!("panel-padding:{}", block_name),
                    format!(
                        "mapping '{}': panel_padding must be a [vertical, horizontal] pair, using default",
                        block_name
                    ),
                );
                DEFAULT
            }
        }
    }
}

/// The mapping document: rule name to mapping target, in document order.
pub type StyleMapping = BTreeMap<String, MappingValue>;
