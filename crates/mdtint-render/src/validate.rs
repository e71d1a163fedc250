//! Configuration compilation and validation.
//!
//! Turns the three raw documents (detection rules, mapping, styles) into a
//! [`CompiledConfig`] the processor can use without ever re-parsing. The
//! pass is all-or-nothing: every defect across all three documents is
//! collected into one [`ConfigReport`], and any defect rejects the run.

use std::collections::BTreeMap;

use crate::diagnostics::Diagnostics;
use crate::error::{ConfigError, ConfigReport};
use crate::hsl::TransformSpec;
use crate::mapping::{BlockMapping, MappingValue, StyleMapping};
use crate::rules::{RuleKind, RuleSet};
use crate::style::{ResolvedStyle, StyleDef, StyleEntry, StyleTable};

/// Mapping keys with engine-level meaning rather than a detection rule
/// behind them.
const SPECIAL_KEYS: [&str; 4] = ["code_block", "blockquote", "list_block", "default_text"];

/// The validated configuration: compiled rules, mapping, style table.
#[derive(Debug, Clone, Default)]
pub struct CompiledConfig {
    pub rules: RuleSet,
    pub mapping: StyleMapping,
    pub styles: StyleTable,
}

impl CompiledConfig {
    /// The base style every unmapped line gets.
    ///
    /// Resolves the `default_text` mapping entry, or a style of that name
    /// directly. Guaranteed to exist after validation.
    pub fn default_style(&self) -> ResolvedStyle {
        self.line_style("default_text")
            .or_else(|| self.styles.materialize("default_text"))
            .unwrap_or_default()
    }

    /// The materialized style a mapping entry assigns to a rule name.
    pub fn line_style(&self, rule_name: &str) -> Option<ResolvedStyle> {
        match self.mapping.get(rule_name)? {
            MappingValue::Style(style_name) => self.styles.materialize(style_name),
            MappingValue::Block(_) => None,
        }
    }

    /// The block mapping for a composite block, if configured.
    pub fn block_mapping(&self, block_name: &str) -> Option<&BlockMapping> {
        match self.mapping.get(block_name)? {
            MappingValue::Block(block) => Some(block),
            MappingValue::Style(_) => None,
        }
    }

    /// Resolves a named block-part style, falling back to the default style.
    pub fn block_part_style(&self, name: Option<&str>) -> ResolvedStyle {
        name.and_then(|n| self.styles.materialize(n))
            .unwrap_or_else(|| self.default_style())
    }

    /// The style family base a list rule maps to, if any.
    pub fn list_style_base(&self, rule_name: &str) -> Option<&str> {
        match self.mapping.get(rule_name)? {
            MappingValue::Style(style_name) => Some(style_name),
            MappingValue::Block(_) => None,
        }
    }

    /// The style for one list nesting level.
    ///
    /// Levels address the family as `{base}{level % 10}`, falling back to
    /// `{base}0` and then to the default style.
    pub fn list_level_style(&self, base: &str, level: i32) -> ResolvedStyle {
        let wrapped = level.rem_euclid(10);
        self.styles
            .materialize(&format!("{}{}", base, wrapped))
            .or_else(|| self.styles.materialize(&format!("{}0", base)))
            .unwrap_or_else(|| self.default_style())
    }
}

/// Compiles and validates the three configuration documents.
///
/// Fatal defects are aggregated into the returned [`ConfigReport`];
/// non-fatal oddities (unknown transform keys, mapped names no rule
/// detects) land in `diag`.
pub fn compile_and_validate(
    rules_raw: &[(String, String)],
    mapping: StyleMapping,
    styles_raw: &BTreeMap<String, StyleDef>,
    diag: &mut Diagnostics,
) -> Result<CompiledConfig, ConfigReport> {
    let mut errors = Vec::new();

    let rules = RuleSet::compile(rules_raw);
    for rule in rules.iter() {
        if let Some(message) = &rule.error {
            errors.push(ConfigError::BadPattern {
                name: rule.name.clone(),
                message: message.clone(),
            });
        }
    }

    let mut styles = StyleTable::new();
    for (name, def) in styles_raw {
        match ResolvedStyle::parse(def.attributes()) {
            Ok(attrs) => {
                let transform = def
                    .transform_value()
                    .and_then(|v| TransformSpec::from_value(v, name, diag));
                styles.insert(name.clone(), StyleEntry { attrs, transform });
            }
            Err(message) => errors.push(ConfigError::BadStyle {
                name: name.clone(),
                message,
            }),
        }
    }

    let has_default = match mapping.get("default_text") {
        Some(MappingValue::Style(name)) => styles.contains(name),
        _ => styles.contains("default_text"),
    };
    if !has_default {
        errors.push(ConfigError::MissingDefault);
    }

    for (key, value) in &mapping {
        let rule = rules.by_name(key);
        let is_special = SPECIAL_KEYS.contains(&key.as_str());
        if rule.is_none() && !is_special {
            diag.warn(
                format!("mapping-unused:{}", key),
                format!("mapping '{}' matches no detection rule", key),
            );
        }

        match value {
            MappingValue::Style(style_name) => {
                let is_list = matches!(
                    rule.map(|r| r.kind),
                    Some(RuleKind::ListBullet | RuleKind::ListNumbered)
                );
                if is_list {
                    // List rules map to a style family base addressed per
                    // nesting level; the level-0 member must exist.
                    if !styles.contains(&format!("{}0", style_name)) {
                        errors.push(ConfigError::MissingListLevel {
                            rule: key.clone(),
                            style: style_name.clone(),
                        });
                    }
                } else if !styles.contains(style_name) {
                    errors.push(ConfigError::DanglingStyle {
                        reference: key.clone(),
                        style: style_name.clone(),
                    });
                }
            }
            MappingValue::Block(block) => {
                let named = [
                    &block.panel_border_style,
                    &block.panel_title_style,
                    &block.content_style,
                    &block.guide_style,
                ];
                for style_name in named.into_iter().flatten() {
                    if !styles.contains(style_name) {
                        errors.push(ConfigError::DanglingStyle {
                            reference: key.clone(),
                            style: style_name.clone(),
                        });
                    }
                }
                if key == "list_block" && block.guide_style.is_none() {
                    errors.push(ConfigError::MissingGuideStyle);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(CompiledConfig {
            rules,
            mapping,
            styles,
        })
    } else {
        Err(ConfigReport { errors })
    }
}
