//! The configuration store.
//!
//! Three JSON documents under one directory, created with embedded defaults
//! on first run:
//!
//! - `detection.json`: ordered map of rule name to regex pattern
//! - `mapping.json`: rule name to style name or block mapping object
//! - `styles.json`: style name to attribute string or `{attributes,
//!   transform}` object
//!
//! Invalid JSON is fatal and names the offending file; declaration order of
//! the detection document is preserved because it decides the generic tier's
//! precedence.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;

use mdtint_render::{StyleDef, StyleMapping};

const DETECTION_FILE: &str = "detection.json";
const MAPPING_FILE: &str = "mapping.json";
const STYLES_FILE: &str = "styles.json";

/// The three raw documents, parsed but not yet validated.
#[derive(Debug)]
pub struct LoadedConfig {
    pub rules: Vec<(String, String)>,
    pub mapping: StyleMapping,
    pub styles: BTreeMap<String, StyleDef>,
}

/// Expands a leading `~/` against `$HOME`.
pub fn expand_config_dir(raw: &str) -> Result<PathBuf> {
    if let Some(rest) = raw.strip_prefix("~/") {
        let home = std::env::var_os("HOME").context("HOME is not set, pass --config-dir")?;
        return Ok(PathBuf::from(home).join(rest));
    }
    Ok(PathBuf::from(raw))
}

/// Loads the three documents, writing defaults for any that are missing.
pub fn load_or_create(dir: &Path, debug: bool) -> Result<LoadedConfig> {
    fs::create_dir_all(dir)
        .with_context(|| format!("creating config directory {}", dir.display()))?;

    let detection = load_or_write(dir, DETECTION_FILE, default_detection(), debug)?;
    let mapping_doc = load_or_write(dir, MAPPING_FILE, default_mapping(), debug)?;
    let styles_doc = load_or_write(dir, STYLES_FILE, default_styles(), debug)?;

    let rules = detection_pairs(&detection)?;
    let mapping: StyleMapping = serde_json::from_value(mapping_doc)
        .with_context(|| format!("invalid structure in {}", MAPPING_FILE))?;
    let styles: BTreeMap<String, StyleDef> = serde_json::from_value(styles_doc)
        .with_context(|| format!("invalid structure in {}", STYLES_FILE))?;

    Ok(LoadedConfig {
        rules,
        mapping,
        styles,
    })
}

fn load_or_write(dir: &Path, name: &str, default: Value, debug: bool) -> Result<Value> {
    let path = dir.join(name);
    if !path.exists() {
        if debug {
            eprintln!("DEBUG: creating default config file {}", path.display());
        }
        let pretty = serde_json::to_string_pretty(&default)?;
        fs::write(&path, pretty).with_context(|| format!("writing {}", path.display()))?;
        return Ok(default);
    }
    let text =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("invalid JSON in {} (fix or delete the file)", path.display()))
}

/// Flattens the detection document to ordered pairs.
fn detection_pairs(doc: &Value) -> Result<Vec<(String, String)>> {
    let Some(map) = doc.as_object() else {
        bail!("{} must be a JSON object of name to pattern", DETECTION_FILE);
    };
    let mut pairs = Vec::with_capacity(map.len());
    for (name, pattern) in map {
        let Some(pattern) = pattern.as_str() else {
            bail!("{}: rule '{}' must map to a pattern string", DETECTION_FILE, name);
        };
        pairs.push((name.clone(), pattern.to_string()));
    }
    Ok(pairs)
}

fn default_detection() -> Value {
    serde_json::json!({
        "code_block_fence": r"^\s*```(\w*)",
        "blockquote_start": r"^\s*>",
        "header_numbered": r"^\*\*(\d+)\.\s+(.*?)\*\*$",
        "header1": r"^#\s+(.*)",
        "header2": r"^##\s+(.*)",
        "header3": r"^###\s+(.*)",
        "list_item_bullet": r"^(\s*)[-*+]\s+(.*)",
        "list_item_numbered": r"^(\s*)\d+\.\s+(.*)",
        "horizontal_rule": r"^\s*([-*_]){3,}\s*$",
        "key_value_colon": r"^\s*([\w\s-]+?)\s*:\s+(.*)",
        "inline_bold_star": r"(?P<bold_star>\*\*(?P<content_bold_star>.*?)\*\*)",
        "inline_bold_under": r"(?P<bold_under>__(?P<content_bold_under>.*?)__)",
        "inline_italic_star": r"(?P<italic_star>\*(?P<content_italic_star>.*?)\*)",
        "inline_italic_under": r"(?P<italic_under>_(?P<content_italic_under>.*?)_)",
        "inline_code": r"(?P<code>`(?P<content_code>.*?)`)",
    })
}

fn default_mapping() -> Value {
    serde_json::json!({
        "code_block": {
            "panel_border_style": "style_code_panel_border",
            "panel_title_style": "style_code_panel_title",
            "syntax_theme": "default",
        },
        "blockquote": {
            "panel_border_style": "style_quote_panel_border",
            "content_style": "style_blockquote_content",
        },
        "list_block": { "guide_style": "style_list_guide" },
        "header_numbered": "style_header_numbered",
        "header1": "style_header1",
        "header2": "style_header2",
        "header3": "style_header3",
        "horizontal_rule": "style_hr",
        "key_value_colon": "style_key_value_line",
        "list_item_bullet": "style_list_level",
        "list_item_numbered": "style_list_level",
        "default_text": "style_default",
    })
}

fn default_styles() -> Value {
    serde_json::json!({
        "style_code_panel_border": "dim blue",
        "style_code_panel_title": "italic blue",
        "style_quote_panel_border": "dim yellow",
        "style_blockquote_content": "italic yellow",
        "style_list_guide": "dim cyan",

        "style_header_numbered": "bold magenta",
        "style_header1": "bold bright_blue underline",
        "style_header2": "bold blue",
        "style_header3": "bold cyan",
        "style_hr": "dim",
        "style_key_value_line": "default",

        "style_list_level0": "green",
        "style_list_level1": "light_sea_green",
        "style_list_level2": "medium_spring_green",
        "style_list_level3": "spring_green1",

        // Bold text brightens whatever color the surrounding line has
        // instead of overriding it.
        "style_inline_bold": {
            "attributes": "bold",
            "transform": { "adjust_brightness": 1.25 },
        },
        "style_inline_italic": "italic",
        "style_inline_code": "bright_black on grey30",

        "style_default": "tan",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdtint_render::{compile_and_validate, Diagnostics};

    #[test]
    fn first_run_creates_all_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_or_create(dir.path(), false).unwrap();

        for name in [DETECTION_FILE, MAPPING_FILE, STYLES_FILE] {
            assert!(dir.path().join(name).exists(), "{} missing", name);
        }
        assert!(!loaded.rules.is_empty());
        assert!(loaded.styles.contains_key("style_default"));
    }

    #[test]
    fn defaults_survive_validation() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_or_create(dir.path(), false).unwrap();
        let mut diag = Diagnostics::new();
        let cfg = compile_and_validate(&loaded.rules, loaded.mapping, &loaded.styles, &mut diag)
            .expect("shipped defaults must validate");
        assert!(diag.is_empty(), "unexpected warnings: {:?}", diag.deduped());
        // The default style resolves through the mapping.
        assert!(cfg.default_style().fg.is_some());
    }

    #[test]
    fn detection_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let custom = serde_json::json!({
            "zeta_rule": "z",
            "alpha_rule": "a",
        });
        fs::write(
            dir.path().join(DETECTION_FILE),
            serde_json::to_string_pretty(&custom).unwrap(),
        )
        .unwrap();
        let loaded = load_or_create(dir.path(), false).unwrap();
        assert_eq!(loaded.rules[0].0, "zeta_rule");
        assert_eq!(loaded.rules[1].0, "alpha_rule");
    }

    #[test]
    fn invalid_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(STYLES_FILE), "{ not json").unwrap();
        let err = load_or_create(dir.path(), false).unwrap_err();
        assert!(format!("{:#}", err).contains(STYLES_FILE));
    }

    #[test]
    fn existing_files_are_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let custom = serde_json::json!({ "only_rule": "x+" });
        fs::write(
            dir.path().join(DETECTION_FILE),
            serde_json::to_string(&custom).unwrap(),
        )
        .unwrap();
        let loaded = load_or_create(dir.path(), false).unwrap();
        assert_eq!(loaded.rules.len(), 1);
        assert_eq!(loaded.rules[0].0, "only_rule");
    }

    #[test]
    fn tilde_expansion_uses_home() {
        std::env::set_var("HOME", "/tmp/home-test");
        let dir = expand_config_dir("~/.config/mdtint").unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/home-test/.config/mdtint"));
        let plain = expand_config_dir("/etc/mdtint").unwrap();
        assert_eq!(plain, PathBuf::from("/etc/mdtint"));
    }
}
