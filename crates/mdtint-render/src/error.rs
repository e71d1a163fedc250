//! Error types for configuration compilation and block assembly.

use thiserror::Error;

/// A single configuration defect found during validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A detection rule's regex failed to compile.
    #[error("rule '{name}': invalid pattern: {message}")]
    BadPattern { name: String, message: String },

    /// A style attribute string failed to parse.
    #[error("style '{name}': {message}")]
    BadStyle { name: String, message: String },

    /// A mapping entry references a style the style table does not define.
    #[error("mapping '{reference}' points at undefined style '{style}'")]
    DanglingStyle { reference: String, style: String },

    /// No usable default text style.
    #[error("no default text style: map 'default_text' to a defined style or define one named 'default_text'")]
    MissingDefault,

    /// A list rule's base style family has no level-zero member.
    #[error("rule '{rule}': style family '{style}' has no level-0 entry '{style}0'")]
    MissingListLevel { rule: String, style: String },

    /// The `list_block` mapping names no guide style.
    #[error("mapping 'list_block' has no guide_style")]
    MissingGuideStyle,
}

/// Aggregate of every configuration error found in one validation pass.
///
/// Validation never stops at the first problem; a report with any entry
/// means the configuration is rejected as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigReport {
    pub errors: Vec<ConfigError>,
}

impl std::error::Error for ConfigReport {}

impl std::fmt::Display for ConfigReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} configuration error(s):", self.errors.len())?;
        for err in &self.errors {
            writeln!(f, "  - {}", err)?;
        }
        Ok(())
    }
}

/// The list node stack bottomed out while attaching an item.
///
/// Signals a structural impossibility in the indent bookkeeping; the caller
/// discards the current list block and re-dispatches the offending line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("list node stack underflow")]
pub struct ListStructureError;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lists_every_error() {
        let report = ConfigReport {
            errors: vec![
                ConfigError::MissingDefault,
                ConfigError::DanglingStyle {
                    reference: "header1".into(),
                    style: "style_h1".into(),
                },
            ],
        };
        let text = report.to_string();
        assert!(text.contains("2 configuration error(s)"));
        assert!(text.contains("default_text"));
        assert!(text.contains("style_h1"));
    }

    #[test]
    fn errors_implement_std_error() {
        fn takes_error(_: &dyn std::error::Error) {}
        takes_error(&ConfigError::MissingDefault);
        takes_error(&ConfigReport { errors: vec![] });
        takes_error(&ListStructureError);
    }
}
