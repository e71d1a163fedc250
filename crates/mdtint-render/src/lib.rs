//! Rule-driven styling engine for markdown-like text streams.
//!
//! `mdtint-render` turns lines of loosely markdown-shaped text into
//! [`RenderRequest`] values: styled fragment lines, bordered panels for
//! code blocks and quotes, horizontal rules, and list trees. What gets
//! detected and how it is colored is entirely configuration-driven: an
//! ordered set of named regex rules, a mapping from rule names to styles,
//! and a style table whose entries are attribute strings optionally paired
//! with an HSL color transform.
//!
//! The crate is a pure library: no I/O, no terminal access, no printing.
//! A front end supplies the configuration documents, feeds the text, and
//! draws the requests.
//!
//! # Example
//!
//! ```
//! use mdtint_render::{
//!     compile_and_validate, process, Diagnostics, NoHighlight, ProcessOptions, RenderRequest,
//! };
//!
//! let rules = vec![
//!     ("header1".to_string(), r"#\s+(?P<content>.*)".to_string()),
//! ];
//! let styles = serde_json::from_value(serde_json::json!({
//!     "default_text": "white",
//!     "style_h1": "bold cyan",
//! }))
//! .unwrap();
//! let mapping = serde_json::from_value(serde_json::json!({
//!     "header1": "style_h1",
//! }))
//! .unwrap();
//!
//! let mut diag = Diagnostics::new();
//! let cfg = compile_and_validate(&rules, mapping, &styles, &mut diag).unwrap();
//! let (requests, _diag) = process("# Hello", &cfg, &NoHighlight, ProcessOptions::default());
//!
//! assert!(matches!(requests[0], RenderRequest::StyledLine(_)));
//! ```

pub mod blocks;
pub mod color;
pub mod diagnostics;
pub mod error;
pub mod hsl;
pub mod inline;
pub mod list;
pub mod mapping;
pub mod rules;
pub mod style;
pub mod validate;

pub use blocks::{
    process, BlockKind, NoHighlight, Panel, ProcessOptions, Processor, RenderRequest,
    SyntaxHighlighter,
};
pub use color::ColorDef;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{ConfigError, ConfigReport, ListStructureError};
pub use hsl::TransformSpec;
pub use inline::{Fragment, InlineResolver};
pub use list::{ListBuilder, ListNode};
pub use mapping::{BlockMapping, MappingValue, StyleMapping};
pub use rules::{CompiledRule, RuleKind, RuleSet};
pub use style::{ResolvedStyle, StyleDef, StyleEntry, StyleTable};
pub use validate::{compile_and_validate, CompiledConfig};
