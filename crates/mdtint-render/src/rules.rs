//! Detection rules: named regexes with a closed structural classification.
//!
//! The detection document is an ordered list of `(name, pattern)` pairs.
//! Names the engine gives structural meaning to are classified into
//! [`RuleKind`] variants once, at compile time; everything else is a
//! generic line rule matched in declaration order.

use regex::{Captures, Regex};

/// Structural classification of a detection rule.
///
/// Closed set: matching on this enum is exhaustive, so forgetting to handle
/// a structural rule somewhere is a compile error rather than a silent
/// string mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    CodeFence,
    BlockquoteStart,
    ListBullet,
    ListNumbered,
    HeaderNumbered,
    Header1,
    Header2,
    Header3,
    HorizontalRule,
    InlineCode,
    InlineBoldStar,
    InlineBoldUnder,
    InlineItalicStar,
    InlineItalicUnder,
    /// Any rule name without structural meaning; styled whole-line.
    Generic,
}

impl RuleKind {
    /// Classifies a rule by its configured name.
    pub fn from_name(name: &str) -> Self {
        match name {
            "code_block_fence" => RuleKind::CodeFence,
            "blockquote_start" => RuleKind::BlockquoteStart,
            "list_item_bullet" => RuleKind::ListBullet,
            "list_item_numbered" => RuleKind::ListNumbered,
            "header_numbered" => RuleKind::HeaderNumbered,
            "header1" => RuleKind::Header1,
            "header2" => RuleKind::Header2,
            "header3" => RuleKind::Header3,
            "horizontal_rule" => RuleKind::HorizontalRule,
            "inline_code" => RuleKind::InlineCode,
            "inline_bold_star" => RuleKind::InlineBoldStar,
            "inline_bold_under" => RuleKind::InlineBoldUnder,
            "inline_italic_star" => RuleKind::InlineItalicStar,
            "inline_italic_under" => RuleKind::InlineItalicUnder,
            _ => RuleKind::Generic,
        }
    }

    /// Whether this rule participates in inline span resolution rather than
    /// line dispatch.
    pub fn is_inline(self) -> bool {
        self.inline_group().is_some()
    }

    /// The capture group name this inline rule fires under in the combined
    /// alternation, and the content group `content_<name>` derives from it.
    pub fn inline_group(self) -> Option<&'static str> {
        match self {
            RuleKind::InlineCode => Some("code"),
            RuleKind::InlineBoldStar => Some("bold_star"),
            RuleKind::InlineBoldUnder => Some("bold_under"),
            RuleKind::InlineItalicStar => Some("italic_star"),
            RuleKind::InlineItalicUnder => Some("italic_under"),
            _ => None,
        }
    }
}

/// Fixed precedence for the combined inline alternation.
///
/// Code first so backticked text shields its contents from emphasis rules,
/// then the two-character delimiters before the one-character ones.
pub const INLINE_ORDER: [RuleKind; 5] = [
    RuleKind::InlineCode,
    RuleKind::InlineBoldStar,
    RuleKind::InlineBoldUnder,
    RuleKind::InlineItalicStar,
    RuleKind::InlineItalicUnder,
];

/// One compiled detection rule.
///
/// A rule whose pattern failed to compile keeps its slot (so validation can
/// report every failure in one pass) but never matches.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub name: String,
    pub kind: RuleKind,
    pub pattern: String,
    pub regex: Option<Regex>,
    pub error: Option<String>,
}

impl CompiledRule {
    pub fn compile(name: &str, pattern: &str) -> Self {
        let (regex, error) = match Regex::new(pattern) {
            Ok(re) => (Some(re), None),
            Err(e) => (None, Some(e.to_string())),
        };
        CompiledRule {
            name: name.to_string(),
            kind: RuleKind::from_name(name),
            pattern: pattern.to_string(),
            regex,
            error,
        }
    }

    /// Matches the rule against the start of a line.
    ///
    /// Line rules anchor at the beginning of the input; a match elsewhere
    /// in the line does not count.
    pub fn match_line<'t>(&self, line: &'t str) -> Option<Captures<'t>> {
        let caps = self.regex.as_ref()?.captures(line)?;
        if caps.get(0)?.start() == 0 {
            Some(caps)
        } else {
            None
        }
    }
}

/// The full compiled rule list, in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<CompiledRule>,
}

impl RuleSet {
    pub fn compile(raw: &[(String, String)]) -> Self {
        RuleSet {
            rules: raw
                .iter()
                .map(|(name, pattern)| CompiledRule::compile(name, pattern))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter()
    }

    /// First rule of a given structural kind.
    pub fn get(&self, kind: RuleKind) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.kind == kind)
    }

    pub fn by_name(&self, name: &str) -> Option<&CompiledRule> {
        self.rules.iter().find(|r| r.name == name)
    }

    /// Generic line rules in declaration order.
    pub fn generic(&self) -> impl Iterator<Item = &CompiledRule> {
        self.rules.iter().filter(|r| r.kind == RuleKind::Generic)
    }

    /// Inline rules in their fixed precedence order, skipping any that are
    /// not configured or failed to compile.
    pub fn inline(&self) -> impl Iterator<Item = &CompiledRule> + '_ {
        INLINE_ORDER
            .iter()
            .filter_map(|kind| self.get(*kind))
            .filter(|r| r.regex.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(n, p)| (n.to_string(), p.to_string()))
            .collect()
    }

    // =========================================================================
    // Classification
    // =========================================================================

    #[test]
    fn known_names_classify() {
        assert_eq!(RuleKind::from_name("code_block_fence"), RuleKind::CodeFence);
        assert_eq!(RuleKind::from_name("header1"), RuleKind::Header1);
        assert_eq!(
            RuleKind::from_name("list_item_numbered"),
            RuleKind::ListNumbered
        );
    }

    #[test]
    fn unknown_names_are_generic() {
        assert_eq!(RuleKind::from_name("key_value_colon"), RuleKind::Generic);
        assert_eq!(RuleKind::from_name("shout_line"), RuleKind::Generic);
    }

    #[test]
    fn inline_kinds_carry_group_names() {
        assert_eq!(RuleKind::InlineCode.inline_group(), Some("code"));
        assert_eq!(RuleKind::InlineBoldStar.inline_group(), Some("bold_star"));
        assert!(RuleKind::Header1.inline_group().is_none());
        assert!(RuleKind::InlineItalicUnder.is_inline());
        assert!(!RuleKind::Generic.is_inline());
    }

    // =========================================================================
    // Compilation and matching
    // =========================================================================

    #[test]
    fn bad_pattern_keeps_slot() {
        let rule = CompiledRule::compile("header1", "(unclosed");
        assert!(rule.regex.is_none());
        assert!(rule.error.is_some());
        assert!(rule.match_line("# hi").is_none());
    }

    #[test]
    fn match_anchors_at_line_start() {
        let rule = CompiledRule::compile("header1", r"#\s+(.*)");
        assert!(rule.match_line("# title").is_some());
        assert!(rule.match_line("  # not at start").is_none());
    }

    #[test]
    fn generic_iteration_preserves_order() {
        let set = RuleSet::compile(&raw(&[
            ("header1", r"#\s"),
            ("shout_line", r"[A-Z ]+$"),
            ("key_value_colon", r"\w+:"),
        ]));
        let names: Vec<_> = set.generic().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["shout_line", "key_value_colon"]);
    }

    #[test]
    fn inline_iteration_is_fixed_order() {
        let set = RuleSet::compile(&raw(&[
            ("inline_italic_star", r"\*[^*]+\*"),
            ("inline_code", r"`[^`]+`"),
            ("inline_bold_star", r"\*\*.+?\*\*"),
        ]));
        let names: Vec<_> = set.inline().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["inline_code", "inline_bold_star", "inline_italic_star"]);
    }
}
