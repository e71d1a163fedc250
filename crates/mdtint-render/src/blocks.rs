//! The line-by-line block state machine.
//!
//! Lines are fed one at a time; at most one composite block (code fence,
//! blockquote, list) is open at any point, and opening a new one or hitting
//! a non-member line finalizes the previous block exactly once. The output
//! is a flat sequence of [`RenderRequest`] values for a renderer to draw;
//! the engine itself touches no terminal.
//!
//! Dispatch priority per line: fence toggles first, then (inside a code
//! block) verbatim buffering, then quote membership, then list membership,
//! then the single-line tiers (numbered header, headers, horizontal rule,
//! generic rules in declaration order, default).

use crate::diagnostics::Diagnostics;
use crate::inline::{Fragment, InlineResolver};
use crate::list::{indent_level, ListBuilder, ListNode};
use crate::rules::RuleKind;
use crate::style::ResolvedStyle;
use crate::validate::CompiledConfig;

/// What a composite panel holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Code,
    Quote,
}

/// A bordered panel: code block or blockquote.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    pub kind: BlockKind,
    /// Fragment lines; pre-styled by a highlighter or inline-resolved.
    pub body: Vec<Vec<Fragment>>,
    pub border_style: ResolvedStyle,
    pub title: Option<(String, ResolvedStyle)>,
    /// (vertical, horizontal) interior padding.
    pub padding: (usize, usize),
}

/// One unit of renderer work.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderRequest {
    /// A single line of styled fragments; empty means a blank line.
    StyledLine(Vec<Fragment>),
    Panel(Panel),
    /// A horizontal rule across the terminal width.
    Rule(ResolvedStyle),
    /// An assembled list tree. The root is the sentinel; its children are
    /// the top-level items.
    Tree { root: ListNode, guide: ResolvedStyle },
}

/// Capability seam for code block highlighting.
///
/// `None` means the language is unsupported and the caller falls back to a
/// flat content-styled body.
pub trait SyntaxHighlighter {
    fn highlight(&self, code: &str, language: &str, theme: &str) -> Option<Vec<Vec<Fragment>>>;
}

/// The null highlighter: everything is unsupported.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHighlight;

impl SyntaxHighlighter for NoHighlight {
    fn highlight(&self, _code: &str, _language: &str, _theme: &str) -> Option<Vec<Vec<Fragment>>> {
        None
    }
}

/// Processing options.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Style raw lines without stripping markup delimiters or markers.
    pub keep_markup: bool,
    /// Spaces per list nesting level.
    pub indent_width: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        ProcessOptions {
            keep_markup: false,
            indent_width: 2,
        }
    }
}

/// The open composite block, if any.
enum BlockState {
    None,
    Code { language: String, lines: Vec<String> },
    Quote { lines: Vec<String> },
    List { builder: ListBuilder, base: String },
}

/// The streaming processor. Owns all scan state; emits into an internal
/// request list collected by [`Processor::finish`].
pub struct Processor<'a> {
    cfg: &'a CompiledConfig,
    highlighter: &'a dyn SyntaxHighlighter,
    opts: ProcessOptions,
    resolver: InlineResolver,
    state: BlockState,
    out: Vec<RenderRequest>,
    diag: Diagnostics,
    default_style: ResolvedStyle,
}

impl<'a> Processor<'a> {
    pub fn new(
        cfg: &'a CompiledConfig,
        highlighter: &'a dyn SyntaxHighlighter,
        opts: ProcessOptions,
    ) -> Self {
        let mut diag = Diagnostics::new();
        let resolver = InlineResolver::new(&cfg.rules, &cfg.styles, &mut diag);
        let default_style = cfg.default_style();
        Processor {
            cfg,
            highlighter,
            opts,
            resolver,
            state: BlockState::None,
            out: Vec::new(),
            diag,
            default_style,
        }
    }

    /// Feeds one line (without its trailing newline).
    pub fn feed_line(&mut self, line: &str) {
        // Fence lines toggle the code block regardless of any other state.
        if let Some(fence) = self.cfg.rules.get(RuleKind::CodeFence) {
            if let Some(caps) = fence.match_line(line) {
                if matches!(self.state, BlockState::Code { .. }) {
                    self.flush_block();
                } else {
                    self.flush_block();
                    let language = caps
                        .get(1)
                        .map(|m| m.as_str().trim().to_string())
                        .unwrap_or_default();
                    self.state = BlockState::Code {
                        language,
                        lines: Vec::new(),
                    };
                }
                return;
            }
        }

        if let BlockState::Code { lines, .. } = &mut self.state {
            lines.push(line.to_string());
            return;
        }

        if self.feed_quote(line) {
            return;
        }
        if self.feed_list(line) {
            return;
        }

        self.flush_block();
        self.dispatch_plain(line);
    }

    /// Quote membership. Returns true when the line was consumed.
    fn feed_quote(&mut self, line: &str) -> bool {
        let Some(rule) = self.cfg.rules.get(RuleKind::BlockquoteStart) else {
            return false;
        };
        if rule.match_line(line).is_none() {
            if matches!(self.state, BlockState::Quote { .. }) {
                self.flush_block();
            }
            return false;
        }

        if !matches!(self.state, BlockState::Quote { .. }) {
            self.flush_block();
            self.state = BlockState::Quote { lines: Vec::new() };
        }
        if let BlockState::Quote { lines } = &mut self.state {
            lines.push(strip_quote_prefix(line).to_string());
        }
        true
    }

    /// List membership. Returns true when the line was consumed.
    fn feed_list(&mut self, line: &str) -> bool {
        let matched = [
            (RuleKind::ListBullet, 1usize),
            (RuleKind::ListNumbered, 2usize),
        ]
        .into_iter()
        .find_map(|(kind, pad)| {
            let rule = self.cfg.rules.get(kind)?;
            let caps = rule.match_line(line)?;
            let base = self.cfg.list_style_base(&rule.name)?.to_string();
            // Indent is whatever the pattern's first group captured, not the
            // line's raw leading whitespace.
            let leading = caps.get(1).map_or(0, |m| m.len());
            let content = captured_content(&caps, line).to_string();
            Some((pad, base, leading, content))
        });

        let Some((pad, base, leading, content)) = matched else {
            if matches!(self.state, BlockState::List { .. }) {
                self.flush_block();
            }
            return false;
        };

        if !matches!(self.state, BlockState::List { .. }) {
            self.flush_block();
            self.state = BlockState::List {
                builder: ListBuilder::new(),
                base: base.clone(),
            };
        }

        // The marker itself eats into the visual indent; padding the captured
        // width keeps single-space nesting steps on the right level.
        let level = indent_level(leading + pad, self.opts.indent_width);
        let style = self.cfg.list_level_style(&base, level);
        // Markup-keeping mode reproduces the whole item line, marker and
        // indent included; the tree still conveys depth on top of it.
        let text = if self.opts.keep_markup {
            line
        } else {
            content.as_str()
        };
        let label = self.resolver.resolve(text, &style, &mut self.diag);

        let insert_failed = match &mut self.state {
            BlockState::List { builder, .. } => builder.insert(level, label).is_err(),
            _ => false,
        };
        if insert_failed {
            self.diag.warn(
                "list-structure",
                "list nesting could not be reconstructed, dropping the block",
            );
            self.state = BlockState::None;
            self.dispatch_plain(line);
        }
        true
    }

    /// Single-line dispatch: headers, horizontal rule, generic tier, default.
    fn dispatch_plain(&mut self, line: &str) {
        let header_kinds = [
            RuleKind::HeaderNumbered,
            RuleKind::Header1,
            RuleKind::Header2,
            RuleKind::Header3,
        ];
        for kind in header_kinds {
            let Some(rule) = self.cfg.rules.get(kind) else {
                continue;
            };
            let Some(caps) = rule.match_line(line) else {
                continue;
            };
            let style = self
                .cfg
                .line_style(&rule.name)
                .unwrap_or_else(|| self.default_style.clone());
            let text: std::borrow::Cow<'_, str> = if self.opts.keep_markup {
                line.into()
            } else if kind == RuleKind::HeaderNumbered {
                // The pattern captures the number and the title separately;
                // the visible text puts the number back.
                match (caps.get(1), caps.get(2)) {
                    (Some(n), Some(title)) => {
                        format!("{}. {}", n.as_str(), title.as_str()).into()
                    }
                    _ => captured_content(&caps, line).into(),
                }
            } else {
                captured_content(&caps, line).into()
            };
            let frags = self.resolver.resolve(&text, &style, &mut self.diag);
            self.out.push(RenderRequest::StyledLine(frags));
            return;
        }

        if let Some(rule) = self.cfg.rules.get(RuleKind::HorizontalRule) {
            if rule.match_line(line).is_some() {
                let style = self
                    .cfg
                    .line_style(&rule.name)
                    .unwrap_or_else(|| self.default_style.clone());
                self.out.push(RenderRequest::Rule(style));
                return;
            }
        }

        for rule in self.cfg.rules.generic() {
            if rule.match_line(line).is_none() {
                continue;
            }
            // An unmapped generic rule does not claim the line.
            let Some(style) = self.cfg.line_style(&rule.name) else {
                continue;
            };
            let frags = self.resolver.resolve(line, &style, &mut self.diag);
            self.out.push(RenderRequest::StyledLine(frags));
            return;
        }

        let base = self.default_style.clone();
        let frags = self.resolver.resolve(line, &base, &mut self.diag);
        self.out.push(RenderRequest::StyledLine(frags));
    }

    /// Finalizes any open block and returns the collected requests.
    pub fn finish(mut self) -> (Vec<RenderRequest>, Diagnostics) {
        match &self.state {
            BlockState::Code { .. } => self.diag.warn(
                "unterminated-code",
                "input ended inside a code block, closing it",
            ),
            BlockState::Quote { .. } => self.diag.warn(
                "unterminated-quote",
                "input ended inside a blockquote, closing it",
            ),
            _ => {}
        }
        self.flush_block();
        (self.out, self.diag)
    }

    /// Emits the open block, if any, and returns to the empty state.
    fn flush_block(&mut self) {
        match std::mem::replace(&mut self.state, BlockState::None) {
            BlockState::None => {}
            BlockState::Code { language, lines } => self.emit_code_panel(language, lines),
            BlockState::Quote { lines } => self.emit_quote_panel(lines),
            BlockState::List { builder, .. } => self.emit_tree(builder),
        }
    }

    fn emit_code_panel(&mut self, language: String, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        let mapping = self.cfg.block_mapping("code_block").cloned().unwrap_or_default();
        let border_style = self.cfg.block_part_style(mapping.panel_border_style.as_deref());
        let content_style = self.cfg.block_part_style(mapping.content_style.as_deref());
        let padding = mapping.padding("code_block", &mut self.diag);
        let theme = mapping.syntax_theme.as_deref().unwrap_or("default");

        let has_language = !language.is_empty() && language != "default";
        let body = if has_language {
            self.highlighter
                .highlight(&lines.join("\n"), &language, theme)
        } else {
            None
        };
        let body = body.unwrap_or_else(|| {
            lines
                .iter()
                .map(|l| {
                    if l.is_empty() {
                        Vec::new()
                    } else {
                        vec![Fragment::new(l.as_str(), content_style.clone())]
                    }
                })
                .collect()
        });

        let title = has_language.then(|| {
            let title_style = self.cfg.block_part_style(mapping.panel_title_style.as_deref());
            (language, title_style)
        });

        self.out.push(RenderRequest::Panel(Panel {
            kind: BlockKind::Code,
            body,
            border_style,
            title,
            padding,
        }));
    }

    fn emit_quote_panel(&mut self, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        let mapping = self.cfg.block_mapping("blockquote").cloned().unwrap_or_default();
        let border_style = self.cfg.block_part_style(mapping.panel_border_style.as_deref());
        let content_style = self.cfg.block_part_style(mapping.content_style.as_deref());
        let padding = mapping.padding("blockquote", &mut self.diag);

        // Inline markup may span the buffered lines only line-by-line, but
        // resolving the joined text keeps one scan and the splitter
        // restores line boundaries afterwards.
        let joined = lines.join("\n");
        let frags = self.resolver.resolve(&joined, &content_style, &mut self.diag);
        let body = split_fragments_into_lines(frags, lines.len());

        self.out.push(RenderRequest::Panel(Panel {
            kind: BlockKind::Quote,
            body,
            border_style,
            title: None,
            padding,
        }));
    }

    fn emit_tree(&mut self, builder: ListBuilder) {
        let guide = self
            .cfg
            .block_mapping("list_block")
            .and_then(|m| m.guide_style.as_deref().map(str::to_string))
            .and_then(|name| self.cfg.styles.materialize(&name))
            .unwrap_or_else(|| self.default_style.clone());
        match builder.finish() {
            Ok(root) => {
                if !root.children.is_empty() {
                    self.out.push(RenderRequest::Tree { root, guide });
                }
            }
            Err(_) => self.diag.warn(
                "list-structure",
                "list nesting could not be reconstructed, dropping the block",
            ),
        }
    }
}

/// One-shot processing of a full text.
pub fn process(
    text: &str,
    cfg: &CompiledConfig,
    highlighter: &dyn SyntaxHighlighter,
    opts: ProcessOptions,
) -> (Vec<RenderRequest>, Diagnostics) {
    let mut processor = Processor::new(cfg, highlighter, opts);
    for line in text.lines() {
        processor.feed_line(line);
    }
    processor.finish()
}

/// The text a rule captured, preferring a `content` named group, then the
/// last positional group, then the whole line.
fn captured_content<'t>(caps: &regex::Captures<'t>, line: &'t str) -> &'t str {
    if let Some(m) = caps.name("content") {
        return m.as_str();
    }
    (1..caps.len())
        .rev()
        .find_map(|i| caps.get(i))
        .map(|m| m.as_str())
        .unwrap_or(line)
}

/// Drops the `>` quote marker and at most one following space.
fn strip_quote_prefix(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.strip_prefix('>') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

/// Splits a fragment run on embedded newlines back into per-line runs.
fn split_fragments_into_lines(frags: Vec<Fragment>, line_hint: usize) -> Vec<Vec<Fragment>> {
    let mut lines: Vec<Vec<Fragment>> = Vec::with_capacity(line_hint);
    let mut current: Vec<Fragment> = Vec::new();

    for frag in frags {
        let mut parts = frag.text.split('\n');
        if let Some(first) = parts.next() {
            if !first.is_empty() {
                current.push(Fragment::new(first, frag.style.clone()));
            }
        }
        for part in parts {
            lines.push(std::mem::take(&mut current));
            if !part.is_empty() {
                current.push(Fragment::new(part, frag.style.clone()));
            }
        }
    }
    lines.push(current);
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::StyleDef;
    use crate::validate::compile_and_validate;
    use std::collections::BTreeMap;

    fn test_config() -> CompiledConfig {
        let rules: Vec<(String, String)> = [
            ("code_block_fence", r"\s*```(\w*)"),
            ("blockquote_start", r"\s*>"),
            ("header1", r"#\s+(?P<content>.*)"),
            ("header2", r"##\s+(?P<content>.*)"),
            ("horizontal_rule", r"(-{3,}|={3,})\s*$"),
            ("list_item_bullet", r"(\s*)[-*+]\s+(.*)"),
            ("list_item_numbered", r"(\s*)\d+\.\s+(.*)"),
            ("key_value_colon", r"\s*[\w-]+:\s"),
            ("inline_code", r"(?P<code>`(?P<content_code>[^`]+)`)"),
            (
                "inline_bold_star",
                r"(?P<bold_star>\*\*(?P<content_bold_star>.*?)\*\*)",
            ),
            (
                "inline_italic_star",
                r"(?P<italic_star>\*(?P<content_italic_star>[^*]+)\*)",
            ),
        ]
        .iter()
        .map(|(n, p)| (n.to_string(), p.to_string()))
        .collect();

        let styles: BTreeMap<String, StyleDef> = serde_json::from_value(serde_json::json!({
            "default_text": "white",
            "style_h1": "bold cyan",
            "style_h2": "bold blue",
            "style_hr": "dim",
            "style_kv": "green",
            "style_list0": "yellow",
            "style_list1": "tan",
            "style_guide": "grey30",
            "style_code_border": "dim",
            "style_code_content": "white",
            "style_code_title": "bold",
            "style_quote_border": "dim",
            "style_quote_content": "italic",
            "style_inline_code": "tan",
            "style_inline_bold": "bold yellow",
        }))
        .unwrap();

        let mapping = serde_json::from_value(serde_json::json!({
            "header1": "style_h1",
            "header2": "style_h2",
            "horizontal_rule": "style_hr",
            "key_value_colon": "style_kv",
            "list_item_bullet": "style_list",
            "list_item_numbered": "style_list",
            "list_block": { "guide_style": "style_guide" },
            "code_block": {
                "panel_border_style": "style_code_border",
                "content_style": "style_code_content",
                "panel_title_style": "style_code_title",
            },
            "blockquote": {
                "panel_border_style": "style_quote_border",
                "content_style": "style_quote_content",
                "panel_padding": [0, 1],
            },
        }))
        .unwrap();

        let mut diag = Diagnostics::new();
        compile_and_validate(&rules, mapping, &styles, &mut diag).unwrap()
    }

    fn run(text: &str) -> (Vec<RenderRequest>, Diagnostics) {
        process(text, &test_config(), &NoHighlight, ProcessOptions::default())
    }

    fn line_text(req: &RenderRequest) -> String {
        match req {
            RenderRequest::StyledLine(frags) => {
                frags.iter().map(|f| f.text.as_str()).collect()
            }
            _ => panic!("expected styled line, got {:?}", req),
        }
    }

    // =========================================================================
    // Line dispatch
    // =========================================================================

    #[test]
    fn header_strips_marker_and_styles_content() {
        let (out, diag) = run("# Deploy notes");
        assert!(diag.is_empty());
        assert_eq!(out.len(), 1);
        assert_eq!(line_text(&out[0]), "Deploy notes");
        let RenderRequest::StyledLine(frags) = &out[0] else {
            unreachable!()
        };
        assert!(frags[0].style.bold);
    }

    #[test]
    fn header2_wins_over_header1_prefix() {
        // "#" also prefix-matches "## x"; the more specific tier is tried
        // in numbered/h1/h2/h3 order, so h1's pattern must not swallow h2.
        let (out, _) = run("## Section");
        // header1 pattern "#\s+" requires whitespace after #, so "## Section"
        // falls to header2.
        assert_eq!(line_text(&out[0]), "Section");
    }

    #[test]
    fn horizontal_rule_emits_rule_request() {
        let (out, _) = run("----");
        assert!(matches!(out[0], RenderRequest::Rule(_)));
    }

    #[test]
    fn generic_rule_styles_whole_line() {
        let (out, _) = run("status: green");
        assert_eq!(line_text(&out[0]), "status: green");
        let RenderRequest::StyledLine(frags) = &out[0] else {
            unreachable!()
        };
        assert_eq!(
            frags[0].style.fg,
            Some(crate::color::ColorDef::parse("green").unwrap())
        );
    }

    #[test]
    fn plain_line_gets_default_style_with_inline() {
        let (out, _) = run("see `cmd` for details");
        let texts = line_text(&out[0]);
        assert_eq!(texts, "see cmd for details");
    }

    #[test]
    fn blank_line_is_empty_styled_line() {
        let (out, _) = run("one\n\ntwo");
        assert_eq!(out.len(), 3);
        assert!(matches!(&out[1], RenderRequest::StyledLine(f) if f.is_empty()));
    }

    #[test]
    fn keep_markup_styles_raw_line() {
        let opts = ProcessOptions {
            keep_markup: true,
            ..Default::default()
        };
        let (out, _) = process("# Title", &test_config(), &NoHighlight, opts);
        assert_eq!(line_text(&out[0]), "# Title");
    }

    // =========================================================================
    // Code blocks
    // =========================================================================

    #[test]
    fn fenced_code_becomes_panel_with_title() {
        let (out, diag) = run("```rust\nfn main() {}\nlet x = 1;\n```\nafter");
        assert!(diag.is_empty());
        assert_eq!(out.len(), 2);
        let RenderRequest::Panel(panel) = &out[0] else {
            panic!("expected panel");
        };
        assert_eq!(panel.kind, BlockKind::Code);
        assert_eq!(panel.body.len(), 2);
        assert_eq!(panel.body[0][0].text, "fn main() {}");
        assert_eq!(panel.title.as_ref().map(|(t, _)| t.as_str()), Some("rust"));
        assert_eq!(line_text(&out[1]), "after");
    }

    #[test]
    fn code_body_is_verbatim() {
        let (out, _) = run("```\n# not a header\n**not bold**\n```");
        let RenderRequest::Panel(panel) = &out[0] else {
            panic!("expected panel");
        };
        assert_eq!(panel.body[0][0].text, "# not a header");
        assert_eq!(panel.body[1][0].text, "**not bold**");
        assert!(panel.title.is_none());
    }

    #[test]
    fn empty_code_block_emits_nothing() {
        let (out, _) = run("```\n```");
        assert!(out.is_empty());
    }

    #[test]
    fn unterminated_code_block_closes_with_diagnostic() {
        let (out, diag) = run("```python\nprint('hi')");
        assert_eq!(out.len(), 1);
        assert!(matches!(&out[0], RenderRequest::Panel(p) if p.kind == BlockKind::Code));
        assert!(diag
            .deduped()
            .iter()
            .any(|d| d.key == "unterminated-code"));
    }

    #[test]
    fn highlighter_output_is_used_when_offered() {
        struct Fixed;
        impl SyntaxHighlighter for Fixed {
            fn highlight(
                &self,
                _code: &str,
                _language: &str,
                _theme: &str,
            ) -> Option<Vec<Vec<Fragment>>> {
                Some(vec![vec![Fragment::new("HIGHLIGHTED", ResolvedStyle::plain())]])
            }
        }
        let (out, _) = process(
            "```rust\ncode\n```",
            &test_config(),
            &Fixed,
            ProcessOptions::default(),
        );
        let RenderRequest::Panel(panel) = &out[0] else {
            panic!("expected panel");
        };
        assert_eq!(panel.body[0][0].text, "HIGHLIGHTED");
    }

    // =========================================================================
    // Blockquotes
    // =========================================================================

    #[test]
    fn quote_lines_buffer_into_one_panel() {
        let (out, _) = run("> first\n> second\nafter");
        assert_eq!(out.len(), 2);
        let RenderRequest::Panel(panel) = &out[0] else {
            panic!("expected panel");
        };
        assert_eq!(panel.kind, BlockKind::Quote);
        assert_eq!(panel.body.len(), 2);
        assert_eq!(panel.body[0][0].text, "first");
        assert_eq!(panel.body[1][0].text, "second");
    }

    #[test]
    fn quote_content_is_inline_resolved() {
        let (out, _) = run("> said **loudly**");
        let RenderRequest::Panel(panel) = &out[0] else {
            panic!("expected panel");
        };
        let texts: Vec<_> = panel.body[0].iter().map(|f| f.text.as_str()).collect();
        assert_eq!(texts, ["said ", "loudly"]);
        assert!(panel.body[0][1].style.bold);
        // Quote content style carries through to the unmatched span.
        assert!(panel.body[0][0].style.italic);
    }

    #[test]
    fn unterminated_quote_closes_with_diagnostic() {
        let (out, diag) = run("> trailing");
        assert_eq!(out.len(), 1);
        assert!(diag.deduped().iter().any(|d| d.key == "unterminated-quote"));
    }

    // =========================================================================
    // Lists
    // =========================================================================

    #[test]
    fn list_lines_assemble_into_tree() {
        let (out, _) = run("- a\n  - a1\n- b\nafter");
        assert_eq!(out.len(), 2);
        let RenderRequest::Tree { root, .. } = &out[0] else {
            panic!("expected tree");
        };
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].label[0].text, "a");
        assert_eq!(root.children[0].children[0].label[0].text, "a1");
        assert_eq!(root.children[1].label[0].text, "b");
    }

    #[test]
    fn numbered_and_bullet_items_share_a_block() {
        let (out, _) = run("1. first\n- second");
        assert_eq!(out.len(), 1);
        let RenderRequest::Tree { root, .. } = &out[0] else {
            panic!("expected tree");
        };
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn list_levels_take_family_styles() {
        let (out, _) = run("- top\n  - nested");
        let RenderRequest::Tree { root, .. } = &out[0] else {
            panic!("expected tree");
        };
        let top = &root.children[0];
        assert_eq!(
            top.label[0].style.fg,
            Some(crate::color::ColorDef::parse("yellow").unwrap())
        );
        assert_eq!(
            top.children[0].label[0].style.fg,
            Some(crate::color::ColorDef::parse("tan").unwrap())
        );
    }

    #[test]
    fn list_items_resolve_inline_markup() {
        let (out, _) = run("- install `cargo`");
        let RenderRequest::Tree { root, .. } = &out[0] else {
            panic!("expected tree");
        };
        let texts: Vec<_> = root.children[0]
            .label
            .iter()
            .map(|f| f.text.as_str())
            .collect();
        assert_eq!(texts, ["install ", "cargo"]);
    }

    #[test]
    fn list_level_reads_the_captured_indent_group() {
        // A pattern whose indent group deliberately excludes tabs: a
        // tab-prefixed item still nests at the level its *captured* indent
        // says, whatever the raw leading whitespace looks like.
        let rules: Vec<(String, String)> = vec![(
            "list_item_bullet".to_string(),
            r"\t*( *)[-*+]\s+(.*)".to_string(),
        )];
        let styles: BTreeMap<String, StyleDef> = serde_json::from_value(serde_json::json!({
            "default_text": "white",
            "style_list0": "yellow",
        }))
        .unwrap();
        let mapping = serde_json::from_value(serde_json::json!({
            "list_item_bullet": "style_list",
        }))
        .unwrap();
        let mut diag = Diagnostics::new();
        let cfg = compile_and_validate(&rules, mapping, &styles, &mut diag).unwrap();

        let (out, _) = process("- a\n\t- b", &cfg, &NoHighlight, ProcessOptions::default());
        let RenderRequest::Tree { root, .. } = &out[0] else {
            panic!("expected tree");
        };
        // Both items captured zero indent, so they are siblings.
        assert_eq!(root.children.len(), 2);
        assert!(root.children[0].children.is_empty());
    }

    #[test]
    fn list_ends_at_end_of_input() {
        let (out, diag) = run("- only item");
        assert_eq!(out.len(), 1);
        assert!(matches!(out[0], RenderRequest::Tree { .. }));
        // Lists have no closing delimiter, so this is not a diagnostic.
        assert!(diag.is_empty());
    }

    // =========================================================================
    // Block transitions
    // =========================================================================

    #[test]
    fn new_block_finalizes_previous() {
        let (out, _) = run("> quoted\n- item");
        assert_eq!(out.len(), 2);
        assert!(matches!(&out[0], RenderRequest::Panel(p) if p.kind == BlockKind::Quote));
        assert!(matches!(out[1], RenderRequest::Tree { .. }));
    }

    #[test]
    fn fence_inside_quote_switches_blocks() {
        let (out, _) = run("> quote\n```\ncode\n```");
        assert_eq!(out.len(), 2);
        assert!(matches!(&out[0], RenderRequest::Panel(p) if p.kind == BlockKind::Quote));
        assert!(matches!(&out[1], RenderRequest::Panel(p) if p.kind == BlockKind::Code));
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    #[test]
    fn quote_prefix_stripping() {
        assert_eq!(strip_quote_prefix("> text"), "text");
        assert_eq!(strip_quote_prefix(">text"), "text");
        assert_eq!(strip_quote_prefix("  > text"), "text");
        assert_eq!(strip_quote_prefix(">  double"), " double");
        assert_eq!(strip_quote_prefix("no marker"), "no marker");
    }

    #[test]
    fn fragment_line_splitting() {
        let frags = vec![
            Fragment::new("a\nb", ResolvedStyle::plain()),
            Fragment::new(" tail", ResolvedStyle::plain()),
        ];
        let lines = split_fragments_into_lines(frags, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0][0].text, "a");
        assert_eq!(lines[1][0].text, "b");
        assert_eq!(lines[1][1].text, " tail");
    }
}
