//! Syntect-backed code block highlighting.
//!
//! Syntax and theme sets are loaded once per process; an unrecognized
//! language reports the block as unsupported so the engine falls back to a
//! flat content-styled body.

use std::sync::LazyLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style as SyntectStyle, ThemeSet};
use syntect::parsing::SyntaxSet;

use mdtint_render::{ColorDef, Fragment, ResolvedStyle, SyntaxHighlighter};

static SYNTAXES: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEMES: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const FALLBACK_THEME: &str = "base16-ocean.dark";

pub struct SyntectHighlighter;

impl SyntectHighlighter {
    pub fn new() -> Self {
        SyntectHighlighter
    }
}

impl SyntaxHighlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, language: &str, theme: &str) -> Option<Vec<Vec<Fragment>>> {
        let syntax = SYNTAXES.find_syntax_by_token(language)?;
        let theme_name = match theme {
            "" | "default" => FALLBACK_THEME,
            other => other,
        };
        let theme = THEMES
            .themes
            .get(theme_name)
            .or_else(|| THEMES.themes.get(FALLBACK_THEME))?;

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut body = Vec::new();
        for line in code.lines() {
            let ranges = highlighter.highlight_line(line, &SYNTAXES).ok()?;
            let frags = ranges
                .into_iter()
                .filter(|(_, text)| !text.is_empty())
                .map(|(style, text)| Fragment::new(text, convert(style)))
                .collect();
            body.push(frags);
        }
        Some(body)
    }
}

fn convert(style: SyntectStyle) -> ResolvedStyle {
    ResolvedStyle {
        bold: style.font_style.contains(FontStyle::BOLD),
        italic: style.font_style.contains(FontStyle::ITALIC),
        underline: style.font_style.contains(FontStyle::UNDERLINE),
        fg: Some(ColorDef::Rgb(
            style.foreground.r,
            style.foreground.g,
            style.foreground.b,
        )),
        ..Default::default()
    }
}
