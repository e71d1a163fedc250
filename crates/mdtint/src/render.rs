//! Terminal output for render requests.
//!
//! Draws styled lines, rounded-corner panels, horizontal rules sized to the
//! terminal, and list trees with box-drawing guides. All styling goes
//! through `console::Style`, so color support detection and NO_COLOR are
//! handled by the console crate.

use std::io::Write;

use unicode_width::UnicodeWidthStr;

use mdtint_render::{Fragment, ListNode, Panel, RenderRequest, ResolvedStyle};

const FALLBACK_WIDTH: usize = 80;

pub fn render(requests: &[RenderRequest], mut out: impl Write) -> std::io::Result<()> {
    let width = terminal_width();
    for request in requests {
        match request {
            RenderRequest::StyledLine(frags) => writeln!(out, "{}", styled_run(frags))?,
            RenderRequest::Rule(style) => {
                let bar = "\u{2500}".repeat(width);
                writeln!(out, "{}", style.to_console_style().apply_to(bar))?;
            }
            RenderRequest::Panel(panel) => render_panel(&mut out, panel)?,
            RenderRequest::Tree { root, guide } => render_tree(&mut out, root, guide)?,
        }
    }
    Ok(())
}

fn terminal_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(FALLBACK_WIDTH)
}

fn styled_run(frags: &[Fragment]) -> String {
    frags
        .iter()
        .map(|f| f.style.to_console_style().apply_to(&f.text).to_string())
        .collect()
}

fn visible_width(frags: &[Fragment]) -> usize {
    frags.iter().map(|f| f.text.width()).sum()
}

fn render_panel(out: &mut impl Write, panel: &Panel) -> std::io::Result<()> {
    let (pad_y, pad_x) = panel.padding;
    let content_width = panel.body.iter().map(|l| visible_width(l)).max().unwrap_or(0);
    let inner = content_width + 2 * pad_x;
    let border = panel.border_style.to_console_style();

    // Top border, with the title woven in when present.
    match &panel.title {
        Some((title, title_style)) => {
            let title_width = title.width();
            // "╭─ title ─...─╮": the leading dash, two spaces, and the
            // title itself consume part of the run.
            let used = title_width + 3;
            let rest = inner.saturating_sub(used);
            writeln!(
                out,
                "{}{}{}{}",
                border.apply_to("\u{256d}\u{2500} "),
                title_style.to_console_style().apply_to(title),
                border.apply_to(format!(" {}", "\u{2500}".repeat(rest))),
                border.apply_to("\u{256e}"),
            )?;
        }
        None => writeln!(
            out,
            "{}",
            border.apply_to(format!("\u{256d}{}\u{256e}", "\u{2500}".repeat(inner)))
        )?,
    }

    let blank: Vec<Fragment> = Vec::new();
    let pad_lines = std::iter::repeat(&blank).take(pad_y);
    let body_lines = pad_lines
        .clone()
        .chain(panel.body.iter())
        .chain(std::iter::repeat(&blank).take(pad_y));
    for line in body_lines {
        let fill = content_width.saturating_sub(visible_width(line));
        writeln!(
            out,
            "{}{}{}{}{}{}",
            border.apply_to("\u{2502}"),
            " ".repeat(pad_x),
            styled_run(line),
            " ".repeat(fill),
            " ".repeat(pad_x),
            border.apply_to("\u{2502}"),
        )?;
    }

    writeln!(
        out,
        "{}",
        border.apply_to(format!("\u{2570}{}\u{256f}", "\u{2500}".repeat(inner)))
    )
}

fn render_tree(
    out: &mut impl Write,
    root: &ListNode,
    guide: &ResolvedStyle,
) -> std::io::Result<()> {
    render_children(out, root, "", guide)
}

fn render_children(
    out: &mut impl Write,
    node: &ListNode,
    prefix: &str,
    guide: &ResolvedStyle,
) -> std::io::Result<()> {
    let guide_style = guide.to_console_style();
    let count = node.children.len();
    for (i, child) in node.children.iter().enumerate() {
        let last = i + 1 == count;
        let connector = if last {
            "\u{2514}\u{2500}\u{2500} "
        } else {
            "\u{251c}\u{2500}\u{2500} "
        };
        writeln!(
            out,
            "{}{}{}",
            guide_style.apply_to(prefix),
            guide_style.apply_to(connector),
            styled_run(&child.label),
        )?;
        let child_prefix = format!("{}{}", prefix, if last { "    " } else { "\u{2502}   " });
        render_children(out, child, &child_prefix, guide)?;
    }
    Ok(())
}
