//! `mdtint`: pipe markdown-ish text through configurable terminal styling.
//!
//! Reads stdin in one gulp, runs it through the render engine, and prints
//! the result. Configuration lives in three JSON files under the config
//! directory and is created with defaults on first run.

mod config;
mod highlight;
mod render;

use std::io::{IsTerminal, Read};

use anyhow::{bail, Context, Result};
use clap::Parser;

use mdtint_render::{compile_and_validate, process, Diagnostics, ProcessOptions};

#[derive(Debug, Parser)]
#[command(name = "mdtint", version, about = "Apply styles to piped text")]
struct Args {
    /// Configuration directory.
    #[arg(long, default_value = "~/.config/mdtint")]
    config_dir: String,

    /// Verbose diagnostics on stderr.
    #[arg(long)]
    debug: bool,

    /// Keep original markdown block characters.
    #[arg(long)]
    keep_markup: bool,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();

    if std::io::stdin().is_terminal() {
        bail!("stdin is a terminal; usage: <command> | mdtint [--config-dir <path>] [--debug] [--keep-markup]");
    }

    let dir = config::expand_config_dir(&args.config_dir)?;
    let loaded = config::load_or_create(&dir, args.debug)?;

    let mut diag = Diagnostics::new();
    let cfg = compile_and_validate(&loaded.rules, loaded.mapping, &loaded.styles, &mut diag)
        .map_err(|report| anyhow::anyhow!("{report}"))?;

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("reading stdin")?;

    let opts = ProcessOptions {
        keep_markup: args.keep_markup,
        ..Default::default()
    };
    let highlighter = highlight::SyntectHighlighter::new();
    let (requests, run_diag) = process(&input, &cfg, &highlighter, opts);
    diag.extend(run_diag);

    render::render(&requests, std::io::stdout().lock()).context("writing output")?;

    if args.debug {
        for d in diag.deduped() {
            eprintln!("DEBUG: {}", d.message);
        }
    }

    Ok(())
}
