//! screen-cli: minimal demo binary for `core-render`.
//!
//! Reads a left prompt and a command line from stdin (one per line), renders
//! them once against the real terminal through `core_render::write`, and
//! exits. Carries no shell semantics of its own; it exists purely so the
//! renderer is exercisable standalone.

use anyhow::{Context, Result};
use clap::Parser;
use core_render::{CrosstermWriter, ScreenState, Style};
use core_terminal::TerminalCapabilities;
use std::io::{self, BufRead};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "screen-cli", version, about = "core-render demo binary")]
struct Args {
    /// Optional configuration file path (overrides discovery of `screen.toml`).
    #[arg(long = "config")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = core_config::load_from(args.config)?;

    let mut left_prompt = String::new();
    let mut commandline = String::new();
    let stdin = io::stdin();
    stdin
        .lock()
        .read_line(&mut left_prompt)
        .context("reading left prompt from stdin")?;
    stdin
        .lock()
        .read_line(&mut commandline)
        .context("reading command line from stdin")?;
    let left_prompt = left_prompt.trim_end_matches('\n');
    let commandline = commandline.trim_end_matches('\n');

    let caps = TerminalCapabilities::detect();
    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));

    let explicit_len = commandline.chars().count();
    let colors = vec![Style::NORMAL; explicit_len];
    let indent = vec![0usize; explicit_len];

    let mut screen = ScreenState::new();
    let mut writer = CrosstermWriter::new();

    core_render::write(
        &mut screen,
        &mut writer,
        &caps,
        &config,
        left_prompt,
        "",
        commandline,
        explicit_len,
        &colors,
        &indent,
        explicit_len,
        None,
        false,
        width,
        height as usize,
    )?;

    Ok(())
}
