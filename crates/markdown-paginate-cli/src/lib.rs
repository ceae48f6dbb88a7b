use std::fs;
use std::io::{self, Read, Write};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use markdown_paginate::{paginate_cards, Card};
use markdown_paginate_config::{Config, LoadOptions, OutputFormat};
use serde::Serialize;

/// Line printed between cards in plain output. Each one is a page break when
/// the output is paginated again.
const PLAIN_SEPARATOR: &str = "+++";

#[derive(Parser)]
#[command(name = "markdown-paginate", version, about, long_about = None)]
pub struct Cli {
    /// Maximum weight per card (overrides paginate.density)
    #[arg(short, long, value_name = "N")]
    density: Option<NonZeroUsize>,

    /// Output format (overrides output.format)
    #[arg(short, long, value_enum)]
    format: Option<FormatValue>,

    /// Directory for `files` output (overrides output.directory)
    #[arg(short, long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Explicit configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Raise log verbosity (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Path to markdown file, or `-` for stdin
    #[arg(value_name = "FILE")]
    path: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatValue {
    Plain,
    Json,
    Files,
}

impl From<FormatValue> for OutputFormat {
    fn from(value: FormatValue) -> Self {
        match value {
            FormatValue::Plain => OutputFormat::Plain,
            FormatValue::Json => OutputFormat::Json,
            FormatValue::Files => OutputFormat::Files,
        }
    }
}

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut options = LoadOptions::default();
    if let Some(path) = &cli.config {
        options = options.with_override_path(path);
    }
    let config = Config::load(options)?;

    let density = cli
        .density
        .map(NonZeroUsize::get)
        .unwrap_or(config.paginate.density);
    let format = cli
        .format
        .map(OutputFormat::from)
        .unwrap_or(config.output.format);

    let document = read_input(&cli.path)?;
    let document = document.trim();
    if document.is_empty() {
        bail!("no content in {}", describe_input(&cli.path));
    }

    let cards = paginate_cards(document, density);
    log::info!(
        "{} card{} at density {density}",
        cards.len(),
        if cards.len() == 1 { "" } else { "s" }
    );

    match format {
        OutputFormat::Plain => emit(&render_plain(&cards))?,
        OutputFormat::Json => emit(&render_json(&cards, density)?)?,
        OutputFormat::Files => {
            let directory = cli.out_dir.unwrap_or(config.output.directory);
            let written = write_cards(&cards, &directory, &config.output.extension)?;
            let listing: Vec<String> = written
                .iter()
                .map(|path| path.display().to_string())
                .collect();
            emit(&listing.join("\n"))?;
        }
    }

    Ok(0)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buffer = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut buffer)
            .context("Unable to read markdown from stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Unable to read markdown at path: {}", path.display()))
    }
}

fn describe_input(path: &Path) -> String {
    if path == Path::new("-") {
        "stdin".to_string()
    } else {
        path.display().to_string()
    }
}

fn render_plain(cards: &[Card]) -> String {
    let separator = format!("\n\n{PLAIN_SEPARATOR}\n\n");
    cards
        .iter()
        .map(|card| card.markdown.as_str())
        .collect::<Vec<_>>()
        .join(separator.as_str())
}

#[derive(Serialize)]
struct DeckReport<'a> {
    density: usize,
    total: usize,
    cards: Vec<CardReport<'a>>,
}

#[derive(Serialize)]
struct CardReport<'a> {
    number: usize,
    label: String,
    right_to_left: bool,
    markdown: &'a str,
}

fn render_json(cards: &[Card], density: usize) -> Result<String> {
    let report = DeckReport {
        density,
        total: cards.len(),
        cards: cards
            .iter()
            .map(|card| CardReport {
                number: card.number,
                label: card.label(),
                right_to_left: card.right_to_left,
                markdown: &card.markdown,
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report).context("Failed to serialize cards")
}

fn write_cards(cards: &[Card], directory: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(directory)
        .with_context(|| format!("Unable to create directory: {}", directory.display()))?;

    let mut written = Vec::with_capacity(cards.len());
    for card in cards {
        let path = directory.join(card.file_name(extension));
        let mut contents = card.markdown.clone();
        contents.push('\n');
        fs::write(&path, contents)
            .with_context(|| format!("Unable to write card: {}", path.display()))?;
        log::debug!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}

fn emit(rendered: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match writeln!(handle, "{rendered}") {
        Ok(_) => {}
        Err(err) if should_ignore_pipe_error(&err) => return Ok(()),
        Err(err) => return Err(err).context("Failed to print cards"),
    }

    match handle.flush() {
        Ok(_) => Ok(()),
        Err(err) if should_ignore_pipe_error(&err) => Ok(()),
        Err(err) => Err(err).context("Failed to flush stdout"),
    }
}

fn should_ignore_pipe_error(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe | io::ErrorKind::WouldBlock
    )
}
