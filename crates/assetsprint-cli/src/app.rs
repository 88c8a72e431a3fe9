//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use assetsprint_ast::{AssetPackage, ContentBlock};
use assetsprint_core::{load_asset, translate, ExportFormat, Settings};
use assetsprint_pdf::{paginate, PageGeometry, PageKind};

use crate::export::{ensure_dir, ExportSession};
use crate::logging;

/// Formats selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    /// Paginated PDF
    Pdf,
    /// Flow-layout DOCX
    Docx,
    /// Plain text
    Txt,
    /// Every format
    All,
}

impl FormatArg {
    /// Formats this selection expands to
    pub fn formats(self) -> Vec<ExportFormat> {
        match self {
            Self::Pdf => vec![ExportFormat::Pdf],
            Self::Docx => vec![ExportFormat::Docx],
            Self::Txt => vec![ExportFormat::Txt],
            Self::All => ExportFormat::ALL.to_vec(),
        }
    }
}

/// Output format for inspection commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

#[derive(Parser)]
#[command(name = "assetsprint")]
#[command(author, version, about = "Ebook asset package compositor", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Export an asset package
    Export {
        /// Asset package JSON
        input: PathBuf,

        /// Format to export (defaults to the configured formats)
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output directory (defaults to the configured directory)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Settings file (defaults to ./assetsprint.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the translated content blocks of each chapter as JSON
    Blocks {
        /// Asset package JSON
        input: PathBuf,

        /// Only this chapter (zero-based)
        #[arg(long)]
        chapter: Option<usize>,
    },

    /// Print the computed PDF page layout
    Layout {
        /// Asset package JSON
        input: PathBuf,

        /// Output format (text or json)
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,

        /// Settings file (defaults to ./assetsprint.toml if present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Export {
            input,
            format,
            output,
            config,
        } => {
            let written =
                export_command(&input, format, output.as_deref(), config.as_deref())?;
            for path in written {
                println!("{}", path.display());
            }
        }
        Commands::Blocks { input, chapter } => {
            blocks_command(&input, chapter)?;
        }
        Commands::Layout {
            input,
            format,
            config,
        } => {
            layout_command(&input, format, config.as_deref())?;
        }
    }

    Ok(())
}

fn read_asset(input: &Path) -> Result<AssetPackage> {
    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    load_asset(input, Utc::now())
        .with_context(|| format!("Failed to load asset package: {}", input.display()))
}

fn read_settings(config: Option<&Path>) -> Result<Settings> {
    let cwd = std::env::current_dir().context("Failed to resolve working directory")?;
    Settings::discover(config, &cwd).context("Failed to load settings")
}

/// Execute the export command, returning the written files
pub fn export_command(
    input: &Path,
    format: Option<FormatArg>,
    output: Option<&Path>,
    config: Option<&Path>,
) -> Result<Vec<PathBuf>> {
    let asset = read_asset(input)?;
    let settings = read_settings(config)?;

    let formats = match format {
        Some(format) => format.formats(),
        None => settings.export.formats.clone(),
    };
    let dir = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| settings.export.output_dir.clone());
    ensure_dir(&dir)?;

    tracing::info!(
        "Exporting '{}' ({} chapters) as {}",
        asset.title,
        asset.chapters.len(),
        formats
            .iter()
            .map(ExportFormat::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let session = ExportSession::new();
    session
        .export_all(&asset, &settings, &formats, &dir)
        .with_context(|| format!("Export of '{}' failed", asset.title))
}

/// Translated blocks of one chapter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterBlocks {
    pub index: usize,
    pub title: String,
    pub blocks: Vec<ContentBlock>,
}

/// Translate every chapter, or only the one at `chapter`
pub fn chapter_blocks(asset: &AssetPackage, chapter: Option<usize>) -> Result<Vec<ChapterBlocks>> {
    if let Some(index) = chapter {
        if index >= asset.chapters.len() {
            anyhow::bail!(
                "Chapter {} out of range ({} chapters)",
                index,
                asset.chapters.len()
            );
        }
    }

    Ok(asset
        .chapters
        .iter()
        .enumerate()
        .filter(|(index, _)| chapter.map_or(true, |wanted| wanted == *index))
        .map(|(index, ch)| ChapterBlocks {
            index,
            title: ch.title.clone(),
            blocks: translate(&ch.content),
        })
        .collect())
}

/// Execute the blocks command
pub fn blocks_command(input: &Path, chapter: Option<usize>) -> Result<()> {
    let asset = read_asset(input)?;
    let chapters = chapter_blocks(&asset, chapter)?;
    println!("{}", serde_json::to_string_pretty(&chapters)?);
    Ok(())
}

/// Execute the layout command
pub fn layout_command(input: &Path, format: OutputFormat, config: Option<&Path>) -> Result<()> {
    let asset = read_asset(input)?;
    let settings = read_settings(config)?;
    let geometry =
        PageGeometry::from_settings(&settings.pdf).context("Invalid page geometry in settings")?;

    let layout = paginate(&asset, &geometry);

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&layout.summary())?);
        }
        OutputFormat::Text => {
            println!("{}: {} pages", asset.title, layout.page_count());
            for page in layout.summary() {
                let label = match (page.kind, page.number) {
                    (PageKind::Cover, _) => "cover".to_string(),
                    (PageKind::Content, Some(n)) => format!("page {}", n),
                    (PageKind::Content, None) => "page".to_string(),
                };
                println!();
                println!("[{}] {} ({} lines)", page.index + 1, label, page.lines.len());
                for line in page.lines {
                    println!("    {}", line);
                }
            }
        }
    }

    Ok(())
}
