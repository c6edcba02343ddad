use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand, ValueEnum};
use pdf_harvest::{
    ExtractOptions, ExtractionOutcome, ImageMode, PageSelection, extract_pdf, render_summary,
    write_table_artifacts, write_text_artifact,
};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "pdfharvest",
    version,
    about = "Extract text, tables, images, URLs and numbers from PDFs"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Extract all content and write artifacts into the output directory.
    Extract(ExtractArgs),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ImageModeArg {
    /// Raw embedded image bytes via the cross-reference table.
    Full,
    /// Metadata listing only; no image bytes are read or written.
    Light,
}

#[derive(Debug, Args)]
struct ExtractArgs {
    /// Input PDF path.
    #[arg(short, long)]
    input: PathBuf,

    /// Directory receiving all artifacts.
    #[arg(short, long, default_value = "extracted")]
    output_dir: PathBuf,

    /// Page selection like 1-3,5.
    #[arg(long)]
    pages: Option<String>,

    /// Image extraction strategy.
    #[arg(long, value_enum, default_value_t = ImageModeArg::Full)]
    image_mode: ImageModeArg,

    /// Do not persist image bytes; images are still measured in full mode.
    #[arg(long)]
    no_images: bool,

    /// Minimum cells required per candidate table row.
    #[arg(long, default_value_t = 2)]
    min_cols: usize,

    /// Output delimiter for table artifacts.
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Print the outcome as JSON instead of the text summary.
    #[arg(long)]
    json: bool,

    /// Enable verbose warning output.
    #[arg(short, long)]
    verbose: bool,
}

fn parse_options(args: &ExtractArgs) -> Result<ExtractOptions> {
    let pages = args
        .pages
        .as_deref()
        .map(PageSelection::from_str)
        .transpose()
        .map_err(|error| anyhow!("invalid page selection: {error}"))
        .context("failed to parse --pages")?;

    if !args.delimiter.is_ascii() {
        anyhow::bail!("delimiter must be a single ASCII character");
    }

    let image_mode = match args.image_mode {
        ImageModeArg::Full => ImageMode::FullFidelity,
        ImageModeArg::Light => ImageMode::Lightweight,
    };

    Ok(ExtractOptions {
        pages,
        image_mode,
        save_images: !args.no_images,
        image_dir: args.output_dir.join("images"),
        min_cols: args.min_cols,
    })
}

fn log_warnings(outcome: &ExtractionOutcome, verbose: bool) {
    if outcome.warnings.is_empty() {
        return;
    }

    eprintln!("warning: {} issue(s) detected", outcome.warnings.len());
    if verbose {
        for warning in &outcome.warnings {
            eprintln!(
                "  - {:?} page={:?} image={:?}: {}",
                warning.code, warning.page, warning.image_index, warning.message
            );
        }
    }
}

fn run_extract(args: &ExtractArgs) -> Result<ExtractionOutcome> {
    let options = parse_options(args)?;

    let outcome = extract_pdf(&args.input, &options)
        .with_context(|| format!("failed to extract content from '{}'", args.input.display()))?;

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory '{}'",
            args.output_dir.display()
        )
    })?;

    write_text_artifact(&outcome.result, &args.output_dir.join("extracted_text.txt"))
        .context("failed to write text artifact")?;
    #[allow(clippy::cast_possible_truncation)]
    write_table_artifacts(
        &outcome.result,
        &args.output_dir.join("tables"),
        args.delimiter as u8,
    )
    .context("failed to write table artifacts")?;

    Ok(outcome)
}

fn main() -> ExitCode {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("pdf_harvest=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => match run_extract(&args) {
            Ok(outcome) => {
                log_warnings(&outcome, args.verbose);
                if args.json {
                    match serde_json::to_string_pretty(&outcome) {
                        Ok(json) => println!("{json}"),
                        Err(error) => {
                            eprintln!("error: failed to serialize outcome: {error}");
                            return ExitCode::from(1);
                        }
                    }
                } else {
                    print!("{}", render_summary(&outcome.result));
                }
                if outcome.result.is_empty() {
                    ExitCode::from(2)
                } else {
                    ExitCode::SUCCESS
                }
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                ExitCode::from(1)
            }
        },
    }
}
