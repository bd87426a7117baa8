use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tabconv::convert::markdown::write_markdown;
use tabconv::{pipeline, ConvertError, ConverterConfig, FormatValidator, ReadBack};

/// Validate tabular files and convert them between formats
#[derive(Parser)]
#[command(name = "tabconv")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Configuration file path (JSON)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Output formats
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    /// CSV (Comma-Separated Values)
    Csv,
    /// JSON records
    Json,
    /// XML rows
    Xml,
    /// Excel workbook
    Xlsx,
    /// HTML table
    Html,
    /// Markdown pipe table
    Md,
    /// LaTeX tabular
    Tex,
}

impl From<Format> for tabconv::Format {
    fn from(format: Format) -> Self {
        match format {
            Format::Csv => tabconv::Format::Csv,
            Format::Json => tabconv::Format::Json,
            Format::Xml => tabconv::Format::Xml,
            Format::Xlsx => tabconv::Format::Xlsx,
            Format::Html => tabconv::Format::Html,
            Format::Md => tabconv::Format::Markdown,
            Format::Tex => tabconv::Format::Tex,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a file's content matches its extension
    Validate {
        /// Input file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Convert a file and print the result
    Show {
        /// Input file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value = "md")]
        format: Format,
    },

    /// Convert a file and write the result to another file
    Export {
        /// Input file
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output format; must match the suffix of the output file
        #[arg(short, long, value_enum)]
        format: Format,

        /// Output file
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(config_path) => load_config(config_path)?,
        None => ConverterConfig::default(),
    };

    match cli.command {
        Commands::Validate { input } => validate_command(&input, cli.quiet),
        Commands::Show { input, format } => show_command(&input, format.into(), &config),
        Commands::Export {
            input,
            format,
            output,
        } => export_command(&input, format.into(), &output, &config, cli.quiet),
    }
}

/// Set up logging based on verbosity flags. `RUST_LOG` takes precedence.
fn setup_logging(verbose: bool, quiet: bool) {
    let level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Load configuration from a JSON file
fn load_config(path: &Path) -> Result<ConverterConfig> {
    let config = ConverterConfig::from_json_file(path)
        .map_err(|e| map_convert_error(e, "Loading configuration"))
        .with_context(|| format!("Failed to load config file: {}", path.display()))?;
    log::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Execute the validate command
fn validate_command(input: &Path, quiet: bool) -> Result<()> {
    let name = input.to_string_lossy();
    let extension = tabconv::extract_extension(&name).map_err(|e| map_convert_error(e, "Validation"))?;
    let verdict = FormatValidator::new()
        .verdict(&extension, input)
        .map_err(|e| map_convert_error(e, "Validation"))?;

    match verdict.into_error(&name) {
        None => {
            if !quiet {
                println!("valid: {}", name);
            }
            Ok(())
        }
        Some(reason) => {
            println!("invalid: {}", reason);
            anyhow::bail!("{} failed validation", name)
        }
    }
}

/// Execute the show command
fn show_command(input: &Path, format: tabconv::Format, config: &ConverterConfig) -> Result<()> {
    let shown = match pipeline::show(input, format, config) {
        Ok(shown) => shown,
        Err(e) if e.is_empty_input() => {
            log::warn!("{}", e);
            println!("no data");
            return Ok(());
        }
        Err(e) => return Err(map_convert_error(e, "Conversion")),
    };

    let text = match shown {
        ReadBack::Text(text) => text,
        ReadBack::Table(data) => write_markdown(&data),
    };
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", text).context("Failed to write to stdout")?;
    stdout.flush().context("Failed to flush stdout")?;
    Ok(())
}

/// Execute the export command
fn export_command(
    input: &Path,
    format: tabconv::Format,
    output: &Path,
    config: &ConverterConfig,
    quiet: bool,
) -> Result<()> {
    let data = match pipeline::load_file(input, &FormatValidator::new(), config) {
        Ok(data) => data,
        Err(e) if e.is_empty_input() => {
            log::warn!("{}", e);
            if !quiet {
                println!("no data");
            }
            return Ok(());
        }
        Err(e) => return Err(map_convert_error(e, "Loading")),
    };

    pipeline::export_file(Some(&data), format, output, config)
        .map_err(|e| map_convert_error(e, "Export"))?;

    if !quiet {
        eprintln!(
            "Exported {} rows to {} as {}",
            data.row_count,
            output.display(),
            format
        );
    }
    Ok(())
}

/// Map ConvertError to anyhow::Error with context
fn map_convert_error(error: ConvertError, context: &str) -> anyhow::Error {
    match error {
        ConvertError::NoExtensionFound { name } => {
            anyhow::anyhow!("{}: no file extension found in '{}'", context, name)
        }
        ConvertError::UnsupportedExtension { extension } => {
            anyhow::anyhow!(
                "{}: unsupported extension '{}' (expected one of csv, json, xml, xlsx, html)",
                context,
                extension
            )
        }
        ConvertError::InvalidMimeType {
            file,
            guessed,
            expected,
        } => {
            anyhow::anyhow!(
                "{}: '{}' looks like {}, expected {}",
                context,
                file,
                guessed.as_deref().unwrap_or("an unknown type"),
                expected.join(" or ")
            )
        }
        ConvertError::CsvStructureInvalid { file, reason } => {
            anyhow::anyhow!("{}: '{}' is not valid CSV: {}", context, file, reason)
        }
        ConvertError::FormatMismatch { expected, found } => {
            anyhow::anyhow!(
                "{}: Incorrect export format. Expected {}, got {}.",
                context,
                expected,
                found
            )
        }
        ConvertError::ConfigError(msg) => {
            anyhow::anyhow!("{}: invalid configuration: {}", context, msg)
        }
        ConvertError::Io(e) => anyhow::Error::new(e).context(format!("{}: I/O error", context)),
        other => anyhow::anyhow!("{}: {}", context, other),
    }
}
