//! CLI tool for generating minimal PowerPoint and Excel packages.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use officegen_core::{decode_utf8, Command, CommandParser, DocumentKind, Row};
use officegen_opc::{Compression, PackageInspector};
use officegen_pptx::PresentationBuilder;
use officegen_xlsx::SpreadsheetBuilder;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Generate minimal .pptx and .xlsx files from text.
#[derive(Parser, Debug)]
#[command(name = "officegen")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Output file (default: a uniquely named file in --output-dir)
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Directory for generated files when --output is not given
    #[arg(long, global = true, default_value = ".")]
    output_dir: PathBuf,

    /// Write the package bytes to stdout instead of a file
    #[arg(long, global = true)]
    stdout: bool,

    /// Store entries without compression
    #[arg(long, global = true)]
    stored: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build a presentation, one slide per text
    Pptx {
        /// Slide text (repeatable)
        #[arg(short, long = "slide")]
        slides: Vec<String>,

        /// UTF-8 text file with one slide per non-blank line
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Build a spreadsheet with a single sheet
    Xlsx {
        /// Delimited row, e.g. "Name,Age" (repeatable)
        #[arg(short, long = "row")]
        rows: Vec<String>,

        /// UTF-8 text file with one delimited row per line
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// JSON file holding an array of string arrays
        #[arg(long, conflicts_with = "input")]
        json: Option<PathBuf>,

        /// Cell delimiter for --row and --input
        #[arg(short, long, default_value_t = ',')]
        delimiter: char,
    },

    /// Parse a free-text command such as "gerar excel dados: a,b|c,d"
    Run {
        /// The command text
        text: String,
    },

    /// List the parts and relationships of an existing package
    Inspect {
        /// Package file (.pptx or .xlsx)
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let compression = if args.stored {
        Compression::Stored
    } else {
        Compression::Deflated
    };

    let (kind, bytes) = match &args.command {
        Commands::Pptx { slides, input } => {
            let slides = collect_slides(slides, input.as_deref())?;
            (
                DocumentKind::Presentation,
                build_presentation(&slides, compression)?,
            )
        }
        Commands::Xlsx {
            rows,
            input,
            json,
            delimiter,
        } => {
            let rows = collect_rows(rows, input.as_deref(), json.as_deref(), *delimiter)?;
            (
                DocumentKind::Spreadsheet,
                build_spreadsheet(&rows, compression)?,
            )
        }
        Commands::Run { text } => {
            let command = CommandParser::new()
                .parse(text)
                .ok_or_else(|| anyhow::anyhow!("Not a generation command: {}", text))?;
            let kind = command.kind();
            let bytes = match command {
                Command::Presentation(slides) => build_presentation(&slides, compression)?,
                Command::Spreadsheet(rows) => build_spreadsheet(&rows, compression)?,
            };
            (kind, bytes)
        }
        Commands::Inspect { file } => return inspect(file, args.verbose),
    };

    if args.verbose {
        eprintln!("Generated {} bytes ({})", bytes.len(), kind.mime_type());
    }

    if args.stdout {
        std::io::stdout()
            .write_all(&bytes)
            .context("Failed to write package to stdout")?;
        return Ok(());
    }

    let path = match &args.output {
        Some(path) => {
            write_output(path, &bytes)?;
            path.clone()
        }
        None => write_unique_output(&args.output_dir, kind, &bytes)?,
    };
    println!("{}", path.display());

    Ok(())
}

fn build_presentation<S: AsRef<str>>(slides: &[S], compression: Compression) -> Result<Vec<u8>> {
    PresentationBuilder::new()
        .with_compression(compression)
        .build(slides)
        .context("Failed to build presentation")
}

fn build_spreadsheet(rows: &[Row], compression: Compression) -> Result<Vec<u8>> {
    SpreadsheetBuilder::new()
        .with_compression(compression)
        .build(rows)
        .context("Failed to build spreadsheet")
}

/// Slides from flags first, then from the input file.
fn collect_slides(flags: &[String], input: Option<&Path>) -> Result<Vec<String>> {
    let mut slides = flags.to_vec();
    if let Some(path) = input {
        let text = read_text(path)?;
        slides.extend(
            text.lines()
                .filter(|line| !line.trim().is_empty())
                .map(str::to_string),
        );
    }
    Ok(slides)
}

/// Rows from flags first, then from the input or JSON file.
fn collect_rows(
    flags: &[String],
    input: Option<&Path>,
    json: Option<&Path>,
    delimiter: char,
) -> Result<Vec<Row>> {
    let mut rows: Vec<Row> = flags
        .iter()
        .map(|line| Row::from_delimited(line, delimiter))
        .collect();

    if let Some(path) = input {
        let text = read_text(path)?;
        rows.extend(text.lines().map(|line| Row::from_delimited(line, delimiter)));
    }

    if let Some(path) = json {
        let text = read_text(path)?;
        let grid: Vec<Vec<String>> = serde_json::from_str(&text)
            .with_context(|| format!("Invalid JSON grid in {}", path.display()))?;
        rows.extend(grid.into_iter().map(Row::new));
    }

    Ok(rows)
}

/// Read a file as strict UTF-8.
fn read_text(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    decode_utf8(&bytes).with_context(|| format!("Failed to decode {}", path.display()))
}

/// Print the entries and relationships of a package.
fn inspect(path: &Path, verbose: bool) -> Result<()> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let mut inspector = PackageInspector::new(&bytes)
        .with_context(|| format!("Not a package: {}", path.display()))?;

    match package_kind(path) {
        Some(kind) if verbose => println!("# {}", kind.mime_type()),
        Some(_) => {}
        None => log::warn!("{} has neither a .pptx nor an .xlsx extension", path.display()),
    }

    for name in inspector.entry_names()? {
        println!("{}", name);
        if verbose && name.ends_with(".rels") {
            for rel in inspector.relationships(&name)? {
                println!("  {} -> {} ({})", rel.id, rel.target, rel.rel_type);
            }
        }
    }

    Ok(())
}

/// Document kind implied by a file's extension.
fn package_kind(path: &Path) -> Option<DocumentKind> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(DocumentKind::from_extension)
}

/// Name for a generated file: `<prefix>_<uuid>.<ext>`.
fn unique_file_name(kind: DocumentKind) -> String {
    let prefix = match kind {
        DocumentKind::Presentation => "presentation",
        DocumentKind::Spreadsheet => "spreadsheet",
    };
    format!("{}_{}.{}", prefix, Uuid::new_v4(), kind.extension())
}

/// Write into a fresh, never-before-used file in `dir`.
fn write_unique_output(dir: &Path, kind: DocumentKind, bytes: &[u8]) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;

    let path = dir.join(unique_file_name(kind));
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(bytes)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(path)
}

/// Write output to a file.
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;

    file.write_all(bytes)
        .with_context(|| format!("Failed to write to {}", path.display()))?;

    Ok(())
}
