// ccew-pdf: Render Certificate of Compliance for Electrical Work forms

use ccew_pdf::{DocumentBuilder, RenderConfig, RenderError, Strategy, SubmissionRecord};
use clap::Parser;
use serde_json::{Map, Value};
use std::io::Read;
use std::path::PathBuf;
use thiserror::Error;

/// Input path that means "read the record from stdin".
const STDIN_INPUT: &str = "-";

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Error, Debug)]
enum AppError {
    #[error("Failed to read submission {0}")]
    InputError(String),
    #[error("Failed to encode delivery payload: {0}")]
    PayloadError(String),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

// ============================================================================
// Data Structures
// ============================================================================

/// CLI Arguments
#[derive(Parser, Debug)]
#[command(author, version, about = "Render CCEW forms as PDF")]
struct Args {
    /// Submission record (JSON object). Repeat to merge; later files win. "-" reads stdin
    #[arg(short, long = "input", required = true)]
    input: Vec<String>,

    /// Render settings file (JSON); flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rendering strategy
    #[arg(short, long, value_enum, env = "CCEW_STRATEGY")]
    strategy: Option<Strategy>,

    /// Official template PDF (file path or URL), used by the overlay strategy
    #[arg(short, long, env = "CCEW_TEMPLATE")]
    template: Option<String>,

    /// Filename prefix (defaults to CCEW)
    #[arg(long, env = "CCEW_FILENAME_PREFIX")]
    prefix: Option<String>,

    /// Output file (defaults to {prefix}_{serial}.pdf in the output directory)
    #[arg(short, long, conflicts_with = "output_dir")]
    output: Option<PathBuf>,

    /// Directory for the derived filename (defaults to the current directory)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the JSON delivery payload to stdout instead of writing a file
    #[arg(long)]
    payload: bool,
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    let args = Args::parse();

    let config = build_config(&args)?;
    let record = load_record(&args.input)?;

    // Template problems surface here, before any page is drawn
    let builder = DocumentBuilder::from_config(&config)?;
    let document = builder.render(&record)?;

    if args.payload {
        let json = serde_json::to_string_pretty(&document.payload())
            .map_err(|e| AppError::PayloadError(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    let output_path = match args.output {
        Some(path) => path,
        None => args
            .output_dir
            .unwrap_or_else(|| PathBuf::from("."))
            .join(&document.filename),
    };
    std::fs::write(&output_path, &document.bytes)?;

    println!("✓ Generated: {}", output_path.display());
    println!("  Serial: {}", record.serial_no().as_deref().unwrap_or("(none)"));
    println!("  Strategy: {}", builder.strategy_name());
    println!("  Size: {} bytes", document.bytes.len());

    Ok(())
}

// ============================================================================
// Helper Functions
// ============================================================================

fn build_config(args: &Args) -> Result<RenderConfig, AppError> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)?,
        None => RenderConfig::default(),
    };

    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(template) = &args.template {
        config.template = Some(template.clone());
    }
    if let Some(prefix) = &args.prefix {
        config.filename_prefix = prefix.clone();
    }

    Ok(config)
}

/// Merge the input objects left to right into one record.
fn load_record(inputs: &[String]) -> Result<SubmissionRecord, AppError> {
    let mut merged = Map::new();
    for input in inputs {
        let content = if input == STDIN_INPUT {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| AppError::InputError(format!("from stdin: {}", e)))?;
            buffer
        } else {
            std::fs::read_to_string(input)
                .map_err(|e| AppError::InputError(format!("{}: {}", input, e)))?
        };

        let value: Value = serde_json::from_str(&content)
            .map_err(|e| AppError::InputError(format!("{}: invalid JSON: {}", input, e)))?;
        match value {
            Value::Object(fields) => merged.extend(fields),
            _ => {
                return Err(AppError::InputError(format!(
                    "{}: expected a JSON object",
                    input
                )))
            }
        }
    }
    Ok(SubmissionRecord::from(merged))
}
