// src/main.rs
mod catalog;
mod extractors;
mod storage;
mod utils;

use catalog::{build_catalog, extract_records, ImagePolicy, PassThrough, PipelineConfig};
use chrono::NaiveDate;
use clap::Parser;
use extractors::section::DEFAULT_MAX_CHUNK_BYTES;
use std::path::PathBuf;
use storage::CatalogStore;
use utils::AppError;

/// Converts document markup into the project catalog JSON
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Converted markup of the source document (HTML subset)
    #[arg(short, long)]
    input: PathBuf,

    /// Image manifest: JSON array of {"src", "alt"} in document order
    #[arg(long)]
    images: Option<PathBuf>,

    /// Catalog output file
    #[arg(short, long, default_value = "public/projects.json")]
    output: PathBuf,

    /// Value recorded as metadata.source_file (defaults to the input path)
    #[arg(long)]
    source_name: Option<String>,

    /// Which images each project carries: all, per-chunk or none
    #[arg(long, default_value = "all")]
    image_policy: ImagePolicy,

    /// Processing date stamped on every project (YYYY-MM-DD, defaults to today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Maximum size of one project chunk in bytes (falls back to MAX_CHUNK_SIZE)
    #[arg(long)]
    max_chunk_size: Option<usize>,

    /// Debug mode - save an annotated copy of the markup next to the output
    #[arg(short, long)]
    debug: bool,
}

fn build_config(args: &Args) -> Result<PipelineConfig, AppError> {
    let max_chunk_bytes = match args.max_chunk_size {
        Some(size) => {
            tracing::debug!("Using max chunk size {} from command-line argument", size);
            size
        }
        None => match std::env::var("MAX_CHUNK_SIZE") {
            Ok(raw) => raw.trim().parse::<usize>().map_err(|e| {
                AppError::Config(format!("MAX_CHUNK_SIZE '{}' is not a byte count: {}", raw, e))
            })?,
            Err(_) => DEFAULT_MAX_CHUNK_BYTES,
        },
    };
    if max_chunk_bytes == 0 {
        return Err(AppError::Config("max chunk size must be greater than zero".to_string()));
    }

    let mut config = PipelineConfig {
        max_chunk_bytes,
        image_policy: args.image_policy,
        ..PipelineConfig::default()
    };
    if let Some(date) = args.date {
        config.processing_date = date;
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Parse CLI arguments and set up logging (reads RUST_LOG env var)
    let args = Args::parse();
    utils::logging::setup_logging(args.debug);
    tracing::info!("Starting ingestion for args: {:?}", args);

    let config = build_config(&args)?;
    let store = CatalogStore::new(&args.output);

    // 2. Read the converted document; a missing input aborts before any output is touched
    let document = storage::load_document(&args.input, args.images.as_deref()).await?;

    if args.debug {
        let debug_path = store.debug_markup_path();
        if let Err(e) = utils::html_debug::write_debug_html(
            &document.markup,
            &debug_path,
            &utils::html_debug::DEBUG_PATTERNS,
        )
        .await
        {
            tracing::warn!("Failed to create debug HTML: {}", e);
        }
    }

    // 3. Segment, extract, normalize and assemble
    let report = extract_records(&document, &config);
    tracing::info!("Parsed {} project(s)", report.records.len());

    // 4. Filter, validate and wrap in the catalog envelope
    let source_file = args
        .source_name
        .clone()
        .unwrap_or_else(|| args.input.display().to_string());
    let generated_at = chrono::Utc::now().to_rfc3339();
    let (catalog, rejected) = build_catalog(report.records, &PassThrough, &source_file, &generated_at);

    // 5. Write the catalog
    let path = store.save_catalog(&catalog).await?;

    tracing::info!(
        "Ingestion finished. Projects: {}, skipped chunks: {}, rejected records: {}",
        catalog.metadata.total_projects,
        report.skipped.len(),
        rejected.len()
    );
    for skipped in &report.skipped {
        tracing::warn!("Skipped project section {}: {}", skipped.ordinal, skipped.reason);
    }
    for record in &rejected {
        tracing::warn!("Rejected project '{}' ({}): {}", record.title, record.id, record.reason);
    }
    tracing::info!("Categories: {}", catalog.metadata.categories.join(", "));
    tracing::info!("Output: {}", path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults() {
        let args = Args::parse_from(["docx_catalog", "--input", "doc.html"]);
        assert_eq!(args.output, PathBuf::from("public/projects.json"));
        assert_eq!(args.image_policy, ImagePolicy::All);
        assert!(!args.debug);
    }

    #[test]
    fn config_takes_flags() {
        let args = Args::parse_from([
            "docx_catalog",
            "-i",
            "doc.html",
            "--image-policy",
            "per-chunk",
            "--date",
            "2024-02-29",
            "--max-chunk-size",
            "4096",
        ]);
        let config = build_config(&args).unwrap();
        assert_eq!(config.image_policy, ImagePolicy::PerChunk);
        assert_eq!(config.processing_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(config.max_chunk_bytes, 4096);
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        let args = Args::parse_from(["docx_catalog", "-i", "doc.html", "--max-chunk-size", "0"]);
        assert!(matches!(build_config(&args), Err(AppError::Config(_))));
    }

    #[test]
    fn bad_date_is_a_parse_error() {
        let result = Args::try_parse_from(["docx_catalog", "-i", "doc.html", "--date", "15/03/2024"]);
        assert!(result.is_err());
    }
}
