// src/catalog/pipeline.rs
use crate::catalog::anonymize::RecordFilter;
use crate::catalog::assembler::{assemble_record, ImagePolicy};
use crate::catalog::models::{Catalog, ExtractedRecord, RawDocument};
use crate::catalog::validate::validate_record;
use crate::extractors::{normalize, split_chunks, SectionExtractor};
use crate::extractors::section::DEFAULT_MAX_CHUNK_BYTES;
use crate::utils::error::ValidationError;
use chrono::NaiveDate;

/// Knobs for one ingestion run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_chunk_bytes: usize,
    pub image_policy: ImagePolicy,
    /// Stamped on every record as `date`.
    pub processing_date: NaiveDate,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chunk_bytes: DEFAULT_MAX_CHUNK_BYTES,
            image_policy: ImagePolicy::default(),
            processing_date: chrono::Utc::now().date_naive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedChunk {
    pub ordinal: usize, // 1-based
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct ExtractionReport {
    pub records: Vec<ExtractedRecord>,
    pub skipped: Vec<SkippedChunk>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedRecord {
    pub id: String,
    pub title: String,
    pub reason: ValidationError,
}

/// Runs segment → extract → normalize → assemble over the whole document.
///
/// Chunks are handled strictly in document order and the chunk position is
/// the index used for ids and default text. A chunk that fails extraction is
/// skipped and reported; the rest still come through.
pub fn extract_records(document: &RawDocument, config: &PipelineConfig) -> ExtractionReport {
    let extractor = SectionExtractor::new(config.max_chunk_bytes);
    let date = config.processing_date.format("%Y-%m-%d").to_string();
    let chunks = split_chunks(&document.markup);
    tracing::info!("Found {} project chunk(s)", chunks.len());

    let mut report = ExtractionReport::default();
    for chunk in &chunks {
        let ordinal = chunk.index + 1;
        let parsed = match extractor.extract(chunk) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Failed to parse project section {}: {}", ordinal, e);
                report.skipped.push(SkippedChunk { ordinal, reason: e.to_string() });
                continue;
            }
        };

        let title = parsed.title.unwrap_or_else(|| {
            tracing::debug!("Chunk {} has no title, using positional fallback", ordinal);
            format!("Project {}", ordinal)
        });
        if parsed.sections.is_empty() {
            tracing::debug!("Chunk {} has no labeled sections, every field uses its default", ordinal);
        }
        let fields = normalize(&title, &parsed.sections, chunk.index, &date);
        let images = config.image_policy.select(chunk, &document.images);

        if let Some(record) = assemble_record(fields, images, chunk.index) {
            tracing::info!("Parsed project: {} ({})", record.title, record.id);
            report.records.push(record);
        }
    }

    report
}

/// Applies the record filter, drops records that fail shape validation and
/// wraps the survivors in the catalog envelope.
pub fn build_catalog(
    records: Vec<ExtractedRecord>,
    filter: &dyn RecordFilter,
    source_file: &str,
    generated_at: &str,
) -> (Catalog, Vec<RejectedRecord>) {
    let mut accepted = Vec::with_capacity(records.len());
    let mut rejected = Vec::new();

    for record in records {
        let record = filter.apply(record);
        match validate_record(&record) {
            Ok(()) => accepted.push(record),
            Err(reason) => {
                tracing::error!("Invalid project structure: {} ({})", record.title, reason);
                rejected.push(RejectedRecord { id: record.id, title: record.title, reason });
            }
        }
    }

    (Catalog::new(accepted, source_file, generated_at), rejected)
}
