// src/catalog/assembler.rs
use crate::catalog::models::{ExtractedRecord, ImageRef};
use crate::extractors::fields::NormalizedFields;
use crate::extractors::segment::RecordChunk;
use once_cell::sync::Lazy;
use scraper::{Html, Selector};
use std::str::FromStr;

const ID_BASE_MAX_CHARS: usize = 50;

static IMG_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("img[src]").expect("Failed to compile IMG_SELECTOR")
});

/// Which document images a record carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImagePolicy {
    /// Every record gets the whole document image list.
    #[default]
    All,
    /// Only images referenced by an `<img>` inside the record's own chunk.
    PerChunk,
    /// Records carry no images.
    Omit,
}

impl FromStr for ImagePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(ImagePolicy::All),
            "per-chunk" | "per_chunk" => Ok(ImagePolicy::PerChunk),
            "none" => Ok(ImagePolicy::Omit),
            other => Err(format!("unknown image policy '{}' (expected all, per-chunk or none)", other)),
        }
    }
}

impl ImagePolicy {
    /// Picks the images for one chunk, keeping document image order.
    pub fn select(self, chunk: &RecordChunk<'_>, document_images: &[ImageRef]) -> Vec<ImageRef> {
        match self {
            ImagePolicy::All => document_images.to_vec(),
            ImagePolicy::Omit => Vec::new(),
            ImagePolicy::PerChunk => {
                let fragment = Html::parse_fragment(chunk.markup);
                let referenced: Vec<&str> = fragment
                    .select(&IMG_SELECTOR)
                    .filter_map(|img| img.value().attr("src"))
                    .collect();
                document_images
                    .iter()
                    .filter(|image| referenced.contains(&image.src.as_str()))
                    .cloned()
                    .collect()
            }
        }
    }
}

/// Derives the stable record id from the title and the chunk position.
///
/// Lower-cases, keeps `[a-z0-9]` and whitespace, turns whitespace runs into
/// `-`, truncates to 50 characters and appends `-{index + 1}`.
pub fn derive_record_id(title: &str, index: usize) -> String {
    let kept: String = title
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace())
        .collect();

    let mut base = String::with_capacity(kept.len());
    let mut in_whitespace = false;
    for c in kept.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                base.push('-');
            }
            in_whitespace = true;
        } else {
            base.push(c);
            in_whitespace = false;
        }
    }

    let truncated: String = base.chars().take(ID_BASE_MAX_CHARS).collect();
    format!("{}-{}", truncated, index + 1)
}

/// Builds the final record. Returns `None` (and logs) when the title is empty.
pub fn assemble_record(fields: NormalizedFields, images: Vec<ImageRef>, index: usize) -> Option<ExtractedRecord> {
    if fields.title.trim().is_empty() {
        tracing::warn!("Rejecting chunk {}: empty title after fallback", index + 1);
        return None;
    }

    let id = derive_record_id(&fields.title, index);
    Some(ExtractedRecord {
        title: fields.title,
        client: fields.client,
        category: fields.category,
        summary: fields.summary,
        problem: fields.problem,
        approach: fields.approach,
        outcomes: fields.outcomes,
        tech_stack: fields.tech_stack,
        tags: fields.tags,
        images,
        date: fields.date,
        id,
    })
}
