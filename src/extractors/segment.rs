// src/extractors/segment.rs
use once_cell::sync::Lazy;
use regex::Regex;

// Opening marker of a level-1 heading; `\b` keeps `<h1x>`-style names out
static H1_OPEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<h1\b[^>]*>").expect("Failed to compile H1_OPEN_RE")
});

/// Markup belonging to one candidate record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordChunk<'a> {
    /// Zero-based position of the chunk in document order.
    pub index: usize,
    /// Byte offset of `markup` inside the full document.
    pub offset: usize,
    pub markup: &'a str,
}

/// Splits the document at every `<h1>` opening marker.
///
/// Anything before the first heading is preamble and is dropped. The last
/// chunk runs to the end of the document. No headings means no chunks.
pub fn split_chunks(markup: &str) -> Vec<RecordChunk<'_>> {
    let markers: Vec<(usize, usize)> = H1_OPEN_RE
        .find_iter(markup)
        .map(|m| (m.start(), m.end()))
        .collect();

    let chunks: Vec<RecordChunk> = markers
        .iter()
        .enumerate()
        .map(|(index, &(_, body_start))| {
            let body_end = markers
                .get(index + 1)
                .map_or(markup.len(), |&(next_start, _)| next_start);
            RecordChunk {
                index,
                offset: body_start,
                markup: &markup[body_start..body_end],
            }
        })
        .collect();

    match markers.first() {
        Some(&(first, _)) if first > 0 => {
            tracing::debug!("Discarding {} bytes of preamble before the first heading", first)
        }
        None => tracing::warn!("No level-1 headings found; document yields no records"),
        _ => {}
    }

    chunks
}
