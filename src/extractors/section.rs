// src/extractors/section.rs

// --- Imports ---
use crate::extractors::markup::{self, Token};
use crate::extractors::segment::RecordChunk;
use crate::utils::error::ExtractError;

// --- Constants ---
/// A colon-terminated paragraph counts as a label only below this length.
pub const SHORT_LABEL_MAX_CHARS: usize = 50;
pub const DEFAULT_MAX_CHUNK_BYTES: usize = 1024 * 1024;

const LABEL_RUN_TAGS: [&str; 2] = ["strong", "b"];

// --- Data Structures ---
/// Which detection pass produced a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelOrigin {
    LabelRun,
    LabelParagraph,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section<'a> {
    pub label: String,   // cleaned label as written, colon stripped
    pub content: &'a str, // raw markup following the label
    pub origin: LabelOrigin,
}

/// Labels mapped to their raw markup, in insertion order.
///
/// Keys compare case-insensitively and the first writer wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionMap<'a> {
    entries: Vec<Section<'a>>,
}

impl<'a> SectionMap<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts unless the label is already present. Returns whether it was inserted.
    pub fn insert_if_absent(&mut self, label: String, content: &'a str, origin: LabelOrigin) -> bool {
        if self.get(&label).is_some() {
            tracing::trace!("Label '{}' already captured, ignoring {:?} duplicate", label, origin);
            return false;
        }
        self.entries.push(Section { label, content, origin });
        true
    }

    pub fn get(&self, label: &str) -> Option<&Section<'a>> {
        let wanted = label.to_lowercase();
        self.entries.iter().find(|s| s.label.to_lowercase() == wanted)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section<'a>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Title and labeled sections found in one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSections<'a> {
    pub title: Option<String>,
    pub sections: SectionMap<'a>,
}

// --- Main Extractor Structure ---
pub struct SectionExtractor {
    max_chunk_bytes: usize,
}

impl Default for SectionExtractor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_BYTES)
    }
}

impl SectionExtractor {
    pub fn new(max_chunk_bytes: usize) -> Self {
        Self { max_chunk_bytes }
    }

    /// Extracts the title and labeled sections of a chunk.
    ///
    /// Label runs (`<strong>`/`<b>`) are collected first; colon-terminated
    /// paragraphs only fill labels the first pass did not see.
    pub fn extract<'a>(&self, chunk: &RecordChunk<'a>) -> Result<ChunkSections<'a>, ExtractError> {
        let size = chunk.markup.len();
        if size > self.max_chunk_bytes {
            return Err(ExtractError::ChunkTooLarge { size, limit: self.max_chunk_bytes });
        }

        let raw = chunk.markup;
        let title_end = raw.find('<').unwrap_or(raw.len());
        let title = Some(markup::clean_text(&raw[..title_end])).filter(|t| !t.is_empty());
        let body = &raw[title_end..];

        let tokens = markup::tokenize(body).map_err(|e| match e {
            ExtractError::MalformedMarkup { offset, reason } => ExtractError::MalformedMarkup {
                offset: chunk.offset + title_end + offset,
                reason,
            },
            other => other,
        })?;

        let mut sections = SectionMap::new();
        let from_runs = collect_label_runs(body, &tokens, &mut sections);
        let from_paragraphs = collect_label_paragraphs(body, &tokens, &mut sections);

        tracing::debug!(
            "Chunk {}: title {:?}, {} section(s) ({} label-run, {} paragraph)",
            chunk.index + 1,
            title,
            sections.len(),
            from_runs,
            from_paragraphs
        );

        Ok(ChunkSections { title, sections })
    }
}

/// Pass A: a bold run immediately closed (`<strong>Label:</strong>`) opens a
/// section that lasts until the next bold opening tag.
fn collect_label_runs<'a>(body: &'a str, tokens: &[Token], sections: &mut SectionMap<'a>) -> usize {
    let run_starts: Vec<usize> = tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.as_tag().map_or(false, |tag| tag.is_open(&LABEL_RUN_TAGS)))
        .map(|(i, _)| i)
        .collect();

    let mut inserted = 0;
    for (n, &i) in run_starts.iter().enumerate() {
        let (Some(Token::Text(text)), Some(Token::Tag(close))) = (tokens.get(i + 1), tokens.get(i + 2)) else {
            continue;
        };
        let open_name = tokens[i].as_tag().map(|t| t.name.as_str()).unwrap_or_default();
        if !close.is_close(open_name) {
            continue;
        }

        let label = strip_label_colon(&markup::clean_text(&body[text.clone()]));
        if label.is_empty() {
            continue;
        }

        let content_end = run_starts
            .get(n + 1)
            .map_or(body.len(), |&next| tokens[next].span().start);
        let after_label = &body[close.span.end..content_end];
        let content = after_label.trim_start_matches(|c: char| c == ':' || c.is_whitespace());

        if sections.insert_if_absent(label, content, LabelOrigin::LabelRun) {
            inserted += 1;
        }
    }
    inserted
}

/// Pass B: paragraph blocks; a short block ending in `:` labels the block after it.
fn collect_label_paragraphs<'a>(body: &'a str, tokens: &[Token], sections: &mut SectionMap<'a>) -> usize {
    let blocks = paragraph_blocks(body, tokens);

    let mut inserted = 0;
    for pair in blocks.windows(2) {
        let current = markup::clean_text(pair[0]);
        if !current.ends_with(':') || current.chars().count() >= SHORT_LABEL_MAX_CHARS {
            continue;
        }
        let label = strip_label_colon(&current);
        if label.is_empty() {
            continue;
        }
        if sections.insert_if_absent(label, pair[1], LabelOrigin::LabelParagraph) {
            inserted += 1;
        }
    }
    inserted
}

/// Raw markup between `<p>`/`</p>` tags, blank blocks dropped.
fn paragraph_blocks<'a>(body: &'a str, tokens: &[Token]) -> Vec<&'a str> {
    let mut blocks = Vec::new();
    let mut start = 0;
    for tag in tokens.iter().filter_map(Token::as_tag).filter(|t| t.name == "p") {
        blocks.push(&body[start..tag.span.start]);
        start = tag.span.end;
    }
    blocks.push(&body[start..]);
    blocks.retain(|b| !b.trim().is_empty());
    blocks
}

fn strip_label_colon(label: &str) -> String {
    label.trim_end_matches(':').trim().to_string()
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(markup: &str) -> RecordChunk<'_> {
        RecordChunk { index: 0, offset: 0, markup }
    }

    #[test]
    fn title_is_leading_text() {
        let extractor = SectionExtractor::default();
        let result = extractor.extract(&chunk("  Data &amp; Lake </h1><p>x</p>")).unwrap();
        assert_eq!(result.title.as_deref(), Some("Data & Lake"));
    }

    #[test]
    fn missing_title_is_absent() {
        let extractor = SectionExtractor::default();
        let result = extractor.extract(&chunk("</h1><p>x</p>")).unwrap();
        assert_eq!(result.title, None);
    }

    #[test]
    fn label_runs_capture_until_next_run() {
        let extractor = SectionExtractor::default();
        let html = "Acme Migration<strong>Client:</strong> Acme Corp<b>Tags</b>: cloud, migration";
        let result = extractor.extract(&chunk(html)).unwrap();
        let sections = result.sections;

        assert_eq!(sections.len(), 2);
        let client = sections.get("client").unwrap();
        assert_eq!(client.content, "Acme Corp");
        assert_eq!(client.origin, LabelOrigin::LabelRun);
        assert_eq!(sections.get("Tags").unwrap().content, "cloud, migration");
    }

    #[test]
    fn non_label_bold_still_ends_previous_section() {
        let extractor = SectionExtractor::default();
        let html = "T<strong>Summary:</strong> One<strong><em>emphasis</em></strong> two";
        let result = extractor.extract(&chunk(html)).unwrap();
        assert_eq!(result.sections.len(), 1);
        assert_eq!(result.sections.get("Summary").unwrap().content, "One");
    }

    #[test]
    fn label_paragraphs_take_next_block() {
        let extractor = SectionExtractor::default();
        let html = "T</h1><p>Problem:</p><p><ul><li>Slow reports</li></ul></p><p>Trailing note</p>";
        let result = extractor.extract(&chunk(html)).unwrap();
        let problem = result.sections.get("problem").unwrap();
        assert_eq!(problem.origin, LabelOrigin::LabelParagraph);
        assert_eq!(problem.content, "<ul><li>Slow reports</li></ul>");
    }

    #[test]
    fn long_colon_paragraph_is_not_a_label() {
        let extractor = SectionExtractor::default();
        let html = format!("T<p>{}:</p><p>content</p>", "x".repeat(SHORT_LABEL_MAX_CHARS - 1));
        let result = extractor.extract(&chunk(&html)).unwrap();
        assert!(result.sections.is_empty());
    }

    #[test]
    fn colon_paragraph_just_under_limit_is_a_label() {
        let extractor = SectionExtractor::default();
        let label = "x".repeat(SHORT_LABEL_MAX_CHARS - 2);
        let html = format!("T<p>{}:</p><p>content</p>", label);
        let result = extractor.extract(&chunk(&html)).unwrap();
        assert_eq!(result.sections.len(), 1);
        let section = result.sections.get(&label).unwrap();
        assert_eq!(section.content, "content");
        assert_eq!(section.origin, LabelOrigin::LabelParagraph);
    }

    #[test]
    fn label_run_wins_over_label_paragraph() {
        let extractor = SectionExtractor::default();
        let html = "T</h1><p><strong>Client:</strong> Bold Co</p><p>client:</p><p>Paragraph Co</p>";
        let result = extractor.extract(&chunk(html)).unwrap();

        let client = result.sections.get("Client").unwrap();
        assert_eq!(client.origin, LabelOrigin::LabelRun);
        assert!(client.content.starts_with("Bold Co"));
        assert_eq!(
            result.sections.iter().filter(|s| s.label.eq_ignore_ascii_case("client")).count(),
            1
        );
    }

    #[test]
    fn first_label_run_wins_within_pass() {
        let extractor = SectionExtractor::default();
        let html = "T<b>Client:</b> First<b>Client:</b> Second";
        let result = extractor.extract(&chunk(html)).unwrap();
        assert_eq!(result.sections.get("client").unwrap().content, "First");
    }

    #[test]
    fn no_labels_is_empty_map() {
        let extractor = SectionExtractor::default();
        let result = extractor.extract(&chunk("Plain</h1><p>Just prose here.</p>")).unwrap();
        assert!(result.sections.is_empty());
    }

    #[test]
    fn oversized_chunk_is_rejected() {
        let extractor = SectionExtractor::new(8);
        let err = extractor.extract(&chunk("Too long for the limit")).unwrap_err();
        assert!(matches!(err, ExtractError::ChunkTooLarge { size: 22, limit: 8 }));
    }

    #[test]
    fn malformed_offset_is_document_relative() {
        let extractor = SectionExtractor::default();
        let chunk = RecordChunk { index: 3, offset: 100, markup: "Title<p>ok</p><strong" };
        match extractor.extract(&chunk) {
            Err(ExtractError::MalformedMarkup { offset, .. }) => assert_eq!(offset, 114),
            other => panic!("expected malformed markup, got {:?}", other),
        }
    }
}
