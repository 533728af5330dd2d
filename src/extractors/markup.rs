// src/extractors/markup.rs

// --- Imports ---
use crate::utils::error::ExtractError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

// --- Regex Patterns (Lazy Static) ---
static TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<[^>]+>").expect("Failed to compile TAG_RE")
});

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+").expect("Failed to compile WHITESPACE_RE")
});

/// The only named entities the upstream converter emits.
const ENTITIES: [(&str, &str); 4] = [
    ("&nbsp;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
];

// Elements that never carry a closing tag in converter output
const VOID_ELEMENTS: [&str; 4] = ["br", "hr", "img", "meta"];

/// Strips tags, decodes the four named entities, collapses whitespace and trims.
pub fn clean_text(html: &str) -> String {
    let without_tags = TAG_RE.replace_all(html, "");
    let mut decoded = without_tags.into_owned();
    for (entity, replacement) in ENTITIES {
        decoded = decoded.replace(entity, replacement);
    }
    WHITESPACE_RE.replace_all(&decoded, " ").trim().to_string()
}

// --- Data Structures ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Open,
    Close,
    SelfClosing,
    /// Comments, doctypes and processing instructions.
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub name: String, // lower-cased element name, empty for `TagKind::Other`
    pub kind: TagKind,
    pub span: Range<usize>,
}

impl Tag {
    pub fn is_open(&self, names: &[&str]) -> bool {
        self.kind == TagKind::Open && names.contains(&self.name.as_str())
    }

    pub fn is_close(&self, name: &str) -> bool {
        self.kind == TagKind::Close && self.name == name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Text(Range<usize>),
    Tag(Tag),
}

impl Token {
    pub fn span(&self) -> Range<usize> {
        match self {
            Token::Text(span) => span.clone(),
            Token::Tag(tag) => tag.span.clone(),
        }
    }

    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Token::Tag(tag) => Some(tag),
            Token::Text(_) => None,
        }
    }
}

/// Splits markup into text runs and tags, keeping byte spans into `markup`.
///
/// A `<` that does not start a tag (e.g. `a < b`) stays text. A `<` that does
/// start one but never reaches `>` is reported as malformed.
pub fn tokenize(markup: &str) -> Result<Vec<Token>, ExtractError> {
    let bytes = markup.as_bytes();
    let mut tokens = Vec::new();
    let mut text_start = 0;
    let mut pos = 0;

    while pos < bytes.len() {
        if bytes[pos] != b'<' || !starts_tag(&bytes[pos + 1..]) {
            pos += 1;
            continue;
        }

        let close = markup[pos..].find('>').map(|rel| pos + rel + 1).ok_or_else(|| {
            ExtractError::MalformedMarkup {
                offset: pos,
                reason: "unterminated tag".to_string(),
            }
        })?;

        if text_start < pos {
            tokens.push(Token::Text(text_start..pos));
        }
        tokens.push(Token::Tag(parse_tag(&markup[pos..close], pos..close)));
        pos = close;
        text_start = close;
    }

    if text_start < bytes.len() {
        tokens.push(Token::Text(text_start..bytes.len()));
    }

    tracing::trace!("Tokenized {} bytes into {} tokens", markup.len(), tokens.len());
    Ok(tokens)
}

fn starts_tag(rest: &[u8]) -> bool {
    match rest.first() {
        Some(b'/') => rest.get(1).map_or(false, |b| b.is_ascii_alphabetic()),
        Some(b'!') | Some(b'?') => true,
        Some(b) => b.is_ascii_alphabetic(),
        None => false,
    }
}

fn parse_tag(raw: &str, span: Range<usize>) -> Tag {
    let inner = &raw[1..raw.len() - 1];
    if inner.starts_with('!') || inner.starts_with('?') {
        return Tag { name: String::new(), kind: TagKind::Other, span };
    }

    let (closing, body) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    let name: String = body
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase();

    let kind = if closing {
        TagKind::Close
    } else if body.trim_end().ends_with('/') || VOID_ELEMENTS.contains(&name.as_str()) {
        TagKind::SelfClosing
    } else {
        TagKind::Open
    };

    Tag { name, kind, span }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_strips_tags_and_decodes_entities() {
        let html = "<p>Fish&nbsp;&amp;  <em>Chips</em>\n &lt;3 &gt;</p>";
        assert_eq!(clean_text(html), "Fish & Chips <3 >");
    }

    #[test]
    fn clean_text_of_only_markup_is_empty() {
        assert_eq!(clean_text("<p> </p><br/>"), "");
    }

    #[test]
    fn tokenize_classifies_tags() {
        let markup = r#"Intro<p class="x">Body<br/></P><img src="a.png">"#;
        let tokens = tokenize(markup).unwrap();
        let tags: Vec<(&str, TagKind)> = tokens
            .iter()
            .filter_map(Token::as_tag)
            .map(|t| (t.name.as_str(), t.kind))
            .collect();
        assert_eq!(
            tags,
            vec![
                ("p", TagKind::Open),
                ("br", TagKind::SelfClosing),
                ("p", TagKind::Close),
                ("img", TagKind::SelfClosing),
            ]
        );
        assert_eq!(tokens[0], Token::Text(0..5));
        assert_eq!(&markup[tokens[2].span()], "Body");
    }

    #[test]
    fn stray_angle_bracket_is_text() {
        let tokens = tokenize("a < b <3").unwrap();
        assert_eq!(tokens, vec![Token::Text(0..8)]);
    }

    #[test]
    fn unterminated_tag_is_malformed() {
        match tokenize("ok<strong") {
            Err(ExtractError::MalformedMarkup { offset, .. }) => assert_eq!(offset, 2),
            other => panic!("expected malformed markup, got {:?}", other),
        }
    }
}
