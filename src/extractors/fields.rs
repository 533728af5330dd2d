// src/extractors/fields.rs

// --- Imports ---
use crate::extractors::markup::{self, clean_text, TagKind, Token};
use crate::extractors::section::SectionMap;
use once_cell::sync::Lazy;
use regex::Regex;

// --- Defaults ---
pub const DEFAULT_CATEGORY: &str = "Data & AI";
pub const DEFAULT_OUTCOME: &str = "Delivered measurable improvements in operational efficiency";
pub const LIST_PLACEHOLDER: &str = "Comprehensive solution implementation";
pub const DEFAULT_TECH_STACK: [&str; 4] = ["Azure", "Power BI", "Python", "Machine Learning"];
pub const DEFAULT_TAGS: [&str; 3] = ["Data Analytics", "AI", "Business Intelligence"];

/// Bullet-split fragments must be longer than this to count as list items.
const MIN_FALLBACK_ITEM_CHARS: usize = 10;

// --- Patterns (Lazy Static) ---
// Nested list structure inside an item, replaced by a space before cleaning
static NESTED_LIST_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:ul|ol|li)\b[^>]*>").expect("Failed to compile NESTED_LIST_TAG_RE")
});

static BULLET_SPLIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[•\-*]\s*|\n").expect("Failed to compile BULLET_SPLIT_RE")
});

static COMMA_SPLIT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[,;]\s*").expect("Failed to compile COMMA_SPLIT_RE")
});

// --- Routing Table ---
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Client,
    Summary,
    Category,
    Problem,
    Approach,
    Outcomes,
    TechStack,
    Tags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decoding {
    PlainText,
    List,
    CommaSeparated,
}

/// Every accepted label synonym, lower-cased. Add new synonyms here.
static LABEL_ROUTES: &[(&str, Field)] = &[
    ("client", Field::Client),
    ("summary", Field::Summary),
    ("category", Field::Category),
    ("problem", Field::Problem),
    ("problems", Field::Problem),
    ("challenge", Field::Problem),
    ("challenges", Field::Problem),
    ("approach", Field::Approach),
    ("solution", Field::Approach),
    ("methodology", Field::Approach),
    ("outcomes", Field::Outcomes),
    ("results", Field::Outcomes),
    ("benefits", Field::Outcomes),
    ("tech stack", Field::TechStack),
    ("technology", Field::TechStack),
    ("technologies", Field::TechStack),
    ("tags", Field::Tags),
    ("keywords", Field::Tags),
];

impl Field {
    pub fn decoding(self) -> Decoding {
        match self {
            Field::Client | Field::Summary | Field::Category => Decoding::PlainText,
            Field::Problem | Field::Approach | Field::Outcomes => Decoding::List,
            Field::TechStack | Field::Tags => Decoding::CommaSeparated,
        }
    }
}

/// Maps a section label onto a record field, ignoring case and a trailing colon.
pub fn route_label(label: &str) -> Option<Field> {
    let key = label.trim().trim_end_matches(':').trim().to_lowercase();
    LABEL_ROUTES
        .iter()
        .find(|(synonym, _)| *synonym == key)
        .map(|&(_, field)| field)
}

// --- Decoders ---
pub fn decode_plain(raw: &str) -> String {
    clean_text(raw)
}

/// `<li>` items first, then bullet/newline splitting, then a placeholder.
///
/// Only top-level items count; a nested list stays inside its parent item's text.
pub fn decode_list(raw: &str) -> Vec<String> {
    let items: Vec<String> = top_level_list_items(raw)
        .into_iter()
        .map(|inner| clean_text(&NESTED_LIST_TAG_RE.replace_all(inner, " ")))
        .filter(|item| !item.is_empty())
        .collect();
    if !items.is_empty() {
        return items;
    }

    let text = clean_text(raw);
    let items: Vec<String> = BULLET_SPLIT_RE
        .split(&text)
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_FALLBACK_ITEM_CHARS)
        .map(str::to_string)
        .collect();
    if !items.is_empty() {
        return items;
    }

    tracing::trace!("No list items found, using placeholder");
    vec![LIST_PLACEHOLDER.to_string()]
}

/// Raw markup inside each outermost `<li>`. An item left open runs to the end.
fn top_level_list_items(raw: &str) -> Vec<&str> {
    let Ok(tokens) = markup::tokenize(raw) else {
        return Vec::new();
    };

    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    for tag in tokens.iter().filter_map(Token::as_tag).filter(|t| t.name == "li") {
        match tag.kind {
            TagKind::Open => {
                if depth == 0 {
                    start = Some(tag.span.end);
                }
                depth += 1;
            }
            TagKind::Close if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(item_start) = start.take() {
                        items.push(&raw[item_start..tag.span.start]);
                    }
                }
            }
            _ => {}
        }
    }
    if let Some(item_start) = start {
        items.push(&raw[item_start..]);
    }
    items
}

pub fn decode_comma_separated(raw: &str) -> Vec<String> {
    let text = clean_text(raw);
    COMMA_SPLIT_RE
        .split(&text)
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

// --- Normalized Output ---
/// Every record field except `id` and `images`, fully populated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedFields {
    pub title: String,
    pub client: String,
    pub category: String,
    pub summary: String,
    pub problem: Vec<String>,
    pub approach: Vec<String>,
    pub outcomes: Vec<String>,
    pub tech_stack: Vec<String>,
    pub tags: Vec<String>,
    pub date: String,
}

impl NormalizedFields {
    fn empty(title: &str, date: &str) -> Self {
        Self {
            title: title.to_string(),
            client: String::new(),
            category: String::new(),
            summary: String::new(),
            problem: Vec::new(),
            approach: Vec::new(),
            outcomes: Vec::new(),
            tech_stack: Vec::new(),
            tags: Vec::new(),
            date: date.to_string(),
        }
    }

    fn text_slot(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Client => Some(&mut self.client),
            Field::Summary => Some(&mut self.summary),
            Field::Category => Some(&mut self.category),
            _ => None,
        }
    }

    fn list_slot(&mut self, field: Field) -> Option<&mut Vec<String>> {
        match field {
            Field::Problem => Some(&mut self.problem),
            Field::Approach => Some(&mut self.approach),
            Field::Outcomes => Some(&mut self.outcomes),
            Field::TechStack => Some(&mut self.tech_stack),
            Field::Tags => Some(&mut self.tags),
            _ => None,
        }
    }

    fn fill_defaults(&mut self, index: usize) {
        let lower_title = self.title.to_lowercase();
        if self.client.is_empty() {
            self.client = format!("Leading technology company {}", index + 1);
        }
        if self.summary.is_empty() {
            self.summary = format!("Advanced {} solution delivering measurable business value.", lower_title);
        }
        if self.category.is_empty() {
            self.category = DEFAULT_CATEGORY.to_string();
        }
        if self.problem.is_empty() {
            self.problem = vec![format!("Complex data challenges requiring {} solutions", lower_title)];
        }
        if self.approach.is_empty() {
            self.approach = vec![format!("Implemented comprehensive {} methodology", lower_title)];
        }
        if self.outcomes.is_empty() {
            self.outcomes = vec![DEFAULT_OUTCOME.to_string()];
        }
        if self.tech_stack.is_empty() {
            self.tech_stack = DEFAULT_TECH_STACK.iter().map(|s| s.to_string()).collect();
        }
        if self.tags.is_empty() {
            self.tags = DEFAULT_TAGS.iter().map(|s| s.to_string()).collect();
        }
    }
}

/// Routes each section onto its field and fills the rest with defaults.
///
/// When several labels route to the same field, the first one in the map
/// that decodes to something non-empty is kept. Never fails.
pub fn normalize(title: &str, sections: &SectionMap<'_>, index: usize, date: &str) -> NormalizedFields {
    let mut fields = NormalizedFields::empty(title, date);

    for section in sections.iter() {
        let Some(field) = route_label(&section.label) else {
            tracing::trace!("Ignoring unrecognized label '{}'", section.label);
            continue;
        };

        match field.decoding() {
            Decoding::PlainText => {
                if let Some(slot) = fields.text_slot(field).filter(|s| s.is_empty()) {
                    *slot = decode_plain(section.content);
                }
            }
            Decoding::List | Decoding::CommaSeparated => {
                if let Some(slot) = fields.list_slot(field).filter(|s| s.is_empty()) {
                    *slot = if field.decoding() == Decoding::List {
                        decode_list(section.content)
                    } else {
                        decode_comma_separated(section.content)
                    };
                }
            }
        }
    }

    fields.fill_defaults(index);
    fields
}
