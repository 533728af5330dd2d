// src/catalog/models.rs
use serde::{Deserialize, Serialize};

pub const CATALOG_VERSION: &str = "1.0.0";

/// An embedded image already written to storage by the upstream converter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// Converted markup plus its images, in document order.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    pub markup: String,
    pub images: Vec<ImageRef>,
}

/// One project entry of the catalog. Field order is the serialized order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedRecord {
    pub title: String,
    pub client: String,
    pub category: String,
    pub summary: String,
    pub problem: Vec<String>,
    pub approach: Vec<String>,
    pub outcomes: Vec<String>,
    #[serde(rename = "techStack")]
    pub tech_stack: Vec<String>,
    pub tags: Vec<String>,
    pub images: Vec<ImageRef>,
    pub date: String,
    pub id: String,
}

/// Envelope written ahead of the records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMetadata {
    pub generated_at: String,
    pub source_file: String,
    pub total_projects: usize,
    pub categories: Vec<String>, // distinct, first-seen order
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub metadata: CatalogMetadata,
    pub projects: Vec<ExtractedRecord>,
}

impl Catalog {
    /// Wraps the records in an envelope derived from them.
    pub fn new(projects: Vec<ExtractedRecord>, source_file: &str, generated_at: &str) -> Self {
        let mut categories: Vec<String> = Vec::new();
        for project in &projects {
            if !categories.contains(&project.category) {
                categories.push(project.category.clone());
            }
        }

        Self {
            metadata: CatalogMetadata {
                generated_at: generated_at.to_string(),
                source_file: source_file.to_string(),
                total_projects: projects.len(),
                categories,
                version: CATALOG_VERSION.to_string(),
            },
            projects,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_record(title: &str, category: &str) -> ExtractedRecord {
    ExtractedRecord {
        title: title.to_string(),
        client: "Client".to_string(),
        category: category.to_string(),
        summary: "Summary".to_string(),
        problem: vec!["Problem".to_string()],
        approach: vec!["Approach".to_string()],
        outcomes: vec!["Outcome".to_string()],
        tech_stack: vec!["Rust".to_string()],
        tags: vec!["tag".to_string()],
        images: Vec::new(),
        date: "2024-01-31".to_string(),
        id: format!("{}-1", title.to_lowercase()),
    }
}
