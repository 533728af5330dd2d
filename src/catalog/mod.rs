// src/catalog/mod.rs
pub mod anonymize;
pub mod assembler;
pub mod models;
pub mod pipeline;
pub mod validate;

// Re-export the types the binary wires together
#[allow(unused_imports)]
pub use anonymize::{PassThrough, RecordFilter};
#[allow(unused_imports)]
pub use assembler::ImagePolicy;
#[allow(unused_imports)]
pub use models::{Catalog, ExtractedRecord, ImageRef, RawDocument};
#[allow(unused_imports)]
pub use pipeline::{build_catalog, extract_records, PipelineConfig};
