// src/extractors/mod.rs
pub mod fields;
pub mod markup;
pub mod section;
pub mod segment;

// Re-export key extraction types for convenience
#[allow(unused_imports)]
pub use fields::{normalize, NormalizedFields};
#[allow(unused_imports)]
pub use section::{ChunkSections, SectionExtractor, SectionMap};
#[allow(unused_imports)]
pub use segment::{split_chunks, RecordChunk};
