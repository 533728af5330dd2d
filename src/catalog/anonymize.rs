// src/catalog/anonymize.rs
use crate::catalog::models::ExtractedRecord;

/// A per-record transform applied after assembly and before validation,
/// e.g. replacing client names. Implementations must be pure.
pub trait RecordFilter {
    fn apply(&self, record: ExtractedRecord) -> ExtractedRecord;
}

/// Leaves records untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassThrough;

impl RecordFilter for PassThrough {
    fn apply(&self, record: ExtractedRecord) -> ExtractedRecord {
        record
    }
}

impl<F> RecordFilter for F
where
    F: Fn(ExtractedRecord) -> ExtractedRecord,
{
    fn apply(&self, record: ExtractedRecord) -> ExtractedRecord {
        self(record)
    }
}
