// src/catalog/validate.rs
use crate::catalog::models::ExtractedRecord;
use crate::utils::error::ValidationError;
use chrono::NaiveDate;

/// Checks a record against the catalog shape: non-empty text fields,
/// non-empty narrative lists, an ISO calendar date and usable images.
pub fn validate_record(record: &ExtractedRecord) -> Result<(), ValidationError> {
    let text_fields = [
        ("id", &record.id),
        ("title", &record.title),
        ("client", &record.client),
        ("category", &record.category),
        ("summary", &record.summary),
    ];
    for (name, value) in text_fields {
        if value.trim().is_empty() {
            return Err(ValidationError::EmptyField(name));
        }
    }

    let list_fields = [
        ("problem", &record.problem),
        ("approach", &record.approach),
        ("outcomes", &record.outcomes),
        ("techStack", &record.tech_stack),
        ("tags", &record.tags),
    ];
    for (name, items) in list_fields {
        if items.is_empty() || items.iter().all(|item| item.trim().is_empty()) {
            return Err(ValidationError::EmptyList(name));
        }
    }

    if record.date.len() != 10 || NaiveDate::parse_from_str(&record.date, "%Y-%m-%d").is_err() {
        return Err(ValidationError::InvalidDate(record.date.clone()));
    }

    if let Some(position) = record.images.iter().position(|image| image.src.trim().is_empty()) {
        return Err(ValidationError::InvalidImage(position));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::{sample_record, ImageRef};

    #[test]
    fn complete_record_is_valid() {
        assert_eq!(validate_record(&sample_record("alpha", "Cloud")), Ok(()));
    }

    #[test]
    fn empty_list_is_rejected() {
        let mut record = sample_record("alpha", "Cloud");
        record.tech_stack.clear();
        assert_eq!(validate_record(&record), Err(ValidationError::EmptyList("techStack")));
    }

    #[test]
    fn blank_client_is_rejected() {
        let mut record = sample_record("alpha", "Cloud");
        record.client = "  ".to_string();
        assert_eq!(validate_record(&record), Err(ValidationError::EmptyField("client")));
    }

    #[test]
    fn bad_date_is_rejected() {
        let mut record = sample_record("alpha", "Cloud");
        record.date = "31/01/2024".to_string();
        assert!(matches!(validate_record(&record), Err(ValidationError::InvalidDate(_))));
        record.date = "2024-02-30".to_string();
        assert!(matches!(validate_record(&record), Err(ValidationError::InvalidDate(_))));
    }

    #[test]
    fn image_without_src_is_rejected() {
        let mut record = sample_record("alpha", "Cloud");
        record.images = vec![
            ImageRef { src: "/projects/a.png".into(), alt: "a".into() },
            ImageRef { src: "".into(), alt: "b".into() },
        ];
        assert_eq!(validate_record(&record), Err(ValidationError::InvalidImage(1)));
    }
}
