// src/storage/mod.rs
use crate::catalog::models::{Catalog, ImageRef, RawDocument};
use crate::utils::error::StorageError;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Reads the converted markup and, when given, the image manifest
/// (a JSON array of `{ "src", "alt" }` objects in document order).
pub async fn load_document(markup_path: &Path, images_path: Option<&Path>) -> Result<RawDocument, StorageError> {
    let markup = read_input(markup_path).await?;
    tracing::info!("Read {} bytes of markup from {}", markup.len(), markup_path.display());

    let images = match images_path {
        Some(path) => {
            let raw = read_input(path).await?;
            let images: Vec<ImageRef> = serde_json::from_str(&raw).map_err(|e| {
                StorageError::SerializationError(format!("invalid image manifest {}: {}", path.display(), e))
            })?;
            tracing::info!("Loaded {} image descriptor(s) from {}", images.len(), path.display());
            images
        }
        None => Vec::new(),
    };

    Ok(RawDocument { markup, images })
}

async fn read_input(path: &Path) -> Result<String, StorageError> {
    match fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(StorageError::InputNotFound(path.display().to_string()))
        }
        Err(e) => Err(StorageError::IoError(e)),
    }
}

/// Writes the catalog JSON consumed by the browsing UI.
pub struct CatalogStore {
    output_path: PathBuf,
}

impl CatalogStore {
    pub fn new<P: AsRef<Path>>(output_path: P) -> Self {
        Self { output_path: output_path.as_ref().to_path_buf() }
    }

    /// Sibling path for the annotated debug copy of the markup.
    pub fn debug_markup_path(&self) -> PathBuf {
        let stem = self
            .output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "catalog".to_string());
        self.output_path.with_file_name(format!("{}.annotated.html", stem))
    }

    /// Serializes the catalog (2-space pretty JSON) and replaces the output file.
    ///
    /// The JSON goes to a temporary sibling first so a failed write never
    /// leaves a truncated catalog behind.
    pub async fn save_catalog(&self, catalog: &Catalog) -> Result<PathBuf, StorageError> {
        if let Some(parent) = self.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(catalog)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        let tmp_path = self.output_path.with_extension("json.tmp");
        fs::write(&tmp_path, json).await?;
        fs::rename(&tmp_path, &self.output_path).await?;

        tracing::info!(
            "Saved {} project(s) to {}",
            catalog.metadata.total_projects,
            self.output_path.display()
        );
        Ok(self.output_path.clone())
    }
}
