use std::path::Path;

use terradiff_core::formats;
use terradiff_core::models::Aoi;
use terradiff_core::{Result, TerradiffError};

/// Service for extracting an AOI from an uploaded spatial file
pub struct UploadService;

impl UploadService {
    /// Writes the upload into a fresh scratch directory and extracts the AOI.
    /// The directory is dropped with this call, so nothing leaks between
    /// requests.
    pub fn extract(filename: &str, data: &[u8]) -> Result<Aoi> {
        // Keep only the final path component; clients control the filename.
        let name = Path::new(filename).file_name().ok_or_else(|| {
            TerradiffError::FileExtraction {
                format: "upload".to_string(),
                reason: format!("unusable file name: {filename}"),
            }
        })?;

        let scratch = tempfile::tempdir()?;
        let path = scratch.path().join(name);
        std::fs::write(&path, data)?;
        formats::extract_aoi(&path)
    }
}
