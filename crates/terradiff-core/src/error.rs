//! Error types for terradiff

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TerradiffError {
    // AOI errors
    #[error("Invalid AOI: {reason}")]
    InvalidAoi { reason: String },

    #[error("Failed to extract AOI from {format} file: {reason}")]
    FileExtraction { format: String, reason: String },

    // Remote compute errors
    #[error("No reducible pixels for {band} over the requested range")]
    StatisticsUnavailable { band: String },

    #[error("Compute service unreachable: {reason}")]
    EngineUnavailable { reason: String },

    #[error("Compute service error: {message}")]
    Engine { message: String },

    // Report errors
    #[error("No report available at {path}")]
    ReportUnavailable { path: PathBuf },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TerradiffError {
    /// Stable machine-readable label for the error kind, returned to API
    /// clients alongside the human-readable message.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidAoi { .. } => "invalid_aoi",
            Self::FileExtraction { .. } => "file_extraction_failed",
            Self::StatisticsUnavailable { .. } => "statistics_unavailable",
            Self::EngineUnavailable { .. } => "engine_unavailable",
            Self::Engine { .. } => "engine_error",
            Self::ReportUnavailable { .. } => "report_unavailable",
            Self::Io(_) => "io_error",
            Self::Serialization(_) => "serialization_error",
        }
    }
}

pub type Result<T> = std::result::Result<T, TerradiffError>;
