use std::env;
use std::path::PathBuf;

use terradiff_engine::EngineConfig;

/// API server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    pub report_path: PathBuf,
    /// Earth Engine credentials; `None` selects the synthetic engine.
    pub engine: Option<EngineConfig>,
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let port = env::var("TERRADIFF_PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(8080);

        let cors_origin = env::var("TERRADIFF_CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());

        let report_path = env::var("TERRADIFF_REPORT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("report.pdf"));

        let engine = match (env::var("EARTHENGINE_PROJECT"), env::var("EARTHENGINE_TOKEN")) {
            (Ok(project), Ok(token)) => Some(EngineConfig {
                base_url: env::var("EARTHENGINE_URL")
                    .unwrap_or_else(|_| "https://earthengine.googleapis.com".to_string()),
                project,
                token,
            }),
            _ => None,
        };

        Self { port, cors_origin, report_path, engine }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Check if a real Earth Engine session is configured
    pub fn uses_remote_engine(&self) -> bool {
        self.engine.is_some()
    }
}
