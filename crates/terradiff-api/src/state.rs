use std::path::PathBuf;
use std::sync::Arc;

use terradiff_core::models::Aoi;
use terradiff_core::ports::ImageService;
use tokio::sync::RwLock;

/// Shared server state.
pub struct AppState {
    pub engine: Arc<dyn ImageService>,
    /// AOI set by `/upload`. While present it takes precedence over any AOI
    /// in a comparison request body; `/clear_aoi` resets it. The lock keeps
    /// concurrent uploads and comparisons from tearing each other's reads.
    pub active_aoi: RwLock<Option<Aoi>>,
    pub report_path: PathBuf,
}

impl AppState {
    pub fn new(engine: Arc<dyn ImageService>, report_path: PathBuf) -> Self {
        Self { engine, active_aoi: RwLock::new(None), report_path }
    }
}
