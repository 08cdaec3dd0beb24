mod aoi;
mod compare;
mod health;
mod home;
mod report;
mod upload;

pub use aoi::clear_aoi;
pub use compare::{compare_ndvi, compare_ndwi, compare_rvi, compare_savi};
pub use health::health_check;
pub use home::home;
pub use report::download_report;
pub use upload::upload_aoi;
