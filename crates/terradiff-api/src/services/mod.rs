mod comparison;
mod upload;

pub use comparison::ComparisonService;
pub use upload::UploadService;
