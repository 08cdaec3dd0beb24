mod request;
mod response;

pub use request::{AoiBody, CompareRequest, GeometryBody};
pub use response::{CompareResponse, HealthResponse, MessageResponse, UploadResponse};
