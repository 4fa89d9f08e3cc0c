pub mod error;
pub mod extraction;
pub mod metrics;
pub mod providers;
pub mod temp_upload;

pub use error::UploadError;
pub use extraction::WordExtractor;
pub use metrics::{get_metrics, init_metrics};
pub use temp_upload::TempUpload;
