pub mod health;
pub mod metrics;
pub mod upload;

pub use health::health_check;
pub use metrics::metrics;
pub use upload::upload_image;
