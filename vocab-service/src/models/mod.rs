pub mod image;
pub mod word_pair;

pub use image::{image_mime_from_extension, resolve_image_mime};
pub use word_pair::WordPair;
