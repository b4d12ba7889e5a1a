//! Domain entity definitions.

mod image;
mod loading_state;
mod photo;

pub use self::image::{CacheEntry, ImageKey, ImageSource, LoadedImage, ResponseMeta};
pub use loading_state::LoadingState;
pub use photo::{Photo, PhotoUrls, PhotoUser};
