//! Unsplash photo entity.

use serde::{Deserialize, Serialize};

/// Fallback shown when a photo carries no description at all.
const NO_DESCRIPTION: &str = "No description to show";

/// A single photo in the feed.
///
/// Photos are identified by `id`; two entries with the same `id` refer to
/// the same photo within a loaded collection. Unknown fields in the wire
/// representation are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Photo {
    /// Stable unique identifier.
    pub id: String,
    /// Author-provided description, if any.
    #[serde(default)]
    pub description: Option<String>,
    /// Generated alt text, if any.
    #[serde(default)]
    pub alt_description: Option<String>,
    /// Average color as six hex digits, with or without a leading `#`.
    pub color: String,
    /// Like count.
    pub likes: u32,
    /// Image URLs at different sizes.
    pub urls: PhotoUrls,
    /// Uploading user.
    pub user: PhotoUser,
}

impl Photo {
    /// Human description, falling back to the alt text.
    #[must_use]
    pub fn display_description(&self) -> &str {
        self.description
            .as_deref()
            .or(self.alt_description.as_deref())
            .unwrap_or(NO_DESCRIPTION)
    }

    /// Parses the average color into RGB components.
    ///
    /// Returns `None` if the color string is not six hex digits.
    #[must_use]
    pub fn color_rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.color.strip_prefix('#').unwrap_or(&self.color);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }
}

/// Image URLs for a photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoUrls {
    /// Thumbnail-sized image.
    pub thumb: String,
    /// Regular-sized image.
    pub regular: String,
}

/// The user who uploaded a photo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PhotoUser {
    /// Unsplash username.
    pub username: String,
}
