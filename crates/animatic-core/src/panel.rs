//! Panel identity and artwork references.
//!
//! The authoring UI owns panel content; the engine only sees an ordered
//! list of panels, each carrying a reference to decodable artwork.

use crate::surface::Bitmap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier of a storyboard panel.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct PanelId(pub Uuid);

impl PanelId {
    /// Generate a fresh panel id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for PanelId {
    /// First 8 hex chars of the UUID, which is what placeholder frames
    /// and log lines show.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.0.simple().to_string();
        write!(f, "{}", &s[..8])
    }
}

/// Where a panel's artwork comes from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Decodable asset addressed by URL or file path; loaded by the
    /// consumer's asset cache.
    Url(String),
    /// Already-rendered pixels, e.g. a canvas snapshot from the UI.
    Prerendered(Bitmap),
}

/// One static illustration in the storyboard sequence.
#[derive(Debug, Clone)]
pub struct Panel {
    pub id: PanelId,
    /// Display label, used on placeholder frames when artwork is missing.
    pub label: String,
    /// Artwork reference; `None` renders a placeholder.
    pub image: Option<ImageSource>,
}

impl Panel {
    /// Panel with artwork addressed by URL.
    pub fn with_url(id: PanelId, label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            image: Some(ImageSource::Url(url.into())),
        }
    }

    /// Panel with already-decoded artwork.
    pub fn with_bitmap(id: PanelId, label: impl Into<String>, bitmap: Bitmap) -> Self {
        Self {
            id,
            label: label.into(),
            image: Some(ImageSource::Prerendered(bitmap)),
        }
    }

    /// Panel without artwork (renders a placeholder).
    pub fn empty(id: PanelId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            image: None,
        }
    }

    /// The asset URL, if this panel is URL-addressed.
    pub fn image_url(&self) -> Option<&str> {
        match &self.image {
            Some(ImageSource::Url(url)) => Some(url.as_str()),
            _ => None,
        }
    }
}
