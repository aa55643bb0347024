//! Camera descriptor

use serde::Serialize;

/// Scheme prefix a source URL must carry to be playable
const PLAYABLE_URL_PREFIX: &str = "http";

/// One configured camera
///
/// `id` is the only stable identity. A descriptor without a usable source URL
/// is valid; it renders as a "no source" placeholder and never gets a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDescriptor {
    /// Unique, non-empty identifier
    pub id: String,
    /// Display name (may be empty, see [`label`](Self::label))
    pub name: String,
    /// WHEP endpoint for this camera
    pub source_url: Option<String>,
}

impl CameraDescriptor {
    /// Create a new descriptor
    pub fn new(id: impl Into<String>, name: impl Into<String>, source_url: Option<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source_url,
        }
    }

    /// Create a descriptor with a WHEP endpoint
    pub fn with_url(id: impl Into<String>, name: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(id, name, Some(url.into()))
    }

    /// Name shown on the tile badge, falling back to the id
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }

    /// Source URL if it can actually be negotiated against
    pub fn playable_url(&self) -> Option<&str> {
        self.source_url
            .as_deref()
            .filter(|u| u.starts_with(PLAYABLE_URL_PREFIX))
    }

    /// Export form `{ id, name, webrtc }`
    pub(crate) fn to_exported(&self) -> ExportedCamera<'_> {
        ExportedCamera {
            id: &self.id,
            name: self.label(),
            webrtc: self.source_url.as_deref().unwrap_or(""),
        }
    }
}

/// Serialized shape of a camera in exports and persisted state
#[derive(Debug, Serialize)]
pub(crate) struct ExportedCamera<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub webrtc: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_falls_back_to_id() {
        let cam = CameraDescriptor::new("garage", "", None);
        assert_eq!(cam.label(), "garage");

        let cam = CameraDescriptor::new("garage", "Garage", None);
        assert_eq!(cam.label(), "Garage");
    }

    #[test]
    fn test_playable_url_requires_http() {
        let cam = CameraDescriptor::with_url("a", "A", "http://localhost:8889/a/whep");
        assert_eq!(cam.playable_url(), Some("http://localhost:8889/a/whep"));

        let cam = CameraDescriptor::with_url("a", "A", "https://nvr.local/a/whep");
        assert!(cam.playable_url().is_some());

        let cam = CameraDescriptor::with_url("a", "A", "rtsp://cam/a");
        assert!(cam.playable_url().is_none());

        let cam = CameraDescriptor::with_url("a", "A", "");
        assert!(cam.playable_url().is_none());

        let cam = CameraDescriptor::new("a", "A", None);
        assert!(cam.playable_url().is_none());
    }
}
