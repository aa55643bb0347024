//! Viewer configuration

use crate::camera::{default_cameras, CameraDescriptor, DEFAULT_PAGE_SIZE, DEFAULT_THUMB_HEIGHT};
use crate::layout::LayoutMode;

/// Viewer configuration options
#[derive(Debug, Clone)]
pub struct ViewerConfig {
    /// Grid tiles per page
    pub page_size: usize,

    /// Thumbnail height used until the user changes it
    pub default_thumb_height: u32,

    /// Layout used until the user changes it
    pub default_layout: LayoutMode,

    /// Start every session with audio muted
    pub start_muted: bool,

    /// Prefix for persisted keys (`<prefix>.cameras`, ...)
    pub storage_prefix: String,

    /// Seed cameras for first start and reset
    pub default_cameras: Vec<CameraDescriptor>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_thumb_height: DEFAULT_THUMB_HEIGHT,
            default_layout: LayoutMode::Sidebar,
            start_muted: true,
            storage_prefix: "nvr".to_string(),
            default_cameras: default_cameras(),
        }
    }
}

impl ViewerConfig {
    /// Set grid page size (at least one tile)
    pub fn page_size(mut self, size: usize) -> Self {
        self.page_size = size.max(1);
        self
    }

    /// Set default thumbnail height (at least one pixel)
    pub fn default_thumb_height(mut self, px: u32) -> Self {
        self.default_thumb_height = px.max(1);
        self
    }

    /// Set default layout
    pub fn default_layout(mut self, layout: LayoutMode) -> Self {
        self.default_layout = layout;
        self
    }

    /// Start sessions with audio enabled
    pub fn start_unmuted(mut self) -> Self {
        self.start_muted = false;
        self
    }

    /// Set persisted key prefix
    pub fn storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = prefix.into();
        self
    }

    /// Set seed cameras
    pub fn default_cameras(mut self, cameras: Vec<CameraDescriptor>) -> Self {
        self.default_cameras = cameras;
        self
    }
}
