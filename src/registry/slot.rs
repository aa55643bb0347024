//! Slot keys
//!
//! A slot is a named rendering position that hosts at most one session.

use std::fmt;

/// Kind of slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Large primary view (Sidebar layout)
    Main,
    /// Thumbnail strip entry (Sidebar layout)
    Thumbnail,
    /// Grid cell (Grid layouts)
    Grid,
}

/// Unique identifier for a rendering position
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SlotKey {
    /// The main view
    Main,
    /// Thumbnail of the given camera id
    Thumbnail(String),
    /// Grid cell of the given camera id
    Grid(String),
}

impl SlotKey {
    /// Create a thumbnail key
    pub fn thumbnail(camera_id: impl Into<String>) -> Self {
        SlotKey::Thumbnail(camera_id.into())
    }

    /// Create a grid key
    pub fn grid(camera_id: impl Into<String>) -> Self {
        SlotKey::Grid(camera_id.into())
    }

    pub fn kind(&self) -> SlotKind {
        match self {
            SlotKey::Main => SlotKind::Main,
            SlotKey::Thumbnail(_) => SlotKind::Thumbnail,
            SlotKey::Grid(_) => SlotKind::Grid,
        }
    }

    /// Camera id for thumbnail and grid slots
    pub fn camera_id(&self) -> Option<&str> {
        match self {
            SlotKey::Main => None,
            SlotKey::Thumbnail(id) | SlotKey::Grid(id) => Some(id),
        }
    }

    pub fn is_main(&self) -> bool {
        matches!(self, SlotKey::Main)
    }

    pub fn is_thumbnail(&self) -> bool {
        matches!(self, SlotKey::Thumbnail(_))
    }

    pub fn is_grid(&self) -> bool {
        matches!(self, SlotKey::Grid(_))
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKey::Main => write!(f, "main"),
            SlotKey::Thumbnail(id) => write!(f, "thumb/{}", id),
            SlotKey::Grid(id) => write!(f, "grid/{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_display_and_kind() {
        assert_eq!(SlotKey::Main.to_string(), "main");
        assert_eq!(SlotKey::thumbnail("door_cam").to_string(), "thumb/door_cam");
        assert_eq!(SlotKey::grid("rear_cam").to_string(), "grid/rear_cam");

        assert_eq!(SlotKey::grid("a").kind(), SlotKind::Grid);
        assert_eq!(SlotKey::thumbnail("a").camera_id(), Some("a"));
        assert_eq!(SlotKey::Main.camera_id(), None);
    }

    #[test]
    fn test_same_camera_different_kind_is_distinct() {
        assert_ne!(SlotKey::thumbnail("a"), SlotKey::grid("a"));
    }
}
