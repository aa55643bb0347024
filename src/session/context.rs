//! Session identity and options

use crate::registry::SlotKey;

/// What a session is bound to
///
/// A live session matches a required slot only if the slot, the camera and
/// the source URL all agree; anything else means the session is stale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Unique session ID
    pub session_id: u64,

    /// Slot the session renders into
    pub slot: SlotKey,

    /// Camera the session plays
    pub camera_id: String,

    /// WHEP endpoint
    pub source_url: String,
}

impl SessionContext {
    /// Create a new context
    pub fn new(
        session_id: u64,
        slot: SlotKey,
        camera_id: impl Into<String>,
        source_url: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            slot,
            camera_id: camera_id.into(),
            source_url: source_url.into(),
        }
    }

    /// Check if this session plays `camera_id` from `source_url`
    pub fn matches(&self, camera_id: &str, source_url: &str) -> bool {
        self.camera_id == camera_id && self.source_url == source_url
    }
}

/// Options applied when a session starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    /// Start with audio muted
    pub start_muted: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self { start_muted: true }
    }
}
