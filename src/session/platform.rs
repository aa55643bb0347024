//! Platform WebRTC seams
//!
//! The coordinator never touches a real peer connection or media element
//! directly. A [`MediaPlatform`] hands out peer connections and per-slot
//! display surfaces; everything protocol-level (SDP, ICE, DTLS, decoding)
//! stays on the platform side.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::PeerError;
use crate::registry::SlotKey;

/// Media kind of a transceiver or track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Audio,
}

/// Remote track delivered by the platform after negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundTrack {
    /// Platform track id
    pub id: String,
    pub kind: MediaKind,
}

impl InboundTrack {
    pub fn new(id: impl Into<String>, kind: MediaKind) -> Self {
        Self {
            id: id.into(),
            kind,
        }
    }
}

/// Channel the platform pushes inbound tracks into, in arrival order
pub type TrackSink = mpsc::UnboundedSender<InboundTrack>;

/// Receive-only peer connection
#[async_trait]
pub trait PeerConnection: Send + Sync {
    /// Declare a receive-only transceiver
    fn add_recvonly_transceiver(&self, kind: MediaKind) -> Result<(), PeerError>;

    /// Generate the local offer SDP
    async fn create_offer(&self) -> Result<String, PeerError>;

    /// Apply the local offer
    async fn set_local_description(&self, sdp: &str) -> Result<(), PeerError>;

    /// Apply the remote answer
    async fn set_remote_answer(&self, sdp: &str) -> Result<(), PeerError>;

    /// Stop every sender and receiver track
    fn stop_tracks(&self) -> Result<(), PeerError>;

    /// Close the transport
    fn close(&self) -> Result<(), PeerError>;
}

/// Display surface (media element) bound to one slot
pub trait MediaSurface: Send + Sync {
    /// Create and show a fresh media element
    fn attach(&self, muted: bool);

    /// Add a track to the element's stream without replacing existing ones
    fn add_track(&self, track: InboundTrack);

    fn set_muted(&self, muted: bool);

    /// Suspend local playback
    fn pause(&self);

    /// Resume local playback
    fn resume(&self);

    /// Clear the stream and remove the media element
    fn detach(&self);
}

/// Factory for peer connections and slot surfaces
pub trait MediaPlatform: Send + Sync {
    /// Create a peer connection delivering inbound tracks into `tracks`
    fn create_peer(&self, tracks: TrackSink) -> Result<Arc<dyn PeerConnection>, PeerError>;

    /// Surface for a slot
    fn surface(&self, slot: &SlotKey) -> Arc<dyn MediaSurface>;
}
