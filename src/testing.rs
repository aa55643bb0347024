//! In-memory platform and transport
//!
//! [`RecordingPlatform`] hands out peer connections and surfaces that only
//! record what was done to them. [`ScriptedTransport`] answers WHEP offers
//! from a script: success by default, a fixed status per URL, or held until
//! released. Used by the tests and the walkthrough demo.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::error::{NegotiationError, PeerError};
use crate::registry::SlotKey;
use crate::session::{
    InboundTrack, MediaKind, MediaPlatform, MediaSurface, PeerConnection, TrackSink, WhepTransport,
};

/// Peer connection that records calls and emits one video and one audio
/// track once the answer is applied
#[derive(Debug)]
pub struct RecordingPeer {
    index: usize,
    tracks: TrackSink,
    transceivers: Mutex<Vec<MediaKind>>,
    remote_answer: Mutex<Option<String>>,
    closed: AtomicBool,
    tracks_stopped: AtomicBool,
    fail_close: bool,
}

impl RecordingPeer {
    /// Transceivers declared so far
    pub fn transceivers(&self) -> Vec<MediaKind> {
        self.transceivers.lock().clone()
    }

    /// Answer applied, if any
    pub fn remote_answer(&self) -> Option<String> {
        self.remote_answer.lock().clone()
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn tracks_stopped(&self) -> bool {
        self.tracks_stopped.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PeerConnection for RecordingPeer {
    fn add_recvonly_transceiver(&self, kind: MediaKind) -> Result<(), PeerError> {
        if self.is_closed() {
            return Err(PeerError::new("peer connection closed"));
        }
        self.transceivers.lock().push(kind);
        Ok(())
    }

    async fn create_offer(&self) -> Result<String, PeerError> {
        Ok(format!("v=0\r\no=- {} 0 IN IP4 0.0.0.0\r\ns=offer\r\n", self.index))
    }

    async fn set_local_description(&self, _sdp: &str) -> Result<(), PeerError> {
        Ok(())
    }

    async fn set_remote_answer(&self, sdp: &str) -> Result<(), PeerError> {
        if self.is_closed() {
            return Err(PeerError::new("peer connection closed"));
        }
        *self.remote_answer.lock() = Some(sdp.to_string());

        // Audio first: arrival order is not guaranteed
        let _ = self
            .tracks
            .send(InboundTrack::new(format!("audio-{}", self.index), MediaKind::Audio));
        let _ = self
            .tracks
            .send(InboundTrack::new(format!("video-{}", self.index), MediaKind::Video));
        Ok(())
    }

    fn stop_tracks(&self) -> Result<(), PeerError> {
        self.tracks_stopped.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn close(&self) -> Result<(), PeerError> {
        self.closed.store(true, Ordering::SeqCst);
        if self.fail_close {
            return Err(PeerError::new("transport already broken"));
        }
        Ok(())
    }
}

/// Surface that records attach/detach and the tracks it holds
#[derive(Debug, Default)]
pub struct RecordingSurface {
    attached: AtomicBool,
    attach_count: AtomicUsize,
    detach_count: AtomicUsize,
    tracks: Mutex<Vec<InboundTrack>>,
    muted: AtomicBool,
    paused: AtomicBool,
}

impl RecordingSurface {
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    pub fn is_detached(&self) -> bool {
        !self.is_attached()
    }

    pub fn attach_count(&self) -> usize {
        self.attach_count.load(Ordering::SeqCst)
    }

    pub fn detach_count(&self) -> usize {
        self.detach_count.load(Ordering::SeqCst)
    }

    /// Tracks in the current media element's stream
    pub fn tracks(&self) -> Vec<InboundTrack> {
        self.tracks.lock().clone()
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::SeqCst)
    }
}

impl MediaSurface for RecordingSurface {
    fn attach(&self, muted: bool) {
        self.tracks.lock().clear();
        self.muted.store(muted, Ordering::SeqCst);
        self.paused.store(false, Ordering::SeqCst);
        self.attached.store(true, Ordering::SeqCst);
        self.attach_count.fetch_add(1, Ordering::SeqCst);
    }

    fn add_track(&self, track: InboundTrack) {
        self.tracks.lock().push(track);
    }

    fn set_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    fn pause(&self) {
        self.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.paused.store(false, Ordering::SeqCst);
    }

    fn detach(&self) {
        self.tracks.lock().clear();
        self.attached.store(false, Ordering::SeqCst);
        self.detach_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// Platform backed by [`RecordingPeer`] and [`RecordingSurface`]
#[derive(Debug, Default)]
pub struct RecordingPlatform {
    peers: Mutex<Vec<Arc<RecordingPeer>>>,
    surfaces: Mutex<HashMap<SlotKey, Arc<RecordingSurface>>>,
    fail_peer_creation: AtomicBool,
    fail_close: AtomicBool,
}

impl RecordingPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `create_peer` fail
    pub fn fail_peer_creation(&self, fail: bool) {
        self.fail_peer_creation.store(fail, Ordering::SeqCst);
    }

    /// Make `close` on newly created peers report an error
    pub fn fail_close(&self, fail: bool) {
        self.fail_close.store(fail, Ordering::SeqCst);
    }

    /// Every peer created so far
    pub fn peers(&self) -> Vec<Arc<RecordingPeer>> {
        self.peers.lock().clone()
    }

    pub fn peers_created(&self) -> usize {
        self.peers.lock().len()
    }

    /// Peers not yet closed
    pub fn open_peers(&self) -> usize {
        self.peers.lock().iter().filter(|p| !p.is_closed()).count()
    }

    /// Surface handed out for a slot, if any
    pub fn surface_for(&self, slot: &SlotKey) -> Option<Arc<RecordingSurface>> {
        self.surfaces.lock().get(slot).cloned()
    }

    /// Slots whose surface currently shows a media element
    pub fn attached_slots(&self) -> Vec<SlotKey> {
        let mut slots: Vec<SlotKey> = self
            .surfaces
            .lock()
            .iter()
            .filter(|(_, s)| s.is_attached())
            .map(|(slot, _)| slot.clone())
            .collect();
        slots.sort();
        slots
    }
}

impl MediaPlatform for RecordingPlatform {
    fn create_peer(&self, tracks: TrackSink) -> Result<Arc<dyn PeerConnection>, PeerError> {
        if self.fail_peer_creation.load(Ordering::SeqCst) {
            return Err(PeerError::new("peer connection unavailable"));
        }

        let mut peers = self.peers.lock();
        let peer = Arc::new(RecordingPeer {
            index: peers.len(),
            tracks,
            transceivers: Mutex::new(Vec::new()),
            remote_answer: Mutex::new(None),
            closed: AtomicBool::new(false),
            tracks_stopped: AtomicBool::new(false),
            fail_close: self.fail_close.load(Ordering::SeqCst),
        });
        peers.push(Arc::clone(&peer));
        Ok(peer)
    }

    fn surface(&self, slot: &SlotKey) -> Arc<dyn MediaSurface> {
        let surface = self
            .surfaces
            .lock()
            .entry(slot.clone())
            .or_default()
            .clone();
        surface
    }
}

/// Scripted reply for one URL
#[derive(Debug, Clone)]
enum Reply {
    Status(u16),
    Hold(Arc<Semaphore>),
}

/// WHEP transport answering from a script
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<HashMap<String, Reply>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer offers to `url` with a non-success status
    pub fn fail(&self, url: &str, status: u16) {
        self.replies
            .lock()
            .insert(url.to_string(), Reply::Status(status));
    }

    /// Keep offers to `url` pending until [`release`](Self::release)
    pub fn hold(&self, url: &str) {
        self.replies
            .lock()
            .insert(url.to_string(), Reply::Hold(Arc::new(Semaphore::new(0))));
    }

    /// Let one held offer to `url` complete successfully
    pub fn release(&self, url: &str) {
        if let Some(Reply::Hold(gate)) = self.replies.lock().get(url) {
            gate.add_permits(1);
        }
    }

    /// Every `(url, offer)` received, in order
    pub fn requests(&self) -> Vec<(String, String)> {
        self.requests.lock().clone()
    }

    /// Number of offers sent to `url`
    pub fn request_count(&self, url: &str) -> usize {
        self.requests.lock().iter().filter(|(u, _)| u == url).count()
    }
}

#[async_trait]
impl WhepTransport for ScriptedTransport {
    async fn exchange(&self, url: &str, offer: &str) -> Result<String, NegotiationError> {
        self.requests
            .lock()
            .push((url.to_string(), offer.to_string()));

        let reply = self.replies.lock().get(url).cloned();
        match reply {
            Some(Reply::Status(status)) => Err(NegotiationError::Status(status)),
            Some(Reply::Hold(gate)) => {
                let permit = gate
                    .acquire()
                    .await
                    .map_err(|_| NegotiationError::Cancelled)?;
                permit.forget();
                Ok(answer_for(url))
            }
            None => Ok(answer_for(url)),
        }
    }
}

fn answer_for(url: &str) -> String {
    format!("v=0\r\ns=answer {}\r\n", url)
}
