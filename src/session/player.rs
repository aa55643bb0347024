//! WHEP receive-only session
//!
//! A [`Session`] is built inert and only touches the platform once
//! [`start`](Session::start) is called. Starting attaches a fresh media
//! element to the slot surface, creates a peer connection, and spawns the
//! negotiation as a task. [`destroy`](Session::destroy) aborts that task,
//! stops every track, closes the transport and detaches the surface.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::error::NegotiationError;
use crate::registry::SlotKey;
use crate::stats::SessionStats;

use super::context::{SessionContext, SessionOptions};
use super::platform::{InboundTrack, MediaKind, MediaPlatform, MediaSurface, PeerConnection};
use super::state::{SessionEvent, SessionOutcome, SessionPhase, SessionState};
use super::whep::WhepTransport;

/// Collaborators shared by every session of a viewer
#[derive(Clone)]
pub struct SessionEnv {
    pub platform: Arc<dyn MediaPlatform>,
    pub transport: Arc<dyn WhepTransport>,
    pub events: mpsc::UnboundedSender<SessionEvent>,
}

/// One receive-only media session bound to one slot and one source URL
pub struct Session {
    ctx: SessionContext,
    env: SessionEnv,
    state: Arc<Mutex<SessionState>>,
    surface: Option<Arc<dyn MediaSurface>>,
    peer: Option<Arc<dyn PeerConnection>>,
    negotiation: Option<JoinHandle<()>>,
    track_pump: Option<JoinHandle<()>>,
    muted: bool,
    paused: bool,
    started: bool,
    destroyed: bool,
}

impl Session {
    /// Create a session without starting it
    pub fn new(ctx: SessionContext, options: SessionOptions, env: SessionEnv) -> Self {
        Self {
            ctx,
            env,
            state: Arc::new(Mutex::new(SessionState::new())),
            surface: None,
            peer: None,
            negotiation: None,
            track_pump: None,
            muted: options.start_muted,
            paused: false,
            started: false,
            destroyed: false,
        }
    }

    /// Session ID
    pub fn id(&self) -> u64 {
        self.ctx.session_id
    }

    /// Slot this session renders into
    pub fn slot(&self) -> &SlotKey {
        &self.ctx.slot
    }

    /// Identity of this session
    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> SessionPhase {
        self.state.lock().phase
    }

    /// Snapshot of the session counters
    pub fn stats(&self) -> SessionStats {
        self.state.lock().stats.clone()
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Attach the surface and begin negotiating
    ///
    /// Does nothing if the session was already started or destroyed. A
    /// failure to create the peer connection is reported like any other
    /// negotiation failure.
    pub fn start(&mut self) {
        if self.started || self.destroyed {
            return;
        }
        self.started = true;

        let surface = self.env.platform.surface(&self.ctx.slot);
        surface.attach(self.muted);
        self.surface = Some(Arc::clone(&surface));

        let (track_tx, track_rx) = mpsc::unbounded_channel();
        let peer = match self.env.platform.create_peer(track_tx) {
            Ok(peer) => peer,
            Err(e) => {
                let err = NegotiationError::from(e);
                tracing::error!(
                    slot = %self.ctx.slot,
                    session_id = self.ctx.session_id,
                    error = %err,
                    "Failed to create peer connection"
                );
                self.state.lock().on_failed();
                let _ = self.env.events.send(SessionEvent {
                    session_id: self.ctx.session_id,
                    slot: self.ctx.slot.clone(),
                    outcome: SessionOutcome::Failed(err),
                });
                return;
            }
        };
        self.peer = Some(Arc::clone(&peer));
        self.state.lock().start_negotiation();

        tracing::info!(
            slot = %self.ctx.slot,
            session_id = self.ctx.session_id,
            camera = %self.ctx.camera_id,
            url = %self.ctx.source_url,
            "Session starting"
        );

        self.track_pump = Some(tokio::spawn(pump_tracks(
            track_rx,
            surface,
            Arc::clone(&self.state),
            self.ctx.clone(),
        )));

        self.negotiation = Some(tokio::spawn(run_negotiation(
            self.ctx.clone(),
            peer,
            Arc::clone(&self.env.transport),
            Arc::clone(&self.state),
            self.env.events.clone(),
        )));
    }

    /// Suspend local playback without touching the transport
    pub fn pause(&mut self) {
        if self.destroyed {
            return;
        }
        self.paused = true;
        if let Some(surface) = &self.surface {
            surface.pause();
        }
    }

    /// Resume local playback
    pub fn resume(&mut self) {
        if self.destroyed {
            return;
        }
        self.paused = false;
        if let Some(surface) = &self.surface {
            surface.resume();
        }
    }

    /// Mute or unmute audio on the surface
    pub fn set_muted(&mut self, muted: bool) {
        if self.destroyed {
            return;
        }
        self.muted = muted;
        if let Some(surface) = &self.surface {
            surface.set_muted(muted);
        }
    }

    /// Flip the mute state, returning the new state
    pub fn toggle_muted(&mut self) -> bool {
        let muted = !self.muted;
        self.set_muted(muted);
        self.muted
    }

    /// Flip pause/resume, returning `true` if now paused
    pub fn toggle_paused(&mut self) -> bool {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
        self.paused
    }

    /// Tear the session down
    ///
    /// Idempotent and safe on a session that was never started. Errors from
    /// an already-broken transport are logged and swallowed.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.state.lock().close();

        if let Some(task) = self.negotiation.take() {
            task.abort();
        }
        if let Some(task) = self.track_pump.take() {
            task.abort();
        }

        if let Some(peer) = self.peer.take() {
            if let Err(e) = peer.stop_tracks() {
                tracing::debug!(slot = %self.ctx.slot, error = %e, "Ignoring track stop error");
            }
            if let Err(e) = peer.close() {
                tracing::debug!(slot = %self.ctx.slot, error = %e, "Ignoring close error");
            }
        }
        if let Some(surface) = self.surface.take() {
            surface.detach();
        }

        if self.started {
            tracing::info!(
                slot = %self.ctx.slot,
                session_id = self.ctx.session_id,
                "Session stopped"
            );
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("ctx", &self.ctx)
            .field("phase", &self.phase())
            .field("muted", &self.muted)
            .field("paused", &self.paused)
            .finish()
    }
}

/// Forward inbound tracks to the surface as they arrive
async fn pump_tracks(
    mut tracks: mpsc::UnboundedReceiver<InboundTrack>,
    surface: Arc<dyn MediaSurface>,
    state: Arc<Mutex<SessionState>>,
    ctx: SessionContext,
) {
    while let Some(track) = tracks.recv().await {
        // Held across add_track; destroy() closes under this lock before detaching
        let mut guard = state.lock();
        if guard.is_closed() {
            break;
        }
        guard.on_track();
        tracing::debug!(slot = %ctx.slot, track = %track.id, kind = ?track.kind, "Track attached");
        surface.add_track(track);
    }
}

async fn run_negotiation(
    ctx: SessionContext,
    peer: Arc<dyn PeerConnection>,
    transport: Arc<dyn WhepTransport>,
    state: Arc<Mutex<SessionState>>,
    events: mpsc::UnboundedSender<SessionEvent>,
) {
    let outcome = match negotiate(peer.as_ref(), transport.as_ref(), &ctx.source_url, &state).await {
        Ok(()) => {
            state.lock().on_connected();
            tracing::info!(slot = %ctx.slot, session_id = ctx.session_id, "Session established");
            SessionOutcome::Established
        }
        Err(NegotiationError::Cancelled) => SessionOutcome::Failed(NegotiationError::Cancelled),
        Err(err) => {
            tracing::error!(
                slot = %ctx.slot,
                session_id = ctx.session_id,
                camera = %ctx.camera_id,
                error = %err,
                "WHEP error"
            );
            state.lock().on_failed();
            let _ = peer.stop_tracks();
            let _ = peer.close();
            SessionOutcome::Failed(err)
        }
    };

    let _ = events.send(SessionEvent {
        session_id: ctx.session_id,
        slot: ctx.slot,
        outcome,
    });
}

/// Recv-only offer/answer exchange
async fn negotiate(
    peer: &dyn PeerConnection,
    transport: &dyn WhepTransport,
    url: &str,
    state: &Mutex<SessionState>,
) -> Result<(), NegotiationError> {
    peer.add_recvonly_transceiver(MediaKind::Video)?;
    peer.add_recvonly_transceiver(MediaKind::Audio)?;

    let offer = peer.create_offer().await?;
    peer.set_local_description(&offer).await?;

    let answer = transport.exchange(url, &offer).await?;

    // Destroyed while the request was in flight
    if state.lock().is_closed() {
        return Err(NegotiationError::Cancelled);
    }

    peer.set_remote_answer(&answer).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{RecordingPlatform, ScriptedTransport};

    fn setup() -> (
        Arc<RecordingPlatform>,
        SessionEnv,
        mpsc::UnboundedReceiver<SessionEvent>,
    ) {
        let platform = Arc::new(RecordingPlatform::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let env = SessionEnv {
            platform: platform.clone(),
            transport: Arc::new(ScriptedTransport::new()),
            events: tx,
        };
        (platform, env, rx)
    }

    fn session(env: &SessionEnv) -> Session {
        let ctx = SessionContext::new(7, SlotKey::Main, "a", "http://h/a/whep");
        Session::new(ctx, SessionOptions::default(), env.clone())
    }

    #[tokio::test]
    async fn test_new_session_is_inert() {
        let (platform, env, _rx) = setup();
        let mut s = session(&env);

        assert_eq!(s.phase(), SessionPhase::Idle);
        assert_eq!(platform.peers_created(), 0);
        assert!(platform.surface_for(&SlotKey::Main).is_none());

        // Destroying a never-started session touches nothing
        s.destroy();
        assert_eq!(s.phase(), SessionPhase::Closed);
        assert!(platform.surface_for(&SlotKey::Main).is_none());
    }

    #[tokio::test]
    async fn test_start_and_establish() {
        let (platform, env, mut rx) = setup();
        let mut s = session(&env);

        s.start();
        s.start();
        assert_eq!(platform.peers_created(), 1);
        assert_eq!(s.phase(), SessionPhase::Negotiating);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.session_id, 7);
        assert_eq!(event.outcome, SessionOutcome::Established);
        assert_eq!(s.phase(), SessionPhase::Connected);
        assert!(s.stats().setup_time.is_some());
    }

    #[tokio::test]
    async fn test_destroy_is_idempotent() {
        let (platform, env, _rx) = setup();
        platform.fail_close(true);
        let mut s = session(&env);
        s.start();

        s.destroy();
        s.destroy();

        let peer = &platform.peers()[0];
        assert!(peer.is_closed());
        assert!(peer.tracks_stopped());
        let surface = platform.surface_for(&SlotKey::Main).unwrap();
        assert_eq!(surface.detach_count(), 1);
        assert_eq!(s.phase(), SessionPhase::Closed);
    }

    #[tokio::test]
    async fn test_controls_ignored_after_destroy() {
        let (platform, env, _rx) = setup();
        let mut s = session(&env);
        s.start();
        assert!(s.is_muted());

        assert!(!s.toggle_muted());
        assert!(s.toggle_paused());

        s.destroy();
        s.set_muted(true);
        s.resume();
        assert!(!s.is_muted());
        assert!(s.is_paused());
        assert!(platform.surface_for(&SlotKey::Main).unwrap().is_detached());
    }

    /// Surface recording whether the session state was locked during add_track
    struct LockCheckingSurface {
        state: Arc<Mutex<SessionState>>,
        added: Mutex<Vec<bool>>,
    }

    impl MediaSurface for LockCheckingSurface {
        fn attach(&self, _muted: bool) {}

        fn add_track(&self, _track: InboundTrack) {
            self.added.lock().push(self.state.is_locked());
        }

        fn set_muted(&self, _muted: bool) {}

        fn pause(&self) {}

        fn resume(&self) {}

        fn detach(&self) {}
    }

    fn pump_fixture(closed: bool) -> (Arc<LockCheckingSurface>, Arc<Mutex<SessionState>>) {
        let state = Arc::new(Mutex::new(SessionState::new()));
        if closed {
            state.lock().close();
        }
        let surface = Arc::new(LockCheckingSurface {
            state: Arc::clone(&state),
            added: Mutex::new(Vec::new()),
        });
        (surface, state)
    }

    fn run_pump(surface: &Arc<LockCheckingSurface>, state: &Arc<Mutex<SessionState>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send(InboundTrack::new("video-0", MediaKind::Video)).unwrap();
        tx.send(InboundTrack::new("audio-0", MediaKind::Audio)).unwrap();
        drop(tx);

        let ctx = SessionContext::new(1, SlotKey::Main, "a", "http://h/a/whep");
        let surface: Arc<dyn MediaSurface> = surface.clone();
        tokio_test::block_on(pump_tracks(rx, surface, Arc::clone(state), ctx));
    }

    #[test]
    fn test_track_attach_is_atomic_with_close() {
        let (surface, state) = pump_fixture(false);
        run_pump(&surface, &state);

        assert_eq!(*surface.added.lock(), vec![true, true]);
        assert_eq!(state.lock().stats.tracks_received, 2);
    }

    #[test]
    fn test_no_tracks_after_close() {
        let (surface, state) = pump_fixture(true);
        run_pump(&surface, &state);

        assert!(surface.added.lock().is_empty());
        assert_eq!(state.lock().stats.tracks_received, 0);
    }

    #[tokio::test]
    async fn test_drop_destroys() {
        let (platform, env, _rx) = setup();
        {
            let mut s = session(&env);
            s.start();
        }
        assert_eq!(platform.open_peers(), 0);
    }
}
