//! Session registry implementation

use std::collections::HashMap;

use crate::session::Session;

use super::slot::SlotKey;

/// Live sessions keyed by slot
///
/// Owned by the layout coordinator; presentation code only ever sees it
/// through shared references.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    /// Map of slot to its session
    sessions: HashMap<SlotKey, Session>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a session in its slot and start it
    ///
    /// Any session already in the slot is destroyed first, so the new
    /// negotiation never overlaps the old one.
    pub fn set(&mut self, mut session: Session) {
        let slot = session.slot().clone();

        if let Some(mut previous) = self.sessions.remove(&slot) {
            previous.destroy();
            tracing::debug!(
                slot = %slot,
                previous = previous.id(),
                replacement = session.id(),
                "Replaced session"
            );
        }

        session.start();
        self.sessions.insert(slot, session);
    }

    /// Get the session in a slot
    pub fn get(&self, slot: &SlotKey) -> Option<&Session> {
        self.sessions.get(slot)
    }

    /// Get the session in a slot for playback control
    pub fn get_mut(&mut self, slot: &SlotKey) -> Option<&mut Session> {
        self.sessions.get_mut(slot)
    }

    /// Check if a slot has a session
    pub fn contains(&self, slot: &SlotKey) -> bool {
        self.sessions.contains_key(slot)
    }

    /// Check if `slot` is currently held by the session with `session_id`
    pub fn is_current(&self, slot: &SlotKey, session_id: u64) -> bool {
        self.sessions
            .get(slot)
            .is_some_and(|s| s.id() == session_id)
    }

    /// Destroy and remove the session in a slot
    ///
    /// Returns `true` if there was one.
    pub fn remove(&mut self, slot: &SlotKey) -> bool {
        match self.sessions.remove(slot) {
            Some(mut session) => {
                session.destroy();
                tracing::debug!(slot = %slot, session_id = session.id(), "Removed session");
                true
            }
            None => false,
        }
    }

    /// Destroy every session whose slot matches `predicate`
    ///
    /// Returns the number of sessions destroyed. Each teardown is independent;
    /// one broken transport does not keep the others alive.
    pub fn stop_group<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(&SlotKey) -> bool,
    {
        let slots: Vec<SlotKey> = self
            .sessions
            .keys()
            .filter(|&slot| predicate(slot))
            .cloned()
            .collect();

        for slot in &slots {
            if let Some(mut session) = self.sessions.remove(slot) {
                session.destroy();
            }
        }

        if !slots.is_empty() {
            tracing::debug!(stopped = slots.len(), remaining = self.sessions.len(), "Stopped session group");
        }
        slots.len()
    }

    /// Destroy every session
    pub fn stop_all(&mut self) -> usize {
        self.stop_group(|_| true)
    }

    /// Slots that currently have a session
    pub fn slots(&self) -> impl Iterator<Item = &SlotKey> {
        self.sessions.keys()
    }

    /// Sessions in arbitrary order
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::sync::mpsc;

    use super::*;
    use crate::session::{SessionContext, SessionEnv, SessionEvent, SessionOptions, SessionPhase};
    use crate::testing::{RecordingPlatform, ScriptedTransport};

    struct Harness {
        platform: Arc<RecordingPlatform>,
        env: SessionEnv,
        _events: mpsc::UnboundedReceiver<SessionEvent>,
        next_id: u64,
    }

    impl Harness {
        fn new() -> Self {
            let platform = Arc::new(RecordingPlatform::new());
            let (tx, rx) = mpsc::unbounded_channel();
            let env = SessionEnv {
                platform: platform.clone(),
                transport: Arc::new(ScriptedTransport::new()),
                events: tx,
            };
            Self {
                platform,
                env,
                _events: rx,
                next_id: 1,
            }
        }

        fn session(&mut self, slot: SlotKey, camera: &str) -> Session {
            let id = self.next_id;
            self.next_id += 1;
            let ctx = SessionContext::new(id, slot, camera, format!("http://h/{camera}/whep"));
            Session::new(ctx, SessionOptions::default(), self.env.clone())
        }
    }

    #[tokio::test]
    async fn test_set_replaces_existing() {
        let mut h = Harness::new();
        let mut registry = SessionRegistry::new();

        let first = h.session(SlotKey::Main, "a");
        registry.set(first);
        assert!(registry.is_current(&SlotKey::Main, 1));

        let second = h.session(SlotKey::Main, "b");
        registry.set(second);

        assert_eq!(registry.len(), 1);
        assert!(registry.is_current(&SlotKey::Main, 2));
        assert!(!registry.is_current(&SlotKey::Main, 1));
        assert_eq!(h.platform.peers_created(), 2);
        assert_eq!(h.platform.open_peers(), 1);

        // The surface was detached once and re-attached for the new session
        let surface = h.platform.surface_for(&SlotKey::Main).unwrap();
        assert_eq!(surface.attach_count(), 2);
        assert_eq!(surface.detach_count(), 1);
    }

    #[tokio::test]
    async fn test_stop_group_only_touches_matching_slots() {
        let mut h = Harness::new();
        let mut registry = SessionRegistry::new();

        registry.set(h.session(SlotKey::Main, "a"));
        registry.set(h.session(SlotKey::thumbnail("b"), "b"));
        registry.set(h.session(SlotKey::thumbnail("c"), "c"));

        assert_eq!(registry.stop_group(SlotKey::is_thumbnail), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&SlotKey::Main));
        assert_eq!(h.platform.open_peers(), 1);

        assert_eq!(registry.stop_all(), 1);
        assert!(registry.is_empty());
        assert_eq!(h.platform.open_peers(), 0);
    }

    #[tokio::test]
    async fn test_stop_all_survives_broken_transports() {
        let mut h = Harness::new();
        h.platform.fail_close(true);
        let mut registry = SessionRegistry::new();

        registry.set(h.session(SlotKey::grid("a"), "a"));
        registry.set(h.session(SlotKey::grid("b"), "b"));

        assert_eq!(registry.stop_all(), 2);
        assert!(registry.is_empty());
        assert!(h.platform.surface_for(&SlotKey::grid("a")).unwrap().is_detached());
        assert!(h.platform.surface_for(&SlotKey::grid("b")).unwrap().is_detached());
    }

    #[tokio::test]
    async fn test_remove() {
        let mut h = Harness::new();
        let mut registry = SessionRegistry::new();

        registry.set(h.session(SlotKey::thumbnail("a"), "a"));
        assert_eq!(
            registry.get(&SlotKey::thumbnail("a")).unwrap().phase(),
            SessionPhase::Negotiating
        );

        assert!(registry.remove(&SlotKey::thumbnail("a")));
        assert!(!registry.remove(&SlotKey::thumbnail("a")));
        assert_eq!(h.platform.open_peers(), 0);
    }
}
