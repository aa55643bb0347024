//! Layout coordinator
//!
//! Owns the view state and the session registry. Every public mutation runs
//! to completion (including synchronous teardown) before returning, then
//! re-plans the view, diffs it against the registry and persists the state.
//! Negotiations run in the background and report back through
//! [`process_next_event`](LayoutCoordinator::process_next_event) or
//! [`drain_events`](LayoutCoordinator::drain_events).

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::camera::{parse_camera_list, validate_descriptors, CameraDescriptor, CameraSet};
use crate::config::ViewerConfig;
use crate::error::{ReorderError, ValidationError};
use crate::registry::{SessionRegistry, SlotKey};
use crate::session::{
    MediaPlatform, Session, SessionContext, SessionEnv, SessionEvent, SessionOptions,
    SessionOutcome, SessionPhase, WhepTransport,
};
use crate::stats::ViewerStats;
use crate::storage::{JsonFileStore, KeyValueStore, StorageKeys, ViewState};

use super::mode::{LayoutMode, Pagination};
use super::plan::{TileStatus, ViewPlan};

/// Result of activating (double-clicking) a tile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileAction {
    /// Thumbnail camera became main
    PromotedToMain(String),
    /// Presentation should toggle full-size display of this slot
    ToggleFullscreen(SlotKey),
    /// Nothing to do
    None,
}

/// Coordinates layout state, sessions and persistence
pub struct LayoutCoordinator {
    config: ViewerConfig,
    keys: StorageKeys,
    pagination: Pagination,
    state: ViewState,
    registry: SessionRegistry,
    env: SessionEnv,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    store: Box<dyn KeyValueStore>,
    next_session_id: u64,
    stats: ViewerStats,
}

impl LayoutCoordinator {
    /// Create a coordinator from the persisted snapshot in `store`
    ///
    /// No session is created until [`start`](Self::start).
    pub fn new(
        config: ViewerConfig,
        platform: Arc<dyn MediaPlatform>,
        transport: Arc<dyn WhepTransport>,
        store: impl KeyValueStore + 'static,
    ) -> Self {
        let keys = StorageKeys::with_prefix(&config.storage_prefix);
        let state = ViewState::load(&store, &keys, &config);
        let (tx, rx) = mpsc::unbounded_channel();

        Self {
            pagination: Pagination::new(config.page_size),
            config,
            keys,
            state,
            registry: SessionRegistry::new(),
            env: SessionEnv {
                platform,
                transport,
                events: tx,
            },
            events: rx,
            store: Box::new(store),
            next_session_id: 1,
            stats: ViewerStats::new(),
        }
    }

    /// Create a coordinator persisting into a JSON file at `path`
    pub fn with_file_store(
        config: ViewerConfig,
        platform: Arc<dyn MediaPlatform>,
        transport: Arc<dyn WhepTransport>,
        path: impl Into<PathBuf>,
    ) -> crate::Result<Self> {
        let store = JsonFileStore::open(path)?;
        tracing::debug!(path = %store.path().display(), "Opened state file");
        Ok(Self::new(config, platform, transport, store))
    }

    /// Render the initial view
    pub fn start(&mut self) {
        tracing::info!(
            layout = %self.state.layout,
            cameras = self.state.cameras.len(),
            "Viewer starting"
        );
        self.refresh();
    }

    /// Viewer configuration
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Current view state
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Current camera set
    pub fn cameras(&self) -> &CameraSet {
        &self.state.cameras
    }

    pub fn layout(&self) -> LayoutMode {
        self.state.layout
    }

    /// Stored 1-based page (meaningful in Grid layouts)
    pub fn page(&self) -> u32 {
        self.state.page
    }

    pub fn thumb_height(&self) -> u32 {
        self.state.thumb_height
    }

    /// Live sessions, read-only
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Number of live sessions
    pub fn live_sessions(&self) -> usize {
        self.registry.len()
    }

    pub fn stats(&self) -> &ViewerStats {
        &self.stats
    }

    /// Current view with per-tile session status
    pub fn view(&self) -> ViewPlan {
        let mut plan = ViewPlan::build(&self.state, &self.pagination);
        for tile in plan.all_tiles_mut() {
            let Some(url) = tile.source_url.as_deref() else {
                tile.status = TileStatus::NoSource;
                continue;
            };
            tile.status = match self.registry.get(&tile.slot) {
                Some(s) if s.context().matches(&tile.camera_id, url) => match s.phase() {
                    SessionPhase::Idle | SessionPhase::Negotiating => TileStatus::Negotiating,
                    SessionPhase::Connected => TileStatus::Live,
                    SessionPhase::Failed | SessionPhase::Closed => TileStatus::Failed,
                },
                _ => TileStatus::Negotiating,
            };
        }
        plan
    }

    /// Bring the registry in line with the current view
    ///
    /// Sessions of the other layout family are always stopped; within the
    /// current layout, sessions whose slot vanished or whose camera/URL
    /// changed are stopped, then missing ones are started.
    pub fn refresh(&mut self) {
        let plan = ViewPlan::build(&self.state, &self.pagination);
        if plan.layout.is_grid() {
            self.state.page = plan.page;
        }

        let stopped = if plan.layout.is_grid() {
            self.registry.stop_group(|slot| !slot.is_grid())
        } else {
            self.registry.stop_group(SlotKey::is_grid)
        };
        self.stats.sessions_stopped += stopped as u64;

        let required = plan.required_sessions();
        let obsolete: Vec<SlotKey> = self
            .registry
            .sessions()
            .filter(|s| {
                !required
                    .iter()
                    .any(|(slot, camera, url)| *slot == s.slot() && s.context().matches(camera, url))
            })
            .map(|s| s.slot().clone())
            .collect();
        for slot in &obsolete {
            if self.registry.remove(slot) {
                self.stats.sessions_stopped += 1;
            }
        }

        for (slot, camera_id, url) in required {
            if self.registry.contains(slot) {
                continue;
            }
            let session = self.new_session(slot.clone(), camera_id, url);
            self.registry.set(session);
            self.stats.sessions_started += 1;
        }

        tracing::debug!(
            layout = %plan.layout,
            page = plan.page,
            tiles = plan.all_tiles().count(),
            live = self.registry.len(),
            "View refreshed"
        );
        self.persist();
    }

    /// Promote a camera to main
    ///
    /// No-op (and no session churn) if the id is unknown or already main.
    pub fn swap_to_main(&mut self, id: &str) -> bool {
        if !self.state.cameras.swap_to_main(id) {
            return false;
        }

        if self.registry.remove(&SlotKey::thumbnail(id)) {
            self.stats.sessions_stopped += 1;
        }
        tracing::info!(camera = %id, "Camera promoted to main");
        self.refresh();
        true
    }

    /// Apply a new thumbnail order (drag-and-drop result)
    ///
    /// The thumbnail group is stopped and recreated in the new order.
    pub fn reorder_thumbnails<S: AsRef<str>>(&mut self, order: &[S]) -> Result<(), ReorderError> {
        if let Err(e) = self.state.cameras.reorder_thumbnails(order) {
            tracing::warn!(error = %e, "Thumbnail reorder rejected");
            return Err(e);
        }

        let stopped = self.registry.stop_group(SlotKey::is_thumbnail);
        self.stats.sessions_stopped += stopped as u64;
        self.refresh();
        Ok(())
    }

    /// Switch layout, tearing down every session first
    pub fn set_layout(&mut self, layout: LayoutMode) {
        tracing::info!(from = %self.state.layout, to = %layout, "Layout change");
        self.state.layout = layout;
        self.stop_all_sessions();
        self.refresh();
    }

    /// Navigate to a grid page, clamped into range
    ///
    /// Ignored in Sidebar. Returns the resulting page.
    pub fn go_to_page(&mut self, page: u32) -> u32 {
        if !self.state.layout.is_grid() {
            return self.state.page;
        }

        let page = self.pagination.clamp(page, self.state.cameras.len());
        if page == self.state.page {
            return page;
        }

        tracing::info!(from = self.state.page, to = page, "Page change");
        self.state.page = page;
        self.stop_all_sessions();
        self.refresh();
        self.state.page
    }

    /// Next grid page
    pub fn next_page(&mut self) -> u32 {
        self.go_to_page(self.state.page.saturating_add(1))
    }

    /// Previous grid page
    pub fn prev_page(&mut self) -> u32 {
        self.go_to_page(self.state.page.saturating_sub(1))
    }

    /// Change thumbnail height; presentation only
    ///
    /// Returns `false` for a zero height, which is ignored.
    pub fn set_thumb_height(&mut self, px: u32) -> bool {
        if px == 0 {
            return false;
        }
        self.state.thumb_height = px;
        self.persist();
        true
    }

    /// Replace the camera set from JSON text
    ///
    /// Validation happens before anything is stopped; a rejected batch
    /// leaves the viewer untouched.
    pub fn replace_cameras_json(&mut self, text: &str) -> Result<(), ValidationError> {
        let cameras = parse_camera_list(text).inspect_err(|e| {
            tracing::warn!(error = %e, "Camera configuration rejected");
        })?;
        self.apply_cameras(cameras);
        Ok(())
    }

    /// Replace the camera set with descriptors built in code
    pub fn replace_cameras(&mut self, cameras: Vec<CameraDescriptor>) -> Result<(), ValidationError> {
        validate_descriptors(&cameras).inspect_err(|e| {
            tracing::warn!(error = %e, "Camera configuration rejected");
        })?;
        self.apply_cameras(cameras);
        Ok(())
    }

    /// Export the camera set as JSON
    pub fn export_json(&self) -> String {
        self.state.cameras.export_json()
    }

    /// Restore built-in defaults and clear persisted state
    pub fn reset_to_defaults(&mut self) {
        tracing::info!("Resetting to defaults");
        self.stop_all_sessions();
        self.state = ViewState::defaults(&self.config);
        if let Err(e) = ViewState::clear(self.store.as_mut(), &self.keys) {
            tracing::warn!(error = %e, "Failed to clear persisted state");
        }
        self.refresh();
    }

    /// Activate a tile: thumbnails are promoted, other tiles toggle full size
    pub fn activate(&mut self, slot: &SlotKey) -> TileAction {
        match slot {
            SlotKey::Thumbnail(id) => {
                if self.swap_to_main(id) {
                    TileAction::PromotedToMain(id.clone())
                } else {
                    TileAction::None
                }
            }
            SlotKey::Main | SlotKey::Grid(_) => TileAction::ToggleFullscreen(slot.clone()),
        }
    }

    /// Toggle audio on a slot's session, returning the new muted state
    pub fn toggle_mute(&mut self, slot: &SlotKey) -> Option<bool> {
        self.registry.get_mut(slot).map(Session::toggle_muted)
    }

    /// Mute or unmute a slot's session
    pub fn set_muted(&mut self, slot: &SlotKey, muted: bool) -> bool {
        match self.registry.get_mut(slot) {
            Some(session) => {
                session.set_muted(muted);
                true
            }
            None => false,
        }
    }

    /// Toggle pause on a slot's session, returning `true` if now paused
    pub fn toggle_pause(&mut self, slot: &SlotKey) -> Option<bool> {
        self.registry.get_mut(slot).map(Session::toggle_paused)
    }

    /// Apply a negotiation result
    ///
    /// Returns `false` if the result is stale: its slot has since been
    /// reassigned or cleared.
    pub fn handle_event(&mut self, event: &SessionEvent) -> bool {
        if !self.registry.is_current(&event.slot, event.session_id) {
            self.stats.stale_results_discarded += 1;
            tracing::warn!(
                slot = %event.slot,
                session_id = event.session_id,
                "Discarding stale negotiation result"
            );
            return false;
        }

        match &event.outcome {
            SessionOutcome::Established => self.stats.sessions_established += 1,
            SessionOutcome::Failed(_) => self.stats.negotiation_failures += 1,
        }
        true
    }

    /// Wait for the next negotiation result and apply it
    pub async fn process_next_event(&mut self) -> Option<SessionEvent> {
        let event = self.events.recv().await?;
        self.handle_event(&event);
        Some(event)
    }

    /// Apply every negotiation result already received
    pub fn drain_events(&mut self) -> usize {
        let mut count = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(&event);
            count += 1;
        }
        count
    }

    /// Stop every session (view teardown)
    pub fn shutdown(&mut self) {
        self.stop_all_sessions();
        tracing::info!(stats = ?self.stats, "Viewer shut down");
    }

    fn apply_cameras(&mut self, cameras: Vec<CameraDescriptor>) {
        tracing::info!(cameras = cameras.len(), "Replacing camera configuration");
        self.stop_all_sessions();
        self.state.cameras.replace_all(cameras);
        self.state.page = 1;
        self.refresh();
    }

    fn stop_all_sessions(&mut self) {
        let stopped = self.registry.stop_all();
        self.stats.sessions_stopped += stopped as u64;
    }

    fn new_session(&mut self, slot: SlotKey, camera_id: &str, url: &str) -> Session {
        let session_id = self.next_session_id;
        self.next_session_id += 1;

        let ctx = SessionContext::new(session_id, slot, camera_id, url);
        let options = SessionOptions {
            start_muted: self.config.start_muted,
        };
        Session::new(ctx, options, self.env.clone())
    }

    fn persist(&mut self) {
        if let Err(e) = self.state.save(self.store.as_mut(), &self.keys) {
            tracing::warn!(error = %e, "Failed to persist view state");
        }
    }
}

impl Drop for LayoutCoordinator {
    fn drop(&mut self) {
        self.stop_all_sessions();
    }
}
