//! View planning
//!
//! Turns the view state into the set of slots that must exist. Planning is
//! pure: it never touches sessions. The coordinator diffs the plan against
//! the registry.

use crate::camera::CameraDescriptor;
use crate::registry::SlotKey;
use crate::storage::ViewState;

use super::mode::{LayoutMode, Pagination};

/// Title shown for the main view when there is no main camera
pub const NO_MAIN_TITLE: &str = "—";

/// What a tile currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileStatus {
    /// Camera has no playable URL; static "no source" indicator
    NoSource,
    /// Session created, waiting for the answer
    Negotiating,
    /// Answer applied, media may flow
    Live,
    /// Negotiation failed; no media
    Failed,
}

/// One rendered slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileView {
    pub slot: SlotKey,
    pub camera_id: String,
    /// Badge text (name, or id when unnamed)
    pub label: String,
    /// Playable WHEP URL, `None` for a placeholder tile
    pub source_url: Option<String>,
    pub status: TileStatus,
}

impl TileView {
    fn new(slot: SlotKey, camera: &CameraDescriptor) -> Self {
        let source_url = camera.playable_url().map(str::to_string);
        let status = if source_url.is_some() {
            TileStatus::Negotiating
        } else {
            TileStatus::NoSource
        };
        Self {
            slot,
            camera_id: camera.id.clone(),
            label: camera.label().to_string(),
            source_url,
            status,
        }
    }
}

/// Slot needing a session: `(slot, camera id, url)`
pub type RequiredSession<'a> = (&'a SlotKey, &'a str, &'a str);

/// Everything presentation needs to render the current view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewPlan {
    pub layout: LayoutMode,
    /// Main tile (Sidebar with a non-empty camera set only)
    pub main: Option<TileView>,
    /// Thumbnails in Sidebar, the current page's cells in Grid
    pub tiles: Vec<TileView>,
    /// Clamped 1-based page (always 1 in Sidebar)
    pub page: u32,
    pub total_pages: u32,
    pub camera_count: usize,
    pub thumb_height: u32,
}

impl ViewPlan {
    /// Compute the required slots for a view state
    pub fn build(state: &ViewState, pagination: &Pagination) -> Self {
        let cameras = &state.cameras;

        let (main, tiles, page, total_pages) = match state.layout {
            LayoutMode::Sidebar => {
                let main = cameras.main().map(|c| TileView::new(SlotKey::Main, c));
                let tiles = cameras
                    .thumbnails()
                    .map(|c| TileView::new(SlotKey::thumbnail(c.id.clone()), c))
                    .collect();
                (main, tiles, 1, 1)
            }
            LayoutMode::Grid2 | LayoutMode::Grid3 => {
                let total = cameras.len();
                let page = pagination.clamp(state.page, total);
                let tiles = cameras.cameras()[pagination.slice(page, total)]
                    .iter()
                    .map(|c| TileView::new(SlotKey::grid(c.id.clone()), c))
                    .collect();
                (None, tiles, page, pagination.total_pages(total))
            }
        };

        Self {
            layout: state.layout,
            main,
            tiles,
            page,
            total_pages,
            camera_count: cameras.len(),
            thumb_height: state.thumb_height,
        }
    }

    /// Every tile, main first
    pub fn all_tiles(&self) -> impl Iterator<Item = &TileView> {
        self.main.iter().chain(self.tiles.iter())
    }

    /// Mutable access to every tile, main first
    pub fn all_tiles_mut(&mut self) -> impl Iterator<Item = &mut TileView> {
        self.main.iter_mut().chain(self.tiles.iter_mut())
    }

    /// Slots that must host a session, in render order
    pub fn required_sessions(&self) -> Vec<RequiredSession<'_>> {
        self.all_tiles()
            .filter_map(|t| {
                t.source_url
                    .as_deref()
                    .map(|url| (&t.slot, t.camera_id.as_str(), url))
            })
            .collect()
    }

    /// Find the tile for a slot
    pub fn tile(&self, slot: &SlotKey) -> Option<&TileView> {
        self.all_tiles().find(|t| &t.slot == slot)
    }

    /// Page indicator text, `"<page>/<total>"`
    pub fn page_info(&self) -> String {
        format!("{}/{}", self.page, self.total_pages)
    }

    /// Main view title
    pub fn main_title(&self) -> &str {
        self.main.as_ref().map_or(NO_MAIN_TITLE, |m| m.label.as_str())
    }
}
