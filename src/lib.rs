//! whep-wall: session lifecycle and layout coordination for multi-camera
//! WHEP viewers
//!
//! The crate keeps a wall of live camera tiles consistent: which camera is
//! main, the thumbnail order, the layout and grid page, and exactly one
//! receive-only WHEP session per visible tile with a playable source.
//! Rendering and the WebRTC stack itself sit behind the
//! [`MediaPlatform`](session::MediaPlatform) seam; the WHEP POST goes
//! through [`WhepTransport`](session::WhepTransport).
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use whep_wall::layout::LayoutMode;
//! use whep_wall::session::{HttpWhepTransport, MediaPlatform};
//! use whep_wall::{LayoutCoordinator, ViewerConfig};
//!
//! // `platform` wraps the host's WebRTC stack and video elements
//! async fn run(platform: Arc<dyn MediaPlatform>) -> whep_wall::Result<()> {
//!     let mut viewer = LayoutCoordinator::with_file_store(
//!         ViewerConfig::default(),
//!         platform,
//!         Arc::new(HttpWhepTransport::new()),
//!         "viewer-state.json",
//!     )?;
//!
//!     viewer.start();
//!     viewer.set_layout(LayoutMode::Grid2);
//!     while let Some(event) = viewer.process_next_event().await {
//!         println!("{} -> {:?}", event.slot, event.outcome);
//!     }
//!     Ok(())
//! }
//! ```

pub mod camera;
pub mod config;
pub mod error;
pub mod layout;
pub mod registry;
pub mod session;
pub mod stats;
pub mod storage;
pub mod testing;

pub use camera::{CameraDescriptor, CameraSet};
pub use config::ViewerConfig;
pub use error::{Error, Result};
pub use layout::{LayoutCoordinator, LayoutMode, TileAction, ViewPlan};
pub use registry::{SessionRegistry, SlotKey};
pub use session::{Session, SessionEvent, SessionOutcome, SessionPhase};
