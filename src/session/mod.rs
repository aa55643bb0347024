//! WHEP sessions
//!
//! One [`Session`] is one receive-only media negotiation bound to one slot
//! surface and one source URL. Negotiation runs as a spawned task and reports
//! back through a [`SessionEvent`]:
//!
//! ```text
//!   Session::start()
//!        │  surface.attach(), platform.create_peer()
//!        ▼
//!   [negotiation task] ── recvonly video+audio ── offer ──► WhepTransport
//!        │                                                      │
//!        │◄────────────────────────── answer ───────────────────┘
//!        ▼
//!   SessionEvent ──► LayoutCoordinator (applied only if still current)
//!
//!   [track pump] ── InboundTrack ──► surface.add_track()
//! ```

pub mod context;
pub mod platform;
pub mod player;
pub mod state;
pub mod whep;

pub use context::{SessionContext, SessionOptions};
pub use platform::{InboundTrack, MediaKind, MediaPlatform, MediaSurface, PeerConnection, TrackSink};
pub use player::{Session, SessionEnv};
pub use state::{SessionEvent, SessionOutcome, SessionPhase, SessionState};
pub use whep::{HttpWhepTransport, WhepTransport, SDP_CONTENT_TYPE};
