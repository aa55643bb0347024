//! Layout and view coordination
//!
//! - [`mode`]: layout modes and grid pagination
//! - [`plan`]: pure mapping from view state to required slots
//! - [`coordinator`]: applies user intents, diffs the plan against the
//!   session registry and persists the result

pub mod coordinator;
pub mod mode;
pub mod plan;

pub use coordinator::{LayoutCoordinator, TileAction};
pub use mode::{LayoutMode, Pagination, UnknownLayout};
pub use plan::{RequiredSession, TileStatus, TileView, ViewPlan, NO_MAIN_TITLE};
