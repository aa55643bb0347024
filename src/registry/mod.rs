//! Session registry
//!
//! Maps each rendering slot to its live session. The registry is the single
//! source of truth for which sessions exist and is owned by the layout
//! coordinator.
//!
//! # Invariant
//!
//! ```text
//!   slots:  main      thumb/a     thumb/b     grid/c
//!             │          │           │           │
//!             ▼          ▼           ▼           ▼
//!         Session#4  Session#7   (none)      (none)
//! ```
//!
//! At most one session per slot. Installing a session into an occupied slot
//! destroys the previous occupant before the new one starts negotiating.

pub mod slot;
pub mod store;

pub use slot::{SlotKey, SlotKind};
pub use store::SessionRegistry;
