//! Persistence
//!
//! The viewer writes its state through a string key-value store after every
//! change and reads it back once at startup.

pub mod snapshot;
pub mod store;

pub use snapshot::{StorageKeys, ViewState};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};
