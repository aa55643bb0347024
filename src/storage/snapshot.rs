//! Persisted view state
//!
//! Five logical keys: camera list (JSON), main id, thumbnail height, layout
//! and page. Absent or malformed values fall back to configured defaults; a
//! camera list with a missing or repeated id is replaced by the default list.
//! Cameras without a source URL are kept as placeholders.

use crate::camera::codec::{decode_camera_list, encode_camera_list};
use crate::camera::CameraSet;
use crate::config::ViewerConfig;
use crate::error::StorageError;
use crate::layout::LayoutMode;

use super::store::KeyValueStore;

/// Names of the persisted keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub cameras: String,
    pub main_id: String,
    pub thumb_height: String,
    pub layout: String,
    pub page: String,
}

impl StorageKeys {
    /// Keys of the form `<prefix>.cameras`, `<prefix>.mainId`, ...
    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            cameras: format!("{prefix}.cameras"),
            main_id: format!("{prefix}.mainId"),
            thumb_height: format!("{prefix}.thumbH"),
            layout: format!("{prefix}.layout"),
            page: format!("{prefix}.page"),
        }
    }

    /// Every key
    pub fn all(&self) -> [&str; 5] {
        [
            self.cameras.as_str(),
            self.main_id.as_str(),
            self.thumb_height.as_str(),
            self.layout.as_str(),
            self.page.as_str(),
        ]
    }
}

/// Everything the viewer persists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub cameras: CameraSet,
    pub thumb_height: u32,
    pub layout: LayoutMode,
    /// 1-based grid page (clamped when the view is planned)
    pub page: u32,
}

impl ViewState {
    /// Built-in defaults from the configuration
    pub fn defaults(config: &ViewerConfig) -> Self {
        Self {
            cameras: CameraSet::new(config.default_cameras.clone(), None),
            thumb_height: config.default_thumb_height,
            layout: config.default_layout,
            page: 1,
        }
    }

    /// Read the persisted snapshot, validating each value
    pub fn load(store: &dyn KeyValueStore, keys: &StorageKeys, config: &ViewerConfig) -> Self {
        let cameras = match store.get(&keys.cameras) {
            Some(raw) => match decode_camera_list(&raw) {
                Ok(cameras) => cameras,
                Err(e) => {
                    tracing::warn!(error = %e, "Persisted camera list invalid, using defaults");
                    config.default_cameras.clone()
                }
            },
            None => config.default_cameras.clone(),
        };

        let main_id = store.get(&keys.main_id).filter(|id| !id.is_empty());

        let thumb_height = store
            .get(&keys.thumb_height)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|px| *px > 0)
            .unwrap_or(config.default_thumb_height);

        let layout = store
            .get(&keys.layout)
            .and_then(|v| v.parse().ok())
            .unwrap_or(config.default_layout);

        let page = store
            .get(&keys.page)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);

        Self {
            cameras: CameraSet::new(cameras, main_id),
            thumb_height,
            layout,
            page,
        }
    }

    /// Write every key
    pub fn save(&self, store: &mut dyn KeyValueStore, keys: &StorageKeys) -> Result<(), StorageError> {
        store.set(&keys.cameras, &encode_camera_list(self.cameras.cameras()))?;
        store.set(&keys.main_id, self.cameras.main_id().unwrap_or(""))?;
        store.set(&keys.thumb_height, &self.thumb_height.to_string())?;
        store.set(&keys.layout, self.layout.as_str())?;
        store.set(&keys.page, &self.page.to_string())?;
        Ok(())
    }

    /// Remove every key
    pub fn clear(store: &mut dyn KeyValueStore, keys: &StorageKeys) -> Result<(), StorageError> {
        for key in keys.all() {
            store.remove(key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraDescriptor;
    use crate::storage::MemoryStore;

    fn keys() -> StorageKeys {
        StorageKeys::with_prefix("nvr")
    }

    #[test]
    fn test_key_names() {
        let keys = keys();
        assert_eq!(
            keys.all(),
            ["nvr.cameras", "nvr.mainId", "nvr.thumbH", "nvr.layout", "nvr.page"]
        );
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let config = ViewerConfig::default();
        let state = ViewState::load(&MemoryStore::new(), &keys(), &config);

        assert_eq!(state, ViewState::defaults(&config));
        assert_eq!(state.cameras.main_id(), Some("front_cam"));
    }

    #[test]
    fn test_save_then_load() {
        let config = ViewerConfig::default();
        let mut store = MemoryStore::new();

        let mut state = ViewState::defaults(&config);
        state.cameras.swap_to_main("rear_cam");
        state.thumb_height = 240;
        state.layout = LayoutMode::Grid3;
        state.page = 2;
        state.save(&mut store, &keys()).unwrap();

        assert_eq!(ViewState::load(&store, &keys(), &config), state);
    }

    #[test]
    fn test_malformed_values_fall_back() {
        let config = ViewerConfig::default();
        let mut store = MemoryStore::new();
        store.set("nvr.cameras", r#"[{"name": "no id"}]"#).unwrap();
        store.set("nvr.mainId", "").unwrap();
        store.set("nvr.thumbH", "tall").unwrap();
        store.set("nvr.layout", "mosaic").unwrap();
        store.set("nvr.page", "0").unwrap();

        assert_eq!(
            ViewState::load(&store, &keys(), &config),
            ViewState::defaults(&config)
        );
    }

    #[test]
    fn test_legacy_url_field_accepted() {
        let config = ViewerConfig::default();
        let mut store = MemoryStore::new();
        store
            .set("nvr.cameras", r#"[{"id": "a", "url": "http://h/a/whep"}, {"id": "b", "webrtc": "http://h/b/whep"}]"#)
            .unwrap();
        store.set("nvr.mainId", "b").unwrap();

        let state = ViewState::load(&store, &keys(), &config);
        assert_eq!(
            state.cameras.cameras(),
            &[
                CameraDescriptor::with_url("a", "a", "http://h/a/whep"),
                CameraDescriptor::with_url("b", "b", "http://h/b/whep"),
            ]
        );
        assert_eq!(state.cameras.main_id(), Some("b"));
    }

    #[test]
    fn test_placeholder_camera_survives_reload() {
        let config = ViewerConfig::default().default_cameras(vec![
            CameraDescriptor::with_url("a", "A", "http://h/a/whep"),
            CameraDescriptor::new("b", "B", None),
        ]);
        let mut store = MemoryStore::new();

        let mut state = ViewState::defaults(&config);
        state.cameras.swap_to_main("b");
        state.save(&mut store, &keys()).unwrap();

        let loaded = ViewState::load(&store, &keys(), &config);
        assert_eq!(loaded, state);
        assert_eq!(loaded.cameras.get("b").unwrap().source_url, None);
    }

    #[test]
    fn test_clear_removes_every_key() {
        let config = ViewerConfig::default();
        let mut store = MemoryStore::new();
        ViewState::defaults(&config).save(&mut store, &keys()).unwrap();
        assert_eq!(store.len(), 5);

        ViewState::clear(&mut store, &keys()).unwrap();
        assert!(store.is_empty());
    }
}
