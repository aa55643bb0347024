//! Ordered camera set with main selection
//!
//! Order is significant: it drives thumbnail and grid order. The main
//! selection always references a camera in the set, or is `None` when the set
//! is empty.

use std::collections::HashSet;

use crate::error::ReorderError;

use super::codec;
use super::descriptor::CameraDescriptor;

/// Camera list plus the designated main camera
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CameraSet {
    cameras: Vec<CameraDescriptor>,
    main_id: Option<String>,
}

impl CameraSet {
    /// Create a set, resolving `main_id` against the cameras
    ///
    /// An unknown or absent main id falls back to the first camera.
    pub fn new(cameras: Vec<CameraDescriptor>, main_id: Option<String>) -> Self {
        let mut set = Self { cameras, main_id };
        set.resolve_main();
        set
    }

    /// Cameras in display order
    pub fn cameras(&self) -> &[CameraDescriptor] {
        &self.cameras
    }

    /// Number of cameras
    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    /// Check if the set has no cameras
    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Look up a camera by id
    pub fn get(&self, id: &str) -> Option<&CameraDescriptor> {
        self.cameras.iter().find(|c| c.id == id)
    }

    /// Check if a camera with this id exists
    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Id of the main camera
    pub fn main_id(&self) -> Option<&str> {
        self.main_id.as_deref()
    }

    /// The main camera
    pub fn main(&self) -> Option<&CameraDescriptor> {
        self.main_id.as_deref().and_then(|id| self.get(id))
    }

    /// Every camera except main, in display order
    pub fn thumbnails(&self) -> impl Iterator<Item = &CameraDescriptor> {
        let main = self.main_id.as_deref();
        self.cameras.iter().filter(move |c| Some(c.id.as_str()) != main)
    }

    /// Promote a camera to main and move it to the front
    ///
    /// Returns `false` (no change) if the id is unknown or already main.
    pub fn swap_to_main(&mut self, id: &str) -> bool {
        if self.main_id.as_deref() == Some(id) {
            return false;
        }
        let Some(pos) = self.cameras.iter().position(|c| c.id == id) else {
            return false;
        };

        let camera = self.cameras.remove(pos);
        self.cameras.insert(0, camera);
        self.main_id = Some(id.to_string());
        true
    }

    /// Reorder the thumbnail strip
    ///
    /// `order` lists thumbnail ids in their new order. The main camera is never
    /// part of the reorderable strip: it is dropped from `order` if present and
    /// always placed first. Unknown and repeated ids are ignored. An ordering
    /// that omits a configured thumbnail is rejected without any change.
    pub fn reorder_thumbnails<S: AsRef<str>>(&mut self, order: &[S]) -> Result<(), ReorderError> {
        let main = self.main_id.clone();
        let mut seen = HashSet::new();
        let ordered: Vec<&str> = order
            .iter()
            .map(AsRef::as_ref)
            .filter(|id| Some(*id) != main.as_deref())
            .filter(|id| self.contains(id))
            .filter(|id| seen.insert(id.to_string()))
            .collect();

        let missing: Vec<String> = self
            .thumbnails()
            .filter(|c| !seen.contains(&c.id))
            .map(|c| c.id.clone())
            .collect();
        if !missing.is_empty() {
            return Err(ReorderError::MissingIds(missing));
        }

        let mut reordered = Vec::with_capacity(self.cameras.len());
        if let Some(main_cam) = self.main() {
            reordered.push(main_cam.clone());
        }
        for id in ordered {
            if let Some(cam) = self.get(id) {
                reordered.push(cam.clone());
            }
        }
        self.cameras = reordered;
        Ok(())
    }

    /// Replace every camera with an already-validated list
    ///
    /// Main is kept if it still exists, otherwise it falls back to the first
    /// camera (or `None` for an empty list).
    pub fn replace_all(&mut self, cameras: Vec<CameraDescriptor>) {
        self.cameras = cameras;
        self.resolve_main();
    }

    /// Export the set as a JSON array of `{ id, name, webrtc }`
    pub fn export_json(&self) -> String {
        codec::export_camera_list(&self.cameras)
    }

    fn resolve_main(&mut self) {
        let valid = self
            .main_id
            .as_deref()
            .is_some_and(|id| self.cameras.iter().any(|c| c.id == id));
        if !valid {
            self.main_id = self.cameras.first().map(|c| c.id.clone());
        }
    }
}
