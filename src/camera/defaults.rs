//! Built-in seed configuration

use super::descriptor::CameraDescriptor;

/// Thumbnail height in pixels
pub const DEFAULT_THUMB_HEIGHT: u32 = 180;

/// Grid tiles per page
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Cameras used when no valid persisted or imported configuration exists
pub fn default_cameras() -> Vec<CameraDescriptor> {
    [("front_cam", "Front"), ("door_cam", "Door"), ("rear_cam", "Rear")]
        .into_iter()
        .map(|(id, name)| {
            CameraDescriptor::with_url(id, name, format!("http://localhost:8889/{id}/whep"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cameras_are_playable() {
        let cams = default_cameras();
        assert_eq!(cams.len(), 3);
        assert_eq!(cams[0].id, "front_cam");
        assert_eq!(
            cams[1].playable_url(),
            Some("http://localhost:8889/door_cam/whep")
        );
        assert!(cams.iter().all(|c| c.playable_url().is_some()));
    }
}
