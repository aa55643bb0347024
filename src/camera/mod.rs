//! Camera set model
//!
//! The ordered list of configured cameras, the main selection, and the JSON
//! form used for import, export and persistence.

pub mod codec;
pub mod defaults;
pub mod descriptor;
pub mod set;

pub use codec::{export_camera_list, parse_camera_list, validate_descriptors};
pub use defaults::{default_cameras, DEFAULT_PAGE_SIZE, DEFAULT_THUMB_HEIGHT};
pub use descriptor::CameraDescriptor;
pub use set::CameraSet;
