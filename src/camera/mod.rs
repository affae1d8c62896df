//! Camera state and projection math.

pub use self::viewer_camera3d::{ViewerCamera3d, DOLLY_SPEED, PAN_SPEED};

mod viewer_camera3d;
