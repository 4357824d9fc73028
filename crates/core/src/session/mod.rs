pub mod app_controller;
pub mod running_state;
pub mod shared_camera;
