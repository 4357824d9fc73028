pub mod config;
pub mod constants;
pub mod display_image;
pub mod frame;
pub mod notice;
pub mod region;
