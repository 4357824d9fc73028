use std::path::PathBuf;

use super::constants::{
    CASCADE_PATH, DEFAULT_DEVICE_INDEX, FRAME_HEIGHT, FRAME_WIDTH, SNAPSHOT_DIR,
};

/// Tuning passed through to the cascade classifier's multi-scale search.
#[derive(Clone, Debug, PartialEq)]
pub struct CascadeParams {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    /// Smallest face edge in pixels; 0 lets the classifier decide.
    pub min_size: i32,
}

impl Default for CascadeParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 3,
            min_size: 0,
        }
    }
}

/// Runtime configuration. Built from compile-time defaults; never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub device_index: u32,
    pub cascade_path: PathBuf,
    pub snapshot_dir: PathBuf,
    pub frame_width: u32,
    pub frame_height: u32,
    pub cascade: CascadeParams,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            device_index: DEFAULT_DEVICE_INDEX,
            cascade_path: PathBuf::from(CASCADE_PATH),
            snapshot_dir: PathBuf::from(SNAPSHOT_DIR),
            frame_width: FRAME_WIDTH,
            frame_height: FRAME_HEIGHT,
            cascade: CascadeParams::default(),
        }
    }
}
