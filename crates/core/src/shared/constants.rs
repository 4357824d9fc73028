pub const CASCADE_PATH: &str = "resources/haarcascade_frontalface_default.xml";
pub const SNAPSHOT_DIR: &str = "snapshots";

pub const DEFAULT_DEVICE_INDEX: u32 = 0;
pub const FRAME_WIDTH: u32 = 640;
pub const FRAME_HEIGHT: u32 = 480;
pub const CAPTURE_FRAME_RATE: u32 = 30;

/// Face outline colour (RGB) and stroke width in pixels.
pub const OVERLAY_COLOR: [u8; 3] = [0, 255, 0];
pub const OVERLAY_THICKNESS: u32 = 2;

pub const SNAPSHOT_PREFIX: &str = "snapshot_";
pub const SNAPSHOT_EXTENSION: &str = "png";

/// Annotated frames waiting for the UI; new frames are dropped while it is full.
pub const FRAME_CHANNEL_CAPACITY: usize = 2;

/// Reads a snapshot may spend waiting for the decoder to yield a picture.
pub const SNAPSHOT_READ_ATTEMPTS: usize = 10;
