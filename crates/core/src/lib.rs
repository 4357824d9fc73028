pub mod capture;
pub mod detection;
pub mod overlay;
pub mod pipeline;
pub mod session;
pub mod shared;
pub mod snapshot;
pub mod video;
