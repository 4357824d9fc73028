pub mod snapshot_error;
pub mod snapshot_label;
pub mod snapshot_request;
pub mod snapshot_writer;
