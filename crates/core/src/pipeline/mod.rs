pub mod annotate_frame_use_case;
pub mod capture_loop;
