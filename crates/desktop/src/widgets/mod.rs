pub mod label_prompt;
pub mod video_panel;
