use super::frame::Frame;

/// An RGBA8 image ready to hand to the display surface.
///
/// Built on the capture thread so the UI thread only wraps the bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl DisplayImage {
    pub fn from_frame(frame: &Frame) -> Self {
        let pixels = frame.data();
        let rgba = match frame.channels() {
            1 => pixels.iter().flat_map(|&v| [v, v, v, u8::MAX]).collect(),
            3 => pixels
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], u8::MAX])
                .collect(),
            4 => pixels.to_vec(),
            n => {
                log::warn!("Cannot display {n}-channel frame, showing black");
                vec![0; (frame.width() as usize) * (frame.height() as usize) * 4]
            }
        };
        Self {
            width: frame.width(),
            height: frame.height(),
            rgba,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    pub fn into_rgba(self) -> Vec<u8> {
        self.rgba
    }
}
