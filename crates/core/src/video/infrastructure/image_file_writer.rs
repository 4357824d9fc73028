use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use crate::shared::frame::Frame;
use crate::video::domain::image_writer::ImageWriter;

/// Writes frames as lossless PNG files using the `image` crate.
pub struct ImageFileWriter;

impl ImageFileWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageFileWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageWriter for ImageFileWriter {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), Box<dyn std::error::Error>> {
        let color = color_type(frame.channels())?;

        let file = OpenOptions::new().write(true).create_new(true).open(path)?;
        let mut out = BufWriter::new(file);

        let encoded = PngEncoder::new(&mut out)
            .write_image(frame.data(), frame.width(), frame.height(), color)
            .map_err(Box::<dyn std::error::Error>::from)
            .and_then(|()| out.flush().map_err(Into::into));

        if let Err(e) = encoded {
            drop(out);
            let _ = fs::remove_file(path);
            return Err(e);
        }
        Ok(())
    }
}

fn color_type(channels: u8) -> Result<ExtendedColorType, Box<dyn std::error::Error>> {
    match channels {
        1 => Ok(ExtendedColorType::L8),
        3 => Ok(ExtendedColorType::Rgb8),
        4 => Ok(ExtendedColorType::Rgba8),
        n => Err(format!("cannot encode {n}-channel frame as PNG").into()),
    }
}
