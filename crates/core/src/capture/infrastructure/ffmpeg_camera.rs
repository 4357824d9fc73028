use crate::capture::domain::frame_source::{CameraBackend, CaptureError, FrameSource};
use crate::shared::constants::{CAPTURE_FRAME_RATE, FRAME_HEIGHT, FRAME_WIDTH};
use crate::shared::frame::Frame;

#[cfg(target_os = "macos")]
const INPUT_FORMAT: &str = "avfoundation";
#[cfg(target_os = "windows")]
const INPUT_FORMAT: &str = "vfwcap";
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const INPUT_FORMAT: &str = "v4l2";

/// Opens webcams through libavdevice (v4l2, AVFoundation or VfW).
pub struct FfmpegCamera {
    width: u32,
    height: u32,
}

impl FfmpegCamera {
    /// `width`/`height` are requested from the device; it may pick another size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for FfmpegCamera {
    fn default() -> Self {
        Self::new(FRAME_WIDTH, FRAME_HEIGHT)
    }
}

impl CameraBackend for FfmpegCamera {
    fn open(&self, device_index: u32) -> Result<Box<dyn FrameSource>, CaptureError> {
        let open_err = |e: &dyn std::fmt::Display| CaptureError::Open {
            index: device_index,
            reason: e.to_string(),
        };

        ffmpeg_next::init().map_err(|e| open_err(&e))?;

        let format = ffmpeg_next::device::input::video()
            .find(|f| matches_input_name(f.name(), INPUT_FORMAT))
            .ok_or(CaptureError::NoInputFormat(INPUT_FORMAT))?;

        let url = device_url(device_index);
        let requested = CaptureMode::Requested {
            width: self.width,
            height: self.height,
            frame_rate: CAPTURE_FRAME_RATE,
        };
        let ictx = open_with_fallback(requested, |mode| {
            ffmpeg_next::format::open_with(&url, &format, mode.options())
        })
        .map_err(|e| open_err(&e))?
        .input();

        let stream = ictx
            .streams()
            .best(ffmpeg_next::media::Type::Video)
            .ok_or_else(|| open_err(&"device exposes no video stream"))?;
        let stream_index = stream.index();
        let decoder = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .and_then(|ctx| ctx.decoder().video())
            .map_err(|e| open_err(&e))?;

        log::info!(
            "Opened camera {device_index} ({url}) via {INPUT_FORMAT}, {}x{}",
            decoder.width(),
            decoder.height()
        );

        Ok(Box::new(FfmpegFrameSource {
            device: Some(OpenDevice {
                ictx,
                decoder,
                scaler: None,
                stream_index,
            }),
            frame_index: 0,
        }))
    }
}

/// A live capture handle. Decoded frames are converted to RGB24.
pub struct FfmpegFrameSource {
    device: Option<OpenDevice>,
    frame_index: usize,
}

struct OpenDevice {
    ictx: ffmpeg_next::format::context::Input,
    decoder: ffmpeg_next::decoder::Video,
    scaler: Option<ffmpeg_next::software::scaling::Context>,
    stream_index: usize,
}

// Safety: the handle is used by one thread at a time; callers serialise
// access behind a mutex. The raw ffmpeg pointers are never shared.
unsafe impl Send for FfmpegFrameSource {}

impl FrameSource for FfmpegFrameSource {
    fn read(&mut self) -> Result<Option<Frame>, Box<dyn std::error::Error>> {
        let Some(device) = self.device.as_mut() else {
            return Ok(None);
        };

        let Some(decoded) = device.next_decoded()? else {
            return Ok(None);
        };

        let width = decoded.width();
        let height = decoded.height();
        if width == 0 || height == 0 {
            return Ok(None);
        }

        // The pixel format is only reliable once the first picture decodes.
        if device.scaler.is_none() {
            device.scaler = Some(ffmpeg_next::software::scaling::Context::get(
                decoded.format(),
                width,
                height,
                ffmpeg_next::format::Pixel::RGB24,
                width,
                height,
                ffmpeg_next::software::scaling::Flags::BILINEAR,
            )?);
        }
        let Some(scaler) = device.scaler.as_mut() else {
            return Ok(None);
        };

        let mut rgb = ffmpeg_next::util::frame::video::Video::empty();
        scaler.run(&decoded, &mut rgb)?;

        let pixels = extract_rgb_pixels(&rgb, width, height);
        let frame = Frame::new(pixels, width, height, 3, self.frame_index);
        self.frame_index += 1;
        Ok(Some(frame))
    }

    fn release(&mut self) {
        if self.device.take().is_some() {
            log::debug!("Capture device closed after {} frames", self.frame_index);
        }
    }
}

impl OpenDevice {
    /// Pulls packets until the decoder yields one picture.
    fn next_decoded(
        &mut self,
    ) -> Result<Option<ffmpeg_next::util::frame::video::Video>, Box<dyn std::error::Error>> {
        let mut decoded = ffmpeg_next::util::frame::video::Video::empty();
        if self.decoder.receive_frame(&mut decoded).is_ok() {
            return Ok(Some(decoded));
        }

        let Some((stream, packet)) = self.ictx.packets().next() else {
            return Ok(None);
        };
        if stream.index() != self.stream_index {
            return Ok(None);
        }

        self.decoder.send_packet(&packet)?;
        if self.decoder.receive_frame(&mut decoded).is_ok() {
            Ok(Some(decoded))
        } else {
            Ok(None)
        }
    }
}

/// What the device is asked for when it is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CaptureMode {
    Requested {
        width: u32,
        height: u32,
        frame_rate: u32,
    },
    /// Whatever the driver picks. Some cameras reject exact rates,
    /// e.g. AVFoundation devices running at 30.000030 fps.
    DeviceDefault,
}

impl CaptureMode {
    fn options(self) -> ffmpeg_next::Dictionary<'static> {
        let mut options = ffmpeg_next::Dictionary::new();
        if let CaptureMode::Requested {
            width,
            height,
            frame_rate,
        } = self
        {
            options.set("video_size", &format!("{width}x{height}"));
            options.set("framerate", &frame_rate.to_string());
        }
        options
    }
}

/// Opens with `first`, then once more with device defaults if that fails.
fn open_with_fallback<T, E: std::fmt::Display>(
    first: CaptureMode,
    mut open: impl FnMut(CaptureMode) -> Result<T, E>,
) -> Result<T, E> {
    match open(first) {
        Ok(opened) => Ok(opened),
        Err(e) if first != CaptureMode::DeviceDefault => {
            log::warn!("Camera rejected {first:?} ({e}), retrying with device defaults");
            open(CaptureMode::DeviceDefault)
        }
        Err(e) => Err(e),
    }
}

fn device_url(index: u32) -> String {
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        format!("/dev/video{index}")
    }
    #[cfg(any(target_os = "macos", target_os = "windows"))]
    {
        index.to_string()
    }
}

/// libavformat names are comma-separated aliases, e.g. `video4linux2,v4l2`.
fn matches_input_name(names: &str, wanted: &str) -> bool {
    names.split(',').any(|name| name.trim() == wanted)
}

/// Copies an RGB24 picture into a tightly packed buffer, dropping row padding.
fn extract_rgb_pixels(
    rgb_frame: &ffmpeg_next::util::frame::video::Video,
    width: u32,
    height: u32,
) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let data = rgb_frame.data(0);
    let row_bytes = width as usize * 3;

    let mut pixels = Vec::with_capacity(row_bytes * height as usize);
    for row in 0..height as usize {
        let start = row * stride;
        pixels.extend_from_slice(&data[start..start + row_bytes]);
    }
    pixels
}
