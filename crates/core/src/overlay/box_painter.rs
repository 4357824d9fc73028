use ndarray::s;

use crate::shared::constants::{OVERLAY_COLOR, OVERLAY_THICKNESS};
use crate::shared::frame::Frame;
use crate::shared::region::Region;

/// Draws solid rectangular outlines around detected regions, in place.
///
/// The stroke lies on the inside of each region's edges. Parts outside the
/// frame are clipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoxPainter {
    color: [u8; 3],
    thickness: u32,
}

impl BoxPainter {
    pub fn new(color: [u8; 3], thickness: u32) -> Self {
        Self { color, thickness }
    }

    pub fn paint(&self, frame: &mut Frame, regions: &[Region]) {
        let (fw, fh) = (frame.width(), frame.height());
        let t = i32::try_from(self.thickness).unwrap_or(i32::MAX);
        if t == 0 {
            return;
        }

        let values = self.channel_values(frame.channels());
        let mut pixels = frame.as_ndarray_mut();

        for region in regions {
            if region.width <= 0 || region.height <= 0 {
                continue;
            }
            let (x0, y0, x1, y1) = (region.x, region.y, region.right(), region.bottom());
            let bands = [
                Region::new(x0, y0, x1 - x0, t),
                Region::new(x0, y1 - t, x1 - x0, t),
                Region::new(x0, y0, t, y1 - y0),
                Region::new(x1 - t, y0, t, y1 - y0),
            ];

            for band in bands.iter().filter_map(|b| b.clip_to(fw, fh)) {
                let rows = band.y as usize..band.bottom() as usize;
                let cols = band.x as usize..band.right() as usize;
                for (c, &value) in values.iter().enumerate() {
                    pixels
                        .slice_mut(s![rows.clone(), cols.clone(), c])
                        .fill(value);
                }
            }
        }
    }

    /// Colour per channel for the frame layout. Single-channel frames get the
    /// brightest component so the outline stays visible.
    fn channel_values(&self, channels: u8) -> Vec<u8> {
        match channels {
            1 => vec![self.color.iter().copied().max().unwrap_or(u8::MAX)],
            n => (0..n as usize)
                .map(|c| self.color.get(c).copied().unwrap_or(u8::MAX))
                .collect(),
        }
    }
}

impl Default for BoxPainter {
    fn default() -> Self {
        Self::new(OVERLAY_COLOR, OVERLAY_THICKNESS)
    }
}
