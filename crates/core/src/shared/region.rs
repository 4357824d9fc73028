/// An axis-aligned detection rectangle in frame pixel coordinates.
///
/// Coordinates may fall partly outside the frame; consumers clip as needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Region {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Region {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Intersects the region with a `frame_w` x `frame_h` frame.
    ///
    /// Returns `None` when no pixel of the region is inside the frame.
    pub fn clip_to(&self, frame_w: u32, frame_h: u32) -> Option<Region> {
        let fw = i32::try_from(frame_w).unwrap_or(i32::MAX);
        let fh = i32::try_from(frame_h).unwrap_or(i32::MAX);
        let x0 = self.x.max(0);
        let y0 = self.y.max(0);
        let x1 = self.right().min(fw);
        let y1 = self.bottom().min(fh);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some(Region::new(x0, y0, x1 - x0, y1 - y0))
    }
}
