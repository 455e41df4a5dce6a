use serde::Serialize;

/// Axis-aligned face rectangle in frame coordinates.
///
/// Produced by a detector for one frame and consumed read-only by the
/// stages that follow within the same iteration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
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

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Intersection with a `frame_width` x `frame_height` frame.
    ///
    /// Regions lying entirely outside collapse to zero size at the nearest
    /// edge.
    pub fn clamp_to(&self, frame_width: u32, frame_height: u32) -> Region {
        let fw = frame_width as i32;
        let fh = frame_height as i32;
        let x1 = self.x.clamp(0, fw);
        let y1 = self.y.clamp(0, fh);
        let x2 = (self.x.saturating_add(self.width.max(0))).clamp(0, fw);
        let y2 = (self.y.saturating_add(self.height.max(0))).clamp(0, fh);
        Region::new(x1, y1, x2 - x1, y2 - y1)
    }
}
