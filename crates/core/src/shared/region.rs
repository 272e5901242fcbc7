use std::fmt;
use std::str::FromStr;

/// A rectangle in image pixel coordinates: origin plus extent.
///
/// A region is only meaningful when `width > 0` and `height > 0`; callers
/// check [`Region::is_empty`] before using it to address pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
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

    /// The full extent of a `width × height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width as i32, height as i32)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// True when `other` is non-empty and lies entirely inside `self`.
    pub fn contains(&self, other: &Region) -> bool {
        !other.is_empty()
            && other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The one-row slice of this region at image row `y`.
    pub fn row(&self, y: i32) -> Region {
        Region::new(self.x, y, self.width, 1)
    }

    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }

    /// Bytes needed to hold this region with `channels` interleaved bytes per pixel.
    pub fn byte_len(&self, channels: usize) -> usize {
        self.area() * channels
    }

    /// Bytes in one row of this region.
    pub fn row_len(&self, channels: usize) -> usize {
        self.width.max(0) as usize * channels
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{}+{}+{}",
            self.width, self.height, self.x, self.y
        )
    }
}

/// Parses `X,Y,W,H`.
impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 4 {
            return Err(format!("expected X,Y,W,H but got '{s}'"));
        }
        let mut values = [0i32; 4];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| format!("'{part}' is not an integer in region '{s}'"))?;
        }
        Ok(Region::new(values[0], values[1], values[2], values[3]))
    }
}
