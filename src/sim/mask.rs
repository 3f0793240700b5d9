//! Opaque-pixel bit masks ("silhouettes")
//!
//! Collision is tested on these, not on bounding boxes: sprites carry
//! transparent padding and rotation changes which pixels are occupied.
//!
//! Coordinates are screen-style: origin at the top-left, y grows downward.

use glam::IVec2;

/// A rectangular grid of opaque/transparent pixels, one bit each
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    words_per_row: usize,
    bits: Vec<u64>,
}

impl Mask {
    /// An all-transparent mask
    pub fn new(width: u32, height: u32) -> Self {
        let words_per_row = (width as usize).div_ceil(64);
        Self {
            width,
            height,
            words_per_row,
            bits: vec![0; words_per_row * height as usize],
        }
    }

    /// An all-opaque mask
    pub fn filled(width: u32, height: u32) -> Self {
        Self::from_fn(width, height, |_, _| true)
    }

    /// Build a mask by asking `opaque(x, y)` for every pixel
    pub fn from_fn(width: u32, height: u32, opaque: impl Fn(u32, u32) -> bool) -> Self {
        let mut mask = Self::new(width, height);
        for y in 0..height {
            for x in 0..width {
                if opaque(x, y) {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> IVec2 {
        IVec2::new(self.width as i32, self.height as i32)
    }

    /// Opaque test; anything outside the mask is transparent
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        let (x, y) = (x as usize, y as usize);
        let word = self.bits[y * self.words_per_row + x / 64];
        (word >> (x % 64)) & 1 == 1
    }

    pub fn set(&mut self, x: u32, y: u32, opaque: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        let word = &mut self.bits[y * self.words_per_row + x / 64];
        let bit = 1u64 << (x % 64);
        if opaque {
            *word |= bit;
        } else {
            *word &= !bit;
        }
    }

    /// Number of opaque pixels
    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Mirror top-to-bottom (used for the hanging gate piece)
    pub fn flipped_vertical(&self) -> Self {
        let mut out = Self::new(self.width, self.height);
        let wpr = self.words_per_row;
        for y in 0..self.height as usize {
            let src = (self.height as usize - 1 - y) * wpr;
            out.bits[y * wpr..(y + 1) * wpr].copy_from_slice(&self.bits[src..src + wpr]);
        }
        out
    }

    /// Rotate counter-clockwise by `degrees`.
    ///
    /// The result is sized to the bounding box of the rotated rectangle and
    /// shares its centre with the source. Quarter turns are exact.
    pub fn rotated(&self, degrees: f32) -> Self {
        let turn = degrees.rem_euclid(360.0);
        if turn == 0.0 {
            return self.clone();
        }
        if turn == 90.0 || turn == 180.0 || turn == 270.0 {
            return self.quarter_turns(turn as u32 / 90);
        }

        let (sin, cos) = turn.to_radians().sin_cos();
        let (w, h) = (self.width as f32, self.height as f32);
        let out_w = ((w * cos.abs() + h * sin.abs()) - 1e-3).ceil().max(1.0);
        let out_h = ((w * sin.abs() + h * cos.abs()) - 1e-3).ceil().max(1.0);
        let mut out = Self::new(out_w as u32, out_h as u32);

        for j in 0..out.height {
            let dy = j as f32 + 0.5 - out_h / 2.0;
            for i in 0..out.width {
                let dx = i as f32 + 0.5 - out_w / 2.0;
                // Inverse of the counter-clockwise rotation (y down)
                let sx = dx * cos - dy * sin + w / 2.0;
                let sy = dx * sin + dy * cos + h / 2.0;
                if sx >= 0.0 && sy >= 0.0 && self.get(sx.floor() as i32, sy.floor() as i32) {
                    out.set(i, j, true);
                }
            }
        }
        out
    }

    fn quarter_turns(&self, turns: u32) -> Self {
        let (w, h) = (self.width, self.height);
        let mut out = match turns {
            2 => Self::new(w, h),
            _ => Self::new(h, w),
        };
        for y in 0..h {
            for x in 0..w {
                if !self.get(x as i32, y as i32) {
                    continue;
                }
                let (dx, dy) = match turns {
                    1 => (y, w - 1 - x),
                    2 => (w - 1 - x, h - 1 - y),
                    _ => (h - 1 - y, x),
                };
                out.set(dx, dy, true);
            }
        }
        out
    }

    /// First opaque pixel shared with `other` placed at `offset`.
    ///
    /// `offset` is the position of `other`'s top-left corner in this mask's
    /// coordinates. The returned point is in this mask's coordinates.
    pub fn overlap(&self, other: &Mask, offset: IVec2) -> Option<IVec2> {
        let x0 = offset.x.max(0);
        let y0 = offset.y.max(0);
        let x1 = (offset.x + other.width as i32).min(self.width as i32);
        let y1 = (offset.y + other.height as i32).min(self.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }

        for y in y0..y1 {
            let row = y as usize * self.words_per_row;
            let mut x = x0;
            while x < x1 {
                // Jump over empty 64-pixel words of our own row
                if self.bits[row + x as usize / 64] == 0 {
                    x = (x / 64 + 1) * 64;
                    continue;
                }
                if self.get(x, y) && other.get(x - offset.x, y - offset.y) {
                    return Some(IVec2::new(x, y));
                }
                x += 1;
            }
        }
        None
    }

    #[inline]
    pub fn overlaps(&self, other: &Mask, offset: IVec2) -> bool {
        self.overlap(other, offset).is_some()
    }
}
