//! Software RGBA frame
//!
//! A headless `Renderer` that rasterises silhouettes into a pixel buffer.
//! Hosts can upload `as_bytes()` as a texture; the CLI prints `to_ascii()`.

use bytemuck::{Pod, Zeroable};
use glam::IVec2;

use super::Renderer;
use super::scene::{Banner, DrawItem};
use crate::sim::Mask;

/// One RGBA8 pixel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// Colors for game elements
pub mod colors {
    use super::Rgba;

    pub const SKY: Rgba = Rgba::rgb(70, 180, 200);
    pub const PIPE: Rgba = Rgba::rgb(100, 170, 40);
    pub const GROUND: Rgba = Rgba::rgb(210, 185, 110);
    pub const GROUND_EDGE: Rgba = Rgba::rgb(84, 168, 55);
    pub const ACTOR: Rgba = Rgba::rgb(245, 200, 66);
    pub const ACTOR_DISABLED: Rgba = Rgba::rgb(225, 75, 35);
    pub const TEXT: Rgba = Rgba::rgb(255, 255, 255);
}

/// Grass strip on top of each ground tile
const GROUND_EDGE_HEIGHT: i32 = 6;

/// Pixel size of one digit cell
const SCORE_SCALE: i32 = 6;
const SCORE_Y: i32 = 40;
/// Generation counter, top-left corner
const GENERATION_SCALE: i32 = 3;
const GENERATION_POS: (i32, i32) = (40, 16);

#[rustfmt::skip]
const DIGITS: [[u8; 15]; 10] = [
    [1,1,1, 1,0,1, 1,0,1, 1,0,1, 1,1,1], // 0
    [0,1,0, 1,1,0, 0,1,0, 0,1,0, 1,1,1], // 1
    [1,1,1, 0,0,1, 1,1,1, 1,0,0, 1,1,1], // 2
    [1,1,1, 0,0,1, 0,1,1, 0,0,1, 1,1,1], // 3
    [1,0,1, 1,0,1, 1,1,1, 0,0,1, 0,0,1], // 4
    [1,1,1, 1,0,0, 1,1,1, 0,0,1, 1,1,1], // 5
    [1,1,1, 1,0,0, 1,1,1, 1,0,1, 1,1,1], // 6
    [1,1,1, 0,0,1, 0,1,0, 0,1,0, 0,1,0], // 7
    [1,1,1, 1,0,1, 1,1,1, 1,0,1, 1,1,1], // 8
    [1,1,1, 1,0,1, 1,1,1, 0,0,1, 1,1,1], // 9
];

/// RGBA pixel buffer, row-major
#[derive(Debug, Clone)]
pub struct PixelFrame {
    w: usize,
    h: usize,
    px: Vec<Rgba>,
    score: Option<u32>,
    generation: Option<u32>,
    banner: Option<Banner>,
    /// Frames presented so far
    pub presented: u64,
}

impl PixelFrame {
    pub fn new(w: usize, h: usize) -> Self {
        Self {
            w,
            h,
            px: vec![colors::SKY; w * h],
            score: None,
            generation: None,
            banner: None,
            presented: 0,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    pub fn clear(&mut self, c: Rgba) {
        self.px.fill(c);
        self.score = None;
        self.generation = None;
        self.banner = None;
    }

    /// Out-of-range writes are dropped
    pub fn set(&mut self, x: i32, y: i32, c: Rgba) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        (x < self.w && y < self.h).then(|| self.px[y * self.w + x])
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, c: Rgba) {
        // Clip first so huge rects stay cheap
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + w).min(self.w as i32);
        let y1 = (y + h).min(self.h as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.set(px, py, c);
            }
        }
    }

    /// Paint every opaque pixel of `mask` with its top-left at `origin`
    pub fn blit_mask(&mut self, mask: &Mask, origin: IVec2, c: Rgba) {
        let size = mask.size();
        for my in 0..size.y {
            let y = origin.y + my;
            if y < 0 || y >= self.h as i32 {
                continue;
            }
            for mx in 0..size.x {
                if mask.get(mx, my) {
                    self.set(origin.x + mx, y, c);
                }
            }
        }
    }

    fn draw_digit(&mut self, x: i32, y: i32, d: usize, c: Rgba, scale: i32) {
        let glyph = &DIGITS[d];
        for row in 0..5 {
            for col in 0..3 {
                if glyph[row * 3 + col] == 1 {
                    self.fill_rect(x + col as i32 * scale, y + row as i32 * scale, scale, scale, c);
                }
            }
        }
    }

    /// Draw `n` horizontally centred on `cx`
    pub fn draw_number(&mut self, cx: i32, y: i32, n: u32, c: Rgba, scale: i32) {
        let s = n.to_string();
        let advance = 4 * scale; // 3 cells per digit + 1 cell spacing
        let total_w = s.len() as i32 * advance - scale;
        let start_x = cx - total_w / 2;
        for (i, ch) in s.bytes().enumerate() {
            self.draw_digit(start_x + i as i32 * advance, y, (ch - b'0') as usize, c, scale);
        }
    }

    /// Raw RGBA bytes, ready for a texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.px)
    }

    /// Downsampled character preview; each char covers `cell_w` x `cell_h`
    /// pixels and shows the most important thing inside it.
    pub fn to_ascii(&self, cell_w: usize, cell_h: usize) -> String {
        let cell_w = cell_w.max(1);
        let cell_h = cell_h.max(1);
        let cols = self.w.div_ceil(cell_w);
        let rows = self.h.div_ceil(cell_h);
        let mut out = String::with_capacity((cols + 1) * (rows + 2));

        if let Some(score) = self.score {
            out.push_str(&format!("score {}\n", score));
        }
        if let Some(generation) = self.generation {
            out.push_str(&format!("generation {}\n", generation));
        }
        for row in 0..rows {
            for col in 0..cols {
                out.push(self.cell_char(col * cell_w, row * cell_h, cell_w, cell_h));
            }
            out.push('\n');
        }
        match self.banner {
            Some(Banner::GetReady) => out.push_str("get ready\n"),
            Some(Banner::GameOver) => out.push_str("game over\n"),
            None => {}
        }
        out
    }

    fn cell_char(&self, x0: usize, y0: usize, w: usize, h: usize) -> char {
        let mut best = (0, ' ');
        for y in y0..(y0 + h).min(self.h) {
            for x in x0..(x0 + w).min(self.w) {
                let rank = match self.px[y * self.w + x] {
                    colors::ACTOR | colors::ACTOR_DISABLED => (4, '@'),
                    colors::TEXT => (3, '*'),
                    colors::PIPE => (2, '#'),
                    colors::GROUND | colors::GROUND_EDGE => (1, '='),
                    _ => (0, ' '),
                };
                if rank.0 > best.0 {
                    best = rank;
                }
            }
        }
        best.1
    }
}

impl Renderer for PixelFrame {
    fn draw(&mut self, item: &DrawItem<'_>) {
        match *item {
            DrawItem::Background => self.clear(colors::SKY),
            DrawItem::Gate { origin, mask, .. } => self.blit_mask(mask, origin, colors::PIPE),
            DrawItem::GroundTile { x, y, width } => {
                let (x, y, w) = (x.floor() as i32, y.floor() as i32, width.ceil() as i32);
                let h = self.h as i32 - y;
                self.fill_rect(x, y, w, h, colors::GROUND);
                self.fill_rect(x, y, w, GROUND_EDGE_HEIGHT, colors::GROUND_EDGE);
            }
            DrawItem::Actor {
                origin,
                mask,
                disabled,
            } => {
                let c = if disabled {
                    colors::ACTOR_DISABLED
                } else {
                    colors::ACTOR
                };
                self.blit_mask(mask, origin, c);
            }
            DrawItem::Score(n) => {
                self.score = Some(n);
                let cx = self.w as i32 / 2;
                self.draw_number(cx, SCORE_Y, n, colors::TEXT, SCORE_SCALE);
            }
            DrawItem::Generation(n) => {
                self.generation = Some(n);
                let (cx, y) = GENERATION_POS;
                self.draw_number(cx, y, n, colors::TEXT, GENERATION_SCALE);
            }
            DrawItem::Banner(banner) => self.banner = Some(banner),
        }
    }

    fn present(&mut self) {
        self.presented += 1;
    }
}
