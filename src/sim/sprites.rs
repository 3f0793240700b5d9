//! Sprite bundle: the base silhouettes the simulation collides with
//!
//! Built once and handed to the game state; nothing here is global.

use crate::consts::*;

use super::mask::Mask;

/// Base silhouettes and sprite dimensions
#[derive(Debug, Clone)]
pub struct Sprites {
    /// Unrotated actor silhouette
    pub actor: Mask,
    /// Gate piece hanging from the top of the screen (cap at its bottom)
    pub pipe_top: Mask,
    /// Gate piece standing on the ground (cap at its top)
    pub pipe_bottom: Mask,
    /// Width of one ground tile
    pub ground_tile_width: f32,
}

impl Default for Sprites {
    fn default() -> Self {
        Self::procedural()
    }
}

impl Sprites {
    /// Silhouettes matching the classic sprite sizes.
    ///
    /// The actor is an ellipse with a beak; the pipe is a full-width cap on
    /// a slightly narrower body, so its corners next to the cap are empty.
    pub fn procedural() -> Self {
        let actor = actor_silhouette(ACTOR_WIDTH, ACTOR_HEIGHT);
        let pipe_bottom = pipe_silhouette(PIPE_WIDTH, PIPE_HEIGHT, PIPE_CAP_HEIGHT, PIPE_BODY_INSET);
        let pipe_top = pipe_bottom.flipped_vertical();
        Self {
            actor,
            pipe_top,
            pipe_bottom,
            ground_tile_width: GROUND_TILE_WIDTH,
        }
    }

    #[inline]
    pub fn pipe_width(&self) -> f32 {
        self.pipe_bottom.width() as f32
    }

    #[inline]
    pub fn pipe_height(&self) -> f32 {
        self.pipe_bottom.height() as f32
    }

    /// Minimum distance kept between a gate and the screen top / ground
    pub fn gate_clearance(&self) -> f32 {
        (self.pipe_bottom.height() / 7) as f32
    }
}

fn actor_silhouette(width: u32, height: u32) -> Mask {
    let body_w = width as f32 * 0.85;
    let (rx, ry) = (body_w / 2.0, height as f32 / 2.0);
    let beak_start = body_w - 2.0;
    Mask::from_fn(width, height, |x, y| {
        let px = x as f32 + 0.5 - rx;
        let py = y as f32 + 0.5 - ry;
        let in_body = (px / rx).powi(2) + (py / ry).powi(2) <= 1.0;
        let in_beak = x as f32 >= beak_start && py.abs() <= height as f32 * 0.12;
        in_body || in_beak
    })
}

fn pipe_silhouette(width: u32, height: u32, cap_height: u32, inset: u32) -> Mask {
    Mask::from_fn(width, height, |x, y| {
        y < cap_height || (x >= inset && x < width.saturating_sub(inset))
    })
}
