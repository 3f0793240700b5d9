//! Rendering adapter
//!
//! The simulation never draws. `scene` turns a state snapshot into draw
//! items; a `Renderer` consumes them.

pub mod frame;
pub mod scene;

pub use frame::{PixelFrame, Rgba, colors};
pub use scene::{Banner, DrawItem, evaluation_scene, scene};

/// Something that can show a frame
pub trait Renderer {
    fn draw(&mut self, item: &DrawItem<'_>);

    /// Finish the current frame
    fn present(&mut self);

    /// Draw every item, then present
    fn render(&mut self, items: &[DrawItem<'_>]) {
        for item in items {
            self.draw(item);
        }
        self.present();
    }
}

/// Discards everything but counts frames
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer {
    pub frames: u64,
}

impl Renderer for NullRenderer {
    fn draw(&mut self, _item: &DrawItem<'_>) {}

    fn present(&mut self) {
        self.frames += 1;
    }
}
