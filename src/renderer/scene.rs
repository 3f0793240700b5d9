//! State to draw items

use glam::IVec2;

use crate::sim::{Evaluation, GamePhase, GameState, GatePiece, Mask, World};

/// Overlay text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Banner {
    GetReady,
    GameOver,
}

/// One drawable, in screen pixels. Items are ordered back to front.
#[derive(Debug, Clone, Copy)]
pub enum DrawItem<'a> {
    Background,
    Gate {
        piece: GatePiece,
        origin: IVec2,
        mask: &'a Mask,
    },
    GroundTile {
        x: f32,
        y: f32,
        width: f32,
    },
    Actor {
        origin: IVec2,
        mask: &'a Mask,
        disabled: bool,
    },
    Score(u32),
    /// Evaluation round shown in the corner
    Generation(u32),
    Banner(Banner),
}

/// Build the draw list for the current frame
pub fn scene(state: &GameState) -> Vec<DrawItem<'_>> {
    let world = &state.world;
    let mut items = Vec::with_capacity(world.obstacles.len() * 2 + 6);
    push_world(&mut items, world);

    items.push(DrawItem::Actor {
        origin: state.actor.top_left(),
        mask: state.actor.silhouette(),
        disabled: state.actor.disabled,
    });

    match state.phase {
        GamePhase::NotStarted => items.push(DrawItem::Banner(Banner::GetReady)),
        GamePhase::Running | GamePhase::Dying => items.push(DrawItem::Score(world.score)),
        GamePhase::Ended => {
            items.push(DrawItem::Score(world.score));
            items.push(DrawItem::Banner(Banner::GameOver));
        }
    }

    items
}

/// Draw list for a lockstep evaluation: every live actor, score and round
pub fn evaluation_scene<C>(eval: &Evaluation<C>, generation: u32) -> Vec<DrawItem<'_>> {
    let world = &eval.world;
    let mut items = Vec::with_capacity(world.obstacles.len() * 2 + eval.active.len() + 5);
    push_world(&mut items, world);

    for c in &eval.active {
        items.push(DrawItem::Actor {
            origin: c.actor.top_left(),
            mask: c.actor.silhouette(),
            disabled: c.actor.disabled,
        });
    }

    items.push(DrawItem::Score(world.score));
    items.push(DrawItem::Generation(generation));
    items
}

/// Background, gates and ground
fn push_world<'a>(items: &mut Vec<DrawItem<'a>>, world: &'a World) {
    let sprites = &world.sprites;
    items.push(DrawItem::Background);

    for obstacle in &world.obstacles {
        items.push(DrawItem::Gate {
            piece: GatePiece::Top,
            origin: obstacle.top_piece_origin(sprites.pipe_height()),
            mask: &sprites.pipe_top,
        });
        items.push(DrawItem::Gate {
            piece: GatePiece::Bottom,
            origin: obstacle.bottom_piece_origin(),
            mask: &sprites.pipe_bottom,
        });
    }

    for &x in &world.ground.tiles {
        items.push(DrawItem::GroundTile {
            x,
            y: world.ground.y,
            width: world.ground.width,
        });
    }
}
