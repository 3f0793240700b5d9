//! Collision detection between the actor and gates / screen bounds
//!
//! Pure functions of the current positions and silhouettes: nothing here
//! remembers previous frames.

use glam::IVec2;

use super::mask::Mask;
use super::sprites::Sprites;
use super::state::{Actor, Obstacle};

/// Which part of a gate was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatePiece {
    Top,
    Bottom,
}

/// Result of a pixel collision check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionResult {
    pub piece: GatePiece,
    /// First shared opaque pixel, in screen space
    pub point: IVec2,
}

/// Pixel test of `mask` at `origin` against a piece at `piece_origin`
fn piece_overlap(mask: &Mask, origin: IVec2, piece: &Mask, piece_origin: IVec2) -> Option<IVec2> {
    let offset = piece_origin - origin;

    // Cheap bounding-box reject first
    let size = mask.size();
    let piece_size = piece.size();
    if offset.x >= size.x
        || offset.y >= size.y
        || offset.x + piece_size.x <= 0
        || offset.y + piece_size.y <= 0
    {
        return None;
    }

    mask.overlap(piece, offset).map(|p| p + origin)
}

/// Check the actor's silhouette against both pieces of a gate
pub fn gate_collision(actor: &Actor, obstacle: &Obstacle, sprites: &Sprites) -> Option<CollisionResult> {
    let mask = actor.silhouette();
    let origin = actor.top_left();

    let top = obstacle.top_piece_origin(sprites.pipe_height());
    if let Some(point) = piece_overlap(mask, origin, &sprites.pipe_top, top) {
        return Some(CollisionResult {
            piece: GatePiece::Top,
            point,
        });
    }

    let bottom = obstacle.bottom_piece_origin();
    piece_overlap(mask, origin, &sprites.pipe_bottom, bottom).map(|point| CollisionResult {
        piece: GatePiece::Bottom,
        point,
    })
}

/// True if any opaque actor pixel overlaps either gate piece
#[inline]
pub fn collides(actor: &Actor, obstacle: &Obstacle, sprites: &Sprites) -> bool {
    gate_collision(actor, obstacle, sprites).is_some()
}

/// Ground or ceiling contact.
///
/// The ground test measures a full sprite height below the centre, so the
/// actor is stopped slightly above the ground and the death fall carries it
/// down to contact.
pub fn out_of_bounds(actor: &Actor, ground_line: f32) -> bool {
    let height = actor.silhouette().height() as f32;
    actor.pos.y + height >= ground_line || actor.pos.y < 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::Kinematics;

    fn setup() -> (Sprites, Actor) {
        let sprites = Sprites::procedural();
        let actor = Actor::new(230.0, 400.0, Kinematics::from(&Settings::default()), &sprites.actor);
        (sprites, actor)
    }

    #[test]
    fn test_actor_inside_gap_is_clear() {
        let (sprites, actor) = setup();
        // Gate straddling the actor, opening centred on it
        let gate = Obstacle::new(1, 200.0, 400.0, 70.0);
        assert!(!collides(&actor, &gate, &sprites));
    }

    #[test]
    fn test_top_piece_hit() {
        let (sprites, actor) = setup();
        let gate = Obstacle::new(1, 200.0, 480.0, 70.0);
        let hit = gate_collision(&actor, &gate, &sprites).unwrap();
        assert_eq!(hit.piece, GatePiece::Top);
        assert!(hit.point.y < 410);
    }

    #[test]
    fn test_bottom_piece_hit() {
        let (sprites, actor) = setup();
        let gate = Obstacle::new(1, 200.0, 320.0, 70.0);
        let hit = gate_collision(&actor, &gate, &sprites).unwrap();
        assert_eq!(hit.piece, GatePiece::Bottom);
    }

    #[test]
    fn test_gate_far_away() {
        let (sprites, actor) = setup();
        let gate = Obstacle::new(1, 500.0, 100.0, 70.0);
        assert!(!collides(&actor, &gate, &sprites));
    }

    #[test]
    fn test_transparent_corner_does_not_collide() {
        let (sprites, actor) = setup();
        // Actor spans x 196..264, y 376..424. A gate whose bottom cap starts
        // at y=421 and whose left edge is at x=258 only meets the actor's
        // transparent lower-right corner; its bounding box does overlap.
        let gate = Obstacle::new(1, 258.0, 421.0 - 70.0, 70.0);
        assert!(!collides(&actor, &gate, &sprites));
    }

    #[test]
    fn test_collision_depends_only_on_current_positions() {
        let (sprites, mut actor) = setup();
        let gate = Obstacle::new(1, 200.0, 480.0, 70.0);
        assert!(collides(&actor, &gate, &sprites));
        actor.pos.y = 480.0;
        assert!(!collides(&actor, &gate, &sprites));
        actor.pos.y = 400.0;
        assert!(collides(&actor, &gate, &sprites));
    }

    #[test]
    fn test_out_of_bounds() {
        let (_, mut actor) = setup();
        assert!(!out_of_bounds(&actor, 730.0));
        actor.pos.y = 730.0 - 48.0;
        assert!(out_of_bounds(&actor, 730.0));
        actor.pos.y = -1.0;
        assert!(out_of_bounds(&actor, 730.0));
    }
}
