//! Platformer collision resolution
//!
//! Resolves an actor's hitbox against static tiles and dynamic obstacles in
//! two passes per step, always horizontal first, then vertical. Resolving X
//! before Y avoids catching on tile corners.
//!
//! Dynamic obstacles carry their previous-step hitbox. Comparing the actor's
//! previous and current hitbox against the obstacle's previous and current
//! hitbox tells which face was crossed this step, so an actor is never pushed
//! out through the wrong side.

use crate::foundation::collections::ObjectHandle;
use crate::foundation::math::{Rect, Vec2};
use crate::scene::GameObject;
use crate::spatial::{TileIndex, TileView};

/// Slack allowed when comparing previous-step edges
///
/// Snapping an edge onto a moving platform leaves float residue of a few
/// ulps, enough to read a rider as having started inside the platform.
const EDGE_TOLERANCE: f32 = 1.0e-3;

/// Snapshot of a moving obstacle for one physics step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Hitbox after the obstacle's update this step
    pub hitbox: Rect,

    /// Hitbox at the start of this step
    pub previous_hitbox: Rect,

    /// Velocity in world units per second
    pub velocity: Vec2,

    /// Registry handle of the object, if any
    pub source: Option<ObjectHandle>,
}

impl Obstacle {
    /// Snapshot a registry object
    pub fn from_object<O: GameObject + ?Sized>(handle: ObjectHandle, object: &O) -> Self {
        Self {
            hitbox: object.hitbox(),
            previous_hitbox: object.previous_hitbox(),
            velocity: object.velocity(),
            source: Some(handle),
        }
    }
}

/// Moving actor state handled by the resolver
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    /// Current hitbox
    pub hitbox: Rect,

    /// Hitbox at the start of the step
    pub previous_hitbox: Rect,

    /// Velocity in world units per second
    pub velocity: Vec2,
}

impl KinematicBody {
    /// Body at rest occupying `hitbox`
    pub fn new(hitbox: Rect) -> Self {
        Self {
            hitbox,
            previous_hitbox: hitbox,
            velocity: Vec2::zeros(),
        }
    }

    /// Record the current hitbox as the start-of-step hitbox
    pub fn begin_step(&mut self) {
        self.previous_hitbox = self.hitbox;
    }
}

/// A floor or ceiling the actor was clamped against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Hitbox of the contacted tile or obstacle
    pub hitbox: Rect,

    /// Its velocity (zero for tiles)
    pub velocity: Vec2,

    /// Registry handle for dynamic obstacles
    pub source: Option<ObjectHandle>,
}

impl Contact {
    fn from_tile(tile: &TileView) -> Self {
        Self {
            hitbox: tile.hitbox(),
            velocity: Vec2::zeros(),
            source: None,
        }
    }

    fn from_obstacle(obstacle: &Obstacle) -> Self {
        Self {
            hitbox: obstacle.hitbox,
            velocity: obstacle.velocity,
            source: obstacle.source,
        }
    }
}

/// Outcome of the vertical pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VerticalContacts {
    /// Whether a floor contact was applied
    pub on_floor: bool,

    /// Winning floor contact
    pub floor: Option<Contact>,

    /// Winning ceiling contact
    pub ceiling: Option<Contact>,

    /// Moving obstacle now carrying the actor
    pub carrier: Option<ObjectHandle>,

    /// Overlapping obstacles with no crossed face on either axis
    pub unresolved: usize,
}

/// Horizontal pass
///
/// Static tiles clamp the leading edge according to the sign of the
/// horizontal velocity. Dynamic obstacles only clamp along a face the actor
/// crossed during this step.
pub fn resolve_horizontal(body: &mut KinematicBody, tiles: &TileIndex, obstacles: &[Obstacle]) {
    let overlapping: Vec<TileView> = tiles.query_region(body.hitbox).collect();
    for tile in &overlapping {
        if body.velocity.x > 0.0 {
            body.hitbox.set_right(tile.bounds.left);
        } else if body.velocity.x < 0.0 {
            body.hitbox.set_left(tile.bounds.right());
        }
    }

    for obstacle in obstacles {
        if !obstacle.hitbox.intersects(&body.hitbox) {
            continue;
        }
        let current = obstacle.hitbox;
        let previous = obstacle.previous_hitbox;

        // Approached from the right, pushed back out to the right
        if body.hitbox.left <= current.right()
            && body.previous_hitbox.left >= previous.right() - EDGE_TOLERANCE
        {
            body.hitbox.set_left(current.right());
        }

        // Approached from the left
        if body.hitbox.right() >= current.left
            && body.previous_hitbox.right() <= previous.left + EDGE_TOLERANCE
        {
            body.hitbox.set_right(current.left);
        }
    }
}

fn is_down_collision(body: &KinematicBody, obstacle: &Obstacle) -> bool {
    body.hitbox.bottom() >= obstacle.hitbox.top
        && body.previous_hitbox.bottom() <= obstacle.previous_hitbox.top + EDGE_TOLERANCE
}

fn is_up_collision(body: &KinematicBody, obstacle: &Obstacle) -> bool {
    body.hitbox.top <= obstacle.hitbox.bottom()
        && body.previous_hitbox.top >= obstacle.previous_hitbox.bottom() - EDGE_TOLERANCE
}

/// Vertical pass
///
/// Overlapping geometry is split into floor and ceiling candidates. The floor
/// candidate with the smallest vertical velocity wins, the ceiling candidate
/// with the largest wins; ties go to the first candidate found (tiles before
/// obstacles). The actor adopts the winner's vertical velocity.
pub fn resolve_vertical(body: &mut KinematicBody, tiles: &TileIndex, obstacles: &[Obstacle]) -> VerticalContacts {
    let mut contacts = VerticalContacts::default();
    let mut below: Vec<Contact> = Vec::new();
    let mut above: Vec<Contact> = Vec::new();

    for tile in tiles.query_region(body.hitbox) {
        if body.velocity.y > 0.0 {
            below.push(Contact::from_tile(&tile));
        } else if body.velocity.y < 0.0 {
            above.push(Contact::from_tile(&tile));
        }
    }

    for obstacle in obstacles {
        if !obstacle.hitbox.intersects(&body.hitbox) {
            continue;
        }
        if is_down_collision(body, obstacle) {
            below.push(Contact::from_obstacle(obstacle));
        } else if is_up_collision(body, obstacle) {
            above.push(Contact::from_obstacle(obstacle));
        } else {
            contacts.unresolved += 1;
        }
    }

    if contacts.unresolved > 0 {
        log::warn!(
            "{} obstacle overlap(s) with no crossed face at {:?}",
            contacts.unresolved,
            body.hitbox
        );
    }

    let floor = below.into_iter().reduce(|best, candidate| {
        if candidate.velocity.y < best.velocity.y {
            candidate
        } else {
            best
        }
    });
    if let Some(floor) = floor {
        body.hitbox.set_bottom(floor.hitbox.top);
        body.velocity.y = floor.velocity.y;
        contacts.on_floor = true;
        if body.velocity.y != 0.0 {
            contacts.carrier = floor.source;
        }
        contacts.floor = Some(floor);
    }

    let ceiling = above.into_iter().reduce(|best, candidate| {
        if candidate.velocity.y > best.velocity.y {
            candidate
        } else {
            best
        }
    });
    if let Some(ceiling) = ceiling {
        body.hitbox.set_top(ceiling.hitbox.bottom());
        body.velocity.y = ceiling.velocity.y;
        contacts.ceiling = Some(ceiling);
    }

    contacts
}

/// Per-actor platformer movement state
///
/// Runs one step of: horizontal move and resolve, carried-platform
/// correction, gravity integration, vertical move and resolve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformerController {
    /// Downward acceleration in world units per second squared
    pub gravity: f32,

    on_floor: bool,
    jumping: bool,
    carrier: Option<ObjectHandle>,
}

impl PlatformerController {
    /// Airborne controller with the given gravity
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity,
            on_floor: false,
            jumping: false,
            carrier: None,
        }
    }

    /// Whether the last step ended on a floor contact
    pub fn is_on_floor(&self) -> bool {
        self.on_floor
    }

    /// Whether a jump is in progress
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    /// Moving obstacle that carried the actor at the end of the last step
    pub fn carrier(&self) -> Option<ObjectHandle> {
        self.carrier
    }

    /// Launch upward if standing on a floor
    pub fn try_jump(&mut self, body: &mut KinematicBody, jump_speed: f32) -> bool {
        if self.on_floor {
            body.velocity.y = -jump_speed;
            self.jumping = true;
            true
        } else {
            false
        }
    }

    /// Forget contacts, e.g. after teleporting the actor
    pub fn reset(&mut self) {
        self.on_floor = false;
        self.jumping = false;
        self.carrier = None;
    }

    /// Match a downward-moving carrier before gravity is applied
    ///
    /// Keeps the actor from separating from a platform that descends faster
    /// than free fall would.
    pub fn apply_carrier_correction(&self, body: &mut KinematicBody, obstacles: &[Obstacle]) {
        if self.jumping {
            return;
        }
        let Some(carrier) = self.carrier else {
            return;
        };
        let carrier_velocity = obstacles
            .iter()
            .find(|obstacle| obstacle.source == Some(carrier))
            .map(|obstacle| obstacle.velocity.y);

        if let Some(velocity) = carrier_velocity {
            if velocity > 0.0 {
                body.velocity.y = velocity;
            }
        }
    }

    /// Advance the body by one step and resolve collisions
    pub fn step(
        &mut self,
        body: &mut KinematicBody,
        delta_time: f32,
        tiles: &TileIndex,
        obstacles: &[Obstacle],
    ) -> VerticalContacts {
        body.hitbox.move_left(body.velocity.x * delta_time);
        resolve_horizontal(body, tiles, obstacles);

        self.apply_carrier_correction(body, obstacles);

        body.velocity.y += self.gravity * delta_time;
        body.hitbox.move_top(body.velocity.y * delta_time);

        let contacts = resolve_vertical(body, tiles, obstacles);
        self.on_floor = contacts.on_floor;
        if contacts.on_floor {
            self.jumping = false;
        }
        self.carrier = contacts.carrier;
        contacts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use slotmap::SlotMap;

    const DT: f32 = 1.0 / 60.0;

    fn tiles(cells: &[(i32, i32)]) -> TileIndex {
        TileIndex::from_tiles(Vec2::new(32.0, 32.0), 2, cells.iter().map(|c| (*c, 1)))
    }

    fn handle() -> ObjectHandle {
        let mut arena: SlotMap<ObjectHandle, ()> = SlotMap::with_key();
        arena.insert(())
    }

    fn platform(previous: Rect, velocity: Vec2, source: ObjectHandle) -> Obstacle {
        Obstacle {
            hitbox: previous.translated(velocity * DT),
            previous_hitbox: previous,
            velocity,
            source: Some(source),
        }
    }

    #[test]
    fn test_static_tile_clamps_leading_edge() {
        let level = tiles(&[(2, 0)]);
        let mut body = KinematicBody::new(Rect::new(40.0, 0.0, 20.0, 20.0));
        body.velocity.x = 400.0;
        body.begin_step();
        body.hitbox.move_left(10.0);

        resolve_horizontal(&mut body, &level, &[]);
        assert_eq!(body.hitbox.right(), 64.0);

        body.velocity.x = -400.0;
        let level = tiles(&[(0, 0)]);
        body.hitbox.set_left(30.0);
        resolve_horizontal(&mut body, &level, &[]);
        assert_eq!(body.hitbox.left, 32.0);
    }

    #[test]
    fn test_right_then_down_ends_flush_on_both_axes() {
        // Wall at column 3 row 2, floor along row 3
        let level = tiles(&[(3, 2), (0, 3), (1, 3), (2, 3)]);
        let mut body = KinematicBody::new(Rect::new(70.0, 62.0, 20.0, 30.0));
        body.velocity = Vec2::new(400.0, 300.0);
        let mut controller = PlatformerController::new(2400.0);

        body.begin_step();
        let contacts = controller.step(&mut body, DT, &level, &[]);

        assert_eq!(body.hitbox.right(), 96.0);
        assert_eq!(body.hitbox.bottom(), 96.0);
        assert!(contacts.on_floor);
        assert!(controller.is_on_floor());
        assert_eq!(level.query_region(body.hitbox).count(), 0);
        assert_eq!(body.velocity.y, 0.0);
    }

    #[test]
    fn test_ceiling_tile_stops_upward_motion() {
        let level = tiles(&[(0, 0)]);
        let mut body = KinematicBody::new(Rect::new(4.0, 40.0, 20.0, 20.0));
        body.velocity.y = -600.0;
        body.begin_step();
        body.hitbox.move_top(-10.0);

        let contacts = resolve_vertical(&mut body, &level, &[]);
        assert_eq!(body.hitbox.top, 32.0);
        assert_eq!(body.velocity.y, 0.0);
        assert!(contacts.ceiling.is_some());
        assert!(!contacts.on_floor);
    }

    #[test]
    fn test_no_candidates_leaves_velocity_alone() {
        let level = tiles(&[]);
        let mut body = KinematicBody::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        body.velocity.y = 123.0;

        let contacts = resolve_vertical(&mut body, &level, &[]);
        assert!(!contacts.on_floor);
        assert_eq!(contacts.floor, None);
        assert_eq!(body.velocity.y, 123.0);
    }

    #[test]
    fn test_landing_on_descending_platform_inherits_velocity() {
        let source = handle();
        let deck = platform(Rect::new(0.0, 100.0, 96.0, 16.0), Vec2::new(0.0, 100.0), source);

        let mut body = KinematicBody::new(Rect::new(10.0, 70.0, 20.0, 30.0));
        body.velocity.y = 100.0 + 2400.0 * DT;
        body.begin_step();
        body.hitbox.move_top(body.velocity.y * DT);

        let contacts = resolve_vertical(&mut body, &tiles(&[]), &[deck]);
        assert!(contacts.on_floor);
        assert_eq!(body.velocity.y, 100.0);
        assert_relative_eq!(body.hitbox.bottom(), deck.hitbox.top);
        assert_eq!(contacts.carrier, Some(source));
    }

    #[test]
    fn test_previous_edge_allows_rounding_residue_only() {
        let deck = platform(Rect::new(0.0, 100.0, 96.0, 16.0), Vec2::new(0.0, 100.0), handle());

        // Previous bottom a hair below the deck's previous top still lands
        let mut body = KinematicBody::new(Rect::new(10.0, 70.0005, 20.0, 30.0));
        body.velocity.y = 150.0;
        body.begin_step();
        body.hitbox.move_top(body.velocity.y * DT);
        assert!(resolve_vertical(&mut body, &tiles(&[]), &[deck]).on_floor);
        assert_relative_eq!(body.hitbox.bottom(), deck.hitbox.top);

        // Starting half a pixel inside the deck is not a landing
        let mut body = KinematicBody::new(Rect::new(10.0, 70.5, 20.0, 30.0));
        body.velocity.y = 150.0;
        body.begin_step();
        body.hitbox.move_top(body.velocity.y * DT);
        let bottom = body.hitbox.bottom();
        assert!(!resolve_vertical(&mut body, &tiles(&[]), &[deck]).on_floor);
        assert_eq!(body.hitbox.bottom(), bottom);
    }

    #[test]
    fn test_riding_descending_platform_for_a_step() {
        let source = handle();
        let start = Rect::new(0.0, 100.0, 96.0, 16.0);
        let velocity = Vec2::new(0.0, 100.0);
        let mut controller = PlatformerController::new(2400.0);

        // First step: stand on the platform while it is still
        let resting = Obstacle {
            hitbox: start,
            previous_hitbox: start,
            velocity,
            source: Some(source),
        };
        let mut body = KinematicBody::new(Rect::new(10.0, 70.0, 20.0, 30.0));
        body.begin_step();
        controller.step(&mut body, DT, &tiles(&[]), &[resting]);
        assert!(controller.is_on_floor());
        assert_eq!(controller.carrier(), Some(source));

        // Second step: platform drops, carrier correction keeps contact
        let moved = platform(start, velocity, source);
        body.begin_step();
        let contacts = controller.step(&mut body, DT, &tiles(&[]), &[moved]);

        assert!(contacts.on_floor);
        assert_relative_eq!(body.velocity.y, 100.0);
        assert_relative_eq!(body.hitbox.bottom(), moved.hitbox.top);
        assert!(body.hitbox.bottom() > start.top);
    }

    #[test]
    fn test_without_correction_actor_would_separate() {
        let source = handle();
        let start = Rect::new(0.0, 100.0, 96.0, 16.0);
        let moved = platform(start, Vec2::new(0.0, 100.0), source);

        // Plain gravity from rest is slower than the platform this step
        let mut body = KinematicBody::new(Rect::new(10.0, 70.0, 20.0, 30.0));
        body.begin_step();
        let mut controller = PlatformerController::new(2400.0);
        let contacts = controller.step(&mut body, DT, &tiles(&[]), &[moved]);

        assert!(!contacts.on_floor);
    }

    #[test]
    fn test_floor_tie_break_prefers_smallest_velocity() {
        let rising = platform(Rect::new(0.0, 100.0, 50.0, 16.0), Vec2::new(0.0, -200.0), handle());
        let falling = platform(Rect::new(0.0, 100.0, 50.0, 16.0), Vec2::new(0.0, 300.0), handle());

        let mut body = KinematicBody::new(Rect::new(10.0, 70.0, 20.0, 30.0));
        body.velocity.y = 600.0;
        body.begin_step();
        body.hitbox.move_top(10.0);

        let contacts = resolve_vertical(&mut body, &tiles(&[]), &[falling, rising]);
        assert_eq!(contacts.floor.map(|c| c.velocity.y), Some(-200.0));
        assert_eq!(body.velocity.y, -200.0);
        assert_relative_eq!(body.hitbox.bottom(), rising.hitbox.top);
    }

    #[test]
    fn test_ceiling_tie_break_prefers_largest_velocity() {
        let slow = platform(Rect::new(0.0, 0.0, 50.0, 16.0), Vec2::new(0.0, 50.0), handle());
        let fast = platform(Rect::new(0.0, 0.0, 50.0, 16.0), Vec2::new(0.0, 150.0), handle());

        let mut body = KinematicBody::new(Rect::new(10.0, 20.0, 20.0, 30.0));
        body.velocity.y = -600.0;
        body.begin_step();
        body.hitbox.move_top(-10.0);

        let contacts = resolve_vertical(&mut body, &tiles(&[]), &[slow, fast]);
        assert_eq!(contacts.ceiling.map(|c| c.velocity.y), Some(150.0));
        assert_eq!(body.hitbox.top, fast.hitbox.bottom());
    }

    #[test]
    fn test_obstacle_side_uses_previous_positions() {
        let wall_rect = Rect::new(100.0, 0.0, 32.0, 64.0);
        let wall = Obstacle {
            hitbox: wall_rect,
            previous_hitbox: wall_rect,
            velocity: Vec2::zeros(),
            source: Some(handle()),
        };

        // Approaching from the left
        let mut body = KinematicBody::new(Rect::new(75.0, 10.0, 20.0, 20.0));
        body.velocity.x = 400.0;
        body.begin_step();
        body.hitbox.move_left(10.0);
        resolve_horizontal(&mut body, &tiles(&[]), &[wall]);
        assert_eq!(body.hitbox.right(), 100.0);

        // Approaching from the right
        let mut body = KinematicBody::new(Rect::new(137.0, 10.0, 20.0, 20.0));
        body.velocity.x = -400.0;
        body.begin_step();
        body.hitbox.move_left(-10.0);
        resolve_horizontal(&mut body, &tiles(&[]), &[wall]);
        assert_eq!(body.hitbox.left, 132.0);
    }

    #[test]
    fn test_rising_platform_from_below_is_a_floor() {
        let source = handle();
        let start = Rect::new(0.0, 100.0, 96.0, 16.0);
        let rising = platform(start, Vec2::new(0.0, -200.0), source);

        let mut body = KinematicBody::new(Rect::new(10.0, 70.0, 20.0, 30.0));
        let mut controller = PlatformerController::new(2400.0);
        body.begin_step();
        let contacts = controller.step(&mut body, DT, &tiles(&[]), &[rising]);

        assert!(contacts.on_floor);
        assert_eq!(body.velocity.y, -200.0);
        assert_relative_eq!(body.hitbox.bottom(), rising.hitbox.top);
        assert_eq!(contacts.carrier, Some(source));
    }

    #[test]
    fn test_jump_requires_floor() {
        let mut controller = PlatformerController::new(2400.0);
        let mut body = KinematicBody::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(!controller.try_jump(&mut body, 1200.0));

        let level = tiles(&[(0, 1)]);
        body.hitbox.set_bottom(32.0);
        body.begin_step();
        controller.step(&mut body, DT, &level, &[]);
        assert!(controller.is_on_floor());

        assert!(controller.try_jump(&mut body, 1200.0));
        assert!(controller.is_jumping());
        assert_eq!(body.velocity.y, -1200.0);
    }
}
