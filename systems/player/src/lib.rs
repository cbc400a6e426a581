#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Player controller that applies gravity, jumps and horizontal input.
//!
//! The controller owns the player's position, velocity and grounded flag. It
//! delegates tile collisions to [`CollisionResolver`] and then keeps the box
//! inside the level, resetting the player to the respawn point when it falls
//! through the bottom edge.

use glam::Vec2;
use platformer_core::{
    AxisBox, Event, HorizontalInput, PhysicsConfig, PlayerInput, PlayerSnapshot, TileGrid,
};
use platformer_system_collision::CollisionResolver;

/// Describes a fall-through reset performed by [`PlayerController::enforce_level_bounds`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Respawn {
    /// Player center when the fall was detected.
    pub fell_from: Vec2,
    /// Player center after the reset.
    pub respawn_point: Vec2,
}

/// Single-player movement state machine over the grounded flag.
#[derive(Clone, Debug)]
pub struct PlayerController {
    config: PhysicsConfig,
    resolver: CollisionResolver,
    respawn_point: Vec2,
    position: Vec2,
    velocity: Vec2,
    half_extents: Vec2,
    grounded: bool,
}

impl PlayerController {
    /// Creates a controller resting at `respawn_point` with zero velocity.
    ///
    /// The player box is sized from `config.player_scale` relative to `tile_length`.
    #[must_use]
    pub fn new(config: PhysicsConfig, tile_length: f32, respawn_point: Vec2) -> Self {
        Self {
            config,
            resolver: CollisionResolver::new(config.collision_epsilon),
            respawn_point,
            position: respawn_point,
            velocity: Vec2::ZERO,
            half_extents: config.player_half_extents(tile_length),
            grounded: false,
        }
    }

    /// Applies one tick worth of input: horizontal movement, then a jump if requested.
    pub fn apply_input(&mut self, input: PlayerInput, out_events: &mut Vec<Event>) {
        self.set_horizontal_input(input.horizontal);
        if input.jump_pressed && self.jump() {
            out_events.push(Event::PlayerJumped {
                velocity_y: self.velocity.y,
            });
        }
    }

    /// Adds the configured gravity to the vertical velocity.
    pub fn apply_gravity(&mut self) {
        self.velocity.y += self.config.gravity;
    }

    /// Launches a jump when grounded. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if !self.grounded {
            return false;
        }

        self.velocity.y = self.config.jump_velocity;
        self.grounded = false;
        true
    }

    /// Overwrites the horizontal velocity from the held direction.
    pub fn set_horizontal_input(&mut self, input: HorizontalInput) {
        self.velocity.x = input.direction() * self.config.move_speed;
    }

    /// Advances the player by one tick: gravity, collision, then level bounds.
    ///
    /// Emits [`Event::PlayerLanded`] when the player touches down and
    /// [`Event::PlayerRespawned`] when it falls out of the level.
    pub fn tick(&mut self, grid: &TileGrid, out_events: &mut Vec<Event>) -> Option<Respawn> {
        let was_grounded = self.grounded;
        self.apply_gravity();

        let resolution = self.resolver.resolve(self.bounds(), self.velocity, grid);
        self.position = resolution.bounds.center();
        self.velocity = resolution.velocity;
        self.grounded = resolution.grounded;

        if self.grounded && !was_grounded {
            out_events.push(Event::PlayerLanded {
                position: self.position,
            });
        }

        let respawn = self.enforce_level_bounds(grid.pixel_size());
        if let Some(Respawn {
            fell_from,
            respawn_point,
        }) = respawn
        {
            out_events.push(Event::PlayerRespawned {
                fell_from,
                respawn_point,
            });
        }
        respawn
    }

    /// Keeps the player box inside `[0, level_size.x]` horizontally and below
    /// the top edge, zeroing velocity on the clamped axis.
    ///
    /// A box whose bottom edge passes `level_size.y` has fallen out of the
    /// world: the player is restored to the respawn point and the reset is
    /// reported.
    pub fn enforce_level_bounds(&mut self, level_size: Vec2) -> Option<Respawn> {
        let half = self.half_extents;

        if self.position.x - half.x < 0.0 {
            self.position.x = half.x;
            self.velocity.x = 0.0;
        }
        if self.position.x + half.x > level_size.x {
            self.position.x = level_size.x - half.x;
            self.velocity.x = 0.0;
        }
        if self.position.y - half.y < 0.0 {
            self.position.y = half.y;
            self.velocity.y = 0.0;
        }

        if self.position.y + half.y > level_size.y {
            let fell_from = self.position;
            self.reset();
            tracing::info!(?fell_from, respawn_point = ?self.respawn_point, "player fell out of bounds");
            return Some(Respawn {
                fell_from,
                respawn_point: self.respawn_point,
            });
        }

        None
    }

    /// Moves the player without simulating and clears the grounded flag.
    pub fn place(&mut self, position: Vec2, velocity: Vec2) {
        self.position = position;
        self.velocity = velocity;
        self.grounded = false;
    }

    /// Center of the player box in pixels.
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        self.position
    }

    /// Velocity in pixels per tick.
    #[must_use]
    pub const fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Whether the player rests on a solid tile.
    #[must_use]
    pub const fn grounded(&self) -> bool {
        self.grounded
    }

    /// Player box in pixels.
    #[must_use]
    pub fn bounds(&self) -> AxisBox {
        AxisBox::from_center(self.position, self.half_extents)
    }

    /// Captures an immutable view of the player.
    #[must_use]
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            position: self.position,
            velocity: self.velocity,
            half_extents: self.half_extents,
            grounded: self.grounded,
        }
    }

    fn reset(&mut self) {
        self.position = self.respawn_point;
        self.velocity = Vec2::ZERO;
        self.grounded = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> PlayerController {
        PlayerController::new(PhysicsConfig::default(), 40.0, Vec2::new(60.0, 480.0))
    }

    #[test]
    fn player_box_is_slightly_smaller_than_a_tile() {
        let snapshot = controller().snapshot();
        assert_eq!(snapshot.half_extents, Vec2::new(16.0, 19.0));
        assert_eq!(snapshot.position, Vec2::new(60.0, 480.0));
        assert!(!snapshot.grounded);
    }

    #[test]
    fn gravity_accumulates_each_call() {
        let mut player = controller();
        player.apply_gravity();
        player.apply_gravity();
        assert!((player.velocity().y - 1.6).abs() < 1e-6);
    }

    #[test]
    fn horizontal_input_overwrites_previous_velocity() {
        let mut player = controller();
        player.set_horizontal_input(HorizontalInput::Right);
        assert_eq!(player.velocity().x, 5.0);
        player.set_horizontal_input(HorizontalInput::Left);
        assert_eq!(player.velocity().x, -5.0);
        player.set_horizontal_input(HorizontalInput::Idle);
        assert_eq!(player.velocity().x, 0.0);
    }

    #[test]
    fn jump_is_ignored_while_airborne() {
        let mut player = controller();
        player.place(Vec2::new(60.0, 100.0), Vec2::new(0.0, 3.0));
        assert!(!player.jump());
        assert_eq!(player.velocity().y, 3.0);
    }
}
