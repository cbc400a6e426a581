#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for the platformer.
//!
//! The world owns the active level, the player controller and the camera
//! state. Each [`Command::Tick`] runs the fixed sequence input, gravity,
//! collision, level bounds and camera to completion; nothing else mutates the
//! session.

use glam::Vec2;
use platformer_core::{Command, Event, GameConfig, PhysicsConfig, TileGrid, WELCOME_BANNER};
use platformer_system_camera::CameraFollow;
use platformer_system_player::PlayerController;

/// Represents the authoritative platformer session state.
#[derive(Debug)]
pub struct World {
    banner: &'static str,
    physics: PhysicsConfig,
    grid: TileGrid,
    player: PlayerController,
    camera: CameraFollow,
    camera_center: Vec2,
    tick_index: u64,
    respawn_count: u64,
}

impl World {
    /// Creates a world for `grid` with the player resting at `respawn_point`.
    #[must_use]
    pub fn new(grid: TileGrid, respawn_point: Vec2, config: &GameConfig) -> Self {
        let player = PlayerController::new(config.physics, grid.tile_length(), respawn_point);
        let camera = CameraFollow::new(config.viewport);
        let camera_center = camera.compute_center(player.position(), grid.pixel_size());
        Self {
            banner: WELCOME_BANNER,
            physics: config.physics,
            grid,
            player,
            camera,
            camera_center,
            tick_index: 0,
            respawn_count: 0,
        }
    }

    fn load_level(&mut self, grid: TileGrid, respawn_point: Vec2, out_events: &mut Vec<Event>) {
        tracing::debug!(
            columns = grid.columns(),
            rows = grid.rows(),
            ?respawn_point,
            "loading level"
        );
        self.player = PlayerController::new(self.physics, grid.tile_length(), respawn_point);
        out_events.push(Event::LevelLoaded {
            columns: grid.columns(),
            rows: grid.rows(),
        });
        self.grid = grid;
        self.update_camera(out_events);
    }

    fn update_camera(&mut self, out_events: &mut Vec<Event>) {
        let center = self
            .camera
            .compute_center(self.player.position(), self.grid.pixel_size());
        if center != self.camera_center {
            self.camera_center = center;
            out_events.push(Event::CameraMoved { center });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLevel {
            grid,
            respawn_point,
        } => world.load_level(grid, respawn_point, out_events),
        Command::Tick { input } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced {
                tick: world.tick_index,
            });

            world.player.apply_input(input, out_events);
            if world.player.tick(&world.grid, out_events).is_some() {
                world.respawn_count = world.respawn_count.saturating_add(1);
            }
            world.update_camera(out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use platformer_core::{CameraSnapshot, PlayerSnapshot, TileGrid};

    use super::World;

    /// Retrieves the welcome banner that adapters may display to players.
    #[must_use]
    pub fn welcome_banner(world: &World) -> &'static str {
        world.banner
    }

    /// Provides read-only access to the active level grid.
    #[must_use]
    pub fn tile_grid(world: &World) -> &TileGrid {
        &world.grid
    }

    /// Captures the current player state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures the current clamped camera state.
    #[must_use]
    pub fn camera(world: &World) -> CameraSnapshot {
        world.camera.snapshot(world.camera_center)
    }

    /// Number of ticks simulated since the world was created.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Number of fall-through resets observed since the world was created.
    #[must_use]
    pub fn respawn_count(world: &World) -> u64 {
        world.respawn_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_core::{HorizontalInput, PlayerInput, TileGridBuilder, TileKind};

    fn config() -> GameConfig {
        GameConfig {
            viewport: Vec2::new(200.0, 120.0),
            ..GameConfig::default()
        }
    }

    fn corridor() -> TileGrid {
        TileGridBuilder::new(20, 5, 40.0)
            .solid_row(4, 0..20)
            .build()
            .expect("corridor")
    }

    fn tick(world: &mut World, input: PlayerInput) -> Vec<Event> {
        let mut events = Vec::new();
        apply(world, Command::Tick { input }, &mut events);
        events
    }

    #[test]
    fn new_world_starts_at_respawn_point() {
        let world = World::new(corridor(), Vec2::new(60.0, 100.0), &config());

        assert_eq!(query::welcome_banner(&world), WELCOME_BANNER);
        assert_eq!(query::player(&world).position, Vec2::new(60.0, 100.0));
        assert_eq!(query::tick_index(&world), 0);
        assert_eq!(query::camera(&world).center, Vec2::new(100.0, 100.0));
    }

    #[test]
    fn tick_emits_time_advanced_first() {
        let mut world = World::new(corridor(), Vec2::new(60.0, 100.0), &config());

        let events = tick(&mut world, PlayerInput::default());

        assert_eq!(events.first(), Some(&Event::TimeAdvanced { tick: 1 }));
        assert_eq!(query::tick_index(&world), 1);
    }

    #[test]
    fn camera_follows_player_and_reports_moves() {
        let mut world = World::new(corridor(), Vec2::new(300.0, 141.0), &config());
        let before = query::camera(&world).center;

        let mut moved = false;
        for _ in 0..10 {
            let events = tick(&mut world, PlayerInput::new(HorizontalInput::Right, false));
            moved |= events
                .iter()
                .any(|event| matches!(event, Event::CameraMoved { .. }));
        }

        assert!(moved);
        let after = query::camera(&world).center;
        assert!(after.x > before.x);
        assert_eq!(after.x, query::player(&world).position.x);
    }

    #[test]
    fn load_level_replaces_grid_and_resets_player() {
        let mut world = World::new(corridor(), Vec2::new(60.0, 100.0), &config());
        for _ in 0..5 {
            let _ = tick(&mut world, PlayerInput::new(HorizontalInput::Right, false));
        }

        let grid = TileGrid::filled(3, 3, 40.0, TileKind::Empty).expect("grid");
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadLevel {
                grid: grid.clone(),
                respawn_point: Vec2::new(60.0, 60.0),
            },
            &mut events,
        );

        assert_eq!(events[0], Event::LevelLoaded { columns: 3, rows: 3 });
        assert_eq!(query::tile_grid(&world), &grid);
        let player = query::player(&world);
        assert_eq!(player.position, Vec2::new(60.0, 60.0));
        assert_eq!(player.velocity, Vec2::ZERO);
        assert_eq!(query::camera(&world).center, Vec2::new(60.0, 60.0));
    }

    #[test]
    fn falling_out_counts_respawns() {
        let grid = TileGrid::filled(4, 2, 40.0, TileKind::Empty).expect("grid");
        let mut world = World::new(grid, Vec2::new(60.0, 20.0), &config());

        let mut respawns = 0;
        for _ in 0..40 {
            respawns += tick(&mut world, PlayerInput::default())
                .iter()
                .filter(|event| matches!(event, Event::PlayerRespawned { .. }))
                .count();
        }

        assert!(respawns > 0);
        assert_eq!(query::respawn_count(&world), respawns as u64);
    }
}
