use glam::Vec2;
use platformer_cli::simulation::{self, GameLoop};
use platformer_core::{GameConfig, HorizontalInput, PlayerInput};
use platformer_system_bootstrap::Bootstrap;
use platformer_world::{query, World};

fn demo_world() -> World {
    let config = GameConfig::default();
    let bootstrap = Bootstrap::default();
    let grid = bootstrap
        .demo_level(config.tile_length)
        .expect("demo level");
    let respawn_point = bootstrap.respawn_point(config.respawn_point, &grid);
    World::new(grid, respawn_point, &config)
}

#[test]
fn idle_player_settles_on_demo_floor() {
    let summary = simulation::run_headless(demo_world(), 120);

    assert_eq!(summary.ticks, 120);
    assert_eq!(summary.respawns, 0);
    assert!(summary.grounded);
    assert!((summary.position.y - 541.0).abs() < 1e-3);
    assert_eq!(summary.position.x, 60.0);
}

#[test]
fn walking_right_from_spawn_stops_at_first_wall() {
    let mut game_loop = GameLoop::new(demo_world());

    for _ in 0..60 {
        let _ = game_loop.step(PlayerInput::new(HorizontalInput::Right, false));
    }

    let player = query::player(game_loop.world());
    assert!((player.position.x - 64.0).abs() < 1e-4);
    assert!(player.grounded);
}

#[test]
fn camera_starts_clamped_to_level_corner() {
    let world = demo_world();
    let camera = query::camera(&world);

    assert_eq!(camera.center, Vec2::new(400.0, 300.0));
    assert_eq!(camera.top_left(), Vec2::ZERO);
}
