#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Camera that follows the player while keeping the view inside the level.

use glam::Vec2;
use platformer_core::CameraSnapshot;

/// Follows a target point with a fixed-size viewport clamped to the level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFollow {
    viewport: Vec2,
}

impl CameraFollow {
    /// Creates a camera with the provided viewport size in pixels.
    #[must_use]
    pub const fn new(viewport: Vec2) -> Self {
        Self { viewport }
    }

    /// Computes the view center for the player inside a level of `level_size` pixels.
    #[must_use]
    pub fn compute_center(&self, player_position: Vec2, level_size: Vec2) -> Vec2 {
        compute_center(player_position, self.viewport, level_size)
    }

    /// Captures the camera state for the provided center.
    #[must_use]
    pub const fn snapshot(&self, center: Vec2) -> CameraSnapshot {
        CameraSnapshot {
            center,
            viewport: self.viewport,
        }
    }
}

/// Clamps `player_position` so the viewport stays inside `[0, level_size]`.
///
/// Each axis is handled independently. On an axis where the level is smaller
/// than the viewport the camera centers the level instead of tracking.
#[must_use]
pub fn compute_center(player_position: Vec2, viewport: Vec2, level_size: Vec2) -> Vec2 {
    Vec2::new(
        clamp_axis(player_position.x, viewport.x, level_size.x),
        clamp_axis(player_position.y, viewport.y, level_size.y),
    )
}

fn clamp_axis(target: f32, viewport_extent: f32, level_extent: f32) -> f32 {
    let (min, max) = if level_extent < viewport_extent {
        (level_extent * 0.5, level_extent * 0.5)
    } else {
        (viewport_extent * 0.5, level_extent - viewport_extent * 0.5)
    };

    target.clamp(min, max)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: Vec2 = Vec2::new(800.0, 600.0);
    const LEVEL: Vec2 = Vec2::new(1600.0, 600.0);

    #[test]
    fn tracks_player_inside_scrollable_range() {
        let center = compute_center(Vec2::new(900.0, 300.0), VIEWPORT, LEVEL);
        assert_eq!(center, Vec2::new(900.0, 300.0));
    }

    #[test]
    fn clamps_at_level_edges() {
        assert_eq!(
            compute_center(Vec2::new(10.0, 300.0), VIEWPORT, LEVEL).x,
            400.0
        );
        assert_eq!(
            compute_center(Vec2::new(1590.0, 300.0), VIEWPORT, LEVEL).x,
            1200.0
        );
    }

    #[test]
    fn equal_extent_pins_center_to_half_level() {
        for player_y in [-50.0, 0.0, 120.0, 599.0, 2_000.0] {
            let center = compute_center(Vec2::new(500.0, player_y), VIEWPORT, LEVEL);
            assert_eq!(center.y, 300.0);
        }
    }

    #[test]
    fn small_level_is_centered_instead_of_tracked() {
        let level = Vec2::new(120.0, 40.0);
        for player in [Vec2::ZERO, Vec2::new(110.0, 35.0), Vec2::new(-500.0, 900.0)] {
            assert_eq!(
                compute_center(player, VIEWPORT, level),
                Vec2::new(60.0, 20.0)
            );
        }
    }

    #[test]
    fn axes_are_clamped_independently() {
        let level = Vec2::new(2_000.0, 300.0);
        let center = compute_center(Vec2::new(1_000.0, 10.0), VIEWPORT, level);
        assert_eq!(center, Vec2::new(1_000.0, 150.0));
    }

    #[test]
    fn viewport_never_leaves_level_on_scrollable_axes() {
        let camera = CameraFollow::new(VIEWPORT);
        for x in (-200..2_000).step_by(37) {
            let center = camera.compute_center(Vec2::new(x as f32, 0.0), LEVEL);
            let snapshot = camera.snapshot(center);
            let left = snapshot.top_left().x;
            assert!(left >= 0.0);
            assert!(left + VIEWPORT.x <= LEVEL.x);
        }
    }
}
