#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Axis-separated collision resolution against a static tile grid.
//!
//! Each call moves a box by one tick of velocity. The vertical axis is
//! resolved first using the box's current columns; the horizontal axis is
//! then resolved using the rows the box occupies after the vertical pass.
//! Detection is discrete: only the tile row (or column) the box's leading
//! edge lands in is inspected, so a box travelling further than a tile plus
//! its own extent in a single tick can pass through thin terrain.

use glam::Vec2;
use platformer_core::{AxisBox, TileGrid};

/// Outcome of resolving one tick of movement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// Box position after movement and any snapping.
    pub bounds: AxisBox,
    /// Velocity with the components of blocked axes zeroed.
    pub velocity: Vec2,
    /// Whether the box landed on a solid tile during this call.
    pub grounded: bool,
}

/// Resolves moving boxes against solid tiles one axis at a time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CollisionResolver {
    epsilon: f32,
}

impl CollisionResolver {
    /// Creates a resolver that shrinks scan ranges inward by `epsilon` pixels.
    #[must_use]
    pub const fn new(epsilon: f32) -> Self {
        Self { epsilon }
    }

    /// Moves `bounds` by `velocity`, stopping at the first solid tile on each axis.
    ///
    /// `grounded` is only set by a downward landing observed in this call.
    #[must_use]
    pub fn resolve(&self, bounds: AxisBox, velocity: Vec2, grid: &TileGrid) -> Resolution {
        let mut resolution = Resolution {
            bounds,
            velocity,
            grounded: false,
        };

        self.resolve_vertical(&mut resolution, grid);
        self.resolve_horizontal(&mut resolution, grid);

        resolution
    }

    fn resolve_vertical(&self, resolution: &mut Resolution, grid: &TileGrid) {
        let velocity_y = resolution.velocity.y;
        if velocity_y == 0.0 {
            return;
        }

        let bounds = resolution.bounds;
        let tile_length = grid.tile_length();
        let (first_column, last_column) = self.span(grid, bounds.min.x, bounds.max().x);
        let predicted_top = bounds.min.y + velocity_y;
        let predicted_bottom = predicted_top + bounds.size.y;
        let top_row = grid.tile_index(predicted_top + self.epsilon);
        let bottom_row = grid.tile_index(predicted_bottom - self.epsilon);

        for column in first_column..=last_column {
            if velocity_y > 0.0 && grid.kind_at(column, bottom_row).is_solid() {
                resolution.bounds.min.y = bottom_row as f32 * tile_length - bounds.size.y;
                resolution.velocity.y = 0.0;
                resolution.grounded = true;
                tracing::trace!(column, row = bottom_row, "landed on tile");
                return;
            }

            if velocity_y < 0.0 && grid.kind_at(column, top_row).is_solid() {
                resolution.bounds.min.y = (top_row + 1) as f32 * tile_length;
                resolution.velocity.y = 0.0;
                tracing::trace!(column, row = top_row, "hit ceiling tile");
                return;
            }
        }

        resolution.bounds.min.y = predicted_top;
    }

    fn resolve_horizontal(&self, resolution: &mut Resolution, grid: &TileGrid) {
        let velocity_x = resolution.velocity.x;
        if velocity_x == 0.0 {
            return;
        }

        let bounds = resolution.bounds;
        let tile_length = grid.tile_length();
        let (first_row, last_row) = self.span(grid, bounds.min.y, bounds.max().y);
        let predicted_left = bounds.min.x + velocity_x;
        let predicted_right = predicted_left + bounds.size.x;
        let left_column = grid.tile_index(predicted_left + self.epsilon);
        let right_column = grid.tile_index(predicted_right - self.epsilon);

        for row in first_row..=last_row {
            if velocity_x > 0.0 && grid.kind_at(right_column, row).is_solid() {
                resolution.bounds.min.x = right_column as f32 * tile_length - bounds.size.x;
                resolution.velocity.x = 0.0;
                tracing::trace!(column = right_column, row, "blocked moving right");
                return;
            }

            if velocity_x < 0.0 && grid.kind_at(left_column, row).is_solid() {
                resolution.bounds.min.x = (left_column + 1) as f32 * tile_length;
                resolution.velocity.x = 0.0;
                tracing::trace!(column = left_column, row, "blocked moving left");
                return;
            }
        }

        resolution.bounds.min.x = predicted_left;
    }

    /// Inclusive tile index range covered by `[start, end]` shrunk by epsilon.
    fn span(&self, grid: &TileGrid, start: f32, end: f32) -> (i32, i32) {
        (
            grid.tile_index(start + self.epsilon),
            grid.tile_index(end - self.epsilon),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_core::{TileGridBuilder, TileKind};

    const TILE: f32 = 40.0;
    const EPSILON: f32 = 0.01;

    fn player_box(min: Vec2) -> AxisBox {
        AxisBox::new(min, Vec2::new(32.0, 38.0))
    }

    #[test]
    fn span_excludes_flush_neighbours() {
        let grid = TileGrid::filled(4, 4, TILE, TileKind::Empty).expect("grid");
        let resolver = CollisionResolver::new(EPSILON);

        assert_eq!(resolver.span(&grid, 40.0, 80.0), (1, 1));
        assert_eq!(resolver.span(&grid, 39.0, 81.0), (0, 2));
    }

    #[test]
    fn zero_velocity_leaves_box_untouched() {
        let grid = TileGrid::filled(3, 3, TILE, TileKind::Solid).expect("grid");
        let resolver = CollisionResolver::new(EPSILON);
        let bounds = player_box(Vec2::new(44.0, 1.0));

        let resolution = resolver.resolve(bounds, Vec2::ZERO, &grid);

        assert_eq!(resolution.bounds, bounds);
        assert_eq!(resolution.velocity, Vec2::ZERO);
        assert!(!resolution.grounded);
    }

    #[test]
    fn grounded_requires_downward_landing() {
        let grid = TileGridBuilder::new(3, 3, TILE)
            .solid_row(0, 0..3)
            .build()
            .expect("grid");
        let resolver = CollisionResolver::new(EPSILON);

        let resolution = resolver.resolve(
            player_box(Vec2::new(44.0, 45.0)),
            Vec2::new(0.0, -10.0),
            &grid,
        );

        assert!(!resolution.grounded);
        assert_eq!(resolution.bounds.min.y, 40.0);
    }
}
