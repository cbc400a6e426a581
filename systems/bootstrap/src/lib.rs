#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure bootstrap system that prepares the platformer experience.
//!
//! Stands in for a level loader: it produces the hardcoded demo level and the
//! spawn point used when the configuration does not name one.

use glam::Vec2;
use platformer_core::{LevelError, TileGrid, TileGridBuilder};
use platformer_world::{query, World};

const DEMO_COLUMNS: u32 = 40;
const DEMO_ROWS: u32 = 15;

/// Produces the data required to start a play session.
#[derive(Debug, Default)]
pub struct Bootstrap;

impl Bootstrap {
    /// Derives the banner that should be shown when the experience starts.
    #[must_use]
    pub fn welcome_banner<'world>(&self, world: &'world World) -> &'world str {
        query::welcome_banner(world)
    }

    /// Builds the 40x15 demo level: a full floor, floating platforms and walls.
    pub fn demo_level(&self, tile_length: f32) -> Result<TileGrid, LevelError> {
        let floor = DEMO_ROWS - 1;
        TileGridBuilder::new(DEMO_COLUMNS, DEMO_ROWS, tile_length)
            .solid_row(floor, 0..DEMO_COLUMNS)
            .solid_row(10, 5..10)
            .solid_row(8, 12..16)
            .solid_row(6, 15..17)
            .solid_row(10, 25..30)
            .solid_row(7, 32..36)
            .solid_row(12, 21..23)
            .solid_column(2, 11..floor)
            .solid_column(18, 6..11)
            .solid_column(38, 8..floor)
            .build()
    }

    /// Spawn point one and a half tiles in and three tiles above the bottom edge.
    #[must_use]
    pub fn default_respawn_point(&self, grid: &TileGrid) -> Vec2 {
        let tile_length = grid.tile_length();
        Vec2::new(
            tile_length * 1.5,
            tile_length * (grid.rows() as f32 - 3.0),
        )
    }

    /// Resolves the configured spawn point, falling back to the level default.
    #[must_use]
    pub fn respawn_point(&self, configured: Option<Vec2>, grid: &TileGrid) -> Vec2 {
        configured.unwrap_or_else(|| self.default_respawn_point(grid))
    }
}
