#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for platformer adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use platformer_core::{
    AxisBox, CameraSnapshot, HorizontalInput, PlayerInput, PlayerSnapshot, TileGrid,
};
use std::{ops::Range, time::Duration};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct FrameInput {
    /// Horizontal direction held during the frame.
    pub horizontal: HorizontalInput,
    /// Whether a jump key went down during the frame.
    pub jump_pressed: bool,
}

impl FrameInput {
    /// Converts the frame input into a simulation input for a single tick.
    #[must_use]
    pub const fn player_input(self) -> PlayerInput {
        PlayerInput::new(self.horizontal, self.jump_pressed)
    }
}

/// Describes the level tiles that adapters draw.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGridPresentation {
    /// Number of columns contained in the grid.
    pub columns: u32,
    /// Number of rows contained in the grid.
    pub rows: u32,
    /// Side length of a single tile expressed in pixels.
    pub tile_length: f32,
    /// Color used to fill solid tiles.
    pub tile_color: Color,
    solid: Vec<bool>,
}

impl TileGridPresentation {
    /// Captures the solid tiles of a validated level grid.
    #[must_use]
    pub fn from_grid(grid: &TileGrid, tile_color: Color) -> Self {
        let columns = grid.columns() as usize;
        let mut solid = vec![false; columns * grid.rows() as usize];
        for (column, row) in grid.solid_tiles() {
            solid[row as usize * columns + column as usize] = true;
        }

        Self {
            columns: grid.columns(),
            rows: grid.rows(),
            tile_length: grid.tile_length(),
            tile_color,
            solid,
        }
    }

    /// Reports whether the tile at the provided coordinates is solid.
    ///
    /// Coordinates outside the grid are never solid.
    #[must_use]
    pub fn is_solid(&self, column: u32, row: u32) -> bool {
        if column >= self.columns || row >= self.rows {
            return false;
        }
        let index = row as usize * self.columns as usize + column as usize;
        self.solid.get(index).copied().unwrap_or(false)
    }

    /// Pixel rectangle covered by the provided tile.
    #[must_use]
    pub fn tile_bounds(&self, column: u32, row: u32) -> AxisBox {
        AxisBox::new(
            Vec2::new(column as f32, row as f32) * self.tile_length,
            Vec2::splat(self.tile_length),
        )
    }

    /// Enumerates the solid tiles that intersect the camera view.
    pub fn visible_solid_tiles<'a>(
        &'a self,
        camera: &CameraPresentation,
    ) -> impl Iterator<Item = (u32, u32)> + 'a {
        TileRange::visible(self, camera)
            .iter()
            .filter(move |&(column, row)| self.is_solid(column, row))
    }
}

/// Half-open range of tile coordinates selected for drawing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileRange {
    /// Columns included in the range.
    pub columns: Range<u32>,
    /// Rows included in the range.
    pub rows: Range<u32>,
}

impl TileRange {
    /// Computes the tiles covered by the camera view, clamped to the grid.
    ///
    /// The far edges include one extra tile so partially visible tiles on the
    /// right and bottom are still drawn.
    #[must_use]
    pub fn visible(grid: &TileGridPresentation, camera: &CameraPresentation) -> Self {
        let top_left = camera.top_left();
        let bottom_right = top_left + camera.viewport;

        Self {
            columns: visible_axis(top_left.x, bottom_right.x, grid.tile_length, grid.columns),
            rows: visible_axis(top_left.y, bottom_right.y, grid.tile_length, grid.rows),
        }
    }

    /// Iterates tile coordinates row by row.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32)> {
        let columns = self.columns.clone();
        self.rows
            .clone()
            .flat_map(move |row| columns.clone().map(move |column| (column, row)))
    }
}

fn visible_axis(near: f32, far: f32, tile_length: f32, count: u32) -> Range<u32> {
    let limit = count as f32;
    let start = (near / tile_length).floor().clamp(0.0, limit) as u32;
    let end = ((far / tile_length).floor() + 1.0).clamp(0.0, limit) as u32;
    start..end.max(start)
}

/// Describes the player box drawn by adapters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerPresentation {
    /// Center of the player box in pixels.
    pub position: Vec2,
    /// Half the width and height of the player box.
    pub half_extents: Vec2,
    /// Fill color of the player box.
    pub color: Color,
}

impl PlayerPresentation {
    /// Creates a player descriptor from a simulation snapshot.
    #[must_use]
    pub const fn from_snapshot(snapshot: &PlayerSnapshot, color: Color) -> Self {
        Self {
            position: snapshot.position,
            half_extents: snapshot.half_extents,
            color,
        }
    }

    /// Pixel rectangle covered by the player.
    #[must_use]
    pub fn bounds(&self) -> AxisBox {
        AxisBox::from_center(self.position, self.half_extents)
    }
}

/// Describes the view into the level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPresentation {
    /// Center of the view in level pixels.
    pub center: Vec2,
    /// Size of the view in pixels.
    pub viewport: Vec2,
}

impl CameraPresentation {
    /// Creates a camera descriptor from a simulation snapshot.
    #[must_use]
    pub const fn from_snapshot(snapshot: &CameraSnapshot) -> Self {
        Self {
            center: snapshot.center,
            viewport: snapshot.viewport,
        }
    }

    /// Level position shown at the top-left corner of the view.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        self.center - self.viewport * 0.5
    }

    /// Converts a level position into view coordinates.
    #[must_use]
    pub fn to_view(&self, world_position: Vec2) -> Vec2 {
        world_position - self.top_left()
    }
}

/// Scene description combining the level tiles, player and camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Level tiles.
    pub tile_grid: TileGridPresentation,
    /// Player box.
    pub player: PlayerPresentation,
    /// View into the level.
    pub camera: CameraPresentation,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(
        tile_grid: TileGridPresentation,
        player: PlayerPresentation,
        camera: CameraPresentation,
    ) -> Self {
        Self {
            tile_grid,
            player,
            camera,
        }
    }
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting platformer scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the measured frame delta
    /// and the input captured by the adapter, and refreshes the scene before
    /// it is drawn.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}

#[cfg(test)]
mod tests {
    use super::*;
    use platformer_core::{TileGridBuilder, TileKind};

    const BLUE: Color = Color::from_rgb_u8(0, 0, 255);

    fn level_presentation() -> TileGridPresentation {
        let grid = TileGridBuilder::new(40, 15, 40.0)
            .solid_row(14, 0..40)
            .set(20, 10, TileKind::Solid)
            .build()
            .expect("level");
        TileGridPresentation::from_grid(&grid, BLUE)
    }

    fn camera(center: Vec2) -> CameraPresentation {
        CameraPresentation {
            center,
            viewport: Vec2::new(800.0, 600.0),
        }
    }

    #[test]
    fn from_grid_preserves_solidity() {
        let presentation = level_presentation();

        assert!(presentation.is_solid(20, 10));
        assert!(presentation.is_solid(0, 14));
        assert!(!presentation.is_solid(19, 10));
        assert!(!presentation.is_solid(40, 14));
    }

    #[test]
    fn from_grid_marks_exactly_the_grid_solid_tiles() {
        let grid = TileGridBuilder::new(3, 2, 40.0)
            .set(2, 0, TileKind::Solid)
            .set(0, 1, TileKind::Solid)
            .build()
            .expect("level");
        let presentation = TileGridPresentation::from_grid(&grid, BLUE);

        let flagged: Vec<_> = (0..2)
            .flat_map(|row| (0..3).map(move |column| (column, row)))
            .filter(|&(column, row)| presentation.is_solid(column, row))
            .collect();
        assert_eq!(flagged, vec![(2, 0), (0, 1)]);
        assert_eq!(presentation.tile_length, 40.0);
    }

    #[test]
    fn visible_range_adds_one_tile_on_far_edges() {
        let range = TileRange::visible(&level_presentation(), &camera(Vec2::new(1_000.0, 300.0)));

        assert_eq!(range.columns, 15..36);
        assert_eq!(range.rows, 0..15);
    }

    #[test]
    fn visible_range_is_clamped_to_grid() {
        let grid = level_presentation();

        let origin = TileRange::visible(&grid, &camera(Vec2::new(400.0, 300.0)));
        assert_eq!(origin.columns, 0..21);

        let far_right = TileRange::visible(&grid, &camera(Vec2::new(1_200.0, 300.0)));
        assert_eq!(far_right.columns, 20..40);
    }

    #[test]
    fn view_outside_level_selects_nothing() {
        let range = TileRange::visible(&level_presentation(), &camera(Vec2::new(-1_000.0, 300.0)));

        assert_eq!(range.columns, 0..0);
        assert_eq!(range.iter().count(), 0);
    }

    #[test]
    fn visible_solid_tiles_skip_culled_columns() {
        let grid = level_presentation();

        let tiles: Vec<_> = grid
            .visible_solid_tiles(&camera(Vec2::new(400.0, 300.0)))
            .collect();

        assert!(tiles.contains(&(20, 10)));
        assert!(tiles.contains(&(0, 14)));
        assert!(!tiles.iter().any(|&(column, _)| column > 20));
        assert_eq!(tiles.len(), 22);
    }

    #[test]
    fn camera_maps_world_positions_into_view() {
        let view = camera(Vec2::new(1_000.0, 300.0));

        assert_eq!(view.top_left(), Vec2::new(600.0, 0.0));
        assert_eq!(view.to_view(Vec2::new(620.0, 40.0)), Vec2::new(20.0, 40.0));
    }

    #[test]
    fn frame_input_carries_into_player_input() {
        let frame = FrameInput {
            horizontal: HorizontalInput::Left,
            jump_pressed: true,
        };

        assert_eq!(
            frame.player_input(),
            PlayerInput::new(HorizontalInput::Left, true)
        );
    }
}
