#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the platformer.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing one simulation step or a level swap, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what happened. The tile grid, the player input snapshot and the
//! tuning constants live here so every crate reads the same definitions.

use std::ops::Range;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Scrolling Platformer.";

/// Kind of terrain stored in a single tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Open space the player moves through freely.
    #[default]
    Empty,
    /// Terrain the player collides with.
    Solid,
}

impl TileKind {
    /// Reports whether the tile blocks movement.
    #[must_use]
    pub const fn is_solid(self) -> bool {
        matches!(self, Self::Solid)
    }
}

/// Immutable grid of tiles that composes a level.
///
/// Cells are stored row-major and indexed by `row * columns + column`. The
/// grid never changes after construction; swapping levels builds a new grid.
#[derive(Clone, Debug, PartialEq)]
pub struct TileGrid {
    columns: u32,
    rows: u32,
    tile_length: f32,
    cells: Vec<TileKind>,
}

impl TileGrid {
    /// Creates a tile grid from a complete row-major cell assignment.
    ///
    /// Returns an error when the cell count does not match the dimensions or
    /// the tile length is not a positive finite number. Zero dimensions are
    /// accepted and yield a grid whose every query reports [`TileKind::Empty`].
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        cells: Vec<TileKind>,
    ) -> Result<Self, LevelError> {
        if !tile_length.is_finite() || tile_length <= 0.0 {
            return Err(LevelError::InvalidTileLength { tile_length });
        }

        let expected = cell_capacity(columns, rows);
        if cells.len() != expected {
            return Err(LevelError::CellCountMismatch {
                columns,
                rows,
                expected,
                actual: cells.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            cells,
        })
    }

    /// Creates a grid where every cell holds the same kind.
    pub fn filled(
        columns: u32,
        rows: u32,
        tile_length: f32,
        kind: TileKind,
    ) -> Result<Self, LevelError> {
        Self::new(
            columns,
            rows,
            tile_length,
            vec![kind; cell_capacity(columns, rows)],
        )
    }

    /// Returns the kind stored at the provided tile coordinate.
    ///
    /// Coordinates outside `[0, columns) x [0, rows)` report
    /// [`TileKind::Empty`], which lets callers scan ranges without separate
    /// bounds checks.
    #[must_use]
    pub fn kind_at(&self, column: i32, row: i32) -> TileKind {
        self.index(column, row)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(TileKind::Empty)
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in pixels.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the grid measured in pixels.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the grid measured in pixels.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Grid extent in pixels along both axes.
    #[must_use]
    pub fn pixel_size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    /// Converts a pixel coordinate into the index of the tile containing it.
    #[must_use]
    pub fn tile_index(&self, coordinate: f32) -> i32 {
        (coordinate / self.tile_length).floor() as i32
    }

    /// Iterates over the coordinates of every solid tile in row-major order.
    pub fn solid_tiles(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        let columns = self.columns.max(1);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, kind)| kind.is_solid())
            .map(move |(index, _)| {
                let index = index as u32;
                (index % columns, index / columns)
            })
    }

    fn index(&self, column: i32, row: i32) -> Option<usize> {
        let column = u32::try_from(column).ok()?;
        let row = u32::try_from(row).ok()?;
        if column < self.columns && row < self.rows {
            let width = usize::try_from(self.columns).ok()?;
            Some(usize::try_from(row).ok()? * width + usize::try_from(column).ok()?)
        } else {
            None
        }
    }
}

fn cell_capacity(columns: u32, rows: u32) -> usize {
    usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(usize::MAX)
}

/// Mutable staging area used by level loaders before a grid is frozen.
#[derive(Clone, Debug)]
pub struct TileGridBuilder {
    columns: u32,
    rows: u32,
    tile_length: f32,
    cells: Vec<TileKind>,
}

impl TileGridBuilder {
    /// Starts a builder where every cell is empty.
    #[must_use]
    pub fn new(columns: u32, rows: u32, tile_length: f32) -> Self {
        Self {
            columns,
            rows,
            tile_length,
            cells: vec![TileKind::Empty; cell_capacity(columns, rows)],
        }
    }

    /// Assigns a kind to a single cell. Writes outside the grid are ignored.
    #[must_use]
    pub fn set(mut self, column: u32, row: u32, kind: TileKind) -> Self {
        if column < self.columns && row < self.rows {
            let index = row as usize * self.columns as usize + column as usize;
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = kind;
            }
        }
        self
    }

    /// Marks a horizontal run of cells in `row` as solid.
    #[must_use]
    pub fn solid_row(self, row: u32, columns: Range<u32>) -> Self {
        columns.fold(self, |builder, column| {
            builder.set(column, row, TileKind::Solid)
        })
    }

    /// Marks a vertical run of cells in `column` as solid.
    #[must_use]
    pub fn solid_column(self, column: u32, rows: Range<u32>) -> Self {
        rows.fold(self, |builder, row| {
            builder.set(column, row, TileKind::Solid)
        })
    }

    /// Freezes the staged cells into an immutable grid.
    pub fn build(self) -> Result<TileGrid, LevelError> {
        TileGrid::new(self.columns, self.rows, self.tile_length, self.cells)
    }
}

/// Reasons a level cannot be turned into a [`TileGrid`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LevelError {
    /// The cell assignment does not cover the grid exactly.
    #[error("grid of {columns}x{rows} requires {expected} cells but {actual} were provided")]
    CellCountMismatch {
        /// Number of columns requested.
        columns: u32,
        /// Number of rows requested.
        rows: u32,
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count actually supplied.
        actual: usize,
    },
    /// Tiles must have a positive, finite side length.
    #[error("tile length must be positive and finite (received {tile_length})")]
    InvalidTileLength {
        /// Offending tile length.
        tile_length: f32,
    },
}

/// Axis-aligned box anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisBox {
    /// Top-left corner in pixels.
    pub min: Vec2,
    /// Width and height in pixels.
    pub size: Vec2,
}

impl AxisBox {
    /// Creates a box from its top-left corner and size.
    #[must_use]
    pub const fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    /// Creates a box centered on `center` spanning `half_extents` on each side.
    #[must_use]
    pub fn from_center(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            size: half_extents * 2.0,
        }
    }

    /// Bottom-right corner in pixels.
    #[must_use]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Center point in pixels.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }
}

/// Level-triggered horizontal movement request for a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalInput {
    /// Move toward decreasing x.
    Left,
    /// No horizontal movement.
    #[default]
    Idle,
    /// Move toward increasing x.
    Right,
}

impl HorizontalInput {
    /// Derives the request from held keys. Right wins when both are held.
    #[must_use]
    pub const fn from_held(left: bool, right: bool) -> Self {
        if right {
            Self::Right
        } else if left {
            Self::Left
        } else {
            Self::Idle
        }
    }

    /// Signed unit direction: `-1.0`, `0.0` or `1.0`.
    #[must_use]
    pub const fn direction(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Idle => 0.0,
            Self::Right => 1.0,
        }
    }
}

/// Input consumed by a single simulation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PlayerInput {
    /// Held horizontal direction.
    pub horizontal: HorizontalInput,
    /// Whether a jump press happened since the previous tick. Edge-triggered:
    /// holding the key must not keep this set.
    pub jump_pressed: bool,
}

impl PlayerInput {
    /// Creates a new input snapshot.
    #[must_use]
    pub const fn new(horizontal: HorizontalInput, jump_pressed: bool) -> Self {
        Self {
            horizontal,
            jump_pressed,
        }
    }
}

/// Tuning constants consumed by the player controller and collision resolver.
///
/// Velocities and accelerations are expressed per tick.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration added to the vertical velocity every tick.
    pub gravity: f32,
    /// Horizontal speed while a direction is held.
    pub move_speed: f32,
    /// Initial vertical velocity of a jump. Negative points up.
    pub jump_velocity: f32,
    /// Inward shrink applied to box edges when computing scan ranges.
    pub collision_epsilon: f32,
    /// Player box size as a fraction of one tile along each axis.
    pub player_scale: Vec2,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            move_speed: 5.0,
            jump_velocity: -18.0,
            collision_epsilon: 0.01,
            player_scale: Vec2::new(0.8, 0.95),
        }
    }
}

impl PhysicsConfig {
    /// Half extents of the player box for the provided tile length.
    #[must_use]
    pub fn player_half_extents(&self, tile_length: f32) -> Vec2 {
        self.player_scale * tile_length * 0.5
    }
}

/// Session-wide configuration for a play session.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of a tile in pixels used when building levels.
    pub tile_length: f32,
    /// Size of the visible area in pixels.
    pub viewport: Vec2,
    /// Where the player appears at start and after falling out of the level.
    /// `None` lets the level loader choose.
    pub respawn_point: Option<Vec2>,
    /// Movement and collision tuning.
    pub physics: PhysicsConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_length: 40.0,
            viewport: Vec2::new(800.0, 600.0),
            respawn_point: None,
            physics: PhysicsConfig::default(),
        }
    }
}

impl GameConfig {
    /// Checks that every tunable lies in a range the simulation can honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tile_length.is_finite() || self.tile_length <= 0.0 {
            return Err(ConfigError::TileLength(self.tile_length));
        }
        if !self.viewport.is_finite() || self.viewport.min_element() <= 0.0 {
            return Err(ConfigError::Viewport(self.viewport));
        }

        let physics = &self.physics;
        if !physics.gravity.is_finite() || physics.gravity < 0.0 {
            return Err(ConfigError::Gravity(physics.gravity));
        }
        if !physics.move_speed.is_finite() || physics.move_speed < 0.0 {
            return Err(ConfigError::MoveSpeed(physics.move_speed));
        }
        if !physics.jump_velocity.is_finite() || physics.jump_velocity > 0.0 {
            return Err(ConfigError::JumpVelocity(physics.jump_velocity));
        }
        let epsilon = physics.collision_epsilon;
        if !epsilon.is_finite() || epsilon < 0.0 || epsilon >= self.tile_length * 0.5 {
            return Err(ConfigError::CollisionEpsilon {
                epsilon,
                tile_length: self.tile_length,
            });
        }
        let scale = physics.player_scale;
        if !scale.is_finite() || scale.min_element() <= 0.0 || scale.max_element() > 1.0 {
            return Err(ConfigError::PlayerScale(scale));
        }

        Ok(())
    }
}

/// Reasons a [`GameConfig`] is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    /// Tile length must be positive and finite.
    #[error("tile_length must be positive and finite (received {0})")]
    TileLength(f32),
    /// Viewport extents must be positive and finite.
    #[error("viewport must be positive on both axes (received {0})")]
    Viewport(Vec2),
    /// Gravity must not point up.
    #[error("physics.gravity must be non-negative (received {0})")]
    Gravity(f32),
    /// Move speed must be non-negative.
    #[error("physics.move_speed must be non-negative (received {0})")]
    MoveSpeed(f32),
    /// Jumps must launch upward.
    #[error("physics.jump_velocity must be zero or negative (received {0})")]
    JumpVelocity(f32),
    /// Epsilon must stay well inside a tile.
    #[error("physics.collision_epsilon must lie in [0, {tile_length} / 2) (received {epsilon})")]
    CollisionEpsilon {
        /// Offending epsilon.
        epsilon: f32,
        /// Tile length it was checked against.
        tile_length: f32,
    },
    /// The player box must fit inside one tile.
    #[error("physics.player_scale must lie in (0, 1] on both axes (received {0})")]
    PlayerScale(Vec2),
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the active level and places the player at the respawn point.
    LoadLevel {
        /// Freshly constructed level grid.
        grid: TileGrid,
        /// Center position the player spawns and respawns at.
        respawn_point: Vec2,
    },
    /// Advances the simulation by one tick using the provided input.
    Tick {
        /// Input gathered for this tick.
        input: PlayerInput,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Announces that a new level became active.
    LevelLoaded {
        /// Number of tile columns in the level.
        columns: u32,
        /// Number of tile rows in the level.
        rows: u32,
    },
    /// Indicates that the simulation advanced by one tick.
    TimeAdvanced {
        /// Index of the tick that was just simulated, starting at one.
        tick: u64,
    },
    /// Confirms that a grounded player launched a jump.
    PlayerJumped {
        /// Vertical velocity assigned by the jump.
        velocity_y: f32,
    },
    /// Reports that the player touched down on a solid tile this tick.
    PlayerLanded {
        /// Player center after landing.
        position: Vec2,
    },
    /// Reports that the player fell through the bottom of the level and was reset.
    PlayerRespawned {
        /// Player center at the moment the fall was detected.
        fell_from: Vec2,
        /// Center position the player was restored to.
        respawn_point: Vec2,
    },
    /// Reports that the clamped camera center changed.
    CameraMoved {
        /// New camera center in pixels.
        center: Vec2,
    },
}

/// Immutable representation of the player used for queries and rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Center of the player box in pixels.
    pub position: Vec2,
    /// Velocity in pixels per tick.
    pub velocity: Vec2,
    /// Half the player box size.
    pub half_extents: Vec2,
    /// Whether the player rests on a solid tile.
    pub grounded: bool,
}

impl PlayerSnapshot {
    /// Player box in pixels.
    #[must_use]
    pub fn bounds(&self) -> AxisBox {
        AxisBox::from_center(self.position, self.half_extents)
    }
}

/// Immutable representation of the camera used for queries and rendering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
    /// Center of the view in pixels.
    pub center: Vec2,
    /// Size of the view in pixels.
    pub viewport: Vec2,
}

impl CameraSnapshot {
    /// Top-left corner of the view in pixels.
    #[must_use]
    pub fn top_left(&self) -> Vec2 {
        self.center - self.viewport * 0.5
    }
}
