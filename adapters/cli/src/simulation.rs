//! Fixed-rate game loop that drives the world from frame-rate input.

use std::time::Duration;

use glam::Vec2;
use platformer_core::{Command, Event, PlayerInput};
use platformer_rendering::{
    CameraPresentation, Color, FrameInput, PlayerPresentation, Presentation, Scene,
    TileGridPresentation,
};
use platformer_world::{self as world, query, World};

/// Simulation ticks per second.
pub const TICK_RATE_HZ: u32 = 60;

/// Upper bound on ticks run for a single rendered frame.
pub const MAX_TICKS_PER_FRAME: u32 = 5;

/// Title of the game window.
pub const WINDOW_TITLE: &str = "Scrolling Platformer";

/// Background color behind the level.
pub const CLEAR_COLOR: Color = Color::from_rgb_u8(100, 150, 255);

/// Fill color of solid tiles.
pub const TILE_COLOR: Color = Color::from_rgb_u8(0, 0, 255);

/// Fill color of the player box.
pub const PLAYER_COLOR: Color = Color::from_rgb_u8(0, 255, 0);

/// Converts variable frame durations into a whole number of fixed ticks.
#[derive(Clone, Debug)]
pub struct TickClock {
    step: Duration,
    max_ticks_per_frame: u32,
    accumulator: Duration,
}

impl TickClock {
    /// Creates a clock ticking `tick_rate_hz` times per second.
    #[must_use]
    pub fn new(tick_rate_hz: u32, max_ticks_per_frame: u32) -> Self {
        Self {
            step: (Duration::from_secs(1) / tick_rate_hz.max(1)).max(Duration::from_nanos(1)),
            max_ticks_per_frame,
            accumulator: Duration::ZERO,
        }
    }

    /// Duration of a single tick.
    #[must_use]
    pub const fn step(&self) -> Duration {
        self.step
    }

    /// Accumulates `frame` and returns how many ticks are due.
    ///
    /// When more than `max_ticks_per_frame` ticks are pending the backlog is
    /// discarded so a stalled frame does not trigger a burst of catch-up ticks.
    pub fn advance(&mut self, frame: Duration) -> u32 {
        self.accumulator += frame;

        let pending = self.accumulator.as_nanos() / self.step.as_nanos();
        let due = pending.min(u128::from(self.max_ticks_per_frame)) as u32;
        self.accumulator -= self.step * due;

        if pending > u128::from(due) {
            tracing::debug!(
                dropped = (pending - u128::from(due)) as u64,
                "tick backlog discarded"
            );
            self.accumulator = Duration::from_nanos(
                (self.accumulator.as_nanos() % self.step.as_nanos()) as u64,
            );
        }

        due
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new(TICK_RATE_HZ, MAX_TICKS_PER_FRAME)
    }
}

/// Remembers a jump press until a tick consumes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JumpLatch {
    pending: bool,
}

impl JumpLatch {
    /// Records a press observed on the current frame.
    pub fn register(&mut self, pressed: bool) {
        self.pending |= pressed;
    }

    /// Consumes the pending press, if any.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }
}

/// Drives the world at a fixed tick rate from per-frame input.
#[derive(Debug)]
pub struct GameLoop {
    world: World,
    clock: TickClock,
    jump: JumpLatch,
    events: Vec<Event>,
}

impl GameLoop {
    /// Wraps `world` with the default 60 Hz clock.
    #[must_use]
    pub fn new(world: World) -> Self {
        Self::with_clock(world, TickClock::default())
    }

    /// Wraps `world` with a custom clock.
    #[must_use]
    pub fn with_clock(world: World, clock: TickClock) -> Self {
        Self {
            world,
            clock,
            jump: JumpLatch::default(),
            events: Vec::new(),
        }
    }

    /// Read-only access to the simulated world.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Runs every tick due after `frame` elapsed and returns their events.
    ///
    /// Held directions apply to every tick of the frame while a jump press is
    /// consumed by the first tick only. A press seen on a frame without a due
    /// tick carries over to the next one.
    pub fn frame(&mut self, frame: Duration, input: FrameInput) -> &[Event] {
        self.jump.register(input.jump_pressed);
        self.events.clear();

        let due = self.clock.advance(frame);
        for _ in 0..due {
            let tick_input = FrameInput {
                jump_pressed: self.jump.take(),
                ..input
            };
            self.tick(tick_input.player_input());
        }
        &self.events
    }

    /// Runs exactly one tick and returns the events it produced.
    pub fn step(&mut self, input: PlayerInput) -> &[Event] {
        self.events.clear();
        self.tick(input);
        &self.events
    }

    fn tick(&mut self, input: PlayerInput) {
        let start = self.events.len();
        world::apply(&mut self.world, Command::Tick { input }, &mut self.events);
        for event in &self.events[start..] {
            tracing::trace!(?event, "simulation event");
        }
    }

    /// Copies the current player and camera state into `scene`.
    pub fn refresh_scene(&self, scene: &mut Scene) {
        scene.player = PlayerPresentation::from_snapshot(&query::player(&self.world), PLAYER_COLOR);
        scene.camera = CameraPresentation::from_snapshot(&query::camera(&self.world));
    }
}

/// Builds the initial presentation for `world`.
#[must_use]
pub fn presentation(world: &World) -> Presentation {
    let scene = Scene::new(
        TileGridPresentation::from_grid(query::tile_grid(world), TILE_COLOR),
        PlayerPresentation::from_snapshot(&query::player(world), PLAYER_COLOR),
        CameraPresentation::from_snapshot(&query::camera(world)),
    );
    Presentation::new(WINDOW_TITLE, CLEAR_COLOR, scene)
}

/// Outcome of a run without a window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeadlessSummary {
    /// Ticks simulated.
    pub ticks: u64,
    /// Times the player fell out of the level.
    pub respawns: u64,
    /// Final player center.
    pub position: Vec2,
    /// Whether the player ended on solid ground.
    pub grounded: bool,
}

/// Runs `ticks` idle ticks and summarises the final state.
#[must_use]
pub fn run_headless(world: World, ticks: u64) -> HeadlessSummary {
    let mut game_loop = GameLoop::new(world);
    for _ in 0..ticks {
        let _ = game_loop.step(PlayerInput::default());
    }

    let world = game_loop.world();
    let player = query::player(world);
    HeadlessSummary {
        ticks: query::tick_index(world),
        respawns: query::respawn_count(world),
        position: player.position,
        grounded: player.grounded,
    }
}
