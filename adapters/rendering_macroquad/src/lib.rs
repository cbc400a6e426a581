#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the platformer.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment.
//! To keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature.

use anyhow::{ensure, Result};
use glam::Vec2;
use macroquad::input::{is_key_down, is_key_pressed, KeyCode};
use platformer_core::HorizontalInput;
use platformer_rendering::{
    CameraPresentation, Color, FrameInput, PlayerPresentation, Presentation,
    RenderingBackend, Scene, TileGridPresentation,
};
use std::time::Duration;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyboardState {
    /// `Escape` leaves the game loop.
    quit_requested: bool,
    /// `Left` held this frame.
    left_held: bool,
    /// `Right` held this frame.
    right_held: bool,
    /// `Space` or `Up` went down this frame.
    jump_pressed: bool,
}

impl KeyboardState {
    fn poll() -> Self {
        Self {
            quit_requested: is_key_pressed(KeyCode::Escape),
            left_held: is_key_down(KeyCode::Left),
            right_held: is_key_down(KeyCode::Right),
            jump_pressed: is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::Up),
        }
    }

    fn frame_input(self) -> FrameInput {
        FrameInput {
            horizontal: HorizontalInput::from_held(self.left_held, self.right_held),
            jump_pressed: self.jump_pressed,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame rate once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average frame rate once one
    /// second has elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames;
        self.elapsed = Duration::ZERO;
        self.frames = 0;

        if seconds <= f32::EPSILON {
            return None;
        }
        Some(frames as f32 / seconds)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let viewport = scene.camera.viewport;
        ensure!(
            viewport.x >= 1.0 && viewport.y >= 1.0,
            "viewport {viewport:?} is too small to open a window"
        );

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: viewport.x.round() as i32,
            window_height: viewport.y.round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        tracing::debug!(?viewport, ?swap_interval, "opening macroquad window");

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(clear_color);
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardState::poll();
                if keyboard.quit_requested {
                    tracing::info!("quit requested");
                    break;
                }

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                update_scene(frame_dt, keyboard.frame_input(), &mut scene);

                macroquad::window::clear_background(background);
                let metrics = SceneMetrics::from_camera(
                    &scene.camera,
                    macroquad::window::screen_width(),
                    macroquad::window::screen_height(),
                );
                draw_tiles(&scene.tile_grid, &metrics);
                draw_player(&scene.player, &metrics);

                if let Some(per_second) = fps_counter.record_frame(frame_dt) {
                    if show_fps {
                        tracing::info!(fps = per_second, "frame rate");
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps level pixels seen through the camera onto the window.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset: Vec2,
    camera: CameraPresentation,
}

impl SceneMetrics {
    fn from_camera(camera: &CameraPresentation, screen_width: f32, screen_height: f32) -> Self {
        let viewport = camera.viewport;
        let scale = if viewport.x <= f32::EPSILON || viewport.y <= f32::EPSILON {
            1.0
        } else {
            (screen_width / viewport.x).min(screen_height / viewport.y)
        };
        let scaled = viewport * scale;
        let offset = Vec2::new(
            ((screen_width - scaled.x) * 0.5).max(0.0),
            ((screen_height - scaled.y) * 0.5).max(0.0),
        );

        Self {
            scale,
            offset,
            camera: *camera,
        }
    }

    fn to_screen(&self, world_position: Vec2) -> Vec2 {
        self.offset + self.camera.to_view(world_position) * self.scale
    }
}

fn draw_tiles(grid: &TileGridPresentation, metrics: &SceneMetrics) {
    let color = to_macroquad_color(grid.tile_color);
    for (column, row) in grid.visible_solid_tiles(&metrics.camera) {
        let bounds = grid.tile_bounds(column, row);
        let top_left = metrics.to_screen(bounds.min);
        let size = bounds.size * metrics.scale;
        macroquad::shapes::draw_rectangle(top_left.x, top_left.y, size.x, size.y, color);
    }
}

fn draw_player(player: &PlayerPresentation, metrics: &SceneMetrics) {
    let bounds = player.bounds();
    let top_left = metrics.to_screen(bounds.min);
    let size = bounds.size * metrics.scale;
    macroquad::shapes::draw_rectangle(
        top_left.x,
        top_left.y,
        size.x,
        size.y,
        to_macroquad_color(player.color),
    );
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
