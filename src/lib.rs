//! XR Breakout - simulation core for a pong-in-a-box / 3D breakout AR game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (kinematics, collisions, game state)
//! - `config`: Data-driven game setup and presets
//! - `platform`: Browser host bindings (wasm32 only)

pub mod config;
pub mod error;
pub mod platform;
pub mod sim;

pub use config::{GameConfig, PaddleMode, Preset};
pub use error::ConfigError;

use glam::Vec3;

/// Game configuration constants
pub mod consts {
    /// Score awarded per brick or target hit
    pub const SCORE_PER_HIT: u64 = 10;

    /// Play volume half-extent (1m cube in the first prototypes)
    pub const VOLUME_HALF_EXTENT: f32 = 0.5;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 0.05;
    /// Per-frame velocity of the pong serve
    pub const PONG_SERVE_VELOCITY: [f32; 3] = [0.05, 0.05, 0.04];
    /// Per-frame speed of the breakout serve
    pub const BREAKOUT_SERVE_SPEED: f32 = 0.012;
    /// Speed boost when ball hits paddle (multiplicative)
    pub const PADDLE_SPEEDUP: f32 = 1.02;
    /// Serve speed increase per cleared field
    pub const LEVEL_SPEEDUP: f32 = 0.1;
    /// Share of the ball speed that can go sideways after a paddle hit
    pub const PADDLE_DEFLECTION: f32 = 0.8;

    /// Paddle defaults
    pub const PADDLE_HALF_WIDTH: f32 = 0.2;
    pub const PADDLE_HALF_HEIGHT: f32 = 0.2;
    pub const PADDLE_HALF_DEPTH: f32 = 0.025;
    /// Pong paddle sits this far inside the camera-facing face
    pub const PADDLE_FACE_INSET: f32 = 0.1;
    /// Breakout paddle sits this far above the bottom face
    pub const PADDLE_LINE_INSET: f32 = 0.08;

    /// Target defaults
    pub const TARGET_HIT_RADIUS: f32 = 0.05;
    pub const TARGET_RESPAWN_MS: u64 = 3000;
    /// Fraction of the half-extents the target may spawn within
    pub const TARGET_SPAWN_FRACTION: f32 = 0.8;

    /// Brick defaults
    pub const BRICK_ROWS: u32 = 4;
    pub const BRICK_COLS: u32 = 6;
    pub const BRICK_GAP: f32 = 0.01;
    pub const BRICK_TOP_MARGIN: f32 = 0.05;
    pub const BRICK_COLOR_COUNT: u32 = 6;
    /// Upper bound on rows * cols
    pub const MAX_BRICKS: u32 = 1024;
    pub const FIELD_REGEN_MS: u64 = 1000;

    /// Breakout lives
    pub const START_LIVES: u8 = 3;
}

/// Component of a vector by axis index (0 = x, 1 = y, 2 = z)
#[inline]
pub fn axis(v: Vec3, index: usize) -> f32 {
    v.to_array()[index]
}

/// Overwrite one component of a vector by axis index
#[inline]
pub fn set_axis(v: &mut Vec3, index: usize, value: f32) {
    match index {
        0 => v.x = value,
        1 => v.y = value,
        _ => v.z = value,
    }
}

/// Clamp a value to a symmetric range `[-limit, limit]`
#[inline]
pub fn clamp_symmetric(value: f32, limit: f32) -> f32 {
    value.clamp(-limit, limit)
}
