//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed per-frame step only
//! - Seeded RNG only
//! - Wall clock only through `TickInput::now_ms`
//! - Stable iteration order (insertion order for bricks)
//! - No rendering, audio or platform dependencies

pub mod aabb;
pub mod bricks;
pub mod collision;
pub mod scheduler;
pub mod state;
pub mod target;
pub mod tick;

pub use aabb::{Aabb, BoundedVolume, Face};
pub use bricks::{Brick, BrickField};
pub use collision::{ball_missed, brick_reflect_axis, reflect_brick, reflect_paddle, reflect_walls};
pub use scheduler::{Scheduler, TaskKey};
pub use state::{
    Ball, BounceKind, GameEvent, GamePhase, GameSession, GroupTransform, Ledger, Paddle, Snapshot,
};
pub use target::Target;
pub use tick::{Placement, TickInput, integrate, resolve, tick};
