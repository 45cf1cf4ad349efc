//! Game state and core simulation types
//!
//! Everything one play session needs lives in `GameSession`; the per-frame
//! `tick` is its only writer.

use glam::{Quat, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aabb::{Aabb, BoundedVolume};
use super::bricks::{Brick, BrickField};
use super::scheduler::Scheduler;
use super::target::Target;
use crate::config::{GameConfig, PaddleMode};
use crate::consts::*;
use crate::error::ConfigError;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GamePhase {
    /// Waiting for the player to place the play volume; nothing moves
    #[default]
    Unplaced,
    /// Physics and collisions run every frame
    Active,
    /// Out of lives; score is frozen
    Over,
}

/// What the ball bounced off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BounceKind {
    Wall { axis: u8 },
    Paddle,
    Target,
}

/// Notifications for the host (sound, UI, geometry updates)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Play volume anchored, game started
    Placed,
    Bounce(BounceKind),
    BrickBreak { id: u32 },
    ScoreChanged(u64),
    LivesChanged(u8),
    GameOver { score: u64 },
    /// Last brick destroyed; a new field follows shortly
    FieldCleared,
    FieldRegenerated { level: u32 },
    TargetRespawned,
}

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec3,
    /// Displacement per frame
    pub vel: Vec3,
    pub radius: f32,
}

impl Ball {
    pub fn new(radius: f32) -> Self {
        Self {
            pos: Vec3::ZERO,
            vel: Vec3::ZERO,
            radius,
        }
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }

    /// Bounding box used for wall, paddle and brick tests
    pub fn as_aabb(&self) -> Aabb {
        Aabb::around_sphere(self.pos, self.radius)
    }

    /// Pong serve: from the centre, each velocity component with a random sign
    pub fn serve_pong<R: Rng + ?Sized>(&mut self, velocity: Vec3, rng: &mut R) {
        let mut flip = |v: f32| if rng.random_bool(0.5) { -v } else { v };
        self.pos = Vec3::ZERO;
        self.vel = Vec3::new(flip(velocity.x), flip(velocity.y), flip(velocity.z));
    }

    /// Breakout serve: upward at 45°..135° from horizontal
    pub fn serve_breakout<R: Rng + ?Sized>(&mut self, from: Vec3, speed: f32, rng: &mut R) {
        let angle = rng.random_range(45.0_f32..=90.0).to_radians();
        let side = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
        self.pos = from;
        self.vel = Vec3::new(side * angle.cos() * speed, angle.sin() * speed, 0.0);
    }
}

/// The player's paddle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub pos: Vec3,
    pub half: Vec3,
}

impl Paddle {
    /// Paddle at rest in front of the face it defends
    pub fn new(mode: PaddleMode, volume: &BoundedVolume, half: Vec3, inset: f32) -> Self {
        let pos = match mode {
            PaddleMode::Pong3d => Vec3::new(0.0, 0.0, volume.half_extents.z - inset),
            PaddleMode::Breakout2d => Vec3::new(0.0, -volume.half_extents.y + inset, 0.0),
        };
        Self { pos, half }
    }

    pub fn as_aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.half)
    }

    /// Follow a world-space pointer on the controlled axes, clamped so the
    /// paddle plus `margin` stays inside the volume
    pub fn update_from_pointer(
        &mut self,
        world_point: Vec3,
        group: &GroupTransform,
        axes: &[usize],
        volume: &BoundedVolume,
        margin: f32,
    ) {
        let relative = group.to_local(world_point);
        if !relative.is_finite() {
            log::debug!("Ignoring non-finite pointer {world_point:?}");
            return;
        }
        for &a in axes {
            let limit = volume.limit(a, crate::axis(self.half, a), margin);
            crate::set_axis(
                &mut self.pos,
                a,
                crate::clamp_symmetric(crate::axis(relative, a), limit),
            );
        }
    }
}

/// Where the game group sits in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupTransform {
    pub origin: Vec3,
    pub orientation: Quat,
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

impl GroupTransform {
    /// World point into the volume's local frame
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.orientation.inverse() * (world - self.origin)
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.origin + self.orientation * local
    }
}

/// Score and lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub score: u64,
    pub lives: u8,
}

impl Ledger {
    pub fn new(lives: u8) -> Self {
        Self { score: 0, lives }
    }

    /// Add the fixed per-hit award, returning the new score
    pub fn award_hit(&mut self) -> u64 {
        self.score += SCORE_PER_HIT;
        self.score
    }

    /// Take one life, returning how many remain
    pub fn lose_life(&mut self) -> u8 {
        self.lives = self.lives.saturating_sub(1);
        self.lives
    }
}

/// Gap between paddle top and a freshly served ball
const SERVE_CLEARANCE: f32 = 0.005;

/// One play session: all entities, the ledger and deferred work
#[derive(Debug, Clone)]
pub struct GameSession {
    pub config: GameConfig,
    pub phase: GamePhase,
    pub volume: BoundedVolume,
    pub group: GroupTransform,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickField,
    pub target: Option<Target>,
    pub ledger: Ledger,
    /// Number of cleared brick fields
    pub level: u32,
    /// Active frames simulated
    pub frame: u64,
    /// Wall clock of the latest tick
    pub now_ms: u64,
    pub(crate) scheduler: Scheduler,
    pub(crate) rng: Pcg32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameSession {
    /// Validate the config and build an unplaced session
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let volume = BoundedVolume::new(config.volume_half_extents);
        let paddle = Paddle::new(
            config.mode,
            &volume,
            config.paddle_half_extents,
            config.paddle_inset,
        );
        // Laid out on placement
        let bricks = match &config.bricks {
            Some(layout) => BrickField::with_layout(layout),
            None => BrickField::empty(),
        };
        let target = config.target.as_ref().map(Target::new);

        Ok(Self {
            phase: GamePhase::Unplaced,
            volume,
            group: GroupTransform::default(),
            ball: Ball::new(config.ball_radius),
            paddle,
            bricks,
            target,
            ledger: Ledger::new(config.lives),
            level: 0,
            frame: 0,
            now_ms: 0,
            scheduler: Scheduler::new(),
            rng: Pcg32::seed_from_u64(config.seed),
            events: Vec::new(),
            config,
        })
    }

    /// Unplaced -> Active. Anchors the group and resets every entity.
    /// Returns false (and changes nothing) in any other phase, or when the
    /// point or orientation is unusable.
    pub fn place(&mut self, point: Vec3, orientation: Quat) -> bool {
        match self.phase {
            GamePhase::Unplaced => {}
            GamePhase::Active | GamePhase::Over => {
                log::warn!("Placement ignored in phase {:?}", self.phase);
                return false;
            }
        }
        let length = orientation.length();
        if !point.is_finite() || !orientation.is_finite() || length <= f32::EPSILON {
            log::warn!("Placement rejected: point {point:?}, orientation {orientation:?}");
            return false;
        }

        self.group = GroupTransform {
            origin: point,
            orientation: orientation / length,
        };
        self.ledger = Ledger::new(self.config.lives);
        self.level = 0;
        self.scheduler.clear();
        self.paddle = Paddle::new(
            self.config.mode,
            &self.volume,
            self.config.paddle_half_extents,
            self.config.paddle_inset,
        );
        self.bricks.regenerate(&self.volume);
        if let Some(target) = self.target.as_mut() {
            target.spawn(&self.volume, &mut self.rng);
        }
        self.serve();
        self.phase = GamePhase::Active;

        log::info!(
            "Game placed at ({:.2}, {:.2}, {:.2}), mode {:?}",
            point.x,
            point.y,
            point.z,
            self.config.mode
        );
        self.emit(GameEvent::Placed);
        self.emit(GameEvent::ScoreChanged(self.ledger.score));
        if self.config.mode == PaddleMode::Breakout2d {
            self.emit(GameEvent::LivesChanged(self.ledger.lives));
        }
        true
    }

    /// Reset the ball for a new point
    pub fn serve(&mut self) {
        match self.config.mode {
            PaddleMode::Pong3d => {
                self.ball.serve_pong(self.config.serve_velocity, &mut self.rng);
            }
            PaddleMode::Breakout2d => {
                let from = Vec3::new(
                    self.paddle.pos.x,
                    self.paddle.pos.y + self.paddle.half.y + self.ball.radius + SERVE_CLEARANCE,
                    0.0,
                );
                self.ball.serve_breakout(from, self.serve_speed(), &mut self.rng);
            }
        }
        log::debug!("Serve: pos {:?} vel {:?}", self.ball.pos, self.ball.vel);
    }

    /// Breakout serve speed for the current level
    pub fn serve_speed(&self) -> f32 {
        let scaled = self.config.serve_speed * (1.0 + self.level as f32 * self.config.level_speedup);
        scaled.min(self.config.max_speed)
    }

    /// Enter the terminal phase
    pub(crate) fn end_game(&mut self) {
        self.phase = GamePhase::Over;
        self.scheduler.clear();
        log::info!("Game over, final score {}", self.ledger.score);
        self.emit(GameEvent::GameOver {
            score: self.ledger.score,
        });
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Events produced since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Read-only view for hosts that render the session
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            score: self.ledger.score,
            lives: self.ledger.lives,
            level: self.level,
            ball: self.ball,
            paddle: self.paddle,
            bricks: self.bricks.alive().copied().collect(),
            target: self.target,
            group: self.group,
        }
    }
}

/// Serializable picture of a session at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub lives: u8,
    pub level: u32,
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: Vec<Brick>,
    pub target: Option<Target>,
    pub group: GroupTransform,
}
