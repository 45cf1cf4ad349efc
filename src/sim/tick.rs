//! Per-frame simulation step
//!
//! One `tick` per rendered frame. Order within a frame is fixed: deferred
//! tasks, paddle, integrate, then walls, paddle, bricks, target, miss.

use glam::{Quat, Vec3};

use super::collision::{ball_missed, reflect_brick, reflect_paddle, reflect_walls};
use super::scheduler::TaskKey;
use super::state::{Ball, BounceKind, GameEvent, GamePhase, GameSession};
use crate::config::PaddleMode;

/// World-space anchor chosen by the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub point: Vec3,
    pub orientation: Quat,
}

impl Placement {
    pub fn at(point: Vec3) -> Self {
        Self {
            point,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Input for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Host wall clock in milliseconds
    pub now_ms: u64,
    /// Pointer / controller projection in world space, if any this frame
    pub pointer: Option<Vec3>,
    /// Placement confirmed this frame
    pub placement: Option<Placement>,
    /// Play volume re-anchored in world space
    pub origin: Option<Vec3>,
}

/// Advance the session by one frame
pub fn tick(session: &mut GameSession, input: &TickInput) {
    // Wall clock never runs backwards for the scheduler
    session.now_ms = session.now_ms.max(input.now_ms);

    if let Some(origin) = input.origin {
        session.group.origin = origin;
    }

    match session.phase {
        GamePhase::Unplaced => {
            if let Some(placement) = input.placement {
                session.place(placement.point, placement.orientation);
            }
            return;
        }
        GamePhase::Over => return,
        GamePhase::Active => {
            if input.placement.is_some() {
                log::debug!("Placement ignored while active");
            }
        }
    }

    session.frame += 1;
    run_due_tasks(session);

    if let Some(pointer) = input.pointer {
        let axes = session.config.mode.controlled_axes();
        let margin = session.config.paddle_margin;
        session
            .paddle
            .update_from_pointer(pointer, &session.group, axes, &session.volume, margin);
    }

    session.ball = integrate(session.ball);
    resolve(session);
}

/// Move the ball by one frame's worth of velocity
pub fn integrate(ball: Ball) -> Ball {
    Ball {
        pos: ball.pos + ball.vel,
        ..ball
    }
}

/// Fire deferred work that has come due
fn run_due_tasks(session: &mut GameSession) {
    for key in session.scheduler.poll(session.now_ms) {
        match key {
            TaskKey::TargetRespawn => {
                if let Some(target) = session.target.as_mut() {
                    target.spawn(&session.volume, &mut session.rng);
                    log::debug!("Target respawned at {:?}", target.pos);
                    session.emit(GameEvent::TargetRespawned);
                }
            }
            TaskKey::FieldRegen => {
                session.level += 1;
                session.bricks.regenerate(&session.volume);
                session.serve();
                log::info!(
                    "Level {}: new field of {} bricks, serve speed {:.4}",
                    session.level,
                    session.bricks.len(),
                    session.serve_speed()
                );
                session.emit(GameEvent::FieldRegenerated {
                    level: session.level,
                });
            }
        }
    }
}

/// Run every collision rule once, in priority order
pub fn resolve(session: &mut GameSession) {
    if session.phase != GamePhase::Active {
        return;
    }
    let mode = session.config.mode;

    // 1. Walls
    let flipped = reflect_walls(&mut session.ball, &session.volume, mode);
    for (axis, _) in flipped.iter().enumerate().filter(|(_, f)| **f) {
        session.emit(GameEvent::Bounce(BounceKind::Wall { axis: axis as u8 }));
    }

    // 2. Paddle
    if reflect_paddle(&mut session.ball, &session.paddle, &session.config) {
        session.emit(GameEvent::Bounce(BounceKind::Paddle));
    }

    // 3. Bricks: at most one per frame
    let hit = if session.bricks.is_enabled() {
        session
            .bricks
            .first_overlap(&session.ball.as_aabb())
            .copied()
    } else {
        None
    };
    if let Some(brick) = hit {
        reflect_brick(&mut session.ball, &brick);
        session.bricks.remove_brick(brick.id);
        let score = session.ledger.award_hit();
        log::debug!("Brick {} destroyed, {} left", brick.id, session.bricks.len());
        session.emit(GameEvent::BrickBreak { id: brick.id });
        session.emit(GameEvent::ScoreChanged(score));

        if session.bricks.is_cleared() {
            let fire_at = session.now_ms.saturating_add(session.config.field_regen_ms);
            session.scheduler.schedule(TaskKey::FieldRegen, fire_at);
            log::info!("Field cleared at level {}", session.level);
            session.emit(GameEvent::FieldCleared);
        }
    }

    // 4. Target
    let target_hit = session
        .target
        .as_ref()
        .is_some_and(|t| t.is_hit_by(&session.ball));
    if target_hit {
        if let Some(target) = session.target.as_mut() {
            target.hide(session.now_ms, &mut session.scheduler);
        }
        let score = session.ledger.award_hit();
        session.emit(GameEvent::ScoreChanged(score));
        session.emit(GameEvent::Bounce(BounceKind::Target));
    }

    // 5. Miss
    if mode == PaddleMode::Breakout2d && ball_missed(&session.ball, &session.volume) {
        let lives = session.ledger.lose_life();
        log::info!("Ball lost, {} lives left", lives);
        session.emit(GameEvent::LivesChanged(lives));
        if lives == 0 {
            session.end_game();
        } else {
            session.serve();
        }
    }
}
