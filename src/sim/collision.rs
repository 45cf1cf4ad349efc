//! Collision detection and response
//!
//! All tests use the ball's post-integration position; there is no swept
//! collision, so a fast enough ball can tunnel through a thin brick. Each
//! function here touches only the velocity components its rule owns.

use super::aabb::{BoundedVolume, Face};
use super::bricks::Brick;
use super::state::{Ball, Paddle};
use crate::config::{GameConfig, PaddleMode};
use crate::consts::PADDLE_DEFLECTION;

/// Reflect off the volume faces, each axis independently.
///
/// A component is negated only while it still points out through the face
/// the ball is crossing, so a ball that is already heading back in is left
/// alone and cannot stick to the wall. In breakout mode the bottom face is
/// open: crossing it is a miss, not a bounce.
///
/// Returns which axes flipped.
pub fn reflect_walls(ball: &mut Ball, volume: &BoundedVolume, mode: PaddleMode) -> [bool; 3] {
    let mut flipped = [false; 3];
    for (a, flip) in flipped.iter_mut().enumerate() {
        let v = crate::axis(ball.vel, a);
        let outward = match volume.face_crossed(ball.pos, ball.radius, a) {
            Some(Face::Max) => v > 0.0,
            Some(Face::Min) => v < 0.0 && !(mode == PaddleMode::Breakout2d && a == 1),
            None => false,
        };
        if outward {
            crate::set_axis(&mut ball.vel, a, -v);
            *flip = true;
        }
    }
    flipped
}

/// Bounce off the paddle when the boxes overlap and the ball is heading
/// toward it. Returns whether a bounce happened.
pub fn reflect_paddle(ball: &mut Ball, paddle: &Paddle, config: &GameConfig) -> bool {
    let mode = config.mode;
    let approach = crate::axis(ball.vel, mode.approach_axis()) * mode.approach_sign();
    if approach <= 0.0 || !ball.as_aabb().overlaps(&paddle.as_aabb()) {
        return false;
    }

    match mode {
        PaddleMode::Pong3d => {
            ball.vel.z = -ball.vel.z;
        }
        PaddleMode::Breakout2d => {
            // Steer by impact offset; speed up a little on every return
            let speed = (ball.vel.truncate().length() * config.paddle_speedup).min(config.max_speed);
            let offset_ratio = ((ball.pos.x - paddle.pos.x) / paddle.half.x).clamp(-1.0, 1.0);
            let vx = offset_ratio * speed * PADDLE_DEFLECTION;
            let vy = (speed * speed - vx * vx).max(0.0).sqrt();
            ball.vel.x = vx;
            ball.vel.y = vy;
        }
    }
    true
}

/// Which axis a brick hit reflects: 0 for a side hit, 1 for top/bottom.
/// Ties go to the vertical reflection.
pub fn brick_reflect_axis(ball: &Ball, brick: &Brick) -> usize {
    let dx = (ball.pos.x - brick.pos.x).abs() / brick.half.x;
    let dy = (ball.pos.y - brick.pos.y).abs() / brick.half.y;
    if dx > dy { 0 } else { 1 }
}

/// Reflect off a brick, returning the axis that flipped
pub fn reflect_brick(ball: &mut Ball, brick: &Brick) -> usize {
    let a = brick_reflect_axis(ball, brick);
    let v = crate::axis(ball.vel, a);
    crate::set_axis(&mut ball.vel, a, -v);
    a
}

/// Ball dropped through the open bottom face
pub fn ball_missed(ball: &Ball, volume: &BoundedVolume) -> bool {
    ball.pos.y - ball.radius < -volume.half_extents.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use glam::Vec3;
    use proptest::prelude::*;

    fn ball_at(pos: Vec3, vel: Vec3, radius: f32) -> Ball {
        Ball { pos, vel, radius }
    }

    #[test]
    fn test_wall_flip_single_axis() {
        let volume = BoundedVolume::new(Vec3::splat(0.5));
        let mut ball = ball_at(Vec3::new(0.51, 0.05, 0.04), Vec3::new(0.05, 0.05, 0.04), 0.05);
        let flipped = reflect_walls(&mut ball, &volume, PaddleMode::Pong3d);
        assert_eq!(flipped, [true, false, false]);
        assert_eq!(ball.vel, Vec3::new(-0.05, 0.05, 0.04));
    }

    #[test]
    fn test_wall_flip_corner_hits_two_axes() {
        let volume = BoundedVolume::new(Vec3::splat(0.5));
        let mut ball = ball_at(Vec3::new(-0.48, 0.48, 0.0), Vec3::new(-0.01, 0.02, 0.01), 0.05);
        let flipped = reflect_walls(&mut ball, &volume, PaddleMode::Pong3d);
        assert_eq!(flipped, [true, true, false]);
        assert_eq!(ball.vel, Vec3::new(0.01, -0.02, 0.01));
    }

    #[test]
    fn test_wall_does_not_stick() {
        let volume = BoundedVolume::new(Vec3::splat(0.5));
        // Still outside but already heading back in
        let mut ball = ball_at(Vec3::new(0.47, 0.0, 0.0), Vec3::new(-0.05, 0.0, 0.0), 0.05);
        assert_eq!(reflect_walls(&mut ball, &volume, PaddleMode::Pong3d), [false; 3]);
        assert_eq!(ball.vel.x, -0.05);
    }

    #[test]
    fn test_breakout_bottom_is_open() {
        let volume = BoundedVolume::new(Vec3::splat(0.5));
        let mut ball = ball_at(Vec3::new(0.0, -0.49, 0.0), Vec3::new(0.0, -0.01, 0.0), 0.03);
        assert_eq!(reflect_walls(&mut ball, &volume, PaddleMode::Breakout2d), [false; 3]);
        assert!(ball_missed(&ball, &volume));

        // Top still bounces
        let mut ball = ball_at(Vec3::new(0.0, 0.49, 0.0), Vec3::new(0.0, 0.01, 0.0), 0.03);
        assert_eq!(reflect_walls(&mut ball, &volume, PaddleMode::Breakout2d), [false, true, false]);
    }

    #[test]
    fn test_pong_paddle_reflects_z_only_when_approaching() {
        let config = GameConfig::default();
        let paddle = Paddle {
            pos: Vec3::new(0.0, 0.0, 0.4),
            half: Vec3::new(0.2, 0.2, 0.025),
        };
        let mut ball = ball_at(Vec3::new(0.1, -0.1, 0.36), Vec3::new(0.05, 0.05, 0.04), 0.05);
        assert!(reflect_paddle(&mut ball, &paddle, &config));
        assert_eq!(ball.vel, Vec3::new(0.05, 0.05, -0.04));

        // Moving away: no second flip
        assert!(!reflect_paddle(&mut ball, &paddle, &config));
        assert_eq!(ball.vel.z, -0.04);
    }

    #[test]
    fn test_pong_paddle_misses_outside_footprint() {
        let config = GameConfig::default();
        let paddle = Paddle {
            pos: Vec3::new(0.0, 0.0, 0.4),
            half: Vec3::new(0.2, 0.2, 0.025),
        };
        let mut ball = ball_at(Vec3::new(0.3, 0.0, 0.4), Vec3::new(0.0, 0.0, 0.04), 0.05);
        assert!(!reflect_paddle(&mut ball, &paddle, &config));
    }

    #[test]
    fn test_breakout_paddle_angles_by_offset() {
        let config = GameConfig::from_preset(Preset::BreakoutCube);
        let paddle = Paddle {
            pos: Vec3::new(0.0, -0.42, 0.0),
            half: Vec3::new(0.12, 0.02, 0.05),
        };

        // Centre hit goes straight up
        let mut ball = ball_at(Vec3::new(0.0, -0.38, 0.0), Vec3::new(0.005, -0.01, 0.0), 0.03);
        let before = ball.speed();
        assert!(reflect_paddle(&mut ball, &paddle, &config));
        assert!(ball.vel.x.abs() < 1e-6);
        assert!(ball.vel.y > 0.0);
        assert!((ball.speed() - before * config.paddle_speedup).abs() < 1e-6);

        // Right edge sends it right, beyond the edge clamps to the same ratio
        let mut right = ball_at(Vec3::new(0.12, -0.38, 0.0), Vec3::new(0.0, -0.01, 0.0), 0.03);
        let mut beyond = ball_at(Vec3::new(0.14, -0.38, 0.0), Vec3::new(0.0, -0.01, 0.0), 0.03);
        assert!(reflect_paddle(&mut right, &paddle, &config));
        assert!(reflect_paddle(&mut beyond, &paddle, &config));
        assert!(right.vel.x > 0.0 && right.vel.y > 0.0);
        assert!(right.vel.abs_diff_eq(beyond.vel, 1e-6));

        // Left side sends it left
        let mut left = ball_at(Vec3::new(-0.06, -0.38, 0.0), Vec3::new(0.0, -0.01, 0.0), 0.03);
        assert!(reflect_paddle(&mut left, &paddle, &config));
        assert!(left.vel.x < 0.0);
    }

    #[test]
    fn test_breakout_paddle_speed_is_capped() {
        let config = GameConfig::from_preset(Preset::BreakoutCube);
        let paddle = Paddle {
            pos: Vec3::new(0.0, -0.42, 0.0),
            half: Vec3::new(0.12, 0.02, 0.05),
        };
        let mut ball = ball_at(Vec3::new(0.0, -0.38, 0.0), Vec3::new(0.0, -0.05, 0.0), 0.03);
        assert!(reflect_paddle(&mut ball, &paddle, &config));
        assert!((ball.speed() - config.max_speed).abs() < 1e-6);
    }

    #[test]
    fn test_breakout_paddle_ignores_rising_ball() {
        let config = GameConfig::from_preset(Preset::BreakoutCube);
        let paddle = Paddle {
            pos: Vec3::new(0.0, -0.42, 0.0),
            half: Vec3::new(0.12, 0.02, 0.05),
        };

        // Still overlapping the frame after a return: no second bounce or speedup
        let vel = Vec3::new(0.004, 0.01, 0.0);
        let mut ball = ball_at(Vec3::new(0.05, -0.38, 0.0), vel, 0.03);
        assert!(ball.as_aabb().overlaps(&paddle.as_aabb()));
        assert!(!reflect_paddle(&mut ball, &paddle, &config));
        assert_eq!(ball.vel, vel);

        // Sideways only is not approaching either
        let mut flat = ball_at(Vec3::new(0.05, -0.38, 0.0), Vec3::new(0.01, 0.0, 0.0), 0.03);
        assert!(!reflect_paddle(&mut flat, &paddle, &config));
        assert_eq!(flat.vel, Vec3::new(0.01, 0.0, 0.0));
    }

    #[test]
    fn test_brick_axis_choice() {
        let brick = Brick {
            id: 1,
            row: 0,
            col: 0,
            pos: Vec3::ZERO,
            half: Vec3::new(0.07, 0.025, 0.025),
            alive: true,
        };
        // Coming from below, near the centre: vertical
        let below = ball_at(Vec3::new(0.01, -0.04, 0.0), Vec3::ZERO, 0.03);
        assert_eq!(brick_reflect_axis(&below, &brick), 1);
        // From the side: horizontal
        let side = ball_at(Vec3::new(-0.09, 0.005, 0.0), Vec3::ZERO, 0.03);
        assert_eq!(brick_reflect_axis(&side, &brick), 0);
        // Exact corner diagonal ties to vertical
        let corner = ball_at(Vec3::new(0.07, 0.025, 0.0), Vec3::ZERO, 0.03);
        assert_eq!(brick_reflect_axis(&corner, &brick), 1);
    }

    #[test]
    fn test_reflect_brick_flips_chosen_axis() {
        let brick = Brick {
            id: 1,
            row: 0,
            col: 0,
            pos: Vec3::ZERO,
            half: Vec3::new(0.07, 0.025, 0.025),
            alive: true,
        };
        let mut ball = ball_at(Vec3::new(0.0, -0.05, 0.0), Vec3::new(0.01, 0.02, 0.0), 0.03);
        assert_eq!(reflect_brick(&mut ball, &brick), 1);
        assert_eq!(ball.vel, Vec3::new(0.01, -0.02, 0.0));
    }

    proptest! {
        #[test]
        fn prop_wall_flip_touches_only_offending_axis(
            axis in 0usize..3,
            max_face in any::<bool>(),
            depth in 0.0001f32..0.05,
            speed in 0.001f32..0.1,
            other in -0.3f32..0.3,
            other_vel in -0.1f32..0.1,
        ) {
            let volume = BoundedVolume::new(Vec3::splat(0.5));
            let radius = 0.05;
            let limit = 0.5 - radius;
            let sign = if max_face { 1.0 } else { -1.0 };

            let mut pos = Vec3::splat(other);
            let mut vel = Vec3::splat(other_vel);
            crate::set_axis(&mut pos, axis, sign * (limit + depth));
            crate::set_axis(&mut vel, axis, sign * speed);
            let mut ball = ball_at(pos, vel, radius);

            let flipped = reflect_walls(&mut ball, &volume, PaddleMode::Pong3d);

            prop_assert!(flipped[axis]);
            prop_assert_eq!(crate::axis(ball.vel, axis), -sign * speed);
            for a in (0..3).filter(|a| *a != axis) {
                prop_assert!(!flipped[a]);
                prop_assert_eq!(crate::axis(ball.vel, a), other_vel);
            }
        }
    }
}
