//! Respawning bonus target
//!
//! A single target floats somewhere in the volume. When the ball touches it,
//! it hides and comes back at a new random spot after a fixed wall-clock
//! delay. An invisible target never collides.

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::BoundedVolume;
use super::scheduler::{Scheduler, TaskKey};
use super::state::Ball;
use crate::config::TargetConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub pos: Vec3,
    pub hit_radius: f32,
    pub visible: bool,
    /// When the pending respawn fires, while hidden
    pub respawn_at_ms: Option<u64>,
    respawn_ms: u64,
    spawn_fraction: f32,
    depth: Option<f32>,
}

impl Target {
    /// A hidden target; call [`Target::spawn`] to place it
    pub fn new(config: &TargetConfig) -> Self {
        Self {
            pos: Vec3::ZERO,
            hit_radius: config.hit_radius,
            visible: false,
            respawn_at_ms: None,
            respawn_ms: config.respawn_ms,
            spawn_fraction: config.spawn_fraction,
            depth: config.depth,
        }
    }

    /// Place the target uniformly within `spawn_fraction` of the half-extents
    /// on x/y; z is the fixed depth when configured, random otherwise
    pub fn spawn<R: Rng + ?Sized>(&mut self, volume: &BoundedVolume, rng: &mut R) {
        let reach = volume.half_extents * self.spawn_fraction;
        let mut offset = |r: f32| if r > 0.0 { rng.random_range(-r..=r) } else { 0.0 };
        let x = offset(reach.x);
        let y = offset(reach.y);
        let z = match self.depth {
            Some(depth) => depth,
            None => offset(reach.z),
        };
        self.pos = Vec3::new(x, y, z);
        self.visible = true;
        self.respawn_at_ms = None;
    }

    /// Hide the target and arm its respawn, replacing any pending one
    pub fn hide(&mut self, now_ms: u64, scheduler: &mut Scheduler) {
        let fire_at = now_ms.saturating_add(self.respawn_ms);
        if let Some(previous) = scheduler.schedule(TaskKey::TargetRespawn, fire_at) {
            log::debug!("Target respawn re-armed: {} -> {}", previous, fire_at);
        }
        self.visible = false;
        self.respawn_at_ms = Some(fire_at);
    }

    /// Sphere-sphere contact with the ball; hidden targets never register
    pub fn is_hit_by(&self, ball: &Ball) -> bool {
        self.visible && ball.pos.distance(self.pos) < ball.radius + self.hit_radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn config() -> TargetConfig {
        TargetConfig::default()
    }

    #[test]
    fn test_spawn_stays_within_fraction() {
        let volume = BoundedVolume::new(Vec3::new(0.75, 0.5, 0.5));
        let mut rng = Pcg32::seed_from_u64(7);
        let mut target = Target::new(&config());
        for _ in 0..500 {
            target.spawn(&volume, &mut rng);
            assert!(target.visible);
            assert!(target.pos.x.abs() <= 0.75 * 0.8 + 1e-6);
            assert!(target.pos.y.abs() <= 0.5 * 0.8 + 1e-6);
            assert_eq!(target.pos.z, 0.0);
        }
    }

    #[test]
    fn test_spawn_without_depth_randomises_z() {
        let volume = BoundedVolume::new(Vec3::splat(0.5));
        let mut rng = Pcg32::seed_from_u64(11);
        let mut target = Target::new(&TargetConfig {
            depth: None,
            ..config()
        });
        let zs: Vec<f32> = (0..50)
            .map(|_| {
                target.spawn(&volume, &mut rng);
                target.pos.z
            })
            .collect();
        assert!(zs.iter().all(|z| z.abs() <= 0.4 + 1e-6));
        assert!(zs.iter().any(|z| *z != zs[0]));
    }

    #[test]
    fn test_hidden_target_never_hits() {
        let volume = BoundedVolume::new(Vec3::splat(0.5));
        let mut rng = Pcg32::seed_from_u64(3);
        let mut scheduler = Scheduler::new();
        let mut target = Target::new(&config());
        target.spawn(&volume, &mut rng);

        let mut ball = Ball::new(0.05);
        ball.pos = target.pos;
        assert!(target.is_hit_by(&ball));

        target.hide(1000, &mut scheduler);
        assert!(!target.is_hit_by(&ball));
        assert_eq!(target.respawn_at_ms, Some(4000));
        assert_eq!(scheduler.pending(TaskKey::TargetRespawn), Some(4000));
    }

    #[test]
    fn test_hit_radius_boundary() {
        let mut target = Target::new(&config());
        target.visible = true;
        let mut ball = Ball::new(0.05);
        ball.pos = Vec3::new(0.11, 0.0, 0.0);
        assert!(!target.is_hit_by(&ball));
        ball.pos = Vec3::new(0.09, 0.0, 0.0);
        assert!(target.is_hit_by(&ball));
    }

    #[test]
    fn test_rehide_keeps_one_pending_respawn() {
        let mut scheduler = Scheduler::new();
        let mut target = Target::new(&config());
        target.visible = true;
        target.hide(0, &mut scheduler);
        target.hide(500, &mut scheduler);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(target.respawn_at_ms, Some(3500));
        assert!(scheduler.poll(3000).is_empty());
        assert_eq!(scheduler.poll(3500), vec![TaskKey::TargetRespawn]);
    }
}
