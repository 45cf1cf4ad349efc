//! Axis-aligned box geometry for the play volume, paddle and bricks
//!
//! Everything lives in the game group's local frame. A box is a center plus
//! half-extents; the ball is treated as a box of half-size `radius` for all
//! overlap tests except the target (sphere-sphere).

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// An axis-aligned box, stored as center and half-extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub center: Vec3,
    pub half: Vec3,
}

impl Aabb {
    pub fn new(center: Vec3, half: Vec3) -> Self {
        Self { center, half }
    }

    /// Box enclosing a sphere
    #[inline]
    pub fn around_sphere(center: Vec3, radius: f32) -> Self {
        Self::new(center, Vec3::splat(radius))
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half
    }

    /// Strict overlap on all three axes (touching faces do not count)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        let delta = (self.center - other.center).abs();
        let reach = self.half + other.half;
        delta.cmplt(reach).all()
    }

    #[cfg(test)]
    pub fn contains_point(&self, point: Vec3) -> bool {
        (point - self.center).abs().cmple(self.half).all()
    }
}

/// A face of the play volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Face {
    Min,
    Max,
}

/// The bounded play volume, centred on the game group origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundedVolume {
    pub half_extents: Vec3,
}

impl BoundedVolume {
    pub fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }

    #[cfg(test)]
    pub fn as_aabb(&self) -> Aabb {
        Aabb::new(Vec3::ZERO, self.half_extents)
    }

    /// Which face (if any) a sphere pokes through on the given axis
    pub fn face_crossed(&self, center: Vec3, radius: f32, axis: usize) -> Option<Face> {
        let p = crate::axis(center, axis);
        let bound = crate::axis(self.half_extents, axis);
        if p + radius > bound {
            Some(Face::Max)
        } else if p - radius < -bound {
            Some(Face::Min)
        } else {
            None
        }
    }

    /// Largest offset along an axis for something of half-size `half` plus `margin`
    pub fn limit(&self, axis: usize, half: f32, margin: f32) -> f32 {
        (crate::axis(self.half_extents, axis) - half - margin).max(0.0)
    }
}
