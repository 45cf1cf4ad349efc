//! Destructible brick field
//!
//! The field exclusively owns brick lifetime: bricks are laid out in
//! `rows x cols` batches, leave the collidable set when hit, and the whole
//! field is rebuilt once nothing is left.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::{Aabb, BoundedVolume};
use crate::config::BrickLayout;
use crate::consts::BRICK_COLOR_COUNT;

/// A single breakable brick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Brick {
    pub id: u32,
    pub row: u32,
    pub col: u32,
    pub pos: Vec3,
    pub half: Vec3,
    pub alive: bool,
}

impl Brick {
    pub fn as_aabb(&self) -> Aabb {
        Aabb::new(self.pos, self.half)
    }

    /// Palette slot for rendering, cycles every few rows
    pub fn color_index(&self) -> u32 {
        self.row % BRICK_COLOR_COUNT
    }
}

#[derive(Debug, Clone, Default)]
pub struct BrickField {
    layout: Option<BrickLayout>,
    /// Alive bricks in insertion order
    bricks: Vec<Brick>,
    next_id: u32,
}

impl BrickField {
    /// A field with no layout (pong variants)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Lay out a fresh field, centred horizontally and hanging from the top face
    pub fn create_field(layout: &BrickLayout, volume: &BoundedVolume) -> Self {
        let mut field = Self::with_layout(layout);
        field.lay_out(volume);
        field
    }

    /// Holds the layout but no bricks until the first `regenerate`
    pub fn with_layout(layout: &BrickLayout) -> Self {
        Self {
            layout: Some(layout.clone()),
            bricks: Vec::new(),
            next_id: 1,
        }
    }

    /// Whether this session has bricks at all
    pub fn is_enabled(&self) -> bool {
        self.layout.is_some()
    }

    /// Rebuild the full layout. Ids keep counting up so events stay unique.
    pub fn regenerate(&mut self, volume: &BoundedVolume) {
        self.lay_out(volume);
    }

    fn lay_out(&mut self, volume: &BoundedVolume) {
        self.bricks.clear();
        let Some(layout) = &self.layout else {
            return;
        };

        let size = layout.brick_size;
        let half = size / 2.0;
        let (total_width, _) = layout.extent();
        let left = -total_width / 2.0 + half.x;
        let top = volume.half_extents.y - layout.top_margin - half.y;

        self.bricks.reserve(layout.rows as usize * layout.cols as usize);
        for row in 0..layout.rows {
            for col in 0..layout.cols {
                let id = self.next_id;
                self.next_id += 1;
                self.bricks.push(Brick {
                    id,
                    row,
                    col,
                    pos: Vec3::new(
                        left + col as f32 * (size.x + layout.gap),
                        top - row as f32 * (size.y + layout.gap),
                        0.0,
                    ),
                    half,
                    alive: true,
                });
            }
        }
    }

    /// Mark a brick dead and take it out of the collidable set
    pub fn remove_brick(&mut self, id: u32) -> Option<Brick> {
        let index = self.bricks.iter().position(|b| b.id == id)?;
        let mut brick = self.bricks.remove(index);
        brick.alive = false;
        Some(brick)
    }

    /// True iff no alive bricks remain
    pub fn is_cleared(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Alive bricks in insertion order
    pub fn alive(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// First alive brick (insertion order) overlapping the given box
    pub fn first_overlap(&self, bounds: &Aabb) -> Option<&Brick> {
        self.bricks.iter().find(|b| b.as_aabb().overlaps(bounds))
    }
}
