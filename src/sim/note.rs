//! Falling note entity and axis-aligned boxes

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Strict overlap; touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }

    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }
}

/// A single falling note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: u32,
    /// Index into the registry this note was spawned from
    pub type_index: usize,
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame, frozen at spawn
    pub fall_speed: f32,
}

impl Note {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Move down by this note's own speed
    #[inline]
    pub fn fall(&mut self) {
        self.pos.y += self.fall_speed;
    }

    /// True once the note has left through the bottom edge
    pub fn is_below(&self, canvas_height: f32) -> bool {
        self.pos.y > canvas_height
    }
}
