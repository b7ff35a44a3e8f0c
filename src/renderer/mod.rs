//! Rendering module
//!
//! The engine draws through the [`Painter`] trait in a fixed order each
//! frame. The browser implementation is a Canvas 2D painter; tests and the
//! native soak use recording or no-op painters.

#[cfg(target_arch = "wasm32")]
pub mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasPainter;

use crate::consts::{DAMAGE_FLASH_MS, DEATH_ANIM_MS};
use crate::sim::{Note, NoteType, Rect};

/// Transient visual effects derived from the run's animation timers
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Feedback {
    /// Damage flash strength, 1 at the hit fading to 0
    pub damage_flash: f32,
    /// Death animation progress 0..=1, `None` while alive
    pub death_progress: Option<f32>,
}

impl Feedback {
    pub fn at(now: f64, damage_started: Option<f64>, death_started: Option<f64>) -> Self {
        Self {
            damage_flash: damage_started
                .map(|t| fade_out(now - t, DAMAGE_FLASH_MS))
                .unwrap_or(0.0),
            death_progress: death_started.map(|t| ((now - t) / DEATH_ANIM_MS).clamp(0.0, 1.0) as f32),
        }
    }
}

fn fade_out(elapsed: f64, duration: f64) -> f32 {
    if elapsed < 0.0 || elapsed >= duration {
        0.0
    } else {
        (1.0 - elapsed / duration) as f32
    }
}

/// Lives split into whole and half icons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LifeIcons {
    pub whole: u32,
    pub half: bool,
}

impl LifeIcons {
    /// Quarters below one half are not drawn
    pub fn from_lives(lives: f32) -> Self {
        let lives = if lives.is_finite() { lives.max(0.0) } else { 0.0 };
        Self {
            whole: lives.floor() as u32,
            half: lives.fract() >= 0.5,
        }
    }
}

/// Everything the HUD shows
#[derive(Debug, Clone, PartialEq)]
pub struct HudView {
    pub player_name: String,
    pub score: i64,
    /// Clamped to >= 0
    pub lives: f32,
    pub icons: LifeIcons,
    pub difficulty: u32,
    pub feedback: Feedback,
}

/// Drawing surface for one player's field
pub trait Painter {
    fn clear(&mut self);
    fn background(&mut self);
    /// Attract screen shown before the run starts
    fn start_overlay(&mut self, player_name: &str);
    fn paddle(&mut self, rect: &Rect, feedback: &Feedback);
    fn note(&mut self, note: &Note, note_type: &NoteType);
    fn hud(&mut self, hud: &HudView);
    fn game_over_overlay(&mut self, hud: &HudView);
}

/// Draws nothing (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPainter;

impl Painter for NullPainter {
    fn clear(&mut self) {}
    fn background(&mut self) {}
    fn start_overlay(&mut self, _player_name: &str) {}
    fn paddle(&mut self, _rect: &Rect, _feedback: &Feedback) {}
    fn note(&mut self, _note: &Note, _note_type: &NoteType) {}
    fn hud(&mut self, _hud: &HudView) {}
    fn game_over_overlay(&mut self, _hud: &HudView) {}
}

/// `[r, g, b, a]` in 0..=1 to a CSS color string
pub fn css_color(color: [f32; 4]) -> String {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!(
        "rgba({},{},{},{})",
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        color[3].clamp(0.0, 1.0)
    )
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.06, 0.07, 0.12, 1.0];
    pub const PADDLE: [f32; 4] = [0.85, 0.85, 0.95, 1.0];
    pub const DAMAGE: [f32; 4] = [0.95, 0.15, 0.15, 1.0];
    pub const LIFE: [f32; 4] = [0.95, 0.3, 0.45, 1.0];
    pub const OVERLAY: [f32; 4] = [0.0, 0.0, 0.0, 0.55];
    pub const TEXT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
}
