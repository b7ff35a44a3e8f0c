//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - One update per displayed frame
//! - Seeded RNG only (per run)
//! - Notes iterate in spawn order
//! - Note kinds never branch in engine code; effects are data

pub mod collision;
pub mod note;
pub mod registry;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{advance, apply_catch};
pub use note::{Note, Rect};
pub use registry::{CatchEffect, NoteRegistry, NoteType, SoundCue, build_registry};
pub use spawn::{fall_speed_range, pick_note_type, spawn_note, spawn_probability};
pub use state::{GameEvent, Lifecycle, Paddle, RunState, Steer};
pub use tick::{FieldDims, TickInput, tick};
