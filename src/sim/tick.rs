//! Per-frame simulation step
//!
//! One call per displayed frame: roll for a spawn, advance the notes, then
//! move the paddle.

use glam::Vec2;
use rand::Rng;

use super::collision::advance;
use super::registry::NoteRegistry;
use super::spawn::{spawn_note, spawn_probability};
use super::state::{Lifecycle, RunState, Steer};
use crate::consts::*;

/// Playfield geometry shared by every frame of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDims {
    pub canvas: Vec2,
    pub note_size: Vec2,
    pub paddle_speed: f32,
}

impl Default for FieldDims {
    fn default() -> Self {
        Self {
            canvas: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            note_size: Vec2::new(NOTE_WIDTH, NOTE_HEIGHT),
            paddle_speed: PADDLE_SPEED,
        }
    }
}

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub steer: Option<Steer>,
}

/// Advance the run by one frame
///
/// Nothing happens before the run starts. After game over notes still spawn
/// and fall for the backdrop, but the paddle is frozen and nothing is caught.
pub fn tick(state: &mut RunState, registry: &NoteRegistry, dims: &FieldDims, input: &TickInput, now: f64) {
    if state.lifecycle == Lifecycle::NotStarted {
        return;
    }
    state.frames += 1;

    if state.rng.random::<f32>() < spawn_probability(state.difficulty) {
        let difficulty = state.difficulty;
        if let Some(note) = spawn_note(registry, &mut state.rng, dims.canvas.x, dims.note_size, difficulty) {
            state.push_note(note);
        }
    }

    advance(state, registry, dims.canvas.y, now);

    if let (true, Some(steer)) = (state.is_playing(), input.steer) {
        state.paddle.step(steer, dims.paddle_speed, dims.canvas.x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Paddle;

    fn run(seed: u64) -> RunState {
        let dims = FieldDims::default();
        RunState::new(seed, Paddle::new(dims.canvas, Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT)))
    }

    #[test]
    fn test_tick_before_start_does_nothing() {
        let registry = NoteRegistry::grades();
        let mut state = run(1);
        let input = TickInput {
            steer: Some(Steer::Left),
        };
        for _ in 0..500 {
            tick(&mut state, &registry, &FieldDims::default(), &input, 0.0);
        }
        assert!(state.notes.is_empty());
        assert_eq!(state.frames, 0);
        assert_eq!(state.paddle.rect.pos.x, 192.0);
    }

    #[test]
    fn test_tick_spawns_over_time() {
        let registry = NoteRegistry::grades();
        let mut state = run(99);
        state.start();
        let mut spawned = false;
        for frame in 0..400 {
            tick(&mut state, &registry, &FieldDims::default(), &TickInput::default(), frame as f64 * 16.0);
            spawned |= !state.notes.is_empty();
        }
        assert!(spawned);
        assert_eq!(state.frames, 400);
    }

    #[test]
    fn test_tick_moves_paddle_only_while_playing() {
        let registry = NoteRegistry::grades();
        let dims = FieldDims::default();
        let mut state = run(5);
        state.start();
        let left = TickInput {
            steer: Some(Steer::Left),
        };
        tick(&mut state, &registry, &dims, &left, 0.0);
        assert_eq!(state.paddle.rect.pos.x, 192.0 - PADDLE_SPEED);

        state.concede(16.0);
        tick(&mut state, &registry, &dims, &left, 32.0);
        assert_eq!(state.paddle.rect.pos.x, 192.0 - PADDLE_SPEED);
    }

    #[test]
    fn test_determinism() {
        let registry = NoteRegistry::grades();
        let dims = FieldDims::default();
        let mut state1 = run(4242);
        let mut state2 = run(4242);
        state1.start();
        state2.start();

        let inputs = [
            TickInput {
                steer: Some(Steer::Left),
            },
            TickInput::default(),
            TickInput {
                steer: Some(Steer::Right),
            },
        ];
        for frame in 0..600 {
            let input = &inputs[frame % inputs.len()];
            let now = frame as f64 * 16.0;
            tick(&mut state1, &registry, &dims, input, now);
            tick(&mut state2, &registry, &dims, input, now);
        }

        assert_eq!(state1.score, state2.score);
        assert_eq!(state1.notes, state2.notes);
        assert_eq!(state1.lives, state2.lives);
    }
}
