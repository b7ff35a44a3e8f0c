//! Note movement, pruning and paddle collisions
//!
//! Collision is a plain AABB test; the interesting part is the resolution
//! order. Notes are walked back to front so removing one never skips or
//! revisits another.

use super::registry::{CatchEffect, NoteRegistry};
use super::state::{GameEvent, RunState};

/// Apply a catch effect to the run
///
/// The single interpreter for every note kind. Always finishes with a game-over
/// check.
pub fn apply_catch(state: &mut RunState, effect: &CatchEffect, now: f64) {
    state.add_score(effect.score_delta);
    state.add_lives(effect.life_delta);
    if effect.notifies_damage {
        state.notify_damage(now);
    }
    if let Some(cue) = effect.cue {
        state.emit(GameEvent::Sound(cue));
    }
    state.check_game_over(now);
}

/// Advance every live note by one frame
///
/// - Notes below `canvas_height` are pruned in every lifecycle.
/// - Once the run is over notes keep falling but can no longer be caught.
/// - A caught note is removed and its effect applied exactly once.
pub fn advance(state: &mut RunState, registry: &NoteRegistry, canvas_height: f32, now: f64) {
    let paddle = state.paddle.rect;

    let mut i = state.notes.len();
    while i > 0 {
        i -= 1;

        state.notes[i].fall();
        if state.notes[i].is_below(canvas_height) {
            state.notes.remove(i);
            continue;
        }

        if state.is_game_over() || !state.notes[i].rect().overlaps(&paddle) {
            continue;
        }

        let note = state.notes.remove(i);
        match registry.get(note.type_index) {
            Some(note_type) => {
                state.emit(GameEvent::Caught {
                    type_index: note.type_index,
                    note_id: note.id,
                });
                apply_catch(state, &note_type.catch_effect, now);
            }
            None => log::warn!(
                "Caught note {} references unknown type {}",
                note.id,
                note.type_index
            ),
        }
    }
}
