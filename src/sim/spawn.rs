//! Weighted note selection and spawning

use glam::Vec2;
use rand::Rng;

use super::note::Note;
use super::registry::NoteRegistry;
use crate::consts::*;

/// Pick a registry index with probability `weight / total_weight`
///
/// Falls back to the last entry when nothing matches (float drift, or a
/// zero/negative/non-finite total). Returns `None` only for an empty registry.
pub fn pick_note_type<R: Rng>(registry: &NoteRegistry, rng: &mut R) -> Option<usize> {
    let last = registry.len().checked_sub(1)?;
    let total = registry.total_weight();
    if !(total.is_finite() && total > 0.0) {
        return Some(last);
    }

    let r = rng.random::<f32>() * total;
    let mut cumulative = 0.0;
    for (i, note_type) in registry.types().iter().enumerate() {
        cumulative += note_type.spawn_weight.max(0.0);
        if cumulative > r {
            return Some(i);
        }
    }
    Some(last)
}

/// Chance to spawn one note this frame. Uncapped: past difficulty 291 it
/// reaches 1 and a note spawns every frame.
#[inline]
pub fn spawn_probability(difficulty: u32) -> f32 {
    SPAWN_BASE_CHANCE + difficulty as f32 / SPAWN_CHANCE_DIVISOR
}

/// Inclusive bounds of the fall speed a note spawned at `difficulty` can get
pub fn fall_speed_range(difficulty: u32) -> (f32, f32) {
    let d = difficulty as f32;
    let min = FALL_SPEED_BASE + d / FALL_SPEED_DIVISOR;
    (min, min + d)
}

/// Create a note just above the visible area
///
/// The returned note has id 0; the run assigns ids when it takes ownership.
pub fn spawn_note<R: Rng>(
    registry: &NoteRegistry,
    rng: &mut R,
    canvas_width: f32,
    note_size: Vec2,
    difficulty: u32,
) -> Option<Note> {
    let type_index = pick_note_type(registry, rng)?;

    let max_x = (canvas_width - note_size.x).max(0.0);
    let x = rng.random::<f32>() * max_x;
    let (min_speed, _) = fall_speed_range(difficulty);
    let fall_speed = min_speed + rng.random::<f32>() * difficulty as f32;

    Some(Note {
        id: 0,
        type_index,
        pos: Vec2::new(x, -note_size.y),
        size: note_size,
        fall_speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::registry::{NoteType, build_registry};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pick_frequencies_follow_weights() {
        let registry = build_registry(vec![
            NoteType::new("A", 1.0, 100, 0.25),
            NoteType::new("B", 2.0, 50, 0.0),
            NoteType::new("C", 0.0, 25, 0.0),
            NoteType::new("F", 5.0, 0, -1.0),
        ]);
        let mut rng = Pcg32::seed_from_u64(7);
        let n = 200_000;
        let mut counts = [0usize; 4];
        for _ in 0..n {
            counts[pick_note_type(&registry, &mut rng).unwrap()] += 1;
        }

        let expected = [1.0 / 8.0, 2.0 / 8.0, 0.0, 5.0 / 8.0];
        for (count, want) in counts.iter().zip(expected) {
            let freq = *count as f64 / n as f64;
            assert!((freq - want).abs() < 0.01, "freq {} vs {}", freq, want);
        }
        assert_eq!(counts[2], 0, "zero weight must never be picked");
    }

    #[test]
    fn test_pick_degenerate_registries() {
        let mut rng = Pcg32::seed_from_u64(1);

        let empty = build_registry(Vec::new());
        assert_eq!(pick_note_type(&empty, &mut rng), None);
        assert!(spawn_note(&empty, &mut rng, 480.0, Vec2::splat(40.0), 1).is_none());

        let zero = build_registry(vec![
            NoteType::new("A", 0.0, 100, 0.0),
            NoteType::new("B", 0.0, 50, 0.0),
        ]);
        for _ in 0..10 {
            assert_eq!(pick_note_type(&zero, &mut rng), Some(1));
        }
    }

    #[test]
    fn test_spawn_probability_is_uncapped() {
        assert!((spawn_probability(1) - (0.03 + 1.0 / 300.0)).abs() < 1e-6);
        assert!(spawn_probability(600) > 1.0);
    }

    #[test]
    fn test_spawn_position() {
        let registry = NoteRegistry::grades();
        let mut rng = Pcg32::seed_from_u64(42);
        for _ in 0..500 {
            let note = spawn_note(&registry, &mut rng, 480.0, Vec2::new(40.0, 30.0), 3).unwrap();
            assert!(note.pos.x >= 0.0 && note.pos.x <= 440.0);
            assert_eq!(note.pos.y, -30.0);
            assert_eq!(note.size, Vec2::new(40.0, 30.0));
        }

        // Canvas narrower than a note pins it to the left edge
        let note = spawn_note(&registry, &mut rng, 20.0, Vec2::splat(40.0), 1).unwrap();
        assert_eq!(note.pos.x, 0.0);
    }

    proptest! {
        #[test]
        fn prop_fall_speed_within_bounds(difficulty in 1u32..2000, seed in any::<u64>()) {
            let registry = NoteRegistry::grades();
            let mut rng = Pcg32::seed_from_u64(seed);
            let note = spawn_note(&registry, &mut rng, 480.0, Vec2::splat(40.0), difficulty).unwrap();
            let (min, max) = fall_speed_range(difficulty);
            prop_assert!(note.fall_speed >= min - 1e-3);
            prop_assert!(note.fall_speed <= max + 1e-3);
        }
    }
}
