//! Run state and the lifecycle state machine
//!
//! One `RunState` exists per player run. A restart builds a new one; nothing
//! here ever goes back from `GameOver`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::note::{Note, Rect};
use super::registry::SoundCue;
use crate::consts::*;

/// Run progression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Waiting for the start command; only the attract overlay is drawn
    NotStarted,
    /// Active gameplay
    Playing,
    /// Run ended
    GameOver,
}

/// Things the simulation wants the outside world to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Fire-and-forget sound cue
    Sound(SoundCue),
    /// The run entered `Playing`
    Started,
    /// A note was caught
    Caught { type_index: usize, note_id: u32 },
    /// The run entered `GameOver` (raised once)
    GameOver,
}

/// Horizontal steering for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Steer {
    Left,
    Right,
}

/// The player's paddle
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub rect: Rect,
}

impl Paddle {
    /// Centered horizontally, resting just above the bottom edge
    pub fn new(canvas: Vec2, size: Vec2) -> Self {
        let x = ((canvas.x - size.x) / 2.0).max(0.0);
        let y = canvas.y - size.y - PADDLE_MARGIN;
        Self {
            rect: Rect {
                pos: Vec2::new(x, y),
                size,
            },
        }
    }

    /// Move one fixed step, keeping the paddle fully on the canvas
    pub fn step(&mut self, steer: Steer, speed: f32, canvas_width: f32) {
        let dx = match steer {
            Steer::Left => -speed,
            Steer::Right => speed,
        };
        let max_x = (canvas_width - self.rect.size.x).max(0.0);
        self.rect.pos.x = (self.rect.pos.x + dx).clamp(0.0, max_x);
    }
}

/// Complete state of one player's run
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub score: i64,
    /// Fractional lives; exactly 0 once the run is over by damage
    pub lives: f32,
    pub difficulty: u32,
    pub lifecycle: Lifecycle,
    /// Live notes in spawn order
    pub notes: Vec<Note>,
    pub paddle: Paddle,
    /// Damage flash start (ms), presentational
    pub damage_feedback_started_at: Option<f64>,
    /// Death animation start (ms), presentational
    pub death_anim_started_at: Option<f64>,
    /// Ended by a concede command rather than by losing all lives
    pub conceded: bool,
    /// Simulated frames since start
    pub frames: u64,
    events: Vec<GameEvent>,
    game_over_entered: bool,
    results_transition_taken: bool,
    next_id: u32,
}

impl RunState {
    pub fn new(seed: u64, paddle: Paddle) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            lives: STARTING_LIVES,
            difficulty: STARTING_DIFFICULTY,
            lifecycle: Lifecycle::NotStarted,
            notes: Vec::new(),
            paddle,
            damage_feedback_started_at: None,
            death_anim_started_at: None,
            conceded: false,
            frames: 0,
            events: Vec::new(),
            game_over_entered: false,
            results_transition_taken: false,
            next_id: 1,
        }
    }

    /// NotStarted -> Playing. Returns false if the run was already started.
    pub fn start(&mut self) -> bool {
        if self.lifecycle != Lifecycle::NotStarted {
            return false;
        }
        self.lifecycle = Lifecycle::Playing;
        self.events.push(GameEvent::Started);
        self.events.push(GameEvent::Sound(SoundCue::Start));
        true
    }

    pub fn is_playing(&self) -> bool {
        self.lifecycle == Lifecycle::Playing
    }

    pub fn is_game_over(&self) -> bool {
        self.lifecycle == Lifecycle::GameOver
    }

    /// One difficulty step; ignored outside `Playing`
    pub fn raise_difficulty(&mut self) {
        if self.is_playing() {
            self.difficulty = self.difficulty.saturating_add(1);
            log::debug!("Difficulty raised to {}", self.difficulty);
        }
    }

    pub fn add_score(&mut self, delta: i64) {
        self.score = self.score.saturating_add(delta);
    }

    /// Unconditional; caps are a display concern
    pub fn add_lives(&mut self, delta: f32) {
        if !delta.is_finite() {
            log::warn!("Ignoring non-finite life delta {}", delta);
            return;
        }
        self.lives += delta;
    }

    /// Start the damage flash, regardless of how much damage was done
    pub fn notify_damage(&mut self, now: f64) {
        self.damage_feedback_started_at = Some(now);
    }

    /// Lives as shown in the HUD
    pub fn display_lives(&self) -> f32 {
        self.lives.max(0.0)
    }

    /// Enter game over if lives ran out
    ///
    /// Clamps lives to exactly 0 first. Repeated calls after the run ended do
    /// nothing.
    pub fn check_game_over(&mut self, now: f64) {
        if self.lives > 0.0 {
            return;
        }
        self.lives = 0.0;
        self.enter_game_over(now);
    }

    /// Forced end of run, independent of lives. Only a playing run can be
    /// conceded.
    pub fn concede(&mut self, now: f64) {
        if !self.is_playing() {
            return;
        }
        self.conceded = true;
        self.enter_game_over(now);
    }

    fn enter_game_over(&mut self, now: f64) {
        if self.game_over_entered {
            return;
        }
        self.game_over_entered = true;
        self.lifecycle = Lifecycle::GameOver;
        if self.death_anim_started_at.is_none() {
            self.death_anim_started_at = Some(now);
        }
        self.events.push(GameEvent::GameOver);
        self.events.push(GameEvent::Sound(SoundCue::GameOver));
        log::info!(
            "Run over: score {}, difficulty {}, {} frames{}",
            self.score,
            self.difficulty,
            self.frames,
            if self.conceded { " (conceded)" } else { "" }
        );
    }

    /// True exactly once, on the first call after the run ended
    pub fn take_results_transition(&mut self) -> bool {
        if !self.is_game_over() || self.results_transition_taken {
            return false;
        }
        self.results_transition_taken = true;
        true
    }

    /// Take ownership of a freshly spawned note, assigning its id
    pub fn push_note(&mut self, mut note: Note) {
        note.id = self.next_id;
        self.next_id += 1;
        self.notes.push(note);
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Pending events, oldest first
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run() -> RunState {
        let paddle = Paddle::new(
            Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            Vec2::new(PADDLE_WIDTH, PADDLE_HEIGHT),
        );
        RunState::new(12345, paddle)
    }

    fn count(state: &RunState, event: GameEvent) -> usize {
        state.events().iter().filter(|e| **e == event).count()
    }

    #[test]
    fn test_new_run_defaults() {
        let state = run();
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, 3.0);
        assert_eq!(state.difficulty, 1);
        assert_eq!(state.lifecycle, Lifecycle::NotStarted);
        assert!(state.notes.is_empty());
    }

    #[test]
    fn test_start_once() {
        let mut state = run();
        assert!(state.start());
        assert!(!state.start());
        assert_eq!(state.lifecycle, Lifecycle::Playing);
        assert_eq!(count(&state, GameEvent::Started), 1);
    }

    #[test]
    fn test_difficulty_only_while_playing() {
        let mut state = run();
        state.raise_difficulty();
        assert_eq!(state.difficulty, 1);
        state.start();
        state.raise_difficulty();
        assert_eq!(state.difficulty, 2);
        state.concede(0.0);
        state.raise_difficulty();
        assert_eq!(state.difficulty, 2);
    }

    #[test]
    fn test_check_game_over_noop_with_lives() {
        let mut state = run();
        state.start();
        state.add_lives(-2.5);
        state.check_game_over(10.0);
        assert!(state.is_playing());
        assert_eq!(state.death_anim_started_at, None);
    }

    #[test]
    fn test_check_game_over_clamps_and_is_idempotent() {
        let mut state = run();
        state.start();
        state.add_lives(-3.5);
        state.check_game_over(100.0);
        assert_eq!(state.lives, 0.0);
        assert!(state.is_game_over());
        assert_eq!(state.death_anim_started_at, Some(100.0));

        state.add_lives(-1.0);
        state.check_game_over(200.0);
        state.check_game_over(300.0);
        assert_eq!(state.death_anim_started_at, Some(100.0));
        assert_eq!(count(&state, GameEvent::GameOver), 1);
        assert_eq!(count(&state, GameEvent::Sound(SoundCue::GameOver)), 1);
    }

    #[test]
    fn test_exactly_zero_lives_ends_run() {
        let mut state = run();
        state.start();
        state.add_lives(-3.0);
        state.check_game_over(0.0);
        assert!(state.is_game_over());
    }

    #[test]
    fn test_non_finite_life_delta_ignored() {
        let mut state = run();
        state.add_lives(f32::NAN);
        state.add_lives(f32::NEG_INFINITY);
        assert_eq!(state.lives, 3.0);
    }

    #[test]
    fn test_concede_keeps_lives() {
        let mut state = run();
        state.start();
        state.concede(50.0);
        assert!(state.is_game_over());
        assert!(state.conceded);
        assert_eq!(state.lives, 3.0);
        assert_eq!(state.death_anim_started_at, Some(50.0));
    }

    #[test]
    fn test_concede_before_start_is_ignored() {
        let mut state = run();
        state.concede(10.0);
        assert_eq!(state.lifecycle, Lifecycle::NotStarted);
        assert!(!state.conceded);
        assert_eq!(state.death_anim_started_at, None);
        assert!(state.events().is_empty());

        // The run can still start and be conceded normally
        assert!(state.start());
        state.concede(20.0);
        assert!(state.is_game_over());
        state.concede(30.0);
        assert_eq!(count(&state, GameEvent::GameOver), 1);
    }

    #[test]
    fn test_difficulty_saturates() {
        let mut state = run();
        state.start();
        state.difficulty = u32::MAX;
        state.raise_difficulty();
        assert_eq!(state.difficulty, u32::MAX);
    }

    #[test]
    fn test_results_transition_once() {
        let mut state = run();
        state.start();
        assert!(!state.take_results_transition());
        state.concede(0.0);
        assert!(state.take_results_transition());
        for _ in 0..60 {
            assert!(!state.take_results_transition());
        }
    }

    #[test]
    fn test_push_note_assigns_ids() {
        let mut state = run();
        for _ in 0..3 {
            state.push_note(Note {
                id: 0,
                type_index: 0,
                pos: Vec2::ZERO,
                size: Vec2::splat(40.0),
                fall_speed: 2.0,
            });
        }
        let ids: Vec<u32> = state.notes.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_paddle_clamps_to_canvas() {
        let mut paddle = Paddle::new(Vec2::new(480.0, 640.0), Vec2::new(96.0, 18.0));
        assert_eq!(paddle.rect.pos, Vec2::new(192.0, 612.0));
        for _ in 0..100 {
            paddle.step(Steer::Left, 7.0, 480.0);
        }
        assert_eq!(paddle.rect.pos.x, 0.0);
        for _ in 0..100 {
            paddle.step(Steer::Right, 7.0, 480.0);
        }
        assert_eq!(paddle.rect.pos.x, 384.0);
    }
}
