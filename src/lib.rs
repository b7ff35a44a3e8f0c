//! Grade Catch - A falling-grades arcade game
//!
//! Core modules:
//! - `sim`: Simulation (note registry, spawning, collisions, run state)
//! - `engine`: Per-frame driver tying simulation, drawing and collaborators together
//! - `platform`: Input mapping and the difficulty ticker
//! - `persistence`: Session-scoped storage (scores, names, highscores, handshake)
//! - `renderer`: Draw contract and the Canvas 2D painter
//! - `settings`: Options record read at construction time
//! - `session`: Who is playing and where the results page is sent
//! - `highscores`: Ranked top-10 list
//! - `audio`: Sound cues through Web Audio (WASM only)

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod engine;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use engine::{Engine, Host};
pub use highscores::HighScores;
pub use session::{PlayerMode, PlayerSlot, ResultsRoute, SessionContext};
pub use settings::GameOptions;

/// Game configuration constants
pub mod consts {
    /// Default canvas dimensions (CSS pixels)
    pub const CANVAS_WIDTH: f32 = 480.0;
    pub const CANVAS_HEIGHT: f32 = 640.0;

    /// Paddle defaults
    pub const PADDLE_WIDTH: f32 = 96.0;
    pub const PADDLE_HEIGHT: f32 = 18.0;
    /// Gap between paddle bottom edge and canvas bottom
    pub const PADDLE_MARGIN: f32 = 10.0;
    /// Horizontal step per frame while a direction is held
    pub const PADDLE_SPEED: f32 = 7.0;

    /// Note render/collision box
    pub const NOTE_WIDTH: f32 = 40.0;
    pub const NOTE_HEIGHT: f32 = 40.0;

    /// Run defaults
    pub const STARTING_LIVES: f32 = 3.0;
    pub const STARTING_DIFFICULTY: u32 = 1;

    /// Difficulty ramp period (ms)
    pub const DIFFICULTY_INTERVAL_MS: f64 = 5000.0;
    /// Game-over overlay time before leaving for the results page (ms)
    pub const RESULTS_DELAY_MS: f64 = 2000.0;

    /// Base spawn chance per frame, plus `difficulty / SPAWN_CHANCE_DIVISOR`
    pub const SPAWN_BASE_CHANCE: f32 = 0.03;
    pub const SPAWN_CHANCE_DIVISOR: f32 = 300.0;

    /// Fall speed is `BASE + D / DIVISOR + random() * D` pixels per frame
    pub const FALL_SPEED_BASE: f32 = 2.0;
    pub const FALL_SPEED_DIVISOR: f32 = 10.0;

    /// Feedback animation lengths (ms)
    pub const DAMAGE_FLASH_MS: f64 = 350.0;
    pub const DEATH_ANIM_MS: f64 = 1200.0;
}
