//! Game options
//!
//! A structured record handed to the game at construction time. The host page
//! can embed it as JSON in `<script id="game-options" type="application/json">`;
//! anything missing takes its default.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::platform::KeyBindings;
use crate::session::{PlayerMode, PlayerSlot};
use crate::sim::{FieldDims, NoteRegistry, NoteType, SoundCue, build_registry};

/// Per-player options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerOptions {
    /// Canvas element this player's field is drawn on
    pub canvas_id: String,
    pub keys: KeyBindings,
    /// Known name; skips the name prompt
    pub name: Option<String>,
}

impl PlayerOptions {
    fn for_slot(slot: PlayerSlot) -> Self {
        match slot {
            PlayerSlot::One => Self {
                canvas_id: "canvas".to_string(),
                keys: KeyBindings::arrows(),
                name: None,
            },
            PlayerSlot::Two => Self {
                canvas_id: "canvas-p2".to_string(),
                keys: KeyBindings::wasd(),
                name: None,
            },
        }
    }
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self::for_slot(PlayerSlot::One)
    }
}

/// Everything configurable about a game page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameOptions {
    // === Geometry ===
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    /// Pixels per frame
    pub paddle_speed: f32,
    pub note_width: f32,
    pub note_height: f32,

    // === Assets ===
    pub background_asset: Option<String>,
    pub paddle_asset: Option<String>,
    /// Audio file per cue; cues without one are synthesized
    pub sound_assets: BTreeMap<SoundCue, String>,

    // === Gameplay ===
    /// Custom note catalog; the A-F grades when absent
    pub notes: Option<Vec<NoteType>>,
    pub mode: PlayerMode,
    /// Indexed by player number - 1
    pub players: Vec<PlayerOptions>,
    pub difficulty_interval_ms: f64,
    pub results_delay_ms: f64,
    pub results_url: String,
    /// Fixed RNG seed (testing); clock-seeded when absent
    pub seed: Option<u64>,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_speed: PADDLE_SPEED,
            note_width: NOTE_WIDTH,
            note_height: NOTE_HEIGHT,

            background_asset: None,
            paddle_asset: None,
            sound_assets: BTreeMap::new(),

            notes: None,
            mode: PlayerMode::Single,
            players: vec![
                PlayerOptions::for_slot(PlayerSlot::One),
                PlayerOptions::for_slot(PlayerSlot::Two),
            ],
            difficulty_interval_ms: DIFFICULTY_INTERVAL_MS,
            results_delay_ms: RESULTS_DELAY_MS,
            results_url: "results.html".to_string(),
            seed: None,

            master_volume: 0.8,
            muted: false,
        }
    }
}

impl GameOptions {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn canvas_size(&self) -> Vec2 {
        Vec2::new(self.canvas_width, self.canvas_height)
    }

    pub fn paddle_size(&self) -> Vec2 {
        Vec2::new(self.paddle_width, self.paddle_height)
    }

    pub fn field_dims(&self) -> FieldDims {
        FieldDims {
            canvas: self.canvas_size(),
            note_size: Vec2::new(self.note_width, self.note_height),
            paddle_speed: self.paddle_speed,
        }
    }

    /// Build the note registry these options describe
    pub fn registry(&self) -> NoteRegistry {
        match &self.notes {
            Some(types) => build_registry(types.clone()),
            None => NoteRegistry::grades(),
        }
    }

    /// Options for a player, falling back to that slot's defaults
    pub fn player(&self, slot: PlayerSlot) -> PlayerOptions {
        self.players
            .get(slot.number() as usize - 1)
            .cloned()
            .unwrap_or_else(|| PlayerOptions::for_slot(slot))
    }

    /// Effective volume (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0)
        }
    }

    /// Element id holding embedded options JSON
    #[allow(dead_code)]
    const OPTIONS_ELEMENT_ID: &'static str = "game-options";

    /// Load options embedded in the page (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::OPTIONS_ELEMENT_ID))
            .and_then(|el| el.text_content());

        if let Some(json) = json {
            match Self::from_json(&json) {
                Ok(options) => {
                    log::info!("Loaded game options from page");
                    return options;
                }
                Err(e) => log::warn!("Invalid game options, using defaults: {}", e),
            }
        }

        log::info!("Using default game options");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
