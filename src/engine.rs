//! Per-frame driver for one player's field
//!
//! The host loop calls [`Engine::frame`] once per display refresh. Each frame
//! draws the background, branches on the lifecycle, steps the simulation,
//! draws the result and, once the run is over, runs the results transition
//! exactly once. Rescheduling is the host loop's job; a frame never blocks.

use std::rc::Rc;

use glam::Vec2;

use crate::persistence::{HandshakeOutcome, SessionData};
use crate::platform::{InputState, IntervalTicker, KeyBindings};
use crate::renderer::{Feedback, HudView, LifeIcons, Painter};
use crate::session::{PlayerMode, PlayerSlot, ResultsRoute, SessionContext};
use crate::settings::GameOptions;
use crate::sim::{FieldDims, GameEvent, Lifecycle, NoteRegistry, Paddle, RunState, SoundCue, TickInput, tick};

/// Collaborators outside the simulation
pub trait Host {
    /// Fire-and-forget; implementations swallow every failure
    fn play_cue(&mut self, cue: SoundCue);
    /// Leave for the results page
    fn navigate_to_results(&mut self, route: &ResultsRoute);
    /// Ask the player for a name; `None` when dismissed or unavailable
    fn prompt_for_name(&mut self, slot: PlayerSlot) -> Option<String>;
    fn session_data(&mut self) -> &mut SessionData;
    /// Wall-clock time (ms since epoch) for highscore entries
    fn timestamp(&self) -> f64 {
        0.0
    }
}

/// Fill in every playing slot's name
///
/// Configured name first, then the stored one, then a prompt (stored for
/// next time), then "Player N".
pub fn resolve_player_names(session: &mut SessionContext, options: &GameOptions, host: &mut dyn Host) {
    for &slot in session.mode.slots() {
        let name = match options.player(slot).name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => {
                let prompted = match host.session_data().player_name(slot) {
                    Some(_) => None,
                    None => host.prompt_for_name(slot),
                };
                host.session_data().resolve_player_name(slot, || prompted)
            }
        };
        session.set_name(slot, name);
    }
}

/// Navigation armed at game over, fired once the overlay has had its time
#[derive(Debug, Clone, PartialEq)]
struct PendingResults {
    due_at: f64,
    route: ResultsRoute,
}

/// One player's run plus everything needed to drive it frame by frame
pub struct Engine {
    slot: PlayerSlot,
    registry: Rc<NoteRegistry>,
    dims: FieldDims,
    paddle_size: Vec2,
    keys: KeyBindings,
    results_delay_ms: f64,
    base_seed: u64,
    /// Bumped by every restart
    generation: u32,
    state: RunState,
    input: InputState,
    ramp: IntervalTicker,
    pending_results: Option<PendingResults>,
    navigated: bool,
}

impl Engine {
    pub fn new(slot: PlayerSlot, options: &GameOptions, registry: Rc<NoteRegistry>, seed: u64) -> Self {
        let dims = options.field_dims();
        let paddle_size = options.paddle_size();
        Self {
            slot,
            registry,
            dims,
            paddle_size,
            keys: options.player(slot).keys,
            results_delay_ms: options.results_delay_ms,
            base_seed: seed,
            generation: 0,
            state: RunState::new(seed, Paddle::new(dims.canvas, paddle_size)),
            input: InputState::new(),
            ramp: IntervalTicker::new(options.difficulty_interval_ms),
            pending_results: None,
            navigated: false,
        }
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RunState {
        &mut self.state
    }

    pub fn registry(&self) -> &NoteRegistry {
        &self.registry
    }

    pub fn dims(&self) -> &FieldDims {
        &self.dims
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn ramp_running(&self) -> bool {
        self.ramp.is_running()
    }

    /// Results navigation has been handed to the host
    pub fn has_navigated(&self) -> bool {
        self.navigated
    }

    /// Begin the run and the difficulty ramp. No-op unless not started.
    pub fn start(&mut self, now: f64) {
        if self.state.start() {
            self.ramp.start(now);
            log::info!("Player {} started (run {})", self.slot.number(), self.generation);
        }
    }

    /// Throw the current run away and start a fresh one
    ///
    /// The old ramp is stopped before the new run exists, so its pending
    /// steps can never land on the new run.
    pub fn restart(&mut self, now: f64) {
        self.ramp.stop();
        self.generation += 1;
        let seed = self
            .base_seed
            .wrapping_add(u64::from(self.generation).wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.state = RunState::new(seed, Paddle::new(self.dims.canvas, self.paddle_size));
        self.input = InputState::new();
        self.pending_results = None;
        self.navigated = false;
        log::info!("Player {} restarting with seed {}", self.slot.number(), seed);
        self.start(now);
    }

    /// End the run now, whatever the lives
    pub fn concede(&mut self, now: f64, host: &mut dyn Host) {
        self.state.concede(now);
        self.dispatch_events(host);
    }

    // === Input ===

    pub fn press_key(&mut self, code: &str) -> bool {
        self.input.key_down(code, &self.keys)
    }

    pub fn release_key(&mut self, code: &str) -> bool {
        self.input.key_up(code, &self.keys)
    }

    /// Active touch x positions in canvas space
    pub fn touch(&mut self, xs: &[f32]) {
        self.input.touch(xs, self.dims.canvas.x);
    }

    pub fn cancel_touch(&mut self) {
        self.input.cancel_touch();
    }

    // === Frame ===

    /// Run one display frame
    pub fn frame(&mut self, now: f64, session: &SessionContext, painter: &mut dyn Painter, host: &mut dyn Host) {
        painter.clear();
        painter.background();

        if self.state.lifecycle == Lifecycle::NotStarted {
            painter.start_overlay(&session.name(self.slot));
            return;
        }

        for _ in 0..self.ramp.poll(now) {
            self.state.raise_difficulty();
        }

        let input = TickInput {
            steer: if self.state.is_playing() {
                self.input.steer()
            } else {
                None
            },
        };
        tick(&mut self.state, &self.registry, &self.dims, &input, now);
        self.dispatch_events(host);

        let hud = self.hud_view(now, session);
        painter.paddle(&self.state.paddle.rect, &hud.feedback);
        for note in &self.state.notes {
            if let Some(note_type) = self.registry.get(note.type_index) {
                painter.note(note, note_type);
            }
        }
        painter.hud(&hud);

        if self.state.is_game_over() {
            // Overlay first: the transition must never precede it
            painter.game_over_overlay(&hud);
            if self.state.take_results_transition() {
                self.begin_results(now, session, host);
            }
        }

        self.fire_due_results(now, session, host);
    }

    fn hud_view(&self, now: f64, session: &SessionContext) -> HudView {
        let lives = self.state.display_lives();
        HudView {
            player_name: session.name(self.slot),
            score: self.state.score,
            lives,
            icons: LifeIcons::from_lives(lives),
            difficulty: self.state.difficulty,
            feedback: Feedback::at(
                now,
                self.state.damage_feedback_started_at,
                self.state.death_anim_started_at,
            ),
        }
    }

    fn dispatch_events(&mut self, host: &mut dyn Host) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Sound(cue) => host.play_cue(cue),
                GameEvent::GameOver => {
                    if self.ramp.stop() {
                        log::debug!("Player {} difficulty ramp stopped", self.slot.number());
                    }
                }
                GameEvent::Caught { type_index, note_id } => log::trace!(
                    "Player {} caught note {} ({})",
                    self.slot.number(),
                    note_id,
                    self.registry.get(type_index).map(|t| t.name.as_str()).unwrap_or("?")
                ),
                GameEvent::Started => {}
            }
        }
    }

    /// Persist the result and decide whether this engine navigates
    fn begin_results(&mut self, now: f64, session: &SessionContext, host: &mut dyn Host) {
        let score = self.state.score;
        let name = session.name(self.slot);
        let timestamp = host.timestamp();
        let data = host.session_data();

        data.persist_score(self.slot, score);
        let update_leaderboard = match data.record_highscore(&name, score, timestamp) {
            Some(rank) => {
                log::info!("{} placed #{} with {}", name, rank, score);
                true
            }
            None => false,
        };

        let route = match session.mode {
            PlayerMode::Single => Some(ResultsRoute {
                player_count: 1,
                update_leaderboard,
                is_direct: self.state.conceded,
                owner: self.slot,
                owner_score: score,
                other: None,
            }),
            PlayerMode::Two => match data.claim_handshake(self.slot, score) {
                HandshakeOutcome::Claimed => {
                    log::info!("Player {} finished first, waiting for the other player", self.slot.number());
                    None
                }
                HandshakeOutcome::Completed { owner, owner_score } => Some(ResultsRoute {
                    player_count: 2,
                    update_leaderboard,
                    is_direct: self.state.conceded,
                    owner,
                    owner_score,
                    other: Some((self.slot, score)),
                }),
            },
        };

        if let Some(route) = route {
            self.pending_results = Some(PendingResults {
                due_at: now + self.results_delay_ms,
                route,
            });
        }
    }

    fn fire_due_results(&mut self, now: f64, session: &SessionContext, host: &mut dyn Host) {
        if !self.pending_results.as_ref().is_some_and(|p| now >= p.due_at) {
            return;
        }
        let Some(pending) = self.pending_results.take() else {
            return;
        };
        if session.is_two_player() {
            host.session_data().release_handshake();
        }
        log::info!("Leaving for results: {}", pending.route.query_string());
        host.navigate_to_results(&pending.route);
        self.navigated = true;
    }
}
