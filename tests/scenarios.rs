//! Whole-game scenarios driven through the public engine API

use std::rc::Rc;

use grade_catch::persistence::SessionData;
use grade_catch::renderer::NullPainter;
use grade_catch::sim::SoundCue;
use grade_catch::{Engine, GameOptions, Host, PlayerMode, PlayerSlot, ResultsRoute, SessionContext};

const FRAME_MS: f64 = 16.0;

#[derive(Default)]
struct ScriptHost {
    data: SessionData,
    cues: Vec<SoundCue>,
    routes: Vec<ResultsRoute>,
}

impl Host for ScriptHost {
    fn play_cue(&mut self, cue: SoundCue) {
        self.cues.push(cue);
    }

    fn navigate_to_results(&mut self, route: &ResultsRoute) {
        self.routes.push(route.clone());
    }

    fn prompt_for_name(&mut self, _slot: PlayerSlot) -> Option<String> {
        None
    }

    fn session_data(&mut self) -> &mut SessionData {
        &mut self.data
    }
}

fn engine(slot: PlayerSlot, seed: u64) -> Engine {
    let options = GameOptions::default();
    let registry = Rc::new(options.registry());
    Engine::new(slot, &options, registry, seed)
}

/// Sweep left and right on a fixed rhythm
fn scripted_keys(engine: &mut Engine, frame: u32) {
    if (frame / 45) % 2 == 0 {
        engine.release_key("ArrowLeft");
        engine.press_key("ArrowRight");
    } else {
        engine.release_key("ArrowRight");
        engine.press_key("ArrowLeft");
    }
}

#[test]
fn same_seed_same_run() {
    let session = SessionContext::new(PlayerMode::Single);
    let mut a = engine(PlayerSlot::One, 1234);
    let mut b = engine(PlayerSlot::One, 1234);
    let (mut host_a, mut host_b) = (ScriptHost::default(), ScriptHost::default());
    a.start(0.0);
    b.start(0.0);

    for frame in 1..=3000 {
        let now = frame as f64 * FRAME_MS;
        scripted_keys(&mut a, frame);
        scripted_keys(&mut b, frame);
        a.frame(now, &session, &mut NullPainter, &mut host_a);
        b.frame(now, &session, &mut NullPainter, &mut host_b);
    }

    assert_eq!(a.state().score, b.state().score);
    assert_eq!(a.state().lives, b.state().lives);
    assert_eq!(a.state().notes, b.state().notes);
    assert_eq!(host_a.cues, host_b.cues);
}

#[test]
fn long_run_keeps_invariants() {
    let session = SessionContext::new(PlayerMode::Single);
    let mut engine = engine(PlayerSlot::One, 99);
    let mut host = ScriptHost::default();
    engine.start(0.0);

    let height = engine.dims().canvas.y;
    let width = engine.dims().canvas.x;
    for frame in 1..=5000 {
        let now = frame as f64 * FRAME_MS;
        scripted_keys(&mut engine, frame);
        engine.frame(now, &session, &mut NullPainter, &mut host);

        let state = engine.state();
        assert!(state.lives.is_finite());
        assert!(state.lives >= 0.0);
        assert!(state.notes.iter().all(|n| n.pos.y <= height));
        let paddle = state.paddle.rect;
        assert!(paddle.pos.x >= 0.0 && paddle.right() <= width);
        if state.is_playing() {
            assert_eq!(state.difficulty, 1 + (now / 5000.0).floor() as u32);
        }
    }
    assert!(host.routes.len() <= 1);
    assert!(host.cues.iter().filter(|c| **c == SoundCue::GameOver).count() <= 1);
}

#[test]
fn conceded_single_run_reaches_results_once() {
    let session = SessionContext::new(PlayerMode::Single);
    let mut engine = engine(PlayerSlot::One, 7);
    let mut host = ScriptHost::default();
    engine.start(0.0);

    for frame in 1..=600 {
        let now = frame as f64 * FRAME_MS;
        if frame == 120 {
            engine.state_mut().add_score(640);
            engine.concede(now, &mut host);
        }
        engine.frame(now, &session, &mut NullPainter, &mut host);
    }

    assert_eq!(host.routes.len(), 1);
    let route = &host.routes[0];
    assert!(route.is_direct);
    assert_eq!(route.player_count, 1);
    assert!(route.owner_score >= 640);
    assert_eq!(host.data.read_persisted_score(PlayerSlot::One), Some(route.owner_score));
    assert_eq!(host.data.highscores().top_score(), Some(route.owner_score));
}

#[test]
fn two_players_meet_on_one_results_page() {
    let session = SessionContext::new(PlayerMode::Two);
    let mut one = engine(PlayerSlot::One, 5);
    let mut two = engine(PlayerSlot::Two, 6);
    let mut host = ScriptHost::default();
    one.start(0.0);
    two.start(0.0);
    // Only the concedes may end these runs
    one.state_mut().lives = 1000.0;
    two.state_mut().lives = 1000.0;

    for frame in 1..=1200 {
        let now = frame as f64 * FRAME_MS;
        if frame == 300 {
            two.concede(now, &mut host);
        }
        if frame == 700 {
            one.concede(now, &mut host);
        }
        one.frame(now, &session, &mut NullPainter, &mut host);
        two.frame(now, &session, &mut NullPainter, &mut host);
        if frame < 700 {
            assert!(host.routes.is_empty(), "first finisher waits");
        }
    }

    assert_eq!(host.routes.len(), 1);
    let route = &host.routes[0];
    assert_eq!(route.player_count, 2);
    assert_eq!(route.owner, PlayerSlot::Two);
    assert_eq!(route.owner_score, two.state().score);
    assert_eq!(route.other, Some((PlayerSlot::One, one.state().score)));
    assert!(one.has_navigated());
    assert!(!host.data.handshake().active);
}
