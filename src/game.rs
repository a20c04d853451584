//! Game driver
//!
//! Owns the session and its collaborators and is the only scheduler: real
//! time goes into an accumulator, whole fixed ticks come out. Escalation runs
//! inside the tick, so there is no second timer to cancel.

use crate::audio::{AudioManager, AudioSink};
use crate::consts::*;
use crate::error::ConfigError;
use crate::highscores::ScoreStore;
use crate::input::{KeyAction, KeyBindings};
use crate::renderer::{RenderSink, Snapshot};
use crate::settings::Settings;
use crate::sim::{self, GameEvent, GameSession, Intent};

/// Game instance holding the session and its collaborators
pub struct Game {
    session: GameSession,
    /// Real time not yet simulated
    accumulator: f32,
    base_seed: u64,
    games_started: u64,
    bindings: KeyBindings,
    audio: AudioManager,
    renderer: Option<Box<dyn RenderSink>>,
    score_store: Option<Box<dyn ScoreStore>>,
    /// Unix milliseconds for score timestamps
    clock: fn() -> u64,
}

impl Game {
    /// Validate settings and build an idle game (phase `NotStarted`)
    pub fn new(settings: Settings, seed: u64) -> Result<Self, ConfigError> {
        let session = GameSession::new(settings, seed)?;
        let bindings = KeyBindings::from_settings(&session.settings);
        let mut audio = AudioManager::silent();
        audio.apply_settings(&session.settings);

        Ok(Self {
            session,
            accumulator: 0.0,
            base_seed: seed,
            games_started: 0,
            bindings,
            audio,
            renderer: None,
            score_store: None,
            clock: crate::unix_millis,
        })
    }

    pub fn with_renderer(mut self, renderer: Box<dyn RenderSink>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_audio(mut self, sink: Box<dyn AudioSink>) -> Self {
        self.audio = AudioManager::new(sink);
        self.audio.apply_settings(&self.session.settings);
        self
    }

    pub fn with_score_store(mut self, store: Box<dyn ScoreStore>) -> Self {
        self.score_store = Some(store);
        self
    }

    pub fn with_clock(mut self, clock: fn() -> u64) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }

    /// Start (or restart) a game
    pub fn new_game(&mut self) {
        // Drop pending time first so no stale tick touches the fresh session
        self.accumulator = 0.0;
        self.session
            .reseed(self.base_seed.wrapping_add(self.games_started));
        self.games_started += 1;
        sim::new_game(&mut self.session);
        self.draw();
    }

    /// Feed a raw key event through the bindings
    pub fn handle_key(&mut self, key: &str, action: KeyAction) {
        for intent in self.bindings.map(key, action) {
            self.apply_intent(intent);
        }
    }

    pub fn apply_intent(&mut self, intent: Intent) {
        sim::apply_intent(&mut self.session, intent);
        self.dispatch_events();
    }

    /// Advance by elapsed real time. Returns the number of ticks run.
    pub fn update(&mut self, elapsed: f32) -> u32 {
        if !self.session.is_running() {
            self.accumulator = 0.0;
            return 0;
        }

        // Cap long frames (tab switches, debugger pauses)
        self.accumulator += elapsed.clamp(0.0, MAX_FRAME_SECS);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.step();
            if !self.session.is_running() {
                self.accumulator = 0.0;
                break;
            }
        }

        // Drop whatever backlog the substep cap could not absorb
        self.accumulator = self.accumulator.min(SIM_DT);
        substeps
    }

    /// Run exactly one tick and notify collaborators
    pub fn step(&mut self) {
        if !self.session.is_running() {
            return;
        }
        sim::tick(&mut self.session, SIM_DT);
        self.dispatch_events();
        self.draw();
    }

    /// Current frame as seen by the renderer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from(&self.session)
    }

    fn draw(&mut self) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.draw(&Snapshot::from(&self.session));
        }
    }

    fn dispatch_events(&mut self) {
        let events = self.session.drain_events();
        self.audio.play_events(&events);

        for event in &events {
            if let GameEvent::GameEnded(_) = event {
                self.submit_score();
            }
        }
    }

    fn submit_score(&mut self) {
        let Some(store) = self.score_store.as_mut() else {
            return;
        };
        let Some(identity) = self.session.settings.player.as_deref() else {
            log::info!("No player set, score not recorded");
            return;
        };
        store.submit(identity, self.session.score, (self.clock)());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SoundEffect;
    use crate::highscores::HighScores;
    use crate::sim::{EndReason, GamePhase};
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Shared {
        frames: usize,
        sounds: Vec<SoundEffect>,
        scores: HighScores,
    }

    #[derive(Clone, Default)]
    struct Probe(Rc<RefCell<Shared>>);

    impl RenderSink for Probe {
        fn draw(&mut self, _snapshot: &Snapshot) {
            self.0.borrow_mut().frames += 1;
        }
    }

    impl AudioSink for Probe {
        fn play(&mut self, effect: SoundEffect, _volume: f32) {
            self.0.borrow_mut().sounds.push(effect);
        }
    }

    impl ScoreStore for Probe {
        fn submit(&mut self, identity: &str, score: u64, timestamp: u64) {
            self.0.borrow_mut().scores.add_score(identity, score, timestamp);
        }
    }

    fn fixed_clock() -> u64 {
        1_234
    }

    fn probed_game(settings: Settings) -> (Game, Probe) {
        let probe = Probe::default();
        let game = Game::new(settings, 9)
            .unwrap()
            .with_renderer(Box::new(probe.clone()))
            .with_audio(Box::new(probe.clone()))
            .with_score_store(Box::new(probe.clone()))
            .with_clock(fixed_clock);
        (game, probe)
    }

    #[test]
    fn test_rejects_bad_settings() {
        let result = Game::new(
            Settings {
                duration_secs: 0.0,
                ..Default::default()
            },
            1,
        );
        assert!(matches!(result, Err(ConfigError::InvalidDuration(_))));
    }

    #[test]
    fn test_update_before_start_is_noop() {
        let (mut game, probe) = probed_game(Settings::default());
        assert_eq!(game.update(1.0), 0);
        assert_eq!(game.session().phase, GamePhase::NotStarted);
        assert_eq!(probe.0.borrow().frames, 0);
    }

    #[test]
    fn test_update_runs_whole_ticks() {
        let (mut game, probe) = probed_game(Settings::default());
        game.new_game();
        let frames_after_start = probe.0.borrow().frames;

        assert_eq!(game.update(0.010), 0);
        assert_eq!(game.update(0.010), 1);
        assert_eq!(game.update(0.040), 2);
        assert_eq!(game.session().time_ticks, 3);
        assert_eq!(probe.0.borrow().frames, frames_after_start + 3);
    }

    #[test]
    fn test_update_caps_substeps() {
        let (mut game, _probe) = probed_game(Settings::default());
        game.new_game();
        assert_eq!(game.update(10.0), MAX_SUBSTEPS);
        assert_eq!(game.session().time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_backlog_stays_bounded_under_long_frames() {
        let (mut game, _probe) = probed_game(Settings::default());
        game.new_game();
        for _ in 0..20 {
            assert_eq!(game.update(MAX_FRAME_SECS), MAX_SUBSTEPS);
            assert!(game.accumulator <= SIM_DT);
        }
        // A quiet frame afterwards runs at most the one pending tick
        assert!(game.update(0.0) <= 1);
    }

    #[test]
    fn test_arrow_bound_fire_key_moves_and_fires() {
        let (mut game, probe) = probed_game(Settings {
            fire_key: "ArrowUp".to_string(),
            ..Default::default()
        });
        game.new_game();
        game.handle_key("ArrowUp", KeyAction::Down);
        assert!(game.session().ship.moving_up);
        assert_eq!(game.session().player_missiles.len(), 1);
        assert_eq!(probe.0.borrow().sounds, vec![SoundEffect::PlayerShotFired]);
    }

    #[test]
    fn test_new_game_discards_pending_time() {
        let (mut game, _probe) = probed_game(Settings::default());
        game.new_game();
        game.update(0.015);
        game.new_game();
        // The 15 ms from the previous game must not complete a tick here
        assert_eq!(game.update(0.002), 0);
        assert_eq!(game.session().time_ticks, 0);
    }

    #[test]
    fn test_key_events_reach_session_and_audio() {
        let (mut game, probe) = probed_game(Settings::default());
        game.new_game();
        game.handle_key("ArrowRight", KeyAction::Down);
        assert!(game.session().ship.moving_right);
        game.handle_key("ArrowRight", KeyAction::Up);
        assert!(!game.session().ship.moving_right);

        game.handle_key(" ", KeyAction::Down);
        assert_eq!(game.session().player_missiles.len(), 1);
        assert_eq!(probe.0.borrow().sounds, vec![SoundEffect::PlayerShotFired]);
    }

    #[test]
    fn test_keys_ignored_before_start() {
        let (mut game, probe) = probed_game(Settings::default());
        game.handle_key(" ", KeyAction::Down);
        game.handle_key("ArrowLeft", KeyAction::Down);
        assert!(game.session().player_missiles.is_empty());
        assert!(!game.session().ship.moving_left);
        assert!(probe.0.borrow().sounds.is_empty());
    }

    #[test]
    fn test_score_submitted_on_end() {
        let (mut game, probe) = probed_game(Settings {
            duration_secs: 0.05,
            player: Some("ada".to_string()),
            ..Default::default()
        });
        game.new_game();
        for _ in 0..10 {
            game.update(SIM_DT);
        }
        assert_eq!(
            game.session().phase,
            GamePhase::Ended(EndReason::Timeout)
        );
        let shared = probe.0.borrow();
        assert_eq!(
            shared.scores.entries("ada"),
            &[crate::highscores::HighScoreEntry {
                score: 0,
                timestamp: 1_234
            }]
        );
    }

    #[test]
    fn test_no_identity_no_submission() {
        let (mut game, probe) = probed_game(Settings {
            duration_secs: 0.05,
            ..Default::default()
        });
        game.new_game();
        for _ in 0..10 {
            game.update(SIM_DT);
        }
        assert!(!game.session().is_running());
        assert!(probe.0.borrow().scores.is_empty());
    }

    #[test]
    fn test_runs_without_collaborators() {
        let mut game = Game::new(Settings::default(), 3).unwrap();
        game.new_game();
        for _ in 0..120 {
            game.update(SIM_DT);
            game.apply_intent(Intent::Fire);
        }
        assert!(game.session().time_ticks > 0);
        assert_eq!(game.snapshot().score, game.session().score);
    }

    #[test]
    fn test_restart_after_end() {
        let (mut game, _probe) = probed_game(Settings {
            duration_secs: 0.05,
            ..Default::default()
        });
        game.new_game();
        for _ in 0..10 {
            game.update(SIM_DT);
        }
        assert!(!game.session().is_running());

        game.new_game();
        assert!(game.session().is_running());
        assert_eq!(game.session().time_ticks, 0);
        assert_ne!(game.session().seed, 9);
    }
}
