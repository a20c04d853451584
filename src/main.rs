//! Spaceships entry point
//!
//! Headless native run: loads settings, plays one game with the autopilot at
//! simulation speed and prints a text frame every couple of seconds.
//!
//! Usage: `spaceships [settings.json] [scores.json]`

use std::path::PathBuf;

use spaceships::audio::LogAudio;
use spaceships::consts::SIM_DT;
use spaceships::highscores::FileScoreStore;
use spaceships::renderer::{AsciiRenderer, RenderSink, Snapshot};
use spaceships::sim::{GameSession, Intent};
use spaceships::{Game, Settings};

/// Ticks between printed frames (about two seconds)
const PRINT_EVERY: u64 = 125;

/// Prints every `PRINT_EVERY`th frame to stdout
struct TerminalRenderer {
    ascii: AsciiRenderer,
    frames: u64,
}

impl RenderSink for TerminalRenderer {
    fn draw(&mut self, snapshot: &Snapshot) {
        self.frames += 1;
        if self.frames % PRINT_EVERY == 1 {
            self.ascii.draw(snapshot);
            println!("{}", self.ascii.frame().join("\n"));
        }
    }
}

/// Pick intents for this tick: line up under the nearest enemy and fire
fn autopilot(session: &GameSession) -> Vec<Intent> {
    let ship_x = session.ship.rect().center().x;
    let target = session
        .enemies
        .iter()
        .map(|e| e.rect().center().x)
        .min_by(|a, b| {
            (a - ship_x)
                .abs()
                .partial_cmp(&(b - ship_x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let Some(target_x) = target else {
        return Vec::new();
    };

    let tolerance = session.ship.size.x / 4.0;
    let mut intents = vec![Intent::MoveLeftStop, Intent::MoveRightStop];
    if target_x < ship_x - tolerance {
        intents.push(Intent::MoveLeftStart);
    } else if target_x > ship_x + tolerance {
        intents.push(Intent::MoveRightStart);
    } else {
        intents.push(Intent::Fire);
    }
    intents
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Spaceships (native) starting...");

    let mut args = std::env::args().skip(1);
    let settings_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("spaceships.json"));
    let scores_path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("spaceships_scores.json"));

    let mut settings = Settings::load_or_default(&settings_path);
    if settings.player.is_none() {
        settings.player = Some("autopilot".to_string());
    }
    let player = settings.player.clone().unwrap_or_default();

    let ascii = AsciiRenderer::new(80, 30, settings.canvas_width, settings.canvas_height);
    let seed = spaceships::unix_millis();

    let mut game = match Game::new(settings, seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid settings in {}: {}", settings_path.display(), e);
            std::process::exit(2);
        }
    };
    game = game
        .with_renderer(Box::new(TerminalRenderer { ascii, frames: 0 }))
        .with_audio(Box::new(LogAudio))
        .with_score_store(Box::new(FileScoreStore::open(&scores_path)));

    log::info!("Game initialized with seed: {}", seed);
    game.new_game();

    while game.session().is_running() {
        for intent in autopilot(game.session()) {
            game.apply_intent(intent);
        }
        game.update(SIM_DT);
    }

    let session = game.session();
    println!(
        "\n{}\nscore {} | shots {} | lives {}",
        session.message.as_deref().unwrap_or(""),
        session.score,
        session.shots_fired,
        session.lives
    );

    let ledger = FileScoreStore::open(&scores_path);
    println!("\nHigh scores for {}:", player);
    for (rank, entry) in ledger.scores().entries(&player).iter().enumerate() {
        println!("{:>2}. {:>5}", rank + 1, entry.score);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {}
