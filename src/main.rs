//! Crease Cricket headless driver
//!
//! Runs the tutorial and one full innings with the autoplay batsman and
//! scripted commentary, then prints the scoreboard.
//!
//! Usage: `crease-cricket [settings.json] [seed]`

use std::time::{SystemTime, UNIX_EPOCH};

use crease_cricket::audio::{SchedulerTiming, VirtualOutput};
use crease_cricket::commentary::{Commentary, ScriptedVoice, VoiceScript};
use crease_cricket::consts::*;
use crease_cricket::sim::{GameState, PlayerCharacter};
use crease_cricket::{AssetStatus, Engine, Settings, TickInput};

/// Host frame time; deliberately not a multiple of the sim step
const FRAME_DT: f32 = 1.0 / 50.0;
/// Give up after this much game time
const MAX_GAME_SECS: f32 = 15.0 * 60.0;

/// Game instance driven by host frames
struct Game {
    engine: Engine,
    accumulator: f32,
    input: TickInput,
    elapsed: f32,
}

impl Game {
    fn new(settings: Settings, seed: u64) -> Self {
        let timing = SchedulerTiming::from(&settings.audio);
        let commentary = Commentary::new(
            Some(Box::new(ScriptedVoice::new(VoiceScript::default()))),
            Box::new(VirtualOutput::new()),
            timing,
        );
        Self {
            engine: Engine::new(settings, seed, commentary),
            accumulator: 0.0,
            input: TickInput {
                autoplay: true,
                ..TickInput::default()
            },
            elapsed: 0.0,
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;
        self.elapsed += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.engine.tick(&self.input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // One-shot inputs
            self.input.start = false;
            self.input.swing = false;
        }

        for effect in self.engine.take_sound_effects() {
            log::debug!("Sound: {effect:?}");
        }
        for event in self.engine.take_commentary_events() {
            log::info!(
                "[{:>3}/{} after {} balls] {}",
                event.counters.score,
                event.counters.wickets,
                event.counters.balls_bowled,
                event.kind
            );
        }
    }

    fn run_until(&mut self, done: impl Fn(&Engine) -> bool) -> bool {
        while self.elapsed < MAX_GAME_SECS {
            if done(&self.engine) {
                return true;
            }
            self.update(FRAME_DT);
        }
        false
    }
}

fn load_settings(path: Option<&str>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    match Settings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("Using default settings: {e}");
            Settings::default()
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Crease Cricket (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    let settings = load_settings(args.get(1).map(String::as_str));
    let seed = args
        .get(2)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or(0)
        });
    log::info!("Game initialized with seed: {seed}");

    let mut game = Game::new(settings, seed);
    game.engine.set_assets(AssetStatus::all_loaded());
    game.engine.select_character(PlayerCharacter::Opener);

    if !game.run_until(|e| e.state() == GameState::Idle) {
        log::error!("Tutorial did not finish");
        std::process::exit(1);
    }

    game.input.start = true;
    if !game.run_until(|e| e.state() == GameState::GameOver) {
        log::error!("Innings did not finish");
        std::process::exit(1);
    }

    let c = game.engine.counters();
    println!("Target:  {}", c.target_score);
    println!("Score:   {}/{}", c.score, c.wickets);
    println!("Balls:   {}/{}", c.balls_bowled, c.total_balls);
    if let Some(result) = game.engine.hud().message() {
        println!("{result}");
    }
}
