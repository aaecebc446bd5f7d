/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::GameConfig;
use sim::event::GameEvent;
use sim::level::load_default;
use sim::step;
use sim::world::WorldState;
use ui::input::InputState;
use ui::renderer::Renderer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);
const LOG_FILE: &str = "mazechase.log";

fn main() -> Result<()> {
    init_tracing();

    let config = GameConfig::load();
    let mut rng = match config.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut world = load_default(&config.rules).context("built-in maze is malformed")?;
    info!(seed = ?config.rng_seed, "starting game");

    let mut renderer = Renderer::new();
    renderer.init().context("terminal init failed")?;

    let result = game_loop(&mut world, &mut renderer, &mut rng, &config);

    if let Err(e) = renderer.cleanup() {
        warn!(error = %e, "terminal cleanup failed");
        eprintln!("Terminal cleanup failed: {e}");
    }
    result?;

    println!();
    println!("Final Score: {}", world.score);
    Ok(())
}

/// Log to a file; the terminal belongs to the game.
fn init_tracing() {
    let Ok(file) = File::create(LOG_FILE) else { return };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();
}

// ── Clocks ──

/// One of the three independent tick sources.
struct Clock {
    period: Duration,
    last: Instant,
}

impl Clock {
    fn new(period_ms: u64) -> Self {
        Clock { period: Duration::from_millis(period_ms), last: Instant::now() }
    }

    fn due(&mut self) -> bool {
        if self.last.elapsed() < self.period { return false; }
        self.last = Instant::now();
        true
    }

    fn restart(&mut self) {
        self.last = Instant::now();
    }
}

// ── Main loop ──

fn game_loop(
    world: &mut WorldState,
    renderer: &mut Renderer,
    rng: &mut StdRng,
    config: &GameConfig,
) -> Result<()> {
    let mut input = InputState::new();
    let mut player_clock = Clock::new(config.speed.player_tick_ms);
    let mut agent_clock = Clock::new(config.speed.agent_tick_ms);
    let mut pen_clock = Clock::new(config.speed.pen_tick_ms);
    let mut message = String::new();

    loop {
        input.drain_events();
        if input.quit_requested() {
            info!(score = world.score, "quit");
            break;
        }

        if world.is_playing() {
            for dir in input.intents() {
                step::steer(world, dir);
            }
        } else if input.restart_requested() {
            *world = load_default(&config.rules).context("built-in maze is malformed")?;
            player_clock.restart();
            agent_clock.restart();
            pen_clock.restart();
            message.clear();
            info!("restarted");
        }

        let mut events = Vec::new();
        if player_clock.due() {
            events.extend(step::player_tick(world));
        }
        if agent_clock.due() {
            events.extend(step::agent_tick(world, rng));
        }
        if pen_clock.due() {
            events.extend(step::pen_tick(world));
        }
        if let Some(text) = events.iter().rev().find_map(describe) {
            message = text;
        }

        renderer.render(world, &message)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

/// Status-line text for the events worth announcing.
fn describe(event: &GameEvent) -> Option<String> {
    match event {
        GameEvent::ModeChanged { mode } => Some(format!("Agents now {}", mode.label().to_lowercase())),
        GameEvent::AgentCaptured { role } => Some(format!("Captured {}!", role.name())),
        GameEvent::AgentReleased { role } => Some(format!("{} left the pen", role.name())),
        GameEvent::LifeLost { lives_left } => Some(format!("Caught! {} lives left", lives_left)),
        GameEvent::GameOver | GameEvent::GameWon => Some(String::new()),
        GameEvent::PointsScored { .. } | GameEvent::PickupConsumed { .. } => None,
    }
}
