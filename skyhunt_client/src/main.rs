//! Standalone client binary.
//!
//! Usage:
//!   cargo run -p skyhunt_client -- [--config game.json] [--tick-hz 60] [--seed 7] [--frames 600]
//!
//! Runs the game loop headless. Input comes from console commands on stdin
//! and frames are reported through the tracing renderer (`RUST_LOG=trace`).
//!
//! Console commands:
//!   hold <keys>     - Press and keep keys down (w a s d q e x f space 1 tab esc)
//!   release <keys>  - Let keys go
//!   tap <keys>      - Press keys for a single frame
//!   look <dx> <dy>  - Move the mouse
//!   status          - Show game status
//!   quit            - Exit

use std::env;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use skyhunt_client::{
    clock::{FrameClock, MonotonicTime},
    game::{Game, GameEvent, GameState},
    input::{ConsoleCommand, InputState},
    renderer::TraceRenderer,
};
use skyhunt_shared::config::GameConfig;
use tokio::sync::mpsc;
use tracing::info;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    tick_hz: Option<u32>,
    seed: Option<u64>,
    /// Stop after this many frames.
    frames: Option<u64>,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut out = Args::default();
    let args: Vec<String> = env::args().collect();
    let mut i = 1;
    while i < args.len() {
        let value = args.get(i + 1);
        match (args[i].as_str(), value) {
            ("--config", Some(v)) => out.config = Some(PathBuf::from(v)),
            ("--tick-hz", Some(v)) => out.tick_hz = Some(v.parse().context("parse --tick-hz")?),
            ("--seed", Some(v)) => out.seed = Some(v.parse().context("parse --seed")?),
            ("--frames", Some(v)) => out.frames = Some(v.parse().context("parse --frames")?),
            (flag, _) => bail!("unexpected argument: {flag}"),
        }
        i += 2;
    }
    Ok(out)
}

fn load_config(path: &Path) -> anyhow::Result<GameConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    GameConfig::from_json_str(&text).with_context(|| format!("parse config {}", path.display()))
}

fn print_event(event: &GameEvent) {
    match event {
        GameEvent::EnemyDestroyed {
            remaining,
            reward,
            balance,
        } => {
            println!("Enemy destroyed! {remaining} enemies left!");
            println!("You gained {reward}$! You have: {balance}$");
        }
        GameEvent::WaveCleared { wave } => {
            println!("Wave {wave} cleared! You are now on wave {}.", wave + 1);
        }
        GameEvent::StateChanged {
            to: GameState::Shop,
            ..
        } => {
            println!("Welcome to the shop!");
            println!("Tap 1 to buy the speed boost, q to start the next wave.");
        }
        GameEvent::Purchased { upgrade, balance } => {
            println!("Bought {upgrade}. Hold f in combat to use it. You have: {balance}$");
        }
        GameEvent::PurchaseFailed(e) => println!("{e}"),
        _ => {}
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = parse_args()?;
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => GameConfig::default(),
    };
    if let Some(hz) = args.tick_hz {
        cfg.tick_hz = hz;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }
    cfg.validate().context("invalid config")?;
    info!(tick_hz = cfg.tick_hz, seed = ?cfg.seed, wave_size = cfg.combat.wave_size, "Starting game");

    let tick_interval = Duration::from_secs_f64(1.0 / f64::from(cfg.tick_hz));
    let mut game = Game::new(cfg);

    // Set up console input channel.
    let (console_tx, mut console_rx) = mpsc::channel::<String>(32);

    // Spawn stdin reader thread.
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut stdout = std::io::stdout();
        loop {
            print!("] ");
            let _ = stdout.flush();
            let mut line = String::new();
            match stdin.lock().read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.blocking_send(line).is_err() {
                break;
            }
        }
    });

    println!("Game running. Type 'status' for info, 'quit' to exit.");
    println!();

    let time = MonotonicTime::default();
    let mut clock = FrameClock::default();
    let mut input = InputState::default();
    let mut renderer = TraceRenderer::default();
    let mut next_tick = tokio::time::Instant::now();

    loop {
        // Process console commands.
        while let Ok(line) = console_rx.try_recv() {
            match ConsoleCommand::parse(&line) {
                Ok(ConsoleCommand::Status) => {
                    for line in game.status_lines() {
                        println!("{line}");
                    }
                }
                Ok(cmd) => input.apply(cmd),
                Err(e) => println!("Error: {e}"),
            }
        }

        let frame_input = input.sample();
        let frame_time = clock.tick_from(&time);
        let outcome = game.update(&frame_input, frame_time);
        game.render(&mut renderer);

        for event in &outcome.events {
            print_event(event);
        }
        if outcome.quit {
            break;
        }
        if args.frames.is_some_and(|max| renderer.frames() >= max) {
            break;
        }

        // Wait for next frame.
        next_tick += tick_interval;
        tokio::time::sleep_until(next_tick).await;
    }

    info!(
        frames = renderer.frames(),
        wave = game.wave(),
        balance = game.wallet().balance(),
        "Exiting"
    );
    Ok(())
}
