//! Tile Collector headless demo
//!
//! Usage: `tile-collector [level.txt] [settings.json]`
//!
//! Runs the game loop with a greedy autopilot standing in for the player and
//! logs the HUD counters once per second. Without a level path the built-in
//! arena is used.

use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tile_collector::platform::GameLoop;
use tile_collector::sim::{
    BaseTile, Direction, GameEvent, GameMode, GameState, Level, RenderSnapshot,
};
use tile_collector::{GameResult, Settings};

const ARENA: &str = "\
WWWWWWWWWW
WFFFFWFFFW
WFWWFFFWFW
WFFFFPFFFW
WFWFWWFWFW
WFFFFFFFFW
WWWWWWWWWW";

/// Frame pacing of the fake display
const FRAME: Duration = Duration::from_millis(16);
/// Give up after this long even if the game is not over
const MAX_RUN: Duration = Duration::from_secs(120);

fn main() {
    env_logger::init();
    log::info!("Tile Collector (headless) starting...");

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> GameResult<()> {
    let mut args = std::env::args().skip(1);
    let level = match args.next() {
        Some(path) => Level::load_file(path)?,
        None => Level::parse(ARENA)?,
    };
    let settings = args.next().map(|path| Settings::load(path)).unwrap_or_default();

    let state = GameState::new(level, settings)?;
    let (tx, rx) = mpsc::channel::<RenderSnapshot>();
    let game = GameLoop::spawn(state, move |frame: &RenderSnapshot, events: &[GameEvent]| {
        for event in events {
            match event {
                GameEvent::TransientCollected { bonus } => log::info!("Bonus caught (+{bonus})"),
                GameEvent::GameOver { score } => log::info!("Game over, final score {score}"),
                other => log::debug!("{other:?}"),
            }
        }
        let _ = tx.send(frame.clone());
        thread::sleep(FRAME);
    })?;
    let controls = game.controls();

    let started = Instant::now();
    let mut last_report = Instant::now();
    while started.elapsed() < MAX_RUN && !game.is_finished() {
        let Some(frame) = rx.recv_timeout(FRAME * 4).ok().map(|f| rx.try_iter().last().unwrap_or(f))
        else {
            continue;
        };
        if frame.mode == GameMode::Over {
            break;
        }
        if controls.is_ready() {
            if let Some(dir) = autopilot(&frame) {
                controls.command(dir);
            }
        }
        if last_report.elapsed() >= Duration::from_secs(1) {
            log::info!(
                "{} collected, score {}, time {:.2}s",
                frame.collected_count,
                frame.collected_score,
                frame.elapsed_secs
            );
            last_report = Instant::now();
        }
    }

    let state = game.stop()?;
    log::info!(
        "Finished: {} collected, score {}, mode {:?}",
        state.collected_count(),
        state.collected_score(),
        state.mode()
    );
    Ok(())
}

/// Step towards the nearest target, preferring moves that shrink the distance
fn autopilot(frame: &RenderSnapshot) -> Option<Direction> {
    let px = frame.player.position.x.round() as i32;
    let py = frame.player.position.y.round() as i32;

    let passable = |x: i32, y: i32| {
        x >= 0
            && y >= 0
            && frame
                .cell(x as usize, y as usize)
                .is_some_and(|c| c.tile == Some(BaseTile::Floor))
    };

    let goal = frame
        .cells
        .iter()
        .enumerate()
        .flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, c)| c.target.is_some())
                .map(move |(x, _)| (x as i32, y as i32))
        })
        .min_by_key(|&(x, y)| (x - px).abs() + (y - py).abs())?;

    let dist = |x: i32, y: i32| (x - goal.0).abs() + (y - goal.1).abs();
    let options: Vec<(Direction, i32)> = Direction::ALL
        .into_iter()
        .filter_map(|d| {
            let (dx, dy) = d.offset();
            let (x, y) = (px + dx, py + dy);
            passable(x, y).then(|| (d, dist(x, y)))
        })
        .collect();

    // Rotate through ties and dead ends using the display clock
    let jitter = (frame.elapsed_secs * 100.0) as usize;
    let best = options.iter().map(|&(_, d)| d).min()?;
    let closer: Vec<Direction> = options
        .iter()
        .filter(|&&(_, d)| d == best)
        .map(|&(dir, _)| dir)
        .collect();
    if best < dist(px, py) || jitter % 3 != 0 {
        Some(closer[jitter % closer.len()])
    } else {
        Some(options[jitter % options.len()].0)
    }
}
