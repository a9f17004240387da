use anyhow::{Context, Result};
use tracing::{info, warn};

use jungle_ops::config::GameConfig;
use jungle_ops::constants::{FRAME_MS, LOOP_TIME};
use jungle_ops::error::GameError;
use jungle_ops::game::state::GameState;
use jungle_ops::game::GameManager;
use jungle_ops::logging::setup_logging;
use jungle_ops::render::{DrawList, SpriteSet};
use jungle_ops::store::JsonFileStore;

/// Length of the scripted session, in frames (one minute at 60 Hz).
const SESSION_FRAMES: u32 = 60 * 60;

/// Scripted input for frame `frame`: `(action, pressed)` pairs.
fn scripted_input(frame: u32) -> &'static [(&'static str, bool)] {
    match frame % 240 {
        0 => &[("move_right", true), ("attack", true)],
        60 => &[("move_right", false), ("move_down", true)],
        120 => &[("move_down", false), ("move_left", true), ("attack", false)],
        180 => &[("move_left", false), ("move_up", true), ("attack", true)],
        239 => &[("move_up", false), ("reload", true)],
        1 => &[("reload", false)],
        _ => &[],
    }
}

fn main() -> Result<()> {
    let config = GameConfig::load().context("Failed to load configuration")?;
    setup_logging(config.debug);
    info!(?config, "Starting headless session");

    let player_id = std::env::args().nth(1).unwrap_or_else(|| "player".to_string());
    let mut store = JsonFileStore::new(&config.save_dir);

    let mut game = GameManager::new(config);
    game.enter_menu();
    game.start_game(0.0);

    match game.resume_from(&store, &player_id) {
        Ok(resumed) => info!(resumed, player = %player_id, "Progress checked"),
        Err(GameError::Save(error)) => warn!(%error, "Starting fresh instead of resuming"),
        Err(error) => return Err(error).with_context(|| format!("Failed to load progress for {player_id}")),
    }

    let sprites = SpriteSet::new();
    let mut surface = DrawList::new();
    let mut now = 0.0;

    for frame in 0..SESSION_FRAMES {
        for &(action, pressed) in scripted_input(frame) {
            game.handle_input(action, pressed);
        }

        now += LOOP_TIME.as_secs_f32() * 1000.0;
        surface.reset();
        if !game.run_frame(now, &mut surface, &sprites) {
            break;
        }
    }

    if game.state() == GameState::Playing {
        game.pause();
    }

    let stats = game.stats();
    info!(
        state = %game.state(),
        level = game.level(),
        score = stats.score,
        kills = stats.kills,
        accuracy = stats.accuracy,
        frames = (game.clock() / FRAME_MS).round(),
        "Session finished"
    );

    game
        .persist(&mut store, &player_id)
        .with_context(|| format!("Failed to store progress for {player_id}"))?;

    Ok(())
}
