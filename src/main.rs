//! Pot Dungeon entry point
//!
//! Runs the simulation headless with a scripted input pattern and logs what
//! happens. Usage: `pot-dungeon [settings.json] [frames]`

use pot_dungeon::sim::{Direction, Dungeon, Entity, FrameInput, Key};
use pot_dungeon::{AudioSink, LogAudio, Settings};

/// Fixed simulation timestep
const SIM_DT: f32 = 1.0 / 60.0;
const DEFAULT_FRAMES: u32 = 60 * 60;
/// Frames each scripted step lasts
const STEP_FRAMES: u32 = 45;

fn main() {
    env_logger::init();
    log::info!("Pot Dungeon (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load(&path).unwrap_or_else(|e| {
            log::warn!("Failed to load settings from {path}: {e}; using defaults");
            Settings::default()
        }),
        None => Settings::default(),
    };
    let frames = args.next().and_then(|n| n.parse().ok()).unwrap_or(DEFAULT_FRAMES);

    let mut dungeon = Dungeon::new(settings);
    let mut audio = LogAudio::new();

    let mut frame = 0;
    while frame < frames && !dungeon.is_game_over() {
        let input = scripted_input(frame);
        dungeon.update(SIM_DT, &input);
        audio.play_all(dungeon.drain_sounds());
        // Draw list is built every frame as a real frontend would
        let commands = dungeon.render();
        log::trace!("frame {frame}: {} draw commands", commands.len());
        frame += 1;
    }

    let player = dungeon.player();
    log::info!(
        "ran {frame} frames: room {:?}, {} rooms entered, player health {}, {} enemies left, {} sounds",
        dungeon.room().id(),
        dungeon.rooms_entered(),
        player.health(),
        dungeon.room().enemies().iter().filter(|e| !e.is_dead()).count(),
        audio.played()
    );
    if dungeon.is_game_over() {
        log::info!("Game over");
    }
}

/// Walk a square, swinging at each corner and trying to lift or throw a pot
/// halfway along each side
fn scripted_input(frame: u32) -> FrameInput {
    const PATTERN: [Direction; 4] = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];
    let step = frame / STEP_FRAMES;
    let within = frame % STEP_FRAMES;
    let direction = PATTERN[step as usize % PATTERN.len()];

    match within {
        0 => FrameInput::default().press(Key::Attack),
        w if w == STEP_FRAMES / 2 => FrameInput::moving(direction).press(Key::Interact),
        _ => FrameInput::moving(direction),
    }
}
