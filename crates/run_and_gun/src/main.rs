//! Headless run of the built-in level with scripted input
//!
//! Usage: `run_and_gun [config.toml|config.ron] [level.ron|level.toml]`

use platformer_engine::assets::AssetManager;
use platformer_engine::foundation::logging;
use platformer_engine::foundation::math::Rect;
use platformer_engine::foundation::time::FixedTimestep;
use platformer_engine::level::LevelData;
use platformer_engine::render::RecordingTarget;
use run_and_gun::demo::{demo_level, scripted_input};
use run_and_gun::{sprites, GameConfig, GameSession, StepOutcome};

const MAX_STEPS: u64 = 1200; // 20 seconds at 60 Hz
const VIEW_WIDTH: f32 = 1280.0;
const VIEW_HEIGHT: f32 = 720.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let config = GameConfig::load_or_default(args.next().as_deref())?;
    let level = match args.next() {
        Some(path) => LevelData::load(&path)?,
        None => {
            log::info!("Using built-in demo level");
            demo_level()
        }
    };

    let mut assets = AssetManager::new();
    sprites::register_placeholders(&mut assets);

    let mut session = GameSession::new(Box::new(level), assets, config)?;
    let mut timestep = FixedTimestep::new(session.config().world.timestep)?;
    let mut target = RecordingTarget::new();
    let mut resets = 0;

    while session.steps() < MAX_STEPS {
        // Headless: feed exactly one step of time per iteration
        timestep.advance_by(timestep.step_duration());
        while timestep.consume_step() {
            let input = scripted_input(session.steps());
            if session.step(timestep.step_seconds(), &input)? == StepOutcome::GameOver {
                resets += 1;
                session.reset_scene()?;
            }
        }

        if session.steps() % 60 == 0 {
            let Some(player) = session.player() else {
                break;
            };
            let center = player.hitbox().center();
            let visible = Rect::new(
                center.x - VIEW_WIDTH / 2.0,
                center.y - VIEW_HEIGHT / 2.0,
                VIEW_WIDTH,
                VIEW_HEIGHT,
            );
            target.clear();
            session.render(&mut target, visible);
            log::info!(
                "step {:>5}: player at ({:.0}, {:.0}) {} health {} | {} objects, {} sprites drawn",
                session.steps(),
                center.x,
                center.y,
                player.status(),
                player.health().current(),
                session.registry().len(),
                target.sprite_count()
            );
        }
    }

    log::info!("Finished {} steps with {} scene reset(s)", session.steps(), resets);
    Ok(())
}
