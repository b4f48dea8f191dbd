//! Polybounce headless driver
//!
//! Runs the simulation against a synthetic 60 Hz clock and prints the final
//! world as JSON.
//!
//! Usage: `polybounce [settings.json] [seconds]`

use polybounce::platform::FrameClock;
use polybounce::sim::{SimEvent, Viewport, World};
use polybounce::{Settings, SettingsError};

const FRAME_RATE: f64 = 60.0;
const DEFAULT_SECONDS: f64 = 10.0;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), SettingsError> {
    let mut args = std::env::args().skip(1);

    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => {
            log::info!("No settings file given, using defaults");
            Settings::default()
        }
    };
    let seconds = args
        .next()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let mut world = World::new(settings, Viewport::new(800.0, 600.0))?;
    let mut clock = FrameClock::new();

    log::info!("Polybounce starting: {seconds}s at {FRAME_RATE} Hz");

    let frames = (seconds * FRAME_RATE).round() as u64;
    for frame in 0..=frames {
        let dt = clock.tick(frame as f64 / FRAME_RATE);
        let report = world.advance(dt);
        for SimEvent::Bounce { sides, speed, .. } in report.events {
            log::info!(
                "t={:.2}s bounce: now {} sides, speed {:.1}",
                frame as f64 / FRAME_RATE,
                sides,
                speed
            );
        }
    }

    log::info!(
        "Finished with {} sides after {} bounces, speed {:.1}",
        world.sides(),
        world.bounces(),
        world.speed()
    );
    println!("{}", serde_json::to_string_pretty(&world)?);
    Ok(())
}
