//! The lockstep blink arranged as `setup()` followed by `run_loop()`.

use std::process::ExitCode;

use anyhow::Context;
use pinbridge::config::{DEFAULT_CONFIG_PATH, Settings, load_config};
use pinbridge::demo::Rig;
use pinbridge::logging;
use pinbridge_core::hal::RpiBoard;
use pinbridge_remote::{SerialLink, connect};
use tracing::{error, info};

type PiRig = Rig<RpiBoard, SerialLink>;

fn setup(rig: &mut PiRig, settings: &Settings) -> anyhow::Result<()> {
    let serial = settings.arduino.serial();
    info!(port = %serial.port, "Connecting to Arduino");
    rig.setup(settings.gpio.chip, || connect(&serial))
}

fn run_loop(rig: &mut PiRig, settings: &Settings) -> anyhow::Result<()> {
    rig.blink(&settings.blink)
}

fn run(rig: &mut PiRig) -> anyhow::Result<()> {
    let settings = load_config(DEFAULT_CONFIG_PATH).context("loading settings")?;
    setup(rig, &settings)?;
    run_loop(rig, &settings)?;
    info!("Example finished.");
    Ok(())
}

fn main() -> ExitCode {
    logging::init();

    let mut rig = PiRig::new(RpiBoard::new());
    let outcome = run(&mut rig);
    if let Err(e) = &outcome {
        error!("Error: {:#}", e);
    }

    if rig.teardown() && outcome.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
