use std::process::ExitCode;

use pinbridge::config::{DEFAULT_CONFIG_PATH, load_config};
use pinbridge::demo::Rig;
use pinbridge::logging;
use pinbridge_core::hal::RpiBoard;
use pinbridge_remote::{SerialLink, connect};
use tracing::{error, info};

fn main() -> ExitCode {
    logging::init();

    let settings = match load_config(DEFAULT_CONFIG_PATH) {
        Ok(settings) => settings,
        Err(_) => return ExitCode::FAILURE,
    };

    let mut rig: Rig<RpiBoard, SerialLink> = Rig::new(RpiBoard::new());
    let serial = settings.arduino.serial();

    let outcome = rig
        .setup(settings.gpio.chip, || connect(&serial))
        .and_then(|()| rig.blink(&settings.blink));

    match &outcome {
        Ok(()) => info!("Example finished."),
        Err(e) => error!("Error: {:#}", e),
    }

    let clean = rig.teardown();
    if outcome.is_ok() && clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
