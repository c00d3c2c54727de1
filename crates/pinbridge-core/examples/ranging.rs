use std::thread;
use std::time::Duration;

use pinbridge_core::hal::RpiBoard;
use pinbridge_core::{CleanupScope, NO_ECHO, Session};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const TRIG_PIN: u8 = 23;
const ECHO_PIN: u8 = 24;
const TIMEOUT: Duration = Duration::from_millis(100);
const READINGS: usize = 20;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    info!("Starting ultrasonic ranging on trig {} / echo {}...", TRIG_PIN, ECHO_PIN);

    let mut session = Session::new(RpiBoard::new());
    session.setup(0)?;

    for _ in 0..READINGS {
        let distance_cm = session.measure_distance_cm(TRIG_PIN, ECHO_PIN, TIMEOUT)?;
        if distance_cm == NO_ECHO {
            warn!("Measurement timeout");
        } else {
            info!("Distance: {:.1} cm", distance_cm);
        }

        // HC-SR04 recommended ranging cycle is >60ms to prevent interference
        thread::sleep(Duration::from_millis(80));
    }

    let report = session.cleanup(CleanupScope::Claimed);
    info!(released = ?report.released, "Done");
    Ok(())
}
