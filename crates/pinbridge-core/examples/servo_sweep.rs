use std::thread;
use std::time::Duration;

use pinbridge_core::hal::RpiBoard;
use pinbridge_core::{CleanupScope, Session};
use tracing::info;
use tracing_subscriber::EnvFilter;

// Don't power the servo from the Pi's 5V rail; share ground with its supply.
const SERVO_PIN: u8 = 18;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let mut session = Session::new(RpiBoard::new());
    session.setup(0)?;

    for angle in [0.0, 45.0, 90.0, 135.0, 180.0, 90.0] {
        let width = session.set_angle(SERVO_PIN, angle)?;
        info!("servo at {angle}° ({width} µs)");
        thread::sleep(Duration::from_millis(500));
    }

    session.stop_servo(SERVO_PIN)?;
    session.cleanup(CleanupScope::Claimed);
    Ok(())
}
