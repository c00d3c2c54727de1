//! Opening the serial link to the Arduino.

use std::thread;
use std::time::Duration;

use pinbridge_core::{Error, Result};
use serialport::SerialPort;
use tracing::info;

use crate::proxy::RemoteBoard;

/// The concrete link type returned by [`connect`].
pub type SerialLink = Box<dyn SerialPort>;

/// Default baud rate of the sketch.
pub const DEFAULT_BAUD: u32 = 9600;

/// Serial port parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialSettings {
    /// Device path, e.g. `/dev/ttyACM0` or `COM3`.
    pub port: String,
    /// Baud rate.
    pub baud: u32,
    /// How long a read waits for a reply before failing.
    pub read_timeout: Duration,
    /// Wait after opening; the Arduino reboots when the port opens.
    pub settle: Duration,
}

impl SerialSettings {
    /// Settings for `port` with the sketch defaults.
    pub fn new(port: impl Into<String>) -> Self {
        Self {
            port: port.into(),
            baud: DEFAULT_BAUD,
            read_timeout: Duration::from_secs(1),
            settle: Duration::from_secs(2),
        }
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self::new("/dev/ttyACM0")
    }
}

/// Opens the port and waits for the board to come back from its reset.
pub fn connect(settings: &SerialSettings) -> Result<RemoteBoard<SerialLink>> {
    let port = serialport::new(settings.port.as_str(), settings.baud)
        .timeout(settings.read_timeout)
        .open()
        .map_err(Error::transport)?;
    info!(
        port = %settings.port,
        baud = settings.baud,
        "serial port opened, waiting for board reset"
    );
    thread::sleep(settings.settle);
    Ok(RemoteBoard::with_link(port))
}
