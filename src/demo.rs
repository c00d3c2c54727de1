//! Blinking one LED on the Pi and one on the Arduino in lockstep.

use std::io::{Read, Write};
use std::thread;

use anyhow::{Context, anyhow};
use pinbridge_core::{Board, CleanupScope, Level, Session};
use pinbridge_remote::RemoteBoard;
use tracing::{error, info};

use crate::config::BlinkSettings;

/// Both boards, opened in order and torn down together.
pub struct Rig<B: Board, T: Read + Write> {
    pub pi: Session<B>,
    pub arduino: Option<RemoteBoard<T>>,
}

impl<B: Board, T: Read + Write> Rig<B, T> {
    pub fn new(board: B) -> Self {
        Self {
            pi: Session::new(board),
            arduino: None,
        }
    }

    /// Opens the Pi GPIO chip, then the Arduino link produced by `connect`.
    pub fn setup<F>(&mut self, chip: u32, connect: F) -> anyhow::Result<()>
    where
        F: FnOnce() -> pinbridge_core::Result<RemoteBoard<T>>,
    {
        info!("Initializing Raspberry Pi GPIO...");
        self.pi.setup(chip).context("Raspberry Pi GPIO setup failed")?;
        info!("Raspberry Pi GPIO initialized.");

        info!("Connecting to Arduino...");
        self.arduino = Some(connect().context("Arduino connection failed")?);
        info!("Arduino connected.");
        Ok(())
    }

    /// Turns both LEDs on, waits, turns both off, waits; `cycles` times.
    pub fn blink(&mut self, blink: &BlinkSettings) -> anyhow::Result<()> {
        info!(
            rasp_pin = blink.rasp_pin,
            arduino_pin = blink.arduino_pin,
            "Blinking Raspberry Pi and Arduino LEDs..."
        );
        for cycle in 1..=blink.cycles {
            info!("--- Cycle {} ---", cycle);
            self.set_both(blink, Level::High)?;
            info!("LEDs on");
            thread::sleep(blink.interval());

            self.set_both(blink, Level::Low)?;
            info!("LEDs off");
            thread::sleep(blink.interval());
        }
        Ok(())
    }

    fn set_both(&mut self, blink: &BlinkSettings, level: Level) -> anyhow::Result<()> {
        let arduino = self
            .arduino
            .as_mut()
            .ok_or_else(|| anyhow!("Arduino is not connected"))?;
        self.pi.write(blink.rasp_pin, level)?;
        arduino.digital_write(blink.arduino_pin, level)?;
        Ok(())
    }

    /// Closes the Arduino link and cleans up the Pi, each independently.
    ///
    /// Returns `true` when nothing failed. Safe to call more than once.
    pub fn teardown(&mut self) -> bool {
        info!("Cleaning up...");
        if let Some(mut arduino) = self.arduino.take() {
            let touched = arduino.close();
            info!(?touched, "Arduino connection closed.");
        }

        let report = self.pi.cleanup(CleanupScope::Claimed);
        for failure in &report.failures {
            error!(
                step = %failure.step,
                error = %failure.error,
                "Raspberry Pi cleanup step failed"
            );
        }
        info!(released = ?report.released, "Raspberry Pi GPIO cleaned up.");
        info!("All cleanup finished.");
        report.is_clean()
    }
}
