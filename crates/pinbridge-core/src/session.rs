//! The context object that owns every local hardware handle.
//!
//! A [`Session`] holds at most one open chip handle and one PWM handle. All
//! line, servo and ranging operations go through it, so "use before setup"
//! and "setup twice" are checked in one place, and independent sessions never
//! share state.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::devices::line::LineDriver;
use crate::devices::ranger::UltrasonicRanger;
use crate::devices::servo::PulseWidthActuator;
use crate::error::{Error, Result};
use crate::level::{Edge, IntoLevel, Level};
use crate::registry::LineRegistry;
use crate::traits::board::Board;
use crate::traits::chip::ChipControl;
use crate::traits::clock::{Clock, SystemClock};
use crate::traits::pwm::PwmControl;

/// Number of lines on the Raspberry Pi header (BCM 0..=27).
pub const HEADER_LINES: u8 = 28;

/// Which lines a cleanup sweep drives low and releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CleanupScope {
    /// Only lines claimed through this session.
    #[default]
    Claimed,
    /// Every header line, whether or not this session touched it.
    AllLines,
}

/// The cleanup step a failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupStep {
    /// Driving a line low and releasing it.
    Line(u8),
    /// Closing the chip handle.
    CloseChip,
    /// Disconnecting from the PWM generator.
    DisconnectPwm,
}

impl fmt::Display for CleanupStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupStep::Line(pin) => write!(f, "release line {pin}"),
            CleanupStep::CloseChip => f.write_str("close chip"),
            CleanupStep::DisconnectPwm => f.write_str("disconnect pwm"),
        }
    }
}

/// One step that failed during cleanup.
#[derive(Debug)]
pub struct CleanupFailure {
    /// Where it failed.
    pub step: CleanupStep,
    /// Why.
    pub error: Error,
}

/// Outcome of [`Session::cleanup`].
#[derive(Debug, Default)]
pub struct CleanupReport {
    /// Lines that were driven low and released.
    pub released: Vec<u8>,
    /// Steps that failed; the sweep carried on past each of them.
    pub failures: Vec<CleanupFailure>,
}

impl CleanupReport {
    /// `true` when every step succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, step: CleanupStep, result: Result<()>) {
        if let Err(error) = result {
            debug!(%step, %error, "cleanup step failed");
            self.failures.push(CleanupFailure { step, error });
        }
    }
}

/// Local GPIO and PWM handles plus the lines touched through them.
pub struct Session<B: Board, K: Clock = SystemClock> {
    board: B,
    clock: K,
    chip: Option<B::Chip>,
    pwm: Option<B::Pwm>,
    registry: LineRegistry,
}

impl<B: Board> Session<B> {
    /// Creates a closed session using the system clock.
    pub fn new(board: B) -> Self {
        Self::with_clock(board, SystemClock::new())
    }
}

impl<B: Board, K: Clock> Session<B, K> {
    /// Creates a closed session using `clock` for ranging.
    pub fn with_clock(board: B, clock: K) -> Self {
        Self {
            board,
            clock,
            chip: None,
            pwm: None,
            registry: LineRegistry::new(),
        }
    }

    /// Opens GPIO controller `chip_index` and connects to the PWM generator.
    ///
    /// # Errors
    ///
    /// [`Error::Resource`] when the chip is already open. Backend failures
    /// propagate unchanged; if the PWM connection fails the chip stays open
    /// and [`Session::cleanup`] still closes it.
    pub fn setup(&mut self, chip_index: u32) -> Result<()> {
        if self.chip.is_some() {
            return Err(Error::resource("GPIO chip is already open"));
        }
        self.chip = Some(self.board.open_chip(chip_index)?);
        info!(chip = chip_index, "GPIO chip opened");

        if self.pwm.is_none() {
            self.pwm = Some(self.board.connect_pwm()?);
            info!("PWM generator connected");
        }
        Ok(())
    }

    /// `true` while the chip handle is open.
    pub fn is_open(&self) -> bool {
        self.chip.is_some()
    }

    /// Lines claimed since setup.
    pub fn claimed_lines(&self) -> &LineRegistry {
        &self.registry
    }

    /// Borrows a line driver over the open chip.
    pub fn lines(&mut self) -> Result<LineDriver<'_, B::Chip>> {
        let chip = self
            .chip
            .as_mut()
            .ok_or_else(|| Error::resource("GPIO chip is not open; call setup() first"))?;
        Ok(LineDriver::new(chip, &mut self.registry))
    }

    /// Borrows a servo driver over the open PWM handle.
    pub fn servos(&mut self) -> Result<PulseWidthActuator<'_, B::Pwm>> {
        let pwm = self
            .pwm
            .as_mut()
            .ok_or_else(|| Error::resource("PWM generator is not connected; call setup() first"))?;
        Ok(PulseWidthActuator::new(pwm))
    }

    /// See [`LineDriver::read`].
    pub fn read(&mut self, pin: u8) -> Result<Level> {
        self.lines()?.read(pin)
    }

    /// See [`LineDriver::write`].
    pub fn write(&mut self, pin: u8, value: impl IntoLevel) -> Result<()> {
        self.lines()?.write(pin, value)
    }

    /// See [`LineDriver::free`].
    pub fn free(&mut self, pin: u8) -> Result<()> {
        self.lines()?.free(pin)
    }

    /// See [`LineDriver::watch_edge`].
    pub fn watch_edge(&mut self, pin: u8, mode: &str) -> Result<Option<Edge>> {
        self.lines()?.watch_edge(pin, mode)
    }

    /// See [`PulseWidthActuator::set_angle`].
    pub fn set_angle(&mut self, pin: u8, angle: f64) -> Result<u32> {
        self.servos()?.set_angle(pin, angle)
    }

    /// See [`PulseWidthActuator::stop`].
    pub fn stop_servo(&mut self, pin: u8) -> Result<()> {
        self.servos()?.stop(pin)
    }

    /// Pings the sensor on `trig`/`echo` once.
    ///
    /// Returns the distance in centimetres, or [`crate::NO_ECHO`] when no echo
    /// was timed within `timeout`.
    pub fn measure_distance_cm(&mut self, trig: u8, echo: u8, timeout: Duration) -> Result<f64> {
        let chip = self
            .chip
            .as_mut()
            .ok_or_else(|| Error::resource("GPIO chip is not open; call setup() first"))?;
        let mut lines = LineDriver::new(chip, &mut self.registry);
        UltrasonicRanger::new(trig, echo)
            .with_timeout(timeout)
            .measure_cm(&mut lines, &self.clock)
    }

    /// Drives lines low, releases them and closes both handles.
    ///
    /// Every step is attempted even when earlier ones fail; failures are
    /// collected in the report and summarized in one warning. Cleaning a
    /// closed session is a no-op.
    pub fn cleanup(&mut self, scope: CleanupScope) -> CleanupReport {
        let mut report = CleanupReport::default();

        if let Some(mut chip) = self.chip.take() {
            let pins: Vec<u8> = match scope {
                CleanupScope::Claimed => self.registry.pins().collect(),
                CleanupScope::AllLines => (0..HEADER_LINES).collect(),
            };
            for pin in pins {
                match release_line(&mut chip, pin) {
                    Ok(()) => report.released.push(pin),
                    Err(error) => report.record(CleanupStep::Line(pin), Err(error)),
                }
            }
            self.registry.clear();
            report.record(CleanupStep::CloseChip, chip.close());
            info!(released = report.released.len(), "GPIO chip closed");
        }

        if let Some(mut pwm) = self.pwm.take() {
            report.record(CleanupStep::DisconnectPwm, pwm.disconnect());
            info!("PWM generator disconnected");
        }

        if !report.is_clean() {
            let failed: Vec<String> = report.failures.iter().map(|f| f.step.to_string()).collect();
            warn!(count = failed.len(), ?failed, "cleanup finished with failures");
        }
        report
    }
}

impl<B: Board, K: Clock> Drop for Session<B, K> {
    fn drop(&mut self) {
        if self.chip.is_some() || self.pwm.is_some() {
            debug!("session dropped while open, cleaning up");
            self.cleanup(CleanupScope::Claimed);
        }
    }
}

fn release_line<C: ChipControl>(chip: &mut C, pin: u8) -> Result<()> {
    chip.claim_output(pin)?;
    chip.write(pin, Level::Low)?;
    chip.free(pin)
}
