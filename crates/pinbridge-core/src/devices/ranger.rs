//! HC-SR04 style ultrasonic ranging by busy-polling the echo line.
//!
//! The echo window is tens of microseconds to tens of milliseconds, below
//! what scheduler-driven interrupts resolve reliably, so the echo line is
//! polled in a tight loop bounded by a deadline.

use std::time::Duration;

use tracing::debug;

use crate::devices::line::LineDriver;
use crate::error::Result;
use crate::level::Level;
use crate::traits::chip::ChipControl;
use crate::traits::clock::Clock;

/// Value returned by [`UltrasonicRanger::measure_cm`] when no echo was timed.
pub const NO_ECHO: f64 = -1.0;

/// Speed of sound in centimetres per second.
pub const SPEED_OF_SOUND_CM_S: f64 = 34_300.0;

/// Settle time with the trigger held low before the ping.
pub const TRIGGER_SETTLE: Duration = Duration::from_micros(2);

/// Length of the trigger pulse.
pub const TRIGGER_PULSE: Duration = Duration::from_micros(10);

/// Default bound on a whole measurement.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(100);

/// Converts an echo pulse width into a one-way distance in centimetres.
pub fn distance_cm(echo: Duration) -> f64 {
    echo.as_secs_f64() * SPEED_OF_SOUND_CM_S / 2.0
}

/// A trigger/echo sensor pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UltrasonicRanger {
    /// Line that sends the ping.
    pub trig: u8,
    /// Line that reports the echo.
    pub echo: u8,
    /// Bound on the whole measurement, starting after the trigger pulse.
    pub timeout: Duration,
}

impl UltrasonicRanger {
    /// Sensor on `trig`/`echo` with the default 100 ms timeout.
    pub const fn new(trig: u8, echo: u8) -> Self {
        Self {
            trig,
            echo,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Replaces the measurement timeout.
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Pings once and times the echo pulse.
    ///
    /// Both polling phases (waiting for the echo to rise, then for it to
    /// fall) are bounded by one deadline taken right after the trigger pulse.
    /// The fall phase therefore only gets whatever is left of `timeout` once
    /// the rising edge shows up.
    ///
    /// Returns `None` when either phase overruns the deadline. A timeout too
    /// large to add to the clock, such as `Duration::MAX`, never expires.
    pub fn measure_echo<C, K>(
        &self,
        lines: &mut LineDriver<'_, C>,
        clock: &K,
    ) -> Result<Option<Duration>>
    where
        C: ChipControl,
        K: Clock,
    {
        lines.claim_output(self.trig)?;
        lines.claim_input(self.echo)?;

        lines.drive(self.trig, Level::Low)?;
        clock.delay(TRIGGER_SETTLE);
        lines.drive(self.trig, Level::High)?;
        clock.delay(TRIGGER_PULSE);
        lines.drive(self.trig, Level::Low)?;

        let deadline = clock.now().saturating_add(self.timeout);

        while lines.sample(self.echo)? == Level::Low {
            if clock.now() > deadline {
                debug!(trig = self.trig, echo = self.echo, "no echo before deadline");
                return Ok(None);
            }
        }
        let pulse_start = clock.now();

        while lines.sample(self.echo)? == Level::High {
            if clock.now() > deadline {
                debug!(trig = self.trig, echo = self.echo, "echo did not return before deadline");
                return Ok(None);
            }
        }
        let pulse_end = clock.now();

        Ok(Some(pulse_end - pulse_start))
    }

    /// Pings once and returns the distance in centimetres, or [`NO_ECHO`].
    pub fn measure_cm<C, K>(&self, lines: &mut LineDriver<'_, C>, clock: &K) -> Result<f64>
    where
        C: ChipControl,
        K: Clock,
    {
        Ok(self.measure_echo(lines, clock)?.map_or(NO_ECHO, distance_cm))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{EchoPlan, MockBoard};
    use crate::registry::LineRegistry;

    const EPSILON: f64 = 1e-9;
    const TRIG: u8 = 23;
    const ECHO: u8 = 24;

    // Mock time after the trigger sequence: 2 µs settle + 10 µs pulse.
    const T0: Duration = Duration::from_micros(12);

    fn board_with_echo(rise: Option<Duration>, fall: Option<Duration>) -> MockBoard {
        let board = MockBoard::new();
        board.chip.borrow_mut().echo = Some(EchoPlan {
            pin: ECHO,
            rise,
            fall,
        });
        board
    }

    #[test]
    fn test_distance_conversion() {
        assert!((distance_cm(Duration::from_micros(500)) - 8.575).abs() < EPSILON);
        assert!((distance_cm(Duration::from_millis(1)) - 17.15).abs() < EPSILON);
        assert!(distance_cm(Duration::ZERO).abs() < EPSILON);
    }

    #[test]
    fn test_measure_times_echo_pulse() {
        let rise = T0 + Duration::from_micros(300);
        let fall = rise + Duration::from_micros(500);
        let board = board_with_echo(Some(rise), Some(fall));
        let mut chip = board.chip();
        let mut registry = LineRegistry::new();
        let mut lines = LineDriver::new(&mut chip, &mut registry);

        let ranger = UltrasonicRanger::new(TRIG, ECHO).with_timeout(Duration::from_millis(10));
        let cm = ranger.measure_cm(&mut lines, &board.clock).unwrap();

        assert!((cm - 8.575).abs() < EPSILON, "got {cm}");
        assert_eq!(registry.pins().collect::<Vec<_>>(), vec![TRIG, ECHO]);
    }

    #[test]
    fn test_trigger_sequence() {
        let board = board_with_echo(Some(T0), Some(T0 + Duration::from_micros(100)));
        let mut chip = board.chip();
        let mut registry = LineRegistry::new();
        let mut lines = LineDriver::new(&mut chip, &mut registry);

        UltrasonicRanger::new(TRIG, ECHO)
            .measure_echo(&mut lines, &board.clock)
            .unwrap();

        assert_eq!(
            board.chip.borrow().writes,
            vec![(TRIG, Level::Low), (TRIG, Level::High), (TRIG, Level::Low)]
        );
        assert_eq!(*board.clock.delays.borrow(), vec![TRIGGER_SETTLE, TRIGGER_PULSE]);
    }

    #[test]
    fn test_no_rising_edge_returns_sentinel() {
        let board = board_with_echo(None, None);
        let mut chip = board.chip();
        let mut registry = LineRegistry::new();
        let mut lines = LineDriver::new(&mut chip, &mut registry);

        let ranger = UltrasonicRanger::new(TRIG, ECHO).with_timeout(Duration::from_millis(1));
        let cm = ranger.measure_cm(&mut lines, &board.clock).unwrap();

        assert_eq!(cm, NO_ECHO);
        // One sample per microsecond from T0 until the clock passes T0 + 1 ms.
        assert_eq!(board.chip.borrow().echo_reads, 1001);
    }

    #[test]
    fn test_echo_that_never_falls_returns_sentinel() {
        let board = board_with_echo(Some(T0 + Duration::from_micros(50)), None);
        let mut chip = board.chip();
        let mut registry = LineRegistry::new();
        let mut lines = LineDriver::new(&mut chip, &mut registry);

        let ranger = UltrasonicRanger::new(TRIG, ECHO).with_timeout(Duration::from_millis(2));
        assert_eq!(ranger.measure_echo(&mut lines, &board.clock).unwrap(), None);
    }

    #[test]
    fn test_fall_phase_shares_the_trigger_deadline() {
        // The echo is 500 µs long, but it rises 900 µs into a 1 ms budget.
        // A per-phase timeout would accept it; the shared deadline does not.
        let rise = T0 + Duration::from_micros(900);
        let fall = rise + Duration::from_micros(500);
        let board = board_with_echo(Some(rise), Some(fall));
        let mut chip = board.chip();
        let mut registry = LineRegistry::new();
        let mut lines = LineDriver::new(&mut chip, &mut registry);

        let ranger = UltrasonicRanger::new(TRIG, ECHO).with_timeout(Duration::from_millis(1));
        assert_eq!(ranger.measure_cm(&mut lines, &board.clock).unwrap(), NO_ECHO);
    }

    #[test]
    fn test_unbounded_timeout_still_measures() {
        let rise = T0 + Duration::from_micros(8);
        let fall = rise + Duration::from_micros(500);
        let board = board_with_echo(Some(rise), Some(fall));
        let mut chip = board.chip();
        let mut registry = LineRegistry::new();
        let mut lines = LineDriver::new(&mut chip, &mut registry);

        let ranger = UltrasonicRanger::new(TRIG, ECHO).with_timeout(Duration::MAX);
        let cm = ranger.measure_cm(&mut lines, &board.clock).unwrap();

        assert!((cm - 8.575).abs() < EPSILON, "got {cm}");
    }

    #[test]
    fn test_default_timeout() {
        let ranger = UltrasonicRanger::new(TRIG, ECHO);
        assert_eq!(ranger.timeout, Duration::from_millis(100));
    }
}
