use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::pwm::PwmControl;

/// Pulse width commanded at 0°, in microseconds.
pub const MIN_PULSE_US: u32 = 500;
/// Pulse width commanded at 180°, in microseconds.
pub const MAX_PULSE_US: u32 = 2500;
/// Largest accepted servo angle in degrees.
pub const MAX_ANGLE: f64 = 180.0;

/// Maps a servo angle to a pulse width.
///
/// The mapping is linear, `500 + angle / 180 * 2000`, truncated to whole
/// microseconds: 500 µs at 0°, 1500 µs at 90° and 2500 µs at 180°.
///
/// # Errors
///
/// [`Error::InvalidArgument`] when `angle` is outside `0..=180` or is NaN.
pub fn pulse_width_for_angle(angle: f64) -> Result<u32> {
    let angle = check_angle(angle)?;
    let span = f64::from(MAX_PULSE_US - MIN_PULSE_US);
    Ok(MIN_PULSE_US + (angle / MAX_ANGLE * span) as u32)
}

/// Accepts angles in `0..=180` degrees, rejecting everything else (NaN included).
///
/// `-0.0` comes back as `0.0`.
pub fn check_angle(angle: f64) -> Result<f64> {
    if (0.0..=MAX_ANGLE).contains(&angle) {
        // -0.0 + 0.0 is +0.0
        Ok(angle + 0.0)
    } else {
        Err(Error::invalid(format!(
            "servo angle must be between 0 and 180 degrees, got {angle}"
        )))
    }
}

/// Drives hobby servos through a [`PwmControl`] handle.
pub struct PulseWidthActuator<'a, P: PwmControl> {
    pwm: &'a mut P,
}

impl<'a, P: PwmControl> PulseWidthActuator<'a, P> {
    /// Wraps an open PWM handle.
    pub fn new(pwm: &'a mut P) -> Self {
        Self { pwm }
    }

    /// Holds `pin` at `angle` degrees until changed or stopped.
    ///
    /// Returns the pulse width that was commanded. An out-of-range angle
    /// issues no command.
    pub fn set_angle(&mut self, pin: u8, angle: f64) -> Result<u32> {
        let width = pulse_width_for_angle(angle)?;
        self.pwm.set_pulse_width(pin, width)?;
        debug!(pin, angle, width, "servo pulse width set");
        Ok(width)
    }

    /// Switches the pulse train on `pin` off.
    pub fn stop(&mut self, pin: u8) -> Result<()> {
        self.pwm.set_pulse_width(pin, 0)?;
        debug!(pin, "servo stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockBoard;

    #[test]
    fn test_pulse_width_endpoints() {
        assert_eq!(pulse_width_for_angle(0.0).unwrap(), 500);
        assert_eq!(pulse_width_for_angle(90.0).unwrap(), 1500);
        assert_eq!(pulse_width_for_angle(180.0).unwrap(), 2500);
    }

    #[test]
    fn test_pulse_width_is_linear_across_range() {
        for degrees in 0..=180u32 {
            let angle = f64::from(degrees);
            let expected = (500.0 + angle * 2000.0 / 180.0) as u32;
            let width = pulse_width_for_angle(angle).unwrap();
            // Truncation may land one microsecond apart on either side.
            assert!(width.abs_diff(expected) <= 1, "angle {angle}: {width} vs {expected}");
            assert!((MIN_PULSE_US..=MAX_PULSE_US).contains(&width));
        }
        // 45° = 500 + 500
        assert_eq!(pulse_width_for_angle(45.0).unwrap(), 1000);
    }

    #[test]
    fn test_pulse_width_rejects_out_of_range() {
        for angle in [-0.1, 180.5, -90.0, 360.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                pulse_width_for_angle(angle),
                Err(Error::InvalidArgument(_))
            ));
        }
    }

    #[test]
    fn test_negative_zero_angle_is_folded() {
        let angle = check_angle(-0.0).unwrap();
        assert!(angle.is_sign_positive());
        assert_eq!(angle.to_string(), "0");
        assert_eq!(pulse_width_for_angle(-0.0).unwrap(), 500);
    }

    #[test]
    fn test_set_angle_commands_width() {
        let board = MockBoard::new();
        let mut pwm = board.pwm_handle();
        let mut servos = PulseWidthActuator::new(&mut pwm);

        assert_eq!(servos.set_angle(18, 90.0).unwrap(), 1500);
        servos.stop(18).unwrap();
        assert_eq!(board.pwm.borrow().widths, vec![(18, 1500), (18, 0)]);
    }

    #[test]
    fn test_invalid_angle_issues_no_command() {
        let board = MockBoard::new();
        let mut pwm = board.pwm_handle();
        let mut servos = PulseWidthActuator::new(&mut pwm);

        assert!(matches!(
            servos.set_angle(18, 181.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            servos.set_angle(18, -1.0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(board.pwm.borrow().widths.is_empty());
    }
}
