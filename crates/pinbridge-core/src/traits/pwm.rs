use crate::error::Result;

/// A connection to a pulse-width generator (a PWM daemon or driver).
pub trait PwmControl {
    /// Drives a repeating pulse of `micros` microseconds on `pin`.
    ///
    /// A width of `0` switches the output off.
    fn set_pulse_width(&mut self, pin: u8, micros: u32) -> Result<()>;

    /// Stops every output and drops the connection.
    fn disconnect(&mut self) -> Result<()>;
}
