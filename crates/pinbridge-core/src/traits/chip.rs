use crate::error::Result;
use crate::level::{Edge, Level};

/// An open connection to a GPIO controller.
///
/// Mirrors a chip-control library: a line must be claimed in a direction
/// before it is read or written. Claiming an already-claimed line re-asserts
/// its direction and does not fail.
pub trait ChipControl {
    /// Configures `pin` as an input.
    fn claim_input(&mut self, pin: u8) -> Result<()>;

    /// Configures `pin` as an output.
    fn claim_output(&mut self, pin: u8) -> Result<()>;

    /// Samples the current level of `pin`.
    fn read(&mut self, pin: u8) -> Result<Level>;

    /// Drives `pin` to `level`. The line must be claimed as an output.
    fn write(&mut self, pin: u8, level: Level) -> Result<()>;

    /// Releases `pin` back to an unclaimed state.
    fn free(&mut self, pin: u8) -> Result<()>;

    /// Claims `pin` as an input and arms edge detection for `edge`.
    fn claim_alert(&mut self, pin: u8, edge: Edge) -> Result<()>;

    /// Releases every line and closes the controller.
    fn close(&mut self) -> Result<()>;
}
