use tracing::debug;

use crate::error::Result;
use crate::level::{Edge, IntoLevel, Level};
use crate::registry::LineRegistry;
use crate::traits::chip::ChipControl;

/// Claim-and-drive / claim-and-sense operations on single digital lines.
///
/// Every line the driver touches is recorded in the borrowed
/// [`LineRegistry`], so a later cleanup knows which lines to release.
pub struct LineDriver<'a, C: ChipControl> {
    chip: &'a mut C,
    registry: &'a mut LineRegistry,
}

impl<'a, C: ChipControl> LineDriver<'a, C> {
    /// Wraps an open chip handle and the registry of its session.
    pub fn new(chip: &'a mut C, registry: &'a mut LineRegistry) -> Self {
        Self { chip, registry }
    }

    /// Configures `pin` as an input and samples it.
    pub fn read(&mut self, pin: u8) -> Result<Level> {
        self.claim_input(pin)?;
        self.sample(pin)
    }

    /// Configures `pin` as an output and drives `value` onto it.
    ///
    /// `value` is validated before the line is claimed.
    pub fn write(&mut self, pin: u8, value: impl IntoLevel) -> Result<()> {
        let level = value.into_level()?;
        self.claim_output(pin)?;
        self.drive(pin, level)
    }

    /// Releases `pin` and forgets it.
    pub fn free(&mut self, pin: u8) -> Result<()> {
        self.chip.free(pin)?;
        self.registry.unmark(pin);
        debug!(pin, "line freed");
        Ok(())
    }

    /// Arms edge detection on `pin`.
    ///
    /// Returns the armed edge, or `None` when `mode` is not one of the
    /// recognized modes, in which case nothing is claimed or recorded.
    pub fn watch_edge(&mut self, pin: u8, mode: &str) -> Result<Option<Edge>> {
        let Some(edge) = Edge::from_mode(mode) else {
            debug!(pin, mode, "ignoring unknown edge mode");
            return Ok(None);
        };
        self.chip.claim_alert(pin, edge)?;
        self.registry.mark(pin);
        debug!(pin, ?edge, "edge watch armed");
        Ok(Some(edge))
    }

    /// Claims `pin` as an input without sampling it.
    pub fn claim_input(&mut self, pin: u8) -> Result<()> {
        self.chip.claim_input(pin)?;
        self.registry.mark(pin);
        Ok(())
    }

    /// Claims `pin` as an output without driving it.
    pub fn claim_output(&mut self, pin: u8) -> Result<()> {
        self.chip.claim_output(pin)?;
        self.registry.mark(pin);
        Ok(())
    }

    /// Samples an already-claimed input.
    pub fn sample(&mut self, pin: u8) -> Result<Level> {
        self.chip.read(pin)
    }

    /// Drives an already-claimed output.
    pub fn drive(&mut self, pin: u8, level: Level) -> Result<()> {
        self.chip.write(pin, level)
    }
}
