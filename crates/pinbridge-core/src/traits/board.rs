use crate::error::Result;
use crate::traits::chip::ChipControl;
use crate::traits::pwm::PwmControl;

/// Opens the handles a [`crate::Session`] needs.
pub trait Board {
    /// Chip handle type.
    type Chip: ChipControl;
    /// PWM handle type.
    type Pwm: PwmControl;

    /// Opens GPIO controller number `index`.
    fn open_chip(&mut self, index: u32) -> Result<Self::Chip>;

    /// Connects to the pulse-width generator.
    fn connect_pwm(&mut self) -> Result<Self::Pwm>;
}
