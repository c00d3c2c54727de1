//! Raspberry Pi backend built on `rppal`.
//!
//! `rppal` talks to the header's GPIO controller directly, so the chip index
//! passed to [`Board::open_chip`] must be `0`. Servo pulses are produced with
//! `rppal`'s software PWM at a 50 Hz period on any header line. A line
//! cannot be claimed by the chip and driven by PWM at the same time.

use std::collections::HashMap;
use std::time::Duration;

use rppal::gpio::{Gpio, InputPin, OutputPin, Trigger};
use tracing::debug;

use crate::error::{Error, Result};
use crate::level::{Edge, Level};
use crate::traits::board::Board;
use crate::traits::chip::ChipControl;
use crate::traits::pwm::PwmControl;

/// Servo refresh period.
pub const SERVO_PERIOD: Duration = Duration::from_millis(20);

/// Opens `rppal` handles.
#[derive(Debug, Default, Clone, Copy)]
pub struct RpiBoard;

impl RpiBoard {
    /// Creates the board.
    pub fn new() -> Self {
        RpiBoard
    }
}

impl Board for RpiBoard {
    type Chip = RpiChip;
    type Pwm = RpiPwm;

    fn open_chip(&mut self, index: u32) -> Result<RpiChip> {
        if index != 0 {
            return Err(Error::InvalidArgument(format!(
                "rppal drives the header controller only; chip index must be 0, got {index}"
            )));
        }
        let gpio = Gpio::new().map_err(Error::transport)?;
        Ok(RpiChip {
            gpio,
            lines: HashMap::new(),
        })
    }

    fn connect_pwm(&mut self) -> Result<RpiPwm> {
        let gpio = Gpio::new().map_err(Error::transport)?;
        Ok(RpiPwm {
            gpio,
            outputs: HashMap::new(),
        })
    }
}

enum Line {
    Input(InputPin),
    Output(OutputPin),
}

/// Header GPIO controller.
pub struct RpiChip {
    gpio: Gpio,
    lines: HashMap<u8, Line>,
}

impl RpiChip {
    fn input(&mut self, pin: u8) -> Result<&mut InputPin> {
        if !matches!(self.lines.get(&pin), Some(Line::Input(_))) {
            // Drop any output first so rppal hands the pin out again.
            self.lines.remove(&pin);
            let input = self.gpio.get(pin).map_err(Error::transport)?.into_input();
            self.lines.insert(pin, Line::Input(input));
        }
        match self.lines.get_mut(&pin) {
            Some(Line::Input(input)) => Ok(input),
            _ => Err(Error::transport(format!("line {pin} could not be claimed as input"))),
        }
    }
}

impl ChipControl for RpiChip {
    fn claim_input(&mut self, pin: u8) -> Result<()> {
        self.input(pin).map(|_| ())
    }

    fn claim_output(&mut self, pin: u8) -> Result<()> {
        if !matches!(self.lines.get(&pin), Some(Line::Output(_))) {
            self.lines.remove(&pin);
            let output = self.gpio.get(pin).map_err(Error::transport)?.into_output();
            self.lines.insert(pin, Line::Output(output));
        }
        Ok(())
    }

    fn read(&mut self, pin: u8) -> Result<Level> {
        match self.lines.get(&pin) {
            Some(Line::Input(input)) => Ok(Level::from(input.is_high())),
            Some(Line::Output(output)) => Ok(Level::from(output.is_set_high())),
            None => Err(Error::transport(format!("line {pin} is not claimed"))),
        }
    }

    fn write(&mut self, pin: u8, level: Level) -> Result<()> {
        match self.lines.get_mut(&pin) {
            Some(Line::Output(output)) => {
                match level {
                    Level::High => output.set_high(),
                    Level::Low => output.set_low(),
                }
                Ok(())
            }
            Some(Line::Input(_)) => {
                Err(Error::transport(format!("line {pin} is claimed as input")))
            }
            None => Err(Error::transport(format!("line {pin} is not claimed"))),
        }
    }

    fn free(&mut self, pin: u8) -> Result<()> {
        // Dropping the pin restores its original mode.
        self.lines.remove(&pin);
        Ok(())
    }

    fn claim_alert(&mut self, pin: u8, edge: Edge) -> Result<()> {
        let trigger = match edge {
            Edge::Rising => Trigger::RisingEdge,
            Edge::Falling => Trigger::FallingEdge,
            Edge::Both => Trigger::Both,
        };
        self.input(pin)?
            .set_interrupt(trigger, None)
            .map_err(Error::transport)?;
        debug!(pin, ?edge, "interrupt armed");
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        self.lines.clear();
        Ok(())
    }
}

/// Software PWM on header lines.
pub struct RpiPwm {
    gpio: Gpio,
    outputs: HashMap<u8, OutputPin>,
}

impl PwmControl for RpiPwm {
    fn set_pulse_width(&mut self, pin: u8, micros: u32) -> Result<()> {
        if micros == 0 {
            if let Some(mut output) = self.outputs.remove(&pin) {
                output.clear_pwm().map_err(Error::transport)?;
            }
            return Ok(());
        }
        if !self.outputs.contains_key(&pin) {
            let output = self.gpio.get(pin).map_err(Error::transport)?.into_output_low();
            self.outputs.insert(pin, output);
        }
        if let Some(output) = self.outputs.get_mut(&pin) {
            output
                .set_pwm(SERVO_PERIOD, Duration::from_micros(u64::from(micros)))
                .map_err(Error::transport)?;
        }
        Ok(())
    }

    fn disconnect(&mut self) -> Result<()> {
        let mut first_error = None;
        for (_, mut output) in self.outputs.drain() {
            if let Err(err) = output.clear_pwm() {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(Error::transport(err)),
            None => Ok(()),
        }
    }
}
