//! Wire commands understood by the Arduino sketch.
//!
//! Each command is a single line, `VERB ARG1 [ARG2]`, terminated by `\n`.

use core::fmt;

use pinbridge_core::Level;

/// Arduino `pinMode()` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinMode {
    /// `INPUT`
    Input,
    /// `OUTPUT`
    Output,
    /// `INPUT_PULLUP`
    InputPullup,
}

impl PinMode {
    /// Wire token.
    pub const fn token(self) -> &'static str {
        match self {
            PinMode::Input => "INPUT",
            PinMode::Output => "OUTPUT",
            PinMode::InputPullup => "INPUT_PULLUP",
        }
    }
}

impl fmt::Display for PinMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// One command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// `PINMODE p m`
    PinMode {
        /// Arduino pin.
        pin: u8,
        /// Direction.
        mode: PinMode,
    },
    /// `DWRITE p HIGH|LOW`
    DigitalWrite {
        /// Arduino pin.
        pin: u8,
        /// Level to drive.
        level: Level,
    },
    /// `DREAD p`, answered with one line.
    DigitalRead {
        /// Arduino pin.
        pin: u8,
    },
    /// `AWRITE p v`
    AnalogWrite {
        /// Arduino pin.
        pin: u8,
        /// Duty value passed to `analogWrite()`.
        value: u16,
    },
    /// `AREAD p`, answered with one line.
    AnalogRead {
        /// Arduino pin.
        pin: u8,
    },
    /// `SERVOWRITE p a`
    ServoWrite {
        /// Arduino pin.
        pin: u8,
        /// Angle in degrees.
        angle: f64,
    },
    /// `SERVOSTOP p`
    ServoStop {
        /// Arduino pin.
        pin: u8,
    },
}

impl Command {
    /// Pin the command addresses.
    pub fn pin(&self) -> u8 {
        match *self {
            Command::PinMode { pin, .. }
            | Command::DigitalWrite { pin, .. }
            | Command::DigitalRead { pin }
            | Command::AnalogWrite { pin, .. }
            | Command::AnalogRead { pin }
            | Command::ServoWrite { pin, .. }
            | Command::ServoStop { pin } => pin,
        }
    }

    /// `true` for commands the sketch answers with a reply line.
    pub fn expects_reply(&self) -> bool {
        matches!(self, Command::DigitalRead { .. } | Command::AnalogRead { .. })
    }

    /// The full wire line, newline included.
    pub fn encode(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::PinMode { pin, mode } => write!(f, "PINMODE {pin} {mode}"),
            Command::DigitalWrite { pin, level } => write!(f, "DWRITE {pin} {level}"),
            Command::DigitalRead { pin } => write!(f, "DREAD {pin}"),
            Command::AnalogWrite { pin, value } => write!(f, "AWRITE {pin} {value}"),
            Command::AnalogRead { pin } => write!(f, "AREAD {pin}"),
            Command::ServoWrite { pin, angle } => write!(f, "SERVOWRITE {pin} {angle}"),
            Command::ServoStop { pin } => write!(f, "SERVOSTOP {pin}"),
        }
    }
}
