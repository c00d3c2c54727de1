#![warn(missing_docs)]
#![doc = "Raspberry Pi hardware shims: digital lines, servo pulse widths and ultrasonic ranging."]
#![doc = ""]
#![doc = "Every operation runs against an explicit [`Session`] that owns the GPIO chip handle,"]
#![doc = "the PWM handle and the set of lines touched since setup. The hardware itself sits"]
#![doc = "behind the [`Board`], [`ChipControl`] and [`PwmControl`] traits; the `rpi` feature"]
#![doc = "provides an implementation on top of `rppal`."]

pub mod devices;
pub mod error;
pub mod level;
pub mod registry;
pub mod session;
pub mod traits;

#[cfg(feature = "rpi")]
pub mod hal;

#[cfg(test)]
pub(crate) mod mock;

pub use devices::line::LineDriver;
pub use devices::ranger::{NO_ECHO, UltrasonicRanger, distance_cm};
pub use devices::servo::{PulseWidthActuator, check_angle, pulse_width_for_angle};
pub use error::{Error, Result};
pub use level::{Edge, IntoLevel, Level};
pub use registry::LineRegistry;
pub use session::{CleanupFailure, CleanupReport, CleanupScope, CleanupStep, Session};
pub use traits::board::Board;
pub use traits::chip::ChipControl;
pub use traits::clock::{Clock, SystemClock};
pub use traits::pwm::PwmControl;
