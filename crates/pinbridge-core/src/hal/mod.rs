//! Concrete backends for the capability traits.

pub mod rpi;

pub use rpi::{RpiBoard, RpiChip, RpiPwm};
