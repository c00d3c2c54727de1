//! Capabilities the drivers consume. Backends implement these; the drivers
//! and [`crate::Session`] only ever talk to the traits.

pub mod board;
pub mod chip;
pub mod clock;
pub mod pwm;
