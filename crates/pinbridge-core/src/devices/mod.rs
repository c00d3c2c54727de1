//! Drivers built on the capability traits.

pub mod line;
pub mod ranger;
pub mod servo;
