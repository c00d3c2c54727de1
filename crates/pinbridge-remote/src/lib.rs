#![warn(missing_docs)]
//! Arduino line proxy.
//!
//! Mirrors the local line and servo operations of `pinbridge-core`, but
//! carries them out by writing one ASCII command line per operation to a
//! sketch listening on a serial port. Queries read back one reply line. There
//! is no acknowledgement, checksum or retry; a reply that never arrives
//! surfaces as a read failure of the link itself.

pub mod command;
pub mod proxy;
pub mod serial;

pub use command::{Command, PinMode};
pub use proxy::RemoteBoard;
pub use serial::{SerialLink, SerialSettings, connect};
