//! Lockstep blink demo shared by the `pinbridge` and `blink_loop` binaries.

pub mod config;
pub mod demo;
pub mod logging;
