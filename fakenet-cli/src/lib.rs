//! Support library for the `fakenet` binary.
//!
//! Exposes the command layer and logging setup so tests can drive commands
//! without spawning a subprocess.

pub mod cli;
pub mod logging;
