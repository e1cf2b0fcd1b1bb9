//! relay-cli: process wiring shared by the daemon and Lambda binaries.

pub mod telemetry;
pub mod wiring;
