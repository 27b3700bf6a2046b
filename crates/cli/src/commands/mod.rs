//! CLI command implementations.

pub mod emulator;
