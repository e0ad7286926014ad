//! refrain - transposition, ostinato and modulation for JSON scores
//!
//! The binary in `main.rs` parses arguments and loads configuration; the
//! commands here do the work and write JSON to any [`std::io::Write`].

pub mod commands;
pub mod io;
pub mod telemetry;
