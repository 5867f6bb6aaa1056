//! Command-line front end for the bitprobe black-box fuzzing harness.
//!
//! Replays individual inputs (raw files or logged bit strings) against a
//! target outside the fuzzing engine, which is how a recorded fault is
//! reproduced and triaged.

#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]

pub mod cli;
pub mod commands;
pub mod error;

pub use error::CliError;
