//! Command-line interface and orchestration for echo-base
//!
//! This module parses the command line, loads configuration, and drives the
//! assembly of the two output documents.
//!
//! # Implementation Model
//!
//! ## Execution Flow
//!
//! The `run` function:
//!
//! 1. Parses arguments with clap and initializes logging
//! 2. Loads `echo_base.toml` (or the file given with `--config`) and applies
//!    command-line overrides
//! 3. Builds a `SwapiClient` and a `Normalizer` over it
//! 4. Selects and normalizes the uninhabited planets
//! 5. Completes the Echo Base document, one slot at a time, and derives the
//!    evacuation plan
//! 6. Saves both documents together
//!
//! Each remote lookup is awaited before the next one starts. Any failure aborts
//! the run before the output step, so the previous outputs stay as they were.

mod assemble;
mod common;
mod config;
mod host;
mod run;

pub use host::Host;
pub use run::run;
