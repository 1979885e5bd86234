//! Bytecode loader and process-level entry points for the SECD machine.
//!
//! This crate provides:
//! - [`read_words`] / [`load_file`] / [`load_stdin`] - The textual bytecode format
//! - [`run_words`] - Load-and-execute convenience
//!
//! The `secd` binary wires these to the command line.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod loader;

pub use loader::{load_file, load_stdin, read_words};

use secd_foundation::{Result, Value};
use secd_machine::{Machine, MachineConfig};

/// Loads `words` into a fresh machine and runs it to completion.
pub fn run_words(words: Vec<i64>, config: &MachineConfig) -> Result<Value> {
    let mut machine = Machine::load(words, config)?;
    machine.run()
}
