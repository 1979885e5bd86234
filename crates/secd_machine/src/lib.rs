//! Instruction set, dump discipline, and dispatch loop for the SECD machine.
//!
//! This crate provides:
//! - [`Opcode`] - The twelve instructions and their wire encoding
//! - [`CodeSegment`] / [`CodeBuilder`] - The bounds-checked code array
//! - [`Dump`] / [`Frame`] - The control stack of saved continuations
//! - [`MachineConfig`] - Segment capacities and the trace switch
//! - [`Machine`] - The fetch-decode-execute loop

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod dump;
mod machine;
mod opcode;

pub use config::MachineConfig;
pub use dump::{Dump, Frame};
pub use machine::Machine;
pub use opcode::{CodeBuilder, CodeSegment, Opcode};
