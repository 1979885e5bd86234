//! Secd - A bytecode machine for a small functional language
//!
//! This crate re-exports all layers of the system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: secd_runtime    — Bytecode loader, CLI
//! Layer 1: secd_machine    — Instruction set, dump discipline, dispatch loop
//! Layer 0: secd_foundation — Core types (Value, Heap, Error)
//! ```

pub use secd_foundation as foundation;
pub use secd_machine as machine;
pub use secd_runtime as runtime;
