//! Bytecode instruction set for the SECD machine.
//!
//! Bytecode is a linear sequence of `i64` words: each instruction is one
//! opcode word followed by zero, one, or two operand words read inline
//! from the code stream. The explicit discriminants are the wire encoding
//! consumed by the loader.

use std::fmt;

use secd_foundation::{Error, Result, Segment};

/// A single bytecode instruction.
///
/// Stack effects are written `[a, b] -> [c]` with the top of stack on the
/// right.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(i64)]
pub enum Opcode {
    // === Constants and Variables ===
    /// Push an immediate integer operand: `[] -> [n]`
    Ldc = 0,
    /// Push the value bound at a de Bruijn index operand: `[] -> [env[i]]`
    Ld = 1,

    // === Arithmetic ===
    /// Add: `[a, b] -> [a + b]`
    Add = 2,
    /// Subtract: `[a, b] -> [a - b]`
    Sub = 3,
    /// Multiply: `[a, b] -> [a * b]`
    Mul = 4,

    // === Control Flow ===
    /// Two-way branch: `[cond] -> []`. The two operand words are the
    /// then-address (taken when `cond == 0`) and the else-address; the
    /// instruction after them is saved on the dump as the join point.
    Sel = 5,
    /// Push a closure over the current environment; the operand word is
    /// its code address: `[] -> [closure]`
    Ldf = 6,
    /// Like `Ldf`, but the closure's environment starts with the closure
    /// itself, so index 0 inside the body names the function: `[] -> [closure]`
    Ldrf = 7,
    /// Apply: `[closure, arg] -> []`. Saves a call frame, enters the
    /// closure's code with its environment extended by `arg`.
    Ap = 8,
    /// Return from a call frame, restoring pc and environment.
    Rtn = 9,
    /// Rejoin after a branch frame, restoring pc only.
    Join = 10,
    /// Stop: `[v] -> []`, yielding `v` as the program result.
    Halt = 11,
}

impl Opcode {
    /// Decodes a code word into an instruction.
    #[must_use]
    pub const fn from_word(word: i64) -> Option<Self> {
        match word {
            0 => Some(Self::Ldc),
            1 => Some(Self::Ld),
            2 => Some(Self::Add),
            3 => Some(Self::Sub),
            4 => Some(Self::Mul),
            5 => Some(Self::Sel),
            6 => Some(Self::Ldf),
            7 => Some(Self::Ldrf),
            8 => Some(Self::Ap),
            9 => Some(Self::Rtn),
            10 => Some(Self::Join),
            11 => Some(Self::Halt),
            _ => None,
        }
    }

    /// The wire encoding of this instruction.
    #[must_use]
    pub const fn word(self) -> i64 {
        self as i64
    }

    /// Number of operand words following the opcode.
    #[must_use]
    pub const fn operand_count(self) -> usize {
        match self {
            Self::Ldc | Self::Ld | Self::Ldf | Self::Ldrf => 1,
            Self::Sel => 2,
            Self::Add
            | Self::Sub
            | Self::Mul
            | Self::Ap
            | Self::Rtn
            | Self::Join
            | Self::Halt => 0,
        }
    }

    /// The assembler mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Ldc => "LDC",
            Self::Ld => "LD",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mul => "MUL",
            Self::Sel => "SEL",
            Self::Ldf => "LDF",
            Self::Ldrf => "LDRF",
            Self::Ap => "AP",
            Self::Rtn => "RTN",
            Self::Join => "JOIN",
            Self::Halt => "HALT",
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.mnemonic())
    }
}

/// The loaded code segment: a bounds-checked array of words.
#[derive(Clone, Debug)]
pub struct CodeSegment {
    words: Vec<i64>,
}

impl CodeSegment {
    /// Wraps loaded words, enforcing the configured capacity.
    pub fn from_words(words: Vec<i64>, capacity: usize) -> Result<Self> {
        if words.len() > capacity {
            return Err(Error::segment_overflow(Segment::Code, capacity));
        }
        Ok(Self { words })
    }

    /// Fetches the word at `at`, validating the index first.
    pub fn fetch(&self, at: usize) -> Result<i64> {
        self.words
            .get(at)
            .copied()
            .ok_or_else(Error::truncated_code)
    }

    /// Number of words loaded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns true if no words were loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Builds code segments word by word.
///
/// This is the shape a compiler back end would emit through; tests and
/// benches use it to assemble programs without a textual front end.
#[derive(Clone, Debug, Default)]
pub struct CodeBuilder {
    words: Vec<i64>,
}

impl CodeBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub const fn new() -> Self {
        Self { words: Vec::new() }
    }

    /// Emits an opcode word and returns its address.
    pub fn emit(&mut self, op: Opcode) -> usize {
        self.emit_word(op.word())
    }

    /// Emits a raw word and returns its address.
    pub fn emit_word(&mut self, word: i64) -> usize {
        let at = self.words.len();
        self.words.push(word);
        at
    }

    /// Address of the next word to be emitted.
    #[must_use]
    pub fn here(&self) -> usize {
        self.words.len()
    }

    /// Overwrites the word at `at` (branch-target back-patching).
    ///
    /// # Panics
    /// Panics if `at` has not been emitted yet.
    pub fn patch(&mut self, at: usize, word: i64) {
        assert!(at < self.words.len(), "patch of unemitted address {at}");
        self.words[at] = word;
    }

    /// Finishes the build, yielding the raw code words.
    #[must_use]
    pub fn into_words(self) -> Vec<i64> {
        self.words
    }
}
