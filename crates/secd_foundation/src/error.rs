//! Fault types for the SECD machine.
//!
//! Uses `thiserror` for ergonomic error definition. Every fault is fatal:
//! the machine never recovers and continues past one (the bytecode stream
//! is trusted, compiler-generated input).

use std::fmt;

use thiserror::Error;

use crate::value::Type;

/// Convenience alias for machine results.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for machine faults.
///
/// Carries the fault kind plus, once the dispatch loop has attached it,
/// the program counter of the faulting instruction.
#[derive(Debug, Error)]
pub struct Error {
    /// The kind of fault that occurred.
    pub kind: ErrorKind,
    /// Program counter of the faulting instruction, if known.
    pub pc: Option<usize>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub const fn new(kind: ErrorKind) -> Self {
        Self { kind, pc: None }
    }

    /// Attaches the faulting program counter, keeping an earlier one.
    #[must_use]
    pub fn with_pc(mut self, pc: usize) -> Self {
        self.pc.get_or_insert(pc);
        self
    }

    /// Creates an invalid-opcode fault.
    #[must_use]
    pub const fn invalid_opcode(opcode: i64) -> Self {
        Self::new(ErrorKind::InvalidOpcode { opcode })
    }

    /// Creates a segment-overflow fault.
    #[must_use]
    pub const fn segment_overflow(segment: Segment, limit: usize) -> Self {
        Self::new(ErrorKind::SegmentOverflow { segment, limit })
    }

    /// Creates a segment-underflow fault.
    #[must_use]
    pub const fn segment_underflow(segment: Segment) -> Self {
        Self::new(ErrorKind::SegmentUnderflow { segment })
    }

    /// Creates an out-of-range control-transfer fault.
    #[must_use]
    pub const fn pc_out_of_range(target: i64, limit: usize) -> Self {
        Self::new(ErrorKind::PcOutOfRange { target, limit })
    }

    /// Creates a truncated-code fault.
    #[must_use]
    pub const fn truncated_code() -> Self {
        Self::new(ErrorKind::TruncatedCode)
    }

    /// Creates an unbound-variable fault.
    #[must_use]
    pub const fn unbound_variable(index: i64, depth: usize) -> Self {
        Self::new(ErrorKind::UnboundVariable { index, depth })
    }

    /// Creates a dump-frame mismatch fault.
    #[must_use]
    pub const fn frame_mismatch(expected: &'static str, found: &'static str) -> Self {
        Self::new(ErrorKind::FrameMismatch { expected, found })
    }

    /// Creates a type mismatch fault.
    #[must_use]
    pub const fn type_mismatch(expected: Type, actual: Type) -> Self {
        Self::new(ErrorKind::TypeMismatch { expected, actual })
    }

    /// Creates a heap-exhausted fault.
    #[must_use]
    pub const fn heap_exhausted(limit: usize) -> Self {
        Self::new(ErrorKind::HeapExhausted { limit })
    }

    /// Creates a loader parse fault.
    #[must_use]
    pub fn parse(message: impl Into<String>, line: usize) -> Self {
        Self::new(ErrorKind::Parse {
            message: message.into(),
            line,
        })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(pc) = self.pc {
            write!(f, " at pc {pc}")?;
        }
        Ok(())
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Io(e))
    }
}

/// Categorized fault kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// The fetched opcode word matches no recognized instruction.
    #[error("invalid opcode {opcode}")]
    InvalidOpcode {
        /// The offending opcode word.
        opcode: i64,
    },

    /// A segment grew past its configured capacity.
    #[error("{segment} overflow (capacity {limit})")]
    SegmentOverflow {
        /// The segment that overflowed.
        segment: Segment,
        /// Its configured capacity.
        limit: usize,
    },

    /// A pop was attempted on an empty segment.
    #[error("{segment} underflow")]
    SegmentUnderflow {
        /// The segment that underflowed.
        segment: Segment,
    },

    /// A control transfer targeted an address outside the loaded code.
    #[error("control transfer to {target} outside code (length {limit})")]
    PcOutOfRange {
        /// The requested target address.
        target: i64,
        /// Number of loaded code words.
        limit: usize,
    },

    /// The code stream ended inside an instruction's operands.
    #[error("code stream ends inside an instruction")]
    TruncatedCode,

    /// An environment lookup walked past the root.
    #[error("unbound variable: index {index} (environment depth {depth})")]
    UnboundVariable {
        /// The requested de Bruijn index.
        index: i64,
        /// Number of bindings actually in scope.
        depth: usize,
    },

    /// A dump frame was popped by the wrong instruction: a call frame by
    /// Join, or a branch frame by Rtn.
    #[error("dump frame mismatch: expected a {expected} frame, found a {found} frame")]
    FrameMismatch {
        /// Frame shape the popping instruction requires.
        expected: &'static str,
        /// Frame shape actually on top of the dump.
        found: &'static str,
    },

    /// An instruction was applied to a value of the wrong type.
    #[error("type mismatch: expected {expected}, got {actual}")]
    TypeMismatch {
        /// The expected type.
        expected: Type,
        /// The actual type encountered.
        actual: Type,
    },

    /// The cell heap's configured budget is spent.
    #[error("heap exhausted (capacity {limit} cells)")]
    HeapExhausted {
        /// The configured cell budget.
        limit: usize,
    },

    /// Malformed textual bytecode.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: usize,
    },

    /// An I/O error while reading bytecode.
    #[error("io error: {0}")]
    Io(std::io::Error),
}

/// The three fixed-capacity machine segments.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Segment {
    /// The code array.
    Code,
    /// The operand stack.
    Stack,
    /// The dump (control stack).
    Dump,
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code => f.pad("code segment"),
            Self::Stack => f.pad("stack"),
            Self::Dump => f.pad("dump"),
        }
    }
}
