//! The dump: a bounded control stack of saved continuations.
//!
//! A call frame is pushed by `Ap` and popped only by `Rtn`; a branch frame
//! is pushed by `Sel` and popped only by `Join`. The frames are tagged, so
//! a mismatched pop is a detected fault rather than silent register
//! corruption.

use secd_foundation::{EnvRef, Error, Result, Segment};

/// A saved continuation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Frame {
    /// Pushed by application: where to return, and the caller's environment.
    Call {
        /// Address of the instruction after the call.
        ret: usize,
        /// The caller's environment, restored on return.
        env: Option<EnvRef>,
    },
    /// Pushed by a conditional select: where the branches rejoin.
    ///
    /// Carries no environment; a branch never changes the active
    /// environment.
    Branch {
        /// Address of the instruction after the two branch operands.
        join: usize,
    },
}

impl Frame {
    const fn name(self) -> &'static str {
        match self {
            Self::Call { .. } => "call",
            Self::Branch { .. } => "branch",
        }
    }
}

/// Bounded stack of continuation frames.
#[derive(Debug)]
pub struct Dump {
    frames: Vec<Frame>,
    capacity: usize,
}

impl Dump {
    /// Creates an empty dump with the given depth bound.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            frames: Vec::new(),
            capacity,
        }
    }

    /// Current frame count.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if no frames are saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn push(&mut self, frame: Frame) -> Result<()> {
        if self.frames.len() >= self.capacity {
            return Err(Error::segment_overflow(Segment::Dump, self.capacity));
        }
        self.frames.push(frame);
        Ok(())
    }

    fn pop(&mut self) -> Result<Frame> {
        self.frames
            .pop()
            .ok_or_else(|| Error::segment_underflow(Segment::Dump))
    }

    /// Saves a call continuation.
    pub fn push_call(&mut self, ret: usize, env: Option<EnvRef>) -> Result<()> {
        self.push(Frame::Call { ret, env })
    }

    /// Saves a branch continuation.
    pub fn push_branch(&mut self, join: usize) -> Result<()> {
        self.push(Frame::Branch { join })
    }

    /// Pops a call frame, restoring both pc and environment.
    pub fn pop_call(&mut self) -> Result<(usize, Option<EnvRef>)> {
        match self.pop()? {
            Frame::Call { ret, env } => Ok((ret, env)),
            found @ Frame::Branch { .. } => Err(Error::frame_mismatch("call", found.name())),
        }
    }

    /// Pops a branch frame, restoring pc only.
    pub fn pop_branch(&mut self) -> Result<usize> {
        match self.pop()? {
            Frame::Branch { join } => Ok(join),
            found @ Frame::Call { .. } => Err(Error::frame_mismatch("branch", found.name())),
        }
    }
}
