//! Arena-allocated environment and closure cells.
//!
//! Environments are persistent singly-linked lists of values, extended
//! only at the front; multiple closures may share tail structure. Closures
//! pair a code entry address with the environment captured at their
//! definition site. Both record shapes draw from one configured cell
//! budget and are never reclaimed.
//!
//! Cells are addressed by typed `u32` handles rather than references, so
//! the single permitted mutation ([`Heap::tie_knot`], which lets a
//! recursive closure's environment contain the closure itself) is a
//! bounded operation on a handle and the resulting cycle is safe to
//! traverse.

#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]

use std::fmt;

use crate::error::{Error, Result};
use crate::value::Value;

/// Handle to an environment node in the heap.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct EnvRef(u32);

impl EnvRef {
    /// Returns the raw index of this node.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for EnvRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnvRef({})", self.0)
    }
}

/// Handle to a closure cell in the heap.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ClosureRef(u32);

impl ClosureRef {
    /// Returns the raw index of this closure.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ClosureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClosureRef({})", self.0)
    }
}

impl fmt::Display for ClosureRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "closure@{}", self.0)
    }
}

/// An environment node: one bound value plus the rest of the list.
#[derive(Copy, Clone, Debug)]
struct EnvNode {
    elm: Value,
    next: Option<EnvRef>,
}

/// A closure cell: code entry address plus captured environment.
#[derive(Copy, Clone, Debug)]
struct ClosureCell {
    code: usize,
    env: Option<EnvRef>,
}

/// Cell heap backing environments and closures.
///
/// Allocation is bump-only: cells are handed out fresh and never
/// individually released. Exceeding the configured budget is a fatal
/// [`crate::ErrorKind::HeapExhausted`] fault.
#[derive(Debug)]
pub struct Heap {
    envs: Vec<EnvNode>,
    closures: Vec<ClosureCell>,
    capacity: usize,
}

impl Heap {
    /// Creates a heap with the given total cell budget.
    ///
    /// The budget covers both record shapes combined.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            envs: Vec::new(),
            closures: Vec::new(),
            capacity,
        }
    }

    /// Total cells allocated so far, both shapes combined.
    #[must_use]
    pub fn len(&self) -> usize {
        self.envs.len() + self.closures.len()
    }

    /// Returns true if no cells have been allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn reserve_cell(&self) -> Result<()> {
        if self.len() >= self.capacity {
            return Err(Error::heap_exhausted(self.capacity));
        }
        Ok(())
    }

    /// Prepends `value` onto `env`, returning the new list head.
    ///
    /// `None` is the empty environment. The existing list is shared, not
    /// copied; `env` itself is never mutated.
    pub fn extend(&mut self, value: Value, env: Option<EnvRef>) -> Result<EnvRef> {
        self.reserve_cell()?;
        let handle = EnvRef(self.envs.len() as u32);
        self.envs.push(EnvNode {
            elm: value,
            next: env,
        });
        Ok(handle)
    }

    /// Walks `index` links into `env` and returns the value bound there.
    ///
    /// Walking past the root is an [`crate::ErrorKind::UnboundVariable`]
    /// fault: the index names a binding level that does not exist.
    pub fn lookup(&self, index: usize, env: Option<EnvRef>) -> Result<Value> {
        let mut cur = env;
        let mut depth = 0;
        loop {
            let Some(handle) = cur else {
                return Err(Error::unbound_variable(index as i64, depth));
            };
            let node = self.envs[handle.0 as usize];
            if depth == index {
                return Ok(node.elm);
            }
            depth += 1;
            cur = node.next;
        }
    }

    /// Number of bindings reachable from `env`.
    #[must_use]
    pub fn env_depth(&self, env: Option<EnvRef>) -> usize {
        let mut cur = env;
        let mut depth = 0;
        while let Some(handle) = cur {
            depth += 1;
            cur = self.envs[handle.0 as usize].next;
        }
        depth
    }

    /// Value bound at an environment node.
    #[must_use]
    pub fn env_value(&self, env: EnvRef) -> Value {
        self.envs[env.0 as usize].elm
    }

    /// The rest of the list after an environment node.
    #[must_use]
    pub fn env_next(&self, env: EnvRef) -> Option<EnvRef> {
        self.envs[env.0 as usize].next
    }

    /// Allocates a closure entered at `code` over `env`.
    pub fn alloc_closure(&mut self, code: usize, env: Option<EnvRef>) -> Result<ClosureRef> {
        self.reserve_cell()?;
        let handle = ClosureRef(self.closures.len() as u32);
        self.closures.push(ClosureCell { code, env });
        Ok(handle)
    }

    /// Allocates a self-referential closure entered at `code`.
    ///
    /// The current environment is extended with a placeholder, the closure
    /// captures the extended environment, and the placeholder is then
    /// back-patched to the closure itself. Inside the body, index 0 resolves
    /// to the closure, so it can apply itself (and, nested, a group of such
    /// bindings can apply each other) without any other machinery.
    pub fn alloc_recursive_closure(
        &mut self,
        code: usize,
        env: Option<EnvRef>,
    ) -> Result<ClosureRef> {
        let nenv = self.extend(Value::Int(0), env)?;
        let closure = self.alloc_closure(code, Some(nenv))?;
        self.tie_knot(nenv, closure);
        Ok(closure)
    }

    /// Back-patches the element of `env` to reference `closure`.
    ///
    /// This is the only mutation of a constructed cell the heap permits;
    /// it exists solely for recursive-closure construction.
    pub fn tie_knot(&mut self, env: EnvRef, closure: ClosureRef) {
        self.envs[env.0 as usize].elm = Value::Closure(closure);
    }

    /// Code entry address of `closure`.
    #[must_use]
    pub fn closure_code(&self, closure: ClosureRef) -> usize {
        self.closures[closure.0 as usize].code
    }

    /// Environment captured by `closure`.
    #[must_use]
    pub fn closure_env(&self, closure: ClosureRef) -> Option<EnvRef> {
        self.closures[closure.0 as usize].env
    }
}
