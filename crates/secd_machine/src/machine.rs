//! The fetch-decode-execute loop.
//!
//! The machine's whole state is four registers over three segments: the
//! program counter into the code segment, the operand stack, the dump of
//! saved continuations, and the current environment. Every instruction's
//! effect is expressed through these registers; there is no separate
//! result channel.
//!
//! All indices are validated before use, so a bounds fault is reported
//! before any out-of-range access can occur.

#![allow(clippy::cast_possible_wrap)]

use secd_foundation::{ClosureRef, EnvRef, Error, Heap, Result, Segment, Type, Value};

use crate::config::MachineConfig;
use crate::dump::Dump;
use crate::opcode::{CodeSegment, Opcode};

/// SECD bytecode machine.
///
/// Single-threaded and synchronous: [`Machine::run`] drives the loaded
/// program to `Halt` or to its first fault, with no suspension points.
#[derive(Debug)]
pub struct Machine {
    code: CodeSegment,
    stack: Vec<Value>,
    dump: Dump,
    env: Option<EnvRef>,
    heap: Heap,
    pc: usize,
    stack_capacity: usize,
    trace: bool,
}

impl Machine {
    /// Creates a machine over an already-built code segment.
    #[must_use]
    pub fn new(code: CodeSegment, config: &MachineConfig) -> Self {
        Self {
            code,
            stack: Vec::new(),
            dump: Dump::with_capacity(config.dump_capacity),
            env: None,
            heap: Heap::with_capacity(config.heap_capacity),
            pc: 0,
            stack_capacity: config.stack_capacity,
            trace: config.trace,
        }
    }

    /// Builds the code segment from raw words and creates a machine.
    pub fn load(words: Vec<i64>, config: &MachineConfig) -> Result<Self> {
        let code = CodeSegment::from_words(words, config.code_capacity)?;
        Ok(Self::new(code, config))
    }

    /// The cell heap (environments and closures allocated so far).
    #[must_use]
    pub fn heap(&self) -> &Heap {
        &self.heap
    }

    /// Runs until `Halt` or the first fault.
    ///
    /// Returns the value on top of the stack when `Halt` executes; any
    /// remaining stack contents are discarded.
    pub fn run(&mut self) -> Result<Value> {
        loop {
            let at = self.pc;
            if let Some(result) = self.step(at).map_err(|e| e.with_pc(at))? {
                return Ok(result);
            }
        }
    }

    /// Executes the instruction at `at`. Returns the program result on
    /// `Halt`, `None` otherwise.
    fn step(&mut self, at: usize) -> Result<Option<Value>> {
        if at >= self.code.len() {
            return Err(Error::pc_out_of_range(at as i64, self.code.len()));
        }
        let word = self.code.fetch(at)?;
        self.pc = at + 1;

        let Some(op) = Opcode::from_word(word) else {
            return Err(Error::invalid_opcode(word));
        };

        if self.trace {
            self.trace_step(at, op);
        }

        match op {
            Opcode::Ldc => {
                let n = self.operand()?;
                self.push(Value::Int(n))?;
            }

            Opcode::Ld => {
                let word = self.operand()?;
                let Ok(index) = usize::try_from(word) else {
                    return Err(Error::unbound_variable(word, self.heap.env_depth(self.env)));
                };
                let value = self.heap.lookup(index, self.env)?;
                self.push(value)?;
            }

            // Integer arithmetic wraps; overflow is not a fault.
            Opcode::Add => self.binary_op(i64::wrapping_add)?,
            Opcode::Sub => self.binary_op(i64::wrapping_sub)?,
            Opcode::Mul => self.binary_op(i64::wrapping_mul)?,

            Opcode::Sel => {
                let cond = self.pop_int()?;
                let then_at = self.addr_operand()?;
                let else_at = self.addr_operand()?;
                self.dump.push_branch(self.pc)?;
                self.pc = if cond == 0 { then_at } else { else_at };
            }

            Opcode::Ldf => {
                let addr = self.addr_operand()?;
                let closure = self.heap.alloc_closure(addr, self.env)?;
                self.push(Value::Closure(closure))?;
            }

            Opcode::Ldrf => {
                let addr = self.addr_operand()?;
                let closure = self.heap.alloc_recursive_closure(addr, self.env)?;
                self.push(Value::Closure(closure))?;
            }

            Opcode::Ap => {
                let arg = self.pop()?;
                let closure = self.pop_closure()?;
                self.dump.push_call(self.pc, self.env)?;
                self.env = Some(self.heap.extend(arg, self.heap.closure_env(closure))?);
                self.pc = self.heap.closure_code(closure);
            }

            Opcode::Rtn => {
                let (ret, env) = self.dump.pop_call()?;
                self.pc = ret;
                self.env = env;
            }

            Opcode::Join => {
                self.pc = self.dump.pop_branch()?;
            }

            Opcode::Halt => return Ok(Some(self.pop()?)),
        }

        Ok(None)
    }

    // Code stream access

    /// Fetches the next operand word and advances past it.
    fn operand(&mut self) -> Result<i64> {
        let word = self.code.fetch(self.pc)?;
        self.pc += 1;
        Ok(word)
    }

    /// Fetches an operand that must be a valid code address.
    fn addr_operand(&mut self) -> Result<usize> {
        let word = self.operand()?;
        let limit = self.code.len();
        match usize::try_from(word) {
            Ok(addr) if addr < limit => Ok(addr),
            _ => Err(Error::pc_out_of_range(word, limit)),
        }
    }

    // Stack operations

    fn push(&mut self, value: Value) -> Result<()> {
        if self.stack.len() >= self.stack_capacity {
            return Err(Error::segment_overflow(Segment::Stack, self.stack_capacity));
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<Value> {
        self.stack
            .pop()
            .ok_or_else(|| Error::segment_underflow(Segment::Stack))
    }

    fn pop_int(&mut self) -> Result<i64> {
        let value = self.pop()?;
        value
            .as_int()
            .ok_or_else(|| Error::type_mismatch(Type::Int, value.value_type()))
    }

    fn pop_closure(&mut self) -> Result<ClosureRef> {
        let value = self.pop()?;
        value
            .as_closure()
            .ok_or_else(|| Error::type_mismatch(Type::Closure, value.value_type()))
    }

    /// Pops the top two integers and pushes `op(a, b)`, where `a` was
    /// pushed first and `b` is the top of stack.
    fn binary_op(&mut self, op: fn(i64, i64) -> i64) -> Result<()> {
        let b = self.pop_int()?;
        let a = self.pop_int()?;
        self.push(Value::Int(op(a, b)))
    }

    fn trace_step(&self, at: usize, op: Opcode) {
        eprintln!(
            "[vm] {at:4}  {op:<4}  stack={} dump={} env={}",
            self.stack.len(),
            self.dump.depth(),
            self.heap.env_depth(self.env)
        );
    }
}
