//! Machine configuration: segment capacities and the trace switch.

/// Capacity bounds and diagnostics switches for one machine instance.
///
/// The capacities play the role of the classical fixed segment sizes:
/// exceeding any of them is a fatal bounds fault, not a resize.
#[derive(Clone, Debug)]
pub struct MachineConfig {
    /// Maximum number of code words.
    pub code_capacity: usize,
    /// Maximum operand-stack depth.
    pub stack_capacity: usize,
    /// Maximum dump depth.
    pub dump_capacity: usize,
    /// Total heap cell budget (environment nodes plus closures).
    pub heap_capacity: usize,
    /// Emit a per-instruction trace line to stderr.
    pub trace: bool,
}

impl MachineConfig {
    /// Default maximum number of code words.
    pub const DEFAULT_CODE_CAPACITY: usize = 4096;
    /// Default maximum operand-stack depth.
    pub const DEFAULT_STACK_CAPACITY: usize = 1024;
    /// Default maximum dump depth.
    pub const DEFAULT_DUMP_CAPACITY: usize = 1024;
    /// Default heap cell budget.
    pub const DEFAULT_HEAP_CAPACITY: usize = 16384;

    /// Creates a configuration with the default capacities.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            code_capacity: Self::DEFAULT_CODE_CAPACITY,
            stack_capacity: Self::DEFAULT_STACK_CAPACITY,
            dump_capacity: Self::DEFAULT_DUMP_CAPACITY,
            heap_capacity: Self::DEFAULT_HEAP_CAPACITY,
            trace: false,
        }
    }

    /// Sets the code capacity.
    #[must_use]
    pub const fn with_code_capacity(mut self, capacity: usize) -> Self {
        self.code_capacity = capacity;
        self
    }

    /// Sets the operand-stack capacity.
    #[must_use]
    pub const fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    /// Sets the dump capacity.
    #[must_use]
    pub const fn with_dump_capacity(mut self, capacity: usize) -> Self {
        self.dump_capacity = capacity;
        self
    }

    /// Sets the heap cell budget.
    #[must_use]
    pub const fn with_heap_capacity(mut self, capacity: usize) -> Self {
        self.heap_capacity = capacity;
        self
    }

    /// Enables or disables the per-instruction trace.
    #[must_use]
    pub const fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::new()
    }
}
