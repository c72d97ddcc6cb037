// Execution engine for the quadruple VM

use crate::interpreter::errors::RuntimeError;
use crate::interpreter::ops::{evaluate_binary_op, evaluate_unary_op};
use crate::memory::stack::ParamStack;
use crate::memory::store::{ConstantTable, MemoryStore};
use crate::memory::ScopeSector;
use crate::parser::ast::{Instruction, Program};
use crate::snapshot::{OutputBuffer, Snapshot, SnapshotManager};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Tunables for a VM instance
#[derive(Debug, Clone, Default)]
pub struct VmConfig {
    /// Record a snapshot before every step, within this many bytes
    pub history_limit: Option<usize>,

    /// Abort with `StepLimitExceeded` after this many executed instructions
    pub max_steps: Option<usize>,
}

/// Shared flag for cancelling a run from outside the loop
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Result of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    Halted,
}

/// The virtual machine that executes a quadruple program
pub struct Vm {
    config: VmConfig,

    /// Typed memory, persists across runs (globals survive)
    pub(crate) memory: MemoryStore,

    /// Values queued for the intrinsics
    pub(crate) params: ParamStack,

    /// Text produced by print intrinsics
    pub(crate) output: OutputBuffer,

    /// Program being executed
    program: Program,

    /// Index of the next instruction
    pc: usize,

    /// Number of instructions executed in the current run
    steps: usize,

    /// Whether execution has finished
    finished: bool,

    /// Fault that stopped the current run, if any
    last_error: Option<RuntimeError>,

    cancel: Option<CancelFlag>,

    /// Snapshot manager for reverse execution
    snapshot_manager: Option<SnapshotManager>,

    /// Current position in execution history (for stepping backward/forward)
    history_position: usize,
}

impl Vm {
    pub fn new() -> Self {
        Self::with_config(VmConfig::default())
    }

    pub fn with_config(config: VmConfig) -> Self {
        let snapshot_manager = config.history_limit.map(SnapshotManager::new);
        Vm {
            config,
            memory: MemoryStore::new(),
            params: ParamStack::new(),
            output: OutputBuffer::new(),
            program: Program::default(),
            pc: 0,
            steps: 0,
            finished: false,
            last_error: None,
            cancel: None,
            snapshot_manager,
            history_position: 0,
        }
    }

    /// Attach a flag that aborts the run when set
    pub fn set_cancel_flag(&mut self, flag: CancelFlag) {
        self.cancel = Some(flag);
    }

    /// Prepare a fresh run of `program`.
    ///
    /// The constant sector is replaced wholesale, local and temporal cells are
    /// dropped, and the parameter stack and output buffer start empty. Global
    /// cells are kept.
    pub fn load(&mut self, program: Program, constants: ConstantTable) {
        self.memory.replace_constants(constants);
        self.memory.clear_sector(ScopeSector::Local);
        self.memory.clear_sector(ScopeSector::Temporal);
        self.params.clear();
        self.output.clear();
        self.program = program;
        self.pc = 0;
        self.steps = 0;
        self.finished = false;
        self.last_error = None;
        self.history_position = 0;
        if let Some(manager) = self.snapshot_manager.as_mut() {
            manager.clear();
        }
    }

    /// Run `program` from the start and return the output fragments
    pub fn run(
        &mut self,
        program: Program,
        constants: ConstantTable,
    ) -> Result<Vec<String>, RuntimeError> {
        debug!(
            instructions = program.len(),
            constants = constants.values().map(|b| b.len()).sum::<usize>(),
            "starting run"
        );
        self.load(program, constants);
        self.resume()?;
        Ok(self.output.fragments().to_vec())
    }

    /// Keep stepping until the program halts or faults
    pub fn resume(&mut self) -> Result<(), RuntimeError> {
        while self.step()? == StepOutcome::Continue {}
        debug!(
            steps = self.steps,
            fragments = self.output.fragments().len(),
            "run halted"
        );
        Ok(())
    }

    /// Execute exactly one instruction
    pub fn step(&mut self) -> Result<StepOutcome, RuntimeError> {
        if self.finished {
            return Ok(StepOutcome::Halted);
        }

        let pc = self.pc;
        // Running off the end and an empty line both stop here
        let instruction = match self.program.get(pc) {
            None | Some(Instruction::Halt) => return self.halt(),
            Some(&instruction) => instruction,
        };

        if self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled) {
            return Err(self.fail(RuntimeError::Cancelled { pc }));
        }
        if let Some(limit) = self.config.max_steps {
            if self.steps >= limit {
                return Err(self.fail(RuntimeError::StepLimitExceeded { limit, pc }));
            }
        }

        self.take_snapshot()?;

        trace!(pc, %instruction, "execute");
        match self.execute(instruction) {
            Ok(next) => {
                self.pc = next.unwrap_or(pc + 1);
                self.steps += 1;
                Ok(StepOutcome::Continue)
            }
            Err(e) => Err(self.fail(e.at(pc))),
        }
    }

    /// Execute one instruction, returning the redirected program counter if any
    fn execute(&mut self, instruction: Instruction) -> Result<Option<usize>, RuntimeError> {
        match instruction {
            Instruction::Unary { op, src, dst } => {
                let result = evaluate_unary_op(op, self.memory.read(src)?)?;
                self.memory.write(dst, result)?;
                Ok(None)
            }
            Instruction::Binary { op, lhs, rhs, dst } => {
                let result = evaluate_binary_op(op, self.memory.read(lhs)?, self.memory.read(rhs)?)?;
                self.memory.write(dst, result)?;
                Ok(None)
            }
            Instruction::Param { src } => self.builtin_param(src),
            Instruction::Print { src, newline } => self.builtin_print(src, newline),
            Instruction::Goto { target } => self.builtin_goto(target),
            Instruction::GotoF { cond, target } => self.builtin_gotof(cond, target),
            // Never reached; `step` halts before executing
            Instruction::Halt => Ok(None),
        }
    }

    fn halt(&mut self) -> Result<StepOutcome, RuntimeError> {
        self.finished = true;
        // Final state, so the history ends after the last instruction
        self.take_snapshot()?;
        Ok(StepOutcome::Halted)
    }

    fn fail(&mut self, error: RuntimeError) -> RuntimeError {
        warn!(kind = error.kind(), pc = ?error.pc(), "run aborted: {}", error);
        self.finished = true;
        self.last_error = Some(error.clone());
        error
    }

    /// Take a snapshot of the current execution state
    fn take_snapshot(&mut self) -> Result<(), RuntimeError> {
        let Some(manager) = self.snapshot_manager.as_mut() else {
            return Ok(());
        };

        let snapshot = Snapshot {
            pc: self.pc,
            memory: self.memory.clone(),
            params: self.params.clone(),
            output: self.output.clone(),
            steps: self.steps,
        };

        if manager.push(snapshot).is_err() {
            let error = RuntimeError::SnapshotLimitExceeded {
                current: manager.memory_usage(),
                limit: manager.memory_limit(),
            };
            return Err(self.fail(error));
        }

        self.history_position = manager.len() - 1;
        Ok(())
    }

    /// Restore execution state from a snapshot
    fn restore_snapshot(&mut self, snapshot: &Snapshot) {
        self.memory = snapshot.memory.clone();
        self.params = snapshot.params.clone();
        self.output = snapshot.output.clone();
        self.pc = snapshot.pc;
        self.steps = snapshot.steps;
    }

    fn history(&self) -> Result<&SnapshotManager, RuntimeError> {
        self.snapshot_manager
            .as_ref()
            .filter(|m| !m.is_empty())
            .ok_or_else(|| RuntimeError::HistoryOperationFailed {
                message: "No snapshots available".to_string(),
            })
    }

    fn restore_position(&mut self, position: usize) -> Result<(), RuntimeError> {
        let snapshot = self
            .history()?
            .get(position)
            .cloned()
            .ok_or_else(|| RuntimeError::HistoryOperationFailed {
                message: "Snapshot not found in history".to_string(),
            })?;
        self.history_position = position;
        self.restore_snapshot(&snapshot);
        Ok(())
    }

    /// Step backward in execution (restore previous snapshot)
    pub fn step_backward(&mut self) -> Result<(), RuntimeError> {
        self.history()?;
        if self.history_position == 0 {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "Already at the beginning of execution".to_string(),
            });
        }
        self.restore_position(self.history_position - 1)
    }

    /// Step forward in execution (replay the next recorded snapshot)
    pub fn step_forward(&mut self) -> Result<(), RuntimeError> {
        if self.history_position + 1 >= self.history()?.len() {
            return Err(RuntimeError::HistoryOperationFailed {
                message: "No more snapshots available (execution finished)".to_string(),
            });
        }
        self.restore_position(self.history_position + 1)
    }

    /// Rewind to the beginning of execution history
    pub fn rewind_to_start(&mut self) -> Result<(), RuntimeError> {
        self.restore_position(0)
    }

    /// Jump to the last recorded snapshot
    pub fn jump_to_end(&mut self) -> Result<(), RuntimeError> {
        let last = self.history()?.len() - 1;
        self.restore_position(last)
    }

    // ========== Getter methods for UI ==========

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn memory(&self) -> &MemoryStore {
        &self.memory
    }

    pub fn params(&self) -> &ParamStack {
        &self.params
    }

    pub fn output(&self) -> &OutputBuffer {
        &self.output
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn last_error(&self) -> Option<&RuntimeError> {
        self.last_error.as_ref()
    }

    pub fn history_position(&self) -> usize {
        self.history_position
    }

    pub fn total_snapshots(&self) -> usize {
        self.snapshot_manager.as_ref().map_or(0, SnapshotManager::len)
    }
}

impl Default for Vm {
    fn default() -> Self {
        Self::new()
    }
}
