// Output capture and snapshot management for reverse execution

use crate::interpreter::constants::SNAPSHOT_BASE_COST;
use crate::memory::{stack::ParamStack, store::MemoryStore};

/// Append-only buffer of text fragments produced by `print`/`println`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutputBuffer {
    fragments: Vec<String>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        OutputBuffer {
            fragments: Vec::new(),
        }
    }

    /// Append a fragment exactly as given
    pub fn print(&mut self, text: String) {
        self.fragments.push(text);
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }

    /// The fragments in the order they were produced
    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    pub fn into_fragments(self) -> Vec<String> {
        self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments joined and split into display lines
    pub fn get_output(&self) -> Vec<String> {
        let joined = self.fragments.concat();
        let mut lines: Vec<String> = joined.split('\n').map(|s| s.to_string()).collect();
        // Remove trailing empty string if text ended with newline
        if lines.last().is_some_and(|s| s.is_empty()) {
            lines.pop();
        }
        lines
    }

    pub fn estimated_size(&self) -> usize {
        self.fragments.iter().map(|f| f.len() + 24).sum()
    }
}

/// Snapshot of VM state taken before an instruction executes
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub pc: usize,
    pub memory: MemoryStore,
    pub params: ParamStack,
    pub output: OutputBuffer,
    pub steps: usize,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        SNAPSHOT_BASE_COST
            + self.memory.estimated_size()
            + self.params.estimated_size()
            + self.output.estimated_size()
    }
}

/// Manages execution history for reverse execution
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
        }
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), String> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            return Err(format!(
                "Snapshot memory limit exceeded: {} + {} > {}",
                self.current_memory, snapshot_size, self.max_memory
            ));
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
        self.current_memory = 0;
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}
