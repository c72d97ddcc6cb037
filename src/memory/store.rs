//! Typed memory store
//!
//! Memory is sparse: a cell exists only once it has been written, either by
//! an instruction or by constant injection. Each (sector, data type) pair has
//! its own bucket and every access is routed through
//! [`AddressSpace::classify`](super::AddressSpace::classify).
//!
//! Writes never check the value against the address's data type. The front
//! end is trusted to emit well-typed addresses.

use super::value::{Address, Value};
use super::{AddressSpace, DataType, ScopeSector};
use crate::interpreter::errors::RuntimeError;
use rustc_hash::FxHashMap;

/// One bucket of cells, keyed by absolute address
pub type Bucket = FxHashMap<Address, Value>;

/// Caller-supplied constants, grouped by data type
pub type ConstantTable = FxHashMap<DataType, Bucket>;

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    space: AddressSpace,
    buckets: [[Bucket; 4]; 4],
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The partition this store routes through
    pub fn address_space(&self) -> &AddressSpace {
        &self.space
    }

    /// Read a cell
    pub fn read(&self, address: Address) -> Result<&Value, RuntimeError> {
        let (sector, data_type) = self.space.classify(address)?;
        self.buckets[sector.index()][data_type.index()]
            .get(&address)
            .ok_or(RuntimeError::UninitializedAccess {
                address,
                sector,
                data_type,
                pc: None,
            })
    }

    /// Write a cell, silently overwriting any previous value
    pub fn write(&mut self, address: Address, value: Value) -> Result<(), RuntimeError> {
        let (sector, data_type) = self.space.classify(address)?;
        self.buckets[sector.index()][data_type.index()].insert(address, value);
        Ok(())
    }

    /// Check whether a cell has been written
    pub fn is_initialized(&self, address: Address) -> bool {
        self.space
            .classify(address)
            .map(|(s, t)| self.buckets[s.index()][t.index()].contains_key(&address))
            .unwrap_or(false)
    }

    /// Replace the whole constant sector with `constants`
    pub fn replace_constants(&mut self, mut constants: ConstantTable) {
        let sector = &mut self.buckets[ScopeSector::Constant.index()];
        for data_type in DataType::ALL {
            sector[data_type.index()] = constants.remove(&data_type).unwrap_or_default();
        }
    }

    /// Drop every cell of one sector
    pub fn clear_sector(&mut self, sector: ScopeSector) {
        for bucket in &mut self.buckets[sector.index()] {
            bucket.clear();
        }
    }

    /// Borrow the bucket for one (sector, type) pair (for UI display)
    pub fn bucket(&self, sector: ScopeSector, data_type: DataType) -> &Bucket {
        &self.buckets[sector.index()][data_type.index()]
    }

    /// Number of written cells across all sectors
    pub fn cell_count(&self) -> usize {
        self.buckets.iter().flatten().map(|b| b.len()).sum()
    }

    /// Rough byte footprint, used for snapshot budgeting
    pub fn estimated_size(&self) -> usize {
        self.buckets
            .iter()
            .flatten()
            .flat_map(|b| b.values())
            .map(|v| v.estimated_size() + std::mem::size_of::<Address>())
            .sum()
    }
}
