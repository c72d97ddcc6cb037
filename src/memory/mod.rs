//! Memory model for the quadruple VM
//!
//! This module provides the core memory abstractions:
//! - [`value`]: Runtime value representation (Int, Real, Bool, Str)
//! - [`store`]: Sparse typed memory, one bucket per (sector, data type)
//! - [`stack`]: Parameter stack feeding the built-in intrinsics
//!
//! # Address Space Layout
//!
//! The address space is split into four scope sectors, each owning a
//! contiguous range:
//!
//! ```text
//! global    [ 10_000,  50_000)
//! local     [ 50_000, 170_000)
//! temporal  [170_000, 200_000)
//! constant  [200_000, 240_000)
//! ```
//!
//! Every sector is cut into one equal-width sub-range per [`DataType`], in
//! [`DataType::ALL`] order. The last sub-range absorbs the division remainder,
//! so sub-ranges are disjoint and cover the sector exactly.

pub mod stack;
pub mod store;
pub mod value;

use crate::interpreter::constants::{
    ADDRESS_SPACE_END, CONSTANT_ADDRESS_START, GLOBAL_ADDRESS_START, LOCAL_ADDRESS_START,
    TEMPORAL_ADDRESS_START,
};
use crate::interpreter::errors::RuntimeError;
use std::fmt;
use std::ops::Range;
use value::Address;

/// Storage class of an address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScopeSector {
    Global,
    Local,
    Temporal,
    Constant,
}

impl ScopeSector {
    /// All sectors in ascending address order
    pub const ALL: [ScopeSector; 4] = [
        ScopeSector::Global,
        ScopeSector::Local,
        ScopeSector::Temporal,
        ScopeSector::Constant,
    ];

    /// Position of this sector in [`ScopeSector::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }

    /// First address owned by this sector
    pub fn base(self) -> Address {
        match self {
            ScopeSector::Global => GLOBAL_ADDRESS_START,
            ScopeSector::Local => LOCAL_ADDRESS_START,
            ScopeSector::Temporal => TEMPORAL_ADDRESS_START,
            ScopeSector::Constant => CONSTANT_ADDRESS_START,
        }
    }

    /// Exclusive end of this sector (the next sector's base)
    pub fn end(self) -> Address {
        match self {
            ScopeSector::Global => LOCAL_ADDRESS_START,
            ScopeSector::Local => TEMPORAL_ADDRESS_START,
            ScopeSector::Temporal => CONSTANT_ADDRESS_START,
            ScopeSector::Constant => ADDRESS_SPACE_END,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ScopeSector::Global => "global",
            ScopeSector::Local => "local",
            ScopeSector::Temporal => "temporal",
            ScopeSector::Constant => "constant",
        }
    }
}

impl fmt::Display for ScopeSector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Value kinds known to the front end's type system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DataType {
    Int,
    Real,
    Bool,
    Str,
}

impl DataType {
    /// Fixed enumeration order; decides sub-range placement inside each sector
    pub const ALL: [DataType; 4] = [DataType::Int, DataType::Real, DataType::Bool, DataType::Str];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            DataType::Int => "int",
            DataType::Real => "real",
            DataType::Bool => "bool",
            DataType::Str => "string",
        }
    }

    /// Parse the keyword used in constant tables
    pub fn from_keyword(word: &str) -> Option<Self> {
        match word {
            "int" => Some(DataType::Int),
            "real" | "float" => Some(DataType::Real),
            "bool" => Some(DataType::Bool),
            "string" | "str" => Some(DataType::Str),
            _ => None,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Split `[start, end)` into `parts` contiguous sub-ranges of equal width.
/// The final sub-range is clamped to `end` so the remainder is not lost.
pub fn partition_range(start: Address, end: Address, parts: usize) -> Vec<Range<Address>> {
    if parts == 0 || end <= start {
        return Vec::new();
    }
    let width = (end - start) / parts as Address;
    (0..parts)
        .map(|i| {
            let lo = start + width * i as Address;
            let hi = if i + 1 == parts { end } else { lo + width };
            lo..hi
        })
        .collect()
}

/// The address range owned by every (sector, data type) pair.
///
/// Computed once; all reads and writes classify their address through it.
#[derive(Debug, Clone)]
pub struct AddressSpace {
    ranges: [[Range<Address>; 4]; 4],
}

impl AddressSpace {
    pub fn new() -> Self {
        let ranges = ScopeSector::ALL.map(|sector| {
            let parts = partition_range(sector.base(), sector.end(), DataType::ALL.len());
            [
                parts[0].clone(),
                parts[1].clone(),
                parts[2].clone(),
                parts[3].clone(),
            ]
        });
        AddressSpace { ranges }
    }

    /// Sub-range owned by `data_type` inside `sector`
    pub fn range(&self, sector: ScopeSector, data_type: DataType) -> Range<Address> {
        self.ranges[sector.index()][data_type.index()].clone()
    }

    /// First address of the (sector, type) sub-range; the front end allocates from here
    pub fn base(&self, sector: ScopeSector, data_type: DataType) -> Address {
        self.ranges[sector.index()][data_type.index()].start
    }

    /// Find the (sector, type) pair owning `address`.
    ///
    /// Sectors are scanned from the highest base downward; the first one whose
    /// base is at or below the address owns it.
    pub fn classify(&self, address: Address) -> Result<(ScopeSector, DataType), RuntimeError> {
        if address >= ADDRESS_SPACE_END {
            return Err(RuntimeError::InvalidAddress { address, pc: None });
        }

        let sector = ScopeSector::ALL
            .iter()
            .rev()
            .copied()
            .find(|s| address >= s.base())
            .ok_or(RuntimeError::InvalidAddress { address, pc: None })?;

        DataType::ALL
            .iter()
            .copied()
            .find(|t| self.ranges[sector.index()][t.index()].contains(&address))
            .map(|t| (sector, t))
            .ok_or(RuntimeError::InvalidAddress { address, pc: None })
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partition_is_exhaustive_and_disjoint() {
        for parts in 1..=7 {
            for sector in ScopeSector::ALL {
                let ranges = partition_range(sector.base(), sector.end(), parts);
                assert_eq!(ranges.len(), parts);
                assert_eq!(ranges[0].start, sector.base());
                assert_eq!(ranges[parts - 1].end, sector.end());
                for pair in ranges.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                }
                let covered: u32 = ranges.iter().map(|r| r.end - r.start).sum();
                assert_eq!(covered, sector.end() - sector.base());
            }
        }
    }

    #[test]
    fn test_remainder_goes_to_last_range() {
        let ranges = partition_range(0, 10, 3);
        assert_eq!(ranges, vec![0..3, 3..6, 6..10]);
    }

    #[test]
    fn test_classify_boundaries() {
        let space = AddressSpace::new();
        assert_eq!(
            space.classify(10_000).unwrap(),
            (ScopeSector::Global, DataType::Int)
        );
        assert_eq!(
            space.classify(49_999).unwrap(),
            (ScopeSector::Global, DataType::Str)
        );
        assert_eq!(
            space.classify(50_000).unwrap(),
            (ScopeSector::Local, DataType::Int)
        );
        assert_eq!(
            space.classify(80_000).unwrap(),
            (ScopeSector::Local, DataType::Real)
        );
        assert_eq!(
            space.classify(177_500).unwrap(),
            (ScopeSector::Temporal, DataType::Real)
        );
        assert_eq!(
            space.classify(200_000).unwrap(),
            (ScopeSector::Constant, DataType::Int)
        );
        assert_eq!(
            space.classify(239_999).unwrap(),
            (ScopeSector::Constant, DataType::Str)
        );
    }

    #[test]
    fn test_classify_out_of_range() {
        let space = AddressSpace::new();
        assert!(matches!(
            space.classify(9_999),
            Err(RuntimeError::InvalidAddress { address: 9_999, .. })
        ));
        assert!(matches!(
            space.classify(240_000),
            Err(RuntimeError::InvalidAddress { address: 240_000, .. })
        ));
        assert!(space.classify(0).is_err());
    }

    #[test]
    fn test_classify_every_address_once() {
        let space = AddressSpace::new();
        for address in (GLOBAL_ADDRESS_START..ADDRESS_SPACE_END).step_by(97) {
            let (sector, data_type) = space.classify(address).unwrap();
            assert!(space.range(sector, data_type).contains(&address));
            let owners = ScopeSector::ALL
                .iter()
                .flat_map(|s| DataType::ALL.iter().map(move |t| (*s, *t)))
                .filter(|(s, t)| space.range(*s, *t).contains(&address))
                .count();
            assert_eq!(owners, 1);
        }
    }
}
