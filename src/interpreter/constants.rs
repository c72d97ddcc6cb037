// Constants for the quadruple VM

use crate::memory::value::Address;

/// Base address of the global sector
pub const GLOBAL_ADDRESS_START: Address = 10_000;

/// Base address of the local sector
pub const LOCAL_ADDRESS_START: Address = 50_000;

/// Base address of the temporal sector (compiler temporaries)
pub const TEMPORAL_ADDRESS_START: Address = 170_000;

/// Base address of the constant sector
pub const CONSTANT_ADDRESS_START: Address = 200_000;

/// Exclusive end of the whole address space
pub const ADDRESS_SPACE_END: Address = 240_000;

/// Bytes charged per snapshot on top of memory contents
pub const SNAPSHOT_BASE_COST: usize = 64;

/// Default history budget used by the stepper UI (256 MB)
pub const DEFAULT_HISTORY_LIMIT: usize = 256 * 1024 * 1024;

/// Longest string `*` may build, in bytes
pub const MAX_STRING_LEN: usize = 16 * 1024 * 1024;
