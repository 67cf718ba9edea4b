//! Block-compute tuning for large 1-D kernels.
//!
//! Large transforms are decomposed so that one factor is processed as many
//! independent blocks. For each supported block length the table fixes how
//! many blocks a work group handles (`block_width`) and the work-group size.
//! Shared-memory need is derived, never stored.
//!
//! The table is closed. Querying a length outside it is a caller bug: use
//! [`try_block_compute`] when the length is not known to be valid.

use traits::PlanError;

/// Tuning for one block-compute length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockComputeEntry {
  pub length: usize,
  /// Length-sized transforms handled per block.
  pub block_width: usize,
  pub work_group_size: usize,
}

impl BlockComputeEntry {
  const fn new(length: usize, block_width: usize, work_group_size: usize) -> Self {
    Self {
      length,
      block_width,
      work_group_size,
    }
  }

  /// Complex elements of shared memory one block occupies.
  #[inline]
  #[must_use]
  pub const fn lds_elements(&self) -> usize {
    self.length * self.block_width
  }
}

/// Every block-compute length with its tuning.
pub static BLOCK_TABLE: [BlockComputeEntry; 10] = [
  BlockComputeEntry::new(256, 8, 256),
  BlockComputeEntry::new(128, 8, 128),
  BlockComputeEntry::new(64, 16, 128),
  BlockComputeEntry::new(32, 32, 64),
  BlockComputeEntry::new(16, 64, 64),
  BlockComputeEntry::new(8, 128, 64),
  BlockComputeEntry::new(81, 9, 81),
  BlockComputeEntry::new(50, 10, 50),
  BlockComputeEntry::new(100, 5, 50),
  BlockComputeEntry::new(200, 10, 100),
];

/// Look up the block-compute entry for `length`.
pub fn try_block_compute(length: usize) -> Result<&'static BlockComputeEntry, PlanError> {
  BLOCK_TABLE
    .iter()
    .find(|e| e.length == length)
    .ok_or(PlanError::NotInBlockTable { length })
}

/// Look up the block-compute entry for `length`.
///
/// # Panics
///
/// Panics if `length` is not a block-compute length.
#[must_use]
pub fn block_compute(length: usize) -> &'static BlockComputeEntry {
  match try_block_compute(length) {
    Ok(entry) => entry,
    Err(err) => panic!("tune::block_compute failed: {err}"),
  }
}
