//! Tuned launch tables.
//!
//! Everything in this crate is data: process-wide `static` tables built at
//! compile time and never mutated. The decision engine in `backend` reads
//! them. Lookups here only resolve a key to its row; launch parameters are
//! computed elsewhere.
//!
//! | Table | Contents |
//! |-------|----------|
//! | [`radix::small_table`] | Hand-tuned [`RadixPlan`]s for power-of-two lengths up to 4096 |
//! | [`block::BLOCK_TABLE`] | Block width and work-group size for block-compute kernels |
//! | [`rules::PRIME_POWER_RULES`] | Work-group choice for pure powers of 3, 5, 7, 11, 13 |
//! | [`rules::COMPOSITE_RULES`] | Per-work-item element count for mixed-radix families |
//!
//! The small table was tuned for single precision and is reused for double.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod block;
pub mod primes;
pub mod radix;
pub mod rules;

pub use block::{BLOCK_TABLE, BlockComputeEntry, block_compute, try_block_compute};
pub use primes::{PrimeMask, SUPPORTED_PRIMES};
pub use radix::{MAX_PASSES, RadixPlan, small_table};
pub use rules::{COMPOSITE_RULES, CompositeRule, FALLBACK_RULE, PRIME_POWER_RULES, PrimePowerRule, RuleCondition};

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn root_exports_cover_every_table() {
    assert_eq!(BLOCK_TABLE.len(), 10);
    assert!(BLOCK_TABLE.iter().all(|e| try_block_compute(e.length) == Ok(e)));
    assert_eq!(small_table().len(), 12);
    assert_eq!(COMPOSITE_RULES.len(), 14);
    assert_eq!(PRIME_POWER_RULES.len(), 5);
  }
}
