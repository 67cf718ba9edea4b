//! Tuned radix plans for small power-of-two lengths.
//!
//! Each [`RadixPlan`] fixes the complete kernel shape for one length: the
//! work group, how many transforms share it, and the ordered radix passes.
//! The values were tuned for single precision; double precision reuses them.
//!
//! The table is exposed as a slice. Finding the entry for a length is the
//! caller's job (see `backend::LaunchPolicy`).

use traits::LaunchParams;

/// Upper bound on the number of radix passes in one plan.
pub const MAX_PASSES: usize = 12;

/// Fixed decomposition of one transform length.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RadixPlan {
  pub length: usize,
  /// Threads per work group.
  pub work_group_size: usize,
  /// Transforms handled by one work group.
  pub transforms_per_group: usize,
  /// Number of non-zero entries at the front of `radices`.
  pub pass_count: usize,
  /// Radix of each pass; entries past `pass_count` are zero.
  pub radices: [usize; MAX_PASSES],
}

impl RadixPlan {
  // Out-of-range passes fail const evaluation of the table.
  #[allow(clippy::indexing_slicing)]
  const fn new(length: usize, work_group_size: usize, transforms_per_group: usize, passes: &[usize]) -> Self {
    let mut radices = [0; MAX_PASSES];
    let mut i = 0;
    while i < passes.len() {
      radices[i] = passes[i];
      i += 1;
    }
    Self {
      length,
      work_group_size,
      transforms_per_group,
      pass_count: passes.len(),
      radices,
    }
  }

  /// The radix passes in execution order, without the zero padding.
  #[inline]
  #[must_use]
  pub fn passes(&self) -> &[usize] {
    self.radices.get(..self.pass_count).unwrap_or(&[])
  }

  /// Product of the non-zero radices. Equals `length` for every table entry.
  #[must_use]
  pub fn radix_product(&self) -> usize {
    self.radices.iter().filter(|&&r| r != 0).product()
  }

  #[inline]
  #[must_use]
  pub const fn launch_params(&self) -> LaunchParams {
    LaunchParams::new(self.work_group_size, self.transforms_per_group)
  }
}

// Length, work group size, transforms per group, radices.
static SMALL_TABLE: [RadixPlan; 12] = [
  RadixPlan::new(4096, 256, 1, &[16, 16, 16]),
  RadixPlan::new(2048, 256, 1, &[8, 8, 8, 4]),
  RadixPlan::new(1024, 128, 1, &[8, 8, 4, 4]),
  RadixPlan::new(512, 64, 1, &[8, 8, 8]),
  RadixPlan::new(256, 64, 1, &[4, 4, 4, 4]),
  RadixPlan::new(128, 64, 4, &[8, 4, 4]),
  RadixPlan::new(64, 64, 4, &[4, 4, 4]),
  RadixPlan::new(32, 64, 16, &[8, 4]),
  RadixPlan::new(16, 64, 16, &[4, 4]),
  RadixPlan::new(8, 64, 32, &[4, 2]),
  RadixPlan::new(4, 64, 32, &[2, 2]),
  RadixPlan::new(2, 64, 64, &[2]),
];

/// The tuned small-size table, largest length first.
#[inline]
#[must_use]
pub fn small_table() -> &'static [RadixPlan] {
  &SMALL_TABLE
}

#[cfg(test)]
mod tests {
  use platform::MAX_WORK_GROUP_SIZE;

  use super::*;
  use crate::primes::SUPPORTED_PRIMES;

  fn is_supported_smooth(mut n: usize) -> bool {
    for p in SUPPORTED_PRIMES {
      while n % p == 0 {
        n /= p;
      }
    }
    n == 1
  }

  #[test]
  fn radix_product_equals_length() {
    for plan in small_table() {
      assert_eq!(plan.radix_product(), plan.length, "length {}", plan.length);
    }
  }

  #[test]
  fn pass_count_matches_nonzero_radices() {
    for plan in small_table() {
      let nonzero = plan.radices.iter().filter(|&&r| r != 0).count();
      assert_eq!(plan.pass_count, nonzero, "length {}", plan.length);
      assert_eq!(plan.passes().len(), plan.pass_count);
      assert!(plan.pass_count >= 1 && plan.pass_count <= MAX_PASSES);
      // Zero padding only at the tail.
      assert!(plan.radices[plan.pass_count..].iter().all(|&r| r == 0));
    }
  }

  #[test]
  fn radices_are_supported_prime_powers() {
    for plan in small_table() {
      for &r in plan.passes() {
        assert!(r >= 2 && is_supported_smooth(r), "radix {r} in length {}", plan.length);
      }
    }
  }

  #[test]
  fn work_groups_within_limit() {
    for plan in small_table() {
      assert!(plan.work_group_size > 0 && plan.work_group_size <= MAX_WORK_GROUP_SIZE);
      assert!(plan.transforms_per_group > 0);
    }
  }

  #[test]
  fn covers_powers_of_two_to_4096() {
    let mut lengths: [usize; 12] = [0; 12];
    for (slot, plan) in lengths.iter_mut().zip(small_table()) {
      *slot = plan.length;
    }
    assert_eq!(lengths, [4096, 2048, 1024, 512, 256, 128, 64, 32, 16, 8, 4, 2]);
  }

  #[test]
  fn known_entries() {
    let plan = small_table().iter().find(|p| p.length == 1024).unwrap();
    assert_eq!(plan.launch_params(), LaunchParams::new(128, 1));
    assert_eq!(plan.passes(), &[8, 8, 4, 4]);

    let plan = small_table().iter().find(|p| p.length == 8).unwrap();
    assert_eq!(plan.launch_params(), LaunchParams::new(64, 32));
    assert_eq!(plan.passes(), &[4, 2]);
  }
}
