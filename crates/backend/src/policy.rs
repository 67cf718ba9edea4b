//! Table-first launch policy.
//!
//! The tuned small table is the ground truth for the lengths it lists; the
//! heuristic is only consulted when there is no exact entry.

use core::fmt;

use platform::DeviceLimits;
use traits::{LaunchParamProvider, LaunchParams, PlanError};
use tune::{RadixPlan, small_table};

use crate::heuristic::try_determine_launch_params;

/// Where a length's launch parameters came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamSource {
  /// Exact entry in the tuned small table.
  Table,
  /// Factorization heuristic.
  Heuristic,
}

impl ParamSource {
  #[inline]
  #[must_use]
  pub const fn name(self) -> &'static str {
    match self {
      Self::Table => "table",
      Self::Heuristic => "heuristic",
    }
  }
}

impl fmt::Display for ParamSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.name())
  }
}

/// Default [`LaunchParamProvider`]: tuned table, then heuristic.
///
/// A table entry whose work group exceeds the device limit is skipped so the
/// result always honours `max_work_group_size`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaunchPolicy {
  pub max_work_group_size: usize,
}

impl LaunchPolicy {
  #[inline]
  #[must_use]
  pub const fn new(limits: &DeviceLimits) -> Self {
    Self {
      max_work_group_size: limits.max_work_group_size,
    }
  }

  /// Table entry for `length`, if one exists and fits the limit.
  #[must_use]
  pub fn table_plan(&self, length: usize) -> Option<&'static RadixPlan> {
    small_table()
      .iter()
      .find(|plan| plan.length == length && plan.work_group_size <= self.max_work_group_size)
  }

  #[must_use]
  pub fn source(&self, length: usize) -> ParamSource {
    if self.table_plan(length).is_some() {
      ParamSource::Table
    } else {
      ParamSource::Heuristic
    }
  }

  /// Launch parameters and where they came from.
  pub fn try_resolve(&self, length: usize) -> Result<(LaunchParams, ParamSource), PlanError> {
    match self.table_plan(length) {
      Some(plan) => Ok((plan.launch_params(), ParamSource::Table)),
      None => try_determine_launch_params(length, self.max_work_group_size).map(|p| (p, ParamSource::Heuristic)),
    }
  }
}

impl Default for LaunchPolicy {
  #[inline]
  fn default() -> Self {
    Self::new(&DeviceLimits::DEFAULT)
  }
}

impl LaunchParamProvider for LaunchPolicy {
  #[inline]
  fn launch_params(&self, length: usize) -> Result<LaunchParams, PlanError> {
    self.try_resolve(length).map(|(params, _)| params)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn table_wins_for_listed_lengths() {
    let policy = LaunchPolicy::default();
    assert_eq!(policy.try_resolve(8), Ok((LaunchParams::new(64, 32), ParamSource::Table)));
    assert_eq!(policy.try_resolve(4096), Ok((LaunchParams::new(256, 1), ParamSource::Table)));
  }

  #[test]
  fn heuristic_for_everything_else() {
    let policy = LaunchPolicy::default();
    assert_eq!(policy.source(12), ParamSource::Heuristic);
    assert_eq!(policy.launch_params(12), Ok(LaunchParams::new(128, 128)));
    assert_eq!(policy.source(8192), ParamSource::Heuristic);
  }

  #[test]
  fn oversized_table_entries_fall_through() {
    let policy = LaunchPolicy { max_work_group_size: 128 };
    assert_eq!(policy.source(4096), ParamSource::Heuristic);
    assert_eq!(policy.launch_params(4096), Ok(LaunchParams::new(128, 1)));
    assert_eq!(policy.source(1024), ParamSource::Table);
  }

  #[test]
  fn errors_pass_through() {
    let policy = LaunchPolicy::default();
    assert_eq!(
      policy.launch_params(17),
      Err(PlanError::UnsupportedLength { length: 17, residue: 17 })
    );
  }
}
