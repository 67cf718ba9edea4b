//! Fuzz target for the launch-parameter heuristic.
//!
//! Tests that:
//! - The checked form never panics on arbitrary lengths and limits
//! - Successful results honour the work-group limit
//! - The table-first policy agrees with the heuristic off the table

#![no_main]

use arbitrary::Arbitrary;
use backend::{LaunchParamProvider, LaunchPolicy, ParamSource, PlanError, try_determine_launch_params};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  /// Small exponents keep lengths in the range real callers use.
  exponents: [u8; 6],
  /// Optional foreign factor.
  extra: u16,
  max_work_group_size: u16,
}

fuzz_target!(|input: Input| {
  let mut length: usize = 1;
  for (&prime, &exp) in [2usize, 3, 5, 7, 11, 13].iter().zip(input.exponents.iter()) {
    for _ in 0..(exp % 5) {
      length = length.saturating_mul(prime);
    }
  }
  if input.extra > 1 {
    length = length.saturating_mul(usize::from(input.extra));
  }
  if length > 1 << 24 {
    return;
  }
  let max = usize::from(input.max_work_group_size);

  let result = try_determine_launch_params(length, max);
  match result {
    Ok(params) => {
      assert!(params.work_group_size <= max, "length {length}: {params} over {max}");
      assert!(params.work_group_size > 0 && params.transforms_per_group > 0);
    }
    Err(PlanError::WorkGroupLimitTooSmall { .. }) => assert!(max < 64),
    Err(_) => {}
  }

  let policy = LaunchPolicy { max_work_group_size: max };
  if max >= 64 && policy.source(length) == ParamSource::Heuristic {
    assert_eq!(policy.launch_params(length), result);
  }
});
