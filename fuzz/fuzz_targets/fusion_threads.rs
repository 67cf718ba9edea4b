//! Fuzz target for the fusion feasibility checks.
//!
//! Tests that:
//! - Thread counting never panics, even with degenerate providers
//! - Sizes whose point or batch count overflows are rejected without panicking
//! - Accepted pairs satisfy both the memory and the thread bound

#![no_main]

use arbitrary::Arbitrary;
use backend::{FusionSearch, LaunchParams, PlanError, fusion::lds_bytes_required};
use libfuzzer_sys::fuzz_target;
use platform::Precision;

#[derive(Arbitrary, Debug)]
struct Input {
  dim0: usize,
  dim1: usize,
  double: bool,
  lds_bytes: u32,
  max_threads: u16,
  work_group_size: u16,
  transforms_per_group: usize,
}

fuzz_target!(|input: Input| {
  let precision = if input.double { Precision::Double } else { Precision::Single };
  let (dim0, dim1) = (input.dim0, input.dim1);
  let params = LaunchParams::new(usize::from(input.work_group_size), input.transforms_per_group);
  let provider = |_: usize| -> Result<LaunchParams, PlanError> { Ok(params) };

  let search = FusionSearch::new(input.lds_bytes as usize, precision).with_max_threads(usize::from(input.max_threads));
  if dim0.checked_mul(dim1).is_none() {
    assert_eq!(
      backend::fusion::try_thread_count(dim0, dim1, &provider),
      Err(PlanError::DimensionOverflow { dim0, dim1 })
    );
  }
  if let Ok(true) = search.try_accepts(dim0, dim1, &provider) {
    assert!(lds_bytes_required(dim0, dim1, precision).is_some_and(|bytes| bytes <= search.lds_bytes()));
    assert!(search.max_threads() > 0);
  }
});
