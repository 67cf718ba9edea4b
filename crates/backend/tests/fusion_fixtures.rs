//! Regression fixtures for the 2-D fusion search.
//!
//! Budgets are derived from 12 bytes per point in single precision and 24 in
//! double; a pair also needs fewer than 1024 threads in its larger pass.

use std::collections::HashSet;

use backend::{
  FusionCandidate, FusionSearch, Heuristic, LaunchParamProvider, LaunchPolicy, RadixFamily,
  enumerate_fusion_pairs, fusion::{FUSION_PASSES, lds_bytes_required},
};
use platform::{DeviceLimits, Precision};

fn pairs(lds: usize, precision: Precision) -> Vec<(usize, usize)> {
  enumerate_fusion_pairs(lds, precision, &LaunchPolicy::default())
    .into_iter()
    .map(|p| (p.dim0, p.dim1))
    .collect()
}

#[test]
fn single_precision_inclusions() {
  let single = pairs(65536, Precision::Single);
  for pair in [(128, 32), (32, 128), (64, 32), (256, 4), (81, 27), (243, 9), (125, 25), (32, 81)] {
    assert!(single.contains(&pair), "{pair:?} missing");
  }
}

#[test]
fn single_precision_exclusions() {
  let single = pairs(65536, Precision::Single);
  // (256, 256) needs 786432 bytes; (729, 9) needs 78732.
  // The rest need 1024 or more threads in one pass.
  for pair in [(256, 256), (729, 9), (64, 64), (256, 16), (512, 8), (512, 4), (64, 81), (16, 243)] {
    assert!(!single.contains(&pair), "{pair:?} should be rejected");
  }
}

#[test]
fn double_precision_halves_the_budget() {
  let double = pairs(65536, Precision::Double);
  assert!(!double.contains(&(128, 32)));
  assert!(double.contains(&(64, 32)));
  for (d0, d1) in &double {
    assert!(d0 * d1 * 24 <= 65536);
  }
}

#[test]
fn smaller_budget_drops_pairs() {
  let half = pairs(32768, Precision::Single);
  assert!(!half.contains(&(128, 32)));
  assert!(half.contains(&(64, 32)));
  let full = pairs(65536, Precision::Single);
  assert!(half.iter().all(|p| full.contains(p)));
}

#[test]
fn pass_order_is_preserved() {
  let single = pairs(65536, Precision::Single);
  assert_eq!(single.first(), Some(&(256, 8)));

  let family = |n: usize| [2, 3, 5].into_iter().find(|&b| n % b == 0).unwrap_or(0);
  let passes: Vec<(usize, usize)> = FUSION_PASSES.iter().map(|(a, b)| (a.base, b.base)).collect();
  let mut last = 0;
  for &(d0, d1) in &single {
    let pass = passes.iter().position(|&p| p == (family(d0), family(d1))).unwrap();
    assert!(pass >= last, "{d0}x{d1} out of pass order");
    last = pass;
  }
}

#[test]
fn no_duplicates() {
  for precision in Precision::ALL {
    let all = pairs(0, precision);
    let unique: HashSet<_> = all.iter().collect();
    assert_eq!(unique.len(), all.len());
  }
}

#[test]
fn matches_brute_force() {
  let policy = LaunchPolicy::default();
  for precision in Precision::ALL {
    for lds in [4096, 16384, 32768, 65536] {
      let mut expected = Vec::new();
      for (first, second) in FUSION_PASSES {
        for d0 in first.descending() {
          for d1 in second.descending() {
            if lds_bytes_required(d0, d1, precision).is_none_or(|bytes| bytes > lds) {
              continue;
            }
            let threads = [d0, d1]
              .into_iter()
              .map(|n| {
                let p = policy.launch_params(n).unwrap();
                (d0 * d1) / ((p.transforms_per_group * n) / p.work_group_size)
              })
              .max()
              .unwrap();
            if threads < 1024 {
              expected.push(FusionCandidate::new(d0, d1));
            }
          }
        }
      }
      assert_eq!(enumerate_fusion_pairs(lds, precision, &policy), expected, "{precision} lds={lds}");
    }
  }
}

#[test]
fn heuristic_provider_changes_thread_counts() {
  // Heuristic 8 -> (64, 16): 2 per thread instead of the table's 4.
  let heuristic = Heuristic::new(&DeviceLimits::DEFAULT);
  let table = FusionSearch::new(0, Precision::Single).try_run(&LaunchPolicy::default()).unwrap();
  let plain = FusionSearch::new(0, Precision::Single).try_run(&heuristic).unwrap();
  assert!(table.contains(&FusionCandidate::new(256, 8)));
  assert!(!plain.contains(&FusionCandidate::new(256, 8)));
}

#[test]
fn device_limits_tighten_threads() {
  let limits = DeviceLimits::custom(256, 0);
  let search = FusionSearch::for_limits(&limits, Precision::Single);
  assert_eq!(search.max_threads(), 256);
  let found = search.run(&LaunchPolicy::new(&limits));
  assert!(!found.is_empty());
  assert!(found.len() < pairs(0, Precision::Single).len());
}

#[test]
fn families_cover_expected_ranges() {
  assert_eq!(RadixFamily::POW2.descending().last(), Some(4));
  assert_eq!(RadixFamily::POW3.descending().last(), Some(9));
  assert_eq!(RadixFamily::POW5.descending().next(), Some(625));
}
