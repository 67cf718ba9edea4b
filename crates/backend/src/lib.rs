//! Launch-parameter decision engine.
//!
//! Given a transform length, this crate decides the work-group size and how
//! many transforms each work group runs; given a shared-memory budget, it
//! lists which pairs of 1-D lengths can be fused into a single 2-D kernel.
//!
//! - **Heuristic** ([`heuristic`]): factor the length over {2, 3, 5, 7, 11, 13},
//!   classify it, and apply the matching tuned rule.
//! - **Policy** ([`policy`]): the tuned small-size table first, the heuristic
//!   for everything else.
//! - **Fusion** ([`fusion`]): shared-memory and thread-count feasibility of
//!   2-D single-kernel transforms.
//!
//! Everything is a pure function of its inputs plus the static tables in
//! `tune`, so all entry points are safe to call from any thread.
//!
//! # Usage
//!
//! ```
//! use backend::{LaunchPolicy, determine_launch_params, enumerate_fusion_pairs};
//! use platform::{DeviceLimits, Precision};
//!
//! let params = determine_launch_params(12, 1024);
//! assert_eq!((params.work_group_size, params.transforms_per_group), (128, 128));
//!
//! let policy = LaunchPolicy::new(&DeviceLimits::DEFAULT);
//! let pairs = enumerate_fusion_pairs(0, Precision::Single, &policy);
//! assert!(pairs.iter().any(|p| (p.dim0, p.dim1) == (128, 32)));
//! ```
//!
//! # Failure Modes
//!
//! Unsupported inputs are errors, never silently replaced. The plain entry
//! points panic with the [`PlanError`](traits::PlanError) message; the
//! `try_*` forms return it.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

pub mod factor;
pub mod family;
pub mod fusion;
pub mod heuristic;
pub mod policy;

pub use factor::PrimeFactorization;
pub use family::LengthFamily;
pub use fusion::{FusionCandidate, FusionSearch, RadixFamily, enumerate_fusion_pairs, try_enumerate_fusion_pairs};
pub use heuristic::{Heuristic, determine_launch_params, try_determine_launch_params};
pub use platform;
pub use policy::{LaunchPolicy, ParamSource};
pub use traits::{LaunchParamProvider, LaunchParams, PlanError};
