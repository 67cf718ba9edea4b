//! Error types for launch-parameter selection.
//!
//! Every variant describes an input the engine cannot serve: a length with
//! prime factors outside the supported radix set, a length missing from a
//! closed table, or a broken arithmetic invariant. None of them are transient.
//! Callers that treat these as programming errors use the panicking entry
//! points; callers that must survive arbitrary input use the `try_*` forms.

use thiserror::Error;

/// Launch-parameter selection failed.
///
/// # Examples
///
/// ```
/// use traits::PlanError;
///
/// let err = PlanError::UnsupportedLength { length: 17, residue: 17 };
/// assert_eq!(err.to_string(), "unsupported length 17: residual factor 17 is not a supported radix");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[non_exhaustive]
pub enum PlanError {
  /// Transform length of zero.
  #[error("transform length must be positive")]
  ZeroLength,

  /// Length contains a prime factor outside {2, 3, 5, 7, 11, 13}.
  ///
  /// `residue` is what is left after dividing out every supported prime.
  #[error("unsupported length {length}: residual factor {residue} is not a supported radix")]
  UnsupportedLength { length: usize, residue: usize },

  /// Length is not one of the block-compute lengths.
  #[error("length {length} has no block-compute entry")]
  NotInBlockTable { length: usize },

  /// The per-work-item element count chosen for a composite length does not divide it.
  #[error("least elements per work item {least} does not divide length {length}")]
  LeastElementsNotDivisor { length: usize, least: usize },

  /// The computed work group exceeds the permitted maximum.
  #[error("work group of {work_group_size} for length {length} exceeds the limit of {max}")]
  WorkGroupOverflow {
    length: usize,
    work_group_size: usize,
    max: usize,
  },

  /// The permitted maximum work-group size is below the engine's floor of 64.
  #[error("maximum work-group size {max} is below the supported minimum of 64")]
  WorkGroupLimitTooSmall { max: usize },

  /// A provider returned parameters that give no usable per-thread element count.
  #[error(
    "launch parameters for length {length} (work group {work_group_size}, {transforms_per_group} per group) \
     give no usable per-thread element count"
  )]
  DegenerateLaunchParams {
    length: usize,
    work_group_size: usize,
    transforms_per_group: usize,
  },

  /// A 2-D size whose point count does not fit in `usize`.
  #[error("2-D size {dim0}x{dim1} overflows the point count")]
  DimensionOverflow { dim0: usize, dim1: usize },
}

impl PlanError {
  /// The transform length the error refers to, when there is one.
  #[inline]
  #[must_use]
  pub const fn length(&self) -> Option<usize> {
    match *self {
      Self::ZeroLength => Some(0),
      Self::UnsupportedLength { length, .. }
      | Self::NotInBlockTable { length }
      | Self::LeastElementsNotDivisor { length, .. }
      | Self::WorkGroupOverflow { length, .. }
      | Self::DegenerateLaunchParams { length, .. } => Some(length),
      Self::WorkGroupLimitTooSmall { .. } | Self::DimensionOverflow { .. } => None,
    }
  }
}
