//! Runtime configuration (environment overrides on top of a preset).
//!
//! Recognised variables:
//! - `RADIXPLAN_MAX_WORK_GROUP_SIZE`: maximum threads per work group
//! - `RADIXPLAN_LDS_BYTES`: shared-memory budget per work group (0 = maximum)
//!
//! Overrides are read once per process. Values are clamped: the work-group
//! limit to `[MIN_WORK_GROUP_LIMIT, MAX_WORK_GROUP_SIZE]`, the LDS budget via
//! [`DeviceLimits::effective_lds_bytes`].

use crate::limits::{DeviceLimits, LimitsKind, MAX_WORK_GROUP_SIZE, MIN_WORK_GROUP_LIMIT};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct Overrides {
  max_work_group_size: Option<usize>,
  lds_bytes: Option<usize>,
}

impl Overrides {
  const fn is_empty(&self) -> bool {
    self.max_work_group_size.is_none() && self.lds_bytes.is_none()
  }
}

#[cfg(feature = "std")]
fn read_env_overrides() -> Overrides {
  fn parse_usize(name: &str) -> Option<usize> {
    let value = std::env::var(name).ok()?;
    let value = value.trim();
    if value.is_empty() {
      return None;
    }
    match value.parse::<usize>() {
      Ok(v) => Some(v),
      Err(_) => {
        tracing::warn!(variable = name, value, "ignoring malformed override");
        None
      }
    }
  }

  Overrides {
    max_work_group_size: parse_usize("RADIXPLAN_MAX_WORK_GROUP_SIZE"),
    lds_bytes: parse_usize("RADIXPLAN_LDS_BYTES"),
  }
}

#[cfg(feature = "std")]
fn overrides() -> Overrides {
  use std::sync::OnceLock;
  static OVERRIDES: OnceLock<Overrides> = OnceLock::new();
  *OVERRIDES.get_or_init(read_env_overrides)
}

#[cfg(not(feature = "std"))]
fn overrides() -> Overrides {
  Overrides::default()
}

#[must_use]
fn apply(base: DeviceLimits, ov: Overrides) -> DeviceLimits {
  if ov.is_empty() {
    return base;
  }

  let mut limits = base;
  if let Some(v) = ov.max_work_group_size {
    let clamped = v.clamp(MIN_WORK_GROUP_LIMIT, MAX_WORK_GROUP_SIZE);
    if clamped != v {
      tracing::warn!(requested = v, clamped, "work-group limit override clamped");
    }
    limits.max_work_group_size = clamped;
  }
  if let Some(v) = ov.lds_bytes {
    limits.lds_bytes = DeviceLimits::effective_lds_bytes(v);
  }
  limits.with_kind(LimitsKind::Environment)
}

/// Get the effective device limits for this process.
#[inline]
#[must_use]
pub fn get() -> DeviceLimits {
  apply(DeviceLimits::DEFAULT, overrides())
}
