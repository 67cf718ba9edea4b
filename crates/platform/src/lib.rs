//! Precision and device limits for radixplan.
//!
//! This crate is the single source of truth for the two numbers the decision
//! engine takes from the device, and for the element width of each precision.
//!
//! # Core Types
//!
//! - [`Precision`]: single or double; resolves to a width factor and byte sizes
//! - [`DeviceLimits`]: maximum work-group size and shared-memory (LDS) budget
//!
//! # Main Entry Point
//!
//! ```
//! use platform::{DeviceLimits, Precision};
//!
//! assert_eq!(Precision::Double.width(), 2);
//! assert_eq!(Precision::Double.large_1d_threshold(), 2048);
//!
//! let limits = DeviceLimits::DEFAULT;
//! assert_eq!(limits.max_work_group_size, 1024);
//! assert_eq!(limits.lds_bytes, 64 * 1024);
//! ```
//!
//! With `std`, [`config::get()`] applies `RADIXPLAN_*` environment overrides
//! on top of [`DeviceLimits::DEFAULT`].
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod limits;
pub mod precision;

pub use limits::{DeviceLimits, LimitsKind, MAX_LDS_BYTES, MAX_WORK_GROUP_SIZE, MIN_WORK_GROUP_LIMIT};
pub use precision::Precision;
