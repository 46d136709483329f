#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for pipeleak
//!
//! This library holds all of the functionality behind the `pipeleak` tool, a purely
//! decorative progress indicator that fills, leaks, drains, and repairs itself on a loop.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface, configuration, and the terminal surface
//! - [`driver`]: The simulated progress state machine and its timers

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

pub mod driver;

pub use crate::commands::{Host, run};
