//! # ql-core
//!
//! Core types and error definitions shared by every crate in the Monte Carlo
//! asset simulation workspace.
//!
//! This crate provides the foundational building blocks: type aliases for the
//! quantities that flow through the simulation (times, rates, volatilities),
//! the error hierarchy, and the `ensure!` macro.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types and the `ensure!` macro.
pub mod errors;

// ── Primitive type aliases ────────────────────────────────────────────────────

/// Floating-point type used throughout the library.
pub type Real = f64;

/// A rate expressed as a decimal (e.g. 0.05 = 5 %).
pub type Rate = Real;

/// A volatility level expressed as a decimal.
pub type Volatility = Real;

/// A time measurement in years.
pub type Time = Real;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
