#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/// Core domain models for the bulk-deal optimizer.
///
/// This module contains the fundamental data structures that describe a
/// buying decision: the products under consideration, the portfolio that
/// orders them, and the parameters of a calculation.
///
/// The models in this module are primarily data structures with minimal
/// business logic, so that the solver can treat them as plain values and
/// copy them freely between trial allocations.
pub mod models;
