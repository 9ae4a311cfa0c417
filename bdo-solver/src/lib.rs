#![warn(missing_docs)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/README.md"))]

/**
 * Per-product investment and return metrics.
 */
mod roi;
pub use roi::*;

/**
 * Initial splits of the deal budget across a portfolio.
 */
mod allocate;
pub use allocate::*;

/**
 * Portfolio-level aggregation of the per-product metrics.
 */
mod portfolio;
pub use portfolio::*;

/**
 * The greedy one-case-at-a-time reallocation search.
 */
mod optimize;
pub use optimize::*;

/**
 * Cumulative history of several optimizer runs.
 */
mod history;
pub use history::*;

/**
 * Request-level entry points that combine validation, allocation and reporting.
 */
mod report;
pub use report::*;

use bdo_core::models::{ParameterError, ProductError, ProductId};

/// Errors that abort a request before any metrics are produced
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum Error {
    /// The request did not name any products
    #[error("At least one product is required")]
    EmptyPortfolio,
    /// A product failed validation
    #[error("Invalid product \"{0}\": {1}")]
    Product(ProductId, ProductError),
    /// The parameter set failed validation
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    /// The initial allocation could not be computed
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

impl From<(ProductId, ProductError)> for Error {
    fn from((id, err): (ProductId, ProductError)) -> Self {
        Self::Product(id, err)
    }
}
