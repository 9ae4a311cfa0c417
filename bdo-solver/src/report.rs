use crate::{
    AllocationMode, Error, IterationRecord, LineItemRoi, compute_line_item_roi, run_iterations,
    summarize_portfolio,
};
use bdo_core::models::{CalculationParameters, Map, Portfolio, Product, ProductId};
use tracing::{Level, event, span};

/// A product alongside its metrics at its current bulk quantity
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProductReport {
    /// The product as evaluated
    pub product: Product,
    /// Its metrics, possibly carrying an error
    pub metrics: LineItemRoi,
}

/// Per-product metrics and portfolio totals for one allocation
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalculationReport {
    /// Every product in input order
    pub products: Map<ProductId, ProductReport>,
    /// Sum of average investments of the products that could be priced
    pub total_investment: f64,
    /// Sum of their savings
    pub total_savings: f64,
    /// Total savings over total investment
    pub portfolio_roi: f64,
}

/// An optimized allocation with the search that produced it
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationReport {
    /// Metrics of the optimized allocation
    pub calculation: CalculationReport,
    /// The starting record and every accepted swap
    pub history: Vec<IterationRecord>,
    /// How many passes the search ran
    pub total_iterations: u32,
}

/// Price every product at its current bulk quantity and total the portfolio
pub fn calculate(products: &Portfolio, params: &CalculationParameters) -> CalculationReport {
    let summary = summarize_portfolio(products, params);
    let products = products
        .iter()
        .map(|(id, product)| {
            let metrics = compute_line_item_roi(product, product.bulk_cases, params);
            if let Some(err) = metrics.error {
                event!(Level::DEBUG, product = %id, err = err.to_string());
            }
            (
                id.clone(),
                ProductReport {
                    product: product.clone(),
                    metrics,
                },
            )
        })
        .collect();

    CalculationReport {
        products,
        total_investment: summary.total_investment,
        total_savings: summary.total_savings,
        portfolio_roi: summary.roi,
    }
}

/// Run the local search from the current allocation and report on where it ends
pub fn optimize(products: &Portfolio, params: &CalculationParameters) -> OptimizationReport {
    let outcome = run_iterations(products, params);
    OptimizationReport {
        calculation: calculate(&outcome.products, params),
        history: outcome.history,
        total_iterations: outcome.total_iterations,
    }
}

/// Validate a request and, if asked, seed its bulk quantities.
///
/// Without an allocation mode the bulk quantities supplied with the products
/// are kept as they are.
pub fn prepare(
    products: Portfolio,
    params: &CalculationParameters,
    allocation: Option<AllocationMode>,
) -> Result<Portfolio, Error> {
    let span = span!(Level::INFO, "preparing request", products = products.len());
    let _guard = span.enter();

    if products.is_empty() {
        return Err(Error::EmptyPortfolio);
    }
    products.validate()?;
    params.validate()?;

    for (id, product) in products.iter() {
        if product.price_bulk > product.price_small {
            event!(
                Level::WARN,
                product = %id,
                price_small = product.price_small,
                price_bulk = product.price_bulk,
                "bulk price is above the small-deal price; savings will be negative"
            );
        }
    }

    match allocation {
        Some(mode) => {
            let allocated = mode.allocate(&products, params).inspect_err(|err| {
                event!(Level::ERROR, err = err.to_string());
            })?;
            Ok(allocated)
        }
        None => Ok(products),
    }
}
