use crate::compute_line_item_roi;
use bdo_core::models::{CalculationParameters, Portfolio};

/// Totals across every product that could be priced at its current bulk quantity
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioSummary {
    /// Sum of average investments
    pub total_investment: f64,
    /// Sum of peak investments
    pub total_peak_investment: f64,
    /// Sum of savings
    pub total_savings: f64,
    /// Total savings over total investment, or zero if nothing is invested
    pub roi: f64,
    /// How many products were left out because their metrics carry an error
    pub excluded: usize,
}

/// Aggregate the per-product metrics of `products` at their current bulk
/// quantities. Products with zero velocity or insufficient stock are skipped.
pub fn summarize_portfolio(
    products: &Portfolio,
    params: &CalculationParameters,
) -> PortfolioSummary {
    let mut summary = PortfolioSummary::default();

    for product in products.values() {
        let metrics = compute_line_item_roi(product, product.bulk_cases, params);
        if !metrics.is_ok() {
            summary.excluded += 1;
            continue;
        }
        summary.total_investment += metrics.avg_investment;
        summary.total_peak_investment += metrics.peak_investment;
        summary.total_savings += metrics.savings;
    }

    if summary.total_investment > 0.0 {
        summary.roi = summary.total_savings / summary.total_investment;
    }

    summary
}

/// The portfolio ROI: summed savings over summed average investment
pub fn calculate_portfolio_roi(products: &Portfolio, params: &CalculationParameters) -> f64 {
    summarize_portfolio(products, params).roi
}
