use bdo_core::models::{CalculationParameters, IterationMode, Portfolio};
use serde::Deserialize;

/// A calculation request as read from JSON
#[derive(Debug, Deserialize)]
pub struct Request {
    /// Parameters that should differ from the configured ones
    #[serde(default)]
    pub parameters: ParameterOverrides,
    /// The products to evaluate, in order
    pub products: Portfolio,
}

/// A partial parameter set; every field that is present replaces the
/// corresponding configured value
#[derive(Debug, Default, Deserialize)]
pub struct ParameterOverrides {
    /// Total bulk-deal budget, in cases
    pub deal_size_cases: Option<u32>,
    /// Largest small-deal quantity, in cases
    pub small_deal_minimum: Option<u32>,
    /// Minimum days of stock
    pub min_days_stock: Option<u32>,
    /// Supplier payment terms, in days
    pub payment_terms_days: Option<u32>,
    /// Optimizer pass limit
    pub iterations: Option<IterationMode>,
}

impl ParameterOverrides {
    /// Layer these overrides on top of `base`
    pub fn apply(self, base: CalculationParameters) -> CalculationParameters {
        CalculationParameters {
            deal_size_cases: self.deal_size_cases.unwrap_or(base.deal_size_cases),
            small_deal_minimum: self.small_deal_minimum.unwrap_or(base.small_deal_minimum),
            min_days_stock: self.min_days_stock.unwrap_or(base.min_days_stock),
            payment_terms_days: self.payment_terms_days.unwrap_or(base.payment_terms_days),
            iterations: self.iterations.unwrap_or(base.iterations),
        }
    }
}
