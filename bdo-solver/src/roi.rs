use bdo_core::models::{CalculationParameters, DAYS_PER_YEAR, Product};

/// The reasons a product cannot be priced at a given bulk quantity.
///
/// These are carried on the result rather than returned as an `Err`: one bad
/// product only drops out of the portfolio totals, it does not fail the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum RoiError {
    /// The product has no sales, so nothing ever depletes
    #[error("Zero velocity")]
    ZeroVelocity,
    /// On-hand plus bulk stock falls short of the minimum days of stock
    #[error("Insufficient stock to meet minimum days requirement")]
    InsufficientStock,
}

/// The investment and return metrics of buying one product in bulk.
///
/// Amounts are in the currency of the product prices; quantities are in units
/// unless named otherwise. When `error` is set every numeric field is zero.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LineItemRoi {
    /// Mean capital tied up while the bulk stock sells through
    pub avg_investment: f64,
    /// Capital tied up on the day of purchase, net of the small-deal alternative
    pub peak_investment: f64,
    /// Price difference earned on the bulk quantity
    pub savings: f64,
    /// Savings over average investment
    pub roi: f64,
    /// ROI scaled to a one-year horizon by the sell-through time
    pub annualized_roi: f64,
    /// Days until the bulk quantity alone sells through
    pub days_to_deplete: f64,
    /// Units a small deal would have bought instead
    pub small_deal_units: f64,
    /// Days of sales covered by on-hand plus bulk stock
    pub days_of_stock: f64,
    /// Why the product could not be priced, if it could not
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub error: Option<RoiError>,
}

impl LineItemRoi {
    fn failed(error: RoiError) -> Self {
        Self {
            error: Some(error),
            ..Default::default()
        }
    }

    /// Whether the metrics may be included in portfolio totals
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// The units bought under the small-deal terms that a bulk purchase of
/// `bulk_cases` replaces: the smaller of the bulk quantity and the small-deal
/// minimum, in units.
pub fn small_deal_units(product: &Product, bulk_cases: u32, small_deal_minimum: u32) -> f64 {
    bulk_cases.min(small_deal_minimum) as f64 * product.units_per_case as f64
}

/// Compute the metrics of buying `bulk_cases` of `product` under `params`.
///
/// The product's own `bulk_cases` field is ignored in favor of the argument,
/// so trial quantities can be priced without cloning the product.
pub fn compute_line_item_roi(
    product: &Product,
    bulk_cases: u32,
    params: &CalculationParameters,
) -> LineItemRoi {
    if product.annual_cases <= 0.0 {
        return LineItemRoi::failed(RoiError::ZeroVelocity);
    }

    let units_per_case = product.units_per_case as f64;
    let bulk_units = bulk_cases as f64 * units_per_case;
    let on_hand_units = product.on_hand_cases * units_per_case;
    let small_deal_units = small_deal_units(product, bulk_cases, params.small_deal_minimum);

    let daily_units = product.annual_units() / DAYS_PER_YEAR;
    let days_to_deplete = bulk_units / daily_units;

    let required_units = daily_units * params.min_days_stock as f64;
    if on_hand_units + bulk_units < required_units {
        return LineItemRoi::failed(RoiError::InsufficientStock);
    }

    let peak_investment = bulk_units * product.price_bulk - small_deal_units * product.price_small;
    let avg_investment = peak_investment * 0.5;
    let savings = (product.price_small - product.price_bulk) * bulk_units;

    let roi = if avg_investment > 0.0 {
        savings / avg_investment
    } else {
        0.0
    };

    // nothing bought, nothing to annualize
    let annualized_roi = if days_to_deplete > 0.0 {
        roi * (DAYS_PER_YEAR / days_to_deplete)
    } else {
        0.0
    };

    LineItemRoi {
        avg_investment,
        peak_investment,
        savings,
        roi,
        annualized_roi,
        days_to_deplete,
        small_deal_units,
        days_of_stock: product.days_of_stock(bulk_cases),
        error: None,
    }
}
