use bdo_core::models::{CalculationParameters, Portfolio};
use tracing::{Level, event};

/// Errors that prevent an initial allocation from being computed
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum AllocationError {
    /// Shares are proportional to velocity, which is undefined for a portfolio
    /// that sells nothing
    #[error("Total annual cases must be greater than zero")]
    NoVelocity,
}

/// Which strategy seeds the bulk quantities before optimization
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum AllocationMode {
    /// Split by annual sales velocity
    #[default]
    Proportional,
    /// Cover minimum-days-of-stock shortfalls first, then split the rest by velocity
    Need,
}

impl AllocationMode {
    /// Allocate `params.deal_size_cases` across `products` with this strategy
    pub fn allocate(
        &self,
        products: &Portfolio,
        params: &CalculationParameters,
    ) -> Result<Portfolio, AllocationError> {
        match self {
            Self::Proportional => allocate_proportional(products, params.deal_size_cases),
            Self::Need => allocate_by_need(products, params.deal_size_cases, params.min_days_stock),
        }
    }
}

/// Split `deal_size_cases` across the portfolio in proportion to annual sales.
///
/// Each product first receives the floor of its exact share; the cases lost to
/// rounding then go one apiece to the products with the largest fractional
/// remainders, earlier products winning ties. The returned bulk quantities
/// always sum to exactly `deal_size_cases`.
pub fn allocate_proportional(
    products: &Portfolio,
    deal_size_cases: u32,
) -> Result<Portfolio, AllocationError> {
    if !(products.total_annual_cases() > 0.0) {
        return Err(AllocationError::NoVelocity);
    }

    let weights = products
        .values()
        .map(|product| product.annual_cases)
        .collect::<Vec<_>>();
    let shares = largest_remainder(&weights, deal_size_cases);

    Ok(assign(products, shares))
}

/// Split `deal_size_cases` by first covering each product's shortfall against
/// `min_days_stock`, then spreading the rest by annual sales.
///
/// A product's shortfall is the cases it needs on top of its on-hand stock to
/// reach the minimum days of stock; products that do not sell need nothing.
/// Each shortfall is met up to its share of the deal, so a budget smaller than
/// the total need is rationed proportionally. When nothing falls short this
/// is exactly [`allocate_proportional`].
pub fn allocate_by_need(
    products: &Portfolio,
    deal_size_cases: u32,
    min_days_stock: u32,
) -> Result<Portfolio, AllocationError> {
    if !(products.total_annual_cases() > 0.0) {
        return Err(AllocationError::NoVelocity);
    }

    let needs = products
        .values()
        .map(|product| {
            if product.annual_cases > 0.0 {
                let shortfall = min_days_stock as f64 - product.days_of_stock(0);
                (shortfall * product.daily_cases()).max(0.0)
            } else {
                0.0
            }
        })
        .collect::<Vec<_>>();
    let total_need = needs.iter().sum::<f64>();

    if !(total_need > 0.0) {
        event!(
            Level::DEBUG,
            min_days_stock,
            "no stock shortfall, falling back to proportional allocation"
        );
        return allocate_proportional(products, deal_size_cases);
    }

    let budget = deal_size_cases as f64;
    let mut shares = needs
        .iter()
        .map(|need| need.floor().min((budget * need / total_need).floor()) as u32)
        .collect::<Vec<_>>();

    // rationing floors every share, so this never underflows
    let covered = shares.iter().map(|&cases| cases as u64).sum::<u64>();
    let remaining = (deal_size_cases as u64).saturating_sub(covered) as u32;
    event!(
        Level::DEBUG,
        covered,
        remaining,
        "allocated cases to cover stock shortfalls"
    );

    let weights = products
        .values()
        .map(|product| product.annual_cases)
        .collect::<Vec<_>>();
    for (share, extra) in shares
        .iter_mut()
        .zip(largest_remainder(&weights, remaining))
    {
        *share += extra;
    }

    Ok(assign(products, shares))
}

fn assign(products: &Portfolio, shares: Vec<u32>) -> Portfolio {
    products
        .iter()
        .zip(shares)
        .map(|((id, product), bulk_cases)| {
            let mut product = product.clone();
            product.bulk_cases = bulk_cases;
            (id.clone(), product)
        })
        .collect()
}

/// Round `budget * weight / total` to integers that sum to `budget` exactly.
///
/// Callers guarantee a positive total weight.
fn largest_remainder(weights: &[f64], budget: u32) -> Vec<u32> {
    let total = weights.iter().sum::<f64>();
    let mut shares = Vec::with_capacity(weights.len());
    let mut remainders = Vec::with_capacity(weights.len());
    for weight in weights {
        // Remainders stay numerators over `total`: for whole-number weights
        // `budget * weight` and its remainder are exact, so ties stay ties
        let scaled = budget as f64 * weight;
        let remainder = scaled.rem_euclid(total);
        shares.push(((scaled - remainder) / total).round() as u32);
        remainders.push(remainder);
    }

    // A stable sort keeps input order among equal remainders
    let mut order = (0..weights.len()).collect::<Vec<_>>();
    order.sort_by(|&a, &b| remainders[b].total_cmp(&remainders[a]));

    let assigned = shares.iter().map(|&cases| cases as u64).sum::<u64>();
    let budget = budget as u64;

    if assigned < budget {
        // Rounding drift can leave more cases than products; keep cycling
        let leftover = (budget - assigned) as usize;
        for &i in order.iter().cycle().take(leftover) {
            shares[i] += 1;
        }
    } else if assigned > budget {
        let mut excess = assigned - budget;
        for &i in order.iter().rev().cycle() {
            if excess == 0 {
                break;
            }
            if shares[i] > 0 {
                shares[i] -= 1;
                excess -= 1;
            }
        }
    }

    shares
}
