use crate::{calculate_portfolio_roi, compute_line_item_roi};
use bdo_core::models::{CalculationParameters, Portfolio};
use tracing::{Level, event, span};

/// A single case moved between two products, named by display name
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Swap {
    /// The product that gave up a case
    pub from: String,
    /// The product that received it
    pub to: String,
}

/// The state of the search after the initial allocation or an accepted swap
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IterationRecord {
    /// The pass that produced this state; 0 for the starting allocation
    pub iteration: u32,
    /// Portfolio ROI of this state
    pub total_roi: f64,
    /// The move that produced this state, absent on the starting record
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub swap: Option<Swap>,
    /// The full allocation at this point
    pub products: Portfolio,
}

/// The result of a local-search run
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationOutcome {
    /// The allocation the search ended on
    pub products: Portfolio,
    /// The starting record followed by one record per accepted swap
    pub history: Vec<IterationRecord>,
    /// How many passes ran, including the final one that found nothing
    pub total_iterations: u32,
    /// Portfolio ROI of `products`
    pub final_roi: f64,
}

/// Improve the allocation of `products` by moving one case at a time.
///
/// Each pass prices every product at its current bulk quantity, picks the
/// lowest annualized ROI among products holding a case (the donor) and the
/// highest among products holding at least one case but less than a year of
/// sales (the receiver), and tries moving one case from donor to receiver. The
/// first product seen wins ties. The move is kept only if both products still meet the minimum
/// days of stock and the portfolio ROI strictly increases.
///
/// The search stops after the first pass that keeps nothing, or when the pass
/// cap of `params.iterations` is reached. The total bulk quantity never
/// changes, and `products` itself is left untouched.
pub fn run_iterations(
    products: &Portfolio,
    params: &CalculationParameters,
) -> OptimizationOutcome {
    let span = span!(Level::INFO, "optimizing allocation", products = products.len());
    let _guard = span.enter();

    let mut current = products.clone();
    let mut portfolio_roi = calculate_portfolio_roi(&current, params);
    let mut history = vec![IterationRecord {
        iteration: 0,
        total_roi: portfolio_roi,
        swap: None,
        products: current.clone(),
    }];

    let cap = params.iterations.cap();
    let mut count = 0;
    let mut improved = true;

    while improved && count < cap {
        improved = false;
        count += 1;

        let Some((donor, receiver)) = select_candidates(&current, params) else {
            event!(Level::DEBUG, iteration = count, "no swap candidates");
            continue;
        };
        if donor == receiver {
            event!(
                Level::DEBUG,
                iteration = count,
                "lowest and highest performer coincide"
            );
            continue;
        }

        let mut trial = current.clone();
        if let Some((_, product)) = trial.get_index_mut(donor) {
            product.bulk_cases -= 1;
        }
        if let Some((_, product)) = trial.get_index_mut(receiver) {
            product.bulk_cases += 1;
        }
        let (Some((_, from)), Some((_, to))) =
            (trial.get_index(donor), trial.get_index(receiver))
        else {
            continue;
        };

        if !from.meets_min_days_stock(params.min_days_stock)
            || !to.meets_min_days_stock(params.min_days_stock)
        {
            event!(
                Level::DEBUG,
                iteration = count,
                from = %from.name,
                to = %to.name,
                "swap rejected by minimum days of stock"
            );
            continue;
        }

        let trial_roi = calculate_portfolio_roi(&trial, params);
        if trial_roi > portfolio_roi {
            event!(
                Level::DEBUG,
                iteration = count,
                from = %from.name,
                to = %to.name,
                roi = trial_roi,
                "swap accepted"
            );
            let swap = Swap {
                from: from.name.clone(),
                to: to.name.clone(),
            };
            current = trial;
            portfolio_roi = trial_roi;
            improved = true;
            history.push(IterationRecord {
                iteration: count,
                total_roi: portfolio_roi,
                swap: Some(swap),
                products: current.clone(),
            });
        } else {
            event!(
                Level::DEBUG,
                iteration = count,
                from = %from.name,
                to = %to.name,
                roi = trial_roi,
                "swap does not improve portfolio roi"
            );
        }
    }

    event!(
        Level::INFO,
        total_iterations = count,
        accepted = history.len() - 1,
        final_roi = portfolio_roi,
        "optimization finished"
    );

    OptimizationOutcome {
        products: current,
        history,
        total_iterations: count,
        final_roi: portfolio_roi,
    }
}

/// Indices of the donor and receiver for the next pass, if both exist
fn select_candidates(
    products: &Portfolio,
    params: &CalculationParameters,
) -> Option<(usize, usize)> {
    let mut donor: Option<(usize, f64)> = None;
    let mut receiver: Option<(usize, f64)> = None;

    for (index, product) in products.values().enumerate() {
        let roi = compute_line_item_roi(product, product.bulk_cases, params).annualized_roi;

        if product.bulk_cases > 0 && donor.is_none_or(|(_, lowest)| roi < lowest) {
            donor = Some((index, roi));
        }
        // a product holding nothing has no meaningful return to compare
        if product.bulk_cases > 0
            && (product.bulk_cases as f64) < product.annual_cases
            && receiver.is_none_or(|(_, highest)| roi > highest)
        {
            receiver = Some((index, roi));
        }
    }

    Some((donor?.0, receiver?.0))
}
