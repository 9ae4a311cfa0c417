use approx::assert_abs_diff_eq;
use bdo_core::models::{CalculationParameters, ParameterError, Portfolio, Product, ProductError};
use bdo_solver::{
    AllocationError, AllocationMode, Error, History, HistoryEntry, RoiError, calculate, optimize,
    prepare, run_iterations,
};
use rstest::*;

mod common;
use common::{bulk_cases, params, product, two_products, two_products_allocated, with_bulk};

#[rstest]
fn calculates_every_product(two_products_allocated: Portfolio, params: CalculationParameters) {
    let report = calculate(&two_products_allocated, &params);

    assert!(report.products.keys().eq(two_products_allocated.keys()));
    assert_abs_diff_eq!(report.total_investment, 720.0, epsilon = 1e-9);
    assert_abs_diff_eq!(report.total_savings, 360.0, epsilon = 1e-9);
    assert_abs_diff_eq!(report.portfolio_roi, 0.5, epsilon = 1e-12);

    let bravo = &report.products["b"];
    assert_eq!(bravo.product.bulk_cases, 6);
    assert_abs_diff_eq!(bravo.metrics.savings, 72.0, epsilon = 1e-9);
    assert_abs_diff_eq!(bravo.metrics.avg_investment, 324.0, epsilon = 1e-9);
}

#[rstest]
fn calculation_keeps_errored_products(
    two_products_allocated: Portfolio,
    params: CalculationParameters,
) {
    let mut portfolio = two_products_allocated;
    portfolio.insert("idle".into(), with_bulk(product("Idle", 0.0, 5.0, 4.0), 2));

    let report = calculate(&portfolio, &params);
    assert_eq!(report.products.len(), 3);
    assert_eq!(
        report.products["idle"].metrics.error,
        Some(RoiError::ZeroVelocity)
    );
    assert_abs_diff_eq!(report.portfolio_roi, 0.5, epsilon = 1e-12);
}

#[rstest]
fn optimizes_and_reports(two_products_allocated: Portfolio, params: CalculationParameters) {
    let report = optimize(&two_products_allocated, &params);

    assert_eq!(report.total_iterations, 3);
    assert_eq!(report.history.len(), 3);
    assert_abs_diff_eq!(report.calculation.portfolio_roi, 384.0 / 588.0, epsilon = 1e-12);
    assert_eq!(report.calculation.products["a"].product.bulk_cases, 14);
}

#[rstest]
fn prepare_allocates_on_request(two_products: Portfolio, params: CalculationParameters) {
    let prepared = prepare(two_products, &params, Some(AllocationMode::Proportional)).unwrap();
    assert_eq!(bulk_cases(&prepared), vec![12, 6]);
}

#[rstest]
fn prepare_keeps_supplied_quantities(
    two_products_allocated: Portfolio,
    params: CalculationParameters,
) {
    let mut portfolio = two_products_allocated;
    portfolio["a"].bulk_cases = 3;

    let prepared = prepare(portfolio.clone(), &params, None).unwrap();
    assert_eq!(prepared, portfolio);
}

#[rstest]
fn prepare_rejects_bad_requests(two_products: Portfolio, params: CalculationParameters) {
    assert_eq!(
        prepare(Portfolio::default(), &params, None),
        Err(Error::EmptyPortfolio)
    );

    let zero_deal = CalculationParameters {
        deal_size_cases: 0,
        small_deal_minimum: 0,
        ..params.clone()
    };
    assert_eq!(
        prepare(two_products.clone(), &zero_deal, None),
        Err(Error::Parameters(ParameterError::ZeroDealSize))
    );

    let mut broken = two_products.clone();
    broken["b"].units_per_case = 0;
    assert_eq!(
        prepare(broken, &params, None),
        Err(Error::Product("b".into(), ProductError::ZeroUnitsPerCase))
    );

    let idle = two_products
        .into_iter()
        .map(|(id, product)| {
            (id, Product {
                annual_cases: 0.0,
                ..product
            })
        })
        .collect::<Portfolio>();
    assert_eq!(
        prepare(idle, &params, Some(AllocationMode::Need)),
        Err(Error::Allocation(AllocationError::NoVelocity))
    );
}

#[test]
fn error_messages() {
    assert_eq!(
        Error::EmptyPortfolio.to_string(),
        "At least one product is required"
    );
    assert_eq!(
        Error::Product("b".into(), ProductError::NegativePrice).to_string(),
        "Invalid product \"b\": Prices cannot be negative"
    );
    assert_eq!(
        Error::from(AllocationError::NoVelocity).to_string(),
        "Total annual cases must be greater than zero"
    );
}

#[rstest]
fn history_separates_runs(two_products_allocated: Portfolio, params: CalculationParameters) {
    let first = run_iterations(&two_products_allocated, &params);
    let second = run_iterations(&first.products, &params);

    let mut history = History::default();
    history.push_run(first.history.clone());
    assert_eq!(history.runs(), 1);
    assert_eq!(history.entries().len(), 3);

    history.push_run(Vec::new());
    assert_eq!(history.runs(), 1);

    history.push_run(second.history.clone());
    assert_eq!(history.runs(), 2);
    assert_eq!(history.entries()[3], HistoryEntry::Separator);
    assert_eq!(
        history.records().count(),
        first.history.len() + second.history.len()
    );
    // the second run starts where the first ended
    assert_eq!(history.records().nth(3), second.history.first());
}

#[rstest]
fn history_serializes_separators(two_products_allocated: Portfolio, params: CalculationParameters) {
    let outcome = run_iterations(&two_products_allocated, &params);
    let mut history = History::default();
    history.push_run(outcome.history.clone());
    history.push_run(outcome.history);

    let json = serde_json::to_value(&history).unwrap();
    let rows = json.as_array().unwrap();
    assert_eq!(rows.len(), 7);
    assert_eq!(rows[3], serde_json::json!({"separator": true}));
    assert!(rows[0].get("swap").is_none());
    assert_eq!(rows[1]["swap"], serde_json::json!({"from": "Bravo", "to": "Alpha"}));
    assert_eq!(rows[1]["products"]["a"]["bulk_cases"], serde_json::json!(13));
}

#[rstest]
fn report_serializes_in_input_order(params: CalculationParameters) {
    // ids deliberately out of alphabetical order
    let portfolio = [
        ("z", with_bulk(product("Alpha", 120.0, 10.0, 8.0), 12)),
        ("a", with_bulk(product("Bravo", 60.0, 20.0, 19.0), 6)),
    ]
    .into_iter()
    .map(|(id, product)| (id.into(), product))
    .collect::<Portfolio>();

    let report = optimize(&portfolio, &params);
    assert_eq!(
        report
            .calculation
            .products
            .keys()
            .map(ToString::to_string)
            .collect::<Vec<_>>(),
        vec!["z", "a"]
    );

    let text = serde_json::to_string(&report).unwrap();
    let products = &text[text.find("\"products\"").unwrap()..];
    assert!(products.find("\"z\"").unwrap() < products.find("\"a\"").unwrap());

    let json = serde_json::from_str::<serde_json::Value>(&text).unwrap();
    assert_eq!(json["total_iterations"], serde_json::json!(3));
    let bravo = &json["calculation"]["products"]["a"];
    assert_eq!(bravo["product"]["bulk_cases"], serde_json::json!(4));
    assert!(bravo["metrics"]["annualized_roi"].is_f64());
}
