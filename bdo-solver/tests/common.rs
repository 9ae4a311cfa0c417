#![allow(dead_code)]
use bdo_core::models::{CalculationParameters, IterationMode, Portfolio, Product};
use rstest::fixture;

pub fn product(name: &str, annual_cases: f64, price_small: f64, price_bulk: f64) -> Product {
    Product {
        name: name.to_string(),
        price_small,
        price_bulk,
        annual_cases,
        units_per_case: 12,
        on_hand_cases: 0.0,
        bulk_cases: 0,
    }
}

pub fn with_bulk(product: Product, bulk_cases: u32) -> Product {
    Product {
        bulk_cases,
        ..product
    }
}

/// Two products, 120 and 60 cases a year, priced so that the faster seller
/// also saves more per unit
#[fixture]
pub fn two_products() -> Portfolio {
    [
        ("a", product("Alpha", 120.0, 10.0, 8.0)),
        ("b", product("Bravo", 60.0, 20.0, 19.0)),
    ]
    .into_iter()
    .map(|(id, product)| (id.into(), product))
    .collect()
}

/// The same portfolio with the proportional split of an 18-case deal applied
#[fixture]
pub fn two_products_allocated() -> Portfolio {
    let mut portfolio = two_products();
    portfolio["a"].bulk_cases = 12;
    portfolio["b"].bulk_cases = 6;
    portfolio
}

#[fixture]
pub fn params() -> CalculationParameters {
    CalculationParameters {
        deal_size_cases: 18,
        small_deal_minimum: 3,
        min_days_stock: 0,
        payment_terms_days: 30,
        iterations: IterationMode::Auto,
    }
}

pub fn bulk_cases(portfolio: &Portfolio) -> Vec<u32> {
    portfolio.values().map(|product| product.bulk_cases).collect()
}
