use super::{DAYS_PER_YEAR, Map};
use std::{borrow::Borrow, fmt};

/// A key identifying a product within a single calculation request.
///
/// Keys are only required to be unique within one request; they are not
/// persistent identities.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct ProductId(String);

impl From<String> for ProductId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ProductId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl Borrow<str> for ProductId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One SKU under consideration for a bulk deal.
///
/// Quantities are tracked in cases; `units_per_case` converts them to units
/// (e.g. bottles), which is the granularity prices are quoted in.
///
/// Direct construction does not validate. Products deserialized through
/// [`ProductDto`] are always validated; products built in code should call
/// [`Product::validate`] before being handed to the solver.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ProductDto", into = "ProductDto")
)]
pub struct Product {
    /// Display label, also used to name the two sides of a swap
    pub name: String,
    /// Price per unit under the small-deal terms
    pub price_small: f64,
    /// Price per unit under the bulk-deal terms
    pub price_bulk: f64,
    /// Annual sales velocity, in cases
    pub annual_cases: f64,
    /// Units per case, at least 1
    pub units_per_case: u32,
    /// Current inventory, in cases
    pub on_hand_cases: f64,
    /// The bulk-deal quantity under evaluation, in cases
    pub bulk_cases: u32,
}

impl Product {
    /// Annual sales velocity in units
    pub fn annual_units(&self) -> f64 {
        self.annual_cases * self.units_per_case as f64
    }

    /// Daily sales velocity in cases
    pub fn daily_cases(&self) -> f64 {
        self.annual_cases / DAYS_PER_YEAR
    }

    /// Days of sales covered by the on-hand inventory plus `bulk_cases`.
    ///
    /// A product that does not sell is covered forever.
    pub fn days_of_stock(&self, bulk_cases: u32) -> f64 {
        let daily = self.daily_cases();
        if daily > 0.0 {
            (self.on_hand_cases + bulk_cases as f64) / daily
        } else {
            f64::INFINITY
        }
    }

    /// Whether on-hand plus the current bulk quantity covers `min_days_stock`
    /// days of sales. A floor of zero disables the check.
    pub fn meets_min_days_stock(&self, min_days_stock: u32) -> bool {
        if min_days_stock == 0 {
            return true;
        }
        self.on_hand_cases + self.bulk_cases as f64 >= self.daily_cases() * min_days_stock as f64
    }

    /// Check the invariants that deserialization enforces.
    pub fn validate(&self) -> Result<(), ProductError> {
        if self.name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }

        let numbers = [
            self.price_small,
            self.price_bulk,
            self.annual_cases,
            self.on_hand_cases,
        ];
        if numbers.iter().any(|x| x.is_nan()) {
            return Err(ProductError::NaN);
        }
        if numbers.iter().any(|x| x.is_infinite()) {
            return Err(ProductError::Infinite);
        }

        if self.price_small < 0.0 || self.price_bulk < 0.0 {
            return Err(ProductError::NegativePrice);
        }
        if self.annual_cases < 0.0 {
            return Err(ProductError::NegativeVelocity);
        }
        if self.on_hand_cases < 0.0 {
            return Err(ProductError::NegativeStock);
        }
        if self.units_per_case == 0 {
            return Err(ProductError::ZeroUnitsPerCase);
        }

        Ok(())
    }
}

/// A DTO to ensure that we always validate when we deserialize from an untrusted source
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug)]
pub struct ProductDto {
    /// Display label
    pub name: String,
    /// Price per unit under the small-deal terms
    pub price_small: f64,
    /// Price per unit under the bulk-deal terms
    pub price_bulk: f64,
    /// Annual sales velocity, in cases
    pub annual_cases: f64,
    /// Units per case
    pub units_per_case: u32,
    /// Current inventory in cases, defaulting to zero
    #[cfg_attr(feature = "serde", serde(default))]
    pub on_hand_cases: f64,
    /// Bulk-deal quantity in cases, defaulting to zero (i.e. not yet allocated)
    #[cfg_attr(feature = "serde", serde(default))]
    pub bulk_cases: u32,
}

impl TryFrom<ProductDto> for Product {
    type Error = ProductError;

    fn try_from(value: ProductDto) -> Result<Self, Self::Error> {
        let ProductDto {
            name,
            price_small,
            price_bulk,
            annual_cases,
            units_per_case,
            on_hand_cases,
            bulk_cases,
        } = value;

        let product = Self {
            name,
            price_small,
            price_bulk,
            annual_cases,
            units_per_case,
            on_hand_cases,
            bulk_cases,
        };
        product.validate()?;
        Ok(product)
    }
}

impl From<Product> for ProductDto {
    fn from(value: Product) -> Self {
        Self {
            name: value.name,
            price_small: value.price_small,
            price_bulk: value.price_bulk,
            annual_cases: value.annual_cases,
            units_per_case: value.units_per_case,
            on_hand_cases: value.on_hand_cases,
            bulk_cases: value.bulk_cases,
        }
    }
}

/// Errors that can occur when validating a product
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ProductError {
    /// The display name is empty or whitespace
    #[error("Product name must be a non-empty string")]
    EmptyName,
    /// A price, velocity or stock figure is NaN
    #[error("NaN value encountered")]
    NaN,
    /// A price, velocity or stock figure is infinite
    #[error("Infinite value encountered")]
    Infinite,
    /// A price is below zero
    #[error("Prices cannot be negative")]
    NegativePrice,
    /// The annual velocity is below zero
    #[error("Annual cases cannot be negative")]
    NegativeVelocity,
    /// The on-hand inventory is below zero
    #[error("Cases on hand cannot be negative")]
    NegativeStock,
    /// A case must hold at least one unit
    #[error("Units per case must be at least 1")]
    ZeroUnitsPerCase,
}

/// The ordered set of products in a calculation request.
///
/// Iteration order is the input order, which the allocators and the
/// optimizer rely on for deterministic tie-breaking.
pub type Portfolio = Map<ProductId, Product>;

impl Map<ProductId, Product> {
    /// Total bulk cases allocated across the portfolio
    pub fn total_bulk_cases(&self) -> u64 {
        self.values().map(|product| product.bulk_cases as u64).sum()
    }

    /// Total annual velocity across the portfolio, in cases
    pub fn total_annual_cases(&self) -> f64 {
        self.values().map(|product| product.annual_cases).sum()
    }

    /// Validate every product, reporting the first offender by key
    pub fn validate(&self) -> Result<(), (ProductId, ProductError)> {
        for (id, product) in self.iter() {
            product.validate().map_err(|err| (id.clone(), err))?;
        }
        Ok(())
    }
}
