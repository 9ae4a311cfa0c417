mod map;
mod parameters;
mod product;

pub use map::Map;
pub use parameters::{AUTO_ITERATION_LIMIT, CalculationParameters, IterationMode, ParameterError};
pub use product::{Portfolio, Product, ProductDto, ProductError, ProductId};

/// Days per year used for every velocity conversion.
pub const DAYS_PER_YEAR: f64 = 365.0;
