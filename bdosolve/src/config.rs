//! Application configuration management.
//!
//! Parameters can come from default values, a TOML file and environment
//! variables. Values in a request take precedence over all of these.

use crate::{Cli, CliError};
use bdo_core::models::CalculationParameters;
use serde::{Deserialize, Serialize};

/// The configuration of the tool
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AppConfig {
    /// Calculation parameters used when a request does not supply them
    #[serde(default)]
    pub parameters: CalculationParameters,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. Config file given by the CLI
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `BDO_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Evaluate a 48 case deal
    /// export BDO_PARAMETERS__DEAL_SIZE_CASES=48
    ///
    /// # Cap the optimizer at 20 passes
    /// export BDO_PARAMETERS__ITERATIONS=20
    /// ```
    pub fn load(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = &cli.config {
            if path.exists() {
                config = config.add_source(config::File::from(path.as_path()))
            } else {
                return Err(CliError::MissingConfig(path.clone()).into());
            }
        }

        // This maps BDO_PARAMETERS__DEAL_SIZE_CASES to parameters.deal_size_cases
        config = config.add_source(
            config::Environment::with_prefix("BDO")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        let loaded: Self = built_config.try_deserialize()?;
        loaded.parameters.validate()?;
        Ok(loaded)
    }
}
