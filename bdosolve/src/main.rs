use bdo_core::models::{CalculationParameters, Portfolio};
use bdo_solver::{calculate, optimize, prepare};
use bdosolve::{AppConfig, Cli, Commands, IOArgs, Request};
use tracing::{Level, event};
use tracing_subscriber::{layer::SubscriberExt as _, util::SubscriberInitExt as _};

pub fn main() -> anyhow::Result<()> {
    // Logs go to stderr so that stdout carries nothing but the JSON result
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::import().unwrap_or_else(|err| err.exit());
    let AppConfig { parameters } = AppConfig::load(&cli)?;

    match cli.command {
        Commands::Allocate { io, mode } => {
            let (products, params) = read(&io, parameters)?;
            let allocated = prepare(products, &params, Some(mode.into()))?;
            serde_json::to_writer_pretty(io.write()?, &allocated)?;
        }
        Commands::Calculate { io, allocate } => {
            let (products, params) = read(&io, parameters)?;
            let products = prepare(products, &params, allocate.map(Into::into))?;
            let report = calculate(&products, &params);
            serde_json::to_writer_pretty(io.write()?, &report)?;
        }
        Commands::Optimize {
            io,
            allocate,
            iterations,
        } => {
            let (products, mut params) = read(&io, parameters)?;
            if let Some(iterations) = iterations {
                params.iterations = iterations;
            }
            let products = prepare(products, &params, allocate.map(Into::into))?;
            let report = optimize(&products, &params);
            serde_json::to_writer_pretty(io.write()?, &report)?;
        }
    }

    Ok(())
}

// Parse the request and resolve its parameters against the configured ones
fn read(
    io: &IOArgs,
    configured: CalculationParameters,
) -> anyhow::Result<(Portfolio, CalculationParameters)> {
    let Request {
        parameters,
        products,
    } = io.request().inspect_err(|err| {
        event!(Level::ERROR, err = err.to_string());
    })?;
    let params = parameters.apply(configured);
    event!(
        Level::INFO,
        products = products.len(),
        deal_size_cases = params.deal_size_cases,
        iterations = %params.iterations,
        "request loaded"
    );
    Ok((products, params))
}
