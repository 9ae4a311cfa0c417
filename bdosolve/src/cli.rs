//! Command-line interface definition and parsing.
//!
//! This module defines the subcommands and arguments accepted by the tool and
//! the plumbing for reading requests and writing results.

use crate::Request;
use bdo_core::models::IterationMode;
use bdo_solver::AllocationMode;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::{
    fmt,
    fs::File,
    io::{BufReader, BufWriter, Read, Write, stdin, stdout},
    path::PathBuf,
};

/// Command-line arguments for the bulk-deal optimizer.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file.
    #[arg(short, long, env = "BDO_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// The operation to run
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn import() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

/// The available operations
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Split the deal budget across the products and print the allocation
    Allocate {
        #[command(flatten)]
        io: IOArgs,

        /// The allocation strategy
        #[arg(short, long, default_value_t = AllocationFlag::Proportional)]
        mode: AllocationFlag,
    },

    /// Report per-product and portfolio ROI for the products as given
    Calculate {
        #[command(flatten)]
        io: IOArgs,

        /// Replace the supplied bulk quantities with a fresh allocation first
        #[arg(short, long)]
        allocate: Option<AllocationFlag>,
    },

    /// Improve the allocation by local search and report on the result
    Optimize {
        #[command(flatten)]
        io: IOArgs,

        /// Replace the supplied bulk quantities with a fresh allocation first
        #[arg(short, long)]
        allocate: Option<AllocationFlag>,

        /// Pass limit: "auto" or a positive integer (overrides configuration)
        #[arg(short = 'n', long)]
        iterations: Option<IterationMode>,
    },
}

/// Input and output locations shared by all subcommands
#[derive(Args, Debug)]
pub struct IOArgs {
    /// The request JSON file (defaults to stdin if omitted)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// The output file (defaults to stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl IOArgs {
    /// Open the input for reading
    pub fn read(&self) -> anyhow::Result<Box<dyn Read>> {
        if let Some(path) = &self.input {
            Ok(Box::new(BufReader::new(File::open(path)?)))
        } else {
            Ok(Box::new(stdin().lock()))
        }
    }

    /// Open the output for writing
    pub fn write(&self) -> anyhow::Result<Box<dyn Write>> {
        if let Some(path) = &self.output {
            Ok(Box::new(BufWriter::new(File::create(path)?)))
        } else {
            Ok(Box::new(stdout().lock()))
        }
    }

    /// Read and parse the request
    pub fn request(&self) -> anyhow::Result<Request> {
        Ok(serde_json::from_reader(self.read()?)?)
    }
}

/// The allocation strategies, as spelled on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum AllocationFlag {
    /// By annual sales velocity
    Proportional,
    /// Minimum-stock shortfalls first, then by velocity
    Need,
}

impl fmt::Display for AllocationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (match self {
            Self::Proportional => "proportional",
            Self::Need => "need",
        })
        .fmt(f)
    }
}

impl From<AllocationFlag> for AllocationMode {
    fn from(value: AllocationFlag) -> Self {
        match value {
            AllocationFlag::Proportional => Self::Proportional,
            AllocationFlag::Need => Self::Need,
        }
    }
}
