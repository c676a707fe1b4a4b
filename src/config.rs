use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::data::loader::Catalog;
use crate::data::pokemon::Pokemon;
use crate::error::Result;

/// Default catalog location, relative to the working directory.
pub const DEFAULT_CATALOG: &str = "hoenn_pokedex.csv";

/// Treecko, Torchic, Mudkip.
pub const DEFAULT_STARTERS: [u32; 3] = [1, 4, 7];

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Hoenn Pokedex: manage owners and their Pokemon from the console
#[derive(Debug, Parser)]
#[command(name = "hoenn-dex")]
#[command(version)]
#[command(about = "Manage owners and their Pokedexes from the console")]
pub struct Cli {
    /// Catalog file (CSV, or JSON when the extension is .json)
    #[arg(long, default_value = DEFAULT_CATALOG)]
    pub catalog: PathBuf,

    /// Catalog ID offered as a starter; repeat to list several, in menu order
    #[arg(long = "starter", value_name = "ID", default_values_t = DEFAULT_STARTERS)]
    pub starters: Vec<u32>,

    /// Log level (RUST_LOG overrides this when set)
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

/// Settings the shell runs with, checked against the loaded catalog.
#[derive(Debug, Clone)]
pub struct Config {
    pub starters: Vec<Pokemon>,
}

impl Config {
    pub fn new(cli: &Cli, catalog: &Catalog) -> Result<Self> {
        Ok(Config {
            starters: catalog.starters(&cli.starters)?,
        })
    }

    /// Starters straight from the catalog defaults.
    pub fn with_default_starters(catalog: &Catalog) -> Result<Self> {
        Ok(Config {
            starters: catalog.starters(&DEFAULT_STARTERS)?,
        })
    }
}
