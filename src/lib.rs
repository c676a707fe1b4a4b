pub mod config;
pub mod data;
pub mod error;
pub mod pokedex;
pub mod registry;
pub mod report;
pub mod shell;

pub use error::{DexError, Result};
