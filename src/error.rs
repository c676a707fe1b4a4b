use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DexError {
    // -- catalog load (fatal) --
    #[error("Failed to read {}: {source}", .path.display())]
    CatalogRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Row {row}: field '{field}' has invalid value '{value}'")]
    CatalogFormat {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("Row {row}: expected 6 fields, found {fields}")]
    CatalogShape { row: usize, fields: usize },

    #[error("Catalog contains no Pokemon")]
    EmptyCatalog,

    #[error("Starter ID {0} is not in the catalog")]
    MissingStarter(u32),

    // -- registry --
    #[error("Owner '{0}' not found.")]
    OwnerNotFound(String),

    #[error("Owner '{0}' already exists.")]
    OwnerExists(String),

    #[error("Owner name must not be empty.")]
    EmptyOwnerName,

    // -- pokedex --
    #[error("ID {0} not found in Hoenn data.")]
    UnknownPokemonId(i64),

    #[error("Pokemon {name} (ID {id}) already in the list.")]
    AlreadyOwned { name: String, id: u32 },

    #[error("No Pokemon named '{0}' in this Pokedex.")]
    NotInPokedex(String),

    #[error("Pokemon {0} cannot evolve.")]
    CannotEvolve(String),

    #[error("No evolution found for Pokemon {name} (ID {id}).")]
    NoEvolution { name: String, id: u32 },

    // -- shell input --
    #[error("Invalid starter choice {0}.")]
    InvalidStarter(i64),

    #[error("Invalid choice {0}.")]
    InvalidChoice(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DexError {
    /// Whether the program cannot continue after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            DexError::CatalogRead { .. }
                | DexError::Csv(_)
                | DexError::Json(_)
                | DexError::CatalogFormat { .. }
                | DexError::CatalogShape { .. }
                | DexError::EmptyCatalog
                | DexError::MissingStarter(_)
                | DexError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, DexError>;
