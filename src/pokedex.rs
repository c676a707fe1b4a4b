use tracing::debug;

use crate::data::loader::Catalog;
use crate::data::pokemon::Pokemon;
use crate::error::{DexError, Result};

/// Predicates for displaying part of a pokedex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    All,
    /// Category equals (case-insensitive).
    Type(String),
    Evolvable,
    /// Attack strictly above the threshold.
    AttackAbove(i64),
    /// HP strictly above the threshold.
    HpAbove(i64),
    /// Name starts with the given letters (case-insensitive).
    NamePrefix(String),
}

impl Filter {
    pub fn matches(&self, pokemon: &Pokemon) -> bool {
        match self {
            Filter::All => true,
            Filter::Type(kind) => pokemon.is_kind(kind),
            Filter::Evolvable => pokemon.can_evolve,
            Filter::AttackAbove(t) => i64::from(pokemon.attack) > *t,
            Filter::HpAbove(t) => i64::from(pokemon.hp) > *t,
            Filter::NamePrefix(prefix) => pokemon
                .name
                .to_lowercase()
                .starts_with(&prefix.trim().to_lowercase()),
        }
    }
}

/// Outcome of a successful evolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evolution {
    pub from: Pokemon,
    pub to: Pokemon,
    /// The evolved form was already held, so the new copy was released.
    pub duplicate_released: bool,
}

/// An owner's collection: insertion-ordered, unique by ID.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pokedex {
    pokemon: Vec<Pokemon>,
}

impl Pokedex {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pokedex holding only the starter.
    pub fn with_starter(starter: Pokemon) -> Self {
        Pokedex {
            pokemon: vec![starter],
        }
    }

    pub fn len(&self) -> usize {
        self.pokemon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pokemon> {
        self.pokemon.iter()
    }

    pub fn contains_id(&self, id: u32) -> bool {
        self.pokemon.iter().any(|p| p.id == id)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Pokemon> {
        self.pokemon.iter().find(|p| p.is_named(name))
    }

    /// Add a copy of catalog entry `id`.
    ///
    /// `id` is signed because it comes straight from user input.
    pub fn add(&mut self, catalog: &Catalog, id: i64) -> Result<&Pokemon> {
        let found = u32::try_from(id)
            .ok()
            .and_then(|id| catalog.get_by_id(id))
            .ok_or(DexError::UnknownPokemonId(id))?;
        if self.contains_id(found.id) {
            return Err(DexError::AlreadyOwned {
                name: found.name.clone(),
                id: found.id,
            });
        }
        debug!(id = found.id, name = %found.name, "pokemon added");
        self.pokemon.push(found.clone());
        Ok(&self.pokemon[self.pokemon.len() - 1])
    }

    /// Remove the first Pokemon with the given name.
    pub fn release(&mut self, name: &str) -> Result<Pokemon> {
        let pos = self
            .pokemon
            .iter()
            .position(|p| p.is_named(name))
            .ok_or_else(|| DexError::NotInPokedex(name.trim().to_string()))?;
        let released = self.pokemon.remove(pos);
        debug!(id = released.id, name = %released.name, "pokemon released");
        Ok(released)
    }

    /// Replace the named Pokemon with the catalog entry at the next ID.
    ///
    /// If the evolved form is already held, the original is still removed but
    /// no second copy is added.
    pub fn evolve(&mut self, catalog: &Catalog, name: &str) -> Result<Evolution> {
        let pos = self
            .pokemon
            .iter()
            .position(|p| p.is_named(name))
            .ok_or_else(|| DexError::NotInPokedex(name.trim().to_string()))?;

        let current = &self.pokemon[pos];
        if !current.can_evolve {
            return Err(DexError::CannotEvolve(current.name.clone()));
        }
        let evolved = catalog
            .evolution_of(current)
            .ok_or_else(|| DexError::NoEvolution {
                name: current.name.clone(),
                id: current.id,
            })?
            .clone();

        let from = self.pokemon.remove(pos);
        let duplicate_released = self.contains_id(evolved.id);
        if !duplicate_released {
            self.pokemon.push(evolved.clone());
        }
        debug!(from = %from.name, to = %evolved.name, duplicate_released, "pokemon evolved");

        Ok(Evolution {
            from,
            to: evolved,
            duplicate_released,
        })
    }

    pub fn filter(&self, filter: &Filter) -> Vec<&Pokemon> {
        self.pokemon.iter().filter(|p| filter.matches(p)).collect()
    }
}

/// Collects in order, keeping the first copy of each ID.
impl FromIterator<Pokemon> for Pokedex {
    fn from_iter<I: IntoIterator<Item = Pokemon>>(iter: I) -> Self {
        let mut dex = Pokedex::new();
        for p in iter {
            if !dex.contains_id(p.id) {
                dex.pokemon.push(p);
            }
        }
        dex
    }
}

impl<'a> IntoIterator for &'a Pokedex {
    type Item = &'a Pokemon;
    type IntoIter = std::slice::Iter<'a, Pokemon>;

    fn into_iter(self) -> Self::IntoIter {
        self.pokemon.iter()
    }
}
