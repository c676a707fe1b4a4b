use std::fmt;

/// A catalog entry for one Hoenn Pokemon.
///
/// Owners hold clones of these; the catalog copy is never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pokemon {
    /// Catalog identity, matching the source row order (starts at 1).
    pub id: u32,
    /// Display name (e.g., "Treecko").
    pub name: String,
    /// Category tag (e.g., "Grass").
    pub kind: String,
    /// Hit points.
    pub hp: u32,
    /// Attack stat.
    pub attack: u32,
    /// Whether the next catalog identity is this Pokemon's evolved form.
    pub can_evolve: bool,
}

impl Pokemon {
    /// Case-insensitive name match, ignoring surrounding whitespace.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Case-insensitive category match.
    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.to_lowercase() == kind.trim().to_lowercase()
    }

    pub fn evolve_flag(&self) -> &'static str {
        if self.can_evolve {
            "TRUE"
        } else {
            "FALSE"
        }
    }
}

impl fmt::Display for Pokemon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Name: {}, Type: {}, HP: {}, Attack: {}, Can Evolve: {}",
            self.id,
            self.name,
            self.kind,
            self.hp,
            self.attack,
            self.evolve_flag()
        )
    }
}
