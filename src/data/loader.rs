use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info};

use super::pokemon::Pokemon;
use crate::error::{DexError, Result};

/// Number of columns in a catalog row: ID, Name, Type, HP, Attack, Can Evolve.
pub const CATALOG_FIELDS: usize = 6;

/// Raw catalog entry as found in a JSON export.
#[derive(Debug, Deserialize)]
struct RawPokemon {
    #[serde(rename = "ID", alias = "id")]
    id: u32,
    #[serde(rename = "Name", alias = "name")]
    name: String,
    #[serde(rename = "Type", alias = "type")]
    kind: String,
    #[serde(rename = "HP", alias = "hp")]
    hp: u32,
    #[serde(rename = "Attack", alias = "attack")]
    attack: u32,
    #[serde(rename = "Can Evolve", alias = "can_evolve")]
    can_evolve: RawFlag,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Text(String),
}

fn parse_evolve_flag(row: usize, s: &str) -> Result<bool> {
    match s.trim().to_uppercase().as_str() {
        "TRUE" => Ok(true),
        "FALSE" => Ok(false),
        _ => Err(DexError::CatalogFormat {
            row,
            field: "Can Evolve",
            value: s.to_string(),
        }),
    }
}

fn parse_number(row: usize, field: &'static str, s: &str) -> Result<u32> {
    s.trim().parse::<u32>().map_err(|_| DexError::CatalogFormat {
        row,
        field,
        value: s.to_string(),
    })
}

fn convert_raw_pokemon(row: usize, raw: RawPokemon) -> Result<Pokemon> {
    let can_evolve = match raw.can_evolve {
        RawFlag::Bool(b) => b,
        RawFlag::Text(s) => parse_evolve_flag(row, &s)?,
    };
    Ok(Pokemon {
        id: raw.id,
        name: raw.name.trim().to_string(),
        kind: raw.kind.trim().to_string(),
        hp: raw.hp,
        attack: raw.attack,
        can_evolve,
    })
}

/// Parse catalog rows from CSV.
///
/// The first row is a header and is discarded. Parsing stops at the first
/// row whose ID field is empty, or at the first blank line.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Pokemon>> {
    // The csv reader skips blank lines, so cut the input off at the first one.
    let mut data = String::new();
    for (i, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if i > 0 && line.trim().is_empty() {
            debug!(row = i + 1, "blank line ends catalog data");
            break;
        }
        data.push_str(&line);
        data.push('\n');
    }

    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data.as_bytes());

    let mut pokemon = Vec::new();
    for (i, record) in rdr.records().enumerate() {
        let record = record?;
        let row = record.position().map(|p| p.line() as usize).unwrap_or(i + 2);

        if record.get(0).map_or(true, |id| id.is_empty()) {
            debug!(row, "end-of-data sentinel reached");
            break;
        }
        if record.len() != CATALOG_FIELDS {
            return Err(DexError::CatalogShape {
                row,
                fields: record.len(),
            });
        }

        pokemon.push(Pokemon {
            id: parse_number(row, "ID", &record[0])?,
            name: record[1].to_string(),
            kind: record[2].to_string(),
            hp: parse_number(row, "HP", &record[3])?,
            attack: parse_number(row, "Attack", &record[4])?,
            can_evolve: parse_evolve_flag(row, &record[5])?,
        });
    }
    Ok(pokemon)
}

/// Parse catalog entries from a JSON array.
pub fn parse_json(data: &str) -> Result<Vec<Pokemon>> {
    let raw: Vec<RawPokemon> = serde_json::from_str(data)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, r)| convert_raw_pokemon(i + 1, r))
        .collect()
}

/// Load the catalog file. `.json` files are parsed as JSON, anything else as CSV.
pub fn load_catalog(path: &Path) -> Result<Catalog> {
    let read_err = |source| DexError::CatalogRead {
        path: path.to_path_buf(),
        source,
    };

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let pokemon = if is_json {
        parse_json(&fs::read_to_string(path).map_err(read_err)?)?
    } else {
        parse_csv(File::open(path).map_err(read_err)?)?
    };

    let catalog = Catalog::from_pokemon(pokemon)?;
    info!(path = %path.display(), count = catalog.len(), "catalog loaded");
    Ok(catalog)
}

/// The read-only reference catalog, indexed for lookup.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// All Pokemon, in source order.
    pokemon: Vec<Pokemon>,
    /// Index: ID -> position.
    by_id: HashMap<u32, usize>,
    /// Index: lower-cased name -> position of the first entry with that name.
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog, rejecting an empty list and zero or repeated IDs.
    pub fn from_pokemon(pokemon: Vec<Pokemon>) -> Result<Self> {
        if pokemon.is_empty() {
            return Err(DexError::EmptyCatalog);
        }

        let mut by_id = HashMap::new();
        let mut by_name = HashMap::new();
        for (i, p) in pokemon.iter().enumerate() {
            if p.id == 0 || by_id.insert(p.id, i).is_some() {
                return Err(DexError::CatalogFormat {
                    row: i + 1,
                    field: "ID",
                    value: p.id.to_string(),
                });
            }
            by_name.entry(p.name.to_lowercase()).or_insert(i);
        }

        Ok(Catalog {
            pokemon,
            by_id,
            by_name,
        })
    }

    pub fn get_by_id(&self, id: u32) -> Option<&Pokemon> {
        self.by_id.get(&id).map(|&i| &self.pokemon[i])
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Pokemon> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .map(|&i| &self.pokemon[i])
    }

    /// The evolved form of `pokemon`: the entry at the next identity.
    pub fn evolution_of(&self, pokemon: &Pokemon) -> Option<&Pokemon> {
        pokemon.id.checked_add(1).and_then(|id| self.get_by_id(id))
    }

    /// Resolve starter IDs, in order.
    pub fn starters(&self, ids: &[u32]) -> Result<Vec<Pokemon>> {
        ids.iter()
            .map(|&id| {
                self.get_by_id(id)
                    .cloned()
                    .ok_or(DexError::MissingStarter(id))
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pokemon> {
        self.pokemon.iter()
    }

    pub fn len(&self) -> usize {
        self.pokemon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pokemon.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ID,Name,Type,HP,Attack,Can Evolve
1,Treecko,Grass,40,45,TRUE
2,Grovyle,Grass,50,65,true
3,Sceptile,Grass,70,85,False
,,,,,
4,Torchic,Fire,45,60,TRUE
";

    #[test]
    fn csv_stops_at_sentinel() {
        let pokemon = parse_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(pokemon.len(), 3);
        assert_eq!(pokemon[0].name, "Treecko");
        assert!(pokemon[1].can_evolve);
        assert!(!pokemon[2].can_evolve);
    }

    #[test]
    fn csv_stops_at_blank_line() {
        let data = "ID,Name,Type,HP,Attack,Can Evolve\n\
                    1,Treecko,Grass,40,45,TRUE\n\
                    \n\
                    2,Grovyle,Grass,50,65,TRUE\n";
        let pokemon = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(pokemon.len(), 1);
        assert_eq!(pokemon[0].name, "Treecko");
    }

    #[test]
    fn csv_without_sentinel_reads_everything() {
        let data = "ID,Name,Type,HP,Attack,Can Evolve\n1,Treecko,Grass,40,45,TRUE\n";
        assert_eq!(parse_csv(data.as_bytes()).unwrap().len(), 1);
    }

    #[test]
    fn csv_rejects_bad_number() {
        let data = "ID,Name,Type,HP,Attack,Can Evolve\n1,Treecko,Grass,forty,45,TRUE\n";
        match parse_csv(data.as_bytes()) {
            Err(DexError::CatalogFormat { field, value, .. }) => {
                assert_eq!(field, "HP");
                assert_eq!(value, "forty");
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn csv_rejects_short_row() {
        let data = "ID,Name,Type,HP,Attack,Can Evolve\n1,Treecko,Grass\n";
        assert!(matches!(
            parse_csv(data.as_bytes()),
            Err(DexError::CatalogShape { fields: 3, .. })
        ));
    }

    #[test]
    fn csv_rejects_unknown_flag() {
        let data = "ID,Name,Type,HP,Attack,Can Evolve\n1,Treecko,Grass,40,45,maybe\n";
        assert!(matches!(
            parse_csv(data.as_bytes()),
            Err(DexError::CatalogFormat { field: "Can Evolve", .. })
        ));
    }

    #[test]
    fn json_accepts_bool_and_text_flags() {
        let data = r#"[
            {"ID": 1, "Name": "Treecko", "Type": "Grass", "HP": 40, "Attack": 45, "Can Evolve": "TRUE"},
            {"id": 2, "name": "Grovyle", "type": "Grass", "hp": 50, "attack": 65, "can_evolve": false}
        ]"#;
        let pokemon = parse_json(data).unwrap();
        assert!(pokemon[0].can_evolve);
        assert!(!pokemon[1].can_evolve);
    }

    #[test]
    fn catalog_lookup() {
        let catalog = Catalog::from_pokemon(parse_csv(SAMPLE.as_bytes()).unwrap()).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get_by_id(2).unwrap().name, "Grovyle");
        assert!(catalog.get_by_id(4).is_none());
        assert_eq!(catalog.get_by_name(" sceptile ").unwrap().id, 3);

        let treecko = catalog.get_by_id(1).unwrap();
        assert_eq!(catalog.evolution_of(treecko).unwrap().name, "Grovyle");
        let sceptile = catalog.get_by_id(3).unwrap();
        assert!(catalog.evolution_of(sceptile).is_none());
    }

    #[test]
    fn catalog_rejects_empty_and_duplicates() {
        assert!(matches!(Catalog::from_pokemon(vec![]), Err(DexError::EmptyCatalog)));

        let mut pokemon = parse_csv(SAMPLE.as_bytes()).unwrap();
        pokemon[2].id = 1;
        assert!(matches!(
            Catalog::from_pokemon(pokemon),
            Err(DexError::CatalogFormat { field: "ID", .. })
        ));
    }

    #[test]
    fn starters_must_exist() {
        let catalog = Catalog::from_pokemon(parse_csv(SAMPLE.as_bytes()).unwrap()).unwrap();
        assert_eq!(catalog.starters(&[3, 1]).unwrap()[0].name, "Sceptile");
        assert!(matches!(catalog.starters(&[1, 9]), Err(DexError::MissingStarter(9))));
    }
}
