//! Text rendering for the interactive transcript.

use std::io::{self, Write};

use crate::data::pokemon::Pokemon;
use crate::registry::{Order, Owner, OwnerRegistry};

pub const NO_MATCHES: &str = "There are no Pokemons in this Pokedex that match the criteria.";
pub const NO_OWNERS: &str = "No owners at all.";

/// One line per Pokemon, or the no-match notice.
pub fn write_pokemon_list<'a, W, I>(out: &mut W, pokemon: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Pokemon>,
{
    let mut any = false;
    for p in pokemon {
        writeln!(out, "{}", p)?;
        any = true;
    }
    if !any {
        writeln!(out, "{}", NO_MATCHES)?;
    }
    Ok(())
}

/// Owner header followed by their Pokemon.
pub fn write_owner<W: Write>(out: &mut W, owner: &Owner) -> io::Result<()> {
    writeln!(out, "Owner: {}", owner.name())?;
    for p in &owner.pokedex {
        writeln!(out, "{}", p)?;
    }
    Ok(())
}

/// Every owner, visited in `order`.
///
/// Level order separates owner blocks with a blank line; the depth-first
/// orders print them back to back.
pub fn write_walk<W: Write>(out: &mut W, registry: &OwnerRegistry, order: Order) -> io::Result<()> {
    let spaced = order == Order::LevelOrder;
    for owner in registry.walk(order) {
        if spaced {
            writeln!(out)?;
        }
        write_owner(out, owner)?;
    }
    Ok(())
}

/// Owners sorted by pokedex size, then by name.
pub fn write_size_report<W: Write>(out: &mut W, registry: &OwnerRegistry) -> io::Result<()> {
    if registry.is_empty() {
        return writeln!(out, "{}", NO_OWNERS);
    }
    writeln!(out, "=== The Owners we have, sorted by number of Pokemons ===")?;
    for owner in registry.by_size() {
        writeln!(out, "Owner: {} (has {} Pokemon)", owner.name(), owner.pokemon_count())?;
        if owner.pokemon_count() == 0 {
            writeln!(out, "{}", NO_MATCHES)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pokedex::Pokedex;

    fn mon(id: u32, name: &str) -> Pokemon {
        Pokemon {
            id,
            name: name.to_string(),
            kind: "Water".to_string(),
            hp: 50,
            attack: 70,
            can_evolve: true,
        }
    }

    fn render<F: FnOnce(&mut Vec<u8>) -> io::Result<()>>(f: F) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn empty_list_prints_notice() {
        let text = render(|out| write_pokemon_list(out, Vec::<&Pokemon>::new()));
        assert_eq!(text, format!("{}\n", NO_MATCHES));
    }

    #[test]
    fn owner_block() {
        let owner = Owner::new("Maya", Pokedex::with_starter(mon(7, "Mudkip")));
        let text = render(|out| write_owner(out, &owner));
        assert_eq!(
            text,
            "Owner: Maya\nID: 7, Name: Mudkip, Type: Water, HP: 50, Attack: 70, Can Evolve: TRUE\n"
        );
    }

    #[test]
    fn blank_line_only_between_level_order_owners() {
        let mut reg = OwnerRegistry::new();
        reg.register("Maya", mon(7, "Mudkip")).unwrap();
        reg.register("Ash", mon(1, "Treecko")).unwrap();
        let mudkip = "ID: 7, Name: Mudkip, Type: Water, HP: 50, Attack: 70, Can Evolve: TRUE";
        let treecko = "ID: 1, Name: Treecko, Type: Water, HP: 50, Attack: 70, Can Evolve: TRUE";

        let bfs = render(|out| write_walk(out, &reg, Order::LevelOrder));
        assert_eq!(bfs, format!("\nOwner: Maya\n{}\n\nOwner: Ash\n{}\n", mudkip, treecko));

        let in_order = render(|out| write_walk(out, &reg, Order::InOrder));
        assert_eq!(in_order, format!("Owner: Ash\n{}\nOwner: Maya\n{}\n", treecko, mudkip));
    }

    #[test]
    fn size_report_with_empty_pokedex() {
        let mut reg = OwnerRegistry::new();
        reg.register("Ash", mon(7, "Mudkip")).unwrap();
        reg.insert(Owner::new("Bob", Pokedex::new())).unwrap();

        let text = render(|out| write_size_report(out, &reg));
        assert_eq!(
            text,
            format!(
                "=== The Owners we have, sorted by number of Pokemons ===\n\
                 Owner: Bob (has 0 Pokemon)\n{}\n\
                 Owner: Ash (has 1 Pokemon)\n",
                NO_MATCHES
            )
        );
        assert_eq!(render(|out| write_size_report(out, &OwnerRegistry::new())), "No owners at all.\n");
    }
}
