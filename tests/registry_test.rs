use hoenn_dex::data::loader::{parse_csv, Catalog};
use hoenn_dex::data::pokemon::Pokemon;
use hoenn_dex::pokedex::Pokedex;
use hoenn_dex::registry::{compare_names, sort_by_size, Order, Owner, OwnerRegistry};
use hoenn_dex::DexError;

const CATALOG: &str = include_str!("../hoenn_pokedex.csv");

fn catalog() -> Catalog {
    Catalog::from_pokemon(parse_csv(CATALOG.as_bytes()).unwrap()).unwrap()
}

fn pokemon(catalog: &Catalog, id: u32) -> Pokemon {
    catalog.get_by_id(id).unwrap().clone()
}

fn names(registry: &OwnerRegistry, order: Order) -> Vec<String> {
    registry.walk(order).map(|o| o.name().to_string()).collect()
}

/// Deterministic shuffle of owner names so the tree takes several shapes.
fn owner_names(seed: u64) -> Vec<String> {
    let base = [
        "Maya", "ash", "Brock", "misty", "Zed", "gary", "Tracey", "dawn", "Iris", "cilan",
        "Serena", "clemont", "Lillie", "kiawe", "Leon", "hop",
    ];
    let mut names: Vec<String> = base.iter().map(|s| s.to_string()).collect();
    let mut state = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
    for i in (1..names.len()).rev() {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let j = (state >> 33) as usize % (i + 1);
        names.swap(i, j);
    }
    names
}

fn assert_sorted(names: &[String]) {
    for pair in names.windows(2) {
        assert_eq!(
            compare_names(&pair[0], &pair[1]),
            std::cmp::Ordering::Less,
            "{:?} out of order",
            pair
        );
    }
}

#[test]
fn scenario_maya_ash_zed() {
    let catalog = catalog();
    let mut reg = OwnerRegistry::new();
    reg.register("Maya", pokemon(&catalog, 1)).unwrap();
    reg.register("Ash", pokemon(&catalog, 2)).unwrap();
    reg.register("zed", pokemon(&catalog, 3)).unwrap();

    assert_eq!(names(&reg, Order::InOrder), ["Ash", "Maya", "zed"]);
    assert_eq!(names(&reg, Order::LevelOrder)[0], "Maya");
}

#[test]
fn in_order_is_sorted_for_any_insertion_order() {
    let catalog = catalog();
    for seed in 0..20 {
        let mut reg = OwnerRegistry::new();
        for name in owner_names(seed) {
            reg.register(&name, pokemon(&catalog, 7)).unwrap();
        }
        let walked = names(&reg, Order::InOrder);
        assert_eq!(walked.len(), 16);
        assert_sorted(&walked);
        assert_eq!(
            reg.gather().iter().map(|o| o.name()).collect::<Vec<_>>(),
            walked
        );
    }
}

#[test]
fn find_after_insert() {
    let catalog = catalog();
    let mut reg = OwnerRegistry::new();
    for name in owner_names(3) {
        reg.register(&name, pokemon(&catalog, 4)).unwrap();
    }
    for name in owner_names(3) {
        let found = reg.find(&name.to_uppercase()).unwrap();
        assert_eq!(compare_names(found.name(), &name), std::cmp::Ordering::Equal);
        assert_eq!(found.name(), name);
    }
    for absent in ["Oak", "Elm", "birch", ""] {
        assert!(reg.find(absent).is_none());
    }
}

#[test]
fn delete_keeps_order_and_forgets_owner() {
    let catalog = catalog();
    for seed in 0..10 {
        let mut reg = OwnerRegistry::new();
        let all = owner_names(seed);
        for name in &all {
            reg.register(name, pokemon(&catalog, 1)).unwrap();
        }
        for (removed, name) in owner_names(seed + 100).iter().enumerate() {
            let owner = reg.delete(&name.to_lowercase()).unwrap();
            assert_eq!(owner.name(), name);
            assert!(reg.find(name).is_none());

            let walked = names(&reg, Order::InOrder);
            assert_eq!(walked.len(), all.len() - removed - 1);
            assert_sorted(&walked);
        }
        assert!(reg.is_empty());
    }
}

#[test]
fn delete_absent_leaves_traversals_unchanged() {
    let catalog = catalog();
    let mut reg = OwnerRegistry::new();
    for name in owner_names(5) {
        reg.register(&name, pokemon(&catalog, 1)).unwrap();
    }
    let before: Vec<Vec<String>> = Order::ALL.iter().map(|&o| names(&reg, o)).collect();
    assert!(matches!(reg.delete("Professor Oak"), Err(DexError::OwnerNotFound(_))));
    let after: Vec<Vec<String>> = Order::ALL.iter().map(|&o| names(&reg, o)).collect();
    assert_eq!(before, after);
}

#[test]
fn deleted_owner_takes_pokedex_along() {
    let catalog = catalog();
    let mut reg = OwnerRegistry::new();
    for name in ["m", "c", "x", "p", "n"] {
        reg.register(name, pokemon(&catalog, 1)).unwrap();
    }
    reg.find_mut("n").unwrap().pokedex.add(&catalog, 7).unwrap();

    // "m" has two children; "n" is promoted with its own pokedex.
    let removed = reg.delete("M").unwrap();
    assert_eq!(removed.pokemon_count(), 1);
    let n = reg.find("n").unwrap();
    assert_eq!(n.pokemon_count(), 2);
    assert_eq!(names(&reg, Order::LevelOrder)[0], "n");
}

#[test]
fn size_report_orders_ties_alphabetically() {
    let catalog = catalog();
    let ash: Pokedex = [1, 4, 7].iter().map(|&id| pokemon(&catalog, id)).collect();
    let bob = Pokedex::with_starter(pokemon(&catalog, 1));
    let zoe = Pokedex::with_starter(pokemon(&catalog, 4));

    let mut reg = OwnerRegistry::new();
    reg.insert(Owner::new("zoe", zoe)).unwrap();
    reg.insert(Owner::new("Ash", ash)).unwrap();
    reg.insert(Owner::new("Bob", bob)).unwrap();

    let mut owners = reg.gather();
    sort_by_size(&mut owners);
    let report: Vec<(&str, usize)> = owners
        .iter()
        .map(|o| (o.name(), o.pokemon_count()))
        .collect();
    assert_eq!(report, [("Bob", 1), ("zoe", 1), ("Ash", 3)]);
}

#[test]
fn owners_hold_independent_copies() {
    let catalog = catalog();
    let mut reg = OwnerRegistry::new();
    reg.register("Ash", pokemon(&catalog, 1)).unwrap();
    reg.register("Bob", pokemon(&catalog, 1)).unwrap();

    reg.find_mut("ash").unwrap().pokedex.evolve(&catalog, "Treecko").unwrap();

    assert_eq!(reg.find("Ash").unwrap().pokedex.iter().next().unwrap().name, "Grovyle");
    assert_eq!(reg.find("Bob").unwrap().pokedex.iter().next().unwrap().name, "Treecko");
    assert_eq!(catalog.get_by_id(1).unwrap().name, "Treecko");
}
