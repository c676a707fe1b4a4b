//! Menu-driven console loop over the owner registry.
//!
//! Input and output are injected so whole sessions can be scripted. Running
//! out of input at any prompt ends the session.

use std::io::{BufRead, Write};
use std::sync::OnceLock;

use regex_lite::Regex;
use tracing::{debug, warn};

use crate::config::Config;
use crate::data::loader::Catalog;
use crate::error::{DexError, Result};
use crate::pokedex::Filter;
use crate::registry::{Order, Owner, OwnerRegistry};
use crate::report;

const INVALID_INT: &str = "Invalid input. Please enter a valid integer.";
const OUT_OF_RANGE: &str = "Number out of range. Please enter a smaller integer.";
const INVALID_CHOICE: &str = "Invalid choice. Please try again.";

fn is_integer(s: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("integer pattern is valid"))
        .is_match(s)
}

/// Result of handling one menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Keep prompting.
    Continue,
    /// Input ran out or the user exited.
    Quit,
}

/// Main menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCommand {
    NewPokedex,
    ExistingPokedex,
    DeletePokedex,
    SortBySize,
    PrintAll,
    Exit,
}

impl TryFrom<i64> for MainCommand {
    type Error = DexError;

    fn try_from(choice: i64) -> Result<Self> {
        match choice {
            1 => Ok(MainCommand::NewPokedex),
            2 => Ok(MainCommand::ExistingPokedex),
            3 => Ok(MainCommand::DeletePokedex),
            4 => Ok(MainCommand::SortBySize),
            5 => Ok(MainCommand::PrintAll),
            6 => Ok(MainCommand::Exit),
            other => Err(DexError::InvalidChoice(other)),
        }
    }
}

/// Per-owner menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PokedexCommand {
    Add,
    Display,
    Release,
    Evolve,
    Back,
}

impl TryFrom<i64> for PokedexCommand {
    type Error = DexError;

    fn try_from(choice: i64) -> Result<Self> {
        match choice {
            1 => Ok(PokedexCommand::Add),
            2 => Ok(PokedexCommand::Display),
            3 => Ok(PokedexCommand::Release),
            4 => Ok(PokedexCommand::Evolve),
            5 => Ok(PokedexCommand::Back),
            other => Err(DexError::InvalidChoice(other)),
        }
    }
}

/// Display filter menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterCommand {
    Type,
    Evolvable,
    AttackAbove,
    HpAbove,
    NamePrefix,
    All,
    Back,
}

impl TryFrom<i64> for FilterCommand {
    type Error = DexError;

    fn try_from(choice: i64) -> Result<Self> {
        match choice {
            1 => Ok(FilterCommand::Type),
            2 => Ok(FilterCommand::Evolvable),
            3 => Ok(FilterCommand::AttackAbove),
            4 => Ok(FilterCommand::HpAbove),
            5 => Ok(FilterCommand::NamePrefix),
            6 => Ok(FilterCommand::All),
            7 => Ok(FilterCommand::Back),
            other => Err(DexError::InvalidChoice(other)),
        }
    }
}

/// Traversal picked from the Print All menu (1-based).
pub fn order_for_choice(choice: i64) -> Option<Order> {
    let index = usize::try_from(choice).ok()?.checked_sub(1)?;
    Order::ALL.get(index).copied()
}

fn owner_mut<'r>(registry: &'r mut OwnerRegistry, name: &str) -> Result<&'r mut Owner> {
    registry
        .find_mut(name)
        .ok_or_else(|| DexError::OwnerNotFound(name.to_string()))
}

/// The interactive session. Owns the registry for its lifetime.
pub struct Shell<'a, R, W> {
    input: R,
    out: W,
    catalog: &'a Catalog,
    config: &'a Config,
    registry: OwnerRegistry,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(input: R, out: W, catalog: &'a Catalog, config: &'a Config) -> Self {
        Shell {
            input,
            out,
            catalog,
            config,
            registry: OwnerRegistry::new(),
        }
    }

    pub fn registry(&self) -> &OwnerRegistry {
        &self.registry
    }

    /// Tear down the session, keeping the registry and the output sink.
    pub fn into_parts(self) -> (OwnerRegistry, W) {
        (self.registry, self.out)
    }

    /// Read one line without its line ending. `None` at end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("end of input");
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Prompt until the answer is an integer. `None` at end of input.
    pub fn read_int(&mut self, prompt: &str) -> Result<Option<i64>> {
        loop {
            let Some(line) = self.read_line(prompt)? else {
                return Ok(None);
            };
            if !is_integer(&line) {
                warn!(input = %line, "rejected non-integer input");
                writeln!(self.out, "{}", INVALID_INT)?;
                continue;
            }
            match line.parse::<i64>() {
                Ok(n) => return Ok(Some(n)),
                Err(err) => {
                    warn!(input = %line, error = %err, "rejected out-of-range integer");
                    writeln!(self.out, "{}", OUT_OF_RANGE)?;
                }
            }
        }
    }

    /// Tell the user why an operation did nothing.
    fn report(&mut self, err: &DexError) -> Result<()> {
        warn!(error = %err, "operation rejected");
        writeln!(self.out, "{}", err)?;
        Ok(())
    }

    /// Run the main menu until exit or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(
                self.out,
                "\n=== Main Menu ===\n\
                 1. New Pokedex\n\
                 2. Existing Pokedex\n\
                 3. Delete a Pokedex\n\
                 4. Display owners by number of Pokemon\n\
                 5. Print All\n\
                 6. Exit\n"
            )?;
            let Some(choice) = self.read_int("Your choice: ")? else {
                return Ok(());
            };
            let step = match MainCommand::try_from(choice) {
                Ok(MainCommand::NewPokedex) => self.new_pokedex()?,
                Ok(MainCommand::ExistingPokedex) => self.existing_pokedex()?,
                Ok(MainCommand::DeletePokedex) => self.delete_pokedex()?,
                Ok(MainCommand::SortBySize) => {
                    report::write_size_report(&mut self.out, &self.registry)?;
                    Step::Continue
                }
                Ok(MainCommand::PrintAll) => self.print_all()?,
                Ok(MainCommand::Exit) => {
                    writeln!(self.out, "Goodbye!")?;
                    Step::Quit
                }
                Err(err) => {
                    warn!(error = %err, "main menu");
                    writeln!(self.out, "{}", INVALID_CHOICE)?;
                    Step::Continue
                }
            };
            if step == Step::Quit {
                return Ok(());
            }
        }
    }

    fn new_pokedex(&mut self) -> Result<Step> {
        let Some(name) = self.read_line("Owner name: ")? else {
            return Ok(Step::Quit);
        };
        let name = name.trim().to_string();
        if self.registry.contains(&name) {
            writeln!(self.out, "Owner '{}' already exists. No new Pokedex created.", name)?;
            return Ok(Step::Continue);
        }

        let config = self.config;
        let mut prompt = String::from("Choose your starter Pokemon:\n");
        for (i, starter) in config.starters.iter().enumerate() {
            prompt.push_str(&format!("{}) {}\n", i + 1, starter.name));
        }
        prompt.push_str("Your choice: ");
        let Some(choice) = self.read_int(&prompt)? else {
            return Ok(Step::Quit);
        };

        let starter = usize::try_from(choice)
            .ok()
            .and_then(|c| c.checked_sub(1))
            .and_then(|i| config.starters.get(i));
        let Some(starter) = starter else {
            self.report(&DexError::InvalidStarter(choice))?;
            writeln!(self.out, "No new Pokedex created.")?;
            return Ok(Step::Continue);
        };

        let registered = self
            .registry
            .register(&name, starter.clone())
            .map(|owner| owner.name().to_string());
        match registered {
            Ok(owner_name) => writeln!(
                self.out,
                "New Pokedex created for {} with starter {}.",
                owner_name, starter.name
            )?,
            Err(err) => {
                self.report(&err)?;
                writeln!(self.out, "No new Pokedex created.")?;
            }
        }
        Ok(Step::Continue)
    }

    fn delete_pokedex(&mut self) -> Result<Step> {
        let Some(name) = self.read_line("Owner name: ")? else {
            return Ok(Step::Quit);
        };
        match self.registry.delete(&name) {
            Ok(owner) => writeln!(
                self.out,
                "Pokedex belonging to '{}' has been deleted.",
                owner.name()
            )?,
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    fn print_all(&mut self) -> Result<Step> {
        for (i, order) in Order::ALL.iter().enumerate() {
            writeln!(self.out, "{}) {}", i + 1, order.label())?;
        }
        let Some(choice) = self.read_int("Your choice: ")? else {
            return Ok(Step::Quit);
        };
        match order_for_choice(choice) {
            Some(order) => report::write_walk(&mut self.out, &self.registry, order)?,
            None => writeln!(self.out, "Invalid choice.")?,
        }
        Ok(Step::Continue)
    }

    fn existing_pokedex(&mut self) -> Result<Step> {
        let Some(name) = self.read_line("Owner name: ")? else {
            return Ok(Step::Quit);
        };
        let owner_name = match self.registry.find(&name) {
            Some(owner) => owner.name().to_string(),
            None => {
                self.report(&DexError::OwnerNotFound(name.trim().to_string()))?;
                return Ok(Step::Continue);
            }
        };

        loop {
            write!(
                self.out,
                "\n-- {}'s Pokedex Menu --\n\
                 1. Add Pokemon\n\
                 2. Display Pokedex\n\
                 3. Release Pokemon\n\
                 4. Evolve Pokemon\n\
                 5. Back to Main\n",
                owner_name
            )?;
            let Some(choice) = self.read_int("Your choice: ")? else {
                return Ok(Step::Quit);
            };
            let step = match PokedexCommand::try_from(choice) {
                Ok(PokedexCommand::Add) => self.add_pokemon(&owner_name)?,
                Ok(PokedexCommand::Display) => self.display_filtered(&owner_name)?,
                Ok(PokedexCommand::Release) => self.release_pokemon(&owner_name)?,
                Ok(PokedexCommand::Evolve) => self.evolve_pokemon(&owner_name)?,
                Ok(PokedexCommand::Back) => {
                    writeln!(self.out, "Back to Main Menu.")?;
                    return Ok(Step::Continue);
                }
                Err(err) => {
                    warn!(error = %err, "pokedex menu");
                    writeln!(self.out, "{}", INVALID_CHOICE)?;
                    Step::Continue
                }
            };
            if step == Step::Quit {
                return Ok(Step::Quit);
            }
        }
    }

    fn add_pokemon(&mut self, owner_name: &str) -> Result<Step> {
        let Some(id) = self.read_int("Enter Pokemon ID to add: ")? else {
            return Ok(Step::Quit);
        };
        let catalog = self.catalog;
        let outcome = owner_mut(&mut self.registry, owner_name).and_then(|owner| {
            owner.pokedex.add(catalog, id).map(|p| {
                format!(
                    "Pokemon {} (ID {}) added to {}'s Pokedex.",
                    p.name, p.id, owner_name
                )
            })
        });
        match outcome {
            Ok(message) => writeln!(self.out, "{}", message)?,
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    fn release_pokemon(&mut self, owner_name: &str) -> Result<Step> {
        let Some(name) = self.read_line("Enter Pokemon Name to release: ")? else {
            return Ok(Step::Quit);
        };
        let outcome = owner_mut(&mut self.registry, owner_name)
            .and_then(|owner| owner.pokedex.release(&name));
        match outcome {
            Ok(released) => writeln!(self.out, "Releasing {} from {}.", released.name, owner_name)?,
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    fn evolve_pokemon(&mut self, owner_name: &str) -> Result<Step> {
        let Some(name) = self.read_line("Enter Pokemon name to evolve: ")? else {
            return Ok(Step::Quit);
        };
        let catalog = self.catalog;
        let outcome = owner_mut(&mut self.registry, owner_name)
            .and_then(|owner| owner.pokedex.evolve(catalog, &name));
        match outcome {
            Ok(evo) => {
                writeln!(
                    self.out,
                    "Pokemon evolved from {} (ID {}) to {} (ID {}).",
                    evo.from.name, evo.from.id, evo.to.name, evo.to.id
                )?;
                if evo.duplicate_released {
                    writeln!(
                        self.out,
                        "{} was already present; releasing it immediately.",
                        evo.to.name
                    )?;
                }
            }
            Err(err) => self.report(&err)?,
        }
        Ok(Step::Continue)
    }

    fn display_filtered(&mut self, owner_name: &str) -> Result<Step> {
        loop {
            write!(
                self.out,
                "\n-- Display Filter Menu --\n\
                 1. Only a certain Type\n\
                 2. Only Evolvable\n\
                 3. Only Attack above __\n\
                 4. Only HP above __\n\
                 5. Only names starting with letter(s)\n\
                 6. All of them!\n\
                 7. Back\n"
            )?;
            let Some(choice) = self.read_int("Your choice: ")? else {
                return Ok(Step::Quit);
            };
            let filter = match FilterCommand::try_from(choice) {
                Ok(FilterCommand::Type) => {
                    match self.read_line("Which Type? (e.g. GRASS, WATER): ")? {
                        Some(kind) => Filter::Type(kind),
                        None => return Ok(Step::Quit),
                    }
                }
                Ok(FilterCommand::Evolvable) => Filter::Evolvable,
                Ok(FilterCommand::AttackAbove) => match self.read_int("Enter Attack threshold: ")? {
                    Some(t) => Filter::AttackAbove(t),
                    None => return Ok(Step::Quit),
                },
                Ok(FilterCommand::HpAbove) => match self.read_int("Enter HP threshold: ")? {
                    Some(t) => Filter::HpAbove(t),
                    None => return Ok(Step::Quit),
                },
                Ok(FilterCommand::NamePrefix) => match self.read_line("Starting letter(s): ")? {
                    Some(prefix) => Filter::NamePrefix(prefix),
                    None => return Ok(Step::Quit),
                },
                Ok(FilterCommand::All) => Filter::All,
                Ok(FilterCommand::Back) => {
                    writeln!(self.out, "Back to Pokedex Menu.")?;
                    return Ok(Step::Continue);
                }
                Err(err) => {
                    warn!(error = %err, "filter menu");
                    writeln!(self.out, "{}", INVALID_CHOICE)?;
                    continue;
                }
            };

            match self.registry.find(owner_name) {
                Some(owner) => {
                    report::write_pokemon_list(&mut self.out, owner.pokedex.filter(&filter))?
                }
                None => {
                    self.report(&DexError::OwnerNotFound(owner_name.to_string()))?;
                    return Ok(Step::Continue);
                }
            }
        }
    }
}
