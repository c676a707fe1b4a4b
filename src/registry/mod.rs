//! Owner registry: a binary search tree of owners keyed by name.
//!
//! Names compare case-insensitively for placement, lookup and deletion alike,
//! so every owner that was inserted can be found again. The tree is not
//! rebalanced.

use std::cmp::Ordering;

use tracing::debug;

use crate::data::pokemon::Pokemon;
use crate::error::{DexError, Result};
use crate::pokedex::Pokedex;

pub mod walk;

pub use walk::{Order, Walk};

/// Compare two owner names, ignoring case.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
}

/// An owner and their pokedex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    name: String,
    pub pokedex: Pokedex,
}

impl Owner {
    pub fn new(name: &str, pokedex: Pokedex) -> Self {
        Owner {
            name: name.trim().to_string(),
            pokedex,
        }
    }

    /// Name as registered, original casing.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn pokemon_count(&self) -> usize {
        self.pokedex.len()
    }
}

type Link = Option<Box<Node>>;

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) owner: Owner,
    pub(crate) left: Link,
    pub(crate) right: Link,
}

impl Node {
    fn new(owner: Owner) -> Self {
        Node {
            owner,
            left: None,
            right: None,
        }
    }
}

/// Leftmost node of `node.right`, or `None` when there is no right subtree.
fn successor(node: &Node) -> Option<&Node> {
    let mut current = node.right.as_deref()?;
    while let Some(left) = current.left.as_deref() {
        current = left;
    }
    Some(current)
}

fn insert_into(link: &mut Link, owner: Owner) -> Result<()> {
    match link {
        None => {
            *link = Some(Box::new(Node::new(owner)));
            Ok(())
        }
        Some(node) => match compare_names(&owner.name, &node.owner.name) {
            Ordering::Less => insert_into(&mut node.left, owner),
            Ordering::Greater => insert_into(&mut node.right, owner),
            Ordering::Equal => Err(DexError::OwnerExists(owner.name)),
        },
    }
}

/// Remove `name` from the subtree at `link`, returning the removed owner.
///
/// A node with two children takes over its in-order successor's owner, and
/// the successor is then removed from the right subtree.
fn delete_from(link: &mut Link, name: &str) -> Option<Owner> {
    let node = link.as_mut()?;
    match compare_names(name, &node.owner.name) {
        Ordering::Less => delete_from(&mut node.left, name),
        Ordering::Greater => delete_from(&mut node.right, name),
        Ordering::Equal => match (node.left.is_some(), node.right.is_some()) {
            (false, false) => link.take().map(|n| n.owner),
            (true, false) => {
                let mut n = link.take()?;
                *link = n.left.take();
                Some(n.owner)
            }
            (false, true) => {
                let mut n = link.take()?;
                *link = n.right.take();
                Some(n.owner)
            }
            (true, true) => {
                let successor_name = successor(node)?.owner.name.clone();
                let promoted = delete_from(&mut node.right, &successor_name)?;
                Some(std::mem::replace(&mut node.owner, promoted))
            }
        },
    }
}

fn height_of(link: &Link) -> usize {
    match link {
        None => 0,
        Some(node) => 1 + height_of(&node.left).max(height_of(&node.right)),
    }
}

/// All registered owners, ordered by name.
#[derive(Debug, Default)]
pub struct OwnerRegistry {
    root: Link,
    len: usize,
}

impl OwnerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of levels in the tree (0 when empty).
    pub fn height(&self) -> usize {
        height_of(&self.root)
    }

    /// Insert an owner. Names are unique ignoring case.
    pub fn insert(&mut self, owner: Owner) -> Result<()> {
        if owner.name.is_empty() {
            return Err(DexError::EmptyOwnerName);
        }
        let name = owner.name.clone();
        insert_into(&mut self.root, owner)?;
        self.len += 1;
        debug!(owner = %name, owners = self.len, "owner inserted");
        Ok(())
    }

    /// Register a new owner whose pokedex holds just `starter`.
    pub fn register(&mut self, name: &str, starter: Pokemon) -> Result<&Owner> {
        let owner = Owner::new(name, Pokedex::with_starter(starter));
        let key = owner.name.clone();
        self.insert(owner)?;
        self.find(&key).ok_or(DexError::OwnerNotFound(key))
    }

    pub fn find(&self, name: &str) -> Option<&Owner> {
        let name = name.trim();
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            current = match compare_names(name, &node.owner.name) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return Some(&node.owner),
            };
        }
        None
    }

    /// Mutable access to an owner. Only the pokedex can change; the name is
    /// fixed so the ordering holds.
    pub fn find_mut(&mut self, name: &str) -> Option<&mut Owner> {
        let name = name.trim();
        let mut current = self.root.as_deref_mut();
        while let Some(node) = current {
            current = match compare_names(name, &node.owner.name) {
                Ordering::Less => node.left.as_deref_mut(),
                Ordering::Greater => node.right.as_deref_mut(),
                Ordering::Equal => return Some(&mut node.owner),
            };
        }
        None
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Remove an owner and return it. The tree is untouched if absent.
    pub fn delete(&mut self, name: &str) -> Result<Owner> {
        let name = name.trim();
        let removed = delete_from(&mut self.root, name)
            .ok_or_else(|| DexError::OwnerNotFound(name.to_string()))?;
        self.len -= 1;
        debug!(owner = %removed.name, owners = self.len, "owner deleted");
        Ok(removed)
    }

    /// Lazily walk the owners in the given order.
    pub fn walk(&self, order: Order) -> Walk<'_> {
        Walk::new(self.root.as_deref(), order)
    }

    pub fn level_order(&self) -> Walk<'_> {
        self.walk(Order::LevelOrder)
    }

    pub fn pre_order(&self) -> Walk<'_> {
        self.walk(Order::PreOrder)
    }

    pub fn in_order(&self) -> Walk<'_> {
        self.walk(Order::InOrder)
    }

    pub fn post_order(&self) -> Walk<'_> {
        self.walk(Order::PostOrder)
    }

    /// Every owner, in name order.
    pub fn gather(&self) -> Vec<&Owner> {
        self.in_order().collect()
    }

    /// Every owner, fewest Pokemon first.
    pub fn by_size(&self) -> Vec<&Owner> {
        let mut owners = self.gather();
        sort_by_size(&mut owners);
        owners
    }
}

/// Stable sort by pokedex size, ties broken by name ignoring case.
pub fn sort_by_size(owners: &mut [&Owner]) {
    owners.sort_by(|a, b| {
        a.pokemon_count()
            .cmp(&b.pokemon_count())
            .then_with(|| compare_names(&a.name, &b.name))
    });
}
