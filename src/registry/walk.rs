use std::collections::VecDeque;

use super::{Node, Owner};

/// Order in which a [`Walk`] visits owners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Order {
    /// Breadth-first: root, then each depth left to right.
    LevelOrder,
    /// Node, left subtree, right subtree.
    PreOrder,
    /// Left subtree, node, right subtree (name order).
    InOrder,
    /// Left subtree, right subtree, node.
    PostOrder,
}

impl Order {
    pub const ALL: [Order; 4] = [
        Order::LevelOrder,
        Order::PreOrder,
        Order::InOrder,
        Order::PostOrder,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Order::LevelOrder => "BFS",
            Order::PreOrder => "Pre-Order",
            Order::InOrder => "In-Order",
            Order::PostOrder => "Post-Order",
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Frame<'a> {
    /// Subtree still to be unfolded.
    Expand(&'a Node),
    /// Node ready to be yielded.
    Visit(&'a Node),
}

/// Lazy, read-only traversal of the registry.
///
/// Level order pops from the front of the frontier; the depth-first orders
/// use it as a stack, pushing frames in reverse of the order they should run.
#[derive(Debug, Clone)]
pub struct Walk<'a> {
    order: Order,
    frontier: VecDeque<Frame<'a>>,
}

impl<'a> Walk<'a> {
    pub(crate) fn new(root: Option<&'a Node>, order: Order) -> Self {
        let mut frontier = VecDeque::new();
        if let Some(root) = root {
            frontier.push_back(Frame::Expand(root));
        }
        Walk { order, frontier }
    }

    pub fn order(&self) -> Order {
        self.order
    }

    fn next_level_order(&mut self) -> Option<&'a Owner> {
        let node = match self.frontier.pop_front()? {
            Frame::Expand(node) | Frame::Visit(node) => node,
        };
        if let Some(left) = node.left.as_deref() {
            self.frontier.push_back(Frame::Expand(left));
        }
        if let Some(right) = node.right.as_deref() {
            self.frontier.push_back(Frame::Expand(right));
        }
        Some(&node.owner)
    }

    fn next_depth_first(&mut self) -> Option<&'a Owner> {
        while let Some(frame) = self.frontier.pop_back() {
            let node = match frame {
                Frame::Visit(node) => return Some(&node.owner),
                Frame::Expand(node) => node,
            };
            let left = node.left.as_deref().map(Frame::Expand);
            let right = node.right.as_deref().map(Frame::Expand);
            let visit = Some(Frame::Visit(node));
            let pushes = match self.order {
                Order::PreOrder => [right, left, visit],
                Order::InOrder => [right, visit, left],
                Order::PostOrder => [visit, right, left],
                Order::LevelOrder => unreachable!("level order never expands depth-first"),
            };
            self.frontier.extend(pushes.into_iter().flatten());
        }
        None
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Owner;

    fn next(&mut self) -> Option<Self::Item> {
        match self.order {
            Order::LevelOrder => self.next_level_order(),
            _ => self.next_depth_first(),
        }
    }
}
