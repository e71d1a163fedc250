//! List block assembly.
//!
//! Consecutive list item lines are collected into a tree keyed by indent
//! depth. The builder keeps an explicit stack of open nodes rooted at a
//! sentinel below every real level; inserting an item pops every node at
//! the same depth or deeper (attaching each popped node to the new top's
//! children) and then pushes the item. Popping past the sentinel is a
//! structural impossibility and surfaces as [`ListStructureError`] so the
//! caller can discard the block instead of emitting a half-built tree.

use crate::error::ListStructureError;
use crate::inline::Fragment;

/// One node of an assembled list tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListNode {
    pub label: Vec<Fragment>,
    pub children: Vec<ListNode>,
}

/// Incremental list tree builder.
#[derive(Debug)]
pub struct ListBuilder {
    // Pairs of (indent level, open node). The sentinel root sits at level
    // -1 and collects every top-level item.
    stack: Vec<(i32, ListNode)>,
}

impl ListBuilder {
    pub fn new() -> Self {
        ListBuilder {
            stack: vec![(-1, ListNode::default())],
        }
    }

    /// Inserts an item at an indent level.
    ///
    /// Equal levels are siblings: the previous node at the same level is
    /// closed (popped and attached) before the new one opens.
    pub fn insert(&mut self, level: i32, label: Vec<Fragment>) -> Result<(), ListStructureError> {
        while self
            .stack
            .last()
            .is_some_and(|(top_level, _)| *top_level >= level)
        {
            self.attach_top()?;
        }
        if self.stack.is_empty() {
            return Err(ListStructureError);
        }
        self.stack.push((
            level,
            ListNode {
                label,
                children: Vec::new(),
            },
        ));
        Ok(())
    }

    /// Closes all open nodes and returns the sentinel root.
    ///
    /// The root's own label is empty; its children are the top-level items.
    pub fn finish(mut self) -> Result<ListNode, ListStructureError> {
        while self.stack.len() > 1 {
            self.attach_top()?;
        }
        match self.stack.pop() {
            Some((_, root)) => Ok(root),
            None => Err(ListStructureError),
        }
    }

    /// Pops the top node and attaches it to the children of the node below.
    fn attach_top(&mut self) -> Result<(), ListStructureError> {
        let (_, node) = self.stack.pop().ok_or(ListStructureError)?;
        match self.stack.last_mut() {
            Some((_, parent)) => {
                parent.children.push(node);
                Ok(())
            }
            None => Err(ListStructureError),
        }
    }
}

impl Default for ListBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Indent depth of a list item from its leading whitespace.
///
/// The marker-width pad (`+1` for bullets, `+2` for numbered items) is
/// folded into `leading` by the caller before this runs; dividing by the
/// configured indent width then yields the nesting level. A zero width is
/// treated as the default of 2.
pub fn indent_level(leading: usize, indent_width: usize) -> i32 {
    let width = if indent_width == 0 { 2 } else { indent_width };
    (leading / width) as i32
}
