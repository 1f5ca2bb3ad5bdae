//! Stateful navigation over a concrete syntax tree

use crate::{SyntaxKind, SyntaxNode};
use pt_span::Span;

/// Stateful navigator over a concrete syntax tree
///
/// Moves report whether they happened; a failed move leaves the cursor
/// where it was.
pub trait SyntaxCursor {
    /// Kind of the node under the cursor
    fn kind(&self) -> SyntaxKind;

    /// Byte range of the node under the cursor
    fn span(&self) -> Span;

    /// Move to the first child of the current node
    fn goto_first_child(&mut self) -> bool;

    /// Move to the next sibling of the current node
    fn goto_next_sibling(&mut self) -> bool;

    /// Move to the parent of the current node
    fn goto_parent(&mut self) -> bool;
}

impl<Cursor: SyntaxCursor + ?Sized> SyntaxCursor for &mut Cursor {
    fn kind(&self) -> SyntaxKind {
        (**self).kind()
    }

    fn span(&self) -> Span {
        (**self).span()
    }

    fn goto_first_child(&mut self) -> bool {
        (**self).goto_first_child()
    }

    fn goto_next_sibling(&mut self) -> bool {
        (**self).goto_next_sibling()
    }

    fn goto_parent(&mut self) -> bool {
        (**self).goto_parent()
    }
}

/// Cursor over an owned [`SyntaxNode`] tree
#[derive(Debug, Clone)]
pub struct NodeCursor<'tree> {
    root: &'tree SyntaxNode,
    /// Parent and child index for every level below the root
    stack: Vec<(&'tree SyntaxNode, usize)>,
}

impl<'tree> NodeCursor<'tree> {
    /// Creates a cursor positioned at `root`
    #[must_use]
    pub const fn new(root: &'tree SyntaxNode) -> Self {
        Self {
            root,
            stack: Vec::new(),
        }
    }

    /// Node under the cursor
    #[must_use]
    pub fn node(&self) -> &'tree SyntaxNode {
        match self.stack.last() {
            Some(&(parent, index)) => &parent.children[index],
            None => self.root,
        }
    }

    /// Number of levels below the root
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }
}

impl SyntaxCursor for NodeCursor<'_> {
    fn kind(&self) -> SyntaxKind {
        self.node().kind
    }

    fn span(&self) -> Span {
        self.node().span
    }

    fn goto_first_child(&mut self) -> bool {
        let node = self.node();
        if node.children.is_empty() {
            return false;
        }
        self.stack.push((node, 0));
        true
    }

    fn goto_next_sibling(&mut self) -> bool {
        match self.stack.last_mut() {
            Some((parent, index)) if *index + 1 < parent.children.len() => {
                *index += 1;
                true
            }
            _ => false,
        }
    }

    fn goto_parent(&mut self) -> bool {
        self.stack.pop().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SyntaxNode {
        // x = 1
        SyntaxNode::new(
            SyntaxKind::Assignment,
            Span::new(0, 5),
            vec![
                SyntaxNode::leaf(SyntaxKind::Identifier, Span::new(0, 1)),
                SyntaxNode::leaf(SyntaxKind::Equals, Span::new(2, 3)),
                SyntaxNode::leaf(SyntaxKind::Integer, Span::new(4, 5)),
            ],
        )
    }

    #[test]
    fn test_walks_children_in_order() {
        let root = sample();
        let mut cursor = root.cursor();

        assert_eq!(cursor.kind(), SyntaxKind::Assignment);
        assert!(cursor.goto_first_child());
        assert_eq!(cursor.kind(), SyntaxKind::Identifier);
        assert!(cursor.goto_next_sibling());
        assert_eq!(cursor.kind(), SyntaxKind::Equals);
        assert!(cursor.goto_next_sibling());
        assert_eq!(cursor.kind(), SyntaxKind::Integer);
        assert_eq!(cursor.span(), Span::new(4, 5));
        assert!(!cursor.goto_next_sibling());
        assert_eq!(cursor.kind(), SyntaxKind::Integer);
    }

    #[test]
    fn test_failed_moves_keep_position() {
        let root = sample();
        let mut cursor = root.cursor();

        assert!(!cursor.goto_next_sibling());
        assert!(!cursor.goto_parent());
        assert_eq!(cursor.kind(), SyntaxKind::Assignment);

        assert!(cursor.goto_first_child());
        assert!(!cursor.goto_first_child());
        assert_eq!(cursor.depth(), 1);
    }

    #[test]
    fn test_parent_returns_to_root() {
        let root = sample();
        let mut cursor = root.cursor();

        assert!(cursor.goto_first_child());
        assert!(cursor.goto_next_sibling());
        assert!(cursor.goto_parent());
        assert_eq!(cursor.depth(), 0);
        assert_eq!(cursor.span(), Span::new(0, 5));
    }
}
