//! Primitive tree editor, ed for trees.
//!
//! Every operation takes the root of the tree being edited, validates its
//! arguments against it, and returns the green root of a *new* tree; the
//! input tree is never modified, and red nodes pointing into it stay valid.
//! Only the spine from the edit site to the root is rebuilt, everything off
//! that path is shared between the two versions.
//!
//! Passing an element from a different tree (including an older or newer
//! version of the same document) is an error, not a panic: edits routinely
//! chase stale state, and the caller decides how to recover.

use thiserror::Error;

use crate::{
    green::{GreenElement, GreenNode},
    syntax::{SyntaxElement, SyntaxNode},
    Language, NodeOrToken,
};

/// Ways an edit can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EditError {
    /// The target element does not belong to the tree under `root`.
    #[error("target element does not belong to the edited tree")]
    ForeignNode,
    /// The position is anchored at the root, which has no siblings.
    #[error("insertion position is anchored at the tree root")]
    InvalidPosition,
    /// The root of a tree must be a node.
    #[error("cannot replace the tree root with a token")]
    ReplaceRootWithToken,
    /// Removing the root would leave no tree at all.
    #[error("cannot remove the tree root")]
    RemoveRoot,
    /// The edited tree's text would exceed the maximum supported length.
    #[error("edit would overflow the maximum supported text size")]
    Overflow,
}

/// A place in a tree where new elements can go.
#[derive(Debug, Clone)]
pub struct Position<L: Language> {
    repr: PositionRepr<L>,
}

#[derive(Debug, Clone)]
enum PositionRepr<L: Language> {
    FirstChildOf(SyntaxNode<L>),
    LastChildOf(SyntaxNode<L>),
    Before(SyntaxElement<L>),
    After(SyntaxElement<L>),
}

impl<L: Language> Position<L> {
    pub fn first_child_of(node: &SyntaxNode<L>) -> Position<L> {
        Position {
            repr: PositionRepr::FirstChildOf(node.clone()),
        }
    }

    pub fn last_child_of(node: &SyntaxNode<L>) -> Position<L> {
        Position {
            repr: PositionRepr::LastChildOf(node.clone()),
        }
    }

    pub fn before(element: impl Into<SyntaxElement<L>>) -> Position<L> {
        Position {
            repr: PositionRepr::Before(element.into()),
        }
    }

    pub fn after(element: impl Into<SyntaxElement<L>>) -> Position<L> {
        Position {
            repr: PositionRepr::After(element.into()),
        }
    }

    /// The parent node under which the insertion happens, and the child index
    /// the new elements start at.
    fn resolve(self) -> Result<(SyntaxNode<L>, usize), EditError> {
        match self.repr {
            PositionRepr::FirstChildOf(node) => Ok((node, 0)),
            PositionRepr::LastChildOf(node) => {
                let index = node.green().children().len();
                Ok((node, index))
            }
            PositionRepr::Before(element) => {
                let parent = element.parent().ok_or(EditError::InvalidPosition)?;
                Ok((parent, element.index()))
            }
            PositionRepr::After(element) => {
                let parent = element.parent().ok_or(EditError::InvalidPosition)?;
                Ok((parent, element.index() + 1))
            }
        }
    }
}

/// Returns a new green root in which `target` is substituted by
/// `replacement`.
///
/// Replacing the root itself is allowed if the replacement is a node; the
/// replacement green is then the result. Unlike
/// [`SyntaxNode::replace_with`], the replacement may be of a different kind.
pub fn replace<L: Language>(
    root: &SyntaxNode<L>,
    target: &SyntaxElement<L>,
    replacement: impl Into<GreenElement>,
) -> Result<GreenNode, EditError> {
    let replacement = replacement.into();
    ensure_attached(root, target)?;
    let added = u64::from(u32::from(replacement.text_len()));
    let removed = u64::from(u32::from(target.text_range().len()));
    check_len(root, added, removed)?;

    let parent = match target.parent() {
        Some(parent) => parent,
        // target is the root itself
        None => {
            return match replacement {
                NodeOrToken::Node(node) => Ok(node),
                NodeOrToken::Token(_) => Err(EditError::ReplaceRootWithToken),
            };
        }
    };
    let new_parent = parent.green().replace_child(target.index(), replacement);
    Ok(parent.reroot(new_parent))
}

/// Returns a new green root with `element` inserted at `position`.
pub fn insert<L: Language>(
    root: &SyntaxNode<L>,
    position: Position<L>,
    element: impl Into<GreenElement>,
) -> Result<GreenNode, EditError> {
    insert_all(root, position, vec![element.into()])
}

/// Returns a new green root with all of `elements` inserted, in order,
/// starting at `position`.
pub fn insert_all<L: Language>(
    root: &SyntaxNode<L>,
    position: Position<L>,
    elements: Vec<GreenElement>,
) -> Result<GreenNode, EditError> {
    let (parent, index) = position.resolve()?;
    ensure_attached(root, &parent.clone().into())?;
    let added: u64 = elements.iter().map(|element| u64::from(u32::from(element.text_len()))).sum();
    check_len(root, added, 0)?;

    let new_parent = parent.green().splice_children(index..index, elements);
    Ok(parent.reroot(new_parent))
}

/// Returns a new green root without `target` (and its whole subtree).
pub fn remove<L: Language>(root: &SyntaxNode<L>, target: &SyntaxElement<L>) -> Result<GreenNode, EditError> {
    ensure_attached(root, target)?;
    let parent = target.parent().ok_or(EditError::RemoveRoot)?;
    let new_parent = parent.green().remove_child(target.index());
    Ok(parent.reroot(new_parent))
}

/// Checks that `element` is reachable from `root`, i.e. that walking up its
/// parents ends at the very green tree `root` views.
///
/// Comparison is by allocation, not value: an element from a structurally
/// identical but separately built tree is foreign.
fn ensure_attached<L: Language>(root: &SyntaxNode<L>, element: &SyntaxElement<L>) -> Result<(), EditError> {
    if root.parent().is_some() {
        return Err(EditError::ForeignNode);
    }
    let top = match element {
        NodeOrToken::Node(node) => node.root(),
        NodeOrToken::Token(token) => token.parent().root(),
    };
    if top.green().ptr_eq(root.green()) {
        Ok(())
    } else {
        Err(EditError::ForeignNode)
    }
}

/// Verifies that the edited tree's total length still fits in a `TextSize`.
///
/// Lengths are summed in `u64` so the check itself cannot overflow.
fn check_len<L: Language>(root: &SyntaxNode<L>, added: u64, removed: u64) -> Result<(), EditError> {
    let current = u64::from(u32::from(root.green().text_len()));
    let new = current + added - removed;
    if new > u64::from(u32::MAX) {
        return Err(EditError::Overflow);
    }
    Ok(())
}
