use std::{
    fmt,
    hash::{Hash, Hasher},
};

use crate::{
    green::{GreenNode, GreenToken},
    syntax::{SyntaxElement, SyntaxNode},
    Direction, Language, SyntaxKind, TextRange, TextSize,
};

/// Leaf of the red tree: a token with an absolute position and a parent
/// link.
///
/// Like [`SyntaxNode`], tokens are ephemeral handles materialized during
/// traversal; the text itself lives in the shared [`GreenToken`].
pub struct SyntaxToken<L: Language> {
    parent: SyntaxNode<L>,
    index:  u32,
    offset: TextSize,
    green:  GreenToken,
}

impl<L: Language> Clone for SyntaxToken<L> {
    fn clone(&self) -> Self {
        SyntaxToken {
            parent: self.parent.clone(),
            index:  self.index,
            offset: self.offset,
            green:  self.green.clone(),
        }
    }
}

impl<L: Language> PartialEq for SyntaxToken<L> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.green == other.green
    }
}

impl<L: Language> Eq for SyntaxToken<L> {}

impl<L: Language> Hash for SyntaxToken<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.offset.hash(state);
        self.green.hash(state);
    }
}

impl<L: Language> fmt::Debug for SyntaxToken<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.text_range())?;
        if self.text().len() < 25 {
            return write!(f, " {:?}", self.text());
        }
        let text = self.text();
        for idx in 21..25 {
            if text.is_char_boundary(idx) {
                let text = format!("{} ...", &text[..idx]);
                return write!(f, " {:?}", text);
            }
        }
        unreachable!()
    }
}

impl<L: Language> fmt::Display for SyntaxToken<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.text(), f)
    }
}

impl<L: Language> SyntaxToken<L> {
    pub(crate) fn new(green: GreenToken, parent: SyntaxNode<L>, index: u32, offset: TextSize) -> Self {
        SyntaxToken {
            parent,
            index,
            offset,
            green,
        }
    }

    /// The kind of this token in terms of your language.
    #[inline]
    pub fn kind(&self) -> L::Kind {
        L::kind_from_raw(self.syntax_kind())
    }

    /// The kind of this token in terms of your language's raw representation.
    #[inline]
    pub fn syntax_kind(&self) -> SyntaxKind {
        self.green.kind()
    }

    /// The source text of this token.
    #[inline]
    pub fn text(&self) -> &str {
        self.green.text()
    }

    /// The range this token covers in the source text, in bytes.
    #[inline]
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.offset, self.green.text_len())
    }

    /// The green token backing this token.
    #[inline]
    pub fn green(&self) -> &GreenToken {
        &self.green
    }

    /// The index of this token among its parent's children.
    #[inline]
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// The parent node of this token.
    #[inline]
    pub fn parent(&self) -> SyntaxNode<L> {
        self.parent.clone()
    }

    /// All ancestor nodes of this token, starting with its parent.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<L>> {
        self.parent.ancestors()
    }

    /// The next sibling element of this token, if any.
    pub fn next_sibling_or_token(&self) -> Option<SyntaxElement<L>> {
        let index = self.index as usize + 1;
        let mut children = self.parent.green().children();
        let green = children.nth(index)?;
        Some(SyntaxElement::new(
            green.cloned(),
            self.parent.clone(),
            index as u32,
            self.text_range().end(),
        ))
    }

    /// The previous sibling element of this token, if any.
    pub fn prev_sibling_or_token(&self) -> Option<SyntaxElement<L>> {
        let index = (self.index as usize).checked_sub(1)?;
        self.parent.child_or_token_at(index)
    }

    /// Returns an iterator over this token and its sibling elements in
    /// `direction`.
    pub fn siblings_with_tokens(&self, direction: Direction) -> impl Iterator<Item = SyntaxElement<L>> {
        let me: SyntaxElement<L> = self.clone().into();
        std::iter::successors(Some(me), move |element| match direction {
            Direction::Next => element.next_sibling_or_token(),
            Direction::Prev => element.prev_sibling_or_token(),
        })
    }

    /// The token that follows this one in the tree's text, possibly under a
    /// different parent.
    pub fn next_token(&self) -> Option<SyntaxToken<L>> {
        match self.next_sibling_or_token() {
            Some(element) => element.first_token(),
            None => self
                .ancestors()
                .find_map(|node| node.next_sibling_or_token())
                .and_then(|element| element.first_token()),
        }
    }

    /// The token that precedes this one in the tree's text, possibly under a
    /// different parent.
    pub fn prev_token(&self) -> Option<SyntaxToken<L>> {
        match self.prev_sibling_or_token() {
            Some(element) => element.last_token(),
            None => self
                .ancestors()
                .find_map(|node| node.prev_sibling_or_token())
                .and_then(|element| element.last_token()),
        }
    }

    /// Returns a green tree, equal to the green tree this token belongs to,
    /// except with this token substituted by `replacement`. The replacement
    /// must be of the same kind.
    ///
    /// Only the path from this token's parent to the root is rebuilt.
    pub fn replace_with(&self, replacement: GreenToken) -> GreenNode {
        assert_eq!(self.syntax_kind(), replacement.kind());
        let new_parent = self.parent.green().replace_child(self.index(), replacement.into());
        self.parent.reroot(new_parent)
    }
}
