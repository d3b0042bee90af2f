use crate::{
    green::GreenElement,
    syntax::{SyntaxNode, SyntaxToken},
    Language, NodeOrToken, SyntaxKind, TextRange, TextSize,
};

/// An element of the red tree: either a node or a token.
pub type SyntaxElement<L> = NodeOrToken<SyntaxNode<L>, SyntaxToken<L>>;

impl<L: Language> From<SyntaxNode<L>> for SyntaxElement<L> {
    #[inline]
    fn from(node: SyntaxNode<L>) -> SyntaxElement<L> {
        NodeOrToken::Node(node)
    }
}

impl<L: Language> From<SyntaxToken<L>> for SyntaxElement<L> {
    #[inline]
    fn from(token: SyntaxToken<L>) -> SyntaxElement<L> {
        NodeOrToken::Token(token)
    }
}

impl<L: Language> SyntaxElement<L> {
    pub(crate) fn new(green: GreenElement, parent: SyntaxNode<L>, index: u32, offset: TextSize) -> SyntaxElement<L> {
        match green {
            NodeOrToken::Node(node) => SyntaxNode::new_child(node, parent, index, offset).into(),
            NodeOrToken::Token(token) => SyntaxToken::new(token, parent, index, offset).into(),
        }
    }

    /// The kind of this element in terms of your language.
    #[inline]
    pub fn kind(&self) -> L::Kind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    /// The kind of this element in terms of your language's raw representation.
    #[inline]
    pub fn syntax_kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.syntax_kind(),
            NodeOrToken::Token(token) => token.syntax_kind(),
        }
    }

    /// The range this element covers in the source text, in bytes.
    #[inline]
    pub fn text_range(&self) -> TextRange {
        match self {
            NodeOrToken::Node(node) => node.text_range(),
            NodeOrToken::Token(token) => token.text_range(),
        }
    }

    /// The index of this element among its parent's children.
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            NodeOrToken::Node(node) => node.index(),
            NodeOrToken::Token(token) => token.index(),
        }
    }

    /// The parent node of this element, except if this element is the root.
    #[inline]
    pub fn parent(&self) -> Option<SyntaxNode<L>> {
        match self {
            NodeOrToken::Node(node) => node.parent(),
            NodeOrToken::Token(token) => Some(token.parent()),
        }
    }

    /// All ancestor nodes of this element, starting with `self` for nodes and
    /// the parent for tokens.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<L>> {
        match self {
            NodeOrToken::Node(node) => node.ancestors(),
            NodeOrToken::Token(token) => token.parent().ancestors(),
        }
    }

    /// The next sibling element of this element, if any.
    pub fn next_sibling_or_token(&self) -> Option<SyntaxElement<L>> {
        match self {
            NodeOrToken::Node(node) => node.next_sibling_or_token(),
            NodeOrToken::Token(token) => token.next_sibling_or_token(),
        }
    }

    /// The previous sibling element of this element, if any.
    pub fn prev_sibling_or_token(&self) -> Option<SyntaxElement<L>> {
        match self {
            NodeOrToken::Node(node) => node.prev_sibling_or_token(),
            NodeOrToken::Token(token) => token.prev_sibling_or_token(),
        }
    }

    /// The first token in the subtree rooted at this element (which may be
    /// this element itself).
    pub fn first_token(&self) -> Option<SyntaxToken<L>> {
        match self {
            NodeOrToken::Node(node) => node.first_token(),
            NodeOrToken::Token(token) => Some(token.clone()),
        }
    }

    /// The last token in the subtree rooted at this element (which may be
    /// this element itself).
    pub fn last_token(&self) -> Option<SyntaxToken<L>> {
        match self {
            NodeOrToken::Node(node) => node.last_token(),
            NodeOrToken::Token(token) => Some(token.clone()),
        }
    }
}
