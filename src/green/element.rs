use crate::{
    green::{GreenNode, GreenToken},
    NodeOrToken, SyntaxKind, TextSize,
};

/// Leaf or internal element of the green tree.
pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// Reference to a leaf or internal element of the green tree.
pub(crate) type GreenElementRef<'a> = NodeOrToken<&'a GreenNode, &'a GreenToken>;

impl From<GreenNode> for GreenElement {
    #[inline]
    fn from(node: GreenNode) -> GreenElement {
        NodeOrToken::Node(node)
    }
}

impl From<GreenToken> for GreenElement {
    #[inline]
    fn from(token: GreenToken) -> GreenElement {
        NodeOrToken::Token(token)
    }
}

impl GreenElement {
    /// Returns the raw kind of this element.
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.as_ref().kind()
    }

    /// Returns the length of text covered by this element.
    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.as_ref().text_len()
    }
}

impl GreenElementRef<'_> {
    #[inline]
    pub(crate) fn kind(&self) -> SyntaxKind {
        match self {
            NodeOrToken::Node(node) => node.kind(),
            NodeOrToken::Token(token) => token.kind(),
        }
    }

    #[inline]
    pub(crate) fn text_len(&self) -> TextSize {
        match self {
            NodeOrToken::Node(node) => node.text_len(),
            NodeOrToken::Token(token) => token.text_len(),
        }
    }
}
