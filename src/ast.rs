//! Typed layer over the untyped tree: traits for typed node and token
//! wrappers, accessors for their children, and kind-and-range pointers that
//! survive re-parses of unchanged trees.
//!
//! A typed wrapper is a zero-cost view: casting checks the kind and wraps
//! the node, it never allocates or walks the tree.

use std::{fmt, hash::Hash, hash::Hasher, marker::PhantomData};

use crate::{
    syntax::{SyntaxNode, SyntaxToken},
    Language, SyntaxKind, TextRange,
};

/// A typed view of a [`SyntaxNode`].
///
/// Implementations are expected to be fieldless newtypes around
/// `SyntaxNode<Self::Language>`, with `cast` checking [`can_cast`] on the
/// node's kind and `syntax` returning the wrapped node unchanged.
///
/// [`can_cast`]: AstNode::can_cast
pub trait AstNode {
    type Language: Language;

    fn can_cast(kind: <Self::Language as Language>::Kind) -> bool
    where
        Self: Sized;

    fn cast(syntax: SyntaxNode<Self::Language>) -> Option<Self>
    where
        Self: Sized;

    fn syntax(&self) -> &SyntaxNode<Self::Language>;
}

/// Like [`AstNode`], but for tokens.
pub trait AstToken {
    type Language: Language;

    fn can_cast(kind: <Self::Language as Language>::Kind) -> bool
    where
        Self: Sized;

    fn cast(syntax: SyntaxToken<Self::Language>) -> Option<Self>
    where
        Self: Sized;

    fn syntax(&self) -> &SyntaxToken<Self::Language>;

    fn text(&self) -> &str {
        self.syntax().text()
    }
}

/// An iterator over `SyntaxNode` children of a particular AST type.
pub struct AstChildren<N: AstNode> {
    inner: crate::syntax::SyntaxNodeChildren<N::Language>,
    ph:    PhantomData<N>,
}

impl<N: AstNode> AstChildren<N> {
    fn new(parent: &SyntaxNode<N::Language>) -> Self {
        AstChildren {
            inner: parent.children(),
            ph:    PhantomData,
        }
    }
}

impl<N: AstNode> Clone for AstChildren<N> {
    fn clone(&self) -> Self {
        AstChildren {
            inner: self.inner.clone(),
            ph:    PhantomData,
        }
    }
}

impl<N: AstNode> fmt::Debug for AstChildren<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstChildren").field("inner", &self.inner).finish()
    }
}

impl<N: AstNode> Iterator for AstChildren<N> {
    type Item = N;

    fn next(&mut self) -> Option<N> {
        self.inner.find_map(N::cast)
    }
}

impl<N: AstNode> std::iter::FusedIterator for AstChildren<N> {}

/// Accessors used by generated or hand-written typed wrappers to reach
/// their children.
pub mod support {
    use super::{AstChildren, AstNode};
    use crate::{syntax::SyntaxNode, syntax::SyntaxToken, Language};

    /// The first child of `parent` that casts to `N`.
    pub fn child<N: AstNode>(parent: &SyntaxNode<N::Language>) -> Option<N> {
        parent.children().find_map(N::cast)
    }

    /// All children of `parent` that cast to `N`, in order.
    pub fn children<N: AstNode>(parent: &SyntaxNode<N::Language>) -> AstChildren<N> {
        AstChildren::new(parent)
    }

    /// The first token child of `parent` with the given kind.
    pub fn token<L: Language>(parent: &SyntaxNode<L>, kind: L::Kind) -> Option<SyntaxToken<L>> {
        parent
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| token.kind() == kind)
    }
}

/// A "pointer" to a [`SyntaxNode`]: a pair of the node's kind and its range.
///
/// Pointers stay valid across tree versions as long as the pointed-to
/// region did not change, and can be resolved against any root with
/// [`to_node`]. Unlike a `SyntaxNode`, a pointer is `Send` and `Sync` and
/// does not keep the tree alive.
///
/// [`to_node`]: SyntaxNodePtr::to_node
pub struct SyntaxNodePtr<L: Language> {
    kind:  SyntaxKind,
    range: TextRange,
    ph:    PhantomData<fn(L) -> L>,
}

impl<L: Language> Clone for SyntaxNodePtr<L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<L: Language> Copy for SyntaxNodePtr<L> {}

impl<L: Language> PartialEq for SyntaxNodePtr<L> {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.range == other.range
    }
}

impl<L: Language> Eq for SyntaxNodePtr<L> {}

impl<L: Language> Hash for SyntaxNodePtr<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.range.hash(state);
    }
}

impl<L: Language> fmt::Debug for SyntaxNodePtr<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxNodePtr")
            .field("kind", &L::kind_from_raw(self.kind))
            .field("range", &self.range)
            .finish()
    }
}

impl<L: Language> SyntaxNodePtr<L> {
    pub fn new(node: &SyntaxNode<L>) -> Self {
        SyntaxNodePtr {
            kind:  node.syntax_kind(),
            range: node.text_range(),
            ph:    PhantomData,
        }
    }

    /// "Dereferences" the pointer: descends from `root` along nodes covering
    /// the pointed-to range until a node with matching kind and range is
    /// found.
    ///
    /// Returns `None` if `root` is a different (or edited) tree with no such
    /// node; a pointer taken in one tree version is only guaranteed to
    /// resolve in versions where its region is untouched.
    pub fn to_node(&self, root: &SyntaxNode<L>) -> Option<SyntaxNode<L>> {
        let mut node = root.clone();
        loop {
            if node.syntax_kind() == self.kind && node.text_range() == self.range {
                return Some(node);
            }
            node = node
                .children()
                .find(|child| child.text_range().contains_range(self.range))?;
        }
    }

    pub fn kind(&self) -> L::Kind {
        L::kind_from_raw(self.kind)
    }

    pub fn text_range(&self) -> TextRange {
        self.range
    }
}

/// Like [`SyntaxNodePtr`], but remembers the type of the pointed-to node.
pub struct AstPtr<N: AstNode> {
    raw: SyntaxNodePtr<N::Language>,
    ph:  PhantomData<fn(N) -> N>,
}

impl<N: AstNode> Clone for AstPtr<N> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<N: AstNode> Copy for AstPtr<N> {}

impl<N: AstNode> PartialEq for AstPtr<N> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<N: AstNode> Eq for AstPtr<N> {}

impl<N: AstNode> Hash for AstPtr<N> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<N: AstNode> fmt::Debug for AstPtr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstPtr").field("raw", &self.raw).finish()
    }
}

impl<N: AstNode> AstPtr<N> {
    pub fn new(node: &N) -> Self {
        AstPtr {
            raw: SyntaxNodePtr::new(node.syntax()),
            ph:  PhantomData,
        }
    }

    pub fn to_node(&self, root: &SyntaxNode<N::Language>) -> Option<N> {
        N::cast(self.raw.to_node(root)?)
    }

    pub fn syntax_node_ptr(&self) -> SyntaxNodePtr<N::Language> {
        self.raw
    }

    /// Retypes the pointer, if the pointed-to kind admits `U`.
    pub fn cast<U: AstNode<Language = N::Language>>(self) -> Option<AstPtr<U>> {
        if !U::can_cast(self.raw.kind()) {
            return None;
        }
        Some(AstPtr {
            raw: self.raw,
            ph:  PhantomData,
        })
    }
}

impl<N: AstNode> From<AstPtr<N>> for SyntaxNodePtr<N::Language> {
    fn from(ptr: AstPtr<N>) -> SyntaxNodePtr<N::Language> {
        ptr.raw
    }
}
