use std::{
    fmt,
    hash::{Hash, Hasher},
    iter,
    marker::PhantomData,
    rc::Rc,
};

use crate::{
    green::GreenNode,
    syntax::{
        iter::{Preorder, PreorderWithTokens, SyntaxElementChildren, SyntaxNodeChildren},
        SyntaxElement, SyntaxToken,
    },
    syntax_text::SyntaxText,
    Direction, Language, NodeOrToken, SyntaxKind, TextRange, TextSize, TokenAtOffset, WalkEvent,
};

/// Inner syntax tree node, a parent- and position-aware view over a
/// [`GreenNode`].
///
/// Syntax nodes are cheap, `Rc`-backed handles created on demand while
/// navigating the tree; they are not cached, so repeated child access
/// recomputes sibling offsets (O(children) per access). Cloning a node is
/// a reference-count bump. Nodes are intentionally not `Send`: share the
/// green tree across threads and build a fresh red view per thread instead.
pub struct SyntaxNode<L: Language> {
    data: Rc<NodeData<L>>,
}

struct NodeData<L: Language> {
    parent: Option<SyntaxNode<L>>,
    index:  u32,
    offset: TextSize,
    green:  GreenNode,
    _lang:  PhantomData<L>,
}

impl<L: Language> Clone for SyntaxNode<L> {
    fn clone(&self) -> Self {
        SyntaxNode {
            data: Rc::clone(&self.data),
        }
    }
}

// Red nodes compare by green value plus absolute position, not by identity:
// two handles materialized independently over the same spot are equal.
impl<L: Language> PartialEq for SyntaxNode<L> {
    fn eq(&self, other: &Self) -> bool {
        self.data.offset == other.data.offset && self.data.green == other.data.green
    }
}

impl<L: Language> Eq for SyntaxNode<L> {}

impl<L: Language> Hash for SyntaxNode<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.offset.hash(state);
        self.data.green.hash(state);
    }
}

impl<L: Language> fmt::Debug for SyntaxNode<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{:?}", self.kind(), self.text_range())
    }
}

impl<L: Language> fmt::Display for SyntaxNode<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.preorder_with_tokens()
            .filter_map(|event| match event {
                WalkEvent::Enter(NodeOrToken::Token(token)) => Some(token),
                _ => None,
            })
            .try_for_each(|token| fmt::Display::fmt(&token, f))
    }
}

impl<L: Language> SyntaxNode<L> {
    /// Turns a finished green tree into a navigable syntax tree.
    ///
    /// The root is positioned at offset 0 and has no parent.
    pub fn new_root(green: GreenNode) -> Self {
        SyntaxNode {
            data: Rc::new(NodeData {
                parent: None,
                index: 0,
                offset: 0.into(),
                green,
                _lang: PhantomData,
            }),
        }
    }

    pub(crate) fn new_child(green: GreenNode, parent: SyntaxNode<L>, index: u32, offset: TextSize) -> Self {
        SyntaxNode {
            data: Rc::new(NodeData {
                parent: Some(parent),
                index,
                offset,
                green,
                _lang: PhantomData,
            }),
        }
    }

    /// The kind of this node in terms of your language.
    #[inline]
    pub fn kind(&self) -> L::Kind {
        L::kind_from_raw(self.syntax_kind())
    }

    /// The kind of this node in terms of your language's raw representation.
    #[inline]
    pub fn syntax_kind(&self) -> SyntaxKind {
        self.data.green.kind()
    }

    /// The range this node covers in the source text, in bytes.
    #[inline]
    pub fn text_range(&self) -> TextRange {
        TextRange::at(self.data.offset, self.data.green.text_len())
    }

    /// The source text covered by this node, as a lazily evaluated
    /// [`SyntaxText`] assembled from the subtree's tokens.
    #[inline]
    pub fn text(&self) -> SyntaxText<'_, L> {
        SyntaxText::new(self)
    }

    /// The green element backing this node.
    #[inline]
    pub fn green(&self) -> &GreenNode {
        &self.data.green
    }

    /// The index of this node among its parent's children.
    #[inline]
    pub fn index(&self) -> usize {
        self.data.index as usize
    }

    /// The parent of this node, if it is not the root.
    #[inline]
    pub fn parent(&self) -> Option<SyntaxNode<L>> {
        self.data.parent.clone()
    }

    /// This node and all its ancestors, up to and including the root.
    pub fn ancestors(&self) -> impl Iterator<Item = SyntaxNode<L>> {
        iter::successors(Some(self.clone()), SyntaxNode::parent)
    }

    /// The root of the tree this node belongs to.
    pub fn root(&self) -> SyntaxNode<L> {
        let mut current = self.clone();
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    /// An iterator over the child nodes of this node.
    #[inline]
    pub fn children(&self) -> SyntaxNodeChildren<L> {
        SyntaxNodeChildren::new(self.clone())
    }

    /// An iterator over all children of this node, including tokens.
    #[inline]
    pub fn children_with_tokens(&self) -> SyntaxElementChildren<L> {
        SyntaxElementChildren::new(self.clone())
    }

    /// Materializes the child element at `index`, computing its offset by
    /// summing the lengths of the preceding siblings.
    pub(crate) fn child_or_token_at(&self, index: usize) -> Option<SyntaxElement<L>> {
        let mut offset = self.data.offset;
        let mut children = self.data.green.children();
        for _ in 0..index {
            offset += children.next()?.text_len();
        }
        let green = children.next()?;
        Some(SyntaxElement::new(green.cloned(), self.clone(), index as u32, offset))
    }

    /// The first child node of this node, if any.
    pub fn first_child(&self) -> Option<SyntaxNode<L>> {
        self.children().next()
    }

    /// The last child node of this node, if any.
    pub fn last_child(&self) -> Option<SyntaxNode<L>> {
        self.children().last()
    }

    /// The first child element of this node, if any.
    pub fn first_child_or_token(&self) -> Option<SyntaxElement<L>> {
        self.child_or_token_at(0)
    }

    /// The last child element of this node, if any.
    pub fn last_child_or_token(&self) -> Option<SyntaxElement<L>> {
        self.children_with_tokens().last()
    }

    /// The next sibling node of this node, if any.
    pub fn next_sibling(&self) -> Option<SyntaxNode<L>> {
        let parent = self.parent()?;
        let mut offset = self.text_range().end();
        let mut index = self.data.index + 1;
        let mut children = parent.data.green.children();
        children.nth(self.data.index as usize)?;
        for green in children {
            if let NodeOrToken::Node(node) = green {
                return Some(SyntaxNode::new_child(node.clone(), parent.clone(), index, offset));
            }
            offset += green.text_len();
            index += 1;
        }
        None
    }

    /// The previous sibling node of this node, if any.
    pub fn prev_sibling(&self) -> Option<SyntaxNode<L>> {
        let parent = self.parent()?;
        let mut offset = parent.data.offset;
        let mut prev: Option<(u32, TextSize, GreenNode)> = None;
        for (index, green) in parent.data.green.children().enumerate().take(self.data.index as usize) {
            if let NodeOrToken::Node(node) = green {
                prev = Some((index as u32, offset, node.clone()));
            }
            offset += green.text_len();
        }
        prev.map(|(index, offset, green)| SyntaxNode::new_child(green, parent.clone(), index, offset))
    }

    /// The next sibling element of this node, if any.
    pub fn next_sibling_or_token(&self) -> Option<SyntaxElement<L>> {
        let parent = self.parent()?;
        let index = self.data.index as usize + 1;
        let mut children = parent.data.green.children();
        let green = children.nth(index)?;
        Some(SyntaxElement::new(
            green.cloned(),
            parent.clone(),
            index as u32,
            self.text_range().end(),
        ))
    }

    /// The previous sibling element of this node, if any.
    pub fn prev_sibling_or_token(&self) -> Option<SyntaxElement<L>> {
        let parent = self.parent()?;
        let index = (self.data.index as usize).checked_sub(1)?;
        parent.child_or_token_at(index)
    }

    /// Returns an iterator over this node and its siblings in `direction`.
    pub fn siblings(&self, direction: Direction) -> impl Iterator<Item = SyntaxNode<L>> {
        iter::successors(Some(self.clone()), move |node| match direction {
            Direction::Next => node.next_sibling(),
            Direction::Prev => node.prev_sibling(),
        })
    }

    /// Returns an iterator over this node and its sibling elements in `direction`.
    pub fn siblings_with_tokens(&self, direction: Direction) -> impl Iterator<Item = SyntaxElement<L>> {
        let me: SyntaxElement<L> = self.clone().into();
        iter::successors(Some(me), move |element| match direction {
            Direction::Next => element.next_sibling_or_token(),
            Direction::Prev => element.prev_sibling_or_token(),
        })
    }

    /// The first token that is part of this subtree, if any.
    pub fn first_token(&self) -> Option<SyntaxToken<L>> {
        let mut element = self.first_child_or_token()?;
        loop {
            match element {
                NodeOrToken::Token(token) => return Some(token),
                NodeOrToken::Node(node) => element = node.first_child_or_token()?,
            }
        }
    }

    /// The last token that is part of this subtree, if any.
    pub fn last_token(&self) -> Option<SyntaxToken<L>> {
        let mut element = self.last_child_or_token()?;
        loop {
            match element {
                NodeOrToken::Token(token) => return Some(token),
                NodeOrToken::Node(node) => element = node.last_child_or_token()?,
            }
        }
    }

    /// An iterator over all nodes in this subtree in preorder, including this
    /// node.
    pub fn descendants(&self) -> impl Iterator<Item = SyntaxNode<L>> {
        self.preorder().filter_map(|event| match event {
            WalkEvent::Enter(node) => Some(node),
            WalkEvent::Leave(_) => None,
        })
    }

    /// An iterator over all elements in this subtree in preorder, including
    /// this node.
    pub fn descendants_with_tokens(&self) -> impl Iterator<Item = SyntaxElement<L>> {
        self.preorder_with_tokens().filter_map(|event| match event {
            WalkEvent::Enter(element) => Some(element),
            WalkEvent::Leave(_) => None,
        })
    }

    /// Traverses this subtree in preorder, yielding an `Enter` and a `Leave`
    /// event per node. Subtrees can be skipped mid-walk via
    /// [`Preorder::skip_subtree`]. The walk is driven by an explicit state
    /// machine, so tree depth does not translate into call-stack depth.
    pub fn preorder(&self) -> Preorder<L> {
        Preorder::new(self.clone())
    }

    /// Like [`preorder`](SyntaxNode::preorder), but also yields events for
    /// tokens.
    pub fn preorder_with_tokens(&self) -> PreorderWithTokens<L> {
        PreorderWithTokens::new(self.clone())
    }

    /// Finds the token(s) at `offset` in this subtree.
    ///
    /// There are zero, one, or two answers: none if `offset` lies outside
    /// this node's range (or the tree is empty), one if `offset` falls inside
    /// a token, and two if it is exactly the boundary between two adjacent
    /// tokens — both are valid, and [`TokenAtOffset`] lets the caller pick a
    /// bias.
    pub fn token_at_offset(&self, offset: TextSize) -> TokenAtOffset<SyntaxToken<L>> {
        let range = self.text_range();
        if offset < range.start() || offset > range.end() || range.is_empty() {
            return TokenAtOffset::None;
        }
        let left = self.descend_biased(offset, Direction::Prev);
        let right = self.descend_biased(offset, Direction::Next);
        match (left, right) {
            (Some(left), Some(right)) if left == right => TokenAtOffset::Single(left),
            (Some(left), Some(right)) => TokenAtOffset::Between(left, right),
            (Some(single), None) | (None, Some(single)) => TokenAtOffset::Single(single),
            (None, None) => TokenAtOffset::None,
        }
    }

    /// Iteratively descends to the token touching `offset`, picking the first
    /// (`Prev`) or last (`Next`) candidate child at each level. Zero-length
    /// children never contain text and are skipped.
    fn descend_biased(&self, offset: TextSize, bias: Direction) -> Option<SyntaxToken<L>> {
        let mut element: SyntaxElement<L> = self.clone().into();
        loop {
            match element {
                NodeOrToken::Token(token) => return Some(token),
                NodeOrToken::Node(node) => {
                    let mut candidates = node.children_with_tokens().filter(|child| {
                        let range = child.text_range();
                        !range.is_empty() && range.start() <= offset && offset <= range.end()
                    });
                    element = match bias {
                        Direction::Prev => candidates.next()?,
                        Direction::Next => candidates.last()?,
                    };
                }
            }
        }
    }

    /// Finds the innermost element covering the whole of `range`.
    ///
    /// Returns this node itself when no smaller child covers the range.
    pub fn covering_element(&self, range: TextRange) -> SyntaxElement<L> {
        let mut element: SyntaxElement<L> = self.clone().into();
        loop {
            let node = match &element {
                NodeOrToken::Token(_) => return element,
                NodeOrToken::Node(node) => node.clone(),
            };
            let covering = node
                .children_with_tokens()
                .find(|child| child.text_range().contains_range(range));
            match covering {
                Some(child) => element = child,
                None => return element,
            }
        }
    }

    /// Returns a green tree, equal to the green tree this node belongs to,
    /// except with this node substituted by `replacement`. The replacement
    /// must be of the same kind, so that positions of untouched siblings are
    /// interpreted consistently.
    ///
    /// All untouched subtrees are shared between the old and the new tree;
    /// only the path from this node to the root is rebuilt.
    pub fn replace_with(&self, replacement: GreenNode) -> GreenNode {
        assert_eq!(self.syntax_kind(), replacement.kind());
        self.reroot(replacement)
    }

    /// Spine rebuilding: replaces this node's green with `green` and rebuilds
    /// every ancestor up to the root, sharing all off-path subtrees.
    pub(crate) fn reroot(&self, green: GreenNode) -> GreenNode {
        let mut node = self.clone();
        let mut green = green;
        loop {
            match node.parent() {
                None => return green,
                Some(parent) => {
                    green = parent.data.green.replace_child(node.index(), green.into());
                    node = parent;
                }
            }
        }
    }
}
