//! Red tree iterators.

use std::iter::FusedIterator;

use crate::{
    syntax::{SyntaxElement, SyntaxNode},
    Language, NodeOrToken, TextSize, WalkEvent,
};

/// An iterator over the children of a [`SyntaxNode`], including tokens.
///
/// Children are materialized on the fly with a running offset; nothing is
/// cached in the parent.
#[derive(Clone, Debug)]
pub struct SyntaxElementChildren<L: Language> {
    parent: SyntaxNode<L>,
    index:  usize,
    offset: TextSize,
}

impl<L: Language> SyntaxElementChildren<L> {
    pub(crate) fn new(parent: SyntaxNode<L>) -> Self {
        let offset = parent.text_range().start();
        Self {
            parent,
            index: 0,
            offset,
        }
    }
}

impl<L: Language> Iterator for SyntaxElementChildren<L> {
    type Item = SyntaxElement<L>;

    fn next(&mut self) -> Option<Self::Item> {
        let green = self.parent.green().children().nth(self.index)?.cloned();
        let index = self.index as u32;
        let offset = self.offset;
        self.index += 1;
        self.offset += green.text_len();
        Some(SyntaxElement::new(green, self.parent.clone(), index, offset))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.parent.green().children().len() - self.index;
        (remaining, Some(remaining))
    }
}

impl<L: Language> ExactSizeIterator for SyntaxElementChildren<L> {}
impl<L: Language> FusedIterator for SyntaxElementChildren<L> {}

/// An iterator over the child nodes of a [`SyntaxNode`].
#[derive(Clone, Debug)]
pub struct SyntaxNodeChildren<L: Language> {
    inner: SyntaxElementChildren<L>,
}

impl<L: Language> SyntaxNodeChildren<L> {
    pub(crate) fn new(parent: SyntaxNode<L>) -> Self {
        Self {
            inner: SyntaxElementChildren::new(parent),
        }
    }
}

impl<L: Language> Iterator for SyntaxNodeChildren<L> {
    type Item = SyntaxNode<L>;

    fn next(&mut self) -> Option<Self::Item> {
        for element in &mut self.inner {
            if let NodeOrToken::Node(node) = element {
                return Some(node);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.inner.size_hint().1)
    }
}

impl<L: Language> FusedIterator for SyntaxNodeChildren<L> {}

/// A preorder walk over the nodes of a subtree, yielding an
/// [`WalkEvent::Enter`] and [`WalkEvent::Leave`] event per node.
///
/// The walk keeps its whole state in this struct; it never recurses, so
/// adversarially deep trees cannot overflow the call stack.
#[derive(Debug)]
pub struct Preorder<L: Language> {
    start:        SyntaxNode<L>,
    next:         Option<WalkEvent<SyntaxNode<L>>>,
    skip_subtree: bool,
}

impl<L: Language> Preorder<L> {
    pub(crate) fn new(start: SyntaxNode<L>) -> Self {
        let next = Some(WalkEvent::Enter(start.clone()));
        Preorder {
            start,
            next,
            skip_subtree: false,
        }
    }

    /// Skips the subtree of the node whose `Enter` event was yielded last;
    /// its children are never materialized.
    pub fn skip_subtree(&mut self) {
        self.skip_subtree = true;
    }

    fn do_skip(&mut self) {
        self.next = self.next.take().map(|next| match next {
            WalkEvent::Enter(first_child) => WalkEvent::Leave(
                first_child
                    .parent()
                    .expect("can only skip the subtree of an entered node"),
            ),
            WalkEvent::Leave(parent) => WalkEvent::Leave(parent),
        });
    }
}

impl<L: Language> Iterator for Preorder<L> {
    type Item = WalkEvent<SyntaxNode<L>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.skip_subtree {
            self.do_skip();
            self.skip_subtree = false;
        }
        let next = self.next.take();
        self.next = next.as_ref().and_then(|next| {
            Some(match next {
                WalkEvent::Enter(node) => match node.first_child() {
                    Some(child) => WalkEvent::Enter(child),
                    None => WalkEvent::Leave(node.clone()),
                },
                WalkEvent::Leave(node) => {
                    if node == &self.start {
                        return None;
                    }
                    match node.next_sibling() {
                        Some(sibling) => WalkEvent::Enter(sibling),
                        None => WalkEvent::Leave(node.parent()?),
                    }
                }
            })
        });
        next
    }
}

impl<L: Language> FusedIterator for Preorder<L> {}

/// A preorder walk over a subtree yielding events for nodes and tokens.
#[derive(Debug)]
pub struct PreorderWithTokens<L: Language> {
    start:        SyntaxElement<L>,
    next:         Option<WalkEvent<SyntaxElement<L>>>,
    skip_subtree: bool,
}

impl<L: Language> PreorderWithTokens<L> {
    pub(crate) fn new(start: SyntaxNode<L>) -> Self {
        let start: SyntaxElement<L> = start.into();
        let next = Some(WalkEvent::Enter(start.clone()));
        PreorderWithTokens {
            start,
            next,
            skip_subtree: false,
        }
    }

    /// Skips the subtree of the element whose `Enter` event was yielded last.
    pub fn skip_subtree(&mut self) {
        self.skip_subtree = true;
    }

    fn do_skip(&mut self) {
        self.next = self.next.take().map(|next| match next {
            WalkEvent::Enter(first_child) => WalkEvent::Leave(
                first_child
                    .parent()
                    .expect("can only skip the subtree of an entered element")
                    .into(),
            ),
            WalkEvent::Leave(parent) => WalkEvent::Leave(parent),
        });
    }
}

impl<L: Language> Iterator for PreorderWithTokens<L> {
    type Item = WalkEvent<SyntaxElement<L>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.skip_subtree {
            self.do_skip();
            self.skip_subtree = false;
        }
        let next = self.next.take();
        self.next = next.as_ref().and_then(|next| {
            Some(match next {
                WalkEvent::Enter(element) => match element {
                    NodeOrToken::Node(node) => match node.first_child_or_token() {
                        Some(child) => WalkEvent::Enter(child),
                        None => WalkEvent::Leave(node.clone().into()),
                    },
                    NodeOrToken::Token(token) => WalkEvent::Leave(token.clone().into()),
                },
                WalkEvent::Leave(element) => {
                    if element == &self.start {
                        return None;
                    }
                    match element.next_sibling_or_token() {
                        Some(sibling) => WalkEvent::Enter(sibling),
                        None => WalkEvent::Leave(element.parent()?.into()),
                    }
                }
            })
        });
        next
    }
}

impl<L: Language> FusedIterator for PreorderWithTokens<L> {}
