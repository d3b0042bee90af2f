use std::{
    fmt,
    hash::{Hash, Hasher},
    ops::Range,
    sync::Arc,
};

use crate::{
    green::{element::GreenElement, iter::GreenNodeChildren},
    SyntaxKind, TextSize,
};

#[derive(PartialEq, Eq, Hash)]
pub(super) struct GreenNodeData {
    pub(super) kind:     SyntaxKind,
    pub(super) text_len: TextSize,
    pub(super) children: Box<[GreenElement]>,
}

/// Internal node in the immutable "green" tree.
/// It contains other nodes and tokens as its children.
///
/// Green nodes are shared: cloning one only bumps a reference count, and the
/// same node may appear as a child of many parents (across tree versions in
/// particular). The total length of the text covered by a node is computed
/// once, at construction.
#[derive(Clone)]
pub struct GreenNode {
    pub(super) data: Arc<GreenNodeData>,
}

impl GreenNode {
    /// Creates a new node from its kind and an ordered sequence of children.
    #[inline]
    pub fn new<I>(kind: SyntaxKind, children: I) -> GreenNode
    where
        I: IntoIterator<Item = GreenElement>,
    {
        let children: Box<[GreenElement]> = children.into_iter().collect();
        let text_len = children.iter().map(GreenElement::text_len).sum::<TextSize>();
        GreenNode {
            data: Arc::new(GreenNodeData {
                kind,
                text_len,
                children,
            }),
        }
    }

    /// Raw [`SyntaxKind`] of this node.
    #[inline]
    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    /// Returns the length of text covered by this node.
    #[inline]
    pub fn text_len(&self) -> TextSize {
        self.data.text_len
    }

    /// Iterator over all children of this node.
    #[inline]
    pub fn children(&self) -> GreenNodeChildren<'_> {
        GreenNodeChildren {
            inner: self.data.children.iter(),
        }
    }

    /// Whether `self` and `other` are the same allocation.
    ///
    /// Implies, but is stronger than, `self == other`: two separately built
    /// but identical nodes are equal yet not `ptr_eq`.
    #[inline]
    pub fn ptr_eq(&self, other: &GreenNode) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Returns a new node with the child at `index` replaced by `new_child`.
    ///
    /// All other children are shared between the old and the new node.
    pub fn replace_child(&self, index: usize, new_child: GreenElement) -> GreenNode {
        self.splice_children(index..index + 1, Some(new_child))
    }

    /// Returns a new node with `new_child` inserted at `index`.
    pub fn insert_child(&self, index: usize, new_child: GreenElement) -> GreenNode {
        self.splice_children(index..index, Some(new_child))
    }

    /// Returns a new node without the child at `index`.
    pub fn remove_child(&self, index: usize) -> GreenNode {
        self.splice_children(index..index + 1, None)
    }

    /// Returns a new node with the children in `to_remove` replaced by
    /// `to_insert`, like [`Vec::splice`].
    ///
    /// # Panics
    /// If `to_remove` is out of bounds of this node's children.
    pub fn splice_children<I>(&self, to_remove: Range<usize>, to_insert: I) -> GreenNode
    where
        I: IntoIterator<Item = GreenElement>,
    {
        let old = &self.data.children;
        assert!(
            to_remove.start <= to_remove.end && to_remove.end <= old.len(),
            "invalid splice range {:?} for node with {} children",
            to_remove,
            old.len(),
        );
        let new: Vec<GreenElement> = old[..to_remove.start]
            .iter()
            .cloned()
            .chain(to_insert)
            .chain(old[to_remove.end..].iter().cloned())
            .collect();
        GreenNode::new(self.kind(), new)
    }
}

impl fmt::Debug for GreenNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GreenNode")
            .field("kind", &self.kind())
            .field("text_len", &self.text_len())
            .field("n_children", &self.data.children.len())
            .finish()
    }
}

impl PartialEq for GreenNode {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.data, &other.data) || self.data == other.data
    }
}

impl Eq for GreenNode {}

impl Hash for GreenNode {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.data.hash(state);
    }
}
