use std::marker::PhantomData;

use fxhash::{FxHashMap, FxHashSet};

use crate::{
    green::{GreenElement, GreenNode, GreenToken},
    utility_types::MaybeOwned,
    Language, NodeOrToken, SmolStr, SyntaxKind,
};

/// If `node.children() <= CHILDREN_CACHE_THRESHOLD`, we will not create
/// a new [`GreenNode`], but instead lookup in the cache if this node is
/// already present. If so we use the one in the cache, otherwise we insert
/// this node into the cache.
const CHILDREN_CACHE_THRESHOLD: usize = 3;

/// A `NodeCache` deduplicates identical tokens and small nodes during tree
/// construction. You can re-use the same cache for multiple similar trees
/// with [`GreenNodeBuilder::with_cache`].
///
/// Deduplication is purely a memory optimization: a cache hit returns a
/// shared handle to an equal green element, which is indistinguishable from
/// a freshly built one.
#[derive(Debug, Default)]
pub struct NodeCache {
    nodes:  FxHashSet<GreenNode>,
    tokens: FxHashMap<(SyntaxKind, SmolStr), GreenToken>,
}

impl NodeCache {
    /// Constructs a new, empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    fn node(&mut self, kind: SyntaxKind, children: Vec<GreenElement>) -> GreenNode {
        // Green nodes are fully immutable, so it's ok to deduplicate them.
        // This is the same optimization that Roslyn does
        // https://github.com/KirillOsenkov/Bliki/wiki/Roslyn-Immutable-Trees
        if children.len() > CHILDREN_CACHE_THRESHOLD {
            return GreenNode::new(kind, children);
        }
        let node = GreenNode::new(kind, children);
        match self.nodes.get(&node) {
            Some(existing) => existing.clone(),
            None => {
                self.nodes.insert(node.clone());
                node
            }
        }
    }

    fn token(&mut self, kind: SyntaxKind, text: &str) -> GreenToken {
        let text = SmolStr::new(text);
        self.tokens
            .entry((kind, text))
            .or_insert_with_key(|(kind, text)| GreenToken::new(*kind, text.clone()))
            .clone()
    }
}

/// A checkpoint for maybe wrapping a node. See [`GreenNodeBuilder::checkpoint`] for details.
#[derive(Clone, Copy, Debug)]
pub struct Checkpoint(usize);

/// A builder for green trees.
///
/// Construct with [`new`](GreenNodeBuilder::new) or
/// [`with_cache`](GreenNodeBuilder::with_cache). To add tree nodes, start
/// them with [`start_node`](GreenNodeBuilder::start_node), add
/// [`token`](GreenNodeBuilder::token)s and then
/// [`finish_node`](GreenNodeBuilder::finish_node). When the whole tree is
/// constructed, call [`finish`](GreenNodeBuilder::finish) to obtain the root.
///
/// The builder consumes a well-nested event stream: every `start_node` must
/// be matched by exactly one `finish_node` before `finish` is called. An
/// unbalanced stream is a bug in the producing parser, and the builder
/// panics on it rather than building a corrupt tree.
#[derive(Debug)]
pub struct GreenNodeBuilder<'cache, L: Language> {
    cache:    MaybeOwned<'cache, NodeCache>,
    parents:  Vec<(SyntaxKind, usize)>,
    children: Vec<GreenElement>,
    _marker:  PhantomData<L>,
}

impl<L: Language> GreenNodeBuilder<'static, L> {
    /// Creates new builder with an empty [`NodeCache`].
    pub fn new() -> Self {
        Self {
            cache:    MaybeOwned::Owned(NodeCache::new()),
            parents:  Vec::with_capacity(8),
            children: Vec::with_capacity(8),
            _marker:  PhantomData,
        }
    }
}

impl<L: Language> Default for GreenNodeBuilder<'static, L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'cache, L: Language> GreenNodeBuilder<'cache, L> {
    /// Reusing a [`NodeCache`] between multiple builders saves memory, as it
    /// allows to structurally share underlying trees.
    pub fn with_cache(cache: &'cache mut NodeCache) -> Self {
        Self {
            cache:    MaybeOwned::Borrowed(cache),
            parents:  Vec::with_capacity(8),
            children: Vec::with_capacity(8),
            _marker:  PhantomData,
        }
    }

    /// Add a new token to the current branch.
    #[inline]
    pub fn token(&mut self, kind: L::Kind, text: &str) {
        let token = self.cache.token(L::kind_to_raw(kind), text);
        self.children.push(token.into());
    }

    /// Start new node of the given `kind` and make it current.
    #[inline]
    pub fn start_node(&mut self, kind: L::Kind) {
        let len = self.children.len();
        self.parents.push((L::kind_to_raw(kind), len));
    }

    /// Finish the current branch and restore the previous branch as current.
    #[inline]
    pub fn finish_node(&mut self) {
        let (kind, first_child) = self
            .parents
            .pop()
            .expect("`finish_node` called without matching `start_node`");
        let children: Vec<_> = self.children.drain(first_child..).collect();
        let node = self.cache.node(kind, children);
        self.children.push(node.into());
    }

    /// Prepare for maybe wrapping the next node with a surrounding node.
    ///
    /// The way wrapping works is that you first get a checkpoint, then you
    /// add nodes and tokens as normal, and then you *maybe* call
    /// [`start_node_at`](GreenNodeBuilder::start_node_at).
    #[inline]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.children.len())
    }

    /// Wrap the previous branch marked by [`checkpoint`](GreenNodeBuilder::checkpoint)
    /// in a new branch and make it current.
    #[inline]
    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: L::Kind) {
        let Checkpoint(checkpoint) = checkpoint;
        assert!(
            checkpoint <= self.children.len(),
            "checkpoint no longer valid, was finish_node called early?"
        );

        if let Some(&(_, first_child)) = self.parents.last() {
            assert!(
                checkpoint >= first_child,
                "checkpoint no longer valid, was an unmatched start_node_at called?"
            );
        }

        self.parents.push((L::kind_to_raw(kind), checkpoint));
    }

    /// Complete building the tree.
    ///
    /// # Panics
    /// If the event stream was unbalanced: a node is still unfinished, or the
    /// stream contained no node at all.
    #[inline]
    pub fn finish(mut self) -> GreenNode {
        assert!(
            self.parents.is_empty(),
            "called `finish` with {} unfinished node(s)",
            self.parents.len()
        );
        assert_eq!(
            self.children.len(),
            1,
            "called `finish` on a builder with {} root elements",
            self.children.len()
        );
        match self.children.pop() {
            Some(NodeOrToken::Node(node)) => node,
            _ => panic!("called `finish` on a `GreenNodeBuilder` which only contained a token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SyntaxKind;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    enum RawLang {}
    impl Language for RawLang {
        type Kind = SyntaxKind;

        fn kind_from_raw(raw: SyntaxKind) -> Self::Kind {
            raw
        }

        fn kind_to_raw(kind: Self::Kind) -> SyntaxKind {
            kind
        }
    }

    #[test]
    fn tokens_are_deduplicated() {
        let mut builder: GreenNodeBuilder<'_, RawLang> = GreenNodeBuilder::new();
        builder.start_node(SyntaxKind(0));
        builder.token(SyntaxKind(1), "x");
        builder.token(SyntaxKind(1), "x");
        builder.finish_node();
        let root = builder.finish();

        let mut tokens = root.children().map(|child| child.into_token().unwrap());
        let first = tokens.next().unwrap();
        let second = tokens.next().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_node_is_legal() {
        let mut builder: GreenNodeBuilder<'_, RawLang> = GreenNodeBuilder::new();
        builder.start_node(SyntaxKind(0));
        builder.start_node(SyntaxKind(1));
        builder.finish_node();
        builder.finish_node();
        let root = builder.finish();
        assert_eq!(root.text_len(), 0.into());
        assert_eq!(root.children().count(), 1);
    }

    #[test]
    #[should_panic(expected = "unfinished node")]
    fn unbalanced_stream_panics() {
        let mut builder: GreenNodeBuilder<'_, RawLang> = GreenNodeBuilder::new();
        builder.start_node(SyntaxKind(0));
        builder.start_node(SyntaxKind(1));
        builder.finish_node();
        let _ = builder.finish();
    }

    #[test]
    #[should_panic(expected = "without matching `start_node`")]
    fn stray_finish_node_panics() {
        let mut builder: GreenNodeBuilder<'_, RawLang> = GreenNodeBuilder::new();
        builder.finish_node();
    }
}
