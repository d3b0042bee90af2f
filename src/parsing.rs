//! Glue between a parser and the tree: a builder that records syntax errors
//! alongside the tree it constructs, and [`Parse`], the result of a parse
//! carrying both.
//!
//! A lossless parser never fails; it always produces a full tree over the
//! entire input, with error nodes and tokens where the input did not match
//! the grammar, plus a list of [`SyntaxError`]s describing what went wrong
//! and where.

use std::{fmt, marker::PhantomData, sync::Arc};

use crate::{
    ast::AstNode,
    green::{Checkpoint, GreenNode, GreenNodeBuilder},
    syntax::SyntaxNode,
    Language, TextRange, TextSize,
};

/// Represents the result of unsuccessful tokenization, parsing or tree
/// validation: a message attached to a range of the source text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}: {range:?}")]
pub struct SyntaxError {
    message: String,
    range:   TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        SyntaxError {
            message: message.into(),
            range,
        }
    }

    pub fn new_at_offset(message: impl Into<String>, offset: TextSize) -> Self {
        SyntaxError {
            message: message.into(),
            range:   TextRange::empty(offset),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn range(&self) -> TextRange {
        self.range
    }
}

/// A [`GreenNodeBuilder`] that also accumulates [`SyntaxError`]s, for use as
/// the sink of a parser's event stream.
#[derive(Debug)]
pub struct SyntaxTreeBuilder<L: Language> {
    errors: Vec<SyntaxError>,
    inner:  GreenNodeBuilder<'static, L>,
}

impl<L: Language> Default for SyntaxTreeBuilder<L> {
    fn default() -> Self {
        SyntaxTreeBuilder {
            errors: Vec::new(),
            inner:  GreenNodeBuilder::new(),
        }
    }
}

impl<L: Language> SyntaxTreeBuilder<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&mut self, kind: L::Kind, text: &str) {
        self.inner.token(kind, text);
    }

    pub fn start_node(&mut self, kind: L::Kind) {
        self.inner.start_node(kind);
    }

    pub fn finish_node(&mut self) {
        self.inner.finish_node();
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.inner.checkpoint()
    }

    pub fn start_node_at(&mut self, checkpoint: Checkpoint, kind: L::Kind) {
        self.inner.start_node_at(checkpoint, kind);
    }

    /// Records a syntax error covering `range`; the tree itself is
    /// unaffected.
    pub fn error(&mut self, message: impl Into<String>, range: TextRange) {
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Finishes the tree, returning the green root and the recorded errors.
    ///
    /// Panics under the same conditions as [`GreenNodeBuilder::finish`].
    pub fn finish_raw(self) -> (GreenNode, Vec<SyntaxError>) {
        let green = self.inner.finish();
        (green, self.errors)
    }

    pub fn finish(self) -> Parse<SyntaxNode<L>> {
        let (green, errors) = self.finish_raw();
        Parse::new(green, errors)
    }
}

/// The result of parsing: a syntax tree and a collection of errors.
///
/// `Parse` owns the green root, not a red node, so it is `Send + Sync` and
/// can be stored and shared freely; fresh red trees are spun up from it on
/// demand. The type parameter records what the root is expected to cast to,
/// but a `Parse` exists whether or not the input was valid.
pub struct Parse<T> {
    green:  GreenNode,
    errors: Arc<[SyntaxError]>,
    _ty:    PhantomData<fn() -> T>,
}

impl<T> Clone for Parse<T> {
    fn clone(&self) -> Self {
        Parse {
            green:  self.green.clone(),
            errors: self.errors.clone(),
            _ty:    PhantomData,
        }
    }
}

impl<T> fmt::Debug for Parse<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parse")
            .field("green", &self.green)
            .field("errors", &self.errors)
            .finish()
    }
}

impl<T> Parse<T> {
    pub fn new(green: GreenNode, errors: Vec<SyntaxError>) -> Parse<T> {
        Parse {
            green,
            errors: errors.into(),
            _ty: PhantomData,
        }
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    pub fn errors(&self) -> &[SyntaxError] {
        &self.errors
    }
}

impl<L: Language> Parse<SyntaxNode<L>> {
    pub fn syntax_node(&self) -> SyntaxNode<L> {
        SyntaxNode::new_root(self.green.clone())
    }

    /// Retypes the result, if the root node has the right kind for `N`.
    pub fn cast<N: AstNode<Language = L>>(self) -> Option<Parse<N>> {
        if N::cast(self.syntax_node()).is_some() {
            Some(Parse {
                green:  self.green,
                errors: self.errors,
                _ty:    PhantomData,
            })
        } else {
            None
        }
    }
}

impl<N: AstNode> Parse<N> {
    /// The typed root of the parsed tree.
    ///
    /// Panics if the root node does not cast to `N`; a `Parse<N>` obtained
    /// from [`Parse::cast`] always does.
    pub fn tree(&self) -> N {
        N::cast(self.new_syntax_node()).expect("root node kind does not match the typed root")
    }

    /// The tree, if the input parsed without errors.
    pub fn ok(self) -> Result<N, Arc<[SyntaxError]>> {
        if self.errors.is_empty() {
            Ok(self.tree())
        } else {
            Err(self.errors)
        }
    }

    /// Forgets the typed root, yielding the untyped result.
    pub fn to_syntax(self) -> Parse<SyntaxNode<N::Language>> {
        Parse {
            green:  self.green,
            errors: self.errors,
            _ty:    PhantomData,
        }
    }

    fn new_syntax_node(&self) -> SyntaxNode<N::Language> {
        SyntaxNode::new_root(self.green.clone())
    }
}
