//! `sorbus` is a generic library for creating and working with lossless
//! syntax trees: trees that retain every byte of the original source text,
//! including whitespace, comments and error tokens.
//!
//! The design follows the two-layer "green/red" model pioneered by Roslyn
//! and used by [rust-analyzer](https://github.com/rust-analyzer/rust-analyzer/):
//! - The *green* tree ([`GreenNode`], [`GreenToken`]) is the canonical,
//!   context-free representation. It is immutable, cheap to share, and
//!   identical subtrees may be deduplicated. Once built, a green tree is
//!   safe to read from many threads at once.
//! - The *red* tree ([`SyntaxNode`], [`SyntaxToken`]) is an ephemeral view
//!   computed on demand from a green root. Red nodes know their absolute
//!   text offset and their parent, which makes upward navigation O(1) and
//!   position queries cheap, at the cost of being recreated per traversal.
//!
//! Trees are built bottom-up from a linear event stream with
//! [`GreenNodeBuilder`] (or [`parsing::SyntaxTreeBuilder`], which also
//! collects [`parsing::SyntaxError`]s so that malformed input still yields
//! a complete tree). "Mutation" goes through the [`ted`] module, which
//! rebuilds the spine from the edited element up to the root and returns a
//! brand-new green root, leaving the original tree untouched.
//!
//! A typed AST can be layered on top of the untyped tree via the
//! [`ast`] module: typed wrappers are thin newtypes over [`SyntaxNode`]s,
//! and "casting" is a runtime kind check rather than a conversion.
//!
//! # Example
//!
//! ```
//! use sorbus::{GreenNodeBuilder, Language, SyntaxKind, SyntaxNode};
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! #[repr(u16)]
//! enum Calc { Root, Int, Plus }
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
//! enum CalcLanguage {}
//! impl Language for CalcLanguage {
//!     type Kind = Calc;
//!     fn kind_from_raw(raw: SyntaxKind) -> Calc {
//!         match raw.0 {
//!             0 => Calc::Root,
//!             1 => Calc::Int,
//!             2 => Calc::Plus,
//!             _ => unreachable!(),
//!         }
//!     }
//!     fn kind_to_raw(kind: Calc) -> SyntaxKind {
//!         SyntaxKind(kind as u16)
//!     }
//! }
//!
//! let mut builder: GreenNodeBuilder<CalcLanguage> = GreenNodeBuilder::new();
//! builder.start_node(Calc::Root);
//! builder.token(Calc::Int, "1");
//! builder.token(Calc::Plus, "+");
//! builder.token(Calc::Int, "2");
//! builder.finish_node();
//! let green = builder.finish();
//!
//! let root: SyntaxNode<CalcLanguage> = SyntaxNode::new_root(green);
//! assert_eq!(root.kind(), Calc::Root);
//! assert_eq!(root.text(), "1+2");
//! ```
#![forbid(unconditional_recursion, future_incompatible)]
#![deny(unsafe_code)]

mod green;
pub mod syntax;

pub mod algo;
pub mod ast;
pub mod parsing;
mod syntax_text;
pub mod ted;
mod utility_types;

use std::fmt;

// Reexport types for working with strings and offsets.
pub use smol_str::SmolStr;
pub use text_size::{TextLen, TextRange, TextSize};

pub use crate::{
    green::{Checkpoint, GreenElement, GreenNode, GreenNodeBuilder, GreenNodeChildren, GreenToken, NodeCache},
    syntax::{SyntaxElement, SyntaxElementChildren, SyntaxNode, SyntaxNodeChildren, SyntaxToken},
    syntax_text::SyntaxText,
    utility_types::{Direction, NodeOrToken, TokenAtOffset, WalkEvent},
};

/// Raw tag classifying a node or token's syntactic role.
///
/// `SyntaxKind` is what green trees store; it carries no language-specific
/// meaning by itself. A [`Language`] implementation maps it to and from the
/// language's own kind enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SyntaxKind(pub u16);

/// The bridge between the generic tree and a concrete language.
///
/// `Language` is a zero-sized marker that converts between the raw
/// [`SyntaxKind`] stored in green trees and the language's closed kind
/// enumeration. All red-tree and AST types are parameterized by it.
pub trait Language: Sized + Clone + Copy + fmt::Debug + Eq + Ord + std::hash::Hash {
    /// The language's kind enumeration, e.g. an `enum` with one variant per
    /// token and node type of the grammar.
    type Kind: Sized + Copy + fmt::Debug + Eq;

    fn kind_from_raw(raw: SyntaxKind) -> Self::Kind;
    fn kind_to_raw(kind: Self::Kind) -> SyntaxKind;
}
