//! Implementation of the outer, "red" tree.
//!
//! Red nodes and tokens are ephemeral, parent- and position-aware views over
//! a green tree. They are created lazily during traversal and are never
//! stored inside the tree itself; holding on to one keeps its ancestor chain
//! (and through it, the green root) alive.

mod element;
mod iter;
mod node;
mod token;

pub use self::{
    element::SyntaxElement,
    iter::{Preorder, PreorderWithTokens, SyntaxElementChildren, SyntaxNodeChildren},
    node::SyntaxNode,
    token::SyntaxToken,
};
