//! Implementation of the inner, "green" tree.
//! The [`GreenNodeBuilder`] is the main entry point to constructing
//! [`GreenNode`]s and [`GreenToken`]s.

mod builder;
mod element;
mod iter;
mod node;
mod token;

pub use self::element::GreenElement;

pub use self::{
    builder::{Checkpoint, GreenNodeBuilder, NodeCache},
    iter::GreenNodeChildren,
    node::GreenNode,
    token::GreenToken,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assert_send_sync() {
        fn f<T: Send + Sync>() {}
        f::<GreenNode>();
        f::<GreenToken>();
        f::<GreenElement>();
    }
}
