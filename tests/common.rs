#![allow(unused)]

use sorbus::{GreenNode, GreenNodeBuilder, Language, NodeCache, SyntaxKind};

pub type SyntaxNode = sorbus::SyntaxNode<TestLang>;
pub type SyntaxToken = sorbus::SyntaxToken<TestLang>;
pub type SyntaxElement = sorbus::SyntaxElement<TestLang>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum TestLang {}
impl Language for TestLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: SyntaxKind) -> Self::Kind {
        raw
    }

    fn kind_to_raw(kind: Self::Kind) -> SyntaxKind {
        kind
    }
}

#[derive(Debug)]
pub enum Element<'s> {
    Node(Vec<Element<'s>>),
    Token(&'s str),
}

pub fn two_level_tree() -> Element<'static> {
    use Element::*;
    Node(vec![
        Node(vec![Token("0.0"), Token("0.1")]),
        Node(vec![Token("1.0")]),
        Node(vec![Token("2.0"), Token("2.1"), Token("2.2")]),
    ])
}

pub fn big_tree() -> Element<'static> {
    use Element::*;

    Node(vec![
        Node(vec![Node(vec![Token("foo"), Token("bar")]), Token("baz")]),
        Node(vec![Token("pub"), Token("fn"), Token("tree")]),
    ])
}

pub fn build_tree(root: &Element<'_>) -> SyntaxNode {
    let mut builder: GreenNodeBuilder<'_, TestLang> = GreenNodeBuilder::new();
    build_recursive(root, &mut builder, 0);
    SyntaxNode::new_root(builder.finish())
}

pub fn build_tree_with_cache(root: &Element<'_>, cache: &mut NodeCache) -> GreenNode {
    let mut builder: GreenNodeBuilder<'_, TestLang> = GreenNodeBuilder::with_cache(cache);
    build_recursive(root, &mut builder, 0);
    builder.finish()
}

pub fn build_recursive(root: &Element<'_>, builder: &mut GreenNodeBuilder<'_, TestLang>, mut from: u16) -> u16 {
    match root {
        Element::Node(children) => {
            builder.start_node(SyntaxKind(from));
            for child in children {
                from = build_recursive(child, builder, from + 1);
            }
            builder.finish_node();
        }
        Element::Token(text) => {
            builder.token(SyntaxKind(from), *text);
        }
    }
    from
}
