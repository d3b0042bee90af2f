mod common;

use common::{SyntaxElement, SyntaxNode, TestLang};
use sorbus::{
    ted::{self, EditError, Position},
    GreenNode, GreenNodeBuilder, GreenToken, SmolStr, SyntaxKind, TextRange,
};

const ROOT: SyntaxKind = SyntaxKind(0);
const IDENT: SyntaxKind = SyntaxKind(1);
const PLUS: SyntaxKind = SyntaxKind(2);
const MINUS: SyntaxKind = SyntaxKind(3);
const WHITESPACE: SyntaxKind = SyntaxKind(4);
const BIN: SyntaxKind = SyntaxKind(5);

fn flat_expr(tokens: &[(SyntaxKind, &str)]) -> SyntaxNode {
    let mut builder: GreenNodeBuilder<'_, TestLang> = GreenNodeBuilder::new();
    builder.start_node(ROOT);
    for &(kind, text) in tokens {
        builder.token(kind, text);
    }
    builder.finish_node();
    SyntaxNode::new_root(builder.finish())
}

fn ab_plus_cd() -> SyntaxNode {
    flat_expr(&[(IDENT, "ab"), (PLUS, "+"), (IDENT, "cd")])
}

fn token(kind: SyntaxKind, text: &str) -> GreenToken {
    GreenToken::new(kind, SmolStr::new(text))
}

#[test]
fn replace_operator_token() {
    let old_root = ab_plus_cd();
    let plus = old_root.children_with_tokens().nth(1).unwrap();

    let new_green = ted::replace(&old_root, &plus, token(MINUS, "-")).unwrap();
    let new_root = SyntaxNode::new_root(new_green);
    assert_eq!(new_root.text(), "ab-cd");

    // the old version is untouched and still navigable
    assert_eq!(old_root.text(), "ab+cd");
    assert_eq!(plus.text_range(), TextRange::new(2.into(), 3.into()));

    // untouched tokens keep their offsets in the new version
    let cd = new_root.children_with_tokens().nth(2).unwrap();
    assert_eq!(cd.text_range(), TextRange::new(3.into(), 5.into()));

    // and their green data is shared between the versions
    let old_cd = old_root.children_with_tokens().nth(2).unwrap().into_token().unwrap();
    let new_cd = cd.into_token().unwrap();
    assert_eq!(old_cd.green(), new_cd.green());
}

#[test]
fn insert_before_and_after() {
    let root = ab_plus_cd();
    let first = root.children_with_tokens().next().unwrap();

    let green = ted::insert(&root, Position::before(first.clone()), token(WHITESPACE, " ")).unwrap();
    assert_eq!(SyntaxNode::new_root(green).text(), " ab+cd");

    let green = ted::insert(&root, Position::after(first), token(WHITESPACE, " ")).unwrap();
    assert_eq!(SyntaxNode::new_root(green).text(), "ab +cd");
}

#[test]
fn insert_all_at_the_ends() {
    let root = ab_plus_cd();

    let elements = vec![token(WHITESPACE, " ").into(), token(IDENT, "x").into()];
    let green = ted::insert_all(&root, Position::first_child_of(&root), elements).unwrap();
    assert_eq!(SyntaxNode::new_root(green).text(), " xab+cd");

    let green = ted::insert(&root, Position::last_child_of(&root), token(WHITESPACE, " ")).unwrap();
    assert_eq!(SyntaxNode::new_root(green).text(), "ab+cd ");
}

#[test]
fn remove_token() {
    let root = ab_plus_cd();
    let plus = root.children_with_tokens().nth(1).unwrap();
    let green = ted::remove(&root, &plus).unwrap();
    assert_eq!(SyntaxNode::new_root(green).text(), "abcd");
    assert_eq!(root.text(), "ab+cd");
}

#[test]
fn remove_root_is_rejected() {
    let root = ab_plus_cd();
    let root_element: SyntaxElement = root.clone().into();
    assert_eq!(ted::remove(&root, &root_element), Err(EditError::RemoveRoot));
}

#[test]
fn replace_the_root_itself() {
    let root = ab_plus_cd();
    let root_element: SyntaxElement = root.clone().into();

    let other = flat_expr(&[(IDENT, "x")]);
    let green = ted::replace(&root, &root_element, other.green().clone()).unwrap();
    assert_eq!(SyntaxNode::new_root(green).text(), "x");

    // a tree's root must be a node
    assert_eq!(
        ted::replace(&root, &root_element, token(MINUS, "-")),
        Err(EditError::ReplaceRootWithToken)
    );
}

#[test]
fn foreign_node_is_rejected() {
    let root = ab_plus_cd();
    // same content, but a separately built tree
    let other = ab_plus_cd();
    let plus = other.children_with_tokens().nth(1).unwrap();
    assert_eq!(ted::replace(&root, &plus, token(MINUS, "-")), Err(EditError::ForeignNode));
}

#[test]
fn stale_element_is_foreign_in_the_new_version() {
    let old_root = ab_plus_cd();
    let plus = old_root.children_with_tokens().nth(1).unwrap();
    let new_root = SyntaxNode::new_root(ted::replace(&old_root, &plus, token(MINUS, "-")).unwrap());

    // `plus` belongs to the old version, so it cannot anchor an edit of the new one
    assert_eq!(
        ted::insert(&new_root, Position::after(plus), token(WHITESPACE, " ")),
        Err(EditError::ForeignNode)
    );
}

#[test]
fn position_anchored_at_the_root_is_invalid() {
    let root = ab_plus_cd();
    let root_element: SyntaxElement = root.clone().into();
    assert_eq!(
        ted::insert(&root, Position::before(root_element), token(WHITESPACE, " ")),
        Err(EditError::InvalidPosition)
    );
}

#[test]
fn spine_rebuild_shares_sibling_subtrees() {
    let mut builder: GreenNodeBuilder<'_, TestLang> = GreenNodeBuilder::new();
    builder.start_node(ROOT);
    builder.start_node(BIN);
    builder.token(IDENT, "ab");
    builder.token(PLUS, "+");
    builder.token(IDENT, "cd");
    builder.finish_node();
    builder.token(WHITESPACE, " ");
    builder.start_node(BIN);
    builder.token(IDENT, "x");
    builder.token(PLUS, "+");
    builder.token(IDENT, "y");
    builder.finish_node();
    builder.finish_node();
    let root = SyntaxNode::new_root(builder.finish());

    let second = root.children().nth(1).unwrap();
    let replacement = GreenNode::new(BIN, vec![token(IDENT, "z").into()]);
    let green = ted::replace(&root, &second.clone().into(), replacement).unwrap();
    let new_root = SyntaxNode::new_root(green);

    assert_eq!(new_root.text(), "ab+cd z");
    // the subtree left of the edit is shared by allocation, not copied
    let old_first = root.first_child().unwrap();
    let new_first = new_root.first_child().unwrap();
    assert!(old_first.green().ptr_eq(new_first.green()));
}

#[test]
fn replace_with_rebuilds_only_the_spine() {
    let root = ab_plus_cd();
    let plus = root.children_with_tokens().nth(1).unwrap().into_token().unwrap();
    let green = plus.replace_with(token(PLUS, "‐"));
    assert_eq!(SyntaxNode::new_root(green).text(), "ab‐cd");
}
