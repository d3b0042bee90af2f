mod common;

use common::{big_tree, build_tree, two_level_tree, Element};
use sorbus::{
    algo::{self, InsertPos},
    Direction, NodeOrToken, SyntaxKind, TextRange, WalkEvent,
};

/// Flattens `Enter`/`Leave` events to `(entered, raw kind)` pairs.
fn event_log(events: impl Iterator<Item = WalkEvent<common::SyntaxNode>>) -> Vec<(bool, u16)> {
    events
        .map(|event| match event {
            WalkEvent::Enter(node) => (true, node.syntax_kind().0),
            WalkEvent::Leave(node) => (false, node.syntax_kind().0),
        })
        .collect()
}

#[test]
fn preorder_enters_and_leaves_every_node() {
    let tree = build_tree(&big_tree());
    let log = event_log(tree.preorder());
    assert_eq!(
        log,
        vec![
            (true, 0),
            (true, 1),
            (true, 2),
            (false, 2),
            (false, 1),
            (true, 6),
            (false, 6),
            (false, 0),
        ]
    );
}

#[test]
fn preorder_skip_subtree() {
    let tree = build_tree(&big_tree());
    let mut preorder = tree.preorder();
    let mut log = Vec::new();
    while let Some(event) = preorder.next() {
        if let WalkEvent::Enter(node) = &event {
            if node.syntax_kind() == SyntaxKind(1) {
                preorder.skip_subtree();
            }
        }
        log.extend(event_log(std::iter::once(event)));
    }
    assert_eq!(
        log,
        vec![(true, 0), (true, 1), (false, 1), (true, 6), (false, 6), (false, 0)]
    );
}

#[test]
fn preorder_with_tokens_visits_text_in_order() {
    let tree = build_tree(&big_tree());
    let text: String = tree
        .preorder_with_tokens()
        .filter_map(|event| match event {
            WalkEvent::Enter(NodeOrToken::Token(token)) => Some(token.text().to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(text, "foobarbazpubfntree");
}

#[test]
fn descendants() {
    let tree = build_tree(&big_tree());
    assert_eq!(tree.descendants().count(), 4);
    assert_eq!(tree.descendants_with_tokens().count(), 10);
}

#[test]
fn ancestors_walk_to_the_root() {
    let tree = build_tree(&big_tree());
    let first = tree.first_token().unwrap();
    assert_eq!(first.text(), "foo");
    let kinds: Vec<_> = first.ancestors().map(|node| node.syntax_kind().0).collect();
    assert_eq!(kinds, vec![2, 1, 0]);
    assert_eq!(first.parent().root(), tree);
}

#[test]
fn token_order_via_next_and_prev() {
    let tree = build_tree(&big_tree());
    let mut texts = Vec::new();
    let mut token = tree.first_token();
    while let Some(current) = token {
        texts.push(current.text().to_string());
        token = current.next_token();
    }
    assert_eq!(texts, vec!["foo", "bar", "baz", "pub", "fn", "tree"]);

    let mut texts = Vec::new();
    let mut token = tree.last_token();
    while let Some(current) = token {
        texts.push(current.text().to_string());
        token = current.prev_token();
    }
    assert_eq!(texts, vec!["tree", "fn", "pub", "baz", "bar", "foo"]);
}

#[test]
fn sibling_traversal() {
    let tree = build_tree(&two_level_tree());
    let first = tree.first_child().unwrap();
    let kinds: Vec<_> = first
        .siblings(Direction::Next)
        .map(|node| node.syntax_kind().0)
        .collect();
    assert_eq!(kinds, vec![1, 4, 6]);

    let last = tree.last_child().unwrap();
    let kinds: Vec<_> = last
        .siblings(Direction::Prev)
        .map(|node| node.syntax_kind().0)
        .collect();
    assert_eq!(kinds, vec![6, 4, 1]);

    assert_eq!(first.next_sibling().unwrap().syntax_kind(), SyntaxKind(4));
    assert!(first.prev_sibling().is_none());
    assert!(last.next_sibling().is_none());
}

#[test]
fn least_common_ancestor() {
    let tree = build_tree(&big_tree());
    let inner = tree.first_child().unwrap().first_child().unwrap();
    let second = tree.children().nth(1).unwrap();

    assert_eq!(algo::least_common_ancestor(&inner, &second).unwrap(), tree);
    assert_eq!(algo::least_common_ancestor(&inner, &inner).unwrap(), inner);
    let parent = inner.parent().unwrap();
    assert_eq!(algo::least_common_ancestor(&inner, &parent).unwrap(), parent);

    // nodes of an unrelated tree share no ancestor
    let other = build_tree(&two_level_tree());
    assert_eq!(algo::least_common_ancestor(&inner, &other), None);
}

#[test]
fn ancestors_at_offset_innermost_first() {
    let tree = build_tree(&two_level_tree());
    // offset 6 is the boundary between "0.1" and "1.0", so both parents show up
    let kinds: Vec<_> = algo::ancestors_at_offset(&tree, 6.into())
        .map(|node| node.syntax_kind().0)
        .collect();
    assert_eq!(kinds, vec![4, 1, 0]);

    let kinds: Vec<_> = algo::ancestors_at_offset(&tree, 1.into())
        .map(|node| node.syntax_kind().0)
        .collect();
    assert_eq!(kinds, vec![1, 0]);

    assert_eq!(algo::ancestors_at_offset(&tree, 100.into()).count(), 0);
}

#[test]
fn covering_element() {
    let tree = build_tree(&two_level_tree());
    // spans both tokens of the first inner node
    let covering = tree.covering_element(TextRange::new(1.into(), 5.into()));
    assert_eq!(covering.syntax_kind(), SyntaxKind(1));
    // within a single token
    let covering = tree.covering_element(TextRange::new(1.into(), 2.into()));
    let token = covering.as_token().expect("should hit a token");
    assert_eq!(token.text(), "0.0");
    // spans children of different nodes
    let covering = tree.covering_element(TextRange::new(1.into(), 8.into()));
    assert_eq!(covering.syntax_kind(), SyntaxKind(0));
}

#[test]
fn diff_of_equal_trees_is_empty() {
    let from = build_tree(&two_level_tree());
    let to = build_tree(&two_level_tree());
    assert!(algo::diff(&from, &to).is_empty());
}

#[test]
fn diff_reports_minimal_token_replacement() {
    use Element::*;
    let from = build_tree(&Node(vec![Token("a"), Token("b"), Token("c")]));
    let to = build_tree(&Node(vec![Token("a"), Token("x"), Token("c")]));

    let diff = algo::diff(&from, &to);
    assert_eq!(diff.replacements().len(), 1);
    assert!(diff.deletions().is_empty());
    assert!(diff.insertions().is_empty());

    let (old, new) = diff.replacements().iter().next().unwrap();
    assert_eq!(old.as_token().unwrap().text(), "b");
    assert_eq!(new.as_token().unwrap().text(), "x");
}

#[test]
fn diff_reports_insertions_and_deletions() {
    use Element::*;
    let from = build_tree(&Node(vec![Token("a")]));
    let to = build_tree(&Node(vec![Token("a"), Token("b")]));

    let diff = algo::diff(&from, &to);
    assert!(diff.replacements().is_empty());
    assert_eq!(diff.insertions().len(), 1);
    let (pos, inserted) = diff.insertions().iter().next().unwrap();
    match pos {
        InsertPos::After(anchor) => assert_eq!(anchor.as_token().unwrap().text(), "a"),
        other => panic!("unexpected insert position {:?}", other),
    }
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].as_token().unwrap().text(), "b");

    let diff = algo::diff(&to, &from);
    assert!(diff.replacements().is_empty());
    assert!(diff.insertions().is_empty());
    assert_eq!(diff.deletions().len(), 1);
    assert_eq!(diff.deletions()[0].as_token().unwrap().text(), "b");
}

#[test]
fn diff_descends_into_matching_nodes() {
    use Element::*;
    let from = build_tree(&Node(vec![
        Node(vec![Token("keep"), Token("me")]),
        Node(vec![Token("change")]),
    ]));
    let to = build_tree(&Node(vec![
        Node(vec![Token("keep"), Token("me")]),
        Node(vec![Token("changed")]),
    ]));

    let diff = algo::diff(&from, &to);
    assert_eq!(diff.replacements().len(), 1);
    let (old, _) = diff.replacements().iter().next().unwrap();
    // the replacement is scoped to the changed token, not a whole subtree
    assert_eq!(old.as_token().unwrap().text(), "change");
}
