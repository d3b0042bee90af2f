mod common;

use common::{build_tree, two_level_tree, SyntaxNode, TestLang};
use sorbus::{
    ast::SyntaxNodePtr,
    parsing::{Parse, SyntaxError},
    GreenElement, GreenNode, GreenToken,
};

fn assert_send_sync<T: Send + Sync>() {}

#[test]
fn green_layer_is_send_sync() {
    assert_send_sync::<GreenNode>();
    assert_send_sync::<GreenToken>();
    assert_send_sync::<GreenElement>();
    assert_send_sync::<SyntaxError>();
    assert_send_sync::<Parse<SyntaxNode>>();
    assert_send_sync::<SyntaxNodePtr<TestLang>>();
}

#[test]
fn green_trees_can_be_read_from_other_threads() {
    let tree = build_tree(&two_level_tree());
    let green = tree.green().clone();
    let handle = std::thread::spawn(move || {
        // each thread builds its own red view over the shared green tree
        let root = SyntaxNode::new_root(green);
        root.text().to_string()
    });
    assert_eq!(handle.join().unwrap(), "0.00.11.02.02.12.2");
    assert_eq!(tree.text(), "0.00.11.02.02.12.2");
}
