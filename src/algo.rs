//! Collection of assorted algorithms for syntax trees.

use fxhash::FxHashMap;

use crate::{
    ast::AstNode,
    syntax::{SyntaxElement, SyntaxNode},
    Language, NodeOrToken, TextSize,
};

/// Returns the deepest node that is an ancestor of both `u` and `v`, if they
/// belong to the same tree.
pub fn least_common_ancestor<L: Language>(u: &SyntaxNode<L>, v: &SyntaxNode<L>) -> Option<SyntaxNode<L>> {
    if u == v {
        return Some(u.clone());
    }

    let u_depth = u.ancestors().count();
    let v_depth = v.ancestors().count();
    let keep = u_depth.min(v_depth);

    let u_candidates = u.ancestors().skip(u_depth - keep);
    let v_candidates = v.ancestors().skip(v_depth - keep);
    let (res, _) = u_candidates.zip(v_candidates).find(|(x, y)| x == y)?;
    Some(res)
}

/// All nodes whose range contains `offset`, from the innermost outwards.
///
/// When `offset` is a boundary between two tokens, the ancestor chains of
/// both tokens contribute; shared ancestors appear once.
pub fn ancestors_at_offset<L: Language>(
    node: &SyntaxNode<L>,
    offset: TextSize,
) -> impl Iterator<Item = SyntaxNode<L>> {
    let mut res: Vec<SyntaxNode<L>> = node
        .token_at_offset(offset)
        .flat_map(|token| token.parent().ancestors())
        .collect();
    res.sort_by_key(|node| u32::from(node.text_range().len()));
    res.dedup();
    res.into_iter()
}

/// Finds the innermost node of type `N` containing `offset`.
pub fn find_node_at_offset<N: AstNode>(syntax: &SyntaxNode<N::Language>, offset: TextSize) -> Option<N> {
    ancestors_at_offset(syntax, offset).find_map(N::cast)
}

/// Where a [`TreeDiff`] insertion goes, relative to the `from` tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InsertPos<L: Language> {
    After(SyntaxElement<L>),
    AsFirstChildOf(SyntaxNode<L>),
}

/// The result of comparing two trees: which elements of `from` must be
/// replaced or deleted, and what must be inserted where, to obtain `to`.
///
/// This is a structural comparison only; turning the result into text
/// patches is left to the caller.
#[derive(Debug)]
pub struct TreeDiff<L: Language> {
    replacements: FxHashMap<SyntaxElement<L>, SyntaxElement<L>>,
    deletions:    Vec<SyntaxElement<L>>,
    insertions:   FxHashMap<InsertPos<L>, Vec<SyntaxElement<L>>>,
}

impl<L: Language> TreeDiff<L> {
    /// Elements of the `from` tree paired with the `to` element replacing them.
    pub fn replacements(&self) -> &FxHashMap<SyntaxElement<L>, SyntaxElement<L>> {
        &self.replacements
    }

    /// Elements of the `from` tree with no counterpart in `to`.
    pub fn deletions(&self) -> &[SyntaxElement<L>] {
        &self.deletions
    }

    /// Elements of the `to` tree to insert, keyed by their position in `from`.
    pub fn insertions(&self) -> &FxHashMap<InsertPos<L>, Vec<SyntaxElement<L>>> {
        &self.insertions
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty() && self.deletions.is_empty() && self.insertions.is_empty()
    }
}

/// Compares `from` and `to` trees, producing a [`TreeDiff`].
///
/// Specifically, returns a structural diff that is minimal along matching
/// kinds and shared prefixes/suffixes of child lists; where children cannot
/// be aligned, a whole-node replacement is reported instead. The diff is
/// driven by an explicit work list, so deep trees do not recurse natively.
pub fn diff<L: Language>(from: &SyntaxNode<L>, to: &SyntaxNode<L>) -> TreeDiff<L> {
    let mut diff = TreeDiff {
        replacements: FxHashMap::default(),
        deletions:    Vec::new(),
        insertions:   FxHashMap::default(),
    };
    let from_el: SyntaxElement<L> = from.clone().into();
    let to_el: SyntaxElement<L> = to.clone().into();
    if !green_eq(&from_el, &to_el) {
        let mut work = vec![(from_el, to_el)];
        while let Some((lhs, rhs)) = work.pop() {
            compare(&mut diff, &mut work, lhs, rhs);
        }
    }
    diff
}

/// Whether two elements cover byte-identical subtrees.
fn green_eq<L: Language>(lhs: &SyntaxElement<L>, rhs: &SyntaxElement<L>) -> bool {
    match (lhs, rhs) {
        (NodeOrToken::Node(lhs), NodeOrToken::Node(rhs)) => lhs.green() == rhs.green(),
        (NodeOrToken::Token(lhs), NodeOrToken::Token(rhs)) => lhs.green() == rhs.green(),
        _ => false,
    }
}

fn compare<L: Language>(
    diff: &mut TreeDiff<L>,
    work: &mut Vec<(SyntaxElement<L>, SyntaxElement<L>)>,
    lhs: SyntaxElement<L>,
    rhs: SyntaxElement<L>,
) {
    let (lhs_node, rhs_node) = match (&lhs, &rhs) {
        (NodeOrToken::Node(l), NodeOrToken::Node(r)) if l.syntax_kind() == r.syntax_kind() => (l.clone(), r.clone()),
        _ => {
            diff.replacements.insert(lhs, rhs);
            return;
        }
    };

    let lhs_children: Vec<_> = lhs_node.children_with_tokens().collect();
    let rhs_children: Vec<_> = rhs_node.children_with_tokens().collect();

    let mut start = 0;
    while start < lhs_children.len()
        && start < rhs_children.len()
        && green_eq(&lhs_children[start], &rhs_children[start])
    {
        start += 1;
    }
    let mut lhs_end = lhs_children.len();
    let mut rhs_end = rhs_children.len();
    while lhs_end > start && rhs_end > start && green_eq(&lhs_children[lhs_end - 1], &rhs_children[rhs_end - 1]) {
        lhs_end -= 1;
        rhs_end -= 1;
    }

    let lhs_mid = &lhs_children[start..lhs_end];
    let rhs_mid = &rhs_children[start..rhs_end];

    if lhs_mid.len() == rhs_mid.len() {
        for (l, r) in lhs_mid.iter().zip(rhs_mid) {
            if !green_eq(l, r) {
                work.push((l.clone(), r.clone()));
            }
        }
    } else if lhs_mid.is_empty() {
        let pos = if start > 0 {
            InsertPos::After(lhs_children[start - 1].clone())
        } else {
            InsertPos::AsFirstChildOf(lhs_node)
        };
        diff.insertions.insert(pos, rhs_mid.to_vec());
    } else if rhs_mid.is_empty() {
        diff.deletions.extend(lhs_mid.iter().cloned());
    } else {
        diff.replacements.insert(lhs, rhs);
    }
}
