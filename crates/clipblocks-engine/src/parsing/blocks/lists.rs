//! List hierarchy reconstruction.
//!
//! List items arrive flat, each with an indent level. A stack of open items
//! rebuilds the tree: before pushing an item, every open item at the same or
//! a deeper level is closed and attached to its parent (the entry below it on
//! the stack) or to the roots. Jumps of any size work in both directions.

use super::types::AbstractNode;

/// Builds the nested list from `(level, node)` pairs in document order.
pub fn build_list_tree(items: Vec<(usize, AbstractNode)>) -> Vec<AbstractNode> {
    let mut roots = Vec::new();
    let mut stack: Vec<(usize, AbstractNode)> = Vec::new();

    for (level, mut node) in items {
        node.children.get_or_insert_with(Vec::new);
        while stack.last().is_some_and(|(open, _)| *open >= level) {
            close_top(&mut stack, &mut roots);
        }
        stack.push((level, node));
    }
    while !stack.is_empty() {
        close_top(&mut stack, &mut roots);
    }
    roots
}

fn close_top(stack: &mut Vec<(usize, AbstractNode)>, roots: &mut Vec<AbstractNode>) {
    let Some((_, node)) = stack.pop() else {
        return;
    };
    match stack.last_mut() {
        Some((_, parent)) => parent.children.get_or_insert_with(Vec::new).push(node),
        None => roots.push(node),
    }
}
