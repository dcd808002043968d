use crate::ui_tree::RawNode;

/// Display texts of `node` and every raw descendant, in pre-order.
pub fn texts_in_subtree(node: &RawNode) -> impl Iterator<Item = &str> {
    std::iter::once(node)
        .chain(node.descendants())
        .filter_map(RawNode::display_text)
}

/// Longest display text in the subtree; the first one found wins a tie.
pub fn longest_text_in_subtree(node: &RawNode) -> Option<&str> {
    let mut best: Option<(usize, &str)> = None;
    for text in texts_in_subtree(node) {
        let len = text.chars().count();
        if best.map_or(true, |(best_len, _)| len > best_len) {
            best = Some((len, text));
        }
    }
    best.map(|(_, text)| text)
}
