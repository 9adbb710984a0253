// inspector_core/src/metadata/migration.rs
use crate::metadata::graph_metadata::MetadataNode;

/// Computes `(from, to)` index moves that carry each element of `previous`
/// to its position in `updated`.
///
/// Elements that kept their index are not moved. Duplicates are matched in
/// order. Elements with no match in `updated` get no move, so their
/// metadata is dropped once something else lands on their index.
pub fn compute_moves<T: PartialEq>(previous: &[T], updated: &[T]) -> Vec<(usize, usize)> {
    let mut claimed = vec![false; updated.len()];
    let mut stays = vec![false; previous.len()];
    for index in 0..previous.len().min(updated.len()) {
        if previous[index] == updated[index] {
            claimed[index] = true;
            stays[index] = true;
        }
    }

    let mut moves = Vec::new();
    for (from, item) in previous.iter().enumerate() {
        if stays[from] {
            continue;
        }
        let target = (0..updated.len()).find(|&to| !claimed[to] && updated[to] == *item);
        if let Some(to) = target {
            claimed[to] = true;
            moves.push((from, to));
        }
    }
    moves
}

/// Re-keys the index children of `node` after a list was reordered, so
/// per-element metadata follows its element.
///
/// Returns the moves that were applied. Indices that are not part of a
/// move keep their metadata: an element replaced at its index cannot be
/// told apart from one edited in place, so both keep the slot's metadata.
pub fn migrate_metadata<T: PartialEq>(node: &mut MetadataNode, previous: &[T], updated: &[T]) -> Vec<(usize, usize)> {
    let moves = compute_moves(previous, updated);

    // Detach every source first so moves in a cycle do not overwrite each other.
    let carried: Vec<_> = moves
        .iter()
        .map(|&(from, to)| (to, node.take_child(from)))
        .collect();

    for (to, child) in carried {
        match child {
            Some(child) => {
                node.set_child(to, child);
            }
            None => {
                node.take_child(to);
            }
        }
    }

    // Indices past the end of the list no longer have an element.
    for index in updated.len()..previous.len() {
        if !moves.iter().any(|&(_, to)| to == index) {
            node.take_child(index);
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::graph_metadata::MetadataItem;

    #[derive(Default)]
    struct Tag(&'static str);
    impl MetadataItem for Tag {}

    fn tag(node: &mut MetadataNode, index: usize) -> Option<&'static str> {
        node.has_child(index).then(|| node.enter_index(index).get_item::<Tag>().0)
    }

    #[test]
    fn rotation_moves_every_element() {
        let mut node = MetadataNode::new();
        for (index, name) in ["x", "y", "z"].into_iter().enumerate() {
            node.enter_index(index).get_item::<Tag>().0 = name;
        }

        let moves = migrate_metadata(&mut node, &["x", "y", "z"], &["z", "x", "y"]);
        assert_eq!(moves, vec![(0, 1), (1, 2), (2, 0)]);
        assert_eq!(tag(&mut node, 0), Some("z"));
        assert_eq!(tag(&mut node, 1), Some("x"));
        assert_eq!(tag(&mut node, 2), Some("y"));
    }

    #[test]
    fn unchanged_positions_are_left_alone() {
        let moves = compute_moves(&[1, 2, 3], &[1, 3]);
        assert_eq!(moves, vec![(2, 1)]);
        assert!(compute_moves(&[1, 2], &[1, 2]).is_empty());
    }

    #[test]
    fn insertion_shifts_metadata_and_leaves_a_fresh_slot() {
        let mut node = MetadataNode::new();
        node.enter_index(0).get_item::<Tag>().0 = "a";
        node.enter_index(1).get_item::<Tag>().0 = "b";

        migrate_metadata(&mut node, &["a", "b"], &["new", "a", "b"]);
        assert_eq!(tag(&mut node, 0), None);
        assert_eq!(tag(&mut node, 1), Some("a"));
        assert_eq!(tag(&mut node, 2), Some("b"));
    }

    #[test]
    fn removed_tail_is_dropped() {
        let mut node = MetadataNode::new();
        for (index, name) in ["a", "b", "c"].into_iter().enumerate() {
            node.enter_index(index).get_item::<Tag>().0 = name;
        }

        migrate_metadata(&mut node, &["a", "b", "c"], &["a", "c"]);
        assert_eq!(tag(&mut node, 0), Some("a"));
        assert_eq!(tag(&mut node, 1), Some("c"));
        assert_eq!(tag(&mut node, 2), None);
    }

    #[test]
    fn element_changed_in_place_keeps_its_metadata() {
        let mut node = MetadataNode::new();
        node.enter_index(0).get_item::<Tag>().0 = "a";
        node.enter_index(1).get_item::<Tag>().0 = "b";

        let moves = migrate_metadata(&mut node, &["a", "b"], &["c", "b"]);
        assert!(moves.is_empty());
        assert_eq!(tag(&mut node, 0), Some("a"));
        assert_eq!(tag(&mut node, 1), Some("b"));
    }
}
