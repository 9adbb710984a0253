// inspector_core/src/metadata/store.rs
use crate::metadata::graph_metadata::MetadataNode;
use crate::serialization::record::InstanceId;
use std::collections::HashMap;

/// Root metadata node of every inspected object.
#[derive(Debug, Default)]
pub struct MetadataStore {
    roots: HashMap<InstanceId, MetadataNode>,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root node for `id`, created on first use.
    pub fn root(&mut self, id: InstanceId) -> &mut MetadataNode {
        self.roots.entry(id).or_default()
    }

    pub fn contains(&self, id: InstanceId) -> bool {
        self.roots.contains_key(&id)
    }

    /// Drops the metadata of an object that is no longer inspected.
    pub fn remove(&mut self, id: InstanceId) -> Option<MetadataNode> {
        self.roots.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Drops everything, e.g. after the host reloaded its types.
    pub fn reset(&mut self) {
        self.roots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::items::DropdownMetadata;

    #[test]
    fn roots_are_kept_per_instance() {
        let mut store = MetadataStore::new();
        let a = InstanceId::new();
        let b = InstanceId::new();

        store.root(a).get_item::<DropdownMetadata>().set_expanded(false);
        assert!(store.root(b).get_item::<DropdownMetadata>().is_expanded());
        assert!(!store.root(a).get_item::<DropdownMetadata>().is_expanded());

        assert!(store.remove(a).is_some());
        assert!(!store.contains(a));
        store.reset();
        assert!(store.is_empty());
    }
}
