// inspector_core/src/metadata/graph_metadata.rs
use crate::inspector_info;
use crate::metadata::cullable::CullableMap;
use std::any::{Any, TypeId};
use std::fmt;

/// Per-node editor state, such as foldout flags or animation progress.
///
/// A node holds at most one item of each type.
pub trait MetadataItem: Any + Default + Send + Sync {}

/// Identifies a child node: list elements by index, members and map entries by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MetadataKey {
    Index(usize),
    Name(String),
}

impl From<usize> for MetadataKey {
    fn from(index: usize) -> Self {
        MetadataKey::Index(index)
    }
}

impl From<&str> for MetadataKey {
    fn from(name: &str) -> Self {
        MetadataKey::Name(name.to_string())
    }
}

impl From<String> for MetadataKey {
    fn from(name: String) -> Self {
        MetadataKey::Name(name)
    }
}

impl fmt::Display for MetadataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataKey::Index(index) => write!(f, "[{index}]"),
            MetadataKey::Name(name) => write!(f, "{name}"),
        }
    }
}

/// One node of the lazily built metadata tree that mirrors an edited object.
///
/// Children and items are created on first access. Between
/// `begin_cull_zone` and `end_cull_zone` every access marks the entry as
/// used; whatever was not used is evicted at the end of the zone.
#[derive(Default)]
pub struct MetadataNode {
    items: CullableMap<TypeId, Box<dyn Any + Send + Sync>>,
    index_children: CullableMap<usize, MetadataNode>,
    key_children: CullableMap<String, MetadataNode>,
}

impl MetadataNode {
    pub fn new() -> Self {
        Self::default()
    }

    /// Child for `key`, created on first use.
    pub fn enter(&mut self, key: impl Into<MetadataKey>) -> &mut MetadataNode {
        match key.into() {
            MetadataKey::Index(index) => self.enter_index(index),
            MetadataKey::Name(name) => self.enter_key(&name),
        }
    }

    pub fn enter_index(&mut self, index: usize) -> &mut MetadataNode {
        self.index_children.get_or_insert_with(index, MetadataNode::new)
    }

    pub fn enter_key(&mut self, key: &str) -> &mut MetadataNode {
        self.key_children.get_or_insert_with(key.to_string(), MetadataNode::new)
    }

    /// Item of type `T`, created with `T::default()` on first use.
    pub fn get_item<T: MetadataItem>(&mut self) -> &mut T {
        self.items
            .get_or_insert_with(TypeId::of::<T>(), || Box::new(T::default()))
            .downcast_mut::<T>()
            .expect("metadata items are keyed by their own TypeId")
    }

    /// Item of type `T` if one was created before.
    pub fn try_get_item<T: MetadataItem>(&mut self) -> Option<&mut T> {
        self.items
            .get_mut(&TypeId::of::<T>())
            .and_then(|item| item.downcast_mut::<T>())
    }

    pub fn has_child(&self, key: impl Into<MetadataKey>) -> bool {
        match key.into() {
            MetadataKey::Index(index) => self.index_children.contains_key(&index),
            MetadataKey::Name(name) => self.key_children.contains_key(&name),
        }
    }

    /// Installs `child` under `key`, returning the node it replaced.
    pub fn set_child(&mut self, key: impl Into<MetadataKey>, child: MetadataNode) -> Option<MetadataNode> {
        match key.into() {
            MetadataKey::Index(index) => self.index_children.insert(index, child),
            MetadataKey::Name(name) => self.key_children.insert(name, child),
        }
    }

    /// Detaches the child under `key`.
    pub fn take_child(&mut self, key: impl Into<MetadataKey>) -> Option<MetadataNode> {
        match key.into() {
            MetadataKey::Index(index) => self.index_children.remove(&index),
            MetadataKey::Name(name) => self.key_children.remove(&name),
        }
    }

    pub fn child_count(&self) -> usize {
        self.index_children.len() + self.key_children.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn begin_cull_zone(&mut self) {
        self.items.begin_cull();
        self.index_children.begin_cull();
        self.key_children.begin_cull();
    }

    /// Evicts items and children not accessed since `begin_cull_zone`.
    /// Returns how many entries were evicted.
    pub fn end_cull_zone(&mut self, log_evictions: bool) -> usize {
        let items = self.items.end_cull().len();
        let indices = self.index_children.end_cull();
        let keys = self.key_children.end_cull();

        if log_evictions {
            for (index, _) in &indices {
                inspector_info!("Evicted metadata for element [{index}].");
            }
            for (key, _) in &keys {
                inspector_info!("Evicted metadata for `{key}`.");
            }
            if items > 0 {
                inspector_info!("Evicted {items} metadata item(s).");
            }
        }
        items + indices.len() + keys.len()
    }

    pub fn is_culling(&self) -> bool {
        self.items.is_culling()
    }
}

impl fmt::Debug for MetadataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataNode")
            .field("items", &self.items.len())
            .field("index_children", &self.index_children.len())
            .field("key_children", &self.key_children.len())
            .finish()
    }
}
