pub mod cullable;
pub mod graph_metadata;
pub mod items;
pub mod migration;
pub mod store;

pub use cullable::CullableMap;
pub use graph_metadata::{MetadataItem, MetadataKey, MetadataNode};
pub use items::{DropdownMetadata, ListMetadata};
pub use migration::{compute_moves, migrate_metadata};
pub use store::MetadataStore;
