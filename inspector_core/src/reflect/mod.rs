pub mod filters;
pub mod host_ref;
pub mod member;
pub mod object;
pub mod reflect_field;
pub mod storage_type;
pub mod type_cache;
pub mod type_info;
pub mod value;

pub use filters::{MemberFilter, ALL_MEMBERS, BUTTON_MEMBERS, INSPECTABLE_MEMBERS, SERIALIZABLE_MEMBERS};
pub use host_ref::HostRef;
pub use member::{MemberDescriptor, MemberKind};
pub use object::{instantiate_object_references, object_from_value, object_to_value};
pub use reflect_field::{boxed_default, Reflect, ReflectField};
pub use storage_type::{StorageType, ValueKind};
pub use type_cache::{type_cache, TypeCache, TypeDescriptor, TypeRegistration};
pub use type_info::{BaseInfo, TypeInfo};
pub use value::Value;
