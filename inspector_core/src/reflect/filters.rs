// inspector_core/src/reflect/filters.rs
use crate::reflect::member::{MemberDescriptor, MemberKind};

/// Predicate that selects members of a type.
///
/// Filtered member lists are memoized per descriptor under `key()`, so two
/// filters must never share a key.
pub trait MemberFilter: Send + Sync {
    fn key(&self) -> &'static str;
    fn accepts(&self, member: &MemberDescriptor) -> bool;
}

/// Every member.
pub struct AllMembers;

impl MemberFilter for AllMembers {
    fn key(&self) -> &'static str {
        "all"
    }

    fn accepts(&self, _member: &MemberDescriptor) -> bool {
        true
    }
}

/// Instance fields and properties, shown as editable rows.
pub struct InspectableMembers;

impl MemberFilter for InspectableMembers {
    fn key(&self) -> &'static str {
        "inspectable"
    }

    fn accepts(&self, member: &MemberDescriptor) -> bool {
        member.kind() != MemberKind::Method && !member.is_static()
    }
}

/// Members whose state is persisted into a `SerializedRecord`.
pub struct SerializableMembers;

impl MemberFilter for SerializableMembers {
    fn key(&self) -> &'static str {
        "serializable"
    }

    fn accepts(&self, member: &MemberDescriptor) -> bool {
        member.kind() != MemberKind::Method
            && !member.is_static()
            && member.can_write()
            && member.is_serializable()
            && !member.is_host_serialized()
    }
}

/// Zero-argument methods, shown as buttons.
pub struct ButtonMembers;

impl MemberFilter for ButtonMembers {
    fn key(&self) -> &'static str {
        "buttons"
    }

    fn accepts(&self, member: &MemberDescriptor) -> bool {
        member.kind() == MemberKind::Method
    }
}

pub static ALL_MEMBERS: AllMembers = AllMembers;
pub static INSPECTABLE_MEMBERS: InspectableMembers = InspectableMembers;
pub static SERIALIZABLE_MEMBERS: SerializableMembers = SerializableMembers;
pub static BUTTON_MEMBERS: ButtonMembers = ButtonMembers;
