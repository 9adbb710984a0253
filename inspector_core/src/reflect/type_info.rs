// inspector_core/src/reflect/type_info.rs
use crate::reflect::member::{getter, getter_mut, GetFn, GetMutFn, MemberDescriptor};
use crate::reflect::reflect_field::{Reflect, ReflectField};
use std::any::{Any, TypeId};

/// A field whose members are inherited by the owning type.
pub struct BaseInfo {
    pub type_id: TypeId,
    pub type_info: fn() -> TypeInfo,
    pub get: GetFn,
    pub get_mut: GetMutFn,
}

impl BaseInfo {
    pub fn new<O: Any, B: ReflectField>(get: fn(&O) -> &B, get_mut: fn(&mut O) -> &mut B) -> Self {
        Self {
            type_id: TypeId::of::<B>(),
            type_info: B::type_info,
            get: getter(move |obj| obj.downcast_ref::<O>().map(|o| get(o) as &dyn Any)),
            get_mut: getter_mut(move |obj| {
                obj.downcast_mut::<O>().map(|o| get_mut(o) as &mut dyn Any)
            }),
        }
    }
}

/// Registration data for one type, as produced by `#[derive(Reflect)]`.
///
/// `members` holds only the type's own members, in declaration order. The
/// descriptor built from it takes care of inheritance and ordering.
pub struct TypeInfo {
    pub type_id: TypeId,
    pub type_name: &'static str,
    pub is_collection: bool,
    pub is_array: bool,
    pub base: Option<BaseInfo>,
    pub members: Vec<MemberDescriptor>,
    pub constructor: Option<fn() -> Box<dyn Reflect>>,
    pub fallback_constructor: Option<fn() -> Box<dyn Reflect>>,
}

impl TypeInfo {
    /// A struct with members.
    pub fn object<T: Any>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            is_collection: false,
            is_array: false,
            base: None,
            members: Vec::new(),
            constructor: None,
            fallback_constructor: None,
        }
    }

    /// A value type without members. Lists, arrays and maps are flagged as collections.
    pub fn leaf<T: ReflectField>() -> Self {
        let storage = T::storage();
        Self {
            is_collection: storage.is_collection(),
            is_array: storage.is_array,
            ..Self::object::<T>()
        }
    }

    pub fn with_base(mut self, base: BaseInfo) -> Self {
        self.base = Some(base);
        self
    }

    pub fn with_member(mut self, member: MemberDescriptor) -> Self {
        self.members.push(member);
        self
    }

    pub fn with_constructor(mut self, constructor: fn() -> Box<dyn Reflect>) -> Self {
        self.constructor = Some(constructor);
        self
    }

    /// Used when the type has no default constructor.
    pub fn with_fallback_constructor(mut self, constructor: fn() -> Box<dyn Reflect>) -> Self {
        self.fallback_constructor = Some(constructor);
        self
    }
}
