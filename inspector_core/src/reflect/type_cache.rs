// inspector_core/src/reflect/type_cache.rs
use crate::error::{InspectorError, Result};
use crate::reflect::filters::MemberFilter;
use crate::reflect::member::{MemberDescriptor, MemberKind};
use crate::reflect::reflect_field::{Reflect, ReflectField};
use crate::reflect::type_info::TypeInfo;
use crate::{inspector_debug, inspector_error};
use once_cell::sync::Lazy;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// One entry per type that derives `Reflect`.
pub struct TypeRegistration {
    /// Identifier of the type as written in source.
    pub type_name: &'static str,
    pub type_id: fn() -> TypeId,
    pub type_info: fn() -> TypeInfo,
}

inventory::collect!(TypeRegistration);

/// All types registered through `#[derive(Reflect)]`.
pub static REGISTERED_TYPES: Lazy<Vec<&'static TypeRegistration>> = Lazy::new(|| {
    inventory::iter::<TypeRegistration>.into_iter().collect()
});

static TYPE_CACHE: Lazy<TypeCache> = Lazy::new(TypeCache::default);

/// Process-wide descriptor cache.
pub fn type_cache() -> &'static TypeCache {
    &TYPE_CACHE
}

/// Cached structural summary of one type.
pub struct TypeDescriptor {
    type_id: TypeId,
    type_name: &'static str,
    is_collection: bool,
    is_array: bool,
    members: Vec<Arc<MemberDescriptor>>,
    by_name: HashMap<String, usize>,
    constructor: Option<fn() -> Box<dyn Reflect>>,
    fallback_constructor: Option<fn() -> Box<dyn Reflect>>,
    filtered: RwLock<HashMap<&'static str, Arc<[Arc<MemberDescriptor>]>>>,
}

impl TypeDescriptor {
    fn build(info: TypeInfo, cache: &TypeCache) -> Self {
        let mut fields = Vec::new();
        let mut methods = Vec::new();

        if !info.is_collection {
            // Inherited members come first.
            if let Some(base) = &info.base {
                let base_descriptor = cache.get_or_build(base.type_id, base.type_info);
                for member in &base_descriptor.members {
                    let projected = Arc::new(
                        member.as_ref().clone().project(base.get.clone(), base.get_mut.clone()),
                    );
                    if member.kind() == MemberKind::Method {
                        methods.push(projected);
                    } else {
                        fields.push(projected);
                    }
                }
            }

            let mut local_fields = Vec::new();
            let mut local_methods = Vec::new();
            for member in info.members {
                let (inherited, local) = if member.kind() == MemberKind::Method {
                    (&mut methods, &mut local_methods)
                } else {
                    (&mut fields, &mut local_fields)
                };
                // An override keeps the slot of the member it replaces.
                match inherited.iter().position(|m: &Arc<MemberDescriptor>| m.name() == member.name()) {
                    Some(index) => inherited[index] = Arc::new(member),
                    None => local.push(Arc::new(member)),
                }
            }

            // `sort_by` is stable, so ties keep declaration order.
            local_fields.sort_by(|a, b| a.order().total_cmp(&b.order()));
            local_methods.sort_by(|a, b| a.order().total_cmp(&b.order()));
            fields.extend(local_fields);
            methods.extend(local_methods);
        }

        let members: Vec<_> = fields.into_iter().chain(methods).collect();
        let mut by_name = HashMap::with_capacity(members.len());
        for (index, member) in members.iter().enumerate() {
            by_name.entry(member.name().to_string()).or_insert(index);
        }

        Self {
            type_id: info.type_id,
            type_name: info.type_name,
            is_collection: info.is_collection,
            is_array: info.is_array,
            members,
            by_name,
            constructor: info.constructor,
            fallback_constructor: info.fallback_constructor,
            filtered: RwLock::new(HashMap::new()),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn is_collection(&self) -> bool {
        self.is_collection
    }

    pub fn is_array(&self) -> bool {
        self.is_array
    }

    pub fn has_default_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    fn assert_not_collection(&self) {
        assert!(
            !self.is_collection,
            "`{}` is a collection; collection descriptors have no members",
            self.type_name
        );
    }

    /// Every member in iteration order.
    ///
    /// # Panics
    /// When called on a collection descriptor.
    pub fn members(&self) -> &[Arc<MemberDescriptor>] {
        self.assert_not_collection();
        &self.members
    }

    /// Members accepted by `filter`, memoized per filter key.
    ///
    /// # Panics
    /// When called on a collection descriptor.
    pub fn members_matching(&self, filter: &dyn MemberFilter) -> Arc<[Arc<MemberDescriptor>]> {
        self.assert_not_collection();
        let key = filter.key();
        if let Some(list) = self.filtered.read().unwrap_or_else(PoisonError::into_inner).get(key) {
            return list.clone();
        }

        let list: Arc<[Arc<MemberDescriptor>]> = self
            .members
            .iter()
            .filter(|m| filter.accepts(m))
            .cloned()
            .collect();
        self.filtered
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(list)
            .clone()
    }

    /// Looks a member up by its declared name.
    ///
    /// # Panics
    /// When called on a collection descriptor.
    pub fn member(&self, name: &str) -> Option<&Arc<MemberDescriptor>> {
        self.assert_not_collection();
        self.by_name.get(name).map(|&index| &self.members[index])
    }

    /// Creates a fresh instance with the default constructor, falling back
    /// to the registered fallback constructor.
    pub fn create_instance(&self) -> Result<Box<dyn Reflect>> {
        if let Some(constructor) = self.constructor {
            return Ok(constructor());
        }
        if let Some(constructor) = self.fallback_constructor {
            inspector_debug!("`{}` has no default constructor, using its fallback", self.type_name);
            return Ok(constructor());
        }
        inspector_error!("Unable to create an instance of `{}`.", self.type_name);
        Err(InspectorError::NotConstructible {
            type_name: self.type_name.to_string(),
        })
    }
}

/// Descriptors keyed by type identity, built on first request.
#[derive(Default)]
pub struct TypeCache {
    descriptors: RwLock<HashMap<TypeId, Arc<TypeDescriptor>>>,
}

impl TypeCache {
    /// Returns the descriptor for `T`, building it on first use.
    pub fn get<T: ReflectField>(&self) -> Arc<TypeDescriptor> {
        self.get_or_build(TypeId::of::<T>(), T::type_info)
    }

    /// Returns the cached descriptor for `type_id` or builds one from `build`.
    pub fn get_or_build(&self, type_id: TypeId, build: fn() -> TypeInfo) -> Arc<TypeDescriptor> {
        if let Some(descriptor) = self.cached(type_id) {
            return descriptor;
        }

        // Built outside the lock: base types are resolved through the cache.
        let descriptor = Arc::new(TypeDescriptor::build(build(), self));
        self.descriptors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(type_id)
            .or_insert(descriptor)
            .clone()
    }

    /// Returns the descriptor only if it has already been built.
    pub fn cached(&self, type_id: TypeId) -> Option<Arc<TypeDescriptor>> {
        self.descriptors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
            .cloned()
    }

    /// Finds a derived type by the name it was declared with.
    pub fn get_by_name(&self, type_name: &str) -> Option<Arc<TypeDescriptor>> {
        REGISTERED_TYPES
            .iter()
            .find(|registration| registration.type_name == type_name)
            .map(|registration| self.get_or_build((registration.type_id)(), registration.type_info))
    }

    /// Creates an instance of a derived type by name.
    pub fn create_instance_by_name(&self, type_name: &str) -> Result<Box<dyn Reflect>> {
        self.get_by_name(type_name)
            .ok_or_else(|| InspectorError::UnknownType(type_name.to_string()))?
            .create_instance()
    }

    /// Number of descriptors built so far.
    pub fn len(&self) -> usize {
        self.descriptors.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached descriptor. Called when the host reloads its types.
    pub fn reset(&self) {
        self.descriptors.write().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::filters::{BUTTON_MEMBERS, SERIALIZABLE_MEMBERS};
    use crate::reflect::storage_type::{StorageType, ValueKind};
    use crate::reflect::type_info::BaseInfo;
    use crate::reflect::value::Value;
    use crate::serialization::reference::{ListReferenceOperator, ReferenceOperator};
    use std::any::Any;

    #[derive(Default)]
    struct Body {
        mass: f32,
        label: String,
    }

    impl Body {
        fn wake(&mut self) {
            self.label = "awake".into();
        }
    }

    impl ReflectField for Body {
        fn storage() -> StorageType {
            StorageType::of::<Self>(ValueKind::Object)
        }

        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>()
                .with_member(MemberDescriptor::field::<Self, f32>("mass", |b| &b.mass, |b| &mut b.mass))
                .with_member(MemberDescriptor::method::<Self>("wake", Body::wake))
                .with_member(MemberDescriptor::field::<Self, String>("label", |b| &b.label, |b| &mut b.label))
        }

        fn to_value(&self, _refs: &mut dyn ReferenceOperator) -> Result<Value> {
            Ok(Value::Null)
        }

        fn from_value(_value: Value, _refs: &mut dyn ReferenceOperator) -> Result<Self> {
            Ok(Self::default())
        }
    }

    #[derive(Default)]
    struct Chest {
        body: Body,
        weight: i32,
        name: String,
        tag: String,
    }

    impl Chest {
        fn open(&mut self) {
            self.weight = 0;
        }
    }

    impl Reflect for Chest {
        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn descriptor(&self) -> Arc<TypeDescriptor> {
            type_cache().get::<Self>()
        }

        fn reflected_type_name(&self) -> &'static str {
            "Chest"
        }
    }

    impl ReflectField for Chest {
        fn storage() -> StorageType {
            StorageType::of::<Self>(ValueKind::Object)
        }

        fn type_info() -> TypeInfo {
            TypeInfo::object::<Self>()
                .with_base(BaseInfo::new::<Self, Body>(|c| &c.body, |c| &mut c.body))
                .with_member(MemberDescriptor::method::<Self>("open", Chest::open).with_order(0.0))
                .with_member(MemberDescriptor::field::<Self, String>("tag", |c| &c.tag, |c| &mut c.tag))
                .with_member(
                    MemberDescriptor::field::<Self, i32>("weight", |c| &c.weight, |c| &mut c.weight)
                        .with_order(2.0),
                )
                .with_member(
                    MemberDescriptor::field::<Self, String>("name", |c| &c.name, |c| &mut c.name)
                        .with_order(1.0),
                )
                // Same name as the base member: keeps the base slot.
                .with_member(
                    MemberDescriptor::field::<Self, String>("label", |c| &c.name, |c| &mut c.name)
                        .with_display_name("Chest Label"),
                )
                .with_constructor(crate::reflect::reflect_field::boxed_default::<Self>)
        }

        fn to_value(&self, _refs: &mut dyn ReferenceOperator) -> Result<Value> {
            Ok(Value::Null)
        }

        fn from_value(_value: Value, _refs: &mut dyn ReferenceOperator) -> Result<Self> {
            Ok(Self::default())
        }
    }

    fn names(members: &[Arc<MemberDescriptor>]) -> Vec<&str> {
        members.iter().map(|m| m.name()).collect()
    }

    #[test]
    fn members_are_ordered_base_first_then_by_order_with_methods_last() {
        let cache = TypeCache::default();
        let descriptor = cache.get::<Chest>();
        assert_eq!(
            names(descriptor.members()),
            vec!["mass", "label", "name", "weight", "tag", "wake", "open"]
        );
        assert_eq!(descriptor.member("label").unwrap().display_name(), "Chest Label");
    }

    #[test]
    fn inherited_members_reach_through_the_base() {
        let cache = TypeCache::default();
        let descriptor = cache.get::<Chest>();
        let mut object = Chest::default();
        let mut refs = Vec::new();
        let mut op = ListReferenceOperator::new(&mut refs);

        descriptor
            .member("mass")
            .unwrap()
            .write(&mut object, Value::Float(3.5), &mut op)
            .unwrap();
        assert_eq!(object.body.mass, 3.5);

        descriptor.member("wake").unwrap().invoke(&mut object).unwrap();
        assert_eq!(object.body.label, "awake");
    }

    #[test]
    fn descriptors_and_filtered_lists_are_memoized() {
        let cache = TypeCache::default();
        let first = cache.get::<Chest>();
        let second = cache.get::<Chest>();
        assert!(Arc::ptr_eq(&first, &second));

        let a = first.members_matching(&SERIALIZABLE_MEMBERS);
        let b = first.members_matching(&SERIALIZABLE_MEMBERS);
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(names(&first.members_matching(&BUTTON_MEMBERS)), vec!["wake", "open"]);

        // The base descriptor is cached as well.
        assert_eq!(cache.len(), 2);
        cache.reset();
        assert!(cache.is_empty());
        assert!(!Arc::ptr_eq(&first, &cache.get::<Chest>()));
    }

    #[test]
    fn create_instance_uses_the_constructor() {
        let cache = TypeCache::default();
        let instance = cache.get::<Chest>().create_instance().unwrap();
        assert!(instance.as_any().is::<Chest>());
        assert!(matches!(
            cache.get::<Body>().create_instance(),
            Err(InspectorError::NotConstructible { .. })
        ));
    }

    #[test]
    fn collections_are_flagged() {
        let cache = TypeCache::default();
        assert!(cache.get::<Vec<i32>>().is_collection());
        assert!(cache.get::<[u8; 4]>().is_array());
        assert!(!cache.get::<String>().is_collection());
    }

    #[test]
    #[should_panic(expected = "collection")]
    fn collection_members_fail_fast() {
        let cache = TypeCache::default();
        let _ = cache.get::<Vec<i32>>().members();
    }
}
