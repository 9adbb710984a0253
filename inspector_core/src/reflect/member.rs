// inspector_core/src/reflect/member.rs
use crate::constants::DEFAULT_MEMBER_ORDER;
use crate::editor::field_name::parse_field_name;
use crate::error::{InspectorError, Result};
use crate::reflect::reflect_field::{Reflect, ReflectField};
use crate::reflect::storage_type::StorageType;
use crate::reflect::value::Value;
use crate::serialization::cycle::CycleDetector;
use crate::serialization::reference::ReferenceOperator;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use strum_macros::Display;

pub type GetFn = Arc<dyn for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync>;
pub type GetMutFn = Arc<dyn for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync>;
pub type ReadFn = Arc<dyn Fn(&dyn Any, &mut dyn ReferenceOperator) -> Result<Value> + Send + Sync>;
pub type WriteFn = Arc<dyn Fn(&mut dyn Any, Value, &mut dyn ReferenceOperator) -> Result<()> + Send + Sync>;
pub type InvokeFn = Arc<dyn Fn(&mut dyn Any) -> Result<()> + Send + Sync>;

// Closures only get higher-ranked signatures when the bound is visible at the call site.
pub(crate) fn getter<F>(f: F) -> GetFn
where
    F: for<'a> Fn(&'a dyn Any) -> Option<&'a dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

pub(crate) fn getter_mut<F>(f: F) -> GetMutFn
where
    F: for<'a> Fn(&'a mut dyn Any) -> Option<&'a mut dyn Any> + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum MemberKind {
    Field,
    Property,
    Method,
}

/// How a member reaches its value.
#[derive(Clone)]
pub enum MemberAccess {
    Field { get: GetFn, get_mut: GetMutFn },
    Property { read: ReadFn, write: Option<WriteFn> },
    Method { invoke: InvokeFn },
}

/// A field, property or zero-argument method of a reflected type.
#[derive(Clone)]
pub struct MemberDescriptor {
    name: String,
    display_name: String,
    owner: &'static str,
    kind: MemberKind,
    storage: Option<StorageType>,
    order: f64,
    is_static: bool,
    is_public: bool,
    read_only: bool,
    serializable: bool,
    host_serialized: bool,
    tooltip: Option<String>,
    access: MemberAccess,
}

impl MemberDescriptor {
    fn new(name: &str, owner: &'static str, kind: MemberKind, storage: Option<StorageType>, access: MemberAccess) -> Self {
        Self {
            name: name.to_string(),
            display_name: parse_field_name(name).into_owned(),
            owner,
            kind,
            storage,
            order: DEFAULT_MEMBER_ORDER,
            is_static: false,
            is_public: true,
            read_only: false,
            serializable: true,
            host_serialized: false,
            tooltip: None,
            access,
        }
    }

    /// A stored field of `O` with type `F`.
    pub fn field<O: Any, F: ReflectField>(
        name: &str,
        get: fn(&O) -> &F,
        get_mut: fn(&mut O) -> &mut F,
    ) -> Self {
        let access = MemberAccess::Field {
            get: getter(move |obj| obj.downcast_ref::<O>().map(|o| get(o) as &dyn Any)),
            get_mut: getter_mut(move |obj| {
                obj.downcast_mut::<O>().map(|o| get_mut(o) as &mut dyn Any)
            }),
        };
        Self::new(name, std::any::type_name::<O>(), MemberKind::Field, Some(F::storage()), access)
    }

    /// A computed value exposed through a getter and an optional setter.
    pub fn property<O: Any, F: ReflectField>(
        name: &str,
        get: fn(&O) -> F,
        set: Option<fn(&mut O, F)>,
    ) -> Self {
        let owner = std::any::type_name::<O>();
        let member = name.to_string();
        let read: ReadFn = Arc::new(move |obj: &dyn Any, refs: &mut dyn ReferenceOperator| {
            let o = obj.downcast_ref::<O>().ok_or_else(|| InspectorError::WrongOwner {
                member: member.clone(),
                expected: owner,
            })?;
            get(o).to_value(refs)
        });

        let member = name.to_string();
        let write = set.map(|set| {
            Arc::new(move |obj: &mut dyn Any, value: Value, refs: &mut dyn ReferenceOperator| {
                let o = obj.downcast_mut::<O>().ok_or_else(|| InspectorError::WrongOwner {
                    member: member.clone(),
                    expected: owner,
                })?;
                set(o, F::from_value(value, refs)?);
                Ok::<(), InspectorError>(())
            }) as WriteFn
        });

        Self::new(name, owner, MemberKind::Property, Some(F::storage()), MemberAccess::Property { read, write })
    }

    /// A property that does not belong to any instance.
    pub fn static_property<F: ReflectField>(name: &str, get: fn() -> F, set: Option<fn(F)>) -> Self {
        let read: ReadFn = Arc::new(move |_obj: &dyn Any, refs: &mut dyn ReferenceOperator| {
            get().to_value(refs)
        });
        let write = set.map(|set| {
            Arc::new(move |_obj: &mut dyn Any, value: Value, refs: &mut dyn ReferenceOperator| {
                set(F::from_value(value, refs)?);
                Ok::<(), InspectorError>(())
            }) as WriteFn
        });
        let mut member = Self::new(name, "static", MemberKind::Property, Some(F::storage()), MemberAccess::Property { read, write });
        member.is_static = true;
        member
    }

    /// A zero-argument method, shown as a button.
    pub fn method<O: Any>(name: &str, invoke: fn(&mut O)) -> Self {
        let owner = std::any::type_name::<O>();
        let member = name.to_string();
        let invoke: InvokeFn = Arc::new(move |obj: &mut dyn Any| {
            let o = obj.downcast_mut::<O>().ok_or_else(|| InspectorError::WrongOwner {
                member: member.clone(),
                expected: owner,
            })?;
            invoke(o);
            Ok::<(), InspectorError>(())
        });
        let mut member = Self::new(name, owner, MemberKind::Method, None, MemberAccess::Method { invoke });
        member.serializable = false;
        member
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    pub fn with_order(mut self, order: f64) -> Self {
        self.order = order;
        self
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn public(mut self, is_public: bool) -> Self {
        self.is_public = is_public;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn serializable(mut self, serializable: bool) -> Self {
        self.serializable = serializable && self.kind != MemberKind::Method;
        self
    }

    /// Marks the member as persisted by the host itself.
    pub fn host_serialized(mut self) -> Self {
        self.host_serialized = true;
        self
    }

    /// Re-targets the member so it is reached through a base object.
    pub fn project(self, base_get: GetFn, base_get_mut: GetMutFn) -> Self {
        let name = self.name.clone();
        let owner = self.owner;
        let missing_base = move || InspectorError::WrongOwner {
            member: name.clone(),
            expected: owner,
        };

        let access = match self.access {
            MemberAccess::Field { get, get_mut } => {
                let base_mut = base_get_mut.clone();
                MemberAccess::Field {
                    get: getter({
                        let base_get = base_get.clone();
                        move |obj| base_get(obj).and_then(|base| get(base))
                    }),
                    get_mut: getter_mut(move |obj| base_mut(obj).and_then(|base| get_mut(base))),
                }
            }
            MemberAccess::Property { read, write } => {
                let missing = missing_base.clone();
                let read: ReadFn = Arc::new(move |obj: &dyn Any, refs: &mut dyn ReferenceOperator| {
                    let base = base_get(obj).ok_or_else(&missing)?;
                    read(base, refs)
                });
                let write = write.map(|write| {
                    let missing = missing_base.clone();
                    let base_mut = base_get_mut.clone();
                    Arc::new(move |obj: &mut dyn Any, value: Value, refs: &mut dyn ReferenceOperator| {
                        let base = base_mut(obj).ok_or_else(&missing)?;
                        write(base, value, refs)
                    }) as WriteFn
                });
                MemberAccess::Property { read, write }
            }
            MemberAccess::Method { invoke } => {
                let invoke: InvokeFn = Arc::new(move |obj: &mut dyn Any| {
                    let base = base_get_mut(obj).ok_or_else(&missing_base)?;
                    invoke(base)
                });
                MemberAccess::Method { invoke }
            }
        };

        Self { access, ..self }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn kind(&self) -> MemberKind {
        self.kind
    }

    pub fn storage(&self) -> Option<&StorageType> {
        self.storage.as_ref()
    }

    pub fn order(&self) -> f64 {
        self.order
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    pub fn is_public(&self) -> bool {
        self.is_public
    }

    pub fn is_serializable(&self) -> bool {
        self.serializable
    }

    pub fn is_host_serialized(&self) -> bool {
        self.host_serialized
    }

    pub fn tooltip(&self) -> Option<&str> {
        self.tooltip.as_deref()
    }

    pub fn can_write(&self) -> bool {
        match &self.access {
            MemberAccess::Field { .. } => !self.read_only,
            MemberAccess::Property { write, .. } => write.is_some() && !self.read_only,
            MemberAccess::Method { .. } => false,
        }
    }

    fn wrong_owner(&self) -> InspectorError {
        InspectorError::WrongOwner {
            member: self.name.clone(),
            expected: self.owner,
        }
    }

    /// Borrows the stored value of a field.
    pub fn get<'a>(&self, obj: &'a dyn Any) -> Option<&'a dyn Any> {
        match &self.access {
            MemberAccess::Field { get, .. } => get(obj),
            _ => None,
        }
    }

    /// Mutably borrows the stored value of a field.
    pub fn get_mut<'a>(&self, obj: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        match &self.access {
            MemberAccess::Field { get_mut, .. } => get_mut(obj),
            _ => None,
        }
    }

    /// Borrows a writable field holding a nested object.
    pub fn nested_mut<'a>(&self, obj: &'a mut dyn Any) -> Option<&'a mut dyn Reflect> {
        if !self.can_write() {
            return None;
        }
        let storage = self.storage.as_ref()?;
        let slot = self.get_mut(obj)?;
        storage.reflect_mut(slot)
    }

    /// Reads the member's current value.
    pub fn read(&self, obj: &dyn Any, refs: &mut dyn ReferenceOperator) -> Result<Value> {
        match &self.access {
            MemberAccess::Field { get, .. } => {
                let slot = get(obj).ok_or_else(|| self.wrong_owner())?;
                match &self.storage {
                    Some(storage) => storage.read(slot, refs),
                    None => Ok(Value::Null),
                }
            }
            MemberAccess::Property { read, .. } => read(obj, refs),
            MemberAccess::Method { .. } => Ok(Value::Null),
        }
    }

    /// Writes `value` into the member. Non-writable members ignore the call.
    pub fn write(&self, obj: &mut dyn Any, value: Value, refs: &mut dyn ReferenceOperator) -> Result<()> {
        if !self.can_write() {
            return Ok(());
        }
        match &self.access {
            MemberAccess::Field { get_mut, .. } => {
                let slot = get_mut(obj).ok_or_else(|| self.wrong_owner())?;
                match &self.storage {
                    Some(storage) => storage.assign(slot, value, refs),
                    None => Ok(()),
                }
            }
            MemberAccess::Property { write: Some(write), .. } => write(obj, value, refs),
            _ => Ok(()),
        }
    }

    /// Calls a method member.
    pub fn invoke(&self, obj: &mut dyn Any) -> Result<()> {
        match &self.access {
            MemberAccess::Method { invoke } => invoke(obj),
            _ => Err(InspectorError::NotInvocable(self.name.clone())),
        }
    }

    /// Fills null references stored in a writable field.
    pub fn instantiate(&self, obj: &mut dyn Any, detector: &mut CycleDetector) -> bool {
        if !self.can_write() {
            return false;
        }
        match (&self.access, &self.storage) {
            (MemberAccess::Field { get_mut, .. }, Some(storage)) => match get_mut(obj) {
                Some(slot) => storage.instantiate(slot, detector),
                None => false,
            },
            _ => false,
        }
    }
}

impl fmt::Debug for MemberDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("storage", &self.storage)
            .field("order", &self.order)
            .field("can_write", &self.can_write())
            .field("serializable", &self.serializable)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serialization::reference::ListReferenceOperator;

    #[derive(Default)]
    struct Gauge {
        level: i32,
        scale: f32,
    }

    impl Gauge {
        fn doubled(&self) -> i32 {
            self.level * 2
        }

        fn reset(&mut self) {
            self.level = 0;
        }
    }

    #[test]
    fn field_read_and_write() {
        let member = MemberDescriptor::field::<Gauge, i32>("level", |g| &g.level, |g| &mut g.level);
        assert_eq!(member.display_name(), "Level");

        let mut gauge = Gauge { level: 3, scale: 1.0 };
        let mut refs = Vec::new();
        let mut op = ListReferenceOperator::new(&mut refs);
        assert_eq!(member.read(&gauge, &mut op).unwrap(), Value::Int(3));
        member.write(&mut gauge, Value::Int(9), &mut op).unwrap();
        assert_eq!(gauge.level, 9);
    }

    #[test]
    fn writes_to_read_only_members_are_ignored() {
        let member = MemberDescriptor::field::<Gauge, f32>("scale", |g| &g.scale, |g| &mut g.scale)
            .read_only();
        let getter_only = MemberDescriptor::property::<Gauge, i32>("doubled", Gauge::doubled, None);

        let mut gauge = Gauge { level: 2, scale: 1.5 };
        let mut refs = Vec::new();
        let mut op = ListReferenceOperator::new(&mut refs);
        member.write(&mut gauge, Value::Float(4.0), &mut op).unwrap();
        getter_only.write(&mut gauge, Value::Int(1), &mut op).unwrap();
        assert_eq!(gauge.scale, 1.5);
        assert_eq!(getter_only.read(&gauge, &mut op).unwrap(), Value::Int(4));
    }

    #[test]
    fn methods_are_invoked_and_never_serialized() {
        let member = MemberDescriptor::method::<Gauge>("reset", Gauge::reset);
        assert!(!member.is_serializable());
        assert!(!member.can_write());

        let mut gauge = Gauge { level: 5, scale: 1.0 };
        member.invoke(&mut gauge).unwrap();
        assert_eq!(gauge.level, 0);
    }

    #[test]
    fn wrong_owner_is_reported() {
        let member = MemberDescriptor::field::<Gauge, i32>("level", |g| &g.level, |g| &mut g.level);
        let mut refs = Vec::new();
        let mut op = ListReferenceOperator::new(&mut refs);
        let other = 5_u8;
        assert!(matches!(
            member.read(&other, &mut op),
            Err(InspectorError::WrongOwner { .. })
        ));
    }
}
