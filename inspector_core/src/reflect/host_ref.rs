// inspector_core/src/reflect/host_ref.rs
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque reference to an object owned by the host.
///
/// Two `HostRef`s are equal only when they point at the same allocation.
#[derive(Clone)]
pub struct HostRef(Arc<dyn Any + Send + Sync>);

impl HostRef {
    pub fn new<T: Any + Send + Sync>(object: T) -> Self {
        Self(Arc::new(object))
    }

    pub fn from_arc(object: Arc<dyn Any + Send + Sync>) -> Self {
        Self(object)
    }

    /// Returns the referenced object if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.0.clone().downcast::<T>().ok()
    }

    pub fn ptr_eq(&self, other: &HostRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn address(&self) -> *const () {
        Arc::as_ptr(&self.0) as *const ()
    }
}

impl PartialEq for HostRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for HostRef {}

impl fmt::Debug for HostRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HostRef({:p})", self.address())
    }
}

/// Compares two optional references by identity.
pub fn same_reference(a: &Option<HostRef>, b: &Option<HostRef>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.ptr_eq(b),
        (None, None) => true,
        _ => false,
    }
}
