// inspector_core/src/inspector_global.rs
use crate::inspector_info;
use crate::metadata::store::MetadataStore;
use crate::reflect::type_cache::type_cache;
use crate::serialization::cycle::CycleDetector;
use crate::storage::inspector_config::current_settings;
use std::cell::RefCell;
use std::rc::Rc;

/// Main thread state shared by every inspector window.
pub struct InspectorServices {
    /// One detector for the edit, measure and scene passes.
    pub cycle_detector: RefCell<CycleDetector>,
    pub metadata: RefCell<MetadataStore>,
}

impl InspectorServices {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            cycle_detector: RefCell::new(CycleDetector::new(current_settings().max_instantiation_depth)),
            metadata: RefCell::new(MetadataStore::new()),
        })
    }
}

thread_local! {
    /// Single instance of services used by the main thread.
    pub static INSPECTOR_SERVICES: Rc<InspectorServices> = InspectorServices::new();
}

/// Gets mutable access to the shared cycle detector.
pub fn with_cycle_detector<F, R>(f: F) -> R
where
    F: FnOnce(&mut CycleDetector) -> R,
{
    INSPECTOR_SERVICES.with(|services| f(&mut services.cycle_detector.borrow_mut()))
}

/// Gets mutable access to the metadata of every inspected object.
pub fn with_metadata<F, R>(f: F) -> R
where
    F: FnOnce(&mut MetadataStore) -> R,
{
    INSPECTOR_SERVICES.with(|services| f(&mut services.metadata.borrow_mut()))
}

/// Drops every cache that depends on type layouts. Hosts call this after
/// reloading their types.
pub fn on_types_reloaded() {
    type_cache().reset();
    with_metadata(|metadata| metadata.reset());
    with_cycle_detector(|detector| detector.reset());
    inspector_info!("Type caches cleared.");
}
