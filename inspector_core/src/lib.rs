// inspector_core/src/lib.rs
extern crate self as inspector_core;

pub mod constants;
pub mod editor;
pub mod error;
pub mod inspector_global;
pub mod logging;
pub mod metadata;
pub mod modification;
pub mod reflect;
pub mod serialization;
pub mod storage;

pub use error::{InspectorError, Result};
pub use reflect_derive::Reflect;

// Re-exported so code generated by `#[derive(Reflect)]` can submit registrations.
#[doc(hidden)]
pub use inventory;
