// inspector_core/src/serialization/reference.rs
use crate::reflect::host_ref::HostRef;

/// Swaps host objects for indices while serializing, and back while restoring.
pub trait ReferenceOperator {
    /// Stores `object` and returns the index it can be retrieved with.
    fn store_reference(&mut self, object: HostRef) -> usize;

    /// Returns the object stored at `index`, or `None` if the slot is empty
    /// or was never filled.
    fn retrieve_reference(&mut self, index: usize) -> Option<HostRef>;
}

/// Reference operator backed by a plain list.
///
/// Storing the same object twice yields the same index.
pub struct ListReferenceOperator<'a> {
    references: &'a mut Vec<Option<HostRef>>,
}

impl<'a> ListReferenceOperator<'a> {
    pub fn new(references: &'a mut Vec<Option<HostRef>>) -> Self {
        Self { references }
    }
}

impl ReferenceOperator for ListReferenceOperator<'_> {
    fn store_reference(&mut self, object: HostRef) -> usize {
        let existing = self
            .references
            .iter()
            .position(|slot| slot.as_ref().is_some_and(|stored| stored.ptr_eq(&object)));
        match existing {
            Some(index) => index,
            None => {
                self.references.push(Some(object));
                self.references.len() - 1
            }
        }
    }

    fn retrieve_reference(&mut self, index: usize) -> Option<HostRef> {
        self.references.get(index).cloned().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_object_is_stored_once() {
        let mut references = Vec::new();
        let mut op = ListReferenceOperator::new(&mut references);
        let a = HostRef::new(1u8);
        let b = HostRef::new(1u8);

        assert_eq!(op.store_reference(a.clone()), 0);
        assert_eq!(op.store_reference(b.clone()), 1);
        assert_eq!(op.store_reference(a.clone()), 0);
        assert!(op.retrieve_reference(1).unwrap().ptr_eq(&b));
        assert!(op.retrieve_reference(7).is_none());
        assert_eq!(references.len(), 2);
    }

    #[test]
    fn destroyed_slots_resolve_to_none() {
        let mut references = vec![None, Some(HostRef::new("alive"))];
        let mut op = ListReferenceOperator::new(&mut references);
        assert!(op.retrieve_reference(0).is_none());
        assert!(op.retrieve_reference(1).is_some());
    }
}
