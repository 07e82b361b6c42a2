//! Specialized collection types

pub use slotmap::SlotMap;

slotmap::new_key_type! {
    /// Generational handle to an object owned by the registry
    ///
    /// A handle outlives the object it names: once the object is
    /// deallocated, lookups through the stale handle return `None` instead of
    /// aliasing a newer object in the same slot.
    pub struct ObjectHandle;

    /// Handle to a membership group owned by the registry
    pub struct GroupId;
}
