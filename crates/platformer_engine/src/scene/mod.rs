//! Object ownership and categorized membership
//!
//! The registry owns objects; groups classify them by handle for draw order,
//! update phase and collision category.

pub mod group;
pub mod object;
pub mod registry;

pub use group::{GroupCursor, GroupError, MembershipGroup, RemoveOutcome};
pub use object::GameObject;
pub use registry::{ObjectRegistry, RegistryError, SyncStats};
