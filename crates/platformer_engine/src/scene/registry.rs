//! # Object Registry
//!
//! Exclusive owner of every live object and every membership group. Groups
//! only hold [`ObjectHandle`]s; the registry is the single authority allowed
//! to deallocate, and it only does so for a killed object once no group
//! references it any more.
//!
//! ## Lifecycle
//!
//! 1. [`ObjectRegistry::create`] stores an object and hands out a handle.
//! 2. Gameplay adds the handle to groups and eventually calls
//!    [`ObjectRegistry::kill`], which requests removal from every group.
//! 3. [`ObjectRegistry::synchronize_all`], run once per step after all
//!    updates, commits group changes and erases killed objects whose group
//!    list has drained.

use crate::foundation::collections::{GroupId, ObjectHandle, SlotMap};
use crate::scene::group::{GroupCursor, GroupError, MembershipGroup, RemoveOutcome};
use std::cmp::Ordering;

/// Registry errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Handle does not name a live registry entry
    #[error("stale object handle {0:?}")]
    StaleHandle(ObjectHandle),

    /// Group id does not name a registry group
    #[error("unknown group {0:?}")]
    UnknownGroup(GroupId),

    /// Membership change requested for an object that was already killed
    #[error("object {0:?} has been killed")]
    ObjectKilled(ObjectHandle),

    /// Group invariant violation
    #[error(transparent)]
    Group(#[from] GroupError),
}

/// Outcome of one registry synchronization
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncStats {
    /// Objects visited
    pub synchronized: usize,

    /// Killed objects erased this cycle
    pub deallocated: usize,

    /// Killed objects kept alive because a group still referenced them
    pub deferred: usize,
}

#[derive(Debug)]
struct Entry<T> {
    object: T,

    /// Groups that reference or intend to reference this object
    groups: Vec<GroupId>,

    killed: bool,
}

/// Owner of all objects and groups for one game session
#[derive(Debug)]
pub struct ObjectRegistry<T> {
    objects: SlotMap<ObjectHandle, Entry<T>>,
    groups: SlotMap<GroupId, MembershipGroup>,
}

impl<T> ObjectRegistry<T> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            objects: SlotMap::with_key(),
            groups: SlotMap::with_key(),
        }
    }

    /// Create a named group
    pub fn create_group(&mut self, name: impl Into<String>) -> GroupId {
        self.groups.insert(MembershipGroup::new(name))
    }

    /// Look up a group
    pub fn group(&self, id: GroupId) -> Option<&MembershipGroup> {
        self.groups.get(id)
    }

    /// Take ownership of `object` and return its handle
    pub fn create(&mut self, object: T) -> ObjectHandle {
        let handle = self.objects.insert(Entry {
            object,
            groups: Vec::new(),
            killed: false,
        });
        log::trace!("Created object {:?}", handle);
        handle
    }

    /// Borrow an object (killed objects stay reachable until deallocated)
    pub fn get(&self, handle: ObjectHandle) -> Option<&T> {
        self.objects.get(handle).map(|entry| &entry.object)
    }

    /// Mutably borrow an object
    pub fn get_mut(&mut self, handle: ObjectHandle) -> Option<&mut T> {
        self.objects.get_mut(handle).map(|entry| &mut entry.object)
    }

    /// Whether the handle names an object that exists and is not killed
    pub fn is_alive(&self, handle: ObjectHandle) -> bool {
        self.objects.get(handle).is_some_and(|entry| !entry.killed)
    }

    /// Whether the handle names an object still held by the registry
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.objects.contains_key(handle)
    }

    /// Groups the object currently participates in
    pub fn memberships(&self, handle: ObjectHandle) -> Option<&[GroupId]> {
        self.objects.get(handle).map(|entry| entry.groups.as_slice())
    }

    /// Request that an object join a group
    pub fn add_to_group(&mut self, handle: ObjectHandle, group_id: GroupId) -> Result<(), RegistryError> {
        let entry = self
            .objects
            .get_mut(handle)
            .ok_or(RegistryError::StaleHandle(handle))?;
        if entry.killed {
            return Err(RegistryError::ObjectKilled(handle));
        }
        let group = self
            .groups
            .get_mut(group_id)
            .ok_or(RegistryError::UnknownGroup(group_id))?;

        if !entry.groups.contains(&group_id) {
            entry.groups.push(group_id);
        }
        group.request_add(handle);
        Ok(())
    }

    /// Request that an object leave a group
    pub fn remove_from_group(&mut self, handle: ObjectHandle, group_id: GroupId) -> Result<(), RegistryError> {
        let entry = self
            .objects
            .get_mut(handle)
            .ok_or(RegistryError::StaleHandle(handle))?;
        let group = self
            .groups
            .get_mut(group_id)
            .ok_or(RegistryError::UnknownGroup(group_id))?;

        if group.request_remove(handle)? == RemoveOutcome::CancelledAdd {
            entry.groups.retain(|id| *id != group_id);
        }
        Ok(())
    }

    /// Mark an object killed and request removal from all of its groups
    ///
    /// Returns `false` if the object was already killed.
    pub fn kill(&mut self, handle: ObjectHandle) -> Result<bool, RegistryError> {
        let entry = self
            .objects
            .get_mut(handle)
            .ok_or(RegistryError::StaleHandle(handle))?;
        if entry.killed {
            return Ok(false);
        }

        let mut cancelled = Vec::new();
        for group_id in &entry.groups {
            let group = self
                .groups
                .get_mut(*group_id)
                .ok_or(RegistryError::UnknownGroup(*group_id))?;
            if group.request_remove(handle)? == RemoveOutcome::CancelledAdd {
                cancelled.push(*group_id);
            }
        }
        entry.groups.retain(|id| !cancelled.contains(id));
        entry.killed = true;
        Ok(true)
    }

    /// Commit pending group changes and erase drained killed objects
    ///
    /// For each object: synchronize every group it participates in, drop the
    /// groups that no longer contain it, then deallocate it if it is killed
    /// and its group list is empty.
    pub fn synchronize_all(&mut self) -> SyncStats {
        let mut stats = SyncStats::default();
        let handles: Vec<ObjectHandle> = self.objects.keys().collect();

        for handle in handles {
            let Some(entry) = self.objects.get_mut(handle) else {
                continue;
            };
            stats.synchronized += 1;

            for group_id in &entry.groups {
                if let Some(group) = self.groups.get_mut(*group_id) {
                    group.synchronize();
                }
            }

            let groups = &self.groups;
            entry
                .groups
                .retain(|id| groups.get(*id).is_some_and(|group| group.contains(handle)));

            if entry.killed {
                if entry.groups.is_empty() {
                    debug_assert!(
                        self.groups.values().all(|group| !group.intends_to_hold(handle)),
                        "deallocating {handle:?} while a group still references it"
                    );
                    self.objects.remove(handle);
                    stats.deallocated += 1;
                } else {
                    stats.deferred += 1;
                }
            }
        }

        if stats.deallocated > 0 {
            log::trace!(
                "Registry sync: {} objects, {} deallocated, {} deferred",
                stats.synchronized,
                stats.deallocated,
                stats.deferred
            );
        }
        stats
    }

    /// Deallocate every object and reset every group
    ///
    /// Skips the group-drain step; groups are cleared here so none can keep a
    /// handle to an erased object.
    pub fn destroy_all(&mut self) {
        let count = self.objects.len();
        self.objects.clear();
        for group in self.groups.values_mut() {
            group.clear();
        }
        log::debug!("Destroyed all {} objects", count);
    }

    /// Start an iteration-safe pass over a group
    pub fn group_cursor(&self, group_id: GroupId) -> Result<GroupCursor, RegistryError> {
        self.groups
            .get(group_id)
            .map(MembershipGroup::cursor)
            .ok_or(RegistryError::UnknownGroup(group_id))
    }

    /// Next live handle of a pass started with [`ObjectRegistry::group_cursor`]
    pub fn next_in_group(&self, group_id: GroupId, cursor: &mut GroupCursor) -> Option<ObjectHandle> {
        self.groups.get(group_id)?.advance(cursor)
    }

    /// Borrowing pass over a group's live objects
    pub fn iter_group(&self, group_id: GroupId) -> impl Iterator<Item = (ObjectHandle, &T)> + '_ {
        self.groups
            .get(group_id)
            .into_iter()
            .flat_map(MembershipGroup::iter)
            .filter_map(move |handle| self.objects.get(handle).map(|entry| (handle, &entry.object)))
    }

    /// Reorder a group's committed sequence by comparing objects
    pub fn sort_group<F>(&mut self, group_id: GroupId, mut compare: F) -> Result<(), RegistryError>
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let objects = &self.objects;
        let group = self
            .groups
            .get_mut(group_id)
            .ok_or(RegistryError::UnknownGroup(group_id))?;

        group.sort_by(|a, b| match (objects.get(a), objects.get(b)) {
            (Some(a), Some(b)) => compare(&a.object, &b.object),
            _ => Ordering::Equal,
        });
        Ok(())
    }

    /// Number of objects held, killed or not
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the registry holds no objects
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

impl<T> Default for ObjectRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Marker {
        depth: u32,
    }

    fn marker(depth: u32) -> Marker {
        Marker { depth }
    }

    #[test]
    fn test_create_returns_resolvable_handle() {
        let mut registry = ObjectRegistry::new();
        let handle = registry.create(marker(2));

        assert_eq!(registry.get(handle), Some(&marker(2)));
        assert!(registry.is_alive(handle));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_killed_object_without_groups_is_erased_on_sync() {
        let mut registry = ObjectRegistry::new();
        let handle = registry.create(marker(0));

        assert_eq!(registry.kill(handle), Ok(true));
        assert!(!registry.is_alive(handle));
        assert!(registry.contains(handle));

        let stats = registry.synchronize_all();
        assert_eq!(stats.deallocated, 1);
        assert!(!registry.contains(handle));
        assert_eq!(registry.get(handle), None);
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut registry = ObjectRegistry::new();
        let draw = registry.create_group("draw");
        let handle = registry.create(marker(0));
        registry.add_to_group(handle, draw).expect("add");

        assert_eq!(registry.kill(handle), Ok(true));
        assert_eq!(registry.kill(handle), Ok(false));
    }

    #[test]
    fn test_killed_object_in_two_groups_deallocated_exactly_once() {
        let mut registry = ObjectRegistry::new();
        let draw = registry.create_group("draw");
        let bullets = registry.create_group("bullets");

        let anchor = registry.create(marker(0));
        registry.add_to_group(anchor, draw).expect("add");
        registry.add_to_group(anchor, bullets).expect("add");
        let handle = registry.create(marker(1));
        registry.add_to_group(handle, draw).expect("add");
        registry.add_to_group(handle, bullets).expect("add");
        registry.synchronize_all();
        assert!(registry.group(draw).is_some_and(|g| g.contains(handle)));

        registry.kill(handle).expect("kill");
        // Still committed in both groups, only pending removal
        assert!(registry.group(draw).is_some_and(|g| g.contains(handle)));
        assert!(registry.group(bullets).is_some_and(|g| g.contains(handle)));
        assert!(registry.contains(handle));

        let first = registry.synchronize_all();
        assert_eq!(first.deallocated, 1);
        assert!(!registry.contains(handle));
        assert!(registry.group(draw).is_some_and(|g| !g.contains(handle)));
        assert!(registry.group(bullets).is_some_and(|g| !g.contains(handle)));

        let second = registry.synchronize_all();
        assert_eq!(second.deallocated, 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_no_group_references_after_deallocation() {
        let mut registry = ObjectRegistry::new();
        let groups: Vec<_> = (0..3).map(|i| registry.create_group(format!("g{i}"))).collect();
        let handles: Vec<_> = (0..5).map(|i| registry.create(marker(i))).collect();
        for handle in &handles {
            for group in &groups {
                registry.add_to_group(*handle, *group).expect("add");
            }
        }
        registry.synchronize_all();

        registry.kill(handles[1]).expect("kill");
        registry.kill(handles[3]).expect("kill");
        registry.synchronize_all();

        for group in &groups {
            for (handle, _) in registry.iter_group(*group) {
                assert!(registry.contains(handle));
            }
            assert_eq!(registry.group(*group).map(MembershipGroup::len), Some(3));
        }
    }

    #[test]
    fn test_kill_cancels_pending_addition() {
        let mut registry = ObjectRegistry::new();
        let post_update = registry.create_group("post_update");
        let first = registry.create(marker(0));
        registry.add_to_group(first, post_update).expect("add");

        // Group is non-empty, so this addition is deferred
        let bullet = registry.create(marker(1));
        registry.add_to_group(bullet, post_update).expect("add");
        registry.kill(bullet).expect("kill");
        assert_eq!(registry.memberships(bullet), Some(&[][..]));

        registry.synchronize_all();
        assert!(!registry.contains(bullet));
        assert!(registry.group(post_update).is_some_and(|g| !g.contains(bullet)));
    }

    #[test]
    fn test_add_to_group_after_kill_fails() {
        let mut registry = ObjectRegistry::new();
        let draw = registry.create_group("draw");
        let handle = registry.create(marker(0));
        registry.kill(handle).expect("kill");

        assert_eq!(registry.add_to_group(handle, draw), Err(RegistryError::ObjectKilled(handle)));
    }

    #[test]
    fn test_stale_handle_is_rejected() {
        let mut registry = ObjectRegistry::new();
        let draw = registry.create_group("draw");
        let handle = registry.create(marker(0));
        registry.kill(handle).expect("kill");
        registry.synchronize_all();

        // The slot gets reused, the old handle must not alias the new object
        let replacement = registry.create(marker(9));
        assert_ne!(handle, replacement);
        assert_eq!(registry.get(handle), None);
        assert_eq!(registry.add_to_group(handle, draw), Err(RegistryError::StaleHandle(handle)));
    }

    #[test]
    fn test_remove_from_group_prunes_membership_on_sync() {
        let mut registry = ObjectRegistry::new();
        let draw = registry.create_group("draw");
        let vulnerable = registry.create_group("vulnerable");
        let handle = registry.create(marker(0));
        registry.add_to_group(handle, draw).expect("add");
        registry.add_to_group(handle, vulnerable).expect("add");

        registry.remove_from_group(handle, vulnerable).expect("remove");
        registry.synchronize_all();

        assert_eq!(registry.memberships(handle), Some(&[draw][..]));
        assert!(registry.is_alive(handle));
    }

    #[test]
    fn test_remove_from_group_never_joined_fails() {
        let mut registry = ObjectRegistry::new();
        let draw = registry.create_group("draw");
        let handle = registry.create(marker(0));

        let result = registry.remove_from_group(handle, draw);
        assert!(matches!(result, Err(RegistryError::Group(GroupError::NotTracked { .. }))));
    }

    #[test]
    fn test_kill_during_cursor_pass_skips_unvisited() {
        let mut registry = ObjectRegistry::new();
        let pre_update = registry.create_group("pre_update");
        let handles: Vec<_> = (0..3).map(|i| registry.create(marker(i))).collect();
        for handle in &handles {
            registry.add_to_group(*handle, pre_update).expect("add");
        }
        registry.synchronize_all();

        let mut cursor = registry.group_cursor(pre_update).expect("group");
        let mut visited = Vec::new();
        while let Some(handle) = registry.next_in_group(pre_update, &mut cursor) {
            visited.push(handle);
            if handle == handles[0] {
                registry.kill(handles[2]).expect("kill");
                let spawned = registry.create(marker(7));
                registry.add_to_group(spawned, pre_update).expect("add");
            }
        }

        assert_eq!(visited, vec![handles[0], handles[1]]);
        let stats = registry.synchronize_all();
        assert_eq!(stats.deallocated, 1);
        assert_eq!(registry.group(pre_update).map(MembershipGroup::len), Some(3));
    }

    #[test]
    fn test_sort_group_by_object_field() {
        let mut registry = ObjectRegistry::new();
        let draw = registry.create_group("draw");
        for depth in [3, 1, 2] {
            let handle = registry.create(marker(depth));
            registry.add_to_group(handle, draw).expect("add");
        }
        registry.synchronize_all();

        registry.sort_group(draw, |a, b| a.depth.cmp(&b.depth)).expect("sort");
        let depths: Vec<u32> = registry.iter_group(draw).map(|(_, m)| m.depth).collect();
        assert_eq!(depths, vec![1, 2, 3]);
    }

    #[test]
    fn test_destroy_all_clears_groups() {
        let mut registry = ObjectRegistry::new();
        let draw = registry.create_group("draw");
        let handle = registry.create(marker(0));
        registry.add_to_group(handle, draw).expect("add");

        registry.destroy_all();

        assert!(registry.is_empty());
        assert!(registry.group(draw).is_some_and(MembershipGroup::is_empty));
        assert_eq!(registry.iter_group(draw).count(), 0);
    }
}
