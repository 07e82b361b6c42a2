//! Membership groups
//!
//! A group is an ordered, deduplicated list of object handles used to
//! classify live objects (draw order, update phase, collision category).
//! Structural changes requested while objects exist are deferred to
//! [`MembershipGroup::synchronize`], so a pass over the group never sees an
//! object twice and never yields an object whose removal was requested during
//! the same pass.

use crate::foundation::collections::ObjectHandle;
use std::cmp::Ordering;
use std::collections::HashSet;

/// Group errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupError {
    /// Removal requested for an object the group neither holds nor has pending
    #[error("group '{group}' does not track object {handle:?}")]
    NotTracked {
        /// Name of the group
        group: String,
        /// Offending handle
        handle: ObjectHandle,
    },
}

/// Result of a removal request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The object is committed and will leave at the next synchronization
    Scheduled,
    /// The object was only pending addition; the addition was cancelled
    CancelledAdd,
}

/// Ordered collection of object handles with deferred add/remove
#[derive(Debug, Clone, Default)]
pub struct MembershipGroup {
    name: String,

    /// Committed handles in insertion (or last sort) order
    ordered: Vec<ObjectHandle>,

    /// Committed handles for O(1) membership tests
    members: HashSet<ObjectHandle>,

    /// Pending additions in request order
    to_add: Vec<ObjectHandle>,
    to_add_set: HashSet<ObjectHandle>,

    /// Pending removals, always a subset of `members`
    to_remove: HashSet<ObjectHandle>,

    /// Bumped whenever committed indices may shift (sync, sort, clear)
    epoch: u64,
}

/// Detached position in a group's committed sequence
///
/// A cursor does not borrow its group, so the caller is free to mutate the
/// registry between calls to [`MembershipGroup::advance`]. It only walks the
/// elements that were committed when it was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupCursor {
    index: usize,
    limit: usize,
    epoch: u64,
}

impl MembershipGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Group name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Request that `handle` join the group
    ///
    /// Cancels a pending removal of the same object. Insertion is immediate
    /// only when the group has no committed members and nothing pending, since
    /// no pass can be observing it; otherwise it waits for the next
    /// synchronization.
    pub fn request_add(&mut self, handle: ObjectHandle) {
        self.to_remove.remove(&handle);

        if self.members.contains(&handle) || self.to_add_set.contains(&handle) {
            return;
        }

        if self.ordered.is_empty() && self.to_add.is_empty() {
            self.ordered.push(handle);
            self.members.insert(handle);
        } else {
            self.to_add.push(handle);
            self.to_add_set.insert(handle);
        }
    }

    /// Request that `handle` leave the group
    ///
    /// A pending addition of the same object is cancelled instead.
    pub fn request_remove(&mut self, handle: ObjectHandle) -> Result<RemoveOutcome, GroupError> {
        if self.to_add_set.remove(&handle) {
            self.to_add.retain(|pending| *pending != handle);
            return Ok(RemoveOutcome::CancelledAdd);
        }

        if self.members.contains(&handle) {
            self.to_remove.insert(handle);
            Ok(RemoveOutcome::Scheduled)
        } else {
            Err(GroupError::NotTracked {
                group: self.name.clone(),
                handle,
            })
        }
    }

    /// Committed membership test (pending changes are not visible)
    pub fn contains(&self, handle: ObjectHandle) -> bool {
        self.members.contains(&handle)
    }

    /// Whether the group will reference `handle` after the next synchronization
    pub fn intends_to_hold(&self, handle: ObjectHandle) -> bool {
        (self.members.contains(&handle) && !self.to_remove.contains(&handle))
            || self.to_add_set.contains(&handle)
    }

    /// Whether removal of `handle` has been requested but not applied
    pub fn is_pending_removal(&self, handle: ObjectHandle) -> bool {
        self.to_remove.contains(&handle)
    }

    /// Whether any change awaits synchronization
    pub fn has_pending_changes(&self) -> bool {
        !self.to_add.is_empty() || !self.to_remove.is_empty()
    }

    /// Apply pending removals, then pending additions in request order
    pub fn synchronize(&mut self) {
        if !self.has_pending_changes() {
            return;
        }

        if !self.to_remove.is_empty() {
            let to_remove = std::mem::take(&mut self.to_remove);
            self.ordered.retain(|handle| !to_remove.contains(handle));
            for handle in &to_remove {
                self.members.remove(handle);
            }
        }

        for handle in self.to_add.drain(..) {
            if self.members.insert(handle) {
                self.ordered.push(handle);
            }
        }
        self.to_add_set.clear();
        self.epoch += 1;
    }

    /// Reorder the committed sequence (stable, so ties keep insertion order)
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(ObjectHandle, ObjectHandle) -> Ordering,
    {
        self.ordered.sort_by(|a, b| compare(*a, *b));
        self.epoch += 1;
    }

    /// Drop every committed and pending handle
    pub fn clear(&mut self) {
        self.ordered.clear();
        self.members.clear();
        self.to_add.clear();
        self.to_add_set.clear();
        self.to_remove.clear();
        self.epoch += 1;
    }

    /// Start a pass over the committed sequence
    pub fn cursor(&self) -> GroupCursor {
        GroupCursor {
            index: 0,
            limit: self.ordered.len(),
            epoch: self.epoch,
        }
    }

    /// Yield the next live handle of a pass, skipping pending removals
    ///
    /// Returns `None` at the end of the pass. Restructuring the group (sync or
    /// sort) in the middle of a pass is a programming error; the pass is ended.
    pub fn advance(&self, cursor: &mut GroupCursor) -> Option<ObjectHandle> {
        debug_assert_eq!(
            cursor.epoch, self.epoch,
            "group '{}' was restructured during a pass",
            self.name
        );
        if cursor.epoch != self.epoch {
            return None;
        }

        while cursor.index < cursor.limit {
            let handle = self.ordered[cursor.index];
            cursor.index += 1;
            if !self.to_remove.contains(&handle) {
                return Some(handle);
            }
        }
        None
    }

    /// Borrowing iterator over live committed handles
    pub fn iter(&self) -> impl Iterator<Item = ObjectHandle> + '_ {
        self.ordered
            .iter()
            .copied()
            .filter(move |handle| !self.to_remove.contains(handle))
    }

    /// Number of committed members
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether there are no committed members
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}
