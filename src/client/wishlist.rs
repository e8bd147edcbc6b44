//! Optimistic wishlist toggle — an explicit two-phase operation.
//!
//! Phase one flips the mirror's membership bit immediately; phase two
//! commits or rolls back when the server responds. Concurrent toggles on
//! one listing serialize their flips in call order; the last server
//! response wins on the membership bit (the persisted set operation itself
//! is commutative and idempotent, so response order does not matter there).

#[cfg(test)]
#[path = "wishlist_test.rs"]
mod wishlist_test;

use uuid::Uuid;

use super::mirror::AuthMirror;

/// The server call a pending toggle must issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditIntent {
    Add,
    Remove,
}

/// In-flight toggle recording the pre-toggle state for rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingToggle {
    pub listing_id: Uuid,
    /// Membership before the optimistic flip.
    pub was_liked: bool,
}

impl PendingToggle {
    #[must_use]
    pub fn intent(&self) -> EditIntent {
        if self.was_liked { EditIntent::Remove } else { EditIntent::Add }
    }
}

/// Why a toggle could not start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ToggleError {
    /// No signed-in viewer: no optimistic write, no server call. The caller
    /// surfaces a login prompt.
    #[error("sign in to save listings")]
    Unauthenticated,
}

/// User-visible notice emitted by reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    ToggleFailed { listing_id: Uuid },
}

/// Flip the mirror's membership bit optimistically and return the pending
/// handle for phase two.
pub fn toggle(mirror: &mut AuthMirror, listing_id: Uuid) -> Result<PendingToggle, ToggleError> {
    let Some(viewer) = mirror.viewer_mut() else {
        return Err(ToggleError::Unauthenticated);
    };

    let was_liked = viewer.wishlist.contains(&listing_id);
    if was_liked {
        viewer.wishlist.remove(&listing_id);
    } else {
        viewer.wishlist.insert(listing_id);
    }
    Ok(PendingToggle { listing_id, was_liked })
}

/// Reconcile a pending toggle with the server outcome.
///
/// Success pins the toggled state, failure restores the pre-toggle state
/// and raises a notice — last response wins on the membership bit. A mirror
/// that signed out in the meantime has nothing left to reconcile.
pub fn resolve(mirror: &mut AuthMirror, pending: PendingToggle, succeeded: bool) -> Option<Notice> {
    let Some(viewer) = mirror.viewer_mut() else {
        return None;
    };

    if succeeded {
        if pending.was_liked {
            viewer.wishlist.remove(&pending.listing_id);
        } else {
            viewer.wishlist.insert(pending.listing_id);
        }
        None
    } else {
        if pending.was_liked {
            viewer.wishlist.insert(pending.listing_id);
        } else {
            viewer.wishlist.remove(&pending.listing_id);
        }
        Some(Notice::ToggleFailed { listing_id: pending.listing_id })
    }
}
