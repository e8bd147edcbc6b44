//! Client auth mirror — the locally held copy of the signed-in identity.
//!
//! Synchronization is one-directional from server truth to mirror, except
//! for optimistic wishlist edits (see `client::wishlist`), which write the
//! mirror first and reconcile afterward.

#[cfg(test)]
#[path = "mirror_test.rs"]
mod mirror_test;

use std::collections::HashSet;

use uuid::Uuid;

use crate::services::session::{Role, SessionErrorTag};

/// Denormalized copy of the signed-in user, kept to avoid a server
/// round-trip per heart icon.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct Viewer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub image_url: Option<String>,
    pub is_admin: bool,
    pub is_agent: bool,
    pub wishlist: HashSet<Uuid>,
}

impl Viewer {
    #[must_use]
    pub fn role(&self) -> Role {
        Role::from_flags(self.is_admin, self.is_agent)
    }
}

/// Session payload shape served by `GET /api/auth/session`.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct SessionPayload {
    pub user: Option<Viewer>,
    #[serde(default)]
    pub error: Option<SessionErrorTag>,
}

/// Resolution phase of the mirror.
///
/// Dependent UI renders a neutral/loading state while `Pending`: assuming
/// "signed out" before the first check resolves flashes a logged-out UI at
/// logged-in users.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Pending,
    SignedOut,
    SignedIn(Viewer),
}

/// What the UI shell must do after a mirror transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MirrorEffect {
    None,
    /// The session carried an error tag: force navigation to the login
    /// surface with an explanation keyed by the tag.
    ForceLogin(SessionErrorTag),
}

/// Client-held copy of the authenticated identity.
#[derive(Debug, Default)]
pub struct AuthMirror {
    phase: Phase,
    /// Sequence number of the most recent session check; responses carrying
    /// an older number are stale and discarded.
    latest_check: u64,
}

impl AuthMirror {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.phase == Phase::Pending
    }

    #[must_use]
    pub fn viewer(&self) -> Option<&Viewer> {
        match &self.phase {
            Phase::SignedIn(viewer) => Some(viewer),
            Phase::Pending | Phase::SignedOut => None,
        }
    }

    pub(crate) fn viewer_mut(&mut self) -> Option<&mut Viewer> {
        match &mut self.phase {
            Phase::SignedIn(viewer) => Some(viewer),
            Phase::Pending | Phase::SignedOut => None,
        }
    }

    /// Current wishlist membership for a listing; `false` when not signed in.
    #[must_use]
    pub fn in_wishlist(&self, listing_id: Uuid) -> bool {
        self.viewer().is_some_and(|v| v.wishlist.contains(&listing_id))
    }

    /// Start a session check, superseding any still in flight. The returned
    /// number must be passed back to [`Self::apply_session`].
    pub fn begin_check(&mut self) -> u64 {
        self.latest_check += 1;
        self.latest_check
    }

    /// Apply a resolved session check.
    ///
    /// A check superseded by a newer `begin_check` is discarded so it cannot
    /// clobber a since-changed mirror. An error-tagged payload clears the
    /// mirror and forces navigation to the login surface.
    pub fn apply_session(&mut self, check: u64, payload: SessionPayload) -> MirrorEffect {
        if check != self.latest_check {
            return MirrorEffect::None;
        }

        if let Some(tag) = payload.error {
            self.phase = Phase::SignedOut;
            return MirrorEffect::ForceLogin(tag);
        }

        self.phase = match payload.user {
            Some(viewer) => Phase::SignedIn(viewer),
            None => Phase::SignedOut,
        };
        MirrorEffect::None
    }

    /// Tear down on sign-out.
    pub fn clear(&mut self) {
        self.phase = Phase::SignedOut;
    }
}
