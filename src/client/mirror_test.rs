use super::*;

fn viewer(wishlist: &[Uuid]) -> Viewer {
    Viewer {
        id: Uuid::new_v4(),
        name: "Pat".into(),
        email: "pat@example.com".into(),
        image_url: None,
        is_admin: false,
        is_agent: false,
        wishlist: wishlist.iter().copied().collect(),
    }
}

fn signed_in_payload(wishlist: &[Uuid]) -> SessionPayload {
    SessionPayload { user: Some(viewer(wishlist)), error: None }
}

// =============================================================================
// lifecycle
// =============================================================================

#[test]
fn mirror_starts_pending() {
    let mirror = AuthMirror::new();
    assert!(mirror.is_pending());
    assert!(mirror.viewer().is_none());
}

#[test]
fn signed_in_payload_populates_mirror() {
    let mut mirror = AuthMirror::new();
    let check = mirror.begin_check();

    let effect = mirror.apply_session(check, signed_in_payload(&[]));

    assert_eq!(effect, MirrorEffect::None);
    assert!(!mirror.is_pending());
    assert_eq!(mirror.viewer().unwrap().email, "pat@example.com");
}

#[test]
fn empty_payload_settles_signed_out() {
    let mut mirror = AuthMirror::new();
    let check = mirror.begin_check();

    let effect = mirror.apply_session(check, SessionPayload { user: None, error: None });

    assert_eq!(effect, MirrorEffect::None);
    assert_eq!(*mirror.phase(), Phase::SignedOut);
}

#[test]
fn clear_tears_down_to_signed_out() {
    let mut mirror = AuthMirror::new();
    let check = mirror.begin_check();
    mirror.apply_session(check, signed_in_payload(&[]));

    mirror.clear();

    assert_eq!(*mirror.phase(), Phase::SignedOut);
    assert!(mirror.viewer().is_none());
}

// =============================================================================
// stale-response guard
// =============================================================================

#[test]
fn superseded_check_is_discarded() {
    let mut mirror = AuthMirror::new();
    let stale = mirror.begin_check();
    let current = mirror.begin_check();

    mirror.apply_session(current, SessionPayload { user: None, error: None });
    let effect = mirror.apply_session(stale, signed_in_payload(&[]));

    assert_eq!(effect, MirrorEffect::None);
    assert_eq!(*mirror.phase(), Phase::SignedOut, "stale sign-in must not resurrect the mirror");
}

#[test]
fn stale_check_leaves_pending_mirror_pending() {
    let mut mirror = AuthMirror::new();
    let stale = mirror.begin_check();
    mirror.begin_check();

    mirror.apply_session(stale, signed_in_payload(&[]));

    assert!(mirror.is_pending());
}

// =============================================================================
// error tags
// =============================================================================

#[test]
fn error_tag_clears_mirror_and_forces_login() {
    let mut mirror = AuthMirror::new();
    let check = mirror.begin_check();
    mirror.apply_session(check, signed_in_payload(&[]));

    let check = mirror.begin_check();
    let effect = mirror.apply_session(
        check,
        SessionPayload { user: None, error: Some(SessionErrorTag::UserInactive) },
    );

    assert_eq!(effect, MirrorEffect::ForceLogin(SessionErrorTag::UserInactive));
    assert_eq!(*mirror.phase(), Phase::SignedOut);
}

// =============================================================================
// wishlist membership + wire shape
// =============================================================================

#[test]
fn in_wishlist_reflects_membership() {
    let listing = Uuid::new_v4();
    let mut mirror = AuthMirror::new();
    let check = mirror.begin_check();
    mirror.apply_session(check, signed_in_payload(&[listing]));

    assert!(mirror.in_wishlist(listing));
    assert!(!mirror.in_wishlist(Uuid::new_v4()));
}

#[test]
fn in_wishlist_false_before_check_resolves() {
    let mirror = AuthMirror::new();
    assert!(!mirror.in_wishlist(Uuid::new_v4()));
}

#[test]
fn payload_deserializes_without_error_field() {
    let payload: SessionPayload = serde_json::from_str(r#"{"user": null}"#).unwrap();
    assert!(payload.user.is_none());
    assert!(payload.error.is_none());
}

#[test]
fn payload_deserializes_error_tag() {
    let payload: SessionPayload =
        serde_json::from_str(r#"{"user": null, "error": "user-not-found"}"#).unwrap();
    assert_eq!(payload.error, Some(SessionErrorTag::UserNotFound));
}

#[test]
fn viewer_role_follows_flags() {
    let mut v = viewer(&[]);
    assert_eq!(v.role(), Role::User);
    v.is_agent = true;
    assert_eq!(v.role(), Role::Agent);
    v.is_admin = true;
    assert_eq!(v.role(), Role::Admin);
}
