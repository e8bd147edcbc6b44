use super::*;
use crate::client::mirror::{AuthMirror, Phase, SessionPayload, Viewer};

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

fn signed_in_mirror(wishlist: &[Uuid]) -> AuthMirror {
    let mut mirror = AuthMirror::new();
    let check = mirror.begin_check();
    mirror.apply_session(check, SessionPayload { user: Some(viewer(wishlist)), error: None });
    mirror
}

// =============================================================================
// phase one: optimistic flip
// =============================================================================

#[test]
fn toggle_requires_a_signed_in_viewer() {
    let mut pending_mirror = AuthMirror::new();
    assert_eq!(toggle(&mut pending_mirror, Uuid::new_v4()), Err(ToggleError::Unauthenticated));
    assert!(pending_mirror.is_pending(), "failed toggle must not touch the mirror");

    let mut signed_out = AuthMirror::new();
    signed_out.clear();
    assert_eq!(toggle(&mut signed_out, Uuid::new_v4()), Err(ToggleError::Unauthenticated));
    assert_eq!(*signed_out.phase(), Phase::SignedOut);
}

#[test]
fn toggle_flips_membership_immediately() {
    let listing = Uuid::new_v4();
    let mut mirror = signed_in_mirror(&[]);

    let pending = toggle(&mut mirror, listing).unwrap();

    assert!(mirror.in_wishlist(listing));
    assert!(!pending.was_liked);
    assert_eq!(pending.intent(), EditIntent::Add);
}

#[test]
fn toggle_on_liked_listing_unlikes() {
    let listing = Uuid::new_v4();
    let mut mirror = signed_in_mirror(&[listing]);

    let pending = toggle(&mut mirror, listing).unwrap();

    assert!(!mirror.in_wishlist(listing));
    assert!(pending.was_liked);
    assert_eq!(pending.intent(), EditIntent::Remove);
}

// =============================================================================
// phase two: commit / rollback
// =============================================================================

#[test]
fn success_commits_the_toggled_state() {
    let listing = Uuid::new_v4();
    let mut mirror = signed_in_mirror(&[]);

    let pending = toggle(&mut mirror, listing).unwrap();
    let notice = resolve(&mut mirror, pending, true);

    assert!(notice.is_none());
    assert!(mirror.in_wishlist(listing));
}

#[test]
fn failure_rolls_back_and_raises_notice() {
    let listing = Uuid::new_v4();
    let mut mirror = signed_in_mirror(&[]);

    let pending = toggle(&mut mirror, listing).unwrap();
    assert!(mirror.in_wishlist(listing), "optimistic flip applies before the server call");

    let notice = resolve(&mut mirror, pending, false);

    assert_eq!(notice, Some(Notice::ToggleFailed { listing_id: listing }));
    assert!(!mirror.in_wishlist(listing), "failed toggle reverts to the pre-toggle state");
}

#[test]
fn failed_unlike_restores_membership() {
    let listing = Uuid::new_v4();
    let mut mirror = signed_in_mirror(&[listing]);

    let pending = toggle(&mut mirror, listing).unwrap();
    let notice = resolve(&mut mirror, pending, false);

    assert!(notice.is_some());
    assert!(mirror.in_wishlist(listing));
}

// =============================================================================
// concurrent toggles on one listing
// =============================================================================

#[test]
fn rapid_toggles_serialize_in_call_order() {
    let listing = Uuid::new_v4();
    let mut mirror = signed_in_mirror(&[]);

    let first = toggle(&mut mirror, listing).unwrap();
    let second = toggle(&mut mirror, listing).unwrap();

    assert!(!mirror.in_wishlist(listing), "two flips cancel out before reconciliation");
    assert_eq!(first.intent(), EditIntent::Add);
    assert_eq!(second.intent(), EditIntent::Remove);
}

#[test]
fn last_server_response_wins_on_membership() {
    let listing = Uuid::new_v4();
    let mut mirror = signed_in_mirror(&[]);

    let first = toggle(&mut mirror, listing).unwrap();
    let second = toggle(&mut mirror, listing).unwrap();

    resolve(&mut mirror, first, true);
    assert!(mirror.in_wishlist(listing));

    resolve(&mut mirror, second, true);
    assert!(!mirror.in_wishlist(listing));
}

#[test]
fn late_failure_rolls_back_over_earlier_success() {
    let listing = Uuid::new_v4();
    let mut mirror = signed_in_mirror(&[]);

    let first = toggle(&mut mirror, listing).unwrap();
    let second = toggle(&mut mirror, listing).unwrap();

    resolve(&mut mirror, first, true);
    let notice = resolve(&mut mirror, second, false);

    assert!(notice.is_some());
    assert!(mirror.in_wishlist(listing), "rollback restores the state the failed toggle saw");
}

#[test]
fn resolve_after_sign_out_is_a_noop() {
    let listing = Uuid::new_v4();
    let mut mirror = signed_in_mirror(&[]);

    let pending = toggle(&mut mirror, listing).unwrap();
    mirror.clear();

    assert!(resolve(&mut mirror, pending, false).is_none());
    assert_eq!(*mirror.phase(), Phase::SignedOut);
}
