use super::*;

#[test]
fn edit_body_reports_noop_as_success() {
    let body = EditBody { success: true, changed: false };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["changed"], false);
}

#[test]
fn wishlist_body_serializes_listing_ids() {
    let listing = Uuid::new_v4();
    let body = WishlistBody { wishlist: vec![listing] };
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json["wishlist"][0], listing.to_string());
}
