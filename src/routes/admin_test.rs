use super::*;
use crate::services::session::SessionUser;

fn admin_user() -> SessionUser {
    SessionUser {
        id: Uuid::new_v4(),
        name: "Admin".into(),
        email: "admin@example.com".into(),
        image_url: None,
        is_admin: true,
        is_agent: false,
        wishlist: vec![],
    }
}

// =============================================================================
// error mapping
// =============================================================================

#[test]
fn missing_user_maps_to_not_found() {
    assert_eq!(account_error_status(&AccountError::NotFound), StatusCode::NOT_FOUND);
}

#[test]
fn database_fault_maps_to_internal_error() {
    let err = AccountError::Database(sqlx::Error::PoolClosed);
    assert_eq!(account_error_status(&err), StatusCode::INTERNAL_SERVER_ERROR);
}

// =============================================================================
// request bodies
// =============================================================================

#[test]
fn roles_body_requires_both_flags() {
    let body: RolesBody = serde_json::from_str(r#"{"is_admin": true, "is_agent": false}"#).unwrap();
    assert!(body.is_admin);
    assert!(!body.is_agent);

    assert!(serde_json::from_str::<RolesBody>(r#"{"is_admin": true}"#).is_err());
}

#[test]
fn active_body_deserializes() {
    let body: ActiveBody = serde_json::from_str(r#"{"active": false}"#).unwrap();
    assert!(!body.active);
}

// =============================================================================
// gated surfaces
// =============================================================================

#[tokio::test]
async fn admin_home_labels_the_admin_area() {
    let Json(body) = admin_home(RequireAdmin(admin_user())).await;
    assert_eq!(body["area"], "admin");
    assert_eq!(body["viewer"]["is_admin"], true);
}

#[tokio::test]
async fn agent_dashboard_labels_the_dashboard_area() {
    let mut agent = admin_user();
    agent.is_admin = false;
    agent.is_agent = true;

    let Json(body) = agent_dashboard(RequireStaff(agent)).await;
    assert_eq!(body["area"], "dashboard");
    assert_eq!(body["viewer"]["is_agent"], true);
}
