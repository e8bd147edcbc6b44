use wayfare::services::{email, google};
use wayfare::{db, routes, state};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let pool = db::init_pool(&database_url)
        .await
        .expect("database init failed");

    // Optional collaborators: missing config disables the feature, not the server.
    let google = google::GoogleConfig::from_env();
    if google.is_none() {
        tracing::warn!("Google OAuth not configured — sign-in disabled");
    }
    let email = email::EmailConfig::from_env();
    if email.is_none() {
        tracing::warn!("Resend not configured — form mail disabled");
    }

    let state = state::AppState::new(pool, google, email);

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "wayfare listening");
    axum::serve(listener, app).await.expect("server failed");
}
