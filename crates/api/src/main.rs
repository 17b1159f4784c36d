use chrono::{Duration, Utc};

use nimbuscrm_api::AppState;
use nimbuscrm_auth::hash_password;
use nimbuscrm_core::{UserId, UserType};
use nimbuscrm_store::{StoredUser, UserStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nimbuscrm_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let state = AppState::new(jwt_secret.as_bytes(), Duration::hours(8));
    bootstrap_platform_owner(&state);

    let app = nimbuscrm_api::build_app(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Seed the initial platform owner from the environment, since a fresh
/// in-memory deployment has nobody who could log in otherwise.
fn bootstrap_platform_owner(state: &AppState) {
    let (Ok(email), Ok(password)) = (
        std::env::var("NIMBUSCRM_BOOTSTRAP_EMAIL"),
        std::env::var("NIMBUSCRM_BOOTSTRAP_PASSWORD"),
    ) else {
        return;
    };

    let password_hash = match hash_password(&password) {
        Ok(h) => h,
        Err(e) => {
            tracing::error!(error = %e, "bootstrap owner not created");
            return;
        }
    };

    let now = Utc::now();
    let owner = StoredUser {
        id: UserId::new(),
        tenant_id: None,
        email: email.clone(),
        display_name: "Platform Owner".to_string(),
        user_type: UserType::PlatformOwner,
        role_ids: vec![],
        custom_permissions: vec![],
        is_active: true,
        password_hash,
        created_at: now,
        updated_at: now,
    };

    match state.users.upsert(owner) {
        Ok(()) => tracing::info!(email = %email, "bootstrap platform owner created"),
        Err(e) => tracing::error!(error = %e, "bootstrap owner not created"),
    }
}
