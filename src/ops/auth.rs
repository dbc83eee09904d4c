//! Login challenge verification.

use chrono::Utc;
use tracing::{info, warn};

use super::{OpError, OpResult, RequestMeta};
use crate::{
    db::{self, DbConnection},
    models::{NewEvent, User},
};

/// Parsed login arguments from the routing layer.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Account name as typed by the client.
    pub name: String,
    /// `digest(stored_hash + timestamp)` computed client-side, so the
    /// plaintext password never crosses the wire after registration.
    pub enc_password: String,
    /// Unix seconds the client bound into the digest. Freshness is the
    /// caller's policy to enforce.
    pub timestamp: i64,
}

/// Verify a login challenge.
///
/// On success the user's `last_login` is updated and a `login` event is
/// appended.
///
/// # Errors
/// [`OpError::AuthRejected`] for unknown names, expired accounts, and
/// digest mismatches alike; nothing in the result distinguishes them.
pub async fn login(
    conn: &mut DbConnection,
    request: &LoginRequest,
    meta: &RequestMeta,
) -> OpResult<User> {
    let rejected = || {
        warn!(name = %request.name, "login rejected");
        OpError::AuthRejected
    };
    let Some(user) = db::get_user_by_name(conn, &request.name).await? else {
        return Err(rejected());
    };
    if !user.is_active() || !user.check_challenge(&request.enc_password, request.timestamp) {
        return Err(rejected());
    }
    db::touch_last_login(conn, &user.id, Utc::now().naive_utc()).await?;
    let description = format!("user {} logged in", user.name);
    db::record_event(
        conn,
        &NewEvent {
            kind: "login",
            description: &description,
            ip_address: meta.ip_address.as_deref(),
            endpoint: &meta.endpoint,
            request: &meta.request_line,
            user_id: Some(&user.id),
        },
    )
    .await?;
    info!(user = %user.name, "authenticated");
    Ok(user)
}
