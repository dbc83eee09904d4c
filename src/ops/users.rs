//! User account operations. All but the own-password change require
//! `MANAGE_USER`.

use super::{OpError, OpResult};
use crate::{
    capabilities::Capabilities,
    credentials,
    db::{self, DbConnection},
    identity::{CapabilityError, Identity},
    models::NewUser,
    payload::UserPayload,
};

/// Arguments for account creation.
#[derive(Debug, Clone)]
pub struct CreateUser<'a> {
    /// Externally assigned account id.
    pub id: &'a str,
    /// Unique account name.
    pub name: &'a str,
    /// Plaintext password; hashed before it reaches the store.
    pub password: &'a str,
    /// Initial capability mask.
    pub capabilities: Capabilities,
}

/// Create an account.
///
/// # Errors
/// Capability errors for the identity; duplicate ids or names propagate
/// as constraint violations through [`OpError::Db`].
pub async fn create_user(
    conn: &mut DbConnection,
    identity: &Identity,
    salt: &str,
    request: &CreateUser<'_>,
) -> OpResult<UserPayload> {
    identity.require(Capabilities::MANAGE_USER)?;
    let hash = credentials::hash_password(request.password, salt);
    db::create_user(
        conn,
        &NewUser {
            id: request.id,
            name: request.name,
            password: &hash,
            permission: request.capabilities.to_stored(),
        },
    )
    .await?;
    let user = db::get_user(conn, request.id)
        .await?
        .ok_or(OpError::NotFound)?;
    Ok(UserPayload::new(&user, true))
}

/// Fetch one account.
///
/// # Errors
/// Capability errors for the identity; [`OpError::NotFound`] for an
/// unknown id.
pub async fn get_user(
    conn: &mut DbConnection,
    identity: &Identity,
    user_id: &str,
    with_permission: bool,
) -> OpResult<UserPayload> {
    identity.require(Capabilities::MANAGE_USER)?;
    let user = db::get_user(conn, user_id).await?.ok_or(OpError::NotFound)?;
    Ok(UserPayload::new(&user, with_permission))
}

/// List every account.
///
/// # Errors
/// Capability errors for the identity; store errors via [`OpError::Db`].
pub async fn list_users(
    conn: &mut DbConnection,
    identity: &Identity,
    with_permission: bool,
) -> OpResult<Vec<UserPayload>> {
    identity.require(Capabilities::MANAGE_USER)?;
    let users = db::list_users(conn).await?;
    Ok(users
        .iter()
        .map(|u| UserPayload::new(u, with_permission))
        .collect())
}

/// Change the calling account's own password.
///
/// # Errors
/// [`CapabilityError::NotAuthenticated`] for the anonymous identity;
/// [`OpError::NotFound`] when the account row has disappeared.
pub async fn change_own_password(
    conn: &mut DbConnection,
    identity: &Identity,
    salt: &str,
    new_password: &str,
) -> OpResult<()> {
    let user_id = identity
        .user_id()
        .ok_or(CapabilityError::NotAuthenticated)?;
    let hash = credentials::hash_password(new_password, salt);
    let updated = db::set_password_hash(conn, user_id, &hash).await?;
    if updated == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}

/// Replace an account's permission mask. Last write wins.
///
/// # Errors
/// Capability errors for the identity; [`OpError::NotFound`] for an
/// unknown id.
pub async fn set_permission(
    conn: &mut DbConnection,
    identity: &Identity,
    user_id: &str,
    capabilities: Capabilities,
) -> OpResult<()> {
    identity.require(Capabilities::MANAGE_USER)?;
    let updated = db::set_permission(conn, user_id, capabilities.to_stored()).await?;
    if updated == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}

/// Expire an account, making it permanently unauthenticatable.
///
/// # Errors
/// Capability errors for the identity; [`OpError::NotFound`] for an
/// unknown id.
pub async fn expire_user(
    conn: &mut DbConnection,
    identity: &Identity,
    user_id: &str,
) -> OpResult<()> {
    identity.require(Capabilities::MANAGE_USER)?;
    let updated = db::set_expired(conn, user_id, true).await?;
    if updated == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}

/// Delete an account.
///
/// The store cascades per schema: comments and events go with the user,
/// articles and categories keep their rows with the reference nulled.
///
/// # Errors
/// Capability errors for the identity; [`OpError::NotFound`] for an
/// unknown id.
pub async fn delete_user(
    conn: &mut DbConnection,
    identity: &Identity,
    user_id: &str,
) -> OpResult<()> {
    identity.require(Capabilities::MANAGE_USER)?;
    let deleted = db::delete_user(conn, user_id).await?;
    if deleted == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}
