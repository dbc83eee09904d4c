//! User record helpers.

use chrono::NaiveDateTime;
use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::{NewUser, User};

/// Insert a new user record. The password field must already be hashed.
///
/// # Errors
/// Returns any error produced by the insertion query; a duplicate id or
/// name surfaces as a unique-constraint violation.
#[must_use = "handle the result"]
pub async fn create_user(conn: &mut DbConnection, user: &NewUser<'_>) -> QueryResult<usize> {
    use crate::schema::users::dsl::users;
    diesel::insert_into(users).values(user).execute(conn).await
}

/// Look up a user record by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_user(conn: &mut DbConnection, user_id: &str) -> QueryResult<Option<User>> {
    use crate::schema::users::dsl as u;
    u::users
        .filter(u::id.eq(user_id))
        .first::<User>(conn)
        .await
        .optional()
}

/// Look up a user record by unique name.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_user_by_name(
    conn: &mut DbConnection,
    user_name: &str,
) -> QueryResult<Option<User>> {
    use crate::schema::users::dsl as u;
    u::users
        .filter(u::name.eq(user_name))
        .first::<User>(conn)
        .await
        .optional()
}

/// List all user records ordered by creation time.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_users(conn: &mut DbConnection) -> QueryResult<Vec<User>> {
    use crate::schema::users::dsl as u;
    u::users.order(u::create_time.asc()).load::<User>(conn).await
}

/// Replace a user's stored password hash.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_password_hash(
    conn: &mut DbConnection,
    user_id: &str,
    password_hash: &str,
) -> QueryResult<usize> {
    use crate::schema::users::dsl as u;
    diesel::update(u::users.filter(u::id.eq(user_id)))
        .set(u::password.eq(password_hash))
        .execute(conn)
        .await
}

/// Replace a user's permission mask. Last write wins.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_permission(
    conn: &mut DbConnection,
    user_id: &str,
    permission: i64,
) -> QueryResult<usize> {
    use crate::schema::users::dsl as u;
    diesel::update(u::users.filter(u::id.eq(user_id)))
        .set(u::permission.eq(permission))
        .execute(conn)
        .await
}

/// Flip a user's expired flag.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_expired(
    conn: &mut DbConnection,
    user_id: &str,
    expired: bool,
) -> QueryResult<usize> {
    use crate::schema::users::dsl as u;
    diesel::update(u::users.filter(u::id.eq(user_id)))
        .set(u::expired.eq(expired))
        .execute(conn)
        .await
}

/// Record a successful login time.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn touch_last_login(
    conn: &mut DbConnection,
    user_id: &str,
    when: NaiveDateTime,
) -> QueryResult<usize> {
    use crate::schema::users::dsl as u;
    diesel::update(u::users.filter(u::id.eq(user_id)))
        .set(u::last_login.eq(when))
        .execute(conn)
        .await
}

/// Delete a user record.
///
/// The store cascades: the user's comments and events are removed, while
/// authored articles and created categories keep their rows with the
/// user reference nulled.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_user(conn: &mut DbConnection, user_id: &str) -> QueryResult<usize> {
    use crate::schema::users::dsl as u;
    diesel::delete(u::users.filter(u::id.eq(user_id)))
        .execute(conn)
        .await
}
