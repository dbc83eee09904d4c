//! Audit event helpers.
//!
//! The event table is append-only: rows are written at request time and
//! never updated or deleted by normal operation. Removal only happens
//! through the user-delete cascade.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::{Event, NewEvent};

/// Append an audit event.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn record_event(conn: &mut DbConnection, new_event: &NewEvent<'_>) -> QueryResult<usize> {
    use crate::schema::event::dsl as e;
    diesel::insert_into(e::event)
        .values(new_event)
        .execute(conn)
        .await
}

/// List the most recent audit events, newest first.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_events(conn: &mut DbConnection, limit: i64) -> QueryResult<Vec<Event>> {
    use crate::schema::event::dsl as e;
    e::event
        .order(e::create_time.desc())
        .then_order_by(e::id.desc())
        .limit(limit)
        .load::<Event>(conn)
        .await
}
