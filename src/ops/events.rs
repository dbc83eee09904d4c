//! Audit event operations.

use super::{OpResult, RequestMeta};
use crate::{
    capabilities::Capabilities,
    db::{self, DbConnection},
    identity::Identity,
    models::NewEvent,
    payload::EventPayload,
};

/// Arguments for appending an audit event.
#[derive(Debug, Clone)]
pub struct RecordEvent<'a> {
    /// Event classification, e.g. `login` or `article.delete`.
    pub kind: &'a str,
    /// Human-readable description of what happened.
    pub description: &'a str,
}

/// Append an audit event attributed to the acting identity.
///
/// Open to every identity: the routing layer records what happened, and
/// the log is only readable with `VIEW_EVENT`.
///
/// # Errors
/// Store errors via [`super::OpError::Db`].
pub async fn record(
    conn: &mut DbConnection,
    identity: &Identity,
    request: &RecordEvent<'_>,
    meta: &RequestMeta,
) -> OpResult<()> {
    db::record_event(
        conn,
        &NewEvent {
            kind: request.kind,
            description: request.description,
            ip_address: meta.ip_address.as_deref(),
            endpoint: &meta.endpoint,
            request: &meta.request_line,
            user_id: identity.user_id(),
        },
    )
    .await?;
    Ok(())
}

/// Read the tail of the audit log, newest first.
///
/// # Errors
/// Capability errors for the identity; store errors via
/// [`super::OpError::Db`].
pub async fn list_events(
    conn: &mut DbConnection,
    identity: &Identity,
    limit: i64,
) -> OpResult<Vec<EventPayload>> {
    identity.require(Capabilities::VIEW_EVENT)?;
    let events = db::list_events(conn, limit).await?;
    Ok(events.iter().map(EventPayload::from).collect())
}
