//! Operations invoked by the routing layer.
//!
//! Each function takes the unit-of-work connection for the current
//! request, the acting [`Identity`], and already-parsed arguments;
//! request context that gets persisted (addresses, endpoints, raw
//! request lines) arrives explicitly in a [`RequestMeta`] built by the
//! caller. Capability checks happen here and only here; the `db` layer
//! stays policy-free.
//!
//! No operation opens a transaction: statements run in autocommit and
//! cascades are the store's job. Nothing here retries.

pub mod articles;
pub mod auth;
pub mod categories;
pub mod comments;
pub mod events;
pub mod users;

#[cfg(test)]
mod tests;

use thiserror::Error;

use crate::{
    identity::{CapabilityError, Identity},
    models::Article,
};

/// Failures surfaced to the routing layer.
///
/// Authentication failures carry deliberately no detail: unknown names,
/// expired accounts, and bad digests are indistinguishable. Database
/// constraint violations pass through [`OpError::Db`] untranslated.
#[derive(Debug, Error)]
pub enum OpError {
    /// Login challenge failed, for an unspecified reason.
    #[error("authentication rejected")]
    AuthRejected,
    /// The acting identity may not perform this operation.
    #[error(transparent)]
    Capability(#[from] CapabilityError),
    /// The target exists but its state refuses the operation.
    #[error("operation forbidden")]
    Forbidden,
    /// The target row does not exist (or is hidden from this identity).
    #[error("record not found")]
    NotFound,
    /// Underlying store error, including constraint violations.
    #[error(transparent)]
    Db(#[from] diesel::result::Error),
}

/// Shorthand for operation results.
pub type OpResult<T> = Result<T, OpError>;

/// Request context captured by the routing layer at call time.
///
/// These values become row data (comment `ip_address`, event fields);
/// they are parameters rather than ambient state so the persistence
/// core never reads request globals.
#[derive(Debug, Clone, Default)]
pub struct RequestMeta {
    /// Caller's network origin, when known.
    pub ip_address: Option<String>,
    /// Route endpoint name handling the request.
    pub endpoint: String,
    /// Raw first line of the request, e.g. `GET /api/articles HTTP/1.1`.
    pub request_line: String,
}

/// Whether the acting identity is the article's author.
///
/// False whenever either side is unidentified, so an authorless article
/// never matches the anonymous identity.
pub(crate) fn authored_by(article: &Article, identity: &Identity) -> bool {
    matches!(
        (article.author_id.as_deref(), identity.user_id()),
        (Some(author), Some(caller)) if author == caller
    )
}
