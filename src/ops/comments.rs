//! Comment operations.
//!
//! Posting is open to anonymous callers; moderation requires the
//! review/delete capabilities.

use super::{OpError, OpResult, RequestMeta, authored_by};
use crate::{
    capabilities::Capabilities,
    db::{self, DbConnection},
    identity::Identity,
    models::NewComment,
    payload::CommentPayload,
};

/// Arguments for posting a comment.
#[derive(Debug, Clone)]
pub struct PostComment<'a> {
    pub article_id: &'a str,
    pub content: &'a str,
    /// Display name chosen by the commenter.
    pub nickname: &'a str,
    /// Parent comment for replies. Not validated against the parent's
    /// article; a cross-article reply is stored as given.
    pub reply_to: Option<i32>,
}

/// Post a comment on an article.
///
/// `is_author` is derived here by comparing the acting identity with
/// the article's author; the caller cannot claim it. The caller's
/// address from [`RequestMeta`] is captured on the row.
///
/// # Errors
/// [`OpError::NotFound`] for an unknown article,
/// [`OpError::Forbidden`] when commenting is disabled on it.
pub async fn post_comment(
    conn: &mut DbConnection,
    identity: &Identity,
    request: &PostComment<'_>,
    meta: &RequestMeta,
) -> OpResult<CommentPayload> {
    let article = db::get_article(conn, request.article_id)
        .await?
        .ok_or(OpError::NotFound)?;
    if !article.is_commentable {
        return Err(OpError::Forbidden);
    }
    let comment_id = db::create_comment(
        conn,
        &NewComment {
            content: request.content,
            nickname: request.nickname,
            is_author: authored_by(&article, identity),
            ip_address: meta.ip_address.as_deref(),
            user_id: identity.user_id(),
            article_id: request.article_id,
            reply_to: request.reply_to,
        },
    )
    .await?;
    let comment = db::get_comment(conn, comment_id)
        .await?
        .ok_or(OpError::NotFound)?;
    Ok(CommentPayload::new(&comment))
}

/// List an article's comments oldest first.
///
/// Unreviewed comments are visible only to holders of `REVIEW_COMMENT`.
///
/// # Errors
/// [`OpError::NotFound`] for an unknown article.
pub async fn list_comments(
    conn: &mut DbConnection,
    identity: &Identity,
    article_id: &str,
) -> OpResult<Vec<CommentPayload>> {
    if db::get_article(conn, article_id).await?.is_none() {
        return Err(OpError::NotFound);
    }
    let include_unreviewed = identity.can(Capabilities::REVIEW_COMMENT);
    let comments = db::list_comments_for_article(conn, article_id, include_unreviewed).await?;
    Ok(comments.iter().map(CommentPayload::new).collect())
}

/// Approve a comment for public display.
///
/// # Errors
/// Capability errors for the identity; [`OpError::NotFound`] for an
/// unknown id.
pub async fn review_comment(
    conn: &mut DbConnection,
    identity: &Identity,
    comment_id: i32,
) -> OpResult<()> {
    identity.require(Capabilities::REVIEW_COMMENT)?;
    let updated = db::set_reviewed(conn, comment_id).await?;
    if updated == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}

/// Delete a comment; replies to it survive with `reply_to` nulled.
///
/// # Errors
/// Capability errors for the identity; [`OpError::NotFound`] for an
/// unknown id.
pub async fn delete_comment(
    conn: &mut DbConnection,
    identity: &Identity,
    comment_id: i32,
) -> OpResult<()> {
    identity.require(Capabilities::DELETE_COMMENT)?;
    let deleted = db::delete_comment(conn, comment_id).await?;
    if deleted == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}
