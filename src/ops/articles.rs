//! Article operations.
//!
//! Private articles are visible to their author and to holders of
//! `EDIT_ARTICLE`; for everyone else they do not exist, so the lookup
//! reports not-found rather than forbidden.

use chrono::Utc;

use super::{OpError, OpResult, authored_by};
use crate::{
    capabilities::Capabilities,
    db::{self, DbConnection},
    identity::Identity,
    models::{ArticleChanges, NewArticle},
    payload::ArticlePayload,
};

/// Arguments for publishing an article.
#[derive(Debug, Clone)]
pub struct CreateArticle<'a> {
    /// Externally assigned article id.
    pub id: &'a str,
    pub title: &'a str,
    /// Source markup kind, e.g. `markdown`.
    pub text_type: &'a str,
    /// Raw authored content.
    pub source_text: &'a str,
    /// Rendered content, when the caller has already rendered it.
    pub content: Option<&'a str>,
    pub public: bool,
    pub is_commentable: bool,
    pub category_id: Option<&'a str>,
}

/// Partial update arguments; `None` leaves a field untouched, the
/// nested options clear it.
#[derive(Debug, Clone, Default)]
pub struct UpdateArticle<'a> {
    pub title: Option<&'a str>,
    pub text_type: Option<&'a str>,
    pub source_text: Option<&'a str>,
    pub content: Option<Option<&'a str>>,
    pub public: Option<bool>,
    pub is_commentable: Option<bool>,
    pub category_id: Option<Option<&'a str>>,
}

/// Publish an article authored by the calling account.
///
/// # Errors
/// Capability errors for the identity; duplicate ids and unknown
/// categories propagate as constraint violations through
/// [`OpError::Db`].
pub async fn create_article(
    conn: &mut DbConnection,
    identity: &Identity,
    request: &CreateArticle<'_>,
) -> OpResult<()> {
    identity.require(Capabilities::POST_ARTICLE)?;
    db::create_article(
        conn,
        &NewArticle {
            id: request.id,
            title: request.title,
            text_type: request.text_type,
            source_text: request.source_text,
            content: request.content,
            public: request.public,
            is_commentable: request.is_commentable,
            category_id: request.category_id,
            author_id: identity.user_id(),
        },
    )
    .await?;
    Ok(())
}

/// Apply a partial update to an article.
///
/// # Errors
/// Capability errors for the identity; [`OpError::NotFound`] for an
/// unknown id.
pub async fn update_article(
    conn: &mut DbConnection,
    identity: &Identity,
    article_id: &str,
    request: &UpdateArticle<'_>,
) -> OpResult<()> {
    identity.require(Capabilities::EDIT_ARTICLE)?;
    let changes = ArticleChanges {
        title: request.title,
        text_type: request.text_type,
        source_text: request.source_text,
        content: request.content,
        public: request.public,
        is_commentable: request.is_commentable,
        category_id: request.category_id,
        update_time: Utc::now().naive_utc(),
    };
    let updated = db::update_article(conn, article_id, &changes).await?;
    if updated == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}

/// Fetch one article with its resolved references.
///
/// # Errors
/// [`OpError::NotFound`] when the id is unknown or the article is
/// private and the identity is neither its author nor an editor.
pub async fn get_article(
    conn: &mut DbConnection,
    identity: &Identity,
    article_id: &str,
    with_content: bool,
    with_source: bool,
) -> OpResult<ArticlePayload> {
    let (article, author, category) = db::get_article_with_refs(conn, article_id)
        .await?
        .ok_or(OpError::NotFound)?;
    if !article.public
        && !authored_by(&article, identity)
        && !identity.can(Capabilities::EDIT_ARTICLE)
    {
        return Err(OpError::NotFound);
    }
    Ok(ArticlePayload::new(
        &article,
        author.map(Into::into),
        category.map(Into::into),
        with_content,
        with_source,
    ))
}

/// List articles newest first, without content or source.
///
/// Holders of `EDIT_ARTICLE` also see private articles.
///
/// # Errors
/// Store errors via [`OpError::Db`].
pub async fn list_articles(
    conn: &mut DbConnection,
    identity: &Identity,
) -> OpResult<Vec<ArticlePayload>> {
    let only_public = !identity.can(Capabilities::EDIT_ARTICLE);
    let rows = db::list_articles(conn, only_public).await?;
    Ok(rows
        .into_iter()
        .map(|(article, author, category)| {
            ArticlePayload::new(
                &article,
                author.map(Into::into),
                category.map(Into::into),
                false,
                false,
            )
        })
        .collect())
}

/// Count one read of an article.
///
/// # Errors
/// [`OpError::NotFound`] for an unknown id.
pub async fn record_read(conn: &mut DbConnection, article_id: &str) -> OpResult<()> {
    let updated = db::record_read(conn, article_id).await?;
    if updated == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}

/// Delete an article and, by cascade, its comments.
///
/// # Errors
/// Capability errors for the identity; [`OpError::NotFound`] for an
/// unknown id.
pub async fn delete_article(
    conn: &mut DbConnection,
    identity: &Identity,
    article_id: &str,
) -> OpResult<()> {
    identity.require(Capabilities::DELETE_ARTICLE)?;
    let deleted = db::delete_article(conn, article_id).await?;
    if deleted == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}
