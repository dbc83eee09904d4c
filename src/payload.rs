//! Ordered response projections for the API layer.
//!
//! Field declaration order is the emitted key order and is part of the
//! wire contract, so reordering fields here is a breaking change.
//! Optional relations and aggregates omit their key entirely when
//! absent; the one deliberate exception is [`CommentPayload::reply_to`],
//! which is always emitted (null for a top-level comment) because
//! clients use it to rebuild the reply tree.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::{
    capabilities::{CapabilityFlag, format_permission},
    models::{Article, Category, Comment, Event, User},
};

/// Minimal reference to a related entity.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct EntityRef {
    /// Related row id.
    pub id: String,
    /// Related row display name.
    pub name: String,
}

impl From<(String, String)> for EntityRef {
    fn from((id, name): (String, String)) -> Self {
        Self { id, name }
    }
}

/// Projection of a [`User`]. The password hash is never serialised.
#[derive(Debug, Serialize)]
pub struct UserPayload {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permission: Option<Vec<CapabilityFlag>>,
    pub expired: bool,
    pub last_login: NaiveDateTime,
}

impl UserPayload {
    /// Project a user, optionally including the permission summary.
    #[must_use]
    pub fn new(user: &User, with_permission: bool) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            permission: with_permission.then(|| format_permission(user.capabilities())),
            expired: user.expired,
            last_login: user.last_login,
        }
    }
}

/// Projection of a [`Category`].
#[derive(Debug, Serialize)]
pub struct CategoryPayload {
    pub id: String,
    pub name: String,
    /// Present only when the listing query aggregated it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_count: Option<i64>,
}

impl CategoryPayload {
    /// Project a category without the aggregate.
    #[must_use]
    pub fn new(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            article_count: None,
        }
    }

    /// Project a category with the article count computed by the
    /// listing query.
    #[must_use]
    pub fn with_count(category: &Category, count: i64) -> Self {
        Self {
            article_count: Some(count),
            ..Self::new(category)
        }
    }
}

/// Projection of an [`Article`].
///
/// `content` appears only when requested and may then be null;
/// `text_type` and `source_text` appear together at the end when the
/// source is requested.
#[derive(Debug, Serialize)]
pub struct ArticlePayload {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<EntityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Option<String>>,
    pub public: bool,
    pub is_commentable: bool,
    pub read_count: i32,
    pub post_time: NaiveDateTime,
    pub update_time: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
}

impl ArticlePayload {
    /// Project an article with its resolved relations and inclusion
    /// flags.
    #[must_use]
    pub fn new(
        article: &Article,
        author: Option<EntityRef>,
        category: Option<EntityRef>,
        with_content: bool,
        with_source: bool,
    ) -> Self {
        Self {
            id: article.id.clone(),
            title: article.title.clone(),
            author,
            category,
            content: with_content.then(|| article.content.clone()),
            public: article.public,
            is_commentable: article.is_commentable,
            read_count: article.read_count,
            post_time: article.post_time,
            update_time: article.update_time,
            text_type: with_source.then(|| article.text_type.clone()),
            source_text: with_source.then(|| article.source_text.clone()),
        }
    }
}

/// Projection of a [`Comment`].
#[derive(Debug, Serialize)]
pub struct CommentPayload {
    pub id: i32,
    pub content: String,
    pub nickname: String,
    /// Emitted only for author-written comments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_author: Option<bool>,
    pub create_time: NaiveDateTime,
    /// Always emitted; null for a top-level comment.
    pub reply_to: Option<i32>,
}

impl CommentPayload {
    /// Project a comment.
    #[must_use]
    pub fn new(comment: &Comment) -> Self {
        Self {
            id: comment.id,
            content: comment.content.clone(),
            nickname: comment.nickname.clone(),
            is_author: comment.is_author.then_some(true),
            create_time: comment.create_time,
            reply_to: comment.reply_to,
        }
    }
}

/// Projection of an audit [`Event`].
#[derive(Debug, Serialize)]
pub struct EventPayload {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub ip_address: Option<String>,
    pub endpoint: String,
    pub request: String,
    pub create_time: NaiveDateTime,
    pub user_id: Option<String>,
}

impl From<&Event> for EventPayload {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            kind: event.kind.clone(),
            description: event.description.clone(),
            ip_address: event.ip_address.clone(),
            endpoint: event.endpoint.clone(),
            request: event.request.clone(),
            create_time: event.create_time,
            user_id: event.user_id.clone(),
        }
    }
}
