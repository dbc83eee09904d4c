//! Data access over the relational store.
//!
//! This module tree exposes helpers for creating pooled Diesel
//! connections, running embedded migrations, and executing application
//! queries grouped per entity. Queries return plain `QueryResult`s:
//! capability checks belong to [`crate::ops`], and constraint
//! violations propagate untranslated for the routing layer to map.

mod articles;
mod categories;
mod comments;
mod connection;
mod events;
mod insert;
mod migrations;
mod users;


#[cfg(feature = "sqlite")]
pub use self::connection::enable_foreign_keys;
pub use self::{
    articles::{
        ArticleWithRefs, create_article, delete_article, get_article, get_article_with_refs,
        list_articles, record_read, update_article,
    },
    categories::{
        create_category, delete_category, get_category, list_categories_with_counts,
        rename_category,
    },
    comments::{
        create_comment, delete_comment, get_comment, list_comments_for_article, set_reviewed,
    },
    connection::{Backend, DbConnection, DbPool, MIGRATIONS, establish_pool},
    events::{list_events, record_event},
    migrations::{apply_migrations, run_migrations},
    users::{
        create_user, delete_user, get_user, get_user_by_name, list_users, set_expired,
        set_password_hash, set_permission, touch_last_login,
    },
};
