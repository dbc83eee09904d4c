//! Record types for the five persisted entities.
//!
//! Columns omitted from the `New*` insert types (timestamps, counters,
//! review flags) take their values from the schema defaults.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{capabilities::Capabilities, credentials};

#[derive(Queryable, Serialize, Deserialize, Debug, Clone)]
pub struct User {
    pub id: String,
    pub name: String,
    pub password: String,
    pub permission: i64,
    pub expired: bool,
    pub last_login: NaiveDateTime,
    pub create_time: NaiveDateTime,
}

impl User {
    /// Capability set decoded from the stored permission mask.
    #[must_use]
    pub const fn capabilities(&self) -> Capabilities {
        Capabilities::from_stored(self.permission)
    }

    /// Whether the stored mask grants any of the queried capability bits.
    #[must_use]
    pub fn can(&self, wanted: Capabilities) -> bool {
        self.capabilities().intersects(wanted)
    }

    /// Verify a challenge digest against the stored password hash.
    ///
    /// The caller presents `digest(stored_hash + timestamp)`; the plaintext
    /// password is never seen here. Expiry is checked separately by the
    /// login operation.
    #[must_use]
    pub fn check_challenge(&self, enc_password: &str, timestamp: i64) -> bool {
        credentials::verify_challenge(&self.password, enc_password, timestamp)
    }

    /// An expired account is never authenticatable.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.expired
    }
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::users)]
pub struct NewUser<'a> {
    pub id: &'a str,
    pub name: &'a str,
    /// Always a digest; `ops::users::create_user` hashes the plaintext.
    pub password: &'a str,
    pub permission: i64,
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub create_time: NaiveDateTime,
    pub create_by: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::category)]
pub struct NewCategory<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub create_by: Option<&'a str>,
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone)]
pub struct Article {
    pub id: String,
    pub title: String,
    pub text_type: String,
    pub source_text: String,
    pub content: Option<String>,
    pub read_count: i32,
    pub post_time: NaiveDateTime,
    pub update_time: NaiveDateTime,
    pub public: bool,
    pub is_commentable: bool,
    pub category_id: Option<String>,
    pub author_id: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::article)]
pub struct NewArticle<'a> {
    pub id: &'a str,
    pub title: &'a str,
    pub text_type: &'a str,
    pub source_text: &'a str,
    pub content: Option<&'a str>,
    pub public: bool,
    pub is_commentable: bool,
    pub category_id: Option<&'a str>,
    pub author_id: Option<&'a str>,
}

/// Partial update for an article. `None` leaves a column untouched; the
/// nested options write NULL. `update_time` is always rewritten.
#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::article)]
pub struct ArticleChanges<'a> {
    pub title: Option<&'a str>,
    pub text_type: Option<&'a str>,
    pub source_text: Option<&'a str>,
    pub content: Option<Option<&'a str>>,
    pub public: Option<bool>,
    pub is_commentable: Option<bool>,
    pub category_id: Option<Option<&'a str>>,
    pub update_time: NaiveDateTime,
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone)]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub nickname: String,
    pub reviewed: bool,
    pub is_author: bool,
    pub create_time: NaiveDateTime,
    pub ip_address: Option<String>,
    pub user_id: Option<String>,
    pub article_id: String,
    pub reply_to: Option<i32>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::comment)]
pub struct NewComment<'a> {
    pub content: &'a str,
    pub nickname: &'a str,
    pub is_author: bool,
    pub ip_address: Option<&'a str>,
    pub user_id: Option<&'a str>,
    pub article_id: &'a str,
    pub reply_to: Option<i32>,
}

#[derive(Queryable, Serialize, Deserialize, Debug, Clone)]
pub struct Event {
    pub id: i32,
    pub kind: String,
    pub description: String,
    pub ip_address: Option<String>,
    pub endpoint: String,
    pub request: String,
    pub create_time: NaiveDateTime,
    pub user_id: Option<String>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::event)]
pub struct NewEvent<'a> {
    pub kind: &'a str,
    pub description: &'a str,
    pub ip_address: Option<&'a str>,
    pub endpoint: &'a str,
    pub request: &'a str,
    pub user_id: Option<&'a str>,
}
