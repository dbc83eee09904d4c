//! Comment helpers.
//!
//! `reply_to` is not validated against the parent comment's article:
//! a reply pointing at a comment on another article is stored as given.

use cfg_if::cfg_if;
use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::{Comment, NewComment};

cfg_if! {
    if #[cfg(any(feature = "postgres", feature = "returning_clauses_for_sqlite_3_35"))] {
        /// Insert a new comment and return its row id.
        ///
        /// # Errors
        /// Returns any error produced by the insertion query; a missing
        /// article surfaces as a foreign-key violation.
        #[must_use = "handle the result"]
        pub async fn create_comment(
            conn: &mut DbConnection,
            new_comment: &NewComment<'_>,
        ) -> QueryResult<i32> {
            use crate::schema::comment::dsl::{comment, id};
            diesel::insert_into(comment)
                .values(new_comment)
                .returning(id)
                .get_result(conn)
                .await
        }
    } else if #[cfg(feature = "sqlite")] {
        /// Insert a new comment and return its row id.
        ///
        /// # Errors
        /// Returns any error produced by the insertion query; a missing
        /// article surfaces as a foreign-key violation.
        #[must_use = "handle the result"]
        pub async fn create_comment(
            conn: &mut DbConnection,
            new_comment: &NewComment<'_>,
        ) -> QueryResult<i32> {
            use crate::schema::comment::dsl::comment;
            diesel::insert_into(comment)
                .values(new_comment)
                .execute(conn)
                .await?;
            super::insert::fetch_last_insert_rowid(conn).await
        }
    } else {
        compile_error!("Either 'sqlite' or 'postgres' feature must be enabled");
    }
}

/// Retrieve a comment by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_comment(conn: &mut DbConnection, comment_id: i32) -> QueryResult<Option<Comment>> {
    use crate::schema::comment::dsl as c;
    c::comment
        .filter(c::id.eq(comment_id))
        .first::<Comment>(conn)
        .await
        .optional()
}

/// List an article's comments oldest first, optionally including ones
/// still awaiting review.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_comments_for_article(
    conn: &mut DbConnection,
    article_id: &str,
    include_unreviewed: bool,
) -> QueryResult<Vec<Comment>> {
    use crate::schema::comment::dsl as c;
    let mut query = c::comment
        .filter(c::article_id.eq(article_id))
        .order(c::create_time.asc())
        .then_order_by(c::id.asc())
        .into_boxed();
    if !include_unreviewed {
        query = query.filter(c::reviewed.eq(true));
    }
    query.load::<Comment>(conn).await
}

/// Mark a comment as reviewed.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn set_reviewed(conn: &mut DbConnection, comment_id: i32) -> QueryResult<usize> {
    use crate::schema::comment::dsl as c;
    diesel::update(c::comment.filter(c::id.eq(comment_id)))
        .set(c::reviewed.eq(true))
        .execute(conn)
        .await
}

/// Delete a comment. Replies to it keep their rows with `reply_to`
/// nulled by the store.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_comment(conn: &mut DbConnection, comment_id: i32) -> QueryResult<usize> {
    use crate::schema::comment::dsl as c;
    diesel::delete(c::comment.filter(c::id.eq(comment_id)))
        .execute(conn)
        .await
}
