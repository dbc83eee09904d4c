//! Article helpers, including the joined author/category projections.

use diesel::{prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::{Article, ArticleChanges, NewArticle};

/// An article row joined with its optional author and category, each as
/// an `(id, name)` pair.
pub type ArticleWithRefs = (
    Article,
    Option<(String, String)>,
    Option<(String, String)>,
);

/// Insert a new article.
///
/// # Errors
/// Returns any error produced by the insertion query.
#[must_use = "handle the result"]
pub async fn create_article(
    conn: &mut DbConnection,
    article: &NewArticle<'_>,
) -> QueryResult<usize> {
    use crate::schema::article::dsl as a;
    diesel::insert_into(a::article)
        .values(article)
        .execute(conn)
        .await
}

/// Retrieve a bare article row by id.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_article(
    conn: &mut DbConnection,
    article_id: &str,
) -> QueryResult<Option<Article>> {
    use crate::schema::article::dsl as a;
    a::article
        .filter(a::id.eq(article_id))
        .first::<Article>(conn)
        .await
        .optional()
}

/// Retrieve an article together with its author and category references.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_article_with_refs(
    conn: &mut DbConnection,
    article_id: &str,
) -> QueryResult<Option<ArticleWithRefs>> {
    use crate::schema::{article, category, users};
    article::table
        .left_join(users::table)
        .left_join(category::table)
        .filter(article::id.eq(article_id))
        .select((
            article::all_columns,
            (users::id, users::name).nullable(),
            (category::id, category::name).nullable(),
        ))
        .first::<ArticleWithRefs>(conn)
        .await
        .optional()
}

/// List articles newest first, optionally restricted to public ones.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_articles(
    conn: &mut DbConnection,
    only_public: bool,
) -> QueryResult<Vec<ArticleWithRefs>> {
    use crate::schema::{article, category, users};
    let mut query = article::table
        .left_join(users::table)
        .left_join(category::table)
        .select((
            article::all_columns,
            (users::id, users::name).nullable(),
            (category::id, category::name).nullable(),
        ))
        .order(article::post_time.desc())
        .into_boxed();
    if only_public {
        query = query.filter(article::public.eq(true));
    }
    query.load::<ArticleWithRefs>(conn).await
}

/// Apply a partial update to an article, bumping `update_time`.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn update_article(
    conn: &mut DbConnection,
    article_id: &str,
    changes: &ArticleChanges<'_>,
) -> QueryResult<usize> {
    use crate::schema::article::dsl as a;
    diesel::update(a::article.filter(a::id.eq(article_id)))
        .set(changes)
        .execute(conn)
        .await
}

/// Increment an article's read counter.
///
/// The counter only ever moves up, and the increment happens in the
/// store so concurrent readers never lose a count.
///
/// # Errors
/// Returns any error produced by the update query.
#[must_use = "handle the result"]
pub async fn record_read(conn: &mut DbConnection, article_id: &str) -> QueryResult<usize> {
    use crate::schema::article::dsl as a;
    diesel::update(a::article.filter(a::id.eq(article_id)))
        .set(a::read_count.eq(a::read_count + 1))
        .execute(conn)
        .await
}

/// Delete an article and, through the store's cascade, its comments.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_article(conn: &mut DbConnection, article_id: &str) -> QueryResult<usize> {
    use crate::schema::article::dsl as a;
    diesel::delete(a::article.filter(a::id.eq(article_id)))
        .execute(conn)
        .await
}
