//! Category helpers, including the article-count aggregation.

use diesel::{dsl::count, prelude::*, result::QueryResult};
use diesel_async::RunQueryDsl;

use super::connection::DbConnection;
use crate::models::{Category, NewCategory};

/// Insert a new category.
///
/// # Errors
/// Returns any error produced by the insertion query; a duplicate id or
/// name surfaces as a unique-constraint violation.
#[must_use = "handle the result"]
pub async fn create_category(
    conn: &mut DbConnection,
    cat: &NewCategory<'_>,
) -> QueryResult<usize> {
    use crate::schema::category::dsl::category;
    diesel::insert_into(category).values(cat).execute(conn).await
}

/// Look up a category by id, without the aggregate.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn get_category(
    conn: &mut DbConnection,
    category_id: &str,
) -> QueryResult<Option<Category>> {
    use crate::schema::category::dsl as c;
    c::category
        .filter(c::id.eq(category_id))
        .first::<Category>(conn)
        .await
        .optional()
}

/// List every category with the number of articles filed under it.
///
/// The count is computed here and only here; callers that skip this
/// query never see an article count at all.
///
/// # Errors
/// Returns any error produced by the underlying database query.
#[must_use = "handle the result"]
pub async fn list_categories_with_counts(
    conn: &mut DbConnection,
) -> QueryResult<Vec<(Category, i64)>> {
    use crate::schema::{article, category};
    category::table
        .left_join(article::table)
        .group_by((
            category::id,
            category::name,
            category::create_time,
            category::create_by,
        ))
        .select((
            (
                category::id,
                category::name,
                category::create_time,
                category::create_by,
            ),
            count(article::id.nullable()),
        ))
        .order(category::name.asc())
        .load::<(Category, i64)>(conn)
        .await
}

/// Rename a category.
///
/// # Errors
/// Returns any error produced by the update query; the new name is
/// subject to the unique constraint.
#[must_use = "handle the result"]
pub async fn rename_category(
    conn: &mut DbConnection,
    category_id: &str,
    new_name: &str,
) -> QueryResult<usize> {
    use crate::schema::category::dsl as c;
    diesel::update(c::category.filter(c::id.eq(category_id)))
        .set(c::name.eq(new_name))
        .execute(conn)
        .await
}

/// Delete a category. Articles filed under it keep their rows with the
/// category reference nulled.
///
/// # Errors
/// Returns any error produced by the delete query.
#[must_use = "handle the result"]
pub async fn delete_category(conn: &mut DbConnection, category_id: &str) -> QueryResult<usize> {
    use crate::schema::category::dsl as c;
    diesel::delete(c::category.filter(c::id.eq(category_id)))
        .execute(conn)
        .await
}
