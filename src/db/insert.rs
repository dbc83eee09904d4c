//! Row-id retrieval for `SQLite` builds without `RETURNING` support.

#[cfg(all(feature = "sqlite", not(feature = "returning_clauses_for_sqlite_3_35")))]
use diesel::result::QueryResult;
#[cfg(all(feature = "sqlite", not(feature = "returning_clauses_for_sqlite_3_35")))]
use diesel_async::RunQueryDsl;

#[cfg(all(feature = "sqlite", not(feature = "returning_clauses_for_sqlite_3_35")))]
use super::connection::DbConnection;

/// Fetch the row id of the most recent insert on this connection.
#[cfg(all(feature = "sqlite", not(feature = "returning_clauses_for_sqlite_3_35")))]
pub async fn fetch_last_insert_rowid(conn: &mut DbConnection) -> QueryResult<i32> {
    use diesel::sql_types::Integer;
    diesel::select(diesel::dsl::sql::<Integer>("last_insert_rowid()"))
        .get_result(conn)
        .await
}
