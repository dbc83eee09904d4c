//! Category operations. Listing is open; mutation requires
//! `MANAGE_CATEGORY`.

use super::{OpError, OpResult};
use crate::{
    capabilities::Capabilities,
    db::{self, DbConnection},
    identity::Identity,
    models::NewCategory,
    payload::CategoryPayload,
};

/// List every category with its article count.
///
/// # Errors
/// Store errors via [`OpError::Db`].
pub async fn list_categories(conn: &mut DbConnection) -> OpResult<Vec<CategoryPayload>> {
    let rows = db::list_categories_with_counts(conn).await?;
    Ok(rows
        .iter()
        .map(|(cat, count)| CategoryPayload::with_count(cat, *count))
        .collect())
}

/// Create a category owned by the calling account.
///
/// # Errors
/// Capability errors for the identity; duplicate ids or names propagate
/// as constraint violations through [`OpError::Db`].
pub async fn create_category(
    conn: &mut DbConnection,
    identity: &Identity,
    category_id: &str,
    name: &str,
) -> OpResult<CategoryPayload> {
    identity.require(Capabilities::MANAGE_CATEGORY)?;
    db::create_category(
        conn,
        &NewCategory {
            id: category_id,
            name,
            create_by: identity.user_id(),
        },
    )
    .await?;
    let category = db::get_category(conn, category_id)
        .await?
        .ok_or(OpError::NotFound)?;
    Ok(CategoryPayload::new(&category))
}

/// Rename a category.
///
/// # Errors
/// Capability errors for the identity; [`OpError::NotFound`] for an
/// unknown id; the unique name constraint propagates via
/// [`OpError::Db`].
pub async fn rename_category(
    conn: &mut DbConnection,
    identity: &Identity,
    category_id: &str,
    new_name: &str,
) -> OpResult<()> {
    identity.require(Capabilities::MANAGE_CATEGORY)?;
    let updated = db::rename_category(conn, category_id, new_name).await?;
    if updated == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}

/// Delete a category, leaving its articles uncategorised.
///
/// # Errors
/// Capability errors for the identity; [`OpError::NotFound`] for an
/// unknown id.
pub async fn delete_category(
    conn: &mut DbConnection,
    identity: &Identity,
    category_id: &str,
) -> OpResult<()> {
    identity.require(Capabilities::MANAGE_CATEGORY)?;
    let deleted = db::delete_category(conn, category_id).await?;
    if deleted == 0 {
        return Err(OpError::NotFound);
    }
    Ok(())
}
