use crate::{
    error::{ApiError, Error},
    schema::{BarShelfItem, UpsertStatus, UserId},
    store::CatalogStore,
};

pub async fn list_bar_shelf(
    user_id: UserId,
    store: &dyn CatalogStore,
) -> Result<Vec<BarShelfItem>, Error> {
    store.list_bar_shelf(user_id).await
}

/// Adds an ingredient to the shelf, or updates its quantity when the user
/// already has an entry with exactly this name.
///
/// Check-then-write without a lock: two concurrent adds of the same name can
/// both insert. Last write wins on quantity.
pub async fn add_ingredient(
    user_id: UserId,
    ingredient_name: &str,
    quantity: &str,
    store: &dyn CatalogStore,
) -> Result<(BarShelfItem, UpsertStatus), Error> {
    if ingredient_name.trim().is_empty() {
        return Err(ApiError::InvalidRequest.new("Ingredient name is required"));
    }

    match store.find_bar_shelf_item(user_id, ingredient_name).await? {
        Some(existing) => {
            let item = store
                .update_bar_shelf_quantity(existing.id, quantity)
                .await?;
            log::debug!("Updated {ingredient_name:?} on shelf of user {user_id}");
            Ok((item, UpsertStatus::Updated))
        }
        None => {
            let item = store
                .insert_bar_shelf_item(user_id, ingredient_name, quantity)
                .await?;
            log::debug!("Added {ingredient_name:?} to shelf of user {user_id}");
            Ok((item, UpsertStatus::Created))
        }
    }
}

pub async fn remove_ingredient(
    user_id: UserId,
    item_id: i32,
    store: &dyn CatalogStore,
) -> Result<(), Error> {
    if !store.delete_bar_shelf_item(user_id, item_id).await? {
        return Err(ApiError::NotFound.new("Ingredient not found"));
    }
    Ok(())
}
